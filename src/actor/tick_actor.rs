use std::{
    sync::mpsc::Sender,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;

use crate::actor::message_source::MessageSource;

/// Sends a message built from the tick instant every `interval`.
pub(crate) struct TickActor<T> {
    ticker: Receiver<Instant>,
    tx: Sender<T>,
    message_builder: fn(Instant) -> T,
}

impl<T> TickActor<T> {
    pub(crate) fn new(interval: Duration, tx: Sender<T>, message_builder: fn(Instant) -> T) -> Self {
        Self {
            ticker: crossbeam_channel::tick(interval),
            tx,
            message_builder,
        }
    }
}

impl<T> MessageSource for TickActor<T>
where
    T: Send + Sync + 'static,
{
    fn run(&mut self) -> Result<bool> {
        let instant = self.ticker.recv().context("Ticker stopped")?;
        self.tx
            .send((self.message_builder)(instant))
            .context("Tick receiver hung up")?;

        Ok(false)
    }
}
