use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use chrono::Local;
use log::debug;

use crate::{
    actor::message_source::MessageSource,
    command::Command,
    console::CommandInput,
};

use super::tracker_actor::TrackerMessage;

pub(crate) struct ConsoleInputActor {
    input: Box<dyn CommandInput + Send>,
    tx: Sender<TrackerMessage>,
}

impl ConsoleInputActor {
    pub(crate) fn new(input: Box<dyn CommandInput + Send>, tx: Sender<TrackerMessage>) -> Self {
        Self { input, tx }
    }
}

impl MessageSource for ConsoleInputActor {
    fn run(&mut self) -> Result<bool> {
        let command = self
            .input
            .next_command()
            .context("Console Input Actor failed to read a command")?;
        debug!("Sending: {:?}", command);

        self.tx
            .send(TrackerMessage::Command(command, Local::now().naive_local()))
            .context("Console Input Actor failed to send to tx")?;

        // Nothing more to read after a quit.  Finishing here doesn't end the
        // session, the tracker does that once it reaches the quit.
        Ok(command == Command::Quit)
    }
}
