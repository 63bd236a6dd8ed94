use std::{
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result};

use crate::actor::{actor::Actor, message_source::MessageSource};

use super::runner::Runner;

pub(super) type ActorResult = JoinHandle<Result<()>>;

pub(super) fn spawn_actor<T, U>(
    actor: U,
    name: String,
    runner: Runner,
) -> Result<(Sender<T>, ActorResult)>
where
    T: Send + Sync + 'static,
    U: Actor<T> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel::<T>();
    let join_handle = thread::Builder::new()
        .name(name)
        // The runner is dropped when the thread finishes, notifying the supervisor
        .spawn(move || runner.run_actor(&receiver, actor))
        .context("Failed to start actor thread")?;

    Ok((sender, join_handle))
}

pub(super) fn spawn_message_source<T>(
    message_source: T,
    name: String,
    runner: Runner,
) -> Result<ActorResult>
where
    T: MessageSource + Send + 'static,
{
    thread::Builder::new()
        .name(name)
        .spawn(move || runner.run_message_source(message_source))
        .context("Failed to start message source thread")
}
