use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::{mpsc::Receiver, Arc, Condvar, Mutex, PoisonError};

use crate::actor::{actor::Actor, message_source::MessageSource};

/// Ids of threads that have finished, in completion order, and the condvar
/// the supervisor waits on.
pub(super) type CompletedActors = Arc<(Mutex<Vec<u32>>, Condvar)>;

/// Drives one actor or message source on its thread, then reports the thread
/// as completed when dropped, whether it returned, failed or panicked.
pub(super) struct Runner {
    completed_actors: CompletedActors,
    actor_id: u32,
    name: String,
}

impl Runner {
    pub(super) fn new(completed_actors: CompletedActors, actor_id: u32, name: &str) -> Self {
        Self {
            completed_actors,
            actor_id,
            name: name.to_owned(),
        }
    }

    pub(super) fn run_actor<T, U>(self, receiver: &Receiver<T>, mut actor: U) -> Result<()>
    where
        U: Actor<T>,
    {
        debug!("Starting actor {} (#{})", self.name, self.actor_id);
        actor
            .startup()
            .with_context(|| format!("{} failed to start", self.name))?;

        // Ends early when the actor asks to, otherwise once every sender is gone
        while let Ok(msg) = receiver.recv() {
            if actor
                .handle_message(msg)
                .with_context(|| format!("{} failed handling a message", self.name))?
            {
                debug!("{} asked to stop", self.name);
                break;
            }
        }

        Ok(())
    }

    pub(super) fn run_message_source<T>(self, mut message_source: T) -> Result<()>
    where
        T: MessageSource,
    {
        debug!("Starting message source {} (#{})", self.name, self.actor_id);
        while !message_source
            .run()
            .with_context(|| format!("{} failed producing a message", self.name))?
        {}

        debug!("{} has nothing more to send", self.name);
        Ok(())
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        info!("{} (#{}) finished", self.name, self.actor_id);
        let (mutex, cvar) = &*self.completed_actors;
        // A poisoned list still holds valid ids
        let mut completed = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        completed.push(self.actor_id);
        cvar.notify_one();
    }
}
