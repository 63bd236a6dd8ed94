use std::{
    collections::HashMap,
    sync::{mpsc::Sender, Arc, Condvar, Mutex, PoisonError},
};

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};

use crate::actor::{actor::Actor, message_source::MessageSource};

use super::{
    handle::{spawn_actor, spawn_message_source, ActorResult},
    runner::{CompletedActors, Runner},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Actor,
    MessageSource,
}

struct Supervised {
    name: String,
    kind: Kind,
    join_handle: ActorResult,
}

/// Runs each actor and message source on its own thread.  The session ends
/// when an actor stops or anything fails; a message source running dry is not
/// enough, as its last messages may still be queued for an actor.
pub(crate) struct Supervisor {
    next_actor_id: u32,
    handles: HashMap<u32, Supervised>,
    completed_actors: CompletedActors,
}

impl Supervisor {
    pub(crate) fn new() -> Self {
        Self {
            next_actor_id: 0,
            handles: HashMap::new(),
            completed_actors: Arc::new((Mutex::new(Vec::new()), Condvar::new())),
        }
    }

    pub(crate) fn start<T, U>(&mut self, actor: T, name: &str) -> Result<Sender<U>>
    where
        T: Actor<U> + Send + 'static,
        U: Send + Sync + 'static,
    {
        let actor_id = self.get_next_actor_id();
        let runner = Runner::new(self.completed_actors.clone(), actor_id, name);
        let (sender, join_handle) = spawn_actor(actor, name.to_owned(), runner)?;
        self.track(actor_id, name, Kind::Actor, join_handle);

        Ok(sender)
    }

    pub(crate) fn start_message_source<T>(&mut self, message_source: T, name: &str) -> Result<()>
    where
        T: MessageSource + Send + 'static,
    {
        let actor_id = self.get_next_actor_id();
        let runner = Runner::new(self.completed_actors.clone(), actor_id, name);
        let join_handle = spawn_message_source(message_source, name.to_owned(), runner)?;
        self.track(actor_id, name, Kind::MessageSource, join_handle);

        Ok(())
    }

    /// Blocks until an actor stops or anything fails, returning the outcome.
    /// The remaining threads are left to die with the process.
    pub(crate) fn supervise(&mut self) -> Result<()> {
        loop {
            let actor_id = self.wait_for_completed_actor();
            debug!("Completed #{}", actor_id);

            let Some(supervised) = self.handles.remove(&actor_id) else {
                warn!("Got completion for unknown thread #{}", actor_id);
                continue;
            };
            let Supervised {
                name,
                kind,
                join_handle,
            } = supervised;

            match join_handle.join() {
                Ok(Ok(())) if kind == Kind::MessageSource => {
                    info!("{} ran dry, session continues", name);
                }
                Ok(Ok(())) => {
                    info!("{} stopped, ending session", name);
                    return Ok(());
                }
                Ok(Err(err)) => {
                    error!("Error in {}: {:?}", name, err);
                    return Err(err.context(format!("{name} failed")));
                }
                Err(_) => {
                    error!("{} panicked", name);
                    return Err(anyhow!("{name} panicked"));
                }
            }
        }
    }

    fn track(&mut self, actor_id: u32, name: &str, kind: Kind, join_handle: ActorResult) {
        self.handles.insert(
            actor_id,
            Supervised {
                name: name.to_owned(),
                kind,
                join_handle,
            },
        );
    }

    fn get_next_actor_id(&mut self) -> u32 {
        let actor_id = self.next_actor_id;
        self.next_actor_id += 1;
        actor_id
    }

    fn wait_for_completed_actor(&self) -> u32 {
        let (mutex, cvar) = &*self.completed_actors;
        let guard = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        let mut completed = cvar
            .wait_while(guard, |completed| completed.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        // Non-empty once the wait is over
        completed.remove(0)
    }
}
