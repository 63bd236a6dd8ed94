use std::time::{Duration, Instant};

use anyhow::Result;
use log::debug;

use crate::{actor::actor::Actor, notifier::Notifier, signal::Signal};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NotifierMessage {
    Tick(Instant),
    Signal(Signal),
    // Held back until `delay` has passed, released by a later tick
    Delayed { signal: Signal, delay: Duration },
}

pub(crate) struct NotifierActor<TNotifier>
where
    TNotifier: Notifier,
{
    notifier: TNotifier,
    pending: Vec<(Instant, Signal)>,
}

impl<TNotifier> NotifierActor<TNotifier>
where
    TNotifier: Notifier,
{
    pub(crate) fn new(notifier: TNotifier) -> Self {
        Self {
            notifier,
            pending: Vec::new(),
        }
    }

    fn release_due(&mut self, instant: Instant) {
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|(due_at, _)| *due_at <= instant);
        self.pending = waiting;

        for (_, signal) in due {
            debug!("Releasing delayed {:?}", signal);
            self.notifier.notify(&signal);
        }
    }
}

impl<TNotifier> Actor<NotifierMessage> for NotifierActor<TNotifier>
where
    TNotifier: Notifier,
{
    fn startup(&mut self) -> Result<()> {
        Ok(())
    }

    fn handle_message(&mut self, msg: NotifierMessage) -> Result<bool> {
        match msg {
            NotifierMessage::Tick(instant) => self.release_due(instant),
            NotifierMessage::Signal(signal) => self.notifier.notify(&signal),
            NotifierMessage::Delayed { signal, delay } => {
                self.pending.push((Instant::now() + delay, signal));
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::{actor::actor::Actor, notifier::Notifier, signal::Signal};

    use super::{NotifierActor, NotifierMessage};

    #[derive(Default)]
    struct RecordingNotifier {
        signals: Vec<Signal>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, signal: &Signal) {
            self.signals.push(signal.clone());
        }
    }

    #[test]
    fn forwards_signals_immediately() {
        let mut actor = NotifierActor::new(RecordingNotifier::default());

        actor
            .handle_message(NotifierMessage::Signal(Signal::ReminderDue))
            .unwrap();

        assert_eq!(actor.notifier.signals, vec![Signal::ReminderDue]);
    }

    #[test]
    fn delayed_signal_waits_for_a_later_tick() {
        let mut actor = NotifierActor::new(RecordingNotifier::default());

        actor
            .handle_message(NotifierMessage::Delayed {
                signal: Signal::GoalAchieved,
                delay: Duration::from_secs(1),
            })
            .unwrap();
        actor
            .handle_message(NotifierMessage::Signal(Signal::DrinkLogged(8)))
            .unwrap();
        actor
            .handle_message(NotifierMessage::Tick(Instant::now()))
            .unwrap();

        assert_eq!(actor.notifier.signals, vec![Signal::DrinkLogged(8)]);

        actor
            .handle_message(NotifierMessage::Tick(
                Instant::now() + Duration::from_secs(2),
            ))
            .unwrap();
        actor
            .handle_message(NotifierMessage::Tick(
                Instant::now() + Duration::from_secs(3),
            ))
            .unwrap();

        assert_eq!(
            actor.notifier.signals,
            vec![Signal::DrinkLogged(8), Signal::GoalAchieved]
        );
    }
}
