use std::{sync::mpsc::Sender, time::Duration};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{info, warn};

use crate::{
    command::Command, reminder::ReminderScheduler, signal::Signal, tracker::HydrationTracker,
};

use super::{actor::Actor, notifier_actor::NotifierMessage};

const GOAL_ACHIEVED_DELAY: Duration = Duration::from_secs(1);

pub(crate) enum TrackerMessage {
    Command(Command, NaiveDateTime),
    // Day boundary check and countdown refresh
    Tick(NaiveDateTime),
    ReminderCheck(NaiveDateTime),
}

/// Sole owner of the hydration record and the reminder state.  Everything
/// that mutates either goes through this actor's queue.
pub(crate) struct TrackerActor {
    tx_notifier: Sender<NotifierMessage>,
    tracker: HydrationTracker,
    reminders: ReminderScheduler,
}

impl TrackerActor {
    pub(crate) fn new(
        tx_notifier: Sender<NotifierMessage>,
        tracker: HydrationTracker,
        reminders: ReminderScheduler,
    ) -> Self {
        Self {
            tx_notifier,
            tracker,
            reminders,
        }
    }

    fn handle_command(&mut self, command: Command, now: NaiveDateTime) -> Result<bool> {
        info!("Handling {:?}", command);
        self.roll_over(now)?;

        match command {
            Command::SetDailyGoal(goal) => match self.tracker.set_daily_goal(goal) {
                Ok(()) => {
                    self.send(Signal::GoalUpdated(self.tracker.record().daily_goal))?;
                    self.send_state()?;
                }
                Err(err) => warn!("Ignoring goal: {}", err),
            },
            Command::LogDrink => self.log_drink(now)?,
            Command::UndoLastDrink => match self.tracker.undo_last_drink() {
                Ok(()) => self.send_state()?,
                Err(err) => info!("Ignoring undo: {}", err),
            },
            Command::ToggleReminders => {
                self.reminders.toggle(now);
                self.send_next_reminder()?;
            }
            Command::SnoozeReminder => {
                if self.reminders.snooze(now) {
                    self.send(Signal::ReminderDismissed)?;
                } else {
                    info!("Ignoring snooze, reminders are disabled");
                }
                self.send_next_reminder()?;
            }
            Command::AcknowledgeReminder => {
                self.send(Signal::ReminderDismissed)?;
                self.log_drink(now)?;
            }
            Command::Status => {
                self.send(Signal::ClockTick(now))?;
                self.send(Signal::ReminderCountdownTick(self.reminders.countdown(now)))?;
                self.send_state()?;
                self.send_next_reminder()?;
            }
            Command::Quit => return Ok(true),
        }

        Ok(false)
    }

    fn log_drink(&mut self, now: NaiveDateTime) -> Result<()> {
        let outcome = self.tracker.log_drink(now);
        self.reminders.reset(now);

        self.send(Signal::DrinkLogged(outcome.consumption))?;
        self.send_state()?;
        self.send_next_reminder()?;

        if outcome.goal_reached {
            self.tx_notifier
                .send(NotifierMessage::Delayed {
                    signal: Signal::GoalAchieved,
                    delay: GOAL_ACHIEVED_DELAY,
                })
                .context("Failed to send GoalAchieved to tx_notifier")?;
        }

        Ok(())
    }

    fn handle_tick(&mut self, now: NaiveDateTime) -> Result<()> {
        self.roll_over(now)?;
        self.send(Signal::ClockTick(now))?;
        self.send(Signal::ReminderCountdownTick(self.reminders.countdown(now)))
    }

    fn handle_reminder_check(&mut self, now: NaiveDateTime) -> Result<()> {
        if self.reminders.check(now) {
            info!("Reminder due at {}", now);
            self.send(Signal::ReminderDue)?;
            self.send_next_reminder()?;
        }

        Ok(())
    }

    fn roll_over(&mut self, now: NaiveDateTime) -> Result<()> {
        if self.tracker.roll_over(now.date()) {
            self.send_state()?;
        }

        Ok(())
    }

    fn send_state(&self) -> Result<()> {
        self.send(Signal::StateChanged(self.tracker.record().clone()))
    }

    fn send_next_reminder(&self) -> Result<()> {
        self.send(Signal::NextReminder(self.reminders.next_reminder_time()))
    }

    fn send(&self, signal: Signal) -> Result<()> {
        self.tx_notifier
            .send(NotifierMessage::Signal(signal))
            .context("Failed to send Signal to tx_notifier")?;

        Ok(())
    }
}

impl Actor<TrackerMessage> for TrackerActor {
    fn startup(&mut self) -> Result<()> {
        self.send_state()?;
        self.send_next_reminder()
    }

    fn handle_message(&mut self, msg: TrackerMessage) -> Result<bool> {
        match msg {
            TrackerMessage::Command(command, now) => self.handle_command(command, now),
            TrackerMessage::Tick(now) => {
                self.handle_tick(now)?;
                Ok(false)
            }
            TrackerMessage::ReminderCheck(now) => {
                self.handle_reminder_check(now)?;
                Ok(false)
            }
        }
    }
}
