use chrono::NaiveDateTime;

use crate::{record::HydrationRecord, reminder::Countdown};

/// Everything the tracker tells the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Signal {
    StateChanged(HydrationRecord),
    // Consumption after the drink
    DrinkLogged(u32),
    GoalUpdated(u8),
    GoalAchieved,
    ReminderDue,
    ReminderDismissed,
    // None while reminders are disabled
    NextReminder(Option<NaiveDateTime>),
    ReminderCountdownTick(Countdown),
    // Wall-clock time, once a second
    ClockTick(NaiveDateTime),
}
