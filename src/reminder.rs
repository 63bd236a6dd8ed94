use chrono::{Duration, NaiveDateTime};
use log::info;

const REMINDER_INTERVAL_MINUTES: i64 = 60;
const SNOOZE_MINUTES: i64 = 10;

/// What's left until the next reminder, as shown on the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Countdown {
    Disabled,
    Remaining { minutes: i64, seconds: i64 },
    Overdue,
}

/// Fires a reminder once an hour has passed since the last one (or the last
/// drink, toggle or snooze).
pub(crate) struct ReminderScheduler {
    enabled: bool,
    last_reminder_time: NaiveDateTime,
}

impl ReminderScheduler {
    pub(crate) fn new(now: NaiveDateTime, enabled: bool) -> Self {
        Self {
            enabled,
            last_reminder_time: now,
        }
    }

    /// Flips between enabled and disabled, returning the new state.
    pub(crate) fn toggle(&mut self, now: NaiveDateTime) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.last_reminder_time = now;
        }
        info!("Reminders enabled: {}", self.enabled);
        self.enabled
    }

    /// Restarts the full interval, e.g. after a drink.
    pub(crate) fn reset(&mut self, now: NaiveDateTime) {
        self.last_reminder_time = now;
    }

    /// Pushes the next reminder to `SNOOZE_MINUTES` from now.  Does nothing
    /// while disabled, returning false.
    pub(crate) fn snooze(&mut self, now: NaiveDateTime) -> bool {
        if !self.enabled {
            return false;
        }
        self.last_reminder_time =
            now - Duration::minutes(REMINDER_INTERVAL_MINUTES - SNOOZE_MINUTES);
        true
    }

    /// Returns true if a reminder is due at `now`, restarting the interval
    /// when it is.
    pub(crate) fn check(&mut self, now: NaiveDateTime) -> bool {
        if !self.enabled {
            return false;
        }
        if now - self.last_reminder_time < Duration::minutes(REMINDER_INTERVAL_MINUTES) {
            return false;
        }
        self.last_reminder_time = now;
        true
    }

    pub(crate) fn next_reminder_time(&self) -> Option<NaiveDateTime> {
        self.enabled
            .then(|| self.last_reminder_time + Duration::minutes(REMINDER_INTERVAL_MINUTES))
    }

    pub(crate) fn countdown(&self, now: NaiveDateTime) -> Countdown {
        let Some(next) = self.next_reminder_time() else {
            return Countdown::Disabled;
        };

        let left_ms = (next - now).num_milliseconds();
        if left_ms > 0 {
            Countdown::Remaining {
                minutes: left_ms / 60_000,
                seconds: (left_ms % 60_000) / 1000,
            }
        } else {
            Countdown::Overdue
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{Duration, NaiveDateTime};

    use super::{Countdown, ReminderScheduler};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::from_str(s).unwrap()
    }

    #[test]
    fn not_due_within_the_hour() {
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), true);

        assert!(!scheduler.check(at("2020-01-01T09:59:59")));
        assert_eq!(
            scheduler.next_reminder_time(),
            Some(at("2020-01-01T10:00:00"))
        );
    }

    #[test]
    fn due_at_exactly_one_hour() {
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), true);

        assert!(scheduler.check(at("2020-01-01T10:00:00")));
        assert_eq!(
            scheduler.next_reminder_time(),
            Some(at("2020-01-01T11:00:00"))
        );
    }

    #[test]
    fn overdue_reminder_resets_to_check_time() {
        let now = at("2020-01-01T12:00:00");
        let mut scheduler = ReminderScheduler::new(now - Duration::minutes(61), true);

        assert!(scheduler.check(now));
        assert_eq!(scheduler.next_reminder_time(), Some(at("2020-01-01T13:00:00")));
        // Only fires once per interval
        assert!(!scheduler.check(now + Duration::minutes(1)));
    }

    #[test]
    fn disabled_scheduler_never_fires() {
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), false);

        assert!(!scheduler.check(at("2020-01-01T12:00:00")));
        assert_eq!(scheduler.next_reminder_time(), None);
        assert_eq!(
            scheduler.countdown(at("2020-01-01T12:00:00")),
            Countdown::Disabled
        );
    }

    #[test]
    fn enabling_restarts_the_interval() {
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), true);

        assert!(!scheduler.toggle(at("2020-01-01T09:30:00")));
        assert!(scheduler.toggle(at("2020-01-01T11:00:00")));

        assert!(!scheduler.check(at("2020-01-01T11:30:00")));
        assert_eq!(
            scheduler.next_reminder_time(),
            Some(at("2020-01-01T12:00:00"))
        );
    }

    #[test]
    fn snooze_is_due_ten_minutes_later() {
        let now = at("2020-01-01T10:00:05");
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), true);

        assert!(scheduler.snooze(now));

        assert_eq!(scheduler.next_reminder_time(), Some(at("2020-01-01T10:10:05")));
        assert_eq!(
            scheduler.countdown(now),
            Countdown::Remaining {
                minutes: 10,
                seconds: 0
            }
        );
        assert!(!scheduler.check(now + Duration::minutes(9)));
        assert!(scheduler.check(now + Duration::minutes(10)));
    }

    #[test]
    fn snooze_while_disabled_does_nothing() {
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), false);

        assert!(!scheduler.snooze(at("2020-01-01T10:00:00")));
        assert_eq!(scheduler.next_reminder_time(), None);
    }

    #[test]
    fn countdown() {
        let mut scheduler = ReminderScheduler::new(at("2020-01-01T09:00:00"), true);

        assert_eq!(
            scheduler.countdown(at("2020-01-01T09:15:30.500")),
            Countdown::Remaining {
                minutes: 44,
                seconds: 29
            }
        );
        assert_eq!(
            scheduler.countdown(at("2020-01-01T10:00:00")),
            Countdown::Overdue
        );

        scheduler.reset(at("2020-01-01T10:00:00"));
        assert_eq!(
            scheduler.countdown(at("2020-01-01T10:00:00")),
            Countdown::Remaining {
                minutes: 60,
                seconds: 0
            }
        );
    }
}
