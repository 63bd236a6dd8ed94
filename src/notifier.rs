use chrono::NaiveDateTime;
use log::{info, trace};

use crate::{record::HydrationRecord, reminder::Countdown, signal::Signal};

pub(crate) trait Notifier {
    fn notify(&mut self, signal: &Signal);
}

/// Prints signals to stdout.  The clock and countdown only change what the
/// next status block shows.
pub(crate) struct ConsoleNotifier {
    clock: NaiveDateTime,
    countdown: Countdown,
}

impl ConsoleNotifier {
    pub(crate) fn new(now: NaiveDateTime) -> Self {
        Self {
            clock: now,
            countdown: Countdown::Disabled,
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, signal: &Signal) {
        match signal {
            Signal::StateChanged(record) => {
                println!("{}", render_status(record, self.clock));
                println!("Next reminder {}", describe_countdown(self.countdown));
            }
            Signal::DrinkLogged(consumption) => println!("Great job! That's glass {consumption}"),
            Signal::GoalUpdated(goal) => println!("Goal updated! {goal} glasses a day"),
            Signal::GoalAchieved => println!("Daily goal achieved! Great job!"),
            Signal::ReminderDue => {
                info!("Showing reminder");
                println!("*** Time to hydrate! It's been an hour, time for some water. ***");
                println!("    (a) drank one  (s) snooze 10 minutes");
            }
            Signal::ReminderDismissed => println!("Reminder dismissed"),
            Signal::NextReminder(Some(at)) => {
                println!("Next reminder at {}", at.format("%H:%M"));
            }
            Signal::NextReminder(None) => println!("Reminders disabled"),
            Signal::ClockTick(now) => self.clock = *now,
            Signal::ReminderCountdownTick(countdown) => {
                trace!("Countdown {:?}", countdown);
                self.countdown = *countdown;
            }
        }
    }
}

pub(crate) fn render_status(record: &HydrationRecord, now: NaiveDateTime) -> String {
    let glasses: String = (1..=u32::from(record.daily_goal))
        .map(|glass| {
            if glass <= record.today_consumption {
                "[#]"
            } else {
                "[ ]"
            }
        })
        .collect();

    let last_drink = record.last_drink_time.map_or_else(
        || "--:--".to_owned(),
        |at| at.format("%H:%M").to_string(),
    );

    format!(
        "{}\n\
         Today: {}/{} glasses ({}%)\n\
         {glasses}\n\
         Last drink: {last_drink} | Streak: {} days | Weekly average: {}",
        now.format("%A %-d %B %Y %H:%M:%S"),
        record.today_consumption,
        record.daily_goal,
        record.display_progress_percent(),
        record.streak,
        record.weekly_average()
    )
}

pub(crate) fn describe_countdown(countdown: Countdown) -> String {
    match countdown {
        Countdown::Disabled => "Disabled".to_owned(),
        Countdown::Remaining { minutes, seconds } => format!("in {minutes}m {seconds}s"),
        Countdown::Overdue => "Due now!".to_owned(),
    }
}
