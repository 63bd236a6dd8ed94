use std::str::FromStr;

use thiserror::Error;

pub(crate) const USAGE: &str = "\
Commands:
  d, drink       log a glass of water
  u, undo        undo the last glass
  g, goal N      set the daily goal (1-20 glasses)
  t, toggle      turn reminders on or off
  s, snooze      snooze the reminder for 10 minutes
  a, ack         log a glass and dismiss the reminder
  v, status      show today's progress
  q, quit        exit";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Command {
    SetDailyGoal(i64),
    LogDrink,
    UndoLastDrink,
    ToggleReminders,
    SnoozeReminder,
    AcknowledgeReminder,
    Status,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ParseCommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'goal' needs a number, got '{0}'")]
    BadGoal(String),
    #[error("empty command")]
    Empty,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ParseCommandError::Empty)?;
        let command = match name.to_lowercase().as_str() {
            "d" | "drink" => Command::LogDrink,
            "u" | "undo" => Command::UndoLastDrink,
            "g" | "goal" => {
                let arg = words.next().unwrap_or_default();
                let goal = arg
                    .parse()
                    .map_err(|_| ParseCommandError::BadGoal(arg.to_owned()))?;
                Command::SetDailyGoal(goal)
            }
            "t" | "toggle" => Command::ToggleReminders,
            "s" | "snooze" => Command::SnoozeReminder,
            "a" | "ack" => Command::AcknowledgeReminder,
            "v" | "status" => Command::Status,
            "q" | "quit" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(name.to_owned())),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, ParseCommandError};

    #[test]
    fn short_and_long_names() {
        assert_eq!("d".parse(), Ok(Command::LogDrink));
        assert_eq!("drink".parse(), Ok(Command::LogDrink));
        assert_eq!("  Undo \n".parse(), Ok(Command::UndoLastDrink));
        assert_eq!("t".parse(), Ok(Command::ToggleReminders));
        assert_eq!("snooze".parse(), Ok(Command::SnoozeReminder));
        assert_eq!("a".parse(), Ok(Command::AcknowledgeReminder));
        assert_eq!("v".parse(), Ok(Command::Status));
        assert_eq!("quit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn goal_takes_a_number() {
        assert_eq!("g 10".parse(), Ok(Command::SetDailyGoal(10)));
        // Range checking happens in the tracker
        assert_eq!("goal -3".parse(), Ok(Command::SetDailyGoal(-3)));
        assert_eq!(
            "goal lots".parse::<Command>(),
            Err(ParseCommandError::BadGoal("lots".to_owned()))
        );
        assert_eq!(
            "g".parse::<Command>(),
            Err(ParseCommandError::BadGoal(String::new()))
        );
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(
            "dance".parse::<Command>(),
            Err(ParseCommandError::Unknown("dance".to_owned()))
        );
        assert_eq!("   ".parse::<Command>(), Err(ParseCommandError::Empty));
    }
}
