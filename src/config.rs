use std::env;

use anyhow::{bail, Context, Result};

use crate::record::{DEFAULT_DAILY_GOAL, MAX_DAILY_GOAL, MIN_DAILY_GOAL};

const DEFAULT_DB_PATH: &str = "./db";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: String,
    pub(crate) reminders_enabled: bool,
    // Only used when there's no saved record yet
    pub(crate) default_daily_goal: u8,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("HYDRO_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_owned());

        let reminders_enabled = match lookup("HYDRO_REMINDERS").as_deref().map(str::trim) {
            None | Some("on") => true,
            Some("off") => false,
            Some(other) => bail!("HYDRO_REMINDERS must be 'on' or 'off', got '{other}'"),
        };

        let default_daily_goal = match lookup("HYDRO_DAILY_GOAL") {
            None => DEFAULT_DAILY_GOAL,
            Some(goal) => goal
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|goal| (MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(goal))
                .with_context(|| {
                    format!(
                        "HYDRO_DAILY_GOAL must be between {MIN_DAILY_GOAL} and {MAX_DAILY_GOAL}, got '{goal}'"
                    )
                })?,
        };

        Ok(Self {
            db_path,
            reminders_enabled,
            default_daily_goal,
        })
    }
}
