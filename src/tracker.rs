use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::{
    record::{HydrationRecord, MAX_DAILY_GOAL, MIN_DAILY_GOAL},
    store::RecordStore,
};

pub(crate) const RECORD_KEY: &str = "waterTrackerData";

#[derive(Debug, Error)]
pub(crate) enum TrackerError {
    #[error("daily goal {0} is outside 1..=20")]
    InvalidGoal(i64),
    #[error("no drinks logged today to undo")]
    EmptyHistoryUndo,
    #[error("record store unavailable: {0}")]
    PersistenceUnavailable(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DrinkOutcome {
    pub(crate) consumption: u32,
    pub(crate) goal_reached: bool,
}

/// Owns the hydration record and writes it through to the store after every
/// mutation.
pub(crate) struct HydrationTracker {
    record: HydrationRecord,
    store: Box<dyn RecordStore + Send>,
}

impl HydrationTracker {
    /// Loads the record, falling back to a fresh one if the store can't
    /// provide it, and rolls it over to `today`.
    pub(crate) fn load(
        store: Box<dyn RecordStore + Send>,
        today: NaiveDate,
        default_goal: u8,
    ) -> Self {
        let (record, needs_save) = match read_record(&*store) {
            Ok(Some(mut record)) => {
                let repaired = record.repair();
                (record, repaired)
            }
            Ok(None) => {
                info!("No saved record, starting a new one");
                (HydrationRecord::new(today, default_goal), true)
            }
            Err(err) => {
                warn!("{err}, starting a new record for this session");
                (HydrationRecord::new(today, default_goal), false)
            }
        };

        let mut tracker = Self { record, store };
        let rolled_over = tracker.roll_over(today);
        if needs_save && !rolled_over {
            tracker.persist();
        }
        tracker
    }

    pub(crate) fn record(&self) -> &HydrationRecord {
        &self.record
    }

    pub(crate) fn roll_over(&mut self, today: NaiveDate) -> bool {
        let rolled_over = self.record.roll_over(today);
        if rolled_over {
            self.persist();
        }
        rolled_over
    }

    pub(crate) fn set_daily_goal(&mut self, goal: i64) -> Result<(), TrackerError> {
        let goal = u8::try_from(goal)
            .ok()
            .filter(|g| (MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(g))
            .ok_or(TrackerError::InvalidGoal(goal))?;

        self.record.daily_goal = goal;
        self.persist();
        Ok(())
    }

    pub(crate) fn log_drink(&mut self, now: NaiveDateTime) -> DrinkOutcome {
        self.record.push_drink(now);
        self.persist();
        DrinkOutcome {
            consumption: self.record.today_consumption,
            goal_reached: self.record.goal_met(),
        }
    }

    pub(crate) fn undo_last_drink(&mut self) -> Result<(), TrackerError> {
        let removed = self
            .record
            .pop_drink()
            .ok_or(TrackerError::EmptyHistoryUndo)?;
        debug!("Removed drink logged at {}", removed);
        self.persist();
        Ok(())
    }

    // Writes are best effort, the in-memory record stays authoritative
    fn persist(&self) {
        if let Err(err) = write_record(&*self.store, &self.record) {
            error!("Failed to save record: {}", err);
        }
    }
}

fn read_record(store: &dyn RecordStore) -> Result<Option<HydrationRecord>, TrackerError> {
    let Some(json) = store
        .load(RECORD_KEY)
        .map_err(|err| TrackerError::PersistenceUnavailable(format!("{err:#}")))?
    else {
        return Ok(None);
    };

    serde_json::from_str(&json)
        .map(Some)
        .map_err(|err| TrackerError::PersistenceUnavailable(format!("corrupt record: {err}")))
}

fn write_record(store: &dyn RecordStore, record: &HydrationRecord) -> Result<(), TrackerError> {
    let json = serde_json::to_string(record)
        .map_err(|err| TrackerError::PersistenceUnavailable(err.to_string()))?;
    store
        .save(RECORD_KEY, &json)
        .map_err(|err| TrackerError::PersistenceUnavailable(format!("{err:#}")))
}
