use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub(crate) const MIN_DAILY_GOAL: u8 = 1;
pub(crate) const MAX_DAILY_GOAL: u8 = 20;
pub(crate) const DEFAULT_DAILY_GOAL: u8 = 8;

// Number of archived days kept for the weekly average
const WEEKLY_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DayTotal {
    pub(crate) date: NaiveDate,
    pub(crate) consumption: u32,
}

/// The persisted state of the tracker.  Everything else is derived from this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HydrationRecord {
    pub(crate) daily_goal: u8,
    pub(crate) today_consumption: u32,
    pub(crate) last_drink_time: Option<NaiveDateTime>,
    pub(crate) drink_history: Vec<NaiveDateTime>,
    #[serde(default)]
    pub(crate) streak: u32,
    #[serde(default)]
    pub(crate) weekly_data: Vec<DayTotal>,
    pub(crate) last_day: NaiveDate,
}

impl HydrationRecord {
    pub(crate) fn new(today: NaiveDate, daily_goal: u8) -> Self {
        Self {
            daily_goal: daily_goal.clamp(MIN_DAILY_GOAL, MAX_DAILY_GOAL),
            today_consumption: 0,
            last_drink_time: None,
            drink_history: Vec::new(),
            streak: 0,
            weekly_data: Vec::new(),
            last_day: today,
        }
    }

    /// Archives the current day and resets the daily counters if `today` is
    /// later than the day this record was last current for.  Returns true if
    /// a rollover happened.
    ///
    /// An earlier `today` (a command stamped just before midnight but handled
    /// after the midnight tick, or the clock being set back) leaves the
    /// record alone: days only ever move forward.
    pub(crate) fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today < self.last_day {
            debug!("Not rolling back from {} to {}", self.last_day, today);
        }
        if today <= self.last_day {
            return false;
        }

        info!(
            "Rolling over from {} to {} ({} of {} glasses)",
            self.last_day, today, self.today_consumption, self.daily_goal
        );

        self.weekly_data.push(DayTotal {
            date: self.last_day,
            consumption: self.today_consumption,
        });
        self.trim_weekly_data();

        if self.goal_met() {
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        self.today_consumption = 0;
        self.drink_history.clear();
        self.last_drink_time = None;
        self.last_day = today;

        true
    }

    /// Brings a record read from storage back within its invariants.  Returns
    /// true if anything had to change.
    pub(crate) fn repair(&mut self) -> bool {
        let mut repaired = false;

        let clamped = self.daily_goal.clamp(MIN_DAILY_GOAL, MAX_DAILY_GOAL);
        if clamped != self.daily_goal {
            warn!("Stored daily goal {} clamped to {}", self.daily_goal, clamped);
            self.daily_goal = clamped;
            repaired = true;
        }

        let logged = u32::try_from(self.drink_history.len()).unwrap_or(u32::MAX);
        if logged != self.today_consumption {
            warn!(
                "Stored consumption {} disagrees with {} logged drinks",
                self.today_consumption, logged
            );
            self.today_consumption = logged;
            repaired = true;
        }

        let last = self.drink_history.last().copied();
        if last != self.last_drink_time {
            warn!("Stored last drink time {:?} reset to {:?}", self.last_drink_time, last);
            self.last_drink_time = last;
            repaired = true;
        }

        let stored_days = self.weekly_data.len();
        if self.trim_weekly_data() {
            warn!("Stored weekly data had {} days", stored_days);
            repaired = true;
        }

        repaired
    }

    // Drops the oldest days beyond a week, returning true if any were dropped
    fn trim_weekly_data(&mut self) -> bool {
        let Some(excess) = self.weekly_data.len().checked_sub(WEEKLY_DAYS) else {
            return false;
        };
        self.weekly_data = self.weekly_data.split_off(excess);
        excess > 0
    }

    pub(crate) fn push_drink(&mut self, now: NaiveDateTime) {
        self.today_consumption += 1;
        self.drink_history.push(now);
        self.last_drink_time = Some(now);
    }

    /// Removes the most recent drink, returning it.  None if nothing was
    /// logged today.
    pub(crate) fn pop_drink(&mut self) -> Option<NaiveDateTime> {
        let removed = self.drink_history.pop()?;
        self.today_consumption -= 1;
        self.last_drink_time = self.drink_history.last().copied();
        Some(removed)
    }

    pub(crate) fn goal_met(&self) -> bool {
        self.today_consumption >= u32::from(self.daily_goal)
    }

    /// Unclamped, can exceed 100 once the goal is passed.
    pub(crate) fn progress_percent(&self) -> u64 {
        rounded_ratio(
            100 * u64::from(self.today_consumption),
            u64::from(self.daily_goal),
        )
    }

    pub(crate) fn display_progress_percent(&self) -> u64 {
        self.progress_percent().min(100)
    }

    pub(crate) fn weekly_average(&self) -> u64 {
        if self.weekly_data.is_empty() {
            return 0;
        }
        let total: u64 = self
            .weekly_data
            .iter()
            .map(|day| u64::from(day.consumption))
            .sum();
        rounded_ratio(total, self.weekly_data.len() as u64)
    }
}

// Integer division rounding halves up
fn rounded_ratio(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{Days, NaiveDate, NaiveDateTime};

    use super::{DayTotal, HydrationRecord};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::from_str(s).unwrap()
    }

    fn record_with_drinks(today: &str, goal: u8, drinks: u32) -> HydrationRecord {
        let mut record = HydrationRecord::new(day(today), goal);
        let first = day(today).and_hms_opt(8, 0, 0).unwrap();
        for i in 0..drinks {
            record.push_drink(first + chrono::Duration::minutes(i64::from(i) * 30));
        }
        record
    }

    #[test]
    fn new_record_clamps_goal() {
        assert_eq!(HydrationRecord::new(day("2020-01-01"), 0).daily_goal, 1);
        assert_eq!(HydrationRecord::new(day("2020-01-01"), 99).daily_goal, 20);
    }

    #[test]
    fn same_day_does_not_roll_over() {
        let mut record = record_with_drinks("2020-01-01", 8, 3);
        let before = record.clone();

        assert!(!record.roll_over(day("2020-01-01")));
        assert_eq!(record, before);
    }

    #[test]
    fn earlier_day_does_not_roll_back() {
        let mut record = record_with_drinks("2020-01-01", 1, 1);
        record.roll_over(day("2020-01-02"));
        let before = record.clone();

        assert!(!record.roll_over(day("2020-01-01")));
        assert_eq!(record, before);
        assert_eq!(record.streak, 1);

        // Moving forward again archives only the day that was current
        assert!(record.roll_over(day("2020-01-03")));
        assert_eq!(
            record.weekly_data,
            vec![
                DayTotal {
                    date: day("2020-01-01"),
                    consumption: 1
                },
                DayTotal {
                    date: day("2020-01-02"),
                    consumption: 0
                }
            ]
        );
    }

    #[test]
    fn roll_over_after_missed_goal_resets_streak() {
        let mut record = record_with_drinks("2020-01-01", 8, 5);
        record.streak = 4;

        assert!(record.roll_over(day("2020-01-02")));

        assert_eq!(record.streak, 0);
        assert_eq!(
            record.weekly_data,
            vec![DayTotal {
                date: day("2020-01-01"),
                consumption: 5
            }]
        );
        assert_eq!(record.today_consumption, 0);
        assert!(record.drink_history.is_empty());
        assert_eq!(record.last_drink_time, None);
        assert_eq!(record.last_day, day("2020-01-02"));
    }

    #[test]
    fn roll_over_after_met_goal_extends_streak() {
        let mut record = record_with_drinks("2020-01-01", 8, 9);
        record.streak = 2;

        record.roll_over(day("2020-01-02"));

        assert_eq!(record.streak, 3);
        assert_eq!(record.weekly_data[0].consumption, 9);
    }

    #[test]
    fn weekly_data_keeps_the_newest_seven_days() {
        let start = day("2020-01-01");
        let mut record = HydrationRecord::new(start, 2);
        for n in 0..8 {
            let today = start.checked_add_days(Days::new(n)).unwrap();
            record.push_drink(today.and_hms_opt(9, 0, 0).unwrap());
            record.push_drink(today.and_hms_opt(10, 0, 0).unwrap());
            assert!(record.roll_over(today.checked_add_days(Days::new(1)).unwrap()));
        }

        assert_eq!(record.streak, 8);
        assert_eq!(record.weekly_data.len(), 7);
        assert_eq!(record.weekly_data[0].date, day("2020-01-02"));
        assert_eq!(record.weekly_data[6].date, day("2020-01-08"));
    }

    #[test]
    fn pop_drink_restores_previous_drink_time() {
        let mut record = record_with_drinks("2020-01-01", 8, 2);
        let before = record.clone();

        record.push_drink(at("2020-01-01T12:00:00"));
        assert_eq!(record.pop_drink(), Some(at("2020-01-01T12:00:00")));

        assert_eq!(record, before);
    }

    #[test]
    fn pop_drink_on_empty_day() {
        let mut record = HydrationRecord::new(day("2020-01-01"), 8);

        assert_eq!(record.pop_drink(), None);
        assert_eq!(record.today_consumption, 0);
    }

    #[test]
    fn progress_rounds_and_can_exceed_goal() {
        assert_eq!(record_with_drinks("2020-01-01", 3, 1).progress_percent(), 33);
        assert_eq!(record_with_drinks("2020-01-01", 3, 2).progress_percent(), 67);
        assert_eq!(record_with_drinks("2020-01-01", 8, 8).progress_percent(), 100);

        let over = record_with_drinks("2020-01-01", 8, 10);
        assert_eq!(over.progress_percent(), 125);
        assert_eq!(over.display_progress_percent(), 100);
    }

    #[test]
    fn weekly_average() {
        let mut record = HydrationRecord::new(day("2020-01-03"), 8);
        assert_eq!(record.weekly_average(), 0);

        record.weekly_data = vec![
            DayTotal {
                date: day("2020-01-01"),
                consumption: 6,
            },
            DayTotal {
                date: day("2020-01-02"),
                consumption: 7,
            },
        ];
        // 6.5 rounds up
        assert_eq!(record.weekly_average(), 7);
    }

    #[test]
    fn repair_fixes_inconsistent_record() {
        let mut record = record_with_drinks("2020-01-01", 8, 2);
        record.daily_goal = 30;
        record.today_consumption = 7;
        record.last_drink_time = None;

        assert!(record.repair());

        assert_eq!(record.daily_goal, 20);
        assert_eq!(record.today_consumption, 2);
        assert_eq!(record.last_drink_time, record.drink_history.last().copied());
        assert!(!record.repair());
    }

    #[test]
    fn deserialize_record_without_history_fields() {
        let record: HydrationRecord = serde_json::from_str(
            r#"{
                "dailyGoal": 6,
                "todayConsumption": 1,
                "lastDrinkTime": "2020-01-01T09:30:00",
                "drinkHistory": ["2020-01-01T09:30:00"],
                "lastDay": "2020-01-01"
            }"#,
        )
        .unwrap();

        assert_eq!(record.daily_goal, 6);
        assert_eq!(record.streak, 0);
        assert!(record.weekly_data.is_empty());
        assert_eq!(record.last_drink_time, Some(at("2020-01-01T09:30:00")));
    }

    #[test]
    fn serialized_field_names() {
        let json = serde_json::to_value(record_with_drinks("2020-01-01", 8, 1)).unwrap();

        for key in [
            "dailyGoal",
            "todayConsumption",
            "lastDrinkTime",
            "drinkHistory",
            "streak",
            "weeklyData",
            "lastDay",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["lastDay"], "2020-01-01");
    }
}
