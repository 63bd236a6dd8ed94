#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod actor;
mod appdb;
mod command;
mod config;
mod console;
mod db;
mod notifier;
mod record;
mod reminder;
mod signal;
mod store;
mod supervisor;
mod tracker;

use anyhow::{Context, Result};
use appdb::AppDb;
use chrono::Local;
use config::Config;
use log::{error, info};
use std::time::Duration;
use store::{MemoryStore, RecordStore};
use supervisor::supervisor::Supervisor;

use crate::{
    actor::{
        console_input_actor::ConsoleInputActor,
        notifier_actor::{NotifierActor, NotifierMessage},
        tick_actor::TickActor,
        tracker_actor::{TrackerActor, TrackerMessage},
    },
    console::LineInput,
    notifier::ConsoleNotifier,
    reminder::ReminderScheduler,
    tracker::HydrationTracker,
};

fn main() {
    env_logger::init();
    info!("Initialising");
    let (config, tracker) = initialise().expect("Initialisation error");
    info!("Running actors");
    run_actors(&config, tracker).expect("Abnormal shutdown");
}

fn initialise() -> Result<(Config, HydrationTracker)> {
    let config = Config::from_env().context("Invalid configuration")?;
    info!("Loaded config {:?}", config);

    let store = open_store(&config.db_path);
    let tracker = HydrationTracker::load(
        store,
        Local::now().date_naive(),
        config.default_daily_goal,
    );
    info!("Loaded state {:?}", tracker.record());

    Ok((config, tracker))
}

fn open_store(db_path: &str) -> Box<dyn RecordStore + Send> {
    let db = AppDb::new(db_path.to_owned());
    match db.run_migrations() {
        Ok(()) => Box::new(db),
        Err(err) => {
            error!(
                "Database {} unavailable, keeping state in memory for this session: {:?}",
                db_path, err
            );
            Box::new(MemoryStore::default())
        }
    }
}

fn run_actors(config: &Config, tracker: HydrationTracker) -> Result<()> {
    let mut supervisor = Supervisor::new();

    let tx_notifier = supervisor
        .start(
            NotifierActor::new(ConsoleNotifier::new(Local::now().naive_local())),
            "NotifierActor",
        )
        .context("Failed to start Notifier Actor")?;

    supervisor
        .start_message_source(
            TickActor::new(
                Duration::from_millis(100),
                tx_notifier.clone(),
                NotifierMessage::Tick,
            ),
            "Notifier Tick Actor",
        )
        .context("Failed to start Notifier Tick Actor")?;

    let reminders = ReminderScheduler::new(Local::now().naive_local(), config.reminders_enabled);
    let tx_tracker = supervisor
        .start(
            TrackerActor::new(tx_notifier, tracker, reminders),
            "TrackerActor",
        )
        .context("Failed to start Tracker Actor")?;

    supervisor
        .start_message_source(
            TickActor::new(Duration::from_secs(1), tx_tracker.clone(), |_| {
                TrackerMessage::Tick(Local::now().naive_local())
            }),
            "Tracker Tick Actor",
        )
        .context("Failed to start Tracker Tick Actor")?;

    supervisor
        .start_message_source(
            TickActor::new(Duration::from_secs(60), tx_tracker.clone(), |_| {
                TrackerMessage::ReminderCheck(Local::now().naive_local())
            }),
            "Reminder Check Actor",
        )
        .context("Failed to start Reminder Check Actor")?;

    println!("{}", command::USAGE);
    supervisor
        .start_message_source(
            ConsoleInputActor::new(Box::new(LineInput::stdin()), tx_tracker),
            "Console Input Actor",
        )
        .context("Failed to start Console Input Actor")?;

    supervisor.supervise()
}
