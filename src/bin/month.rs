use std::path::Path;

use chrono::{Datelike, Local};

use month_planner::config::{self, EXPORT_FILE_NAME};
use month_planner::source::{DemoCalendar, JsonFile};
use month_planner::storage::FileStorage;
use month_planner::utils;
use month_planner::Planner;

const STORAGE_FOLDER: &str = ".";
const DEMO_EVENTS: usize = 100;

/// Usage: `month [--export] [CALENDAR_FILE]`
#[tokio::main]
async fn main() {
    env_logger::init();

    let now = Local::now().naive_local();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let export = args.iter().any(|arg| arg == "--export");
    let import = args.iter().find(|arg| arg.starts_with("--") == false);

    let storage = FileStorage::in_folder(Path::new(STORAGE_FOLDER));
    let demo = DemoCalendar::new(DEMO_EVENTS, now);
    let mut planner = match Planner::start(storage, &demo).await {
        Ok(planner) => planner,
        Err(err) => {
            log::error!("Unable to start: {}", err);
            std::process::exit(1);
        },
    };

    if let Some(path) = import {
        if let Err(err) = planner.import_from(&JsonFile::new(Path::new(path), now)).await {
            log::error!("Unable to import {}: {}", path, err);
        }
    }

    match planner.month_view(now.year(), now.month(), now) {
        Some(view) => utils::print_month(&view),
        None => log::error!("Unable to build the grid of {}-{:02}", now.year(), now.month()),
    }
    utils::print_day(&planner.day_view(now.date()));

    println!("---- Today ----");
    for event in planner.banner(now) {
        utils::print_event(event);
    }

    if export {
        let file_name = config::read(&EXPORT_FILE_NAME);
        match planner.export() {
            Err(err) => log::error!("Unable to export: {}", err),
            Ok(content) => match std::fs::write(&file_name, content) {
                Err(err) => log::error!("Unable to write {}: {}", file_name, err),
                Ok(()) => log::info!("Calendar exported to {}", file_name),
            },
        }
    }
}
