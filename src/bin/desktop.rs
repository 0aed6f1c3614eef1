// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use femhealth::desktop::{self, AiState};
use femhealth::storage::FileStore;
use femhealth::{logging, AppState, Config};

fn main() {
    logging::init(false);

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("femhealth: {e}");
            std::process::exit(1);
        }
    };
    let store = match config
        .data_dir()
        .map_err(|e| e.to_string())
        .and_then(|dir| FileStore::open(dir).map_err(|e| e.to_string()))
    {
        Ok(store) => store,
        Err(e) => {
            eprintln!("femhealth: {e}");
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .manage(AppState::new(Box::new(store), config.cycle))
        .manage(AiState::from_config(&config))
        .invoke_handler(tauri::generate_handler![
            desktop::is_setup,
            desktop::setup,
            desktop::unlock,
            desktop::lock,
            desktop::get_calendar,
            desktop::get_pregnancy_status,
            desktop::set_due_date,
            desktop::get_journal,
            desktop::add_appointment,
            desktop::update_appointment,
            desktop::remove_appointment,
            desktop::add_symptom,
            desktop::update_symptom,
            desktop::remove_symptom,
            desktop::add_measurement,
            desktop::update_measurement,
            desktop::remove_measurement,
            desktop::add_mood,
            desktop::export_data,
            desktop::wipe_all_data,
            desktop::get_goals,
            desktop::add_goal,
            desktop::increment_goal,
            desktop::decrement_goal,
            desktop::remove_goal,
            desktop::get_tips,
            desktop::get_bookmarks,
            desktop::toggle_bookmark,
            desktop::get_notification_settings,
            desktop::save_notification_settings,
            desktop::get_notifications,
            desktop::sign_in,
            desktop::sign_out,
            desktop::is_authenticated,
            desktop::analyze_symptoms,
            desktop::analyze_mood,
            desktop::cycle_insights,
            desktop::weekly_info,
        ])
        .run(tauri::generate_context!())
        .expect("error while running femhealth");
}
