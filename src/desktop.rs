//! Tauri command surface for the desktop build.

use tauri::State;
use uuid::Uuid;

use crate::ai::{GeminiClient, TextGenerator};
use crate::commands::{parse_date, today, AppState};
use crate::config::Config;
use crate::goals::GoalBoard;
use crate::journal::{AppointmentDraft, MeasurementDraft, SymptomDraft};
use crate::models::*;
use crate::notifications::{Notification, NotificationSettings};
use crate::prompts;
use crate::tips::{self, Bookmarks, HealthTip, TipCategory};

/// Text-generation client, absent when no API key is configured.
pub struct AiState {
    pub client: Option<GeminiClient>,
}

impl AiState {
    pub fn from_config(config: &Config) -> Self {
        let client = match GeminiClient::new(&config.ai) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "AI features disabled");
                None
            }
        };
        Self { client }
    }

    async fn ask(&self, prompt: String) -> Result<String, String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| crate::ai::AiError::MissingApiKey.to_string())?;
        client.generate(&prompt).await.map_err(|e| e.to_string())
    }
}

#[tauri::command]
pub fn is_setup(state: State<'_, AppState>) -> Result<bool, String> {
    state.is_setup().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn setup(passphrase: String, state: State<'_, AppState>) -> Result<(), String> {
    state.setup(passphrase).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn unlock(passphrase: String, state: State<'_, AppState>) -> Result<bool, String> {
    state.unlock(passphrase).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn lock(state: State<'_, AppState>) -> Result<(), String> {
    state.lock();
    Ok(())
}

#[tauri::command]
pub fn get_calendar(
    start: String,
    cycle_length: Option<u32>,
    year: i32,
    month: u32,
    state: State<'_, AppState>,
) -> Result<MonthGrid, String> {
    let start = parse_date(&start).map_err(|e| e.to_string())?;
    state
        .cycle_calendar(start, cycle_length, year, month)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_pregnancy_status(due_date: String, state: State<'_, AppState>) -> Result<PregnancyStatus, String> {
    let due = parse_date(&due_date).map_err(|e| e.to_string())?;
    Ok(state.pregnancy_status(due, today()))
}

#[tauri::command]
pub fn set_due_date(due_date: String, state: State<'_, AppState>) -> Result<PregnancyStatus, String> {
    let due = parse_date(&due_date).map_err(|e| e.to_string())?;
    state.set_due_date(due, today()).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_journal(state: State<'_, AppState>) -> Result<PregnancyJournal, String> {
    state.journal().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_appointment(draft: AppointmentDraft, state: State<'_, AppState>) -> Result<Uuid, String> {
    state.add_appointment(draft).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_appointment(
    id: Uuid,
    draft: AppointmentDraft,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state.update_appointment(id, draft).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn remove_appointment(id: Uuid, state: State<'_, AppState>) -> Result<(), String> {
    state.remove_appointment(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_symptom(draft: SymptomDraft, state: State<'_, AppState>) -> Result<Uuid, String> {
    state.add_symptom(draft).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_symptom(id: Uuid, draft: SymptomDraft, state: State<'_, AppState>) -> Result<(), String> {
    state.update_symptom(id, draft).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn remove_symptom(id: Uuid, state: State<'_, AppState>) -> Result<(), String> {
    state.remove_symptom(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_measurement(draft: MeasurementDraft, state: State<'_, AppState>) -> Result<Uuid, String> {
    state.add_measurement(draft).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_measurement(
    id: Uuid,
    draft: MeasurementDraft,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state.update_measurement(id, draft).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn remove_measurement(id: Uuid, state: State<'_, AppState>) -> Result<(), String> {
    state.remove_measurement(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_mood(mood: Mood, notes: String, state: State<'_, AppState>) -> Result<Uuid, String> {
    state.add_mood(today(), mood, notes).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn export_data(state: State<'_, AppState>) -> Result<String, String> {
    state.export_journal().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn wipe_all_data(state: State<'_, AppState>) -> Result<(), String> {
    state.wipe_all_data().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_goals(state: State<'_, AppState>) -> Result<GoalBoard, String> {
    state.goals().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn add_goal(
    kind: GoalKind,
    title: String,
    target: u32,
    unit: String,
    state: State<'_, AppState>,
) -> Result<Uuid, String> {
    state
        .add_goal(kind, &title, target, &unit)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn increment_goal(id: Uuid, state: State<'_, AppState>) -> Result<Goal, String> {
    state.increment_goal(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn decrement_goal(id: Uuid, state: State<'_, AppState>) -> Result<Goal, String> {
    state.decrement_goal(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn remove_goal(id: Uuid, state: State<'_, AppState>) -> Result<(), String> {
    state.remove_goal(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_tips(category: Option<TipCategory>) -> Vec<&'static HealthTip> {
    tips::by_category(category).collect()
}

#[tauri::command]
pub fn get_bookmarks(state: State<'_, AppState>) -> Result<Bookmarks, String> {
    state.bookmarks().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn toggle_bookmark(tip_id: u8, state: State<'_, AppState>) -> Result<bool, String> {
    state.toggle_bookmark(tip_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_notification_settings(state: State<'_, AppState>) -> Result<NotificationSettings, String> {
    state.notification_settings().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn save_notification_settings(
    settings: NotificationSettings,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .save_notification_settings(&settings)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_notifications(
    start: Option<String>,
    cycle_length: Option<u32>,
    state: State<'_, AppState>,
) -> Result<Vec<Notification>, String> {
    let cycle_config = match start {
        Some(start) => {
            let start = parse_date(&start).map_err(|e| e.to_string())?;
            Some(state.cycle_config(start, cycle_length))
        }
        None => None,
    };
    state
        .notifications(chrono::Local::now().naive_local(), cycle_config)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn sign_in(email: String, name: String, state: State<'_, AppState>) -> Result<(), String> {
    state.session().sign_in(&email, &name).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn sign_out(state: State<'_, AppState>) -> Result<(), String> {
    state.session().sign_out().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn is_authenticated(state: State<'_, AppState>) -> Result<bool, String> {
    state.session().is_authenticated().map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn analyze_symptoms(symptoms: String, ai: State<'_, AiState>) -> Result<String, String> {
    let prompt = prompts::symptom_analysis_prompt(&symptoms).map_err(|e| e.to_string())?;
    ai.ask(prompt).await
}

#[tauri::command]
pub async fn analyze_mood(
    mood: Option<Mood>,
    notes: String,
    ai: State<'_, AiState>,
) -> Result<String, String> {
    let prompt = prompts::mood_prompt(mood, &notes).map_err(|e| e.to_string())?;
    ai.ask(prompt).await
}

#[tauri::command]
pub async fn cycle_insights(log: CycleLog, ai: State<'_, AiState>) -> Result<String, String> {
    let prompt = prompts::cycle_insights_prompt(&log, today()).map_err(|e| e.to_string())?;
    ai.ask(prompt).await
}

#[tauri::command]
pub async fn weekly_info(due_date: String, ai: State<'_, AiState>) -> Result<String, String> {
    let due = parse_date(&due_date).map_err(|e| e.to_string())?;
    let week = crate::pregnancy::compute_current_week(due, today());
    ai.ask(prompts::weekly_info_prompt(week)).await
}
