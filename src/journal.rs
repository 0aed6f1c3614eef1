use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Appointment, Measurement, Mood, MoodEntry, PregnancyJournal, PregnancySymptom,
};
use crate::pregnancy;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("no journal entry with id {0}")]
    NotFound(Uuid),
}

/// Form input for an appointment; the date may still be unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub date: Option<NaiveDate>,
    pub title: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomDraft {
    pub date: Option<NaiveDate>,
    pub name: String,
    pub severity: u8,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementDraft {
    pub date: Option<NaiveDate>,
    pub weight_kg: Option<f32>,
    pub blood_pressure: Option<String>,
    pub notes: String,
}

fn required_date(date: Option<NaiveDate>) -> Result<NaiveDate, JournalError> {
    date.ok_or(JournalError::MissingField("date"))
}

fn required_text(value: &str, field: &'static str) -> Result<String, JournalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JournalError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

impl AppointmentDraft {
    fn into_entry(self, id: Uuid) -> Result<Appointment, JournalError> {
        Ok(Appointment {
            id,
            date: required_date(self.date)?,
            title: required_text(&self.title, "title")?,
            notes: self.notes,
        })
    }
}

impl SymptomDraft {
    fn into_entry(self, id: Uuid) -> Result<PregnancySymptom, JournalError> {
        Ok(PregnancySymptom {
            id,
            date: required_date(self.date)?,
            name: required_text(&self.name, "name")?,
            severity: self.severity.clamp(1, 5),
            notes: self.notes,
        })
    }
}

impl MeasurementDraft {
    fn into_entry(self, id: Uuid) -> Result<Measurement, JournalError> {
        Ok(Measurement {
            id,
            date: required_date(self.date)?,
            weight_kg: self.weight_kg,
            blood_pressure: self
                .blood_pressure
                .map(|bp| bp.trim().to_string())
                .filter(|bp| !bp.is_empty()),
            notes: self.notes,
        })
    }
}

/// Replace the entry with `id` and keep the list in date order.
fn replace<T>(
    entries: &mut Vec<T>,
    id: Uuid,
    entry: T,
    key: impl Fn(&T) -> (Uuid, NaiveDate),
) -> Result<(), JournalError> {
    let slot = entries
        .iter_mut()
        .find(|e| key(e).0 == id)
        .ok_or(JournalError::NotFound(id))?;
    *slot = entry;
    entries.sort_by_key(|e| key(e).1);
    Ok(())
}

fn remove<T>(entries: &mut Vec<T>, id: Uuid, key: impl Fn(&T) -> Uuid) -> Result<(), JournalError> {
    let before = entries.len();
    entries.retain(|e| key(e) != id);
    if entries.len() == before {
        return Err(JournalError::NotFound(id));
    }
    Ok(())
}

impl PregnancyJournal {
    /// Record the due date and refresh the stored week for `today`.
    pub fn set_due_date(&mut self, due_date: NaiveDate, today: NaiveDate) {
        self.due_date = Some(due_date);
        self.week_number = pregnancy::compute_current_week(due_date, today);
    }

    pub fn add_appointment(&mut self, draft: AppointmentDraft) -> Result<Uuid, JournalError> {
        let id = Uuid::new_v4();
        self.appointments.push(draft.into_entry(id)?);
        self.appointments.sort_by_key(|a| a.date);
        Ok(id)
    }

    pub fn update_appointment(
        &mut self,
        id: Uuid,
        draft: AppointmentDraft,
    ) -> Result<(), JournalError> {
        let entry = draft.into_entry(id)?;
        replace(&mut self.appointments, id, entry, |a| (a.id, a.date))
    }

    pub fn remove_appointment(&mut self, id: Uuid) -> Result<(), JournalError> {
        remove(&mut self.appointments, id, |a| a.id)
    }

    pub fn add_symptom(&mut self, draft: SymptomDraft) -> Result<Uuid, JournalError> {
        let id = Uuid::new_v4();
        self.symptoms.push(draft.into_entry(id)?);
        self.symptoms.sort_by_key(|s| s.date);
        Ok(id)
    }

    pub fn update_symptom(&mut self, id: Uuid, draft: SymptomDraft) -> Result<(), JournalError> {
        let entry = draft.into_entry(id)?;
        replace(&mut self.symptoms, id, entry, |s| (s.id, s.date))
    }

    pub fn remove_symptom(&mut self, id: Uuid) -> Result<(), JournalError> {
        remove(&mut self.symptoms, id, |s| s.id)
    }

    pub fn add_measurement(&mut self, draft: MeasurementDraft) -> Result<Uuid, JournalError> {
        let id = Uuid::new_v4();
        self.measurements.push(draft.into_entry(id)?);
        self.measurements.sort_by_key(|m| m.date);
        Ok(id)
    }

    pub fn update_measurement(
        &mut self,
        id: Uuid,
        draft: MeasurementDraft,
    ) -> Result<(), JournalError> {
        let entry = draft.into_entry(id)?;
        replace(&mut self.measurements, id, entry, |m| (m.id, m.date))
    }

    pub fn remove_measurement(&mut self, id: Uuid) -> Result<(), JournalError> {
        remove(&mut self.measurements, id, |m| m.id)
    }

    pub fn add_mood(&mut self, date: NaiveDate, mood: Mood, notes: String) -> Uuid {
        let id = Uuid::new_v4();
        self.mood_entries.push(MoodEntry { id, date, mood, notes });
        self.mood_entries.sort_by_key(|m| m.date);
        id
    }
}
