//! Prompt text sent to the text-generation service, plus the form checks that
//! gate each request.

use chrono::NaiveDate;

use crate::cycle;
use crate::models::{CycleConfig, CycleLog, Mood};

const MIN_SYMPTOM_CHARS: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Please describe your symptoms")]
    NoSymptoms,
    #[error("Please provide more detail about your symptoms")]
    TooShort,
    #[error("Please select a mood and add some notes about how you're feeling.")]
    IncompleteMood,
    #[error("Please enter your last period date to get insights.")]
    NoLastPeriod,
}

pub fn validate_symptoms(text: &str) -> Result<(), PromptError> {
    if text.trim().is_empty() {
        return Err(PromptError::NoSymptoms);
    }
    if text.chars().count() < MIN_SYMPTOM_CHARS {
        return Err(PromptError::TooShort);
    }
    Ok(())
}

pub fn symptom_analysis_prompt(symptoms: &str) -> Result<String, PromptError> {
    validate_symptoms(symptoms)?;
    Ok(format!(
        "As a healthcare AI assistant specialized in women's health, analyze these symptoms and provide insights: {symptoms}

Please provide a structured response including:
1. Potential Causes
2. Recommended Actions
3. Warning Signs (when to seek immediate medical attention)
4. General Advice

Important: Always emphasize that this is AI-generated advice and recommend consulting healthcare professionals for accurate diagnosis."
    ))
}

pub fn mood_prompt(mood: Option<Mood>, notes: &str) -> Result<String, PromptError> {
    let mood = match mood {
        Some(m) if !notes.trim().is_empty() => m,
        _ => return Err(PromptError::IncompleteMood),
    };
    Ok(format!(
        "As an empathetic AI counselor, analyze this mood entry:
Mood: {}
Notes: {}

Please provide:
1. Emotional Pattern Analysis
2. Potential Triggers or Factors
3. Self-Care Recommendations
4. Positive Affirmations

Keep the response supportive and encouraging.",
        mood.label().to_lowercase(),
        notes.trim()
    ))
}

/// Cycle insights request. `today` is used to name the phase the user is in.
pub fn cycle_insights_prompt(log: &CycleLog, today: NaiveDate) -> Result<String, PromptError> {
    let last_period = log.last_period.ok_or(PromptError::NoLastPeriod)?;
    let length = cycle::clamp_cycle_length(log.cycle_length_days);

    let current_phase = cycle::phase_on(CycleConfig::new(last_period, length), today)
        .map(|d| d.describe())
        .unwrap_or_else(|| "Unknown".to_string());
    let symptoms = log
        .symptoms
        .iter()
        .map(|(s, severity)| format!("{} (Severity: {})", s.name(), severity))
        .collect::<Vec<_>>()
        .join(", ");
    let temperature = log
        .temperature
        .map(|t| format!("{t:.1}"))
        .unwrap_or_default();

    Ok(format!(
        "As a women's health expert, provide personalized insights and recommendations based on the following menstrual cycle data:

Last Period Date: {}
Cycle Length: {} days
Current Phase: {}
Current Symptoms: {}
Mood: {}
Temperature: {}
Flow Intensity: {}
Medications: {}

Please provide:
1. Current Cycle Phase Analysis
2. Personalized Wellness Tips
3. Diet and Exercise Recommendations
4. Self-Care Suggestions
5. Medication Reminders (if applicable)

Keep the response supportive, practical, and focused on holistic well-being.",
        last_period.format("%Y-%m-%d"),
        length,
        current_phase,
        symptoms,
        log.mood.map(|m| m.label()).unwrap_or_default(),
        temperature,
        log.flow.map(|f| f.label()).unwrap_or("Not specified"),
        log.medications.join(", "),
    ))
}

pub fn weekly_info_prompt(week: u32) -> String {
    format!(
        "As a pregnancy health expert, provide detailed information about week {week} of pregnancy. Include:

1. Baby's Development: What's happening with the baby this week? Include size comparison to a fruit or object.
2. Mother's Experience: Common symptoms and body changes during this week.
3. Health Tips: Nutrition, exercise, and self-care recommendations specific to this week.
4. Important Milestones: Any significant developments or medical appointments typically scheduled during this week.
5. Warning Signs: Symptoms that would require medical attention at this stage.

Format the information in a clear, supportive, and easy-to-read manner. Use bullet points where appropriate."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleSymptom, FlowIntensity};

    #[test]
    fn symptom_text_must_have_detail() {
        assert_eq!(validate_symptoms("   "), Err(PromptError::NoSymptoms));
        assert_eq!(validate_symptoms("cramps"), Err(PromptError::TooShort));
        assert!(validate_symptoms("cramps and mild headache").is_ok());
    }

    #[test]
    fn symptom_prompt_embeds_text() {
        let prompt = symptom_analysis_prompt("sharp pain in lower back").unwrap();
        assert!(prompt.contains("provide insights: sharp pain in lower back"));
        assert!(prompt.contains("3. Warning Signs"));
    }

    #[test]
    fn mood_needs_both_fields() {
        assert_eq!(mood_prompt(None, "long day"), Err(PromptError::IncompleteMood));
        assert_eq!(mood_prompt(Some(Mood::Tired), " "), Err(PromptError::IncompleteMood));
        let prompt = mood_prompt(Some(Mood::Anxious), "exam tomorrow").unwrap();
        assert!(prompt.contains("Mood: anxious"));
        assert!(prompt.contains("Notes: exam tomorrow"));
    }

    #[test]
    fn insights_need_last_period() {
        let log = CycleLog {
            cycle_length_days: 28,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(cycle_insights_prompt(&log, today), Err(PromptError::NoLastPeriod));
    }

    #[test]
    fn insights_describe_the_log() {
        let log = CycleLog {
            last_period: NaiveDate::from_ymd_opt(2026, 10, 3),
            cycle_length_days: 28,
            symptoms: vec![(CycleSymptom::Cramps, 2), (CycleSymptom::Acne, 1)],
            mood: Some(Mood::Happy),
            temperature: Some(36.6),
            flow: None,
            medications: vec!["Ibuprofen".into()],
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let prompt = cycle_insights_prompt(&log, today).unwrap();
        assert!(prompt.contains("Last Period Date: 2026-10-03"));
        assert!(prompt.contains("Current Phase: Ovulation Day (Day 14)"));
        assert!(prompt.contains("Current Symptoms: Cramps (Severity: 2), Acne (Severity: 1)"));
        assert!(prompt.contains("Temperature: 36.6"));
        assert!(prompt.contains("Flow Intensity: Not specified"));
        assert!(prompt.contains("Medications: Ibuprofen"));

        let heavy = CycleLog {
            flow: Some(FlowIntensity::Heavy),
            ..log
        };
        assert!(cycle_insights_prompt(&heavy, today)
            .unwrap()
            .contains("Flow Intensity: Heavy"));
    }

    #[test]
    fn insights_phase_follows_old_start_dates() {
        let log = CycleLog {
            last_period: NaiveDate::from_ymd_opt(2026, 1, 1),
            cycle_length_days: 28,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let prompt = cycle_insights_prompt(&log, today).unwrap();
        assert!(prompt.contains("Current Phase: Regular Phase (Day 9)"));
    }

    #[test]
    fn weekly_prompt_names_week() {
        assert!(weekly_info_prompt(23).contains("week 23 of pregnancy"));
    }
}
