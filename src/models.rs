use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Period,
    Fertile,
    Ovulation,
    Pms,
    Normal,
}

impl Phase {
    /// Human-readable name shown in calendar tooltips.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Period => "Menstrual Phase",
            Phase::Fertile => "Fertile Window",
            Phase::Ovulation => "Ovulation Day",
            Phase::Pms => "Pre-menstrual Phase",
            Phase::Normal => "Regular Phase",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleConfig {
    pub start_date: NaiveDate,
    pub cycle_length_days: u32,
}

impl CycleConfig {
    pub fn new(start_date: NaiveDate, cycle_length_days: u32) -> Self {
        Self {
            start_date,
            cycle_length_days,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleDay {
    pub date: NaiveDate,
    /// 1-based position inside the cycle.
    pub day_in_cycle: u32,
    pub phase: Phase,
}

impl CycleDay {
    pub fn describe(&self) -> String {
        format!("{} (Day {})", self.phase.label(), self.day_in_cycle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub cycle_day: Option<CycleDay>,
}

/// Sunday-first month view. Always whole weeks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarCell>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PregnancyConfig {
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MilestoneStatus {
    pub week: u32,
    pub label: String,
    pub reached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyStatus {
    pub due_date: NaiveDate,
    pub conception_date: NaiveDate,
    pub week: u32,
    pub trimester: u8,
    pub progress_percent: f32,
    pub milestones: Vec<MilestoneStatus>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum FlowIntensity {
    Light,
    Medium,
    Heavy,
}

impl FlowIntensity {
    pub fn label(self) -> &'static str {
        match self {
            FlowIntensity::Light => "Light",
            FlowIntensity::Medium => "Medium",
            FlowIntensity::Heavy => "Heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum CycleSymptom {
    Cramps,
    Headache,
    Bloating,
    Fatigue,
    MoodSwings,
    BreastTenderness,
    Acne,
    Backache,
}

impl CycleSymptom {
    pub const ALL: [CycleSymptom; 8] = [
        CycleSymptom::Cramps,
        CycleSymptom::Headache,
        CycleSymptom::Bloating,
        CycleSymptom::Fatigue,
        CycleSymptom::MoodSwings,
        CycleSymptom::BreastTenderness,
        CycleSymptom::Acne,
        CycleSymptom::Backache,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CycleSymptom::Cramps => "Cramps",
            CycleSymptom::Headache => "Headache",
            CycleSymptom::Bloating => "Bloating",
            CycleSymptom::Fatigue => "Fatigue",
            CycleSymptom::MoodSwings => "Mood Swings",
            CycleSymptom::BreastTenderness => "Breast Tenderness",
            CycleSymptom::Acne => "Acne",
            CycleSymptom::Backache => "Backache",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Anxious,
    Neutral,
    Tired,
}

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Anxious => "Anxious",
            Mood::Neutral => "Neutral",
            Mood::Tired => "Tired",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😔",
            Mood::Angry => "😠",
            Mood::Anxious => "😰",
            Mood::Neutral => "😐",
            Mood::Tired => "🥱",
        }
    }
}

/// Day-level form state of the cycle tracker, fed into the insights prompt.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CycleLog {
    pub last_period: Option<NaiveDate>,
    pub cycle_length_days: u32,
    pub symptoms: Vec<(CycleSymptom, u8)>, // severity 1-3
    pub mood: Option<Mood>,
    pub temperature: Option<f32>,
    pub flow: Option<FlowIntensity>,
    pub medications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PregnancySymptom {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub severity: u8, // 1-5
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight_kg: Option<f32>,
    pub blood_pressure: Option<String>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub mood: Mood,
    pub notes: String,
}

/// Everything the pregnancy tracker keeps between sessions. Stored encrypted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PregnancyJournal {
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub week_number: u32,
    pub symptoms: Vec<PregnancySymptom>,
    pub appointments: Vec<Appointment>,
    pub mood_entries: Vec<MoodEntry>,
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum GoalKind {
    Water,
    Exercise,
    Sleep,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub kind: GoalKind,
    pub title: String,
    pub target: u32,
    pub current: u32,
    pub unit: String,
    pub completed: bool,
}
