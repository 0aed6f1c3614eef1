use chrono::NaiveDate;

use crate::models::{MilestoneStatus, PregnancyConfig, PregnancyStatus};

/// Forty weeks, counted back from the due date.
pub const GESTATION_DAYS: i64 = 280;
pub const FULL_TERM_WEEKS: u32 = 40;
pub const MIN_WEEK: u32 = 1;
pub const MAX_WEEK: u32 = 42;

pub struct Milestone {
    pub week: u32,
    pub label: &'static str,
}

pub const MILESTONES: [Milestone; 8] = [
    Milestone { week: 4, label: "Confirmation" },
    Milestone { week: 8, label: "First Ultrasound" },
    Milestone { week: 12, label: "First Trimester Complete" },
    Milestone { week: 20, label: "Anatomy Scan" },
    Milestone { week: 24, label: "Viability" },
    Milestone { week: 28, label: "Third Trimester Begins" },
    Milestone { week: 36, label: "Full Term Approaching" },
    Milestone { week: 40, label: "Due Date" },
];

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: [Faq; 5] = [
    Faq {
        question: "How accurate is the due date calculation?",
        answer: "Due date calculations are estimates based on a 40-week pregnancy from the first day of your last menstrual period. Only about 5% of babies are born on their exact due date. Most babies arrive within a week before or after.",
    },
    Faq {
        question: "When should I schedule my first prenatal appointment?",
        answer: "Most healthcare providers recommend scheduling your first prenatal appointment as soon as you know you're pregnant, typically between weeks 6-8. If you have high-risk factors, your provider may want to see you earlier.",
    },
    Faq {
        question: "What symptoms should I report to my doctor immediately?",
        answer: "Contact your healthcare provider immediately if you experience: vaginal bleeding, severe abdominal pain, severe headaches, vision changes, sudden swelling, fever over 100.4°F, decreased fetal movement after 24 weeks, or contractions before 37 weeks.",
    },
    Faq {
        question: "How much weight should I gain during pregnancy?",
        answer: "Weight gain recommendations vary based on your pre-pregnancy BMI. Generally: Underweight: 28-40 lbs, Normal weight: 25-35 lbs, Overweight: 15-25 lbs, Obese: 11-20 lbs. Your healthcare provider will give you personalized guidance.",
    },
    Faq {
        question: "When will I feel my baby move?",
        answer: "First-time mothers typically feel movements (quickening) between 18-25 weeks, while those who have been pregnant before might notice movements earlier, around 16-18 weeks. By 24-28 weeks, movements become more consistent and noticeable.",
    },
];

pub fn conception_date(due_date: NaiveDate) -> NaiveDate {
    due_date - chrono::Duration::days(GESTATION_DAYS)
}

/// Estimated pregnancy week on `today`, clamped to 1..=42.
pub fn compute_current_week(due_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - conception_date(due_date)).num_days();
    let week = days.div_euclid(7) + 1;
    week.clamp(i64::from(MIN_WEEK), i64::from(MAX_WEEK)) as u32
}

pub fn trimester(week: u32) -> u8 {
    match week {
        0..=13 => 1,
        14..=27 => 2,
        _ => 3,
    }
}

/// Share of a full-term pregnancy covered so far, capped at 100.
pub fn progress_percent(week: u32) -> f32 {
    (week as f32 / FULL_TERM_WEEKS as f32 * 100.0).min(100.0)
}

pub fn milestone_status(week: u32) -> Vec<MilestoneStatus> {
    MILESTONES
        .iter()
        .map(|m| MilestoneStatus {
            week: m.week,
            label: m.label.to_string(),
            reached: week >= m.week,
        })
        .collect()
}

pub fn status(config: PregnancyConfig, today: NaiveDate) -> PregnancyStatus {
    let week = compute_current_week(config.due_date, today);
    PregnancyStatus {
        due_date: config.due_date,
        conception_date: conception_date(config.due_date),
        week,
        trimester: trimester(week),
        progress_percent: progress_percent(week),
        milestones: milestone_status(week),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_on_due_date() {
        let due = date("2024-01-01");
        let conception = conception_date(due);
        assert_eq!(conception, date("2023-03-27"));

        let days = (due - conception).num_days();
        assert_eq!(days, 280);
        assert_eq!(compute_current_week(due, due), (days / 7 + 1) as u32);
        assert_eq!(compute_current_week(due, due), 41);
    }

    #[test]
    fn first_day_is_week_one() {
        let due = date("2024-01-01");
        assert_eq!(compute_current_week(due, date("2023-03-27")), 1);
        assert_eq!(compute_current_week(due, date("2023-04-02")), 1);
        assert_eq!(compute_current_week(due, date("2023-04-03")), 2);
    }

    #[test]
    fn clamps_late_dates_to_42() {
        let due = date("2024-01-01");
        let conception = conception_date(due);
        assert_eq!(compute_current_week(due, conception + chrono::Duration::days(295)), 42);
        assert_eq!(compute_current_week(due, date("2030-01-01")), 42);
    }

    #[test]
    fn clamps_early_dates_to_1() {
        let due = date("2024-01-01");
        assert_eq!(compute_current_week(due, date("2023-03-26")), 1);
        assert_eq!(compute_current_week(due, date("2020-01-01")), 1);
    }

    #[test]
    fn same_inputs_same_week() {
        let due = date("2026-12-24");
        let today = date("2026-10-16");
        assert_eq!(compute_current_week(due, today), compute_current_week(due, today));
    }

    #[test]
    fn trimester_boundaries() {
        assert_eq!(trimester(13), 1);
        assert_eq!(trimester(14), 2);
        assert_eq!(trimester(27), 2);
        assert_eq!(trimester(28), 3);
        assert_eq!(trimester(42), 3);
    }

    #[test]
    fn progress_caps_at_full_term() {
        assert_eq!(progress_percent(20), 50.0);
        assert_eq!(progress_percent(40), 100.0);
        assert_eq!(progress_percent(42), 100.0);
    }

    #[test]
    fn milestones_reached_by_week() {
        let reached: Vec<u32> = milestone_status(20)
            .into_iter()
            .filter(|m| m.reached)
            .map(|m| m.week)
            .collect();
        assert_eq!(reached, vec![4, 8, 12, 20]);
    }

    #[test]
    fn status_bundles_everything() {
        let s = status(PregnancyConfig { due_date: date("2024-01-01") }, date("2023-09-01"));
        assert_eq!(s.week, 23);
        assert_eq!(s.trimester, 2);
        assert_eq!(s.milestones.len(), MILESTONES.len());
    }
}
