use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::cycle;
use crate::goals::GoalBoard;
use crate::models::{CycleConfig, PregnancyJournal};

/// Days of notice before a period or appointment.
pub const LOOKAHEAD_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    Reminder,
    Health,
    Appointment,
    Achievement,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
}

/// Window in which nothing is shown. May wrap past midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuietHours {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
        }
    }
}

impl QuietHours {
    pub fn contains(&self, at: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        if self.start <= self.end {
            self.start <= at && at < self.end
        } else {
            at >= self.start || at < self.end
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
    pub reminders: bool,
    pub health_tips: bool,
    pub appointments: bool,
    pub achievements: bool,
    pub quiet_hours: QuietHours,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            reminders: true,
            health_tips: true,
            appointments: true,
            achievements: true,
            quiet_hours: QuietHours::default(),
        }
    }
}

impl NotificationSettings {
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Reminder => self.reminders,
            NotificationKind::Health => self.health_tips,
            NotificationKind::Appointment => self.appointments,
            NotificationKind::Achievement => self.achievements,
        }
    }
}

/// Days until the next cycle starts, 0 when it starts on `today`.
pub fn days_until_next_period(config: CycleConfig, today: NaiveDate) -> i64 {
    let offset = (today - config.start_date).num_days();
    if offset <= 0 {
        return -offset;
    }
    let length = i64::from(cycle::clamp_cycle_length(config.cycle_length_days));
    (length - offset % length) % length
}

/// Everything worth telling the user at `now`, most urgent first.
pub fn pending(
    settings: &NotificationSettings,
    now: NaiveDateTime,
    cycle_config: Option<CycleConfig>,
    journal: Option<&PregnancyJournal>,
    goals: &GoalBoard,
) -> Vec<Notification> {
    if settings.quiet_hours.contains(now.time()) {
        return Vec::new();
    }
    let today = now.date();
    let mut out = Vec::new();

    if let Some(config) = cycle_config {
        let days = days_until_next_period(config, today);
        if days <= LOOKAHEAD_DAYS {
            let message = match days {
                0 => "Your period is expected to start today".to_string(),
                1 => "Your next period is expected to start tomorrow".to_string(),
                n => format!("Your next period is expected to start in {n} days"),
            };
            out.push(Notification {
                kind: NotificationKind::Health,
                priority: Priority::Medium,
                title: "Cycle Prediction".into(),
                message,
            });
        }
    }

    if let Some(journal) = journal {
        for appointment in &journal.appointments {
            let days = (appointment.date - today).num_days();
            if (0..=LOOKAHEAD_DAYS).contains(&days) {
                let when = match days {
                    0 => "today".to_string(),
                    1 => "tomorrow".to_string(),
                    n => format!("in {n} days"),
                };
                out.push(Notification {
                    kind: NotificationKind::Appointment,
                    priority: Priority::High,
                    title: "Upcoming Appointment".into(),
                    message: format!("{} is {when}", appointment.title),
                });
            }
        }
    }

    for goal in &goals.goals {
        let (kind, priority, title, message) = if goal.completed {
            (
                NotificationKind::Achievement,
                Priority::Low,
                "Goal Reached!",
                format!("You reached {} {} for {}", goal.target, goal.unit, goal.title),
            )
        } else {
            (
                NotificationKind::Reminder,
                Priority::Low,
                "Goal Reminder",
                format!(
                    "{} more {} to go for {}",
                    goal.target.saturating_sub(goal.current),
                    goal.unit,
                    goal.title
                ),
            )
        };
        out.push(Notification {
            kind,
            priority,
            title: title.into(),
            message,
        });
    }

    out.retain(|n| settings.allows(n.kind));
    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::AppointmentDraft;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn quiet_hours_wrap_midnight() {
        let quiet = QuietHours {
            enabled: true,
            ..Default::default()
        };
        assert!(quiet.contains(time("23:30")));
        assert!(quiet.contains(time("07:59")));
        assert!(!quiet.contains(time("08:00")));
        assert!(!quiet.contains(time("21:59")));

        let lunch = QuietHours {
            enabled: true,
            start: time("12:00"),
            end: time("13:00"),
        };
        assert!(lunch.contains(time("12:30")));
        assert!(!lunch.contains(time("13:00")));
        assert!(!QuietHours::default().contains(time("23:30")));
    }

    #[test]
    fn next_period_countdown() {
        let config = CycleConfig::new(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(), 28);
        let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        assert_eq!(days_until_next_period(config, day(1)), 0);
        assert_eq!(days_until_next_period(config, day(2)), 27);
        assert_eq!(days_until_next_period(config, day(26)), 3);
        assert_eq!(days_until_next_period(config, day(29)), 0);
        assert_eq!(days_until_next_period(config, NaiveDate::from_ymd_opt(2026, 9, 29).unwrap()), 2);
    }

    #[test]
    fn collects_and_orders_by_priority() {
        let mut journal = PregnancyJournal::default();
        journal
            .add_appointment(AppointmentDraft {
                date: Some(NaiveDate::from_ymd_opt(2026, 10, 27).unwrap()),
                title: "Glucose screening".into(),
                notes: String::new(),
            })
            .unwrap();
        let config = CycleConfig::new(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(), 28);
        let goals = GoalBoard::default();

        let all = pending(
            &NotificationSettings::default(),
            at("2026-10-26 10:00"),
            Some(config),
            Some(&journal),
            &goals,
        );
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].message, "Glucose screening is tomorrow");
        assert_eq!(all[1].message, "Your next period is expected to start in 3 days");
        assert_eq!(all[2].message, "8 more glasses to go for Daily Water Intake");

        let settings = NotificationSettings {
            reminders: false,
            appointments: false,
            ..Default::default()
        };
        let only_health = pending(&settings, at("2026-10-26 10:00"), Some(config), Some(&journal), &goals);
        assert_eq!(only_health.len(), 1);
        assert_eq!(only_health[0].kind, NotificationKind::Health);
    }

    #[test]
    fn nothing_during_quiet_hours() {
        let mut settings = NotificationSettings::default();
        settings.quiet_hours.enabled = true;
        let goals = GoalBoard::default();
        assert!(pending(&settings, at("2026-10-26 23:00"), None, None, &goals).is_empty());
        assert_eq!(pending(&settings, at("2026-10-26 09:00"), None, None, &goals).len(), 2);
    }
}
