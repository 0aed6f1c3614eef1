use chrono::NaiveDate;
use femhealth::config::CycleSettings;
use femhealth::journal::{AppointmentDraft, MeasurementDraft};
use femhealth::models::{GoalKind, Mood};
use femhealth::storage::{FileStore, KeyValueStore};
use femhealth::{AppState, Error};
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn open(dir: &TempDir) -> AppState {
    let store = FileStore::open(dir.path()).unwrap();
    AppState::new(Box::new(store), CycleSettings::default())
}

#[test]
fn journal_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let app = open(&dir);
        app.setup("lavender".into()).unwrap();
        app.set_due_date(date("2027-03-01"), date("2026-10-16")).unwrap();
        app.add_appointment(AppointmentDraft {
            date: Some(date("2026-11-20")),
            title: "Anatomy scan".into(),
            notes: "bring referral".into(),
        })
        .unwrap();
        app.add_measurement(MeasurementDraft {
            date: Some(date("2026-10-16")),
            weight_kg: Some(64.5),
            blood_pressure: Some("118/76".into()),
            notes: String::new(),
        })
        .unwrap();
        app.add_mood(date("2026-10-16"), Mood::Happy, "felt a kick".into())
            .unwrap();
    }

    let app = open(&dir);
    assert!(app.is_setup().unwrap());
    assert!(matches!(app.journal(), Err(Error::Locked)));
    assert!(!app.unlock("Lavender".into()).unwrap());
    assert!(app.unlock("lavender".into()).unwrap());

    let journal = app.journal().unwrap();
    assert_eq!(journal.due_date, Some(date("2027-03-01")));
    assert_eq!(journal.appointments[0].title, "Anatomy scan");
    assert_eq!(journal.measurements[0].blood_pressure.as_deref(), Some("118/76"));
    assert_eq!(journal.mood_entries[0].mood, Mood::Happy);
}

#[test]
fn nothing_readable_on_disk() {
    let dir = TempDir::new().unwrap();
    let app = open(&dir);
    app.setup("lavender".into()).unwrap();
    app.add_appointment(AppointmentDraft {
        date: Some(date("2026-11-20")),
        title: "Glucose screening".into(),
        notes: String::new(),
    })
    .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("store.json")).unwrap();
    assert!(raw.contains("pregnancy_tracker_data"));
    assert!(!raw.contains("Glucose"));
}

#[test]
fn goals_and_session_share_the_store() {
    let dir = TempDir::new().unwrap();
    let id = {
        let app = open(&dir);
        app.session().sign_in("ana@example.com", "Ana").unwrap();
        app.add_goal(GoalKind::Water, "Herbal tea", 3, "cups").unwrap()
    };

    let app = open(&dir);
    assert!(app.session().is_authenticated().unwrap());
    assert_eq!(app.increment_goal(id).unwrap().current, 1);

    app.wipe_all_data().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get("isAuthenticated").unwrap(), None);
    assert_eq!(store.get("wellness_goals").unwrap(), None);
}
