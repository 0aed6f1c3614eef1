use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Mutex;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::config::CycleSettings;
use crate::crypto::CryptoError;
use crate::cycle;
use crate::error::{Error, Result};
use crate::goals::{GoalBoard, GoalError};
use crate::journal::{AppointmentDraft, MeasurementDraft, SymptomDraft};
use crate::models::*;
use crate::notifications::{self, Notification, NotificationSettings};
use crate::pregnancy;
use crate::storage::{self, JsonSlot, KeyValueStore, Session, StorageError};
use crate::tips::Bookmarks;

const GOALS: JsonSlot<GoalBoard> = JsonSlot::new("wellness_goals");
const BOOKMARKS: JsonSlot<Bookmarks> = JsonSlot::new("bookmarked_tips");
const NOTIFICATION_SETTINGS: JsonSlot<NotificationSettings> =
    JsonSlot::new("notification_settings");

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// App state holding the passphrase and decrypted journal while unlocked.
pub struct AppState {
    store: Box<dyn KeyValueStore>,
    cycle: CycleSettings,
    passphrase: Mutex<Option<String>>,
    journal: Mutex<Option<PregnancyJournal>>,
}

impl AppState {
    pub fn new(store: Box<dyn KeyValueStore>, cycle: CycleSettings) -> Self {
        Self {
            store,
            cycle,
            passphrase: Mutex::new(None),
            journal: Mutex::new(None),
        }
    }

    /// Lock: zeroize the passphrase and drop the journal from memory.
    pub fn lock(&self) {
        if let Ok(mut pass) = self.passphrase.lock() {
            if let Some(ref mut p) = *pass {
                p.zeroize();
            }
            *pass = None;
        }
        if let Ok(mut journal) = self.journal.lock() {
            *journal = None;
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.journal.lock().map(|j| j.is_some()).unwrap_or(false)
    }

    /// Apply `f` to a copy of the journal and keep it only once it is on disk.
    fn with_journal<R, E: Into<Error>>(
        &self,
        f: impl FnOnce(&mut PregnancyJournal) -> std::result::Result<R, E>,
    ) -> Result<R> {
        let pass_guard = self.passphrase.lock().map_err(|_| StorageError::Poisoned)?;
        let mut guard = self.journal.lock().map_err(|_| StorageError::Poisoned)?;
        let (Some(pass), Some(current)) = (pass_guard.as_ref(), guard.as_ref()) else {
            return Err(Error::Locked);
        };

        let mut draft = current.clone();
        let out = f(&mut draft).map_err(Into::<Error>::into)?;
        storage::JOURNAL.save(self.store.as_ref(), pass, &draft)?;
        *guard = Some(draft);
        Ok(out)
    }

    pub fn is_setup(&self) -> Result<bool> {
        Ok(storage::JOURNAL.exists(self.store.as_ref())?)
    }

    pub fn setup(&self, passphrase: String) -> Result<()> {
        if passphrase.is_empty() {
            return Err(crate::journal::JournalError::MissingField("passphrase").into());
        }
        let journal = PregnancyJournal::default();
        storage::JOURNAL.save(self.store.as_ref(), &passphrase, &journal)?;

        *self.passphrase.lock().map_err(|_| StorageError::Poisoned)? = Some(passphrase);
        *self.journal.lock().map_err(|_| StorageError::Poisoned)? = Some(journal);
        tracing::info!("journal created");
        Ok(())
    }

    /// `Ok(false)` means the passphrase did not open the journal.
    pub fn unlock(&self, passphrase: String) -> Result<bool> {
        let mut journal = match storage::JOURNAL.load(self.store.as_ref(), &passphrase) {
            Ok(Some(journal)) => journal,
            Ok(None) => return Err(Error::NotSetUp),
            Err(StorageError::Crypto(CryptoError::Decryption)) => {
                tracing::warn!("unlock rejected");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(due) = journal.due_date {
            journal.set_due_date(due, today());
        }
        storage::JOURNAL.save(self.store.as_ref(), &passphrase, &journal)?;
        *self.passphrase.lock().map_err(|_| StorageError::Poisoned)? = Some(passphrase);
        *self.journal.lock().map_err(|_| StorageError::Poisoned)? = Some(journal);
        tracing::debug!("journal unlocked");
        Ok(true)
    }

    /// Cycle settings for `start`, falling back to the configured length.
    pub fn cycle_config(&self, start: NaiveDate, length: Option<u32>) -> CycleConfig {
        CycleConfig::new(start, length.unwrap_or(self.cycle.default_length))
    }

    pub fn cycle_days(&self, start: NaiveDate, length: Option<u32>) -> Vec<CycleDay> {
        cycle::compute_cycle_days(self.cycle_config(start, length), self.cycle.window_days)
    }

    pub fn cycle_calendar(
        &self,
        start: NaiveDate,
        length: Option<u32>,
        year: i32,
        month: u32,
    ) -> Result<MonthGrid> {
        let days = self.cycle_days(start, length);
        Ok(cycle::month_grid(year, month, &days)?)
    }

    pub fn pregnancy_status(&self, due_date: NaiveDate, today: NaiveDate) -> PregnancyStatus {
        pregnancy::status(PregnancyConfig { due_date }, today)
    }

    pub fn set_due_date(&self, due_date: NaiveDate, today: NaiveDate) -> Result<PregnancyStatus> {
        self.with_journal(|j| {
            j.set_due_date(due_date, today);
            Ok::<_, Error>(())
        })?;
        Ok(self.pregnancy_status(due_date, today))
    }

    pub fn journal(&self) -> Result<PregnancyJournal> {
        let guard = self.journal.lock().map_err(|_| StorageError::Poisoned)?;
        guard.clone().ok_or(Error::Locked)
    }

    pub fn add_appointment(&self, draft: AppointmentDraft) -> Result<Uuid> {
        self.with_journal(|j| j.add_appointment(draft))
    }

    pub fn update_appointment(&self, id: Uuid, draft: AppointmentDraft) -> Result<()> {
        self.with_journal(|j| j.update_appointment(id, draft))
    }

    pub fn remove_appointment(&self, id: Uuid) -> Result<()> {
        self.with_journal(|j| j.remove_appointment(id))
    }

    pub fn add_symptom(&self, draft: SymptomDraft) -> Result<Uuid> {
        self.with_journal(|j| j.add_symptom(draft))
    }

    pub fn update_symptom(&self, id: Uuid, draft: SymptomDraft) -> Result<()> {
        self.with_journal(|j| j.update_symptom(id, draft))
    }

    pub fn remove_symptom(&self, id: Uuid) -> Result<()> {
        self.with_journal(|j| j.remove_symptom(id))
    }

    pub fn add_measurement(&self, draft: MeasurementDraft) -> Result<Uuid> {
        self.with_journal(|j| j.add_measurement(draft))
    }

    pub fn update_measurement(&self, id: Uuid, draft: MeasurementDraft) -> Result<()> {
        self.with_journal(|j| j.update_measurement(id, draft))
    }

    pub fn remove_measurement(&self, id: Uuid) -> Result<()> {
        self.with_journal(|j| j.remove_measurement(id))
    }

    pub fn add_mood(&self, date: NaiveDate, mood: Mood, notes: String) -> Result<Uuid> {
        self.with_journal(|j| Ok::<_, Error>(j.add_mood(date, mood, notes)))
    }

    pub fn export_journal(&self) -> Result<String> {
        let journal = self.journal()?;
        serde_json::to_string_pretty(&journal)
            .map_err(|e| Error::Storage(StorageError::Serialization(e)))
    }

    /// The first load stores the default board so its goal ids stay stable.
    pub fn goals(&self) -> Result<GoalBoard> {
        match GOALS.load(self.store.as_ref())? {
            Some(board) => Ok(board),
            None => {
                let board = GoalBoard::default();
                GOALS.save(self.store.as_ref(), &board)?;
                Ok(board)
            }
        }
    }

    fn with_goals<R>(&self, f: impl FnOnce(&mut GoalBoard) -> std::result::Result<R, GoalError>) -> Result<R> {
        let mut board = self.goals()?;
        let out = f(&mut board)?;
        GOALS.save(self.store.as_ref(), &board)?;
        Ok(out)
    }

    pub fn add_goal(&self, kind: GoalKind, title: &str, target: u32, unit: &str) -> Result<Uuid> {
        self.with_goals(|b| b.add(kind, title, target, unit))
    }

    pub fn increment_goal(&self, id: Uuid) -> Result<Goal> {
        self.with_goals(|b| b.increment(id).cloned())
    }

    pub fn decrement_goal(&self, id: Uuid) -> Result<Goal> {
        self.with_goals(|b| b.decrement(id).cloned())
    }

    pub fn remove_goal(&self, id: Uuid) -> Result<()> {
        self.with_goals(|b| b.remove(id))
    }

    pub fn bookmarks(&self) -> Result<Bookmarks> {
        Ok(BOOKMARKS.load(self.store.as_ref())?.unwrap_or_default())
    }

    /// Returns whether the tip is bookmarked afterwards.
    pub fn toggle_bookmark(&self, tip_id: u8) -> Result<bool> {
        let mut marks = self.bookmarks()?;
        let marked = marks.toggle(tip_id)?;
        BOOKMARKS.save(self.store.as_ref(), &marks)?;
        Ok(marked)
    }

    pub fn notification_settings(&self) -> Result<NotificationSettings> {
        Ok(NOTIFICATION_SETTINGS
            .load(self.store.as_ref())?
            .unwrap_or_default())
    }

    pub fn save_notification_settings(&self, settings: &NotificationSettings) -> Result<()> {
        Ok(NOTIFICATION_SETTINGS.save(self.store.as_ref(), settings)?)
    }

    /// Reminders for `now`. Appointments are only included while unlocked.
    pub fn notifications(
        &self,
        now: NaiveDateTime,
        cycle_config: Option<CycleConfig>,
    ) -> Result<Vec<Notification>> {
        let settings = self.notification_settings()?;
        let goals = self.goals()?;
        let journal = self
            .journal
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .clone();
        Ok(notifications::pending(
            &settings,
            now,
            cycle_config,
            journal.as_ref(),
            &goals,
        ))
    }

    pub fn session(&self) -> Session<'_> {
        Session::new(self.store.as_ref())
    }

    /// Lock, then delete the journal, goals, preferences and session flags.
    pub fn wipe_all_data(&self) -> Result<()> {
        self.lock();
        storage::JOURNAL.clear(self.store.as_ref())?;
        GOALS.clear(self.store.as_ref())?;
        BOOKMARKS.clear(self.store.as_ref())?;
        NOTIFICATION_SETTINGS.clear(self.store.as_ref())?;
        self.session().sign_out()?;
        tracing::info!("all local data wiped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Box::new(MemoryStore::default()), CycleSettings::default())
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn journal_ops_require_unlock() {
        let app = state();
        assert!(!app.is_setup().unwrap());
        assert!(matches!(app.unlock("pw".into()), Err(Error::NotSetUp)));
        assert!(matches!(
            app.add_mood(date("2026-10-01"), Mood::Happy, String::new()),
            Err(Error::Locked)
        ));
    }

    #[test]
    fn setup_lock_unlock_cycle() {
        let app = state();
        app.setup("blossom".into()).unwrap();
        app.add_appointment(AppointmentDraft {
            date: Some(date("2026-11-02")),
            title: "Anatomy scan".into(),
            notes: String::new(),
        })
        .unwrap();

        app.lock();
        assert!(!app.is_unlocked());
        assert!(!app.unlock("wrong".into()).unwrap());
        assert!(app.unlock("blossom".into()).unwrap());
        assert_eq!(app.journal().unwrap().appointments.len(), 1);
    }

    #[test]
    fn calendar_uses_configured_defaults() {
        let app = state();
        let days = app.cycle_days(date("2026-10-01"), None);
        assert_eq!(days.len(), 90);
        assert_eq!(days[28].day_in_cycle, 1);

        let grid = app.cycle_calendar(date("2026-10-01"), Some(30), 2026, 10).unwrap();
        assert_eq!(grid.weeks.len(), 6);
        assert!(app.cycle_calendar(date("2026-10-01"), None, 2026, 0).is_err());
    }

    #[test]
    fn goals_persist_between_calls() {
        let app = state();
        let id = app.add_goal(GoalKind::Sleep, "Sleep 8h", 7, "nights").unwrap();
        assert_eq!(app.increment_goal(id).unwrap().current, 1);
        assert_eq!(app.goals().unwrap().goals.len(), 3);
        app.remove_goal(id).unwrap();
        assert_eq!(app.goals().unwrap().goals.len(), 2);
    }

    #[test]
    fn wipe_removes_everything() {
        let app = state();
        app.setup("pw".into()).unwrap();
        app.session().sign_in("ana@example.com", "Ana").unwrap();
        app.wipe_all_data().unwrap();
        assert!(!app.is_setup().unwrap());
        assert!(!app.session().is_authenticated().unwrap());
        assert!(matches!(app.journal(), Err(Error::Locked)));
    }

    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: Arc<AtomicBool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::NoDataDir);
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn default_goals_keep_their_ids() {
        let app = state();
        let listed = app.goals().unwrap();
        assert_eq!(app.goals().unwrap(), listed);

        let water = app.increment_goal(listed.goals[0].id).unwrap();
        assert_eq!(water.current, 1);
        app.remove_goal(listed.goals[1].id).unwrap();
        assert_eq!(app.goals().unwrap().goals.len(), 1);
    }

    #[test]
    fn failed_save_leaves_journal_unchanged() {
        let fail_writes = Arc::new(AtomicBool::new(false));
        let store = FlakyStore {
            fail_writes: fail_writes.clone(),
            ..Default::default()
        };
        let app = AppState::new(Box::new(store), CycleSettings::default());
        app.setup("pw".into()).unwrap();

        fail_writes.store(true, Ordering::SeqCst);
        assert!(app
            .add_mood(date("2026-10-01"), Mood::Tired, String::new())
            .is_err());
        assert!(app.journal().unwrap().mood_entries.is_empty());

        fail_writes.store(false, Ordering::SeqCst);
        app.add_mood(date("2026-10-02"), Mood::Happy, String::new())
            .unwrap();
        app.lock();
        assert!(app.unlock("pw".into()).unwrap());
        let moods = app.journal().unwrap().mood_entries;
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood, Mood::Happy);
    }

    #[test]
    fn corrupted_journal_is_not_a_wrong_passphrase() {
        let app = state();
        app.setup("pw".into()).unwrap();
        app.lock();
        app.store.set("pregnancy_tracker_data", "AAAA").unwrap();
        assert!(matches!(
            app.unlock("pw".into()),
            Err(Error::Storage(StorageError::Crypto(CryptoError::Truncated)))
        ));
    }

    #[test]
    fn bookmarks_and_settings_persist() {
        let app = state();
        assert!(app.toggle_bookmark(4).unwrap());
        assert!(app.toggle_bookmark(2).unwrap());
        assert!(!app.toggle_bookmark(4).unwrap());
        assert!(matches!(app.toggle_bookmark(9), Err(Error::Tip(_))));
        assert_eq!(app.bookmarks().unwrap().ids.into_iter().collect::<Vec<_>>(), vec![2]);

        let mut settings = app.notification_settings().unwrap();
        settings.reminders = false;
        app.save_notification_settings(&settings).unwrap();
        assert!(!app.notification_settings().unwrap().reminders);

        app.wipe_all_data().unwrap();
        assert!(app.bookmarks().unwrap().ids.is_empty());
        assert!(app.notification_settings().unwrap().reminders);
    }

    #[test]
    fn appointments_notify_only_while_unlocked() {
        let app = state();
        app.setup("pw".into()).unwrap();
        app.add_appointment(AppointmentDraft {
            date: Some(date("2026-10-18")),
            title: "Midwife visit".into(),
            notes: String::new(),
        })
        .unwrap();
        let now = date("2026-10-17").and_hms_opt(9, 0, 0).unwrap();

        let unlocked = app.notifications(now, None).unwrap();
        assert_eq!(unlocked[0].message, "Midwife visit is tomorrow");

        app.lock();
        let locked = app.notifications(now, None).unwrap();
        assert!(locked.iter().all(|n| !n.message.contains("Midwife")));
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(matches!(parse_date("16/10/2026"), Err(Error::InvalidDate { .. })));
    }
}
