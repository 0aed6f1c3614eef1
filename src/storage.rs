use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::crypto;
use crate::models::PregnancyJournal;

const STORE_FILE: &str = "store.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
    #[error("store lock poisoned")]
    Poisoned,
}

/// String key/value storage that outlives the process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// All keys live in one JSON file inside the app's data directory.
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(STORE_FILE),
            guard: Mutex::new(()),
        })
    }

    /// Per-user location, e.g. `~/.local/share/femhealth`.
    pub fn default_dir() -> Result<PathBuf, StorageError> {
        Ok(dirs::data_local_dir()
            .ok_or(StorageError::NoDataDir)?
            .join("femhealth"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// A typed value stored as passphrase-sealed JSON under a fixed key.
pub struct EncryptedSlot<T> {
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> EncryptedSlot<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _value: PhantomData,
        }
    }

    pub fn exists(&self, store: &dyn KeyValueStore) -> Result<bool, StorageError> {
        Ok(store.get(self.key)?.is_some())
    }

    pub fn save(
        &self,
        store: &dyn KeyValueStore,
        passphrase: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = zeroize::Zeroizing::new(serde_json::to_vec(value)?);
        let sealed = crypto::seal(passphrase, &json)?;
        store.set(self.key, &sealed)
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self, store: &dyn KeyValueStore, passphrase: &str) -> Result<Option<T>, StorageError> {
        let Some(sealed) = store.get(self.key)? else {
            return Ok(None);
        };
        let json = zeroize::Zeroizing::new(crypto::open(passphrase, &sealed)?);
        Ok(Some(serde_json::from_slice(&json)?))
    }

    pub fn clear(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(self.key)
    }
}

/// A typed value stored as plain JSON.
pub struct JsonSlot<T> {
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonSlot<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _value: PhantomData,
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore, value: &T) -> Result<(), StorageError> {
        store.set(self.key, &serde_json::to_string(value)?)
    }

    pub fn load(&self, store: &dyn KeyValueStore) -> Result<Option<T>, StorageError> {
        store
            .get(self.key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    pub fn clear(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(self.key)
    }
}

pub const JOURNAL: EncryptedSlot<PregnancyJournal> = EncryptedSlot::new("pregnancy_tracker_data");

const AUTH_FLAG: &str = "isAuthenticated";
const USER_EMAIL: &str = "userEmail";
const USER_NAME: &str = "userName";

/// Signed-in flag and profile fields kept next to the journal.
pub struct Session<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn sign_in(&self, email: &str, name: &str) -> Result<(), StorageError> {
        self.store.set(AUTH_FLAG, "true")?;
        self.store.set(USER_EMAIL, email)?;
        self.store.set(USER_NAME, name)
    }

    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.store.remove(AUTH_FLAG)?;
        self.store.remove(USER_EMAIL)?;
        self.store.remove(USER_NAME)
    }

    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.store.get(AUTH_FLAG)?.as_deref() == Some("true"))
    }

    pub fn user_email(&self) -> Result<Option<String>, StorageError> {
        self.store.get(USER_EMAIL)
    }

    pub fn user_name(&self) -> Result<Option<String>, StorageError> {
        self.store.get(USER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PregnancyJournal;

    #[test]
    fn journal_slot_roundtrip() {
        let store = MemoryStore::default();
        assert!(JOURNAL.load(&store, "pw").unwrap().is_none());

        let journal = PregnancyJournal {
            week_number: 12,
            ..Default::default()
        };
        JOURNAL.save(&store, "pw", &journal).unwrap();
        assert!(JOURNAL.exists(&store).unwrap());
        assert_eq!(JOURNAL.load(&store, "pw").unwrap(), Some(journal));
        assert!(JOURNAL.load(&store, "nope").is_err());
    }

    #[test]
    fn session_flags() {
        let store = MemoryStore::default();
        let session = Session::new(&store);
        assert!(!session.is_authenticated().unwrap());

        session.sign_in("ana@example.com", "Ana").unwrap();
        assert!(session.is_authenticated().unwrap());
        assert_eq!(session.user_name().unwrap().as_deref(), Some("Ana"));

        session.sign_out().unwrap();
        assert!(!session.is_authenticated().unwrap());
        assert!(session.user_email().unwrap().is_none());
    }

    #[test]
    fn json_slot_plain_text() {
        let store = MemoryStore::default();
        let slot: JsonSlot<Vec<u32>> = JsonSlot::new("numbers");
        slot.save(&store, &vec![1, 2, 3]).unwrap();
        assert_eq!(store.get("numbers").unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(slot.load(&store).unwrap(), Some(vec![1, 2, 3]));
    }
}
