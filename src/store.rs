//! Local persistence of the fetched vehicles and the blacklist.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::garage::{Blacklist, JoinedVehicle};
use crate::prelude::*;
use crate::wargaming::{Realm, TankId};

/// Key-value storage of serialized values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: String) -> Result;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result;
}

#[derive(Default)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result {
        self.lock()?.remove(key);
        Ok(())
    }
}

impl MemoryStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<HashMap<String, String>>> {
        self.0.lock().map_err(|_| anyhow!("the memory store is poisoned"))
    }
}

/// Keeps all the entries in a single JSON object file.
///
/// Every change rewrites the whole file through a temporary one.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("`{}` is not a valid store", path.display()))?
        } else {
            BTreeMap::new()
        };
        debug!(n_entries = entries.len(), "opened");
        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// The in-memory entries change only after the file has been replaced.
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("the file store is poisoned"))?;
        let mut updated = entries.clone();
        f(&mut updated);

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, serde_json::to_vec_pretty(&updated)?)
            .with_context(|| format!("failed to write `{}`", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("failed to replace `{}`", self.path.display()))?;
        *entries = updated;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("the file store is poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Stored data of a single player on a single realm.
pub struct Profile<'a> {
    store: &'a dyn KeyValueStore,
    key_prefix: String,
}

impl<'a> Profile<'a> {
    pub fn new(store: &'a dyn KeyValueStore, nickname: &str, realm: Realm) -> Self {
        Self {
            store,
            key_prefix: format!("{}-{}", nickname.trim(), realm.to_str()),
        }
    }

    fn vehicles_key(&self) -> String {
        format!("{}-tanks", self.key_prefix)
    }

    fn blacklist_key(&self) -> String {
        format!("{}-blacklist", self.key_prefix)
    }

    /// Returns `None` when nothing has been saved yet.
    pub fn load_vehicles(&self) -> Result<Option<Vec<JoinedVehicle>>> {
        self.store
            .get(&self.vehicles_key())?
            .map(|value| serde_json::from_str(&value).context("the cached vehicles are corrupted"))
            .transpose()
    }

    pub fn save_vehicles(&self, vehicles: &[JoinedVehicle]) -> Result {
        self.store.set(&self.vehicles_key(), serde_json::to_string(vehicles)?)
    }

    pub fn load_blacklist(&self) -> Result<Blacklist> {
        match self.store.get(&self.blacklist_key())? {
            Some(value) => serde_json::from_str(&value).context("the blacklist is corrupted"),
            None => Ok(Blacklist::default()),
        }
    }

    fn save_blacklist(&self, blacklist: &Blacklist) -> Result {
        self.store.set(&self.blacklist_key(), serde_json::to_string(blacklist)?)
    }

    /// Returns `false` if the vehicle has already been blacklisted.
    pub fn blacklist(&self, tank_id: TankId) -> Result<bool> {
        let mut blacklist = self.load_blacklist()?;
        let is_inserted = blacklist.insert(tank_id);
        if is_inserted {
            self.save_blacklist(&blacklist)?;
        }
        Ok(is_inserted)
    }

    /// Returns `false` if the vehicle has not been blacklisted.
    pub fn unblacklist(&self, tank_id: TankId) -> Result<bool> {
        let mut blacklist = self.load_blacklist()?;
        let is_removed = blacklist.remove(tank_id);
        if is_removed {
            self.save_blacklist(&blacklist)?;
        }
        Ok(is_removed)
    }

    /// Forgets both the cached vehicles and the blacklist.
    pub fn clear(&self) -> Result {
        self.store.remove(&self.vehicles_key())?;
        self.store.remove(&self.blacklist_key())
    }
}
