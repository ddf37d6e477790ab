//! Persisted state: what was created, under which address, and the
//! reconciler state needed to manage it later.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::HostError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub address: String,
    pub kind: String,
    /// Opaque to the host; only the kind's reconciler reads it.
    pub state: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    objects: Vec<StoredObject>,
}

/// Tracked objects in creation order.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    objects: Vec<StoredObject>,
}

impl StateStore {
    /// Load the store at `path`; a missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HostError> {
        let path = path.as_ref().to_path_buf();
        let objects = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str::<StateFile>(&data)?.objects,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} tracked object(s) from {}", objects.len(), path.display());
        Ok(Self { path, objects })
    }

    pub fn save(&self) -> Result<(), HostError> {
        let file = StateFile {
            objects: self.objects.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn objects(&self) -> &[StoredObject] {
        &self.objects
    }

    pub fn get(&self, address: &str) -> Option<&StoredObject> {
        self.objects.iter().find(|o| o.address == address)
    }

    /// Insert or replace, keeping the original position of a replaced entry.
    pub fn upsert(&mut self, address: &str, kind: &str, state: Value) {
        let object = StoredObject {
            address: address.to_string(),
            kind: kind.to_string(),
            state,
        };
        match self.objects.iter_mut().find(|o| o.address == address) {
            Some(existing) => *existing = object,
            None => self.objects.push(object),
        }
    }

    pub fn remove(&mut self, address: &str) -> Option<StoredObject> {
        let index = self.objects.iter().position(|o| o.address == address)?;
        Some(self.objects.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mc_rs_declare_{}", rand::random::<u64>()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = temp_dir();
        let store = StateStore::load(dir.join("none.json")).unwrap();
        assert!(store.objects().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn save_and_reload() {
        let dir = temp_dir();
        let path = dir.join("state.json");

        let mut store = StateStore::load(&path).unwrap();
        store.upsert("a", "op", json!({ "id": "alice", "desired": { "player": "alice" } }));
        store.upsert("b", "daylock", json!({ "id": "default", "desired": { "enabled": true } }));
        store.upsert("a", "op", json!({ "id": "alice", "desired": { "player": "alice" }, "x": 1 }));
        store.save().unwrap();

        let loaded = StateStore::load(&path).unwrap();
        let addresses: Vec<_> = loaded.objects().iter().map(|o| o.address.as_str()).collect();
        assert_eq!(addresses, vec!["a", "b"]);
        assert_eq!(loaded.get("a").unwrap().state["x"], 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn remove_tracked() {
        let dir = temp_dir();
        let mut store = StateStore::load(dir.join("s.json")).unwrap();
        store.upsert("a", "op", json!({}));
        assert!(store.remove("a").is_some());
        assert!(store.remove("a").is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = temp_dir();
        let path = dir.join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(StateStore::load(&path), Err(HostError::Json(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
