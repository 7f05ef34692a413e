use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::{engine_error, engine_info, engine_warn};
use profile_core::Snapshot;
use profile_engine::{write_atomically, PersistError};

const STATE_FILENAME: &str = "state.ron";

/// JSON array of the file names seen at the last completed refresh.
pub(crate) const KNOWN_FILES_KEY: &str = "knownFiles";
/// Milliseconds since the epoch of the last completed refresh.
pub(crate) const LAST_VISIT_KEY: &str = "lastVisit";

/// Durable string key/value store backed by a single RON file.
pub(crate) struct KeyValueFile {
    path: PathBuf,
}

impl KeyValueFile {
    pub(crate) fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILENAME),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    /// Sets all entries in one atomic write.
    pub(crate) fn set_all(&self, entries: &[(&str, String)]) -> Result<(), PersistError> {
        let mut all = self.read_all();
        for (key, value) in entries {
            all.insert((*key).to_string(), value.clone());
        }

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&all, pretty)
            .map_err(|err| PersistError::Io(std::io::Error::other(err)))?;
        write_atomically(&self.path, &content)
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                engine_warn!("Failed to read persisted state from {:?}: {}", self.path, err);
                return BTreeMap::new();
            }
        };

        match ron::from_str(&content) {
            Ok(entries) => entries,
            Err(err) => {
                engine_warn!("Failed to parse persisted state from {:?}: {}", self.path, err);
                BTreeMap::new()
            }
        }
    }
}

/// Reads the snapshot. Anything unreadable counts as a first run, so a damaged
/// name list never flags every file as new.
pub(crate) fn load_snapshot(store: &KeyValueFile) -> Snapshot {
    let known_names = store.get(KNOWN_FILES_KEY).and_then(|raw| {
        match serde_json::from_str::<BTreeSet<String>>(&raw) {
            Ok(names) => Some(names),
            Err(err) => {
                engine_warn!("Ignoring unreadable {}: {}", KNOWN_FILES_KEY, err);
                None
            }
        }
    });
    let visited_at = store
        .get(LAST_VISIT_KEY)
        .and_then(|raw| raw.trim().parse::<u64>().ok());

    let snapshot = match (known_names, visited_at) {
        (Some(known_names), Some(visited_at)) => Snapshot {
            known_names,
            visited_at: Some(visited_at),
        },
        _ => Snapshot::default(),
    };
    engine_info!(
        "Loaded snapshot: {} known files, visited_at={:?}",
        snapshot.known_names.len(),
        snapshot.visited_at
    );
    snapshot
}

pub(crate) fn save_snapshot(store: &KeyValueFile, snapshot: &Snapshot) {
    let known = match serde_json::to_string(&snapshot.known_names) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize known files: {}", err);
            return;
        }
    };

    let mut entries = vec![(KNOWN_FILES_KEY, known)];
    if let Some(visited_at) = snapshot.visited_at {
        entries.push((LAST_VISIT_KEY, visited_at.to_string()));
    }

    if let Err(err) = store.set_all(&entries) {
        engine_error!("Failed to write snapshot to {:?}: {}", store.path, err);
    }
}
