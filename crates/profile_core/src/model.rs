use std::collections::BTreeSet;

/// Identifier of one manifest-plus-content load cycle.
pub type CycleId = u64;

/// Remote descriptor of which files currently exist.
///
/// `modified_at` is 0 when the producer did not supply a timestamp
/// (legacy bare-list manifests).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub names: Vec<String>,
    pub modified_at: u64,
}

impl Manifest {
    pub fn new(names: Vec<String>, modified_at: u64) -> Self {
        Self { names, modified_at }
    }
}

/// One successfully loaded file. Rebuilt wholesale on every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub content: String,
    /// Number of characters in `content`.
    pub length: usize,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let length = content.chars().count();
        Self {
            name: name.into(),
            content,
            length,
        }
    }
}

/// Last persisted picture of known file names.
///
/// `visited_at == None` means first run: nothing is ever flagged as new.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub known_names: BTreeSet<String>,
    pub visited_at: Option<u64>,
}

impl Snapshot {
    pub fn new<I, S>(known_names: I, visited_at: Option<u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_names: known_names.into_iter().map(Into::into).collect(),
            visited_at,
        }
    }
}

/// Session-scoped polling state. Reset on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollState {
    pub last_seen_modified_at: u64,
    pub refreshing: bool,
}

/// Result of a cycle whose manifest loaded. Files that failed are listed by
/// name in `failed` and are absent from `records`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedCycle {
    pub manifest: Manifest,
    pub records: Vec<FileRecord>,
    pub failed: Vec<String>,
}
