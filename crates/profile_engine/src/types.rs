use std::fmt;

pub type CycleId = u64;

/// Parsed manifest. `modified_at` is 0 for legacy bare-list manifests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub names: Vec<String>,
    pub modified_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub name: String,
    pub error: FetchError,
}

/// Outcome of a cycle whose manifest loaded. Files appear in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutput {
    pub manifest: Manifest,
    pub files: Vec<FetchedFile>,
    pub failed: Vec<FileFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CycleCompleted {
        cycle_id: CycleId,
        result: Result<CycleOutput, FetchError>,
    },
    ManifestPolled(Manifest),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// Manifest payload matched neither wire shape.
    Parse,
    Decode,
}

impl FailureKind {
    /// True for failures that mean the resource could not be retrieved, as
    /// opposed to retrieved but unusable.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            FailureKind::HttpStatus(_)
                | FailureKind::Timeout
                | FailureKind::TooLarge { .. }
                | FailureKind::Network
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Parse => write!(f, "malformed manifest"),
            FailureKind::Decode => write!(f, "undecodable text"),
        }
    }
}
