//! Profile watch engine: manifest and content IO, load cycles and polling.
mod cycle;
mod decode;
mod engine;
mod fetch;
mod manifest;
mod persist;
mod poll;
mod types;

pub use cycle::load_cycle;
pub use decode::{decode_text, DecodeError};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use fetch::{ContentSource, FetchSettings, ReqwestSource, CACHE_BUST_PARAM};
pub use manifest::{
    generate_manifest, parse_manifest, render_manifest, scan_content_dir, CONTENT_EXTENSION,
};
pub use persist::{ensure_dir, write_atomically, PersistError};
pub use poll::{run_poll_loop, PollHandle, DEFAULT_POLL_INTERVAL};
pub use types::{
    CycleId, CycleOutput, EngineEvent, FailureKind, FetchError, FetchedFile, FileFailure,
    Manifest,
};
