use std::collections::HashSet;

use engine_logging::{engine_debug, engine_warn};
use futures_util::future::join_all;

use crate::{ContentSource, CycleOutput, FetchError, FileFailure};

/// Fetches the manifest, then every listed file concurrently.
///
/// A manifest failure aborts the cycle. File failures are recorded in
/// `failed` and the file is left out; the call returns only after every file
/// request has finished.
pub async fn load_cycle(
    source: &dyn ContentSource,
    bypass_cache: bool,
) -> Result<CycleOutput, FetchError> {
    let mut manifest = source.fetch_manifest(bypass_cache).await?;

    let mut seen = HashSet::new();
    manifest.names.retain(|name| seen.insert(name.clone()));
    engine_debug!(
        "Manifest lists {} files (modified_at={})",
        manifest.names.len(),
        manifest.modified_at
    );

    let results = join_all(manifest.names.iter().map(|name| source.fetch_file(name))).await;

    let mut files = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for (name, result) in manifest.names.iter().zip(results) {
        match result {
            Ok(file) => files.push(file),
            Err(error) => {
                engine_warn!("Failed to load {}: {}", name, error);
                failed.push(FileFailure {
                    name: name.clone(),
                    error,
                });
            }
        }
    }

    engine_debug!(
        "Cycle loaded {} of {} files",
        files.len(),
        manifest.names.len()
    );
    Ok(CycleOutput {
        manifest,
        files,
        failed,
    })
}
