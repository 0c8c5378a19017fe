use crate::file::{DATA_DIR, RECORD_SUFFIX, TMP_MARKER};
use crate::key::StoreKey;
use std::path::Path;
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Removes temp files left by interrupted writes and prunes empty shard directories.
///
/// Runs before any writer exists, so every temp file found is orphaned.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    match tokio::task::spawn_blocking(move || remove_orphans(&root)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up orphaned temp files");
        },
        Err(e) => error!(error = %e, "Temp file cleanup task panicked"),
        _ => {},
    }
}

fn remove_orphans(root: &Path) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;
    let data = root.join(DATA_DIR);

    WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .flatten()
        .filter(|e| e.path() != root && e.path() != data)
        .for_each(|entry| {
            let path = entry.path();
            if is_tmp(&entry) {
                match std::fs::remove_file(path) {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Temp file removal failed");
                        failed += 1;
                    },
                }
            } else if entry.file_type().is_dir() {
                // Fails harmlessly on non-empty shards.
                let _ = std::fs::remove_dir(path);
            }
        });

    (removed, failed)
}

/// Collects every record key under `data`.
pub(crate) fn scan_keys(data: &Path) -> Vec<StoreKey> {
    WalkDir::new(data)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file() && !is_tmp(e))
        .filter_map(|e| {
            let name = e.file_name().to_str()?.strip_suffix(RECORD_SUFFIX)?.to_owned();
            StoreKey::new(name)
                .inspect_err(|err| warn!(path = %e.path().display(), error = %err, "Skipping foreign file"))
                .ok()
        })
        .collect()
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}
