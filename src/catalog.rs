//! Dataset discovery.
//!
//! Lists the tile stores found directly under a directory. The listing is
//! recomputed on every call; nothing is cached.

use std::path::Path;

use tracing::{debug, warn};

/// Returns true if `path` has exactly the given extension (no leading dot).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

/// List the store files directly under `root` with the given extension.
///
/// Returns file names including the extension, sorted. Subdirectories are
/// not descended into. An unreadable directory yields an empty list rather
/// than an error.
pub async fn list_datasets(root: &Path, extension: &str) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(root = %root.display(), "Cannot read tiles directory: {}", err);
            return Vec::new();
        }
    };

    let mut datasets = Vec::new();

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                warn!(root = %root.display(), "Error while listing tiles directory: {}", err);
                break;
            }
        };

        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }

        // Follows symlinks, so a linked store file is listed too
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(err) => {
                debug!(path = %path.display(), "Skipping unreadable entry: {}", err);
                continue;
            }
        }

        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            datasets.push(name.to_string());
        }
    }

    datasets.sort();
    datasets
}
