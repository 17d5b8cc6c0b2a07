use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::error::CarlotError;
use crate::middleware::car_submission::UploadedFile;

/// Subdirectory of the media root holding car images.
pub const CARS_DIR: &str = "cars";

/// Write an uploaded image under `<root>/cars/` and return its path relative to `root`.
pub async fn store_upload(
    root: &Path,
    file: &UploadedFile,
    extension: &str,
) -> Result<String, CarlotError> {
    let dir = root.join(CARS_DIR);
    fs::create_dir_all(&dir).await?;

    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let name = format!("{}_{nanos}.{extension}", sanitized_stem(&file.filename));
    let relative = format!("{CARS_DIR}/{name}");

    let target: PathBuf = dir.join(&name);
    fs::write(&target, &file.bytes).await?;
    info!(path = %target.display(), bytes = file.bytes.len(), "stored car image");
    Ok(relative)
}

/// Delete an upload written by [`store_upload`] whose row never got saved.
pub async fn remove_upload(root: &Path, relative: &str) {
    let target = root.join(relative);
    match fs::remove_file(&target).await {
        Ok(()) => info!(path = %target.display(), "removed unsaved car image"),
        Err(e) => warn!(path = %target.display(), error = %e, "failed to remove unsaved car image"),
    }
}

fn sanitized_stem(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = Path::new(base)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(64)
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
