//! Final output placement

use std::path::Path;

use tokio::fs;
use tracing::debug;

/// Move `src` to `dst`, creating the destination directory if needed
///
/// Tries a rename first. Across filesystems (EXDEV) the file is copied to
/// `partial`, which must be on the destination's filesystem, renamed into
/// place, and the source is removed, so a partial copy never appears at
/// `dst`. `partial` is left to the caller's cleanup if the copy is abandoned.
pub async fn move_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    partial: impl AsRef<Path>,
) -> std::io::Result<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            debug!(
                "Cross-device rename detected, falling back to copy+delete: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst, partial.as_ref()).await
        }
        Err(e) => Err(e),
    }
}

/// EXDEV is 18 on Linux and macOS
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path, partial: &Path) -> std::io::Result<()> {
    if let Err(e) = fs::copy(src, partial).await {
        let _ = fs::remove_file(partial).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(partial, dst).await {
        let _ = fs::remove_file(partial).await;
        return Err(e);
    }
    fs::remove_file(src).await
}
