//! Process-wide registry of temporary files backing Disk/Map tiers.
//!
//! spec.md §6 requires the registry to be walkable and unlinkable from a
//! signal handler, so cleanup here is a free function operating on paths
//! collected in a `Mutex<Vec<PathBuf>>` rather than relying on the
//! `tempfile` crate's `Drop`-based deletion (which allocates and is not
//! async-signal-safe). We still use `tempfile::Builder` to create the files
//! themselves — it already respects `O_EXCL`-style uniqueness — we simply
//! call `.keep()` immediately and track the path ourselves.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::random::RandomState;

fn registry() -> &'static Mutex<Vec<PathBuf>> {
    static REGISTRY: OnceLock<Mutex<Vec<PathBuf>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

/// Builds the `magick-<pid>XXXXXXXXXXXX` basename spec.md §6 specifies, with
/// the `X`s replaced by 12 random `[A-Za-z0-9_-]` characters.
pub fn temp_file_name(random: &RandomState) -> String {
    format!("magick-{}{}", std::process::id(), random.temp_suffix())
}

/// Creates a uniquely-named temp file in `dir`, opened `O_RDWR|O_CREAT|O_EXCL`
/// with mode `0600`, and registers its path for [`unlink_all`]. Retries with
/// a fresh suffix on a name collision, mirroring `O_EXCL`'s guarantee.
pub fn create(dir: &Path, random: &RandomState) -> Result<(std::fs::File, PathBuf)> {
    for _ in 0..8 {
        let path = dir.join(temp_file_name(random));
        let mut opts = OpenOptions::new();
        opts.read(true).write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
            opts.custom_flags(libc::O_NOFOLLOW);
        }
        match opts.open(&path) {
            Ok(file) => {
                registry().lock().expect("tempfile registry poisoned").push(path.clone());
                return Ok((file, path));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(Error::UnableToOpenPixelCache {
                    path: path.clone(),
                    source: err,
                })
            }
        }
    }
    Err(Error::allocation_failed(0, "exhausted temp file name retries"))
}

/// Deletes `path` and removes it from the registry. Called when a Disk/Map
/// tier closes in a non-Read mode.
pub fn remove(path: &Path) {
    let _ = std::fs::remove_file(path);
    if let Ok(mut guard) = registry().lock() {
        guard.retain(|p| p != path);
    }
}

/// Unlinks every file currently tracked by the registry.
///
/// Safe to call from a signal handler: no allocation on the success path,
/// and any filesystem error is ignored rather than propagated. The original
/// calls this `async_terminus`.
pub fn unlink_all() {
    if let Ok(mut guard) = registry().lock() {
        for path in guard.drain(..) {
            let _ = std::fs::remove_file(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_remove_round_trips() {
        let random = RandomState::new();
        let dir = std::env::temp_dir();
        let (file, path) = create(&dir, &random).expect("create");
        drop(file);
        assert!(path.exists());
        remove(&path);
        assert!(!path.exists());
    }

    #[test]
    fn name_matches_the_documented_pattern() {
        let random = RandomState::new();
        let name = temp_file_name(&random);
        assert!(name.starts_with(&format!("magick-{}", std::process::id())));
        assert_eq!(name.len(), format!("magick-{}", std::process::id()).len() + 12);
    }
}
