//! Directory preparation for on-disk caches.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

use crate::CacheError;

/// Create the directory that will hold the cache file at `path`.
pub(crate) fn ensure_cache_dir(path: &Utf8Path) -> Result<(), CacheError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") || parent.is_dir() {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    let failed = |source| CacheError::CreateDirectory {
        path: parent.to_path_buf(),
        source,
    };
    let dir = fs_utf8::Dir::open_ambient_dir(base, ambient_authority()).map_err(failed)?;
    dir.create_dir_all(Utf8PathBuf::from(relative)).map_err(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn creates_nested_directories() {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        let target = root.join("nested/deeper/geoplanet.db");

        ensure_cache_dir(&target).expect("create parents");

        assert!(root.join("nested/deeper").is_dir());
    }

    #[rstest]
    fn bare_file_names_need_no_directory() {
        ensure_cache_dir(Utf8Path::new("geoplanet.db")).expect("nothing to create");
    }
}
