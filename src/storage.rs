use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::KeggError;

pub const DEFAULT_CACHE_DIR: &str = ".keggtools_cache";

/// Flat key-value file cache. Every key is a file name inside one directory.
#[derive(Debug, Clone)]
pub struct Storage {
    cache_dir: Utf8PathBuf,
}

impl Storage {
    /// Opens the cache at `cache_dir`, creating the directory when absent.
    pub fn new(cache_dir: impl Into<Utf8PathBuf>) -> Result<Self, KeggError> {
        let cache_dir = cache_dir.into();
        if !cache_dir.as_std_path().is_dir() {
            tracing::info!(path = %cache_dir, "creating cache directory");
            fs::create_dir_all(cache_dir.as_std_path())
                .map_err(|err| KeggError::Filesystem(err.to_string()))?;
        }
        Ok(Self { cache_dir })
    }

    /// `<cwd>/.keggtools_cache`
    pub fn default_dir() -> Result<Utf8PathBuf, KeggError> {
        let cwd = std::env::current_dir().map_err(|err| KeggError::Filesystem(err.to_string()))?;
        Utf8PathBuf::from_path_buf(cwd.join(DEFAULT_CACHE_DIR))
            .map_err(|_| KeggError::Filesystem("invalid cache path".to_string()))
    }

    pub fn cache_dir(&self) -> &Utf8Path {
        &self.cache_dir
    }

    pub fn check_cache_dir(&self) -> Result<(), KeggError> {
        if !self.cache_dir.as_std_path().is_dir() {
            return Err(KeggError::CacheDirMissing(
                self.cache_dir.as_std_path().to_path_buf(),
            ));
        }
        Ok(())
    }

    pub fn build_cache_path(&self, key: &str) -> Result<Utf8PathBuf, KeggError> {
        self.check_cache_dir()?;
        Ok(self.cache_dir.join(key))
    }

    pub fn exist(&self, key: &str) -> Result<bool, KeggError> {
        Ok(self.build_cache_path(key)?.as_std_path().is_file())
    }

    pub fn save(&self, key: &str, data: &str) -> Result<Utf8PathBuf, KeggError> {
        let path = self.build_cache_path(key)?;
        write_atomic(&path, data.as_bytes())?;
        tracing::debug!(key, path = %path, "saved cache entry");
        Ok(path)
    }

    pub fn load(&self, key: &str) -> Result<String, KeggError> {
        let path = self.existing_path(key)?;
        fs::read_to_string(path.as_std_path()).map_err(|err| KeggError::Filesystem(err.to_string()))
    }

    /// Stores any serializable value as a JSON dump.
    pub fn save_dump<T: Serialize>(&self, key: &str, data: &T) -> Result<Utf8PathBuf, KeggError> {
        let path = self.build_cache_path(key)?;
        let content =
            serde_json::to_vec(data).map_err(|err| KeggError::Serialization(err.to_string()))?;
        write_atomic(&path, &content)?;
        Ok(path)
    }

    pub fn load_dump<T: DeserializeOwned>(&self, key: &str) -> Result<T, KeggError> {
        let path = self.existing_path(key)?;
        let content =
            fs::read(path.as_std_path()).map_err(|err| KeggError::Filesystem(err.to_string()))?;
        serde_json::from_slice(&content).map_err(|err| KeggError::Serialization(err.to_string()))
    }

    fn existing_path(&self, key: &str) -> Result<Utf8PathBuf, KeggError> {
        let path = self.build_cache_path(key)?;
        if !path.as_std_path().is_file() {
            return Err(KeggError::CacheMiss(key.to_string()));
        }
        Ok(path)
    }
}

/// Writes `content` to a temp file next to `path`, then renames it into place.
pub fn write_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), KeggError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent.as_std_path()).map_err(|err| KeggError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix(".kegg-tools")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| KeggError::Filesystem(err.to_string()))?;
    std::io::Write::write_all(&mut temp, content)
        .map_err(|err| KeggError::Filesystem(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| KeggError::Filesystem(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nested").join("file.txt")).unwrap();
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(path.as_std_path()).unwrap(), "second");
    }

    #[test]
    fn default_dir_ends_with_cache_name() {
        let dir = Storage::default_dir().unwrap();
        assert!(dir.ends_with(DEFAULT_CACHE_DIR));
    }
}
