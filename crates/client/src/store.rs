//! Persistent storage for the bearer token.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Where the session token lives between requests (and between runs).
pub trait TokenStore: Send + Sync {
    fn get(&self) -> std::io::Result<Option<String>>;
    fn set(&self, token: &str) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

/// Token kept in a single file. A missing or blank file means "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The file is readable by its owner only.
    fn set(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(TOKEN_FILE_MODE);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten a file left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(TOKEN_FILE_MODE))?;
        }

        file.write_all(token.as_bytes())?;
        file.sync_all()
    }

    fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Process-local token, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds a valid Option.
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> std::io::Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn set(&self, token: &str) -> std::io::Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/token"));

        assert_eq!(store.get().unwrap(), None);
        store.set("abc123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc123"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn blank_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(path).get().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let store = FileTokenStore::new(&path);

        store.set("secret").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // A pre-existing world-readable file is tightened on overwrite.
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        store.set("rotated").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.get().unwrap().as_deref(), Some("rotated"));
    }

    #[test]
    fn memory_store() {
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(store.get().unwrap().as_deref(), Some("t"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
