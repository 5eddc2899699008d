//! Same-day reuse of the persisted access token.
//!
//! Freshness is decided by the token file's modification date alone: a file
//! written today (local time) is reused, anything older is replaced. The
//! vendor's real token lifetime is not consulted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};

use crate::models::AccessToken;
use crate::Result;

/// The token file on disk.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the token file exists and was last written today.
    pub async fn is_from_today(&self) -> Result<bool> {
        self.is_from(Local::now().date_naive()).await
    }

    /// Returns `true` if the token file exists and was last written on `day`.
    pub async fn is_from(&self, day: NaiveDate) -> Result<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => Ok(modified_on(metadata.modified()?, day)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// The cached token, if it was written today.
    pub async fn load_fresh(&self) -> Result<Option<AccessToken>> {
        if !self.is_from_today().await? {
            return Ok(None);
        }
        let token = tokio::fs::read_to_string(&self.path).await?;
        Ok(Some(AccessToken::new(token)))
    }

    /// Replace the file contents with the raw token, creating its directory.
    ///
    /// No trailing newline is written.
    pub async fn store(&self, token: &AccessToken) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token.expose_secret()).await?;
        Ok(())
    }
}

/// Whether a modification time falls on the given local calendar day.
pub fn modified_on(modified: SystemTime, day: NaiveDate) -> bool {
    DateTime::<Local>::from(modified).date_naive() == day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::fs::File;

    #[test]
    fn test_modified_on() {
        let now = SystemTime::now();
        let today = Local::now().date_naive();
        assert!(modified_on(now, today));
        assert!(!modified_on(now, today - Duration::days(1)));
    }

    #[tokio::test]
    async fn test_missing_file_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("access_token.txt"));

        assert!(!store.is_from_today().await.unwrap());
        assert!(store.load_fresh().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fresh_file_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access_token.txt");
        std::fs::write(&path, "tok-123\n").unwrap();

        let store = TokenStore::new(&path);
        let token = store.load_fresh().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "tok-123\n");
    }

    #[tokio::test]
    async fn test_yesterdays_file_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access_token.txt");
        std::fs::write(&path, "old").unwrap();

        let yesterday = SystemTime::now() - std::time::Duration::from_secs(36 * 60 * 60);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(yesterday)
            .unwrap();

        let store = TokenStore::new(&path);
        assert!(!store.is_from_today().await.unwrap());
        assert!(store.load_fresh().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("access_token.txt");
        let store = TokenStore::new(&path);

        store.store(&AccessToken::new("first-token-longer")).await.unwrap();
        store.store(&AccessToken::new("second")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("access_token.txt"));

        store.store(&AccessToken::new("fresh")).await.unwrap();
        let token = store.load_fresh().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "fresh");
    }
}
