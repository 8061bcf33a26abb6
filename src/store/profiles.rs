//! Durable user profiles
//!
//! One JSON file holds the whole store: a map of username to record plus the
//! current-session username. Anything unreadable on disk (missing file,
//! corrupt JSON) degrades to the empty default store rather than an error,
//! so a damaged file costs saved scores but never the ability to play.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default file name for the profile store
pub const STORE_FILE: &str = "snake_profiles.json";

/// Everything remembered about one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    pub high_score: u32,
    pub games_played: u32,
    pub total_score: u64,
    pub created_at: u64,
    pub last_login: u64,
}

/// Aggregate play statistics for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub high_score: u32,
    pub games_played: u32,
    pub total_score: u64,
}

/// The single namespaced record serialized to disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreRoot {
    users: BTreeMap<String, UserRecord>,
    current: Option<String>,
}

/// File-backed profile store
///
/// Every mutating operation writes through to disk immediately; a failed
/// write is logged and play continues with the in-memory state.
pub struct ProfileStore {
    path: PathBuf,
    root: StoreRoot,
}

impl ProfileStore {
    /// Open the store at `path`, falling back to an empty store when the
    /// file is missing or unparseable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let root = Self::load(&path);
        Self { path, root }
    }

    fn load(path: &Path) -> StoreRoot {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::debug!("profile store at {:?} is unparseable ({err}), starting empty", path);
                StoreRoot::default()
            }),
            Err(err) => {
                log::debug!("profile store at {:?} not readable ({err}), starting empty", path);
                StoreRoot::default()
            }
        }
    }

    /// Serialize the store back to its file, creating parent directories
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.root)
            .context("Failed to serialize profile store")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write profile store to {:?}", self.path))?;
        Ok(())
    }

    fn write_through(&self) {
        if let Err(err) = self.flush() {
            log::warn!("profile store save failed: {err:#}");
        }
    }

    pub fn get_user(&self, name: &str) -> Option<UserRecord> {
        self.root.users.get(name).cloned()
    }

    /// Insert a brand-new user and persist it
    pub fn create_user(&mut self, name: &str, secret: &str) -> UserRecord {
        let now = now_epoch_secs();
        let record = UserRecord {
            password: secret.to_string(),
            high_score: 0,
            games_played: 0,
            total_score: 0,
            created_at: now,
            last_login: now,
        };
        self.root.users.insert(name.to_string(), record.clone());
        self.write_through();
        record
    }

    pub fn verify_password(&self, name: &str, secret: &str) -> bool {
        self.root
            .users
            .get(name)
            .is_some_and(|record| record.password == secret)
    }

    pub fn update_login_time(&mut self, name: &str) {
        if let Some(record) = self.root.users.get_mut(name) {
            record.last_login = now_epoch_secs();
            self.write_through();
        }
    }

    pub fn set_current_user(&mut self, name: Option<&str>) {
        self.root.current = name.map(str::to_string);
        self.write_through();
    }

    pub fn get_current_user(&self) -> Option<String> {
        self.root.current.clone()
    }

    /// Fold a finished game into the user's aggregates
    pub fn update_game_stats(&mut self, name: &str, score: u32) {
        if let Some(record) = self.root.users.get_mut(name) {
            record.games_played += 1;
            record.total_score += u64::from(score);
            if score > record.high_score {
                record.high_score = score;
            }
            self.write_through();
        }
    }

    /// Stats for `name`; zeroes when the user is unknown
    pub fn get_user_stats(&self, name: &str) -> UserStats {
        self.root
            .users
            .get(name)
            .map(|record| UserStats {
                high_score: record.high_score,
                games_played: record.games_played,
                total_score: record.total_score,
            })
            .unwrap_or_default()
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ProfileStore {
        ProfileStore::open(dir.path().join(STORE_FILE))
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get_user("alice").is_none());
        assert!(store.get_current_user().is_none());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = ProfileStore::open(&path);
        assert!(store.get_user("alice").is_none());
        assert_eq!(store.get_user_stats("alice"), UserStats::default());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);

        {
            let mut store = ProfileStore::open(&path);
            store.create_user("alice", "abc");
            store.update_game_stats("alice", 40);
            store.set_current_user(Some("alice"));
        }

        let store = ProfileStore::open(&path);
        let record = store.get_user("alice").unwrap();
        assert_eq!(record.password, "abc");
        assert_eq!(record.high_score, 40);
        assert_eq!(record.games_played, 1);
        assert_eq!(store.get_current_user().as_deref(), Some("alice"));
    }

    #[test]
    fn password_verification() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.create_user("alice", "abc");

        assert!(store.verify_password("alice", "abc"));
        assert!(!store.verify_password("alice", "wrong"));
        assert!(!store.verify_password("nobody", "abc"));
    }

    #[test]
    fn game_stats_accumulate_and_track_the_best() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.create_user("alice", "abc");

        store.update_game_stats("alice", 30);
        store.update_game_stats("alice", 10);
        store.update_game_stats("alice", 50);

        let stats = store.get_user_stats("alice");
        assert_eq!(stats.high_score, 50);
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.total_score, 90);
    }

    #[test]
    fn stats_for_unknown_user_are_zeroed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get_user_stats("ghost"), UserStats::default());
    }

    #[test]
    fn update_game_stats_for_unknown_user_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.update_game_stats("ghost", 10);
        assert_eq!(store.get_user_stats("ghost"), UserStats::default());
    }
}
