//! Session and login handling over the profile store
//!
//! Login auto-registers unknown usernames. Failures come back as a
//! `LoginOutcome` value with a human-readable reason; nothing in here panics
//! or returns an error to the caller.

use crate::store::{ProfileStore, UserStats};

/// Reserved username for guest sessions; never written to the store
pub const GUEST_USER: &str = "@guest";

/// Minimum password length accepted at registration and login
const MIN_SECRET_LEN: usize = 3;

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
    pub is_new_user: bool,
}

impl LoginOutcome {
    fn ok(message: impl Into<String>, is_new_user: bool) -> Self {
        Self {
            success: true,
            message: message.into(),
            is_new_user,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            is_new_user: false,
        }
    }
}

pub struct AuthService {
    store: ProfileStore,
}

impl AuthService {
    pub fn new(store: ProfileStore) -> Self {
        Self { store }
    }

    /// Log in as `name`, registering the user when unknown
    ///
    /// Rejects an empty or reserved username, a secret shorter than three
    /// characters, and a wrong secret for an existing user.
    pub fn login(&mut self, name: &str, secret: &str) -> LoginOutcome {
        let name = name.trim();
        if name.is_empty() {
            return LoginOutcome::fail("Username cannot be empty");
        }
        if name == GUEST_USER {
            return LoginOutcome::fail("That username is reserved");
        }
        if secret.len() < MIN_SECRET_LEN {
            return LoginOutcome::fail("Password must be at least 3 characters");
        }

        match self.store.get_user(name) {
            Some(_) => {
                if !self.store.verify_password(name, secret) {
                    return LoginOutcome::fail("Incorrect password");
                }
                self.store.update_login_time(name);
                self.store.set_current_user(Some(name));
                log::info!("user {name} logged in");
                LoginOutcome::ok(format!("Welcome back, {name}!"), false)
            }
            None => {
                self.store.create_user(name, secret);
                self.store.set_current_user(Some(name));
                log::info!("user {name} registered");
                LoginOutcome::ok(format!("Account created. Welcome, {name}!"), true)
            }
        }
    }

    /// Start a guest session: stats read as zero and nothing is persisted
    pub fn login_as_guest(&mut self) {
        self.store.set_current_user(Some(GUEST_USER));
    }

    pub fn logout(&mut self) {
        self.store.set_current_user(None);
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get_current_user().is_some()
    }

    pub fn is_guest(&self) -> bool {
        self.store.get_current_user().as_deref() == Some(GUEST_USER)
    }

    pub fn current_username(&self) -> Option<String> {
        self.store.get_current_user()
    }

    /// Stats for the session user; zeroes for guests and logged-out sessions
    pub fn current_user_stats(&self) -> UserStats {
        match self.store.get_current_user() {
            Some(name) if name != GUEST_USER => self.store.get_user_stats(&name),
            _ => UserStats::default(),
        }
    }

    /// Fold a finished game's score into the session user's durable stats;
    /// guest games are dropped
    pub fn record_game(&mut self, score: u32) {
        match self.store.get_current_user() {
            Some(name) if name != GUEST_USER => self.store.update_game_stats(&name, score),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::STORE_FILE;
    use tempfile::TempDir;

    fn auth_in(dir: &TempDir) -> AuthService {
        AuthService::new(ProfileStore::open(dir.path().join(STORE_FILE)))
    }

    #[test]
    fn first_login_registers() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        let outcome = auth.login("alice", "abc");
        assert!(outcome.success);
        assert!(outcome.is_new_user);
        assert!(auth.is_logged_in());
        assert_eq!(auth.current_username().as_deref(), Some("alice"));
    }

    #[test]
    fn second_login_is_a_login_not_a_re_registration() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        auth.login("alice", "abc");
        auth.record_game(30);
        auth.logout();

        let outcome = auth.login("alice", "abc");
        assert!(outcome.success);
        assert!(!outcome.is_new_user);
        // Registration would have wiped these.
        assert_eq!(auth.current_user_stats().high_score, 30);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        auth.login("alice", "abc");
        auth.logout();

        let outcome = auth.login("alice", "xyz");
        assert!(!outcome.success);
        assert!(outcome.message.contains("password"));
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn empty_username_and_short_secret_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        assert!(!auth.login("", "abc").success);
        assert!(!auth.login("   ", "abc").success);
        assert!(!auth.login("alice", "ab").success);
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn guest_session_has_zeroed_stats_and_persists_nothing() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        auth.login_as_guest();
        assert!(auth.is_logged_in());
        assert!(auth.is_guest());
        assert_eq!(auth.current_user_stats(), UserStats::default());

        auth.record_game(50);
        assert_eq!(auth.current_user_stats(), UserStats::default());

        // No guest record ever lands in the store.
        let store = ProfileStore::open(dir.path().join(STORE_FILE));
        assert!(store.get_user(GUEST_USER).is_none());
    }

    #[test]
    fn guest_username_cannot_be_registered() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);
        assert!(!auth.login(GUEST_USER, "abc").success);
    }

    #[test]
    fn logout_clears_the_session() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        auth.login("alice", "abc");
        auth.logout();
        assert!(!auth.is_logged_in());
        assert!(!auth.is_guest());
        assert_eq!(auth.current_user_stats(), UserStats::default());
    }

    #[test]
    fn recorded_games_reach_the_store() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_in(&dir);

        auth.login("alice", "abc");
        auth.record_game(20);
        auth.record_game(40);

        let stats = auth.current_user_stats();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.high_score, 40);
        assert_eq!(stats.total_score, 60);
    }
}
