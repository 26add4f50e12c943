//! Session management
//!
//! A session holds the mutable state of one two-party conversation: the
//! configured language pair and the append-only turn log. Sessions live in
//! memory only and are reaped after inactivity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::watch;

use translate_agent_core::conversation::{ConversationTurn, Speaker};
use translate_agent_core::language::{Language, LanguagePair};

use crate::ServerError;

/// Session state
///
/// Locks guard short critical sections only; guards are never held across
/// await points.
pub struct Session {
    /// Session ID
    pub id: String,
    /// Configured translation direction
    pair: RwLock<LanguagePair>,
    /// Append-only conversation log
    history: RwLock<Vec<ConversationTurn>>,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    last_activity: RwLock<Instant>,
    /// Is active
    active: RwLock<bool>,
}

impl Session {
    /// Create a new session
    pub fn new(id: impl Into<String>, pair: LanguagePair) -> Self {
        Self {
            id: id.into(),
            pair: RwLock::new(pair),
            history: RwLock::new(Vec::new()),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
        }
    }

    /// Current language pair
    pub fn pair(&self) -> LanguagePair {
        *self.pair.read()
    }

    /// Replace the language pair
    pub fn set_pair(&self, pair: LanguagePair) {
        *self.pair.write() = pair;
    }

    /// Exchange source and destination atomically, returning the new pair
    pub fn swap_pair(&self) -> LanguagePair {
        let mut pair = self.pair.write();
        pair.swap();
        *pair
    }

    /// Append a turn, assigning the speaker by turn parity
    pub fn push_turn(
        &self,
        transcript: impl Into<String>,
        translation: impl Into<String>,
        src: Language,
        dst: Language,
    ) -> ConversationTurn {
        let mut history = self.history.write();
        let speaker = Speaker::from_turn_index(history.len());
        let turn = ConversationTurn::new(speaker, transcript, translation, src, dst);
        history.push(turn.clone());
        turn
    }

    /// Snapshot of the conversation log
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.history.read().clone()
    }

    /// Number of turns so far
    pub fn turn_count(&self) -> usize {
        self.history.read().len()
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Close session
    pub fn close(&self) {
        *self.active.write() = false;
    }

    /// Is session active
    pub fn is_active(&self) -> bool {
        *self.active.read()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Create a new session manager with default timing
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout: Duration::from_secs(1800),
            cleanup_interval: Duration::from_secs(60),
        }
    }

    /// Create a new session manager with custom timeout and cleanup interval
    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Returns a shutdown sender used to stop the task. The task runs every
    /// `cleanup_interval` and removes sessions that have exceeded
    /// `session_timeout` since their last activity.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                "Session cleanup: removed {} expired sessions ({} remaining)",
                                before - after,
                                after
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session with the given language pair
    pub fn create(&self, pair: LanguagePair) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            // Reclaim capacity from expired sessions before refusing
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Session("Max sessions reached".to_string()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id, pair));
        sessions.insert(id.clone(), session.clone());

        tracing::info!(session_id = %id, pair = %pair, "Created session");

        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session
    pub fn remove(&self, id: &str) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.remove(id) {
            session.close();
            tracing::info!("Removed session: {}", id);
        }
    }

    /// Get active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Cleanup expired sessions
    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            if let Some(session) = sessions.remove(&id) {
                session.close();
                tracing::info!("Expired session: {}", id);
            }
        }
    }

    /// List all session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let manager = SessionManager::new(10);
        let session = manager.create(LanguagePair::default()).unwrap();

        assert!(session.is_active());
        assert!(!session.is_expired(Duration::from_secs(60)));
        assert_eq!(session.pair(), LanguagePair::default());
    }

    #[test]
    fn test_session_get() {
        let manager = SessionManager::new(10);
        let session = manager.create(LanguagePair::default()).unwrap();
        let id = session.id.clone();

        let retrieved = manager.get(&id);
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().id, id);
    }

    #[test]
    fn test_session_remove() {
        let manager = SessionManager::new(10);
        let session = manager.create(LanguagePair::default()).unwrap();
        let id = session.id.clone();

        manager.remove(&id);
        assert!(manager.get(&id).is_none());
        assert!(!session.is_active());
    }

    #[test]
    fn test_capacity_limit() {
        let manager = SessionManager::new(1);
        let _first = manager.create(LanguagePair::default()).unwrap();

        let second = manager.create(LanguagePair::default());
        assert!(second.is_err());
    }

    #[test]
    fn test_swap_exchanges_both_fields() {
        let manager = SessionManager::new(10);
        let session = manager.create(LanguagePair::default()).unwrap();

        let swapped = session.swap_pair();
        assert_eq!(swapped.src, Language::Japanese);
        assert_eq!(swapped.dst, Language::Vietnamese);
        assert_eq!(session.pair(), swapped);
    }

    #[test]
    fn test_turn_parity() {
        let manager = SessionManager::new(10);
        let session = manager.create(LanguagePair::default()).unwrap();

        let first = session.push_turn("a", "b", Language::Vietnamese, Language::Japanese);
        let second = session.push_turn("c", "d", Language::Japanese, Language::Vietnamese);
        let third = session.push_turn("e", "f", Language::Vietnamese, Language::Japanese);

        assert_eq!(first.speaker, Speaker::A);
        assert_eq!(second.speaker, Speaker::B);
        assert_eq!(third.speaker, Speaker::A);
        assert_eq!(session.turn_count(), 3);
    }

    #[test]
    fn test_cleanup_removes_expired() {
        let manager =
            SessionManager::with_config(10, Duration::from_millis(1), Duration::from_secs(60));
        let _session = manager.create(LanguagePair::default()).unwrap();

        std::thread::sleep(Duration::from_millis(10));
        manager.cleanup_expired();

        assert_eq!(manager.count(), 0);
    }
}
