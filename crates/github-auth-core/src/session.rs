use serde::{Deserialize, Serialize};

/// The authenticated identity a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccount {
    pub id: String,
    pub label: String,
}

/// A provider-issued identity + token + granted-scopes record held for the
/// host application. Serialized field names are part of the persisted
/// layout and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationSession {
    pub id: String,
    pub access_token: String,
    pub account: SessionAccount,
    pub scopes: Vec<String>,
}

/// Change notification emitted by the session manager.
#[derive(Debug, Clone, Default)]
pub struct SessionChangeEvent {
    pub added: Vec<AuthenticationSession>,
    pub removed: Vec<AuthenticationSession>,
}

impl SessionChangeEvent {
    pub fn added(session: AuthenticationSession) -> Self {
        Self {
            added: vec![session],
            removed: Vec::new(),
        }
    }

    pub fn removed(session: AuthenticationSession) -> Self {
        Self {
            added: Vec::new(),
            removed: vec![session],
        }
    }
}

/// In-memory working copy of the session collection together with the
/// process-wide session sequence counter.
///
/// The counter starts at 1, advances once per flow that constructs a
/// session id, and is never persisted; persisted ids are opaque to the
/// host beyond equality, so collisions with sessions from a previous
/// process are acceptable.
#[derive(Debug)]
pub struct SessionState {
    sessions: Vec<AuthenticationSession>,
    sequence: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            sequence: 1,
        }
    }

    /// Consume and return the current sequence number.
    pub fn next_sequence(&mut self) -> u64 {
        let current = self.sequence;
        self.sequence += 1;
        current
    }

    pub fn sessions(&self) -> &[AuthenticationSession] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Replace the working collection wholesale, as on restore.
    pub fn replace(&mut self, sessions: Vec<AuthenticationSession>) {
        self.sessions = sessions;
    }

    pub fn push(&mut self, session: AuthenticationSession) {
        self.sessions.push(session);
    }

    pub fn remove(&mut self, session_id: &str) -> Option<AuthenticationSession> {
        let index = self
            .sessions
            .iter()
            .position(|session| session.id == session_id)?;
        Some(self.sessions.remove(index))
    }

    /// Sessions whose granted scopes contain every requested scope, in
    /// collection order.
    pub fn matching(&self, scopes: &[String]) -> Vec<AuthenticationSession> {
        self.sessions
            .iter()
            .filter(|session| scopes.iter().all(|scope| session.scopes.contains(scope)))
            .cloned()
            .collect()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, scopes: &[&str]) -> AuthenticationSession {
        AuthenticationSession {
            id: id.to_owned(),
            access_token: format!("token-{id}"),
            account: SessionAccount {
                id: "account1".to_owned(),
                label: "Account 1".to_owned(),
            },
            scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn sequence_starts_at_one_and_advances() {
        let mut state = SessionState::new();
        assert_eq!(state.next_sequence(), 1);
        assert_eq!(state.next_sequence(), 2);
    }

    #[test]
    fn remove_returns_the_removed_session() {
        let mut state = SessionState::new();
        state.push(session("session1", &[]));
        state.push(session("session2", &[]));

        let removed = state.remove("session1").unwrap();
        assert_eq!(removed.id, "session1");
        assert_eq!(state.sessions().len(), 1);
        assert!(state.remove("session1").is_none());
    }

    #[test]
    fn matching_requires_every_requested_scope() {
        let mut state = SessionState::new();
        state.push(session("session1", &["scope 1", "scope 2"]));
        state.push(session("session2", &["scope 1"]));
        state.push(session("session3", &[]));

        let matched = state.matching(&["scope 2".to_owned(), "scope 1".to_owned()]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "session1");
    }

    #[test]
    fn serialized_layout_uses_camel_case_token_field() {
        let payload = serde_json::to_string(&session("session1", &["repo"])).unwrap();
        assert!(payload.contains("\"accessToken\":\"token-session1\""));
        assert!(payload.contains("\"account\":{\"id\":\"account1\",\"label\":\"Account 1\"}"));
    }
}
