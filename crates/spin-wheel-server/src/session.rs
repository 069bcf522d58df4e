//! Wheel sessions opened by successful registrations.

use chrono::{DateTime, Utc};
use prize_draw::{OutcomeTable, PrizeDraw};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;

/// Session id length in random bytes (hex-encoded to twice as many chars).
const SESSION_ID_BYTES: usize = 16;

/// A registrant's pass through the wheel.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque hex token handed back to the client
    pub id: String,

    /// Registrant display name
    pub name: String,

    /// Registrant phone number as submitted
    pub mobile: String,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// Single-use draw for this session
    pub draw: PrizeDraw,
}

/// In-memory sessions keyed by id.
pub struct SessionRegistry {
    table: Arc<OutcomeTable>,
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new(table: Arc<OutcomeTable>) -> Self {
        Self {
            table,
            sessions: HashMap::new(),
        }
    }

    /// Open a new session with a fresh, unused draw.
    pub fn open(&mut self, name: String, mobile: String) -> &Session {
        let mut id = new_session_id();
        while self.sessions.contains_key(&id) {
            id = new_session_id();
        }

        let session = Session {
            id: id.clone(),
            name,
            mobile,
            created_at: Utc::now(),
            draw: PrizeDraw::new(self.table.clone()),
        };
        self.sessions.entry(id).or_insert(session)
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Number of open sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn table(&self) -> &OutcomeTable {
        &self.table
    }
}

fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prize_draw::DrawState;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(OutcomeTable::promotional()))
    }

    #[test]
    fn test_open_session() {
        let mut sessions = registry();
        let session = sessions.open("Ada".into(), "9999999999".into());

        assert_eq!(session.id.len(), 32);
        assert!(session.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(session.name, "Ada");
        assert_eq!(session.draw.state(), DrawState::NotDrawn);
    }

    #[test]
    fn test_session_ids_unique() {
        let mut sessions = registry();
        let first = sessions.open("A".into(), "1".into()).id.clone();
        let second = sessions.open("B".into(), "2".into()).id.clone();

        assert_ne!(first, second);
        assert_eq!(sessions.count(), 2);
    }

    #[test]
    fn test_draw_state_is_per_session() {
        let mut sessions = registry();
        let first = sessions.open("A".into(), "1".into()).id.clone();
        let second = sessions.open("B".into(), "2".into()).id.clone();

        sessions.get_mut(&first).unwrap().draw.draw_at(0.05).unwrap();

        assert!(sessions.get(&first).unwrap().draw.is_drawn());
        assert!(!sessions.get(&second).unwrap().draw.is_drawn());
    }

    #[test]
    fn test_unknown_session() {
        let sessions = registry();
        assert!(sessions.get("deadbeef").is_none());
    }
}
