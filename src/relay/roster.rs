//! Roster module - participant bookkeeping
//!
//! Identity assignment, symbol cycling, and the score-ordered user list the
//! relay rebroadcasts. Fancy name generation is an external concern; the
//! relay hands out plain `player-<id>` labels.

use crate::relay::protocol::Participant;
use crate::types::{ParticipantId, ShapeId};

/// Symbol assignment order for joining participants.
const SYMBOL_ORDER: [ShapeId; 7] = [
    ShapeId::Z,
    ShapeId::J,
    ShapeId::O,
    ShapeId::S,
    ShapeId::L,
    ShapeId::T,
    ShapeId::I,
];

/// Connected participants, kept sorted by score (descending).
#[derive(Debug, Default)]
pub struct Roster {
    users: Vec<Participant>,
    symbol_counter: usize,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant under the given identity and return its entry.
    pub fn add(&mut self, id: ParticipantId) -> Participant {
        let user = Participant {
            id,
            name: format!("player-{id}"),
            symbol: SYMBOL_ORDER[self.symbol_counter],
            score: 0,
        };
        self.symbol_counter = (self.symbol_counter + 1) % SYMBOL_ORDER.len();
        self.users.push(user.clone());
        user
    }

    /// Remove a participant; unknown identities are a no-op.
    pub fn remove(&mut self, id: ParticipantId) {
        self.users.retain(|user| user.id != id);
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Update a participant's score and re-sort descending. Returns false
    /// for unknown identities (a lookup miss, not an error).
    pub fn set_score(&mut self, id: ParticipantId, score: u32) -> bool {
        let Some(user) = self.users.iter_mut().find(|user| user.id == id) else {
            return false;
        };
        user.score = score;
        self.users.sort_by(|a, b| b.score.cmp(&a.score));
        true
    }

    pub fn users(&self) -> &[Participant] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_cycling_symbols() {
        let mut roster = Roster::new();
        let symbols: Vec<ShapeId> = (1..=9).map(|id| roster.add(id).symbol).collect();

        assert_eq!(&symbols[..7], &SYMBOL_ORDER);
        // The eighth participant wraps around.
        assert_eq!(symbols[7], SYMBOL_ORDER[0]);
        assert_eq!(roster.users().len(), 9);
    }

    #[test]
    fn test_names_are_plain_labels() {
        let mut roster = Roster::new();
        assert_eq!(roster.add(42).name, "player-42");
    }

    #[test]
    fn test_set_score_sorts_descending() {
        let mut roster = Roster::new();
        roster.add(1);
        roster.add(2);
        roster.add(3);

        assert!(roster.set_score(2, 5));
        assert!(roster.set_score(3, 9));

        let scores: Vec<u32> = roster.users().iter().map(|u| u.score).collect();
        assert_eq!(scores, vec![9, 5, 0]);
        assert_eq!(roster.users()[0].id, 3);
    }

    #[test]
    fn test_set_score_unknown_id_is_noop() {
        let mut roster = Roster::new();
        roster.add(1);
        assert!(!roster.set_score(99, 10));
        assert_eq!(roster.users()[0].score, 0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut roster = Roster::new();
        roster.add(1);
        roster.remove(99);
        assert_eq!(roster.users().len(), 1);
        roster.remove(1);
        assert!(roster.is_empty());
    }
}
