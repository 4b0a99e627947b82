//! Protocol module - JSON event types for the relay
//!
//! Line-delimited JSON: one event per line, tagged by `type`. The event set
//! is closed - two enums, one per direction - and consumed by a single
//! dispatcher on each side. Tile lists serialize as `[x, y]` pairs and the
//! grid as rows of cell markers (0 = empty, 1..=7 = shape symbol).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::board::{Board, GridCells, ReportedPiece};
use crate::types::{ParticipantId, ShapeId, Tile};

/// Roster entry for one connected participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub symbol: ShapeId,
    pub score: u32,
}

/// Canonical board state shipped on join and on fresh rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub grid: GridCells,
    pub piece_positions: HashMap<ParticipantId, ReportedPiece>,
    pub game_over: bool,
    pub latest_loser: Option<String>,
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        Self {
            grid: board.grid_cells(),
            piece_positions: board.piece_positions().clone(),
            game_over: board.game_over(),
            latest_loser: board.latest_loser().map(str::to_string),
        }
    }
}

/// Events a participant sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Report a placement; the relay runs the authoritative merge.
    PlacePiece { tiles: Vec<Tile>, symbol: ShapeId },
    /// Report the live piece's cells; forwarded to peers without validation.
    MovePiece {
        id: ParticipantId,
        tiles: Vec<Tile>,
        symbol: ShapeId,
    },
    /// Report the cumulative cleared-line count for the roster.
    #[serde(rename_all = "camelCase")]
    ClearedLines {
        id: ParticipantId,
        total_lines: u32,
    },
    /// The sender's session hit its terminal condition.
    PlayerLost { name: String },
}

/// Events the relay sends to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Sent once on connect: identity, canonical board, and peer roster.
    #[serde(rename_all = "camelCase")]
    SetupUser {
        user: Participant,
        board: BoardSnapshot,
        current_users: Vec<Participant>,
    },
    /// Authoritative grid after a merge; replicas overwrite wholesale.
    BoardUpdate { grid: GridCells },
    /// A peer's live piece moved.
    PieceUpdate {
        id: ParticipantId,
        tiles: Vec<Tile>,
        symbol: ShapeId,
    },
    /// Roster changed (join, score update, or leave), sorted by score.
    UsersUpdate { users: Vec<Participant> },
    /// The round ended; `name` lost.
    GameOver { name: String },
    /// A fresh round begins from this board.
    StartGame { board: BoardSnapshot },
    /// A peer disconnected; drop its live piece.
    UserDisconnect { id: ParticipantId },
}

/// Parse one inbound line. Unknown or malformed events surface as errors for
/// the caller to log and drop - they are never fatal to the relay.
pub fn parse_client_event(line: &str) -> Result<ClientEvent, serde_json::Error> {
    serde_json::from_str(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

    #[test]
    fn test_client_event_tags_match_wire_names() {
        let event = ClientEvent::PlacePiece {
            tiles: vec![(3, 22), (4, 22)],
            symbol: ShapeId::S,
        };
        let line = serde_json::to_string(&event).unwrap();
        assert!(line.contains(r#""type":"placePiece""#));
        assert!(line.contains("[3,22]"));

        let event = ClientEvent::ClearedLines {
            id: 4,
            total_lines: 11,
        };
        let line = serde_json::to_string(&event).unwrap();
        assert!(line.contains(r#""type":"clearedLines""#));
        assert!(line.contains(r#""totalLines":11"#));
    }

    #[test]
    fn test_parse_round_trip() {
        let event = ClientEvent::MovePiece {
            id: 9,
            tiles: vec![(0, 4), (1, 4), (2, 4), (3, 4)],
            symbol: ShapeId::I,
        };
        let line = serde_json::to_string(&event).unwrap();
        assert_eq!(parse_client_event(&line).unwrap(), event);
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        assert!(parse_client_event(r#"{"type":"teleportPiece"}"#).is_err());
        assert!(parse_client_event("not json").is_err());
    }

    #[test]
    fn test_server_event_tags() {
        let event = ServerEvent::GameOver {
            name: "player-2".to_string(),
        };
        let line = serde_json::to_string(&event).unwrap();
        assert!(line.contains(r#""type":"gameOver""#));

        let event = ServerEvent::UserDisconnect { id: 5 };
        let line = serde_json::to_string(&event).unwrap();
        assert!(line.contains(r#""type":"userDisconnect""#));
    }

    #[test]
    fn test_board_snapshot_round_trip() {
        let mut board = Board::new();
        board.set(2, 20, Some(ShapeId::Z));
        board.record_piece(
            3,
            ReportedPiece {
                tiles: vec![(5, 6), (6, 6)],
                symbol: ShapeId::J,
            },
        );
        board.mark_lost("player-3");

        let snapshot = BoardSnapshot::from(&board);
        let line = serde_json::to_string(&snapshot).unwrap();
        let back: BoardSnapshot = serde_json::from_str(&line).unwrap();

        assert_eq!(back, snapshot);
        assert_eq!(back.grid.len(), BOARD_HEIGHT);
        assert_eq!(back.grid[0].len(), BOARD_WIDTH);
        assert!(back.game_over);
        assert_eq!(back.latest_loser.as_deref(), Some("player-3"));
        assert_eq!(back.piece_positions[&3].symbol, ShapeId::J);
    }
}
