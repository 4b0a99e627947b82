//! Core module - pure game logic with no networking or I/O
//!
//! This module contains the piece geometry, the shared board, the shape
//! supply, and the per-participant session lifecycle.

pub mod board;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod session;
pub mod timer;

// Re-export commonly used types
pub use board::{Board, GridCells, ReportedPiece, Resolved};
pub use piece::{Piece, PiecePose};
pub use rng::ShapeGenerator;
pub use session::{GameSession, Placement, SessionCommand, SessionEvent};
