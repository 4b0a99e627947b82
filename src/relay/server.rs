//! Relay server - cross-participant coordination over TCP
//!
//! Holds the single canonical board. All socket tasks funnel their events
//! through one mpsc channel into the board task, so every merge runs to
//! completion before the next event is handled - single-writer by
//! construction, no locks. Per-connection writer tasks drain unbounded
//! outbound channels; a participant that stops reading only hurts itself.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use crate::core::board::{Board, ReportedPiece, Resolved};
use crate::relay::protocol::{parse_client_event, BoardSnapshot, ClientEvent, ServerEvent};
use crate::relay::roster::Roster;
use crate::types::{ParticipantId, RESET_DELAY_MS};

/// Relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub reset_delay_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            reset_delay_ms: RESET_DELAY_MS,
        }
    }
}

impl RelayConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("TETRIS_RELAY_HOST").unwrap_or(defaults.host);
        let port = env::var("TETRIS_RELAY_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let reset_delay_ms = env::var("TETRIS_RELAY_RESET_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.reset_delay_ms);

        Self {
            host,
            port,
            reset_delay_ms,
        }
    }
}

/// Everything that reaches the board task goes through this one message
/// type; there is no other path to the canonical state.
enum RelayMessage {
    Joined {
        id: ParticipantId,
        tx: mpsc::UnboundedSender<ServerEvent>,
    },
    Event {
        id: ParticipantId,
        event: ClientEvent,
    },
    Left {
        id: ParticipantId,
    },
    /// Internal: the post-loss reset delay elapsed.
    ResetRound,
}

/// Run the relay. Binds, reports the bound address through `ready_tx` (used
/// by tests binding port 0), then accepts participants forever.
pub async fn run_relay(
    config: RelayConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    println!("[Relay] listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let (msg_tx, msg_rx) = mpsc::unbounded_channel::<RelayMessage>();

    // The single writer of the canonical board.
    {
        let msg_tx = msg_tx.clone();
        let reset_delay = Duration::from_millis(config.reset_delay_ms);
        tokio::spawn(async move {
            board_task(msg_rx, msg_tx, reset_delay).await;
        });
    }

    let mut next_id: ParticipantId = 0;
    loop {
        let (socket, addr) = listener.accept().await?;
        next_id += 1;
        let id = next_id;
        println!("[Relay] participant {} connected from {}", id, addr);

        let msg_tx = msg_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_participant(socket, id, msg_tx).await {
                eprintln!("[Relay] participant {} connection error: {}", id, e);
            }
            println!("[Relay] participant {} disconnected", id);
        });
    }
}

/// Per-connection task: register with the board task, then shuttle lines.
async fn handle_participant(
    socket: TcpStream,
    id: ParticipantId,
    msg_tx: mpsc::UnboundedSender<RelayMessage>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    if msg_tx.send(RelayMessage::Joined { id, tx }).is_err() {
        return Ok(());
    }

    // Writer task: the board task owns the sender; when it drops the entry
    // on Left, this loop ends.
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(event) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &event).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_client_event(trimmed) {
            Ok(event) => {
                if msg_tx.send(RelayMessage::Event { id, event }).is_err() {
                    break;
                }
            }
            Err(e) => {
                // Malformed or unknown events are dropped, never fatal.
                eprintln!("[Relay] participant {} sent an unreadable event: {}", id, e);
            }
        }
    }

    let _ = msg_tx.send(RelayMessage::Left { id });
    let _ = write_task.await;
    Ok(())
}

struct RelayState {
    board: Board,
    roster: Roster,
    clients: HashMap<ParticipantId, mpsc::UnboundedSender<ServerEvent>>,
}

impl RelayState {
    fn send_all(&self, event: ServerEvent) {
        for tx in self.clients.values() {
            let _ = tx.send(event.clone());
        }
    }

    fn send_others(&self, except: ParticipantId, event: ServerEvent) {
        for (id, tx) in &self.clients {
            if *id != except {
                let _ = tx.send(event.clone());
            }
        }
    }

    fn roster_update(&self) -> ServerEvent {
        ServerEvent::UsersUpdate {
            users: self.roster.users().to_vec(),
        }
    }
}

/// Owns the canonical board and roster; processes one message at a time.
async fn board_task(
    mut msg_rx: mpsc::UnboundedReceiver<RelayMessage>,
    msg_tx: mpsc::UnboundedSender<RelayMessage>,
    reset_delay: Duration,
) {
    let mut state = RelayState {
        board: Board::new(),
        roster: Roster::new(),
        clients: HashMap::new(),
    };

    while let Some(message) = msg_rx.recv().await {
        match message {
            RelayMessage::Joined { id, tx } => {
                let user = state.roster.add(id);
                let _ = tx.send(ServerEvent::SetupUser {
                    user,
                    board: BoardSnapshot::from(&state.board),
                    current_users: state.roster.users().to_vec(),
                });
                state.clients.insert(id, tx);
                state.send_others(id, state.roster_update());
            }

            RelayMessage::Event { id, event } => {
                handle_event(&mut state, &msg_tx, reset_delay, id, event);
            }

            RelayMessage::Left { id } => {
                state.clients.remove(&id);
                state.roster.remove(id);
                state.board.remove_piece(id);
                state.send_all(state.roster_update());
                state.send_all(ServerEvent::UserDisconnect { id });
            }

            RelayMessage::ResetRound => {
                state.board.reset_round();
                println!("[Relay] starting a fresh round");
                state.send_all(ServerEvent::StartGame {
                    board: BoardSnapshot::from(&state.board),
                });
            }
        }
    }
}

/// The single merge/dispatch entry point for participant events.
fn handle_event(
    state: &mut RelayState,
    msg_tx: &mpsc::UnboundedSender<RelayMessage>,
    reset_delay: Duration,
    sender: ParticipantId,
    event: ClientEvent,
) {
    // Anything arriving once the board is terminal is stale; drop it.
    if state.board.game_over() {
        return;
    }

    match event {
        ClientEvent::PlacePiece { tiles, symbol } => {
            // Authoritative merge: resolve conflicts against the canonical
            // grid, not the sender's replica.
            match state.board.free_tiles(&tiles) {
                Resolved::Free(tiles) => {
                    state.board.set_tiles(&tiles, symbol);
                    state.board.clear_lines();
                    state.send_all(ServerEvent::BoardUpdate {
                        grid: state.board.grid_cells(),
                    });
                }
                Resolved::Fatal(_) => {
                    let name = state
                        .roster
                        .get(sender)
                        .map(|user| user.name.clone())
                        .unwrap_or_else(|| format!("player-{sender}"));
                    end_round(state, msg_tx, reset_delay, name);
                }
            }
        }

        ClientEvent::MovePiece { id, tiles, symbol } => {
            // Move validity was checked against the sender's replica; the
            // relay records and forwards verbatim.
            state.board.record_piece(id, ReportedPiece {
                tiles: tiles.clone(),
                symbol,
            });
            state.send_others(sender, ServerEvent::PieceUpdate { id, tiles, symbol });
        }

        ClientEvent::ClearedLines { id, total_lines } => {
            if state.roster.set_score(id, total_lines) {
                state.send_others(sender, state.roster_update());
            }
        }

        ClientEvent::PlayerLost { name } => {
            end_round(state, msg_tx, reset_delay, name);
        }
    }
}

/// Mark the board terminal, tell everyone, and schedule the fresh round.
fn end_round(
    state: &mut RelayState,
    msg_tx: &mpsc::UnboundedSender<RelayMessage>,
    reset_delay: Duration,
    name: String,
) {
    state.board.mark_lost(&name);
    println!(
        "[Relay] {} lost the game; fresh round in {}ms",
        name,
        reset_delay.as_millis()
    );
    state.send_all(ServerEvent::GameOver { name });

    let msg_tx = msg_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(reset_delay).await;
        let _ = msg_tx.send(RelayMessage::ResetRound);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.reset_delay_ms, RESET_DELAY_MS);
    }

    #[test]
    fn test_config_from_env_does_not_panic() {
        let _config = RelayConfig::from_env();
    }
}
