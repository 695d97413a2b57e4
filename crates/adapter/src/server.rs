//! TCP server for room channels
//!
//! One coordinator task owns [`Rooms`] and processes commands from every
//! connection through a bounded channel, so all room mutation happens in
//! order. Each connection gets a reader loop and its own writer task fed by
//! an unbounded channel.

use std::collections::HashMap;
use std::net::SocketAddr;

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use tetris_versus_room::{Delivery, RoomCode, Rooms};

use crate::protocol::*;
use crate::types::Action;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the connection -> coordinator command channel
    pub max_pending_events: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_events: 256,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to the defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TETRIS_VERSUS_HOST").unwrap_or(defaults.host);
        let port = env::var("TETRIS_VERSUS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_events = env::var("TETRIS_VERSUS_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_pending_events);

        Self {
            host,
            port,
            max_pending_events,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

/// Work for the coordinator task
#[derive(Debug)]
enum Command {
    Connect {
        conn: String,
        tx: mpsc::UnboundedSender<ServerEvent>,
    },
    Join {
        conn: String,
        room: RoomCode,
        display_name: String,
    },
    StartGame {
        conn: String,
        room: RoomCode,
    },
    GameAction {
        conn: String,
        room: RoomCode,
        action: Action,
    },
    LinesCleared {
        conn: String,
        room: RoomCode,
        lines: u32,
    },
    Disconnect {
        conn: String,
        room: Option<RoomCode>,
    },
}

/// Owns the room map and every connection's outbox
struct Coordinator {
    rooms: Rooms,
    outboxes: HashMap<String, mpsc::UnboundedSender<ServerEvent>>,
    rng: StdRng,
}

impl Coordinator {
    fn new() -> Self {
        Self {
            rooms: Rooms::new(),
            outboxes: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    fn handle(&mut self, command: Command) {
        let delivery = match command {
            Command::Connect { conn, tx } => {
                self.outboxes.insert(conn, tx);
                None
            }
            Command::Join {
                conn,
                room,
                display_name,
            } => {
                if self.rooms.name_taken(&room, &conn, &display_name) {
                    let err = create_error(ErrorCode::NameTaken, "display name already in use");
                    self.reply(&conn, err);
                    None
                } else {
                    self.rooms.join(&room, &conn, &display_name)
                }
            }
            Command::StartGame { conn, room } => self.rooms.start_game(&room, &conn, &mut self.rng),
            Command::GameAction { conn, room, action } => self.rooms.relay_action(&room, &conn, action),
            Command::LinesCleared { conn, room, lines } => {
                self.rooms.lines_cleared(&room, &conn, lines, &mut self.rng)
            }
            Command::Disconnect { conn, room } => {
                self.outboxes.remove(&conn);
                room.and_then(|room| self.rooms.disconnect(&room, &conn))
            }
        };

        if let Some(delivery) = delivery {
            self.deliver(delivery);
        }
    }

    fn reply(&self, conn: &str, event: ServerEvent) {
        if let Some(tx) = self.outboxes.get(conn) {
            let _ = tx.send(event);
        }
    }

    fn deliver(&self, delivery: Delivery) {
        let event = ServerEvent::from(delivery.event);
        for conn in &delivery.to {
            if let Some(tx) = self.outboxes.get(conn) {
                // A closed outbox means the connection is going away; its
                // Disconnect command is already queued.
                let _ = tx.send(event.clone());
            }
        }
    }
}

async fn run_coordinator(mut command_rx: mpsc::Receiver<Command>) {
    let mut coordinator = Coordinator::new();
    while let Some(command) = command_rx.recv().await {
        debug!("coordinator: {:?}", command);
        coordinator.handle(command);
    }
    debug!("coordinator stopped");
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up, which
/// lets callers bind port 0.
pub async fn run_server(config: ServerConfig, ready_tx: Option<oneshot::Sender<SocketAddr>>) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!("room server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let (command_tx, command_rx) = mpsc::channel::<Command>(config.max_pending_events);
    tokio::spawn(run_coordinator(command_rx));

    let mut conn_counter = 0u64;

    // Accept incoming connections
    loop {
        let (socket, peer) = listener.accept().await?;
        conn_counter += 1;
        let conn = format!("c{}", conn_counter);

        info!("{} connected from {}", conn, peer);

        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, conn.clone(), command_tx).await {
                warn!("{} error: {}", conn, e);
            }
            info!("{} disconnected", conn);
        });
    }
}

/// Handle a single client connection
async fn handle_client(socket: TcpStream, conn: String, command_tx: mpsc::Sender<Command>) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    // Channel to send events to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    command_tx
        .send(Command::Connect {
            conn: conn.clone(),
            tx: tx.clone(),
        })
        .await?;

    // Spawn task to write events to client
    let writer_conn = conn.clone();
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Some(event) = rx.recv().await {
            buf.clear();
            if let Err(e) = serde_json::to_writer(&mut buf, &event) {
                error!("{}: failed to encode {:?}: {}", writer_conn, event, e);
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

    let mut state = ConnectionState::default();
    let result = read_loop(&mut reader, &conn, &mut state, &tx, &command_tx).await;

    // Leave the room even after a read error.
    let _ = command_tx
        .send(Command::Disconnect {
            conn: conn.clone(),
            room: state.room.take(),
        })
        .await;

    drop(tx);
    let _ = write_task.await;
    result
}

/// Per-connection protocol state
#[derive(Debug, Default)]
struct ConnectionState {
    room: Option<RoomCode>,
    joined: bool,
}

/// Read lines until EOF
async fn read_loop<R>(
    reader: &mut R,
    conn: &str,
    state: &mut ConnectionState,
    tx: &mpsc::UnboundedSender<ServerEvent>,
    command_tx: &mpsc::Sender<Command>,
) -> anyhow::Result<()>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            // Client disconnected
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match parse_client_event(trimmed) {
            Ok(event) => event,
            Err(e) => {
                debug!("{}: invalid message: {}", conn, e);
                let _ = tx.send(create_error(ErrorCode::InvalidMessage, &e.to_string()));
                continue;
            }
        };

        match handle_event(state, conn, event) {
            Ok(Some(command)) => command_tx.send(command).await?,
            Ok(None) => {}
            Err(err) => {
                let _ = tx.send(err);
            }
        }
    }
}

/// Validate one client event against the connection state and turn it
/// into a coordinator command. Errors are returned as the event to send
/// back to the client.
fn handle_event(state: &mut ConnectionState, conn: &str, event: ClientEvent) -> Result<Option<Command>, ServerEvent> {
    let conn = conn.to_string();

    if let ClientEvent::Namespace { path } = &event {
        if state.room.is_some() {
            return Err(create_error(ErrorCode::InvalidMessage, "namespace already selected"));
        }
        let room = room_from_namespace(path)
            .ok_or_else(|| create_error(ErrorCode::InvalidMessage, "namespace must be /{roomCode}"))?;
        info!("{} opened namespace /{}", conn, room);
        state.room = Some(room);
        return Ok(None);
    }

    let Some(room) = state.room.clone() else {
        return Err(create_error(
            ErrorCode::NamespaceRequired,
            "send a namespace event first",
        ));
    };

    match event {
        ClientEvent::Namespace { .. } => Ok(None),
        ClientEvent::Join { display_name } => {
            if !display_name.trim().is_empty() {
                state.joined = true;
            }
            Ok(Some(Command::Join {
                conn,
                room,
                display_name,
            }))
        }
        _ if !state.joined => Err(create_error(ErrorCode::NotJoined, "join the room first")),
        ClientEvent::StartGame => Ok(Some(Command::StartGame { conn, room })),
        ClientEvent::GameAction { action } => Ok(Some(Command::GameAction {
            conn,
            room,
            action: action.into(),
        })),
        ClientEvent::LinesCleared { line_count } => Ok(Some(Command::LinesCleared {
            conn,
            room,
            lines: line_count,
        })),
    }
}
