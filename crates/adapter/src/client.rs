//! Async room client
//!
//! Speaks the line protocol from the client side and feeds server events
//! into a [`Session`].

use std::net::SocketAddr;

use anyhow::Context;
use log::debug;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use tetris_versus_session::{Outbound, Session};

use crate::protocol::*;
use crate::types::Member;

/// Both halves of a room connection
pub struct RoomClient {
    events: EventReader,
    sender: EventSender,
}

/// Read half: decodes server events
pub struct EventReader {
    lines: Lines<BufReader<OwnedReadHalf>>,
}

/// Write half: encodes client events
pub struct EventSender {
    writer: OwnedWriteHalf,
}

impl RoomClient {
    /// Connect and select the room's namespace
    pub async fn connect(addr: SocketAddr, room: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("connect to {}", addr))?;
        let (read_half, writer) = stream.into_split();
        let mut client = Self {
            events: EventReader {
                lines: BufReader::new(read_half).lines(),
            },
            sender: EventSender { writer },
        };
        client
            .sender
            .send(&ClientEvent::Namespace {
                path: format!("/{}", room),
            })
            .await?;
        Ok(client)
    }

    /// Split so reads and writes can be driven from separate branches
    pub fn into_split(self) -> (EventReader, EventSender) {
        (self.events, self.sender)
    }

    pub async fn send(&mut self, event: &ClientEvent) -> anyhow::Result<()> {
        self.sender.send(event).await
    }

    pub async fn join(&mut self, display_name: &str) -> anyhow::Result<()> {
        self.sender.join(display_name).await
    }

    pub async fn start_game(&mut self) -> anyhow::Result<()> {
        self.sender.start_game().await
    }

    pub async fn send_outbound(&mut self, outbound: Outbound) -> anyhow::Result<()> {
        self.sender.send_outbound(outbound).await
    }

    pub async fn recv(&mut self) -> anyhow::Result<Option<ServerEvent>> {
        self.events.recv().await
    }
}

impl EventSender {
    pub async fn send(&mut self, event: &ClientEvent) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn join(&mut self, display_name: &str) -> anyhow::Result<()> {
        self.send(&ClientEvent::Join {
            display_name: display_name.to_string(),
        })
        .await
    }

    pub async fn start_game(&mut self) -> anyhow::Result<()> {
        self.send(&ClientEvent::StartGame).await
    }

    /// Forward whatever a session dispatch produced
    pub async fn send_outbound(&mut self, outbound: Outbound) -> anyhow::Result<()> {
        let event = match outbound {
            Outbound::GameAction(action) => ClientEvent::GameAction {
                action: action.into(),
            },
            Outbound::LinesCleared(lines) => ClientEvent::LinesCleared { line_count: lines },
        };
        self.send(&event).await
    }
}

impl EventReader {
    /// Next event from the server, or `None` once the connection closes
    pub async fn recv(&mut self) -> anyhow::Result<Option<ServerEvent>> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            let event = parse_server_event(&line).with_context(|| format!("bad server line {:?}", line))?;
            return Ok(Some(event));
        }
    }
}

/// Route a server event into a session.
///
/// Returns `true` if it changed the session's state.
pub fn apply_server_event(session: &mut Session, event: &ServerEvent) -> bool {
    match event {
        ServerEvent::RoomMembers { members } => {
            session.on_members(members.iter().cloned().map(Member::from).collect());
            true
        }
        ServerEvent::GameStarted { seed } => {
            session.on_game_started(*seed);
            true
        }
        ServerEvent::GameAction {
            display_name,
            action,
        } => session.on_game_action(display_name, (*action).into()),
        ServerEvent::ReceiveGarbage {
            line_count,
            source_name,
            target_name,
        } => session.on_garbage(*line_count, source_name, target_name),
        ServerEvent::Error { code, message } => {
            debug!("server error {:?}: {}", code, message);
            false
        }
    }
}
