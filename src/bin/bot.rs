//! Headless room player.
//!
//! Joins a room, starts the game once enough players are in (if it is the
//! host) and plays by hard-dropping on a fixed cadence while gravity runs.
//!
//! Environment:
//! - `TETRIS_VERSUS_ADDR` server address (default `127.0.0.1:7878`)
//! - `TETRIS_VERSUS_ROOM` room code (default `LOBBY`)
//! - `TETRIS_VERSUS_NAME` display name (default `bot-<pid>`)
//! - `TETRIS_VERSUS_START_AT` members needed before the host starts (default 2)
//! - `TETRIS_VERSUS_DROP_MS` delay between hard drops (default 800)

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::time::{interval, Instant, MissedTickBehavior};

use tetris_versus::adapter::{apply_server_event, EventSender, RoomClient, ServerEvent};
use tetris_versus::session::{Outbound, Session};
use tetris_versus::types::Action;

const FRAME_MS: u64 = 16;

#[derive(Debug, Clone)]
struct BotConfig {
    addr: SocketAddr,
    room: String,
    name: String,
    start_at: usize,
    drop_ms: u32,
}

impl BotConfig {
    fn from_env() -> Result<Self> {
        let addr = std::env::var("TETRIS_VERSUS_ADDR").unwrap_or_else(|_| "127.0.0.1:7878".to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("invalid TETRIS_VERSUS_ADDR {:?}", addr))?;

        let room = std::env::var("TETRIS_VERSUS_ROOM").unwrap_or_else(|_| "LOBBY".to_string());
        let name = std::env::var("TETRIS_VERSUS_NAME")
            .unwrap_or_else(|_| format!("bot-{}", std::process::id()));

        let start_at = std::env::var("TETRIS_VERSUS_START_AT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);
        let drop_ms = std::env::var("TETRIS_VERSUS_DROP_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(800);

        Ok(Self {
            addr,
            room,
            name,
            start_at,
            drop_ms,
        })
    }
}

async fn forward<I>(sender: &mut EventSender, outbound: I) -> Result<()>
where
    I: IntoIterator<Item = Outbound>,
{
    for out in outbound {
        sender.send_outbound(out).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BotConfig::from_env()?;
    info!(
        "{} joining {} at {} (start at {} players)",
        config.name, config.room, config.addr, config.start_at
    );

    let mut client = RoomClient::connect(config.addr, &config.room).await?;
    client.join(&config.name).await?;
    let (mut events, mut sender) = client.into_split();

    let mut session = Session::new(config.name.clone());
    let mut start_requested = false;
    let mut since_drop = 0u32;

    let mut frames = interval(Duration::from_millis(FRAME_MS));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event? else {
                    info!("server closed the connection");
                    return Ok(());
                };
                if let ServerEvent::Error { code, message } = &event {
                    warn!("server rejected event: {:?} {}", code, message);
                }
                if let ServerEvent::GameStarted { seed } = &event {
                    info!("game started with seed {}", seed);
                    since_drop = 0;
                }
                apply_server_event(&mut session, &event);

                if !start_requested
                    && session.seed().is_none()
                    && session.is_host()
                    && session.members().len() >= config.start_at
                {
                    info!("starting game with {} players", session.members().len());
                    sender.start_game().await?;
                    start_requested = true;
                }
            }
            _ = frames.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last_frame).as_millis().min(u32::MAX as u128) as u32;
                last_frame = now;

                let Some(local) = session.local() else {
                    continue;
                };
                if local.game_over() {
                    info!("topped out with score {} ({} lines)", local.score(), local.lines());
                    return Ok(());
                }

                let gravity = session.advance(elapsed);
                forward(&mut sender, gravity).await?;

                since_drop += elapsed;
                if since_drop >= config.drop_ms {
                    since_drop = 0;
                    let dropped = session.dispatch(Action::HardDrop);
                    forward(&mut sender, dropped).await?;
                }
            }
        }
    }
}
