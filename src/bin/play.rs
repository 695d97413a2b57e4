//! Keyboard room client.
//!
//! Joins a room and plays the local board from the terminal. The host
//! starts the game with Enter.
//!
//! Keys: arrows or WASD move, Up/X and Z rotate, Space hard drops, C or
//! Shift holds, P pauses, Q quits.
//!
//! Environment:
//! - `TETRIS_VERSUS_ADDR` server address (default `127.0.0.1:7878`)
//! - `TETRIS_VERSUS_ROOM` room code (default `LOBBY`)
//! - `TETRIS_VERSUS_NAME` display name (default `player-<pid>`)

use std::io::{self, Stdout, Write};
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::style::Print;
use crossterm::{cursor, terminal, QueueableCommand};
use log::{info, warn};
use tokio::time::{interval, Instant, MissedTickBehavior};

use tetris_versus::adapter::{apply_server_event, EventSender, RoomClient, ServerEvent};
use tetris_versus::core::{GameState, RenderCell};
use tetris_versus::input::{should_quit, KeyboardDriver};
use tetris_versus::session::{Outbound, Session};
use tetris_versus::types::BOARD_WIDTH;

#[derive(Debug, Clone)]
struct PlayConfig {
    addr: SocketAddr,
    room: String,
    name: String,
}

impl PlayConfig {
    fn from_env() -> Result<Self> {
        let addr = std::env::var("TETRIS_VERSUS_ADDR").unwrap_or_else(|_| "127.0.0.1:7878".to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("invalid TETRIS_VERSUS_ADDR {:?}", addr))?;
        let room = std::env::var("TETRIS_VERSUS_ROOM").unwrap_or_else(|_| "LOBBY".to_string());
        let name = std::env::var("TETRIS_VERSUS_NAME")
            .unwrap_or_else(|_| format!("player-{}", std::process::id()));

        Ok(Self { addr, room, name })
    }
}

/// Raw-mode alternate screen for the lifetime of the game
struct Screen {
    stdout: Stdout,
    key_releases: bool,
}

impl Screen {
    fn enter() -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.queue(terminal::EnterAlternateScreen)?;
        stdout.queue(cursor::Hide)?;

        // Without release events held keys cannot be tracked.
        let key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if key_releases {
            stdout.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        stdout.flush()?;

        Ok(Self { stdout, key_releases })
    }

    fn exit(&mut self) -> Result<()> {
        if self.key_releases {
            self.stdout.queue(PopKeyboardEnhancementFlags)?;
        }
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn line(&mut self, row: u16, text: &str) -> Result<()> {
        self.stdout.queue(cursor::MoveTo(0, row))?;
        self.stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        self.stdout.queue(Print(text))?;
        Ok(())
    }

    fn draw(&mut self, session: &Session, status: &str) -> Result<()> {
        let mut row = 0u16;
        self.line(row, &format!("{} in {}", session.own_name(), status))?;
        row += 1;

        let Some(local) = session.local() else {
            for member in session.members() {
                row += 1;
                let host = if member.is_host { " (host)" } else { "" };
                self.line(row, &format!("  {}{}", member.display_name, host))?;
            }
            self.line(row + 2, waiting_hint(session))?;
            self.stdout.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
            self.stdout.flush()?;
            return Ok(());
        };

        let board = local.render();
        let border = format!("+{}+", "-".repeat(BOARD_WIDTH as usize * 2));
        row += 1;
        self.line(row, &border)?;
        for cells in board.visible_rows() {
            row += 1;
            let body: String = cells.iter().map(|&cell| cell_glyph(cell)).collect();
            self.line(row, &format!("|{}|", body))?;
        }
        row += 1;
        self.line(row, &border)?;

        row += 1;
        self.line(row, &summary("you", local))?;
        for replica in session.replicas() {
            row += 1;
            self.line(row, &summary(&replica.name, &replica.state))?;
        }
        self.stdout.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn cell_glyph(cell: RenderCell) -> &'static str {
    match cell {
        RenderCell::Empty => " .",
        RenderCell::Piece(_) => "[]",
        RenderCell::Garbage => "##",
        RenderCell::Ghost => "::",
    }
}

fn summary(label: &str, state: &GameState) -> String {
    let status = if state.game_over() {
        " GAME OVER"
    } else if state.paused() {
        " paused"
    } else {
        ""
    };
    format!("{:<12} score {:>6}  lines {:>4}{}", label, state.score(), state.lines(), status)
}

fn waiting_hint(session: &Session) -> &'static str {
    if session.is_host() {
        "Enter to start, Q to quit"
    } else {
        "waiting for the host to start, Q to quit"
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
    // Logging goes to stderr; redirect it to keep the board readable.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = PlayConfig::from_env()?;
    let mut client = RoomClient::connect(config.addr, &config.room).await?;
    client.join(&config.name).await?;
    info!("{} joined {} at {}", config.name, config.room, config.addr);

    let mut screen = Screen::enter()?;
    let result = run(&mut screen, client, &config).await;

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

async fn run(screen: &mut Screen, client: RoomClient, config: &PlayConfig) -> Result<()> {
    let (mut events, mut sender) = client.into_split();
    let mut session = Session::new(config.name.clone());
    let mut driver = KeyboardDriver::new();
    let status = format!("room {}", config.room);

    let mut frames = interval(Duration::from_millis(driver.poll_interval_ms() as u64));
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
                apply_server_event(&mut session, &event);
            }
            _ = frames.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last_frame).as_millis().min(u32::MAX as u128) as u32;
                last_frame = now;

                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind == KeyEventKind::Press {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if key.code == KeyCode::Enter && session.is_host() && session.seed().is_none() {
                            sender.start_game().await?;
                            continue;
                        }
                    }
                    let out = driver.on_key(&mut session, key);
                    forward(&mut sender, out).await?;
                }

                let moves = driver.poll(&mut session, elapsed);
                forward(&mut sender, moves).await?;
                if !screen.key_releases {
                    driver.release_all();
                }

                let gravity = session.advance(elapsed);
                forward(&mut sender, gravity).await?;

                screen.draw(&session, &status)?;
            }
        }
    }
}
