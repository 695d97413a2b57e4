//! Room membership, host election, game start and relay.
//!
//! Lifecycle of one room: created on first join, in-game once the host
//! starts it, destroyed when the last member disconnects. A non-empty room
//! always has exactly one host: the first joiner, then the earliest
//! remaining member whenever the host leaves.

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Action, Member};

/// Case-normalised room identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCode(String);

impl RoomCode {
    /// Trim and uppercase. Returns `None` for an empty code.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return None;
        }
        Some(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event produced by a coordinator operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// Full membership refresh, in join order
    Members(Vec<Member>),
    GameStarted { seed: u32 },
    /// A member's action, tagged with its display name
    GameAction { display_name: String, action: Action },
    /// Garbage routed from `source` to `target`; every member filters
    Garbage {
        lines: u32,
        source: String,
        target: String,
    },
}

/// An event and the connection ids it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: Vec<String>,
    pub event: RoomEvent,
}

#[derive(Debug, Clone, Default)]
pub struct Room {
    members: Vec<Member>,
    started: bool,
    seed: Option<u32>,
}

impl Room {
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn host(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_host)
    }

    fn member(&self, connection_id: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.connection_id == connection_id)
    }

    fn everyone(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.connection_id.clone())
            .collect()
    }

    fn others<'a>(&'a self, connection_id: &'a str) -> impl Iterator<Item = &'a Member> + 'a {
        self.members
            .iter()
            .filter(move |m| m.connection_id != connection_id)
    }

    fn membership(&self) -> Delivery {
        Delivery {
            to: self.everyone(),
            event: RoomEvent::Members(self.members.clone()),
        }
    }
}

/// Every live room, keyed by code
#[derive(Debug, Default)]
pub struct Rooms {
    rooms: HashMap<RoomCode, Room>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Register `connection_id` under `display_name`, creating the room if
    /// needed, and broadcast the membership to the whole room.
    ///
    /// A connection that already joined is renamed instead of added twice.
    /// Display names are unique within a room; a name held by another
    /// connection is rejected (see [`Rooms::name_taken`]).
    pub fn join(&mut self, code: &RoomCode, connection_id: &str, display_name: &str) -> Option<Delivery> {
        let name = display_name.trim();
        if name.is_empty() {
            debug!("room {}: {} sent an empty display name", code, connection_id);
            return None;
        }
        if self.name_taken(code, connection_id, name) {
            debug!("room {}: {} asked for taken name {:?}", code, connection_id, name);
            return None;
        }

        let room = self.rooms.entry(code.clone()).or_insert_with(|| {
            info!("room {}: created", code);
            Room::default()
        });

        if let Some(existing) = room
            .members
            .iter_mut()
            .find(|m| m.connection_id == connection_id)
        {
            existing.display_name = name.to_string();
        } else {
            let is_host = room.members.is_empty();
            room.members.push(Member {
                display_name: name.to_string(),
                connection_id: connection_id.to_string(),
                is_host,
            });
            info!(
                "room {}: {} joined as {:?}{}",
                code,
                connection_id,
                name,
                if is_host { " (host)" } else { "" }
            );
        }

        Some(room.membership())
    }

    /// Whether a connection other than `connection_id` already goes by
    /// `display_name` (trimmed, exact match) in the room.
    pub fn name_taken(&self, code: &RoomCode, connection_id: &str, display_name: &str) -> bool {
        let name = display_name.trim();
        self.rooms
            .get(code)
            .is_some_and(|room| room.others(connection_id).any(|m| m.display_name == name))
    }

    /// Start the game if `connection_id` is the host and it has not started.
    ///
    /// Anything else is silently ignored.
    pub fn start_game(&mut self, code: &RoomCode, connection_id: &str, rng: &mut impl Rng) -> Option<Delivery> {
        let room = self.rooms.get_mut(code)?;

        let is_host = room.member(connection_id).is_some_and(|m| m.is_host);
        if !is_host {
            debug!("room {}: start from non-host {} ignored", code, connection_id);
            return None;
        }
        if room.started {
            debug!("room {}: already started", code);
            return None;
        }

        let seed: u32 = rng.gen();
        room.started = true;
        room.seed = Some(seed);
        info!("room {}: game started with seed {}", code, seed);

        Some(Delivery {
            to: room.everyone(),
            event: RoomEvent::GameStarted { seed },
        })
    }

    /// Fan an action out to every other member, tagged with the sender's name.
    pub fn relay_action(&mut self, code: &RoomCode, connection_id: &str, action: Action) -> Option<Delivery> {
        let room = self.rooms.get(code)?;
        let sender = room.member(connection_id)?;

        let to: Vec<String> = room
            .others(connection_id)
            .map(|m| m.connection_id.clone())
            .collect();
        if to.is_empty() {
            return None;
        }

        Some(Delivery {
            to,
            event: RoomEvent::GameAction {
                display_name: sender.display_name.clone(),
                action,
            },
        })
    }

    /// Route `lines - 1` garbage rows to one random other member.
    ///
    /// Nothing is sent for a single line, before the game starts, or when
    /// the sender is alone. The event goes to the whole room.
    pub fn lines_cleared(
        &mut self,
        code: &RoomCode,
        connection_id: &str,
        lines: u32,
        rng: &mut impl Rng,
    ) -> Option<Delivery> {
        if lines <= 1 {
            return None;
        }
        let room = self.rooms.get(code)?;
        if !room.started {
            return None;
        }
        let source = room.member(connection_id)?;

        let others: Vec<&Member> = room.others(connection_id).collect();
        let target = others.choose(rng)?;

        debug!(
            "room {}: {} sends {} garbage to {}",
            code,
            source.display_name,
            lines - 1,
            target.display_name
        );

        Some(Delivery {
            to: room.everyone(),
            event: RoomEvent::Garbage {
                lines: lines - 1,
                source: source.display_name.clone(),
                target: target.display_name.clone(),
            },
        })
    }

    /// Remove a member, promote a new host if needed, and re-broadcast.
    ///
    /// The room and all of its state are dropped with its last member.
    pub fn disconnect(&mut self, code: &RoomCode, connection_id: &str) -> Option<Delivery> {
        let room = self.rooms.get_mut(code)?;
        let idx = room
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)?;
        let departed = room.members.remove(idx);
        info!("room {}: {} left", code, connection_id);

        if room.members.is_empty() {
            self.rooms.remove(code);
            info!("room {}: closed", code);
            return None;
        }

        if departed.is_host {
            let heir = &mut room.members[0];
            heir.is_host = true;
            info!("room {}: {} promoted to host", code, heir.connection_id);
        }

        Some(room.membership())
    }
}
