//! Local engine, remote replicas and the routing between them.

use arrayvec::ArrayVec;
use log::debug;
use tetris_versus_core::GameState;

use crate::clock::GravityClock;
use crate::types::{Action, Member};

/// Event the session wants sent to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outbound {
    /// Relay a locally applied action to the other members
    GameAction(Action),
    /// Lines cleared by the last local lock
    LinesCleared(u32),
}

/// Another member's board, rebuilt from relayed actions
#[derive(Debug, Clone)]
pub struct Replica {
    pub name: String,
    pub state: GameState,
}

#[derive(Debug, Clone)]
pub struct Session {
    own_name: String,
    members: Vec<Member>,
    seed: Option<u32>,
    local: Option<GameState>,
    replicas: Vec<Replica>,
    clock: GravityClock,
}

impl Session {
    pub fn new(own_name: impl Into<String>) -> Self {
        Self {
            own_name: own_name.into(),
            members: Vec::new(),
            seed: None,
            local: None,
            replicas: Vec::new(),
            clock: GravityClock::new(),
        }
    }

    pub fn own_name(&self) -> &str {
        &self.own_name
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Seed of the running game, if one was started
    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn local(&self) -> Option<&GameState> {
        self.local.as_ref()
    }

    pub fn replicas(&self) -> &[Replica] {
        &self.replicas
    }

    pub fn replica(&self, name: &str) -> Option<&GameState> {
        self.replicas
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.state)
    }

    fn replica_mut(&mut self, name: &str) -> Option<&mut GameState> {
        self.replicas
            .iter_mut()
            .find(|r| r.name == name)
            .map(|r| &mut r.state)
    }

    /// Whether the membership list marks this player as host
    pub fn is_host(&self) -> bool {
        self.members
            .iter()
            .any(|m| m.is_host && m.display_name == self.own_name)
    }

    /// Apply a membership refresh.
    ///
    /// Once a game is running, replicas follow the list: departed members'
    /// boards are dropped and late joiners get a board from the shared seed.
    pub fn on_members(&mut self, members: Vec<Member>) {
        self.members = members;

        let Some(seed) = self.seed else {
            return;
        };

        let own = self.own_name.clone();
        let names: Vec<String> = self
            .members
            .iter()
            .map(|m| m.display_name.clone())
            .filter(|name| *name != own)
            .collect();

        self.replicas.retain(|r| names.contains(&r.name));
        for name in names {
            if self.replica(&name).is_none() {
                self.replicas.push(Replica {
                    name,
                    state: GameState::new(seed),
                });
            }
        }
    }

    /// Rebuild the local engine and every replica from the shared seed.
    pub fn on_game_started(&mut self, seed: u32) {
        self.seed = Some(seed);
        self.local = Some(GameState::new(seed));
        self.clock.reset();
        self.replicas = self
            .members
            .iter()
            .filter(|m| m.display_name != self.own_name)
            .map(|m| Replica {
                name: m.display_name.clone(),
                state: GameState::new(seed),
            })
            .collect();
    }

    /// Apply a local action and return what must be sent.
    ///
    /// Only actions that changed the board are relayed. Garbage is never
    /// relayed: it reaches every client through the coordinator's garbage
    /// event instead.
    pub fn dispatch(&mut self, action: Action) -> ArrayVec<Outbound, 2> {
        let mut out = ArrayVec::new();
        let Some(local) = self.local.as_mut() else {
            return out;
        };

        let before = local.revision();
        local.apply(action);
        let changed = local.revision() != before;

        if changed && !matches!(action, Action::ReceiveGarbage { .. }) {
            out.push(Outbound::GameAction(action));
        }
        if let Some(event) = local.take_last_event() {
            if event.lines_cleared > 0 {
                out.push(Outbound::LinesCleared(event.lines_cleared));
            }
        }
        if !local.playable() {
            self.clock.reset();
        }

        out
    }

    /// Advance the gravity clock and dispatch any due ticks.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<Outbound> {
        let ticks = match self.local.as_ref() {
            Some(local) => self.clock.advance(elapsed_ms, local),
            None => 0,
        };

        let mut out = Vec::new();
        for _ in 0..ticks {
            out.extend(self.dispatch(Action::tick()));
        }
        out
    }

    /// Apply an action relayed from `name`'s client to its replica.
    ///
    /// Actions tagged with our own name were already applied locally.
    pub fn on_game_action(&mut self, name: &str, action: Action) -> bool {
        if name == self.own_name {
            return false;
        }
        match self.replica_mut(name) {
            Some(replica) => {
                replica.apply(action);
                // Replica locks are not routed; the owner reports its own.
                replica.take_last_event();
                true
            }
            None => {
                debug!("no replica for {:?}, dropping {:?}", name, action);
                false
            }
        }
    }

    /// Apply a garbage event to whichever board it targets.
    pub fn on_garbage(&mut self, lines: u32, source: &str, target: &str) -> bool {
        debug!("{} sends {} garbage to {}", source, lines, target);
        let state = if target == self.own_name {
            self.local.as_mut()
        } else {
            self.replica_mut(target)
        };
        state.is_some_and(|s| s.receive_garbage(lines))
    }
}
