//! Protocol module - JSON event types for the room channel
//!
//! One JSON object per line. Every event carries an `event` tag; actions
//! nested inside events carry a `type` tag. Field names are camelCase on
//! the wire.

use serde::{Deserialize, Serialize};

use tetris_versus_room::{RoomCode, RoomEvent};

use crate::types::{Action, Member};

// ============== Client -> Server Events ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Selects the room channel; must be the first event on a connection
    Namespace { path: String },
    #[serde(rename_all = "camelCase")]
    Join { display_name: String },
    StartGame,
    GameAction { action: WireAction },
    #[serde(rename_all = "camelCase")]
    LinesCleared { line_count: u32 },
}

// ============== Server -> Client Events ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    RoomMembers { members: Vec<WireMember> },
    GameStarted { seed: u32 },
    #[serde(rename_all = "camelCase")]
    GameAction {
        display_name: String,
        action: WireAction,
    },
    #[serde(rename_all = "camelCase")]
    ReceiveGarbage {
        line_count: u32,
        source_name: String,
        target_name: String,
    },
    Error { code: ErrorCode, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Line is not a known event
    InvalidMessage,
    /// Room event sent before `namespace`
    NamespaceRequired,
    /// Game event sent before `join`
    NotJoined,
    /// `join` with a display name another member of the room already uses
    NameTaken,
}

// ============== Shared Payloads ==============

/// Action as it travels inside `gameAction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireAction {
    Move { dx: i8, dy: i8 },
    Rotate { clockwise: bool },
    HardDrop,
    Hold,
    Pause,
    #[serde(rename_all = "camelCase")]
    ReceiveGarbage { line_count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMember {
    pub display_name: String,
    pub connection_id: String,
    pub is_host: bool,
}

impl From<Action> for WireAction {
    fn from(value: Action) -> Self {
        match value {
            Action::Move { dx, dy } => WireAction::Move { dx, dy },
            Action::Rotate { clockwise } => WireAction::Rotate { clockwise },
            Action::HardDrop => WireAction::HardDrop,
            Action::Hold => WireAction::Hold,
            Action::Pause => WireAction::Pause,
            Action::ReceiveGarbage { lines } => WireAction::ReceiveGarbage { line_count: lines },
        }
    }
}

impl From<WireAction> for Action {
    fn from(value: WireAction) -> Self {
        match value {
            WireAction::Move { dx, dy } => Action::Move { dx, dy },
            WireAction::Rotate { clockwise } => Action::Rotate { clockwise },
            WireAction::HardDrop => Action::HardDrop,
            WireAction::Hold => Action::Hold,
            WireAction::Pause => Action::Pause,
            WireAction::ReceiveGarbage { line_count } => Action::ReceiveGarbage { lines: line_count },
        }
    }
}

impl From<Member> for WireMember {
    fn from(value: Member) -> Self {
        Self {
            display_name: value.display_name,
            connection_id: value.connection_id,
            is_host: value.is_host,
        }
    }
}

impl From<WireMember> for Member {
    fn from(value: WireMember) -> Self {
        Self {
            display_name: value.display_name,
            connection_id: value.connection_id,
            is_host: value.is_host,
        }
    }
}

impl From<RoomEvent> for ServerEvent {
    fn from(value: RoomEvent) -> Self {
        match value {
            RoomEvent::Members(members) => ServerEvent::RoomMembers {
                members: members.into_iter().map(WireMember::from).collect(),
            },
            RoomEvent::GameStarted { seed } => ServerEvent::GameStarted { seed },
            RoomEvent::GameAction {
                display_name,
                action,
            } => ServerEvent::GameAction {
                display_name,
                action: action.into(),
            },
            RoomEvent::Garbage {
                lines,
                source,
                target,
            } => ServerEvent::ReceiveGarbage {
                line_count: lines,
                source_name: source,
                target_name: target,
            },
        }
    }
}

/// Parse one client line
pub fn parse_client_event(json: &str) -> Result<ClientEvent, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse one server line
pub fn parse_server_event(json: &str) -> Result<ServerEvent, serde_json::Error> {
    serde_json::from_str(json)
}

/// Room code from a `/{roomCode}` namespace path
pub fn room_from_namespace(path: &str) -> Option<RoomCode> {
    let code = path.trim().strip_prefix('/')?;
    if code.contains('/') {
        return None;
    }
    RoomCode::parse(code)
}

pub fn create_error(code: ErrorCode, message: &str) -> ServerEvent {
    ServerEvent::Error {
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_namespace_and_join() {
        let ns = parse_client_event(r#"{"event":"namespace","path":"/abc123"}"#).unwrap();
        let ClientEvent::Namespace { path } = ns else {
            panic!("Expected namespace event");
        };
        assert_eq!(room_from_namespace(&path).unwrap().as_str(), "ABC123");

        let join = parse_client_event(r#"{"event":"join","displayName":"alice"}"#).unwrap();
        assert_eq!(
            join,
            ClientEvent::Join {
                display_name: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_parse_game_events() {
        assert_eq!(
            parse_client_event(r#"{"event":"startGame"}"#).unwrap(),
            ClientEvent::StartGame
        );
        assert_eq!(
            parse_client_event(r#"{"event":"gameAction","action":{"type":"move","dx":-1,"dy":0}}"#)
                .unwrap(),
            ClientEvent::GameAction {
                action: WireAction::Move { dx: -1, dy: 0 }
            }
        );
        assert_eq!(
            parse_client_event(r#"{"event":"linesCleared","lineCount":3}"#).unwrap(),
            ClientEvent::LinesCleared { line_count: 3 }
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(parse_client_event(r#"{"event":"teleport"}"#).is_err());
        assert!(parse_client_event("not json").is_err());
        assert!(parse_client_event(r#"{"event":"gameAction","action":{"type":"spin"}}"#).is_err());
    }

    #[test]
    fn test_wire_action_shapes() {
        let cases = [
            (Action::Rotate { clockwise: true }, json!({"type":"rotate","clockwise":true})),
            (Action::HardDrop, json!({"type":"hardDrop"})),
            (Action::Hold, json!({"type":"hold"})),
            (Action::Pause, json!({"type":"pause"})),
            (
                Action::ReceiveGarbage { lines: 2 },
                json!({"type":"receiveGarbage","lineCount":2}),
            ),
        ];
        for (action, expected) in cases {
            let value = serde_json::to_value(WireAction::from(action)).unwrap();
            assert_eq!(value, expected);
            assert_eq!(Action::from(WireAction::from(action)), action);
        }
    }

    #[test]
    fn test_server_event_shapes() {
        let garbage = ServerEvent::from(RoomEvent::Garbage {
            lines: 2,
            source: "alice".to_string(),
            target: "bob".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&garbage).unwrap(),
            json!({"event":"receiveGarbage","lineCount":2,"sourceName":"alice","targetName":"bob"})
        );

        let members = ServerEvent::from(RoomEvent::Members(vec![Member {
            display_name: "alice".to_string(),
            connection_id: "c1".to_string(),
            is_host: true,
        }]));
        assert_eq!(
            serde_json::to_value(&members).unwrap(),
            json!({"event":"roomMembers","members":[{"displayName":"alice","connectionId":"c1","isHost":true}]})
        );

        let err = create_error(ErrorCode::NotJoined, "join first");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"event":"error","code":"not_joined","message":"join first"})
        );
        let err = create_error(ErrorCode::NameTaken, "taken");
        assert_eq!(serde_json::to_value(&err).unwrap()["code"], "name_taken");
    }

    #[test]
    fn test_namespace_requires_leading_slash() {
        assert!(room_from_namespace("ABC123").is_none());
        assert!(room_from_namespace("/").is_none());
        assert!(room_from_namespace("/a/b").is_none());
        assert_eq!(room_from_namespace(" /xyz ").unwrap().as_str(), "XYZ");
    }
}
