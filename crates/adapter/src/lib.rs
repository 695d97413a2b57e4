//! Adapter module - room channels over TCP with a JSON protocol
//!
//! Carries the room coordinator and the client session across the network.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Namespace**: Client selects its room with `{"event":"namespace","path":"/ABC123"}`
//! 3. **Join**: Client announces a display name; the room's membership is broadcast
//! 4. **Start**: The host requests a start; every member receives the shared seed
//! 5. **Play**: Clients relay their actions and report multi-line clears
//!
//! # Events
//!
//! ## Client → Server
//!
//! - **namespace**: Select the room channel (must come first)
//! - **join**: `{displayName}`
//! - **startGame**: Host-only, once per room
//! - **gameAction**: `{action}`, relayed to every other member
//! - **linesCleared**: `{lineCount}`, routes `lineCount - 1` garbage rows
//!
//! ## Server → Client
//!
//! - **roomMembers**: `{members: [{displayName, connectionId, isHost}]}`
//! - **gameStarted**: `{seed}`
//! - **gameAction**: `{displayName, action}`
//! - **receiveGarbage**: `{lineCount, sourceName, targetName}`
//! - **error**: `{code, message}` sent only to the offending connection
//!
//! # Environment Variables
//!
//! - `TETRIS_VERSUS_HOST`: Bind address (default: "127.0.0.1")
//! - `TETRIS_VERSUS_PORT`: Port number (default: 7878)
//! - `TETRIS_VERSUS_MAX_PENDING`: Coordinator queue capacity (default: 256)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"event":"namespace","path":"/ABC123"}
//! Client -> Server: {"event":"join","displayName":"alice"}
//! Server -> Client: {"event":"roomMembers","members":[{"displayName":"alice","connectionId":"c1","isHost":true}]}
//! Client -> Server: {"event":"startGame"}
//! Server -> Client: {"event":"gameStarted","seed":3141592653}
//! Client -> Server: {"event":"gameAction","action":{"type":"move","dx":-1,"dy":0}}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"event":"namespace","path":"/ABC123"}
//! {"event":"join","displayName":"alice"}
//! ```

pub mod client;
pub mod protocol;
pub mod server;

pub use tetris_versus_types as types;

// Re-export protocol types for convenience
pub use client::{apply_server_event, EventReader, EventSender, RoomClient};
pub use protocol::*;
pub use server::{run_server, ServerConfig};
