//! Protocol Module
//!
//! Defines the command-and-reply surface between the typed layer and the
//! store, and the wire format the TCP transport speaks.
//!
//! ## Frame Format (commands and replies)
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Tag (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Command Tags
//! - 0x01..0x08: hash primitives (delete, exists, get, keys, len,
//!   set, set-if-absent, values)
//! - 0x09..0x10: set primitives (add, card, contains, diff, inter,
//!   members, remove, union)
//! - 0x11: PING (health check)
//!
//! ### Reply Tags
//! - 0x00: INTEGER - 8-byte big-endian value
//! - 0x01: BULK    - raw byte string
//! - 0x02: ARRAY   - count + nested frames
//! - 0x03: NIL     - empty payload
//! - 0x04: ERROR   - UTF-8 message

mod command;
mod reply;
mod codec;

pub use command::{Command, CommandType};
pub use reply::{Reply, ReplyType};
pub use codec::{
    encode_command, decode_command, encode_reply, decode_reply,
    read_command, write_command, read_reply, write_reply,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
