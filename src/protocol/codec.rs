//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Frame (commands and replies alike)
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Tag (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Command Payload
//! A count-prefixed sequence of length-prefixed byte-string arguments:
//! ```text
//! argc (4) + argc x [ arg_len (4) + arg_bytes ]
//! ```
//! The first argument is always the store key name; remaining arguments
//! are encoded operands. All integers are big-endian.
//!
//! ### Reply Payload by Tag
//! - INTEGER: 8-byte two's-complement value
//! - BULK:    raw bytes
//! - ARRAY:   count (4) + concatenated nested frames
//! - NIL:     empty
//! - ERROR:   UTF-8 message

use std::io::{Read, Write};

use super::{Command, CommandType, Reply, ReplyType};
use crate::error::{RemoraError, Result};

/// Header size: 1 byte tag + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: tag (1) + payload_len (4) + argc (4) + length-prefixed args
pub fn encode_command(command: &Command) -> Vec<u8> {
    let args = collect_args(command);

    let mut payload = Vec::with_capacity(4 + args.iter().map(|a| 4 + a.len()).sum::<usize>());
    payload.extend_from_slice(&(args.len() as u32).to_be_bytes());
    for arg in args {
        payload.extend_from_slice(&(arg.len() as u32).to_be_bytes());
        payload.extend_from_slice(arg);
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (tag, payload) = split_frame(bytes, "command")?;
    let args = parse_args(payload)?;

    match tag {
        t if t == CommandType::HashDelete as u8 => {
            require_min_args("hash-delete", &args, 2)?;
            Ok(Command::HashDelete {
                name: arg_string("hash-delete", &args, 0)?,
                fields: args[1..].to_vec(),
            })
        }
        t if t == CommandType::HashExists as u8 => {
            require_args("hash-exists", &args, 2)?;
            Ok(Command::HashExists {
                name: arg_string("hash-exists", &args, 0)?,
                field: args[1].clone(),
            })
        }
        t if t == CommandType::HashGet as u8 => {
            require_args("hash-get", &args, 2)?;
            Ok(Command::HashGet {
                name: arg_string("hash-get", &args, 0)?,
                field: args[1].clone(),
            })
        }
        t if t == CommandType::HashKeys as u8 => {
            require_args("hash-keys", &args, 1)?;
            Ok(Command::HashKeys {
                name: arg_string("hash-keys", &args, 0)?,
            })
        }
        t if t == CommandType::HashLen as u8 => {
            require_args("hash-len", &args, 1)?;
            Ok(Command::HashLen {
                name: arg_string("hash-len", &args, 0)?,
            })
        }
        t if t == CommandType::HashSet as u8 => {
            require_args("hash-set", &args, 3)?;
            Ok(Command::HashSet {
                name: arg_string("hash-set", &args, 0)?,
                field: args[1].clone(),
                value: args[2].clone(),
            })
        }
        t if t == CommandType::HashSetIfAbsent as u8 => {
            require_args("hash-set-if-absent", &args, 3)?;
            Ok(Command::HashSetIfAbsent {
                name: arg_string("hash-set-if-absent", &args, 0)?,
                field: args[1].clone(),
                value: args[2].clone(),
            })
        }
        t if t == CommandType::HashValues as u8 => {
            require_args("hash-values", &args, 1)?;
            Ok(Command::HashValues {
                name: arg_string("hash-values", &args, 0)?,
            })
        }
        t if t == CommandType::SetAdd as u8 => {
            require_min_args("set-add", &args, 2)?;
            Ok(Command::SetAdd {
                name: arg_string("set-add", &args, 0)?,
                members: args[1..].to_vec(),
            })
        }
        t if t == CommandType::SetCard as u8 => {
            require_args("set-card", &args, 1)?;
            Ok(Command::SetCard {
                name: arg_string("set-card", &args, 0)?,
            })
        }
        t if t == CommandType::SetContains as u8 => {
            require_args("set-contains", &args, 2)?;
            Ok(Command::SetContains {
                name: arg_string("set-contains", &args, 0)?,
                member: args[1].clone(),
            })
        }
        t if t == CommandType::SetDiff as u8 => {
            require_args("set-diff", &args, 2)?;
            Ok(Command::SetDiff {
                name: arg_string("set-diff", &args, 0)?,
                other: arg_string("set-diff", &args, 1)?,
            })
        }
        t if t == CommandType::SetInter as u8 => {
            require_args("set-inter", &args, 2)?;
            Ok(Command::SetInter {
                name: arg_string("set-inter", &args, 0)?,
                other: arg_string("set-inter", &args, 1)?,
            })
        }
        t if t == CommandType::SetMembers as u8 => {
            require_args("set-members", &args, 1)?;
            Ok(Command::SetMembers {
                name: arg_string("set-members", &args, 0)?,
            })
        }
        t if t == CommandType::SetRemove as u8 => {
            require_min_args("set-remove", &args, 2)?;
            Ok(Command::SetRemove {
                name: arg_string("set-remove", &args, 0)?,
                members: args[1..].to_vec(),
            })
        }
        t if t == CommandType::SetUnion as u8 => {
            require_args("set-union", &args, 2)?;
            Ok(Command::SetUnion {
                name: arg_string("set-union", &args, 0)?,
                other: arg_string("set-union", &args, 1)?,
            })
        }
        t if t == CommandType::Ping as u8 => {
            require_args("ping", &args, 0)?;
            Ok(Command::Ping)
        }
        _ => Err(RemoraError::Protocol(format!(
            "Unknown command tag: 0x{:02x}",
            tag
        ))),
    }
}

/// Gather the wire arguments of a command, name first
fn collect_args(command: &Command) -> Vec<&[u8]> {
    match command {
        Command::HashDelete { name, fields } => {
            let mut args: Vec<&[u8]> = Vec::with_capacity(1 + fields.len());
            args.push(name.as_bytes());
            args.extend(fields.iter().map(|f| f.as_slice()));
            args
        }
        Command::HashExists { name, field } => vec![name.as_bytes(), field],
        Command::HashGet { name, field } => vec![name.as_bytes(), field],
        Command::HashKeys { name } => vec![name.as_bytes()],
        Command::HashLen { name } => vec![name.as_bytes()],
        Command::HashSet { name, field, value } => vec![name.as_bytes(), field, value],
        Command::HashSetIfAbsent { name, field, value } => {
            vec![name.as_bytes(), field, value]
        }
        Command::HashValues { name } => vec![name.as_bytes()],
        Command::SetAdd { name, members } => {
            let mut args: Vec<&[u8]> = Vec::with_capacity(1 + members.len());
            args.push(name.as_bytes());
            args.extend(members.iter().map(|m| m.as_slice()));
            args
        }
        Command::SetCard { name } => vec![name.as_bytes()],
        Command::SetContains { name, member } => vec![name.as_bytes(), member],
        Command::SetDiff { name, other } => vec![name.as_bytes(), other.as_bytes()],
        Command::SetInter { name, other } => vec![name.as_bytes(), other.as_bytes()],
        Command::SetMembers { name } => vec![name.as_bytes()],
        Command::SetRemove { name, members } => {
            let mut args: Vec<&[u8]> = Vec::with_capacity(1 + members.len());
            args.push(name.as_bytes());
            args.extend(members.iter().map(|m| m.as_slice()));
            args
        }
        Command::SetUnion { name, other } => vec![name.as_bytes(), other.as_bytes()],
        Command::Ping => Vec::new(),
    }
}

/// Parse the count-prefixed argument list of a command payload
fn parse_args(payload: &[u8]) -> Result<Vec<Vec<u8>>> {
    if payload.len() < 4 {
        return Err(RemoraError::Protocol(
            "Command payload: missing argument count".to_string(),
        ));
    }

    let argc = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    let mut args = Vec::new();
    let mut offset = 4;

    for index in 0..argc {
        if payload.len() < offset + 4 {
            return Err(RemoraError::Protocol(format!(
                "Command payload: missing length of argument {}",
                index
            )));
        }

        let arg_len = u32::from_be_bytes([
            payload[offset],
            payload[offset + 1],
            payload[offset + 2],
            payload[offset + 3],
        ]) as usize;
        offset += 4;

        if payload.len() < offset + arg_len {
            return Err(RemoraError::Protocol(format!(
                "Command payload: incomplete argument {} (expected {}, got {})",
                index,
                arg_len,
                payload.len() - offset
            )));
        }

        args.push(payload[offset..offset + arg_len].to_vec());
        offset += arg_len;
    }

    if offset != payload.len() {
        return Err(RemoraError::Protocol(format!(
            "Command payload: {} trailing bytes after {} arguments",
            payload.len() - offset,
            argc
        )));
    }

    Ok(args)
}

fn require_args(command: &str, args: &[Vec<u8>], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(RemoraError::Protocol(format!(
            "{} command: expected {} arguments, got {}",
            command,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn require_min_args(command: &str, args: &[Vec<u8>], minimum: usize) -> Result<()> {
    if args.len() < minimum {
        return Err(RemoraError::Protocol(format!(
            "{} command: expected at least {} arguments, got {}",
            command,
            minimum,
            args.len()
        )));
    }
    Ok(())
}

/// Interpret an argument as a UTF-8 store key name
fn arg_string(command: &str, args: &[Vec<u8>], index: usize) -> Result<String> {
    String::from_utf8(args[index].clone()).map_err(|_| {
        RemoraError::Protocol(format!(
            "{} command: argument {} is not valid UTF-8",
            command, index
        ))
    })
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
///
/// Array elements are nested full frames inside the outer payload.
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    let payload = match reply {
        Reply::Integer(value) => value.to_be_bytes().to_vec(),
        Reply::Bulk(bytes) => bytes.clone(),
        Reply::Array(elements) => {
            let mut payload = Vec::new();
            payload.extend_from_slice(&(elements.len() as u32).to_be_bytes());
            for element in elements {
                payload.extend_from_slice(&encode_reply(element));
            }
            payload
        }
        Reply::Nil => Vec::new(),
        Reply::Error(message) => message.as_bytes().to_vec(),
    };

    frame(reply.reply_type() as u8, &payload)
}

/// Decode a reply from bytes
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let (reply, _consumed) = decode_reply_at(bytes)?;
    Ok(reply)
}

/// Decode one reply frame from the front of `bytes`
///
/// Returns the reply and the number of bytes consumed, so array payloads
/// can be walked frame by frame.
fn decode_reply_at(bytes: &[u8]) -> Result<(Reply, usize)> {
    let (tag, payload) = split_frame(bytes, "reply")?;
    let consumed = HEADER_SIZE + payload.len();

    let reply = match tag {
        t if t == ReplyType::Integer as u8 => {
            if payload.len() != 8 {
                return Err(RemoraError::Protocol(format!(
                    "Integer reply: expected 8 payload bytes, got {}",
                    payload.len()
                )));
            }
            let mut raw = [0u8; 8];
            raw.copy_from_slice(payload);
            Reply::Integer(i64::from_be_bytes(raw))
        }
        t if t == ReplyType::Bulk as u8 => Reply::Bulk(payload.to_vec()),
        t if t == ReplyType::Array as u8 => {
            if payload.len() < 4 {
                return Err(RemoraError::Protocol(
                    "Array reply: missing element count".to_string(),
                ));
            }

            let count =
                u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
            let mut elements = Vec::new();
            let mut offset = 4;

            for index in 0..count {
                let (element, used) = decode_reply_at(&payload[offset..]).map_err(|e| {
                    RemoraError::Protocol(format!("Array reply: element {}: {}", index, e))
                })?;
                elements.push(element);
                offset += used;
            }

            if offset != payload.len() {
                return Err(RemoraError::Protocol(format!(
                    "Array reply: {} trailing bytes after {} elements",
                    payload.len() - offset,
                    count
                )));
            }

            Reply::Array(elements)
        }
        t if t == ReplyType::Nil as u8 => {
            if !payload.is_empty() {
                return Err(RemoraError::Protocol(format!(
                    "Nil reply: unexpected payload of {} bytes",
                    payload.len()
                )));
            }
            Reply::Nil
        }
        t if t == ReplyType::Error as u8 => {
            let message = String::from_utf8(payload.to_vec()).map_err(|_| {
                RemoraError::Protocol("Error reply: message is not valid UTF-8".to_string())
            })?;
            Reply::Error(message)
        }
        _ => {
            return Err(RemoraError::Protocol(format!(
                "Unknown reply tag: 0x{:02x}",
                tag
            )))
        }
    };

    Ok((reply, consumed))
}

// =============================================================================
// Frame helpers
// =============================================================================

/// Build a full frame: tag + payload length + payload
fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(tag);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);
    message
}

/// Validate a frame header and slice out tag and payload
fn split_frame<'a>(bytes: &'a [u8], kind: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(RemoraError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            kind,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let tag = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(RemoraError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            kind, payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(RemoraError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            kind,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one full frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, kind: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(RemoraError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            kind, payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut message = vec![0u8; HEADER_SIZE + payload_len as usize];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "command")?;
    decode_command(&message)
}

/// Write a command to a stream
///
/// The stream is not flushed; flushing is an explicit pipeline barrier
/// owned by the caller.
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    Ok(())
}

/// Read a complete reply from a stream
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let message = read_frame(reader, "reply")?;
    decode_reply(&message)
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let bytes = encode_reply(reply);
    writer.write_all(&bytes)?;
    Ok(())
}
