//! Wire Protocol Tests
//!
//! Tests for command and reply frame encoding/decoding.
//!
//! These tests verify:
//! - Frame round-trips for representative commands and every reply shape
//! - Rejection of truncated, oversized, and malformed frames
//! - Stream-based read/write helpers

use std::io::Cursor;

use remora::protocol::{
    decode_command, decode_reply, encode_command, encode_reply, read_command, read_reply,
    write_command, write_reply, Command, Reply, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
use remora::RemoraError;

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_hash_set() {
    let cmd = Command::HashSet {
        name: "scores".to_string(),
        field: b"player-one".to_vec(),
        value: b"9000".to_vec(),
    };

    let encoded = encode_command(&cmd);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_hash_get() {
    let cmd = Command::HashGet {
        name: "scores".to_string(),
        field: b"player-one".to_vec(),
    };

    let encoded = encode_command(&cmd);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_hash_delete_multiple_fields() {
    let cmd = Command::HashDelete {
        name: "scores".to_string(),
        fields: vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()],
    };

    let encoded = encode_command(&cmd);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_name_only_commands() {
    for cmd in [
        Command::HashKeys {
            name: "h".to_string(),
        },
        Command::HashLen {
            name: "h".to_string(),
        },
        Command::HashValues {
            name: "h".to_string(),
        },
        Command::SetCard {
            name: "s".to_string(),
        },
        Command::SetMembers {
            name: "s".to_string(),
        },
    ] {
        let encoded = encode_command(&cmd);
        assert_eq!(decode_command(&encoded).unwrap(), cmd);
    }
}

#[test]
fn test_encode_decode_set_add() {
    let cmd = Command::SetAdd {
        name: "tags".to_string(),
        members: vec![b"Hello".to_vec(), b"you".to_vec()],
    };

    let encoded = encode_command(&cmd);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_encode_decode_set_algebra() {
    for cmd in [
        Command::SetDiff {
            name: "a".to_string(),
            other: "b".to_string(),
        },
        Command::SetInter {
            name: "a".to_string(),
            other: "b".to_string(),
        },
        Command::SetUnion {
            name: "a".to_string(),
            other: "b".to_string(),
        },
    ] {
        let encoded = encode_command(&cmd);
        assert_eq!(decode_command(&encoded).unwrap(), cmd);
    }
}

#[test]
fn test_encode_decode_ping() {
    let encoded = encode_command(&Command::Ping);
    assert_eq!(decode_command(&encoded).unwrap(), Command::Ping);
}

#[test]
fn test_empty_operands_survive_the_wire() {
    let cmd = Command::HashSet {
        name: "h".to_string(),
        field: Vec::new(),
        value: Vec::new(),
    };

    let encoded = encode_command(&cmd);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

// =============================================================================
// Malformed Command Tests
// =============================================================================

#[test]
fn test_decode_command_incomplete_header() {
    let result = decode_command(&[0x01, 0x00]);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_command_truncated_payload() {
    let mut encoded = encode_command(&Command::HashKeys {
        name: "h".to_string(),
    });
    encoded.truncate(encoded.len() - 1);

    let result = decode_command(&encoded);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_command_unknown_tag() {
    let mut encoded = encode_command(&Command::Ping);
    encoded[0] = 0xEE;

    let result = decode_command(&encoded);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_command_wrong_arity() {
    // A hash-get frame with only the name argument.
    let mut encoded = encode_command(&Command::HashKeys {
        name: "h".to_string(),
    });
    encoded[0] = 0x03; // hash-get tag

    let result = decode_command(&encoded);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_command_oversized_payload() {
    let mut frame = vec![0x04]; // hash-keys tag
    frame.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());

    let result = decode_command(&frame);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_command_non_utf8_name() {
    // argc = 1, one argument of invalid UTF-8.
    let mut payload = Vec::new();
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&2u32.to_be_bytes());
    payload.extend_from_slice(&[0xFF, 0xFE]);

    let mut frame = vec![0x04]; // hash-keys tag
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);

    let result = decode_command(&frame);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

// =============================================================================
// Reply Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_integer_reply() {
    for value in [0i64, 1, -1, i64::MIN, i64::MAX] {
        let encoded = encode_reply(&Reply::Integer(value));
        assert_eq!(decode_reply(&encoded).unwrap(), Reply::Integer(value));
    }
}

#[test]
fn test_encode_decode_bulk_reply() {
    let reply = Reply::Bulk(b"Hello World!".to_vec());
    let encoded = encode_reply(&reply);
    assert_eq!(decode_reply(&encoded).unwrap(), reply);

    let empty = Reply::Bulk(Vec::new());
    let encoded = encode_reply(&empty);
    assert_eq!(decode_reply(&encoded).unwrap(), empty);
}

#[test]
fn test_encode_decode_nil_reply() {
    let encoded = encode_reply(&Reply::Nil);
    assert_eq!(encoded.len(), HEADER_SIZE);
    assert_eq!(decode_reply(&encoded).unwrap(), Reply::Nil);
}

#[test]
fn test_encode_decode_error_reply() {
    let reply = Reply::Error("Wrong entry kind at key 'h'".to_string());
    let encoded = encode_reply(&reply);
    assert_eq!(decode_reply(&encoded).unwrap(), reply);
}

#[test]
fn test_encode_decode_array_reply() {
    let reply = Reply::Array(vec![
        Reply::Bulk(b"how".to_vec()),
        Reply::Bulk(b"are".to_vec()),
        Reply::Nil,
        Reply::Integer(5),
    ]);

    let encoded = encode_reply(&reply);
    assert_eq!(decode_reply(&encoded).unwrap(), reply);
}

#[test]
fn test_encode_decode_empty_array_reply() {
    let reply = Reply::Array(Vec::new());
    let encoded = encode_reply(&reply);
    assert_eq!(decode_reply(&encoded).unwrap(), reply);
}

#[test]
fn test_encode_decode_nested_array_reply() {
    let reply = Reply::Array(vec![
        Reply::Array(vec![Reply::Bulk(b"inner".to_vec())]),
        Reply::Integer(2),
    ]);

    let encoded = encode_reply(&reply);
    assert_eq!(decode_reply(&encoded).unwrap(), reply);
}

// =============================================================================
// Malformed Reply Tests
// =============================================================================

#[test]
fn test_decode_reply_bad_integer_width() {
    // Integer tag with a 4-byte payload.
    let mut frame = vec![0x00];
    frame.extend_from_slice(&4u32.to_be_bytes());
    frame.extend_from_slice(&[0, 0, 0, 7]);

    let result = decode_reply(&frame);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_reply_nil_with_payload() {
    let mut frame = vec![0x03];
    frame.extend_from_slice(&1u32.to_be_bytes());
    frame.push(0x00);

    let result = decode_reply(&frame);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_reply_truncated_array_element() {
    let mut encoded = encode_reply(&Reply::Array(vec![Reply::Bulk(b"x".to_vec())]));
    // Claim two elements but carry one.
    let count_offset = HEADER_SIZE;
    encoded[count_offset..count_offset + 4].copy_from_slice(&2u32.to_be_bytes());

    let result = decode_reply(&encoded);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

#[test]
fn test_decode_reply_unknown_tag() {
    let mut encoded = encode_reply(&Reply::Nil);
    encoded[0] = 0xEE;

    let result = decode_reply(&encoded);
    assert!(matches!(result, Err(RemoraError::Protocol(_))));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_write_read_command_stream() {
    let cmd = Command::SetContains {
        name: "tags".to_string(),
        member: b"Hello".to_vec(),
    };

    let mut buffer = Vec::new();
    write_command(&mut buffer, &cmd).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_command(&mut cursor).unwrap(), cmd);
}

#[test]
fn test_write_read_reply_stream() {
    let reply = Reply::Array(vec![
        Reply::Bulk(b"these?".to_vec()),
        Reply::Bulk(b"you".to_vec()),
    ]);

    let mut buffer = Vec::new();
    write_reply(&mut buffer, &reply).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_reply(&mut cursor).unwrap(), reply);
}

#[test]
fn test_pipelined_frames_read_in_order() {
    let mut buffer = Vec::new();
    write_reply(&mut buffer, &Reply::Integer(1)).unwrap();
    write_reply(&mut buffer, &Reply::Nil).unwrap();
    write_reply(&mut buffer, &Reply::Bulk(b"PONG".to_vec())).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Integer(1));
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Nil);
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Bulk(b"PONG".to_vec()));
}

#[test]
fn test_read_reply_eof_is_io_error() {
    let mut cursor = Cursor::new(vec![0x00, 0x00]);
    let result = read_reply(&mut cursor);
    assert!(matches!(result, Err(RemoraError::Io(_))));
}
