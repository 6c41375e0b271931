//! In-memory transport
//!
//! Executes the full command surface against an in-process keyspace with
//! the same semantics as the remote store: missing keys read as empty, a
//! key holding the other entry kind answers with an error reply, and a
//! hash or set left empty by a removal disappears from the keyspace.
//!
//! Commands are executed at `send` time and their replies queued, so the
//! issue/flush/recv pipeline behaves exactly as it does over TCP.

use std::collections::hash_map::Entry as KeyEntry;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{RemoraError, Result};
use crate::protocol::{Command, Reply};

use super::Transport;

/// One stored entry: a hash of raw fields or a set of raw members
enum MemEntry {
    Hash(HashMap<Vec<u8>, Vec<u8>>),
    Set(HashSet<Vec<u8>>),
}

/// In-process transport backed by an in-memory keyspace
pub struct MemTransport {
    keyspace: HashMap<String, MemEntry>,
    replies: VecDeque<Reply>,
}

impl MemTransport {
    /// Create a transport over an empty keyspace
    pub fn new() -> Self {
        Self {
            keyspace: HashMap::new(),
            replies: VecDeque::new(),
        }
    }

    fn execute(&mut self, command: &Command) -> Reply {
        match command {
            Command::HashDelete { name, fields } => {
                if fields.is_empty() {
                    return wrong_arity("hash-delete");
                }
                let (reply, drained) = match self.keyspace.get_mut(name) {
                    None => (Reply::Integer(0), false),
                    Some(MemEntry::Set(_)) => (wrong_kind(name), false),
                    Some(MemEntry::Hash(hash)) => {
                        let removed = fields.iter().filter(|f| hash.remove(*f).is_some()).count();
                        (Reply::Integer(removed as i64), hash.is_empty())
                    }
                };
                if drained {
                    self.keyspace.remove(name);
                }
                reply
            }

            Command::HashExists { name, field } => match self.keyspace.get(name) {
                None => Reply::Integer(0),
                Some(MemEntry::Set(_)) => wrong_kind(name),
                Some(MemEntry::Hash(hash)) => Reply::Integer(hash.contains_key(field) as i64),
            },

            Command::HashGet { name, field } => match self.keyspace.get(name) {
                None => Reply::Nil,
                Some(MemEntry::Set(_)) => wrong_kind(name),
                Some(MemEntry::Hash(hash)) => match hash.get(field) {
                    Some(value) => Reply::Bulk(value.clone()),
                    None => Reply::Nil,
                },
            },

            Command::HashKeys { name } => match self.keyspace.get(name) {
                None => Reply::Array(Vec::new()),
                Some(MemEntry::Set(_)) => wrong_kind(name),
                Some(MemEntry::Hash(hash)) => {
                    Reply::Array(hash.keys().map(|k| Reply::Bulk(k.clone())).collect())
                }
            },

            Command::HashLen { name } => match self.keyspace.get(name) {
                None => Reply::Integer(0),
                Some(MemEntry::Set(_)) => wrong_kind(name),
                Some(MemEntry::Hash(hash)) => Reply::Integer(hash.len() as i64),
            },

            Command::HashSet { name, field, value } => {
                match self.hash_entry(name) {
                    None => wrong_kind(name),
                    Some(hash) => {
                        let created = hash.insert(field.clone(), value.clone()).is_none();
                        Reply::Integer(created as i64)
                    }
                }
            }

            Command::HashSetIfAbsent { name, field, value } => match self.hash_entry(name) {
                None => wrong_kind(name),
                Some(hash) => match hash.entry(field.clone()) {
                    KeyEntry::Occupied(_) => Reply::Integer(0),
                    KeyEntry::Vacant(slot) => {
                        slot.insert(value.clone());
                        Reply::Integer(1)
                    }
                },
            },

            Command::HashValues { name } => match self.keyspace.get(name) {
                None => Reply::Array(Vec::new()),
                Some(MemEntry::Set(_)) => wrong_kind(name),
                Some(MemEntry::Hash(hash)) => {
                    Reply::Array(hash.values().map(|v| Reply::Bulk(v.clone())).collect())
                }
            },

            Command::SetAdd { name, members } => {
                if members.is_empty() {
                    return wrong_arity("set-add");
                }
                match self.set_entry(name) {
                    None => wrong_kind(name),
                    Some(set) => {
                        let added = members.iter().filter(|m| set.insert((*m).clone())).count();
                        Reply::Integer(added as i64)
                    }
                }
            }

            Command::SetCard { name } => match self.keyspace.get(name) {
                None => Reply::Integer(0),
                Some(MemEntry::Hash(_)) => wrong_kind(name),
                Some(MemEntry::Set(set)) => Reply::Integer(set.len() as i64),
            },

            Command::SetContains { name, member } => match self.keyspace.get(name) {
                None => Reply::Integer(0),
                Some(MemEntry::Hash(_)) => wrong_kind(name),
                Some(MemEntry::Set(set)) => Reply::Integer(set.contains(member) as i64),
            },

            Command::SetDiff { name, other } => {
                self.algebra(name, other, |a, b| a.difference(b).cloned().collect())
            }

            Command::SetInter { name, other } => {
                self.algebra(name, other, |a, b| a.intersection(b).cloned().collect())
            }

            Command::SetMembers { name } => match self.keyspace.get(name) {
                None => Reply::Array(Vec::new()),
                Some(MemEntry::Hash(_)) => wrong_kind(name),
                Some(MemEntry::Set(set)) => {
                    Reply::Array(set.iter().map(|m| Reply::Bulk(m.clone())).collect())
                }
            },

            Command::SetRemove { name, members } => {
                if members.is_empty() {
                    return wrong_arity("set-remove");
                }
                let (reply, drained) = match self.keyspace.get_mut(name) {
                    None => (Reply::Integer(0), false),
                    Some(MemEntry::Hash(_)) => (wrong_kind(name), false),
                    Some(MemEntry::Set(set)) => {
                        let removed = members.iter().filter(|m| set.remove(*m)).count();
                        (Reply::Integer(removed as i64), set.is_empty())
                    }
                };
                if drained {
                    self.keyspace.remove(name);
                }
                reply
            }

            Command::SetUnion { name, other } => {
                self.algebra(name, other, |a, b| a.union(b).cloned().collect())
            }

            Command::Ping => Reply::Bulk(b"PONG".to_vec()),
        }
    }

    /// The hash at `name`, created empty if absent; `None` if the key
    /// holds a set
    fn hash_entry(&mut self, name: &str) -> Option<&mut HashMap<Vec<u8>, Vec<u8>>> {
        match self
            .keyspace
            .entry(name.to_string())
            .or_insert_with(|| MemEntry::Hash(HashMap::new()))
        {
            MemEntry::Hash(hash) => Some(hash),
            MemEntry::Set(_) => None,
        }
    }

    /// The set at `name`, created empty if absent; `None` if the key
    /// holds a hash
    fn set_entry(&mut self, name: &str) -> Option<&mut HashSet<Vec<u8>>> {
        match self
            .keyspace
            .entry(name.to_string())
            .or_insert_with(|| MemEntry::Set(HashSet::new()))
        {
            MemEntry::Set(set) => Some(set),
            MemEntry::Hash(_) => None,
        }
    }

    /// Compute a server-side set-algebra result over two names
    fn algebra<F>(&self, name: &str, other: &str, op: F) -> Reply
    where
        F: FnOnce(&HashSet<Vec<u8>>, &HashSet<Vec<u8>>) -> Vec<Vec<u8>>,
    {
        let empty = HashSet::new();

        let left = match self.keyspace.get(name) {
            None => &empty,
            Some(MemEntry::Hash(_)) => return wrong_kind(name),
            Some(MemEntry::Set(set)) => set,
        };
        let right = match self.keyspace.get(other) {
            None => &empty,
            Some(MemEntry::Hash(_)) => return wrong_kind(other),
            Some(MemEntry::Set(set)) => set,
        };

        Reply::Array(op(left, right).into_iter().map(Reply::Bulk).collect())
    }
}

impl Default for MemTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemTransport {
    fn send(&mut self, command: &Command) -> Result<()> {
        let reply = self.execute(command);
        self.replies.push_back(reply);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn recv(&mut self) -> Result<Reply> {
        self.replies
            .pop_front()
            .ok_or_else(|| RemoraError::Protocol("No reply pending".to_string()))
    }

    fn is_connected(&self) -> bool {
        true
    }
}

fn wrong_kind(name: &str) -> Reply {
    Reply::Error(format!("Wrong entry kind at key '{}'", name))
}

fn wrong_arity(command: &str) -> Reply {
    Reply::Error(format!("Wrong number of arguments for {}", command))
}
