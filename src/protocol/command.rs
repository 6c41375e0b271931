//! Command definitions
//!
//! Represents the hash and set primitives issued against the store.
//! Operands are raw byte strings; typed encoding happens above this layer.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    HashDelete = 0x01,
    HashExists = 0x02,
    HashGet = 0x03,
    HashKeys = 0x04,
    HashLen = 0x05,
    HashSet = 0x06,
    HashSetIfAbsent = 0x07,
    HashValues = 0x08,
    SetAdd = 0x09,
    SetCard = 0x0A,
    SetContains = 0x0B,
    SetDiff = 0x0C,
    SetInter = 0x0D,
    SetMembers = 0x0E,
    SetRemove = 0x0F,
    SetUnion = 0x10,
    Ping = 0x11,
}

/// A parsed command
///
/// `name` is the store key the container is bound to; `field`, `value`
/// and `members` carry encoded operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Remove fields from a hash; replies with the count removed
    HashDelete { name: String, fields: Vec<Vec<u8>> },

    /// Test whether a hash field exists; replies 0 or 1
    HashExists { name: String, field: Vec<u8> },

    /// Fetch one hash field; replies bulk or nil
    HashGet { name: String, field: Vec<u8> },

    /// Fetch every field key of a hash; replies an array of bulks
    HashKeys { name: String },

    /// Count the fields of a hash
    HashLen { name: String },

    /// Unconditional upsert; replies 1 if the field was created
    HashSet {
        name: String,
        field: Vec<u8>,
        value: Vec<u8>,
    },

    /// Upsert only if the field does not exist; replies 1 if created
    HashSetIfAbsent {
        name: String,
        field: Vec<u8>,
        value: Vec<u8>,
    },

    /// Fetch every field value of a hash; replies an array of bulks
    HashValues { name: String },

    /// Add members to a set; replies with the count newly inserted
    SetAdd { name: String, members: Vec<Vec<u8>> },

    /// Count the members of a set
    SetCard { name: String },

    /// Test set membership; replies 0 or 1
    SetContains { name: String, member: Vec<u8> },

    /// Members of `name` absent from `other`; replies an array of bulks
    SetDiff { name: String, other: String },

    /// Members present in both sets; replies an array of bulks
    SetInter { name: String, other: String },

    /// Fetch every member of a set; replies an array of bulks
    SetMembers { name: String },

    /// Remove members from a set; replies with the count removed
    SetRemove { name: String, members: Vec<Vec<u8>> },

    /// Members present in either set; replies an array of bulks
    SetUnion { name: String, other: String },

    /// Health check; replies bulk "PONG"
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::HashDelete { .. } => CommandType::HashDelete,
            Command::HashExists { .. } => CommandType::HashExists,
            Command::HashGet { .. } => CommandType::HashGet,
            Command::HashKeys { .. } => CommandType::HashKeys,
            Command::HashLen { .. } => CommandType::HashLen,
            Command::HashSet { .. } => CommandType::HashSet,
            Command::HashSetIfAbsent { .. } => CommandType::HashSetIfAbsent,
            Command::HashValues { .. } => CommandType::HashValues,
            Command::SetAdd { .. } => CommandType::SetAdd,
            Command::SetCard { .. } => CommandType::SetCard,
            Command::SetContains { .. } => CommandType::SetContains,
            Command::SetDiff { .. } => CommandType::SetDiff,
            Command::SetInter { .. } => CommandType::SetInter,
            Command::SetMembers { .. } => CommandType::SetMembers,
            Command::SetRemove { .. } => CommandType::SetRemove,
            Command::SetUnion { .. } => CommandType::SetUnion,
            Command::Ping => CommandType::Ping,
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self.command_type() {
            CommandType::HashDelete => "hash-delete",
            CommandType::HashExists => "hash-exists",
            CommandType::HashGet => "hash-get",
            CommandType::HashKeys => "hash-keys",
            CommandType::HashLen => "hash-len",
            CommandType::HashSet => "hash-set",
            CommandType::HashSetIfAbsent => "hash-set-if-absent",
            CommandType::HashValues => "hash-values",
            CommandType::SetAdd => "set-add",
            CommandType::SetCard => "set-card",
            CommandType::SetContains => "set-contains",
            CommandType::SetDiff => "set-diff",
            CommandType::SetInter => "set-inter",
            CommandType::SetMembers => "set-members",
            CommandType::SetRemove => "set-remove",
            CommandType::SetUnion => "set-union",
            CommandType::Ping => "ping",
        }
    }
}
