/// Wire format version accepted by the decoder and written by [`crate::PatchBuilder`].
pub const PATCH_VERSION: u8 = 1;

/// Size of the patch header: version byte plus five reserved bytes.
pub const HEADER_LEN: usize = 6;

/// Record opcodes.
pub mod opcode {
    /// `CREATE_NODE id type`
    pub const CREATE_NODE: u8 = 1;
    /// `DELETE_NODE id`
    pub const DELETE_NODE: u8 = 2;
    /// `SET_PROP id key value`
    pub const SET_PROP: u8 = 3;
    /// `APPEND_CHILD parent child`
    pub const APPEND_CHILD: u8 = 4;
    /// `INSERT_CHILD parent child index`
    pub const INSERT_CHILD: u8 = 5;
    /// `REMOVE_CHILD parent child`
    pub const REMOVE_CHILD: u8 = 6;
    /// `REPLACE_CHILD parent old new`
    pub const REPLACE_CHILD: u8 = 7;
    /// `SET_PROP_STR id key len bytes[len]`
    pub const SET_PROP_STR: u8 = 8;
}

/// Integer and string property keys understood by the scene graph.
pub mod prop {
    /// Main-axis alignment (stored, not used by layout).
    pub const MAIN_ALIGN: i32 = 101;
    /// Cross-axis alignment for Column/Row.
    pub const CROSS_ALIGN: i32 = 102;
    /// Gap between stacked children.
    pub const GAP: i32 = 103;
    /// Packed padding, `top<<24 | right<<16 | bottom<<8 | left`.
    pub const PADDING_LTRB: i32 = 104;
    /// Text payload (string property).
    pub const TEXT: i32 = 201;
    /// Explicit width hint; non-positive means unset.
    pub const SIZE_W: i32 = 301;
    /// Explicit height hint; non-positive means unset.
    pub const SIZE_H: i32 = 302;
}

/// One decoded patch record.
///
/// Fields carry raw wire values; interpretation (id validity, node type codes, property keys)
/// belongs to the tree editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchOp<'a> {
    /// Create a node, or re-tag an existing one.
    CreateNode {
        /// Node identity.
        id: i32,
        /// Node type code.
        kind: i32,
    },
    /// Release a node without touching its children.
    DeleteNode {
        /// Node identity.
        id: i32,
    },
    /// Set an integer property.
    SetProp {
        /// Node identity.
        id: i32,
        /// Property key.
        key: i32,
        /// Untyped 32-bit value.
        value: i32,
    },
    /// Append `child` to `parent`, detaching it from any previous parent.
    AppendChild {
        /// Parent identity.
        parent: i32,
        /// Child identity.
        child: i32,
    },
    /// Same as append; `index` is carried but ignored.
    InsertChild {
        /// Parent identity.
        parent: i32,
        /// Child identity.
        child: i32,
        /// Requested position (ignored).
        index: i32,
    },
    /// Remove `child` from `parent` if present.
    RemoveChild {
        /// Parent identity.
        parent: i32,
        /// Child identity.
        child: i32,
    },
    /// Swap `old` for `new` in `parent`'s child list.
    ReplaceChild {
        /// Parent identity.
        parent: i32,
        /// Child currently in the slot.
        old: i32,
        /// Replacement child.
        new: i32,
    },
    /// Set a string property. Only [`prop::TEXT`] is honored.
    SetPropStr {
        /// Node identity.
        id: i32,
        /// Property key.
        key: i32,
        /// Raw payload bytes, borrowed from the patch.
        bytes: &'a [u8],
    },
}

impl PatchOp<'_> {
    /// Wire opcode for this record.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::CreateNode { .. } => opcode::CREATE_NODE,
            Self::DeleteNode { .. } => opcode::DELETE_NODE,
            Self::SetProp { .. } => opcode::SET_PROP,
            Self::AppendChild { .. } => opcode::APPEND_CHILD,
            Self::InsertChild { .. } => opcode::INSERT_CHILD,
            Self::RemoveChild { .. } => opcode::REMOVE_CHILD,
            Self::ReplaceChild { .. } => opcode::REPLACE_CHILD,
            Self::SetPropStr { .. } => opcode::SET_PROP_STR,
        }
    }

    /// Short human-readable record name, used in logs and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateNode { .. } => "CREATE_NODE",
            Self::DeleteNode { .. } => "DELETE_NODE",
            Self::SetProp { .. } => "SET_PROP",
            Self::AppendChild { .. } => "APPEND_CHILD",
            Self::InsertChild { .. } => "INSERT_CHILD",
            Self::RemoveChild { .. } => "REMOVE_CHILD",
            Self::ReplaceChild { .. } => "REPLACE_CHILD",
            Self::SetPropStr { .. } => "SET_PROP_STR",
        }
    }
}

/// Fixed payload length (after the opcode byte) for an opcode, or `None` if unknown.
///
/// For `SET_PROP_STR` this is the fixed prefix only; the string bytes follow.
pub fn fixed_payload_len(op: u8) -> Option<usize> {
    match op {
        opcode::DELETE_NODE => Some(4),
        opcode::CREATE_NODE | opcode::APPEND_CHILD | opcode::REMOVE_CHILD => Some(8),
        opcode::SET_PROP | opcode::INSERT_CHILD | opcode::REPLACE_CHILD | opcode::SET_PROP_STR => {
            Some(12)
        }
        _ => None,
    }
}
