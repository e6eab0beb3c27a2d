use smallvec::SmallVec;

use crate::foundation::core::NodeId;
use crate::scene::store::NodeKey;

/// Closed set of node types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// Vertical stack.
    Column,
    /// Horizontal stack.
    Row,
    /// Centers its first child.
    Center,
    /// Passes its own box through to its first child.
    SizedBox,
    /// Text leaf.
    Text,
    /// Button leaf.
    Button,
}

impl NodeKind {
    /// Map a wire type code.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::Column,
            2 => Self::Row,
            3 => Self::Center,
            4 => Self::SizedBox,
            5 => Self::Text,
            6 => Self::Button,
            _ => return None,
        })
    }

    /// Wire type code.
    pub fn code(self) -> i32 {
        match self {
            Self::Column => 1,
            Self::Row => 2,
            Self::Center => 3,
            Self::SizedBox => 4,
            Self::Text => 5,
            Self::Button => 6,
        }
    }

    /// Content-bearing kinds are always painted as leaves.
    pub fn is_content(self) -> bool {
        matches!(self, Self::Text | Self::Button)
    }
}

/// Start/center/end alignment. Unknown wire values behave as `Start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Align {
    /// Align to the leading edge.
    #[default]
    Start,
    /// Center in the available space.
    Center,
    /// Align to the trailing edge.
    End,
}

impl Align {
    /// Interpret a raw property value.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Center,
            2 => Self::End,
            _ => Self::Start,
        }
    }

    /// Wire value.
    pub fn code(self) -> i32 {
        match self {
            Self::Start => 0,
            Self::Center => 1,
            Self::End => 2,
        }
    }

    /// Offset of an item of size `item` inside `avail`. May be negative when the item overflows.
    pub fn offset(self, avail: i32, item: i32) -> i32 {
        match self {
            Self::Start => 0,
            Self::Center => avail.saturating_sub(item) / 2,
            Self::End => avail.saturating_sub(item),
        }
    }
}

/// Four 8-bit padding channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Padding {
    /// Left inset.
    pub left: u8,
    /// Top inset.
    pub top: u8,
    /// Right inset.
    pub right: u8,
    /// Bottom inset.
    pub bottom: u8,
}

impl Padding {
    /// Unpack `top<<24 | right<<16 | bottom<<8 | left`.
    pub fn unpack(bits: i32) -> Self {
        let [left, bottom, right, top] = bits.to_le_bytes();
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Pack into the wire word.
    pub fn pack(self) -> i32 {
        i32::from_le_bytes([self.left, self.bottom, self.right, self.top])
    }
}

/// Layout-affecting properties of a node, as last set by patches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct NodeProps {
    /// Main-axis alignment. Stored for producers; layout does not consume it.
    pub main_align: Align,
    /// Cross-axis alignment for Column/Row.
    pub cross_align: Align,
    /// Raw gap value; negative values lay out as 0.
    pub gap: i32,
    /// Content inset.
    pub padding: Padding,
    /// Explicit width; non-positive means unset.
    pub width: i32,
    /// Explicit height; non-positive means unset.
    pub height: i32,
}

impl NodeProps {
    /// Explicit width, if set.
    pub fn width_hint(&self) -> Option<i32> {
        (self.width > 0).then_some(self.width)
    }

    /// Explicit height, if set.
    pub fn height_hint(&self) -> Option<i32> {
        (self.height > 0).then_some(self.height)
    }
}

/// One element of the retained tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) props: NodeProps,
    pub(crate) text: Option<String>,
    pub(crate) children: SmallVec<[NodeKey; 4]>,
    pub(crate) parent: Option<NodeKey>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            props: NodeProps::default(),
            text: None,
            children: SmallVec::new(),
            parent: None,
        }
    }

    /// Caller-assigned identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node type.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Layout properties.
    pub fn props(&self) -> &NodeProps {
        &self.props
    }

    /// Text payload, if one was set.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Painted as a filled leaf rather than an outlined container.
    pub fn is_leaf(&self) -> bool {
        self.kind.is_content() || self.children.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
