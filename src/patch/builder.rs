use crate::patch::ops::{HEADER_LEN, PATCH_VERSION, opcode, prop};
use crate::scene::node::{Align, NodeKind, Padding};

/// Encoder for the binary patch format.
///
/// Layout: `[u8 version=1][u8 reserved=0][u32 body length]` followed by little-endian records.
/// The decoder treats bytes 1..6 as reserved; the length is written for producers and tools that
/// want to frame patches on a stream.
#[derive(Debug, Clone)]
pub struct PatchBuilder {
    buf: Vec<u8>,
}

impl Default for PatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchBuilder {
    /// Start an empty patch.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Start an empty patch with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(HEADER_LEN));
        buf.extend_from_slice(&[PATCH_VERSION, 0, 0, 0, 0, 0]);
        Self { buf }
    }

    fn op(&mut self, code: u8, words: &[i32]) -> &mut Self {
        self.buf.push(code);
        for w in words {
            self.buf.extend_from_slice(&w.to_le_bytes());
        }
        self
    }

    /// `CREATE_NODE`
    pub fn create_node(&mut self, id: i32, kind: NodeKind) -> &mut Self {
        self.create_node_raw(id, kind.code())
    }

    /// `CREATE_NODE` with an arbitrary type code.
    pub fn create_node_raw(&mut self, id: i32, kind: i32) -> &mut Self {
        self.op(opcode::CREATE_NODE, &[id, kind])
    }

    /// `DELETE_NODE`
    pub fn delete_node(&mut self, id: i32) -> &mut Self {
        self.op(opcode::DELETE_NODE, &[id])
    }

    /// `SET_PROP` with a raw key and value.
    pub fn set_prop(&mut self, id: i32, key: i32, value: i32) -> &mut Self {
        self.op(opcode::SET_PROP, &[id, key, value])
    }

    /// `SET_PROP` for a float value, sent as its bit pattern.
    pub fn set_prop_f32(&mut self, id: i32, key: i32, value: f32) -> &mut Self {
        self.set_prop(id, key, i32::from_le_bytes(value.to_le_bytes()))
    }

    /// Set main- and cross-axis alignment.
    pub fn set_align(&mut self, id: i32, main: Align, cross: Align) -> &mut Self {
        self.set_prop(id, prop::MAIN_ALIGN, main.code())
            .set_prop(id, prop::CROSS_ALIGN, cross.code())
    }

    /// Set the stacking gap.
    pub fn set_gap(&mut self, id: i32, gap: i32) -> &mut Self {
        self.set_prop(id, prop::GAP, gap)
    }

    /// Set padding, packed into one word.
    pub fn set_padding(&mut self, id: i32, padding: Padding) -> &mut Self {
        self.set_prop(id, prop::PADDING_LTRB, padding.pack())
    }

    /// Set explicit width and height hints.
    pub fn set_size(&mut self, id: i32, width: i32, height: i32) -> &mut Self {
        self.set_prop(id, prop::SIZE_W, width)
            .set_prop(id, prop::SIZE_H, height)
    }

    /// `APPEND_CHILD`
    pub fn append_child(&mut self, parent: i32, child: i32) -> &mut Self {
        self.op(opcode::APPEND_CHILD, &[parent, child])
    }

    /// `INSERT_CHILD`
    pub fn insert_child(&mut self, parent: i32, child: i32, index: i32) -> &mut Self {
        self.op(opcode::INSERT_CHILD, &[parent, child, index])
    }

    /// `REMOVE_CHILD`
    pub fn remove_child(&mut self, parent: i32, child: i32) -> &mut Self {
        self.op(opcode::REMOVE_CHILD, &[parent, child])
    }

    /// `REPLACE_CHILD`
    pub fn replace_child(&mut self, parent: i32, old: i32, new: i32) -> &mut Self {
        self.op(opcode::REPLACE_CHILD, &[parent, old, new])
    }

    /// `SET_PROP_STR` with a raw key.
    pub fn set_prop_str(&mut self, id: i32, key: i32, value: &str) -> &mut Self {
        let len = i32::try_from(value.len()).unwrap_or(i32::MAX);
        let take = usize::try_from(len).unwrap_or(0);
        self.op(opcode::SET_PROP_STR, &[id, key, len]);
        self.buf.extend_from_slice(&value.as_bytes()[..take]);
        self
    }

    /// Set the text payload of a Text or Button node.
    pub fn set_text(&mut self, id: i32, text: &str) -> &mut Self {
        self.set_prop_str(id, prop::TEXT, text)
    }

    /// Append raw bytes verbatim (for framing experiments and malformed-input tests).
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Current encoded size, header included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Return `true` when no records have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == HEADER_LEN
    }

    /// Finish the patch, stamping the body length into the header.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.buf.clone();
        let body = u32::try_from(out.len() - HEADER_LEN).unwrap_or(u32::MAX);
        out[2..HEADER_LEN].copy_from_slice(&body.to_le_bytes());
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/patch/builder.rs"]
mod tests;
