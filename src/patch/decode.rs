use crate::patch::ops::{HEADER_LEN, PATCH_VERSION, PatchOp, fixed_payload_len, opcode};

/// Why a decode stopped early.
///
/// Records decoded before the failure remain valid and are applied; everything after is discarded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum DecodeError {
    /// Fewer bytes than the fixed header.
    #[error("patch is {len} bytes, shorter than the 6-byte header")]
    TooShort {
        /// Buffer length.
        len: usize,
    },

    /// Header version byte is not [`PATCH_VERSION`].
    #[error("unsupported patch version {0}")]
    UnsupportedVersion(u8),

    /// A record's payload runs past the end of the buffer.
    #[error("record {opcode} at offset {offset} needs {needed} bytes, {available} available")]
    Truncated {
        /// Offset of the opcode byte.
        offset: usize,
        /// Opcode of the truncated record.
        opcode: u8,
        /// Payload bytes the record declares.
        needed: usize,
        /// Payload bytes left in the buffer.
        available: usize,
    },

    /// An opcode outside the known set.
    #[error("unknown opcode {opcode} at offset {offset}")]
    UnknownOpcode {
        /// Offset of the opcode byte.
        offset: usize,
        /// The offending byte.
        opcode: u8,
    },

    /// A string record with a negative declared length.
    #[error("string record at offset {offset} declares negative length {len}")]
    NegativeLength {
        /// Offset of the opcode byte.
        offset: usize,
        /// Declared length.
        len: i32,
    },
}

/// Forward-only, fail-closed record decoder over a borrowed patch buffer.
///
/// Yields `Ok(op)` for every complete record, then at most one `Err` describing why decoding
/// stopped before the end of the buffer, and then nothing.
#[derive(Debug, Clone)]
pub struct PatchDecoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> PatchDecoder<'a> {
    /// Validate the header and position the decoder at the first record.
    pub fn new(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::TooShort { len: bytes.len() });
        }
        if bytes[0] != PATCH_VERSION {
            return Err(DecodeError::UnsupportedVersion(bytes[0]));
        }
        Ok(Self {
            bytes,
            pos: HEADER_LEN,
            done: false,
        })
    }

    /// Number of bytes consumed so far, header included.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn i32_at(&self, at: usize) -> i32 {
        let mut word = [0u8; 4];
        if let Some(src) = self.bytes.get(at..at + 4) {
            word.copy_from_slice(src);
        }
        i32::from_le_bytes(word)
    }

    fn next_record(&mut self) -> Result<PatchOp<'a>, DecodeError> {
        let offset = self.pos;
        let op = self.bytes[offset];
        let body = offset + 1;
        let available = self.bytes.len() - body;

        let needed =
            fixed_payload_len(op).ok_or(DecodeError::UnknownOpcode { offset, opcode: op })?;
        if needed > available {
            return Err(DecodeError::Truncated {
                offset,
                opcode: op,
                needed,
                available,
            });
        }

        let a = self.i32_at(body);
        let b = self.i32_at(body + 4);
        let c = self.i32_at(body + 8);
        let mut end = body + needed;

        let record = match op {
            opcode::CREATE_NODE => PatchOp::CreateNode { id: a, kind: b },
            opcode::DELETE_NODE => PatchOp::DeleteNode { id: a },
            opcode::SET_PROP => PatchOp::SetProp {
                id: a,
                key: b,
                value: c,
            },
            opcode::APPEND_CHILD => PatchOp::AppendChild {
                parent: a,
                child: b,
            },
            opcode::INSERT_CHILD => PatchOp::InsertChild {
                parent: a,
                child: b,
                index: c,
            },
            opcode::REMOVE_CHILD => PatchOp::RemoveChild {
                parent: a,
                child: b,
            },
            opcode::REPLACE_CHILD => PatchOp::ReplaceChild {
                parent: a,
                old: b,
                new: c,
            },
            opcode::SET_PROP_STR => {
                let len = usize::try_from(c)
                    .map_err(|_| DecodeError::NegativeLength { offset, len: c })?;
                let remaining = self.bytes.len() - end;
                if len > remaining {
                    return Err(DecodeError::Truncated {
                        offset,
                        opcode: op,
                        needed: needed + len,
                        available,
                    });
                }
                let bytes = &self.bytes[end..end + len];
                end += len;
                PatchOp::SetPropStr { id: a, key: b, bytes }
            }
            _ => return Err(DecodeError::UnknownOpcode { offset, opcode: op }),
        };

        self.pos = end;
        Ok(record)
    }
}

impl<'a> Iterator for PatchDecoder<'a> {
    type Item = Result<PatchOp<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.bytes.len() {
            self.done = true;
            return None;
        }
        let item = self.next_record();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for PatchDecoder<'_> {}

/// A fully decoded patch, for tooling and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPatch<'a> {
    /// Complete records in document order.
    pub ops: Vec<PatchOp<'a>>,
    /// Why decoding stopped early, if it did.
    pub error: Option<DecodeError>,
    /// Bytes consumed by the header and complete records.
    pub consumed: usize,
}

/// Decode every complete record of `bytes` without applying anything.
pub fn decode_patch(bytes: &[u8]) -> DecodedPatch<'_> {
    let mut decoder = match PatchDecoder::new(bytes) {
        Ok(d) => d,
        Err(e) => {
            return DecodedPatch {
                ops: Vec::new(),
                error: Some(e),
                consumed: 0,
            };
        }
    };

    let mut ops = Vec::new();
    let mut error = None;
    for item in decoder.by_ref() {
        match item {
            Ok(op) => ops.push(op),
            Err(e) => error = Some(e),
        }
    }
    DecodedPatch {
        ops,
        error,
        consumed: decoder.position(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/patch/decode.rs"]
mod tests;
