use crate::foundation::error::{CanopyError, CanopyResult};

/// Caller-assigned node identity, stable across patches.
///
/// Valid identities are strictly positive; the wire format carries them as signed 32-bit values.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Convert a raw wire value, rejecting zero and negative identities.
    pub fn from_wire(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().filter(|&v| v > 0).map(Self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer pixel rectangle in surface space. `w`/`h` may be zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Create a rectangle from origin and size.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Shrink by `d` on every side. The result may have a non-positive size.
    pub fn inset(self, d: i32) -> Self {
        Self {
            x: self.x.saturating_add(d),
            y: self.y.saturating_add(d),
            w: self.w.saturating_sub(d.saturating_mul(2)),
            h: self.h.saturating_sub(d.saturating_mul(2)),
        }
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Surface {
    /// Create a validated surface with non-zero dimensions that fit the layout coordinate space.
    pub fn new(width: u32, height: u32) -> CanopyResult<Self> {
        if width == 0 || height == 0 {
            return Err(CanopyError::validation("surface width/height must be > 0"));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(CanopyError::validation(
                "surface width/height must fit in a signed 32-bit coordinate",
            ));
        }
        Ok(Self { width, height })
    }

    /// The full-surface rectangle assigned to the layout root.
    pub fn bounds(self) -> Rect {
        Rect::new(
            0,
            0,
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }

    /// Byte length of a tightly packed RGB8 frame for this surface.
    pub fn rgb8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(3)
    }
}

/// Opaque RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels in memory order.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
