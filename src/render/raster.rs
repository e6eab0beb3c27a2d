use crate::foundation::core::{Rect, Rgb8, Surface};
use crate::layout::LayoutTree;

/// Frame background.
pub const BACKGROUND: Rgb8 = Rgb8::new(24, 24, 24);
/// Fill for leaf nodes.
pub const LEAF_FILL: Rgb8 = Rgb8::new(66, 135, 245);
/// Outline for container nodes.
pub const CONTAINER_OUTLINE: Rgb8 = Rgb8::new(160, 160, 160);

/// Leaves are filled this many pixels inside their box.
pub const LEAF_INSET: i32 = 4;
/// Container outline thickness.
pub const OUTLINE_WIDTH: i32 = 2;

/// A rendered frame as RGB8 pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes.
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// Allocate a frame cleared to `clear`. Returns `None` when the buffer cannot be reserved.
    pub fn try_new(surface: Surface, clear: Rgb8) -> Option<Self> {
        let len = surface.rgb8_len();
        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        let px = clear.to_array();
        data.extend(std::iter::repeat_n(px, len / 3).flatten());
        Some(Self {
            width: surface.width,
            height: surface.height,
            data,
        })
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        let p = self.data.get(i..i + 3)?;
        Some(Rgb8::new(p[0], p[1], p[2]))
    }

    /// Fill `rect` with `color`, clipping silently at the frame edges.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb8) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let px = color.to_array();
        let stride = self.width as usize * 3;
        for y in y0..y1 {
            let row = &mut self.data[y * stride + x0 * 3..y * stride + x1 * 3];
            for chunk in row.chunks_exact_mut(3) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// Draw a `thickness`-pixel frame along the inside of `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: i32, color: Rgb8) {
        let Rect { x, y, w, h } = rect;
        let far_x = x.saturating_add(w).saturating_sub(thickness);
        let far_y = y.saturating_add(h).saturating_sub(thickness);
        self.fill_rect(Rect::new(x, y, w, thickness), color);
        self.fill_rect(Rect::new(x, far_y, w, thickness), color);
        self.fill_rect(Rect::new(x, y, thickness, h), color);
        self.fill_rect(Rect::new(far_x, y, thickness, h), color);
    }

    // Half-open pixel span of `rect` inside the frame.
    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        if rect.is_empty() {
            return None;
        }
        let fw = i64::from(self.width);
        let fh = i64::from(self.height);
        let x0 = i64::from(rect.x).clamp(0, fw);
        let y0 = i64::from(rect.y).clamp(0, fh);
        let x1 = (i64::from(rect.x) + i64::from(rect.w)).clamp(0, fw);
        let y1 = (i64::from(rect.y) + i64::from(rect.h)).clamp(0, fh);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((
            usize::try_from(x0).ok()?,
            usize::try_from(y0).ok()?,
            usize::try_from(x1).ok()?,
            usize::try_from(y1).ok()?,
        ))
    }
}

/// Paint every laid-out node in pre-order. Returns the number of nodes painted.
pub fn paint(frame: &mut FrameRgb8, layout: &LayoutTree) -> usize {
    for entry in layout.entries() {
        if entry.leaf {
            frame.fill_rect(entry.rect.inset(LEAF_INSET), LEAF_FILL);
        } else {
            frame.stroke_rect(entry.rect, OUTLINE_WIDTH, CONTAINER_OUTLINE);
        }
    }
    layout.len()
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
