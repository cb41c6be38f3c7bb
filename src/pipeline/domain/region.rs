/// Axis-aligned rectangle inside a rotated frame.
///
/// Always contained in the frame it was computed for: `x + width <= frame_width`
/// and `y + height <= frame_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOfInterest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionOfInterest {
    /// Centered region sized as a fraction of the frame, clamped to the frame bounds.
    ///
    /// The origin never goes below zero and the size is only ever reduced to fit.
    pub fn centered(
        frame_width: u32,
        frame_height: u32,
        width_ratio: f32,
        height_ratio: f32,
    ) -> Self {
        let (x, width) = centered_span(frame_width, width_ratio);
        let (y, height) = centered_span(frame_height, height_ratio);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x as u64 + self.width as u64 <= frame_width as u64
            && self.y as u64 + self.height as u64 <= frame_height as u64
    }
}

fn centered_span(extent: u32, ratio: f32) -> (u32, u32) {
    let extent = extent as i64;
    let span = (extent as f64 * ratio as f64) as i64;
    let origin = ((extent - span) / 2).max(0);
    let span = span.min(extent - origin).max(0);
    (origin as u32, span as u32)
}

/// Bounding box of a detected text region, in region-of-interest pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whole-pixel center, rounded toward negative infinity like the
    /// detection engine's own rectangle type.
    pub fn center(&self) -> (f32, f32) {
        (
            midpoint(self.x, self.width) as f32,
            midpoint(self.y, self.height) as f32,
        )
    }
}

fn midpoint(origin: i32, extent: u32) -> i64 {
    let start = origin as i64;
    (start + start + extent as i64) >> 1
}
