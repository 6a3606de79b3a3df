use crate::foundation::error::{CanvasError, CanvasResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Stable identifier of a layer for the lifetime of a canvas session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Axis-aligned world-space box stored as origin + size.
///
/// Kept as `(x, y, width, height)` rather than a [`Rect`] so that the ratio of a snapped
/// selection is computed from exactly the values the snapping produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, `>= 0`.
    pub width: f64,
    /// Height, `>= 0`.
    pub height: f64,
}

impl Region {
    /// Create a region from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a region and reject non-finite or non-positive sizes.
    pub fn positive(x: f64, y: f64, width: f64, height: f64) -> CanvasResult<Self> {
        let r = Self::new(x, y, width, height);
        r.ensure_positive()?;
        Ok(r)
    }

    /// Validate that all fields are finite and the size is strictly positive.
    pub fn ensure_positive(&self) -> CanvasResult<()> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(CanvasError::validation("region fields must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CanvasError::validation(
                "region width and height must be > 0",
            ));
        }
        Ok(())
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width over height; a zero height yields `1.0`.
    pub fn ratio(&self) -> f64 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Edge-inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// `true` when the interiors overlap.
    pub fn intersects(&self, other: &Region) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Same size, new origin.
    pub fn with_origin(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Smallest region containing both.
    pub fn union(&self, other: &Region) -> Region {
        Region::from_rect(self.to_rect().union(other.to_rect()))
    }

    /// Bounding box of every region in `regions`, or `None` when empty.
    pub fn bounding<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Option<Region> {
        regions
            .into_iter()
            .fold(None, |acc: Option<Region>, r| match acc {
                None => Some(*r),
                Some(a) => Some(a.union(r)),
            })
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Convert from a kurbo rectangle (normalized).
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
