//! Detection geometry: corner-format boxes and the centroids derived from them.
//!
//! Coordinates are integer pixels with the vertical axis growing downward, so a
//! numerically larger `y` is physically lower in the frame.

use nalgebra::Point2;

/// Integer centroid of a detection in frame pixel space.
pub type Centroid = Point2<i32>;

/// Axis-aligned detection box in corner format (start-x, start-y, end-x, end-y).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl BoundingBox {
    #[inline]
    pub fn new(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Create a box from its center point and size, the way detector heads
    /// report them.
    #[inline]
    pub fn from_center(cx: i32, cy: i32, width: i32, height: i32) -> Self {
        let half_w = width / 2;
        let half_h = height / 2;
        Self {
            start_x: cx.saturating_sub(half_w),
            start_y: cy.saturating_sub(half_h),
            end_x: cx.saturating_add(half_w),
            end_y: cy.saturating_add(half_h),
        }
    }

    /// Convert to corner format: (start_x, start_y, end_x, end_y).
    #[inline]
    pub fn to_corners(&self) -> [i32; 4] {
        [self.start_x, self.start_y, self.end_x, self.end_y]
    }

    /// Midpoint of the box, truncated toward zero.
    ///
    /// Boxes with start > end are not rejected; the arithmetic result is used
    /// as-is. The sum is widened so extreme coordinates cannot overflow.
    #[inline]
    pub fn centroid(&self) -> Centroid {
        let cx = (i64::from(self.start_x) + i64::from(self.end_x)) / 2;
        let cy = (i64::from(self.start_y) + i64::from(self.end_y)) / 2;
        Centroid::new(cx as i32, cy as i32)
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(corners: [i32; 4]) -> Self {
        Self::new(corners[0], corners[1], corners[2], corners[3])
    }
}

/// Euclidean pixel distance between two centroids.
#[inline]
pub fn centroid_distance(a: &Centroid, b: &Centroid) -> f64 {
    nalgebra::distance(&a.cast::<f64>(), &b.cast::<f64>())
}
