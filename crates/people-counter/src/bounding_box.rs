use serde::{Deserialize, Serialize};

/// BoundingBox represents an axis-aligned region of a frame in integer pixel co-ordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left of the bounding box (i.e. min-x)
    left: i32,
    /// Top of the bounding box (i.e. min-y)
    top: i32,
    /// Right of the bounding box (i.e. max-x)
    right: i32,
    /// Bottom of the bounding box (i.e. max-y)
    bottom: i32,
}

impl BoundingBox {
    /// Returns a new BoundingBox
    ///
    /// # Parameters
    ///
    /// * `left`: Bounding box left.
    /// * `top`: Bounding box top.
    /// * `right`: Bounding box right.
    /// * `bottom`: Bounding box bottom.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> BoundingBox {
        BoundingBox {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Returns a new BoundingBox from a top-left corner and a size.
    pub fn from_tlwh(left: i32, top: i32, width: i32, height: i32) -> BoundingBox {
        BoundingBox::new(left, top, left + width, top + height)
    }

    /// Returns the left of the bounding box
    pub fn left(&self) -> i32 {
        self.left
    }

    /// Returns the top of the bounding box
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Returns the right of the bounding box
    pub fn right(&self) -> i32 {
        self.right
    }

    /// Returns the bottom of the bounding box
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Returns the width of the bounding box
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Returns the height of the bounding box
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns the center of the bounding box as `(x, y)`.
    ///
    /// Both co-ordinates use floor division so that rendering and distance gating agree on the same pixel.
    pub fn center(&self) -> (i32, i32) {
        // the floored midpoint of two i32 values always fits in an i32
        let midpoint = |a: i32, b: i32| (i64::from(a) + i64::from(b)).div_euclid(2) as i32;
        (
            midpoint(self.left, self.right),
            midpoint(self.top, self.bottom),
        )
    }

    /// Returns the Euclidean distance between the centers of two bounding boxes.
    pub fn distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let dx = i64::from(ax) - i64::from(bx);
        let dy = i64::from(ay) - i64::from(by);
        (dx as f64).hypot(dy as f64)
    }

    /// Returns the bounding box in top-left, bottom-right format, i.e., `(min x, min y, max x, max y)`.
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn center() {
        let bbox = BoundingBox::new(10, 20, 31, 45);
        assert_eq!(bbox.center(), (20, 32));
    }

    #[test]
    fn center_floors_negative_sums() {
        let bbox = BoundingBox::new(-3, -5, 0, 0);
        assert_eq!(bbox.center(), (-2, -3));
    }

    #[test]
    fn from_tlwh() {
        let bbox = BoundingBox::from_tlwh(1, 2, 13, 4);
        assert_eq!(bbox.to_tlbr(), [1, 2, 14, 6]);
        assert_eq!(bbox.width(), 13);
        assert_eq!(bbox.height(), 4);
    }

    #[test]
    fn distance() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(6, 8, 16, 18);
        assert_approx_eq!(a.distance(&b), 10.0);
        assert_approx_eq!(b.distance(&a), 10.0);
        assert_approx_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn distance_uses_truncated_centers() {
        // centers (0, 0) and (1, 0) after flooring (1 / 2 and 3 / 2)
        let a = BoundingBox::new(0, 0, 1, 1);
        let b = BoundingBox::new(1, 0, 2, 1);
        assert_approx_eq!(a.distance(&b), 1.0);
    }

    #[test]
    fn distance_resolves_large_offsets() {
        // centers (0, 0) and (4096, 1): just over 4096 pixels apart
        let a = BoundingBox::new(-10, -10, 10, 10);
        let b = BoundingBox::new(4086, -9, 4106, 11);
        assert!(a.distance(&b) > 4096.0);
        assert_approx_eq!(a.distance(&b), 4096.000_122, 1e-6);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let bbox = BoundingBox::new(i32::MAX - 1, i32::MIN, i32::MAX, i32::MIN + 2);
        assert_eq!(bbox.center(), (i32::MAX - 1, i32::MIN + 1));

        let other = BoundingBox::new(i32::MIN, i32::MAX - 2, i32::MIN, i32::MAX);
        let expected = (i32::MAX as f64 + 1.0 + i32::MAX as f64 - 1.0)
            .hypot(i32::MAX as f64 - 1.0 - (i32::MIN as f64 + 1.0));
        assert_approx_eq!(bbox.distance(&other), expected, 1.0);
    }
}
