//! Geometry primitives for screens, windows and reserved edge space
use std::fmt;

/// An x,y coordinate pair
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// An absolute x coordinate relative to the root window
    pub x: i32,
    /// An absolute y coordinate relative to the root window
    pub y: i32,
}

impl Point {
    /// Create a new [Point].
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

/// An x,y coordinate pair and width,height dimensions
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rect {
    /// The x position of the top left corner of this rect
    pub x: i32,
    /// The y position of the top left corner of this rect
    pub y: i32,
    /// The width of this rect
    pub w: u32,
    /// The height of this rect
    pub h: u32,
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

impl Rect {
    /// Create a new [Rect].
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The position of the top left corner of this [Rect].
    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Shrink this [Rect] by the reserved space recorded in a [Strut],
    /// clamping the width and height at zero and the origin within the
    /// rect.
    ///
    /// This is how the usable work area of a screen is derived from its
    /// full pixel geometry. Struts are client set cardinals and can hold
    /// arbitrarily large values: oversized struts collapse the affected
    /// dimension rather than wrapping.
    ///
    /// # Examples
    ///
    /// ```
    /// # use oxbow::pure::geometry::{Rect, Strut};
    /// let screen = Rect::new(0, 0, 1280, 1024);
    /// let strut = Strut::new(0, 0, 30, 0);
    ///
    /// assert_eq!(screen.subtract_strut(strut), Rect::new(0, 30, 1280, 994));
    /// ```
    pub fn subtract_strut(&self, s: Strut) -> Rect {
        Rect {
            x: self.x.saturating_add(s.left.min(self.w) as i32),
            y: self.y.saturating_add(s.top.min(self.h) as i32),
            w: self.w.saturating_sub(s.left.saturating_add(s.right)),
            h: self.h.saturating_sub(s.top.saturating_add(s.bottom)),
        }
    }
}

/// Reserved space at each edge of a screen, as requested by a client
/// through the `_NET_WM_STRUT` property.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Strut {
    /// Pixels reserved at the left screen edge
    pub left: u32,
    /// Pixels reserved at the right screen edge
    pub right: u32,
    /// Pixels reserved at the top screen edge
    pub top: u32,
    /// Pixels reserved at the bottom screen edge
    pub bottom: u32,
}

impl Strut {
    /// Create a new [Strut].
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Strut {
        Strut {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The component-wise maximum of two struts.
    ///
    /// Aggregating the struts of all clients on a screen is a fold over
    /// this operation, which makes the result independent of the order
    /// the clients were managed in.
    ///
    /// # Examples
    ///
    /// ```
    /// # use oxbow::pure::geometry::Strut;
    /// let panel = Strut::new(0, 0, 30, 0);
    /// let dock = Strut::new(60, 0, 10, 0);
    ///
    /// assert_eq!(panel.max(dock), Strut::new(60, 0, 30, 0));
    /// ```
    pub fn max(&self, other: Strut) -> Strut {
        Strut {
            left: self.left.max(other.left),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Parse a [Strut] from raw `_NET_WM_STRUT` property data.
    ///
    /// Returns [None] if fewer than the required four cardinal values are
    /// present: malformed struts are ignored rather than treated as errors.
    pub fn from_cardinals(raw: &[u32]) -> Option<Strut> {
        match raw {
            [left, right, top, bottom, ..] => Some(Strut {
                left: *left,
                right: *right,
                top: *top,
                bottom: *bottom,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use simple_test_case::test_case;

    fn r(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect::new(x, y, w, h)
    }

    fn s(left: u32, right: u32, top: u32, bottom: u32) -> Strut {
        Strut::new(left, right, top, bottom)
    }

    #[test_case(s(0, 0, 0, 0), r(0, 0, 800, 600); "empty strut")]
    #[test_case(s(0, 0, 30, 0), r(0, 30, 800, 570); "top panel")]
    #[test_case(s(0, 0, 0, 40), r(0, 0, 800, 560); "bottom panel")]
    #[test_case(s(64, 0, 0, 0), r(64, 0, 736, 600); "left dock")]
    #[test_case(s(10, 10, 10, 10), r(10, 10, 780, 580); "all edges")]
    #[test_case(s(500, 500, 0, 0), r(500, 0, 0, 600); "wider than the screen")]
    #[test_case(s(u32::MAX, 1, 0, 0), r(800, 0, 0, 600); "left strut at the cardinal limit")]
    #[test_case(s(0, 0, u32::MAX, u32::MAX), r(0, 600, 800, 0); "vertical struts at the cardinal limit")]
    #[test]
    fn subtract_strut(strut: Strut, expected: Rect) {
        assert_eq!(r(0, 0, 800, 600).subtract_strut(strut), expected);
    }

    #[test_case(s(0, 0, 0, 0), s(0, 0, 0, 0), s(0, 0, 0, 0); "both empty")]
    #[test_case(s(1, 2, 3, 4), s(0, 0, 0, 0), s(1, 2, 3, 4); "one empty")]
    #[test_case(s(1, 0, 3, 0), s(0, 2, 0, 4), s(1, 2, 3, 4); "disjoint")]
    #[test_case(s(5, 5, 5, 5), s(1, 9, 1, 9), s(5, 9, 5, 9); "overlapping")]
    #[test]
    fn strut_max(a: Strut, b: Strut, expected: Strut) {
        assert_eq!(a.max(b), expected);
    }

    #[test_case(&[], None; "no data")]
    #[test_case(&[1, 2, 3], None; "too short")]
    #[test_case(&[1, 2, 3, 4], Some(s(1, 2, 3, 4)); "exact")]
    #[test_case(&[1, 2, 3, 4, 5, 6], Some(s(1, 2, 3, 4)); "partial strut data")]
    #[test]
    fn strut_from_cardinals(raw: &[u32], expected: Option<Strut>) {
        assert_eq!(Strut::from_cardinals(raw), expected);
    }

    // Full range cardinals: real struts are screen sized but the property
    // data can hold anything up to u32::MAX
    impl Arbitrary for Strut {
        fn arbitrary(g: &mut Gen) -> Self {
            Strut {
                left: u32::arbitrary(g),
                right: u32::arbitrary(g),
                top: u32::arbitrary(g),
                bottom: u32::arbitrary(g),
            }
        }
    }

    #[quickcheck]
    fn strut_max_is_commutative(a: Strut, b: Strut) -> bool {
        a.max(b) == b.max(a)
    }

    #[quickcheck]
    fn strut_max_is_idempotent(a: Strut, b: Strut) -> bool {
        a.max(b).max(b) == a.max(b)
    }

    #[quickcheck]
    fn subtract_strut_never_grows(strut: Strut) -> bool {
        let screen = r(0, 0, 1920, 1080);
        let area = screen.subtract_strut(strut);

        area.w <= screen.w
            && area.h <= screen.h
            && area.x >= screen.x
            && area.y >= screen.y
            && area.x as i64 + area.w as i64 <= screen.x as i64 + screen.w as i64
            && area.y as i64 + area.h as i64 <= screen.y as i64 + screen.h as i64
    }
}
