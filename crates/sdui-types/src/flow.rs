//! Flow zone ids of the standard panel layout.
//!
//! The layout is a 3×3 grid of "inside" zones around a focus zone, with
//! "outside" zones along the left and right edges.

pub const INSIDE_TOP_LEFT: &str = "inside-top-left";
pub const INSIDE_TOP_CENTER: &str = "inside-top-center";
pub const INSIDE_TOP_RIGHT: &str = "inside-top-right";
pub const INSIDE_LEFT_LOWER: &str = "inside-left-lower";
pub const INSIDE_FOCUS: &str = "inside-focus";
pub const INSIDE_RIGHT_MIDDLE: &str = "inside-right-middle";
pub const INSIDE_BOTTOM_LEFT: &str = "inside-bottom-left";
pub const INSIDE_BOTTOM_CENTER: &str = "inside-bottom-center";
pub const INSIDE_BOTTOM_RIGHT: &str = "inside-bottom-right";
pub const OUTSIDE_LEFT_UPPER: &str = "outside-left-upper";
pub const OUTSIDE_LEFT_LOWER: &str = "outside-left-lower";
pub const OUTSIDE_RIGHT_UPPER: &str = "outside-right-upper";
pub const OUTSIDE_RIGHT_LOWER: &str = "outside-right-lower";

/// Every zone of the standard layout, in document order.
pub const ALL: [&str; 13] = [
    OUTSIDE_LEFT_UPPER,
    INSIDE_TOP_LEFT,
    INSIDE_TOP_CENTER,
    INSIDE_TOP_RIGHT,
    OUTSIDE_RIGHT_UPPER,
    INSIDE_LEFT_LOWER,
    INSIDE_FOCUS,
    INSIDE_RIGHT_MIDDLE,
    OUTSIDE_LEFT_LOWER,
    INSIDE_BOTTOM_LEFT,
    INSIDE_BOTTOM_CENTER,
    INSIDE_BOTTOM_RIGHT,
    OUTSIDE_RIGHT_LOWER,
];
