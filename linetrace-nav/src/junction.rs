//! Junction detection
//!
//! A junction is an outer sensor on the line together with its inner
//! neighbor or the center, or both outer sensors at once. A single outer
//! bit is a sharp bend, not a junction.

use crate::frame::Pattern;
use linetrace_io::Channel;

/// Shape of a detected junction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionKind {
    /// Both outer sensors on the line
    Cross,
    /// Branch on the left side
    Left,
    /// Branch on the right side
    Right,
}

/// Classify a pattern as a junction, if it is one
pub fn detect(pattern: Pattern) -> Option<JunctionKind> {
    let far_left = pattern.is_set(Channel::FarLeft);
    let far_right = pattern.is_set(Channel::FarRight);
    let center = pattern.is_set(Channel::Center);

    if far_left && far_right {
        Some(JunctionKind::Cross)
    } else if far_left && (pattern.is_set(Channel::Left) || center) {
        Some(JunctionKind::Left)
    } else if far_right && (pattern.is_set(Channel::Right) || center) {
        Some(JunctionKind::Right)
    } else {
        None
    }
}

#[inline]
pub fn is_junction(pattern: Pattern) -> bool {
    detect(pattern).is_some()
}
