//! Byte-range source locations.
//!
//! Kept independent of any particular CST crate so that `swiftgen-core` has
//! no dependency on the syntax-tree representation chosen downstream.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn empty_at(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod span_tests {
    use super::*;

    #[test]
    fn cover_takes_the_union() {
        let a = Span::new(10, 20);
        let b = Span::new(5, 15);
        assert_eq!(a.cover(b), Span::new(5, 20));
    }

    #[test]
    fn contains_is_inclusive_of_equal_bounds() {
        let outer = Span::new(0, 10);
        assert!(outer.contains(Span::new(0, 10)));
        assert!(outer.contains(Span::new(2, 8)));
        assert!(!outer.contains(Span::new(0, 11)));
    }
}
