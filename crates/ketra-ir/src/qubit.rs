//! Qubit and classical bit identifiers.
//!
//! Qubit `i` is bit `i` of the basis-state integer: qubit 0 is the least
//! significant bit (little-endian).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for addressing amplitudes.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The single-bit mask selecting this qubit in a basis-state index.
    #[inline]
    pub fn mask(self) -> usize {
        1usize << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Index of a classical bit within a circuit's classical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

impl From<usize> for ClbitId {
    fn from(id: usize) -> Self {
        ClbitId(u32::try_from(id).expect("ClbitId overflow: exceeds u32::MAX"))
    }
}

/// Qubit ids `0..n`, in order.
pub fn qubit_range(start: u32, len: u32) -> Vec<QubitId> {
    (start..start + len).map(QubitId).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", ClbitId(3)), "c3");
    }

    #[test]
    fn test_qubit_mask_is_little_endian() {
        assert_eq!(QubitId(0).mask(), 0b001);
        assert_eq!(QubitId(2).mask(), 0b100);
        assert_eq!(QubitId::from(5usize).index(), 5);
    }

    #[test]
    fn test_qubit_range() {
        assert_eq!(qubit_range(2, 3), vec![QubitId(2), QubitId(3), QubitId(4)]);
        assert!(qubit_range(0, 0).is_empty());
    }
}
