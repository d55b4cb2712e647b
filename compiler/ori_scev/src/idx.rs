//! Expression handle.
//!
//! `ScevId` is the only way to refer to an expression. Every node lives in
//! the session's [`ScevPool`](crate::ScevPool) and is referenced by its
//! 32-bit arena index.
//!
//! # Design
//!
//! - Structurally equal expressions share one index, so equality is O(1)
//! - `COULD_NOT_COMPUTE` is pre-interned at index 0
//! - Copy, lightweight passing

use std::fmt;

/// A 32-bit index into the expression pool.
///
/// Handles are only meaningful for the pool that produced them and stay
/// valid for that pool's whole lifetime.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ScevId(u32);

impl ScevId {
    /// The "could not compute" sentinel expression.
    pub const COULD_NOT_COMPUTE: Self = Self(0);

    /// First index handed out for built expressions.
    pub const FIRST_DYNAMIC: u32 = 1;

    /// Create a handle from a raw u32 value.
    ///
    /// The caller must ensure the index is valid in the pool.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the `COULD_NOT_COMPUTE` sentinel.
    #[inline]
    pub const fn is_could_not_compute(self) -> bool {
        self.0 == Self::COULD_NOT_COMPUTE.0
    }
}

impl fmt::Debug for ScevId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::COULD_NOT_COMPUTE => write!(f, "ScevId::COULD_NOT_COMPUTE"),
            _ => write!(f, "ScevId({})", self.0),
        }
    }
}

impl fmt::Display for ScevId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scev#{}", self.0)
    }
}

const _: () = assert!(std::mem::size_of::<ScevId>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_index_zero() {
        assert_eq!(ScevId::COULD_NOT_COMPUTE.raw(), 0);
        assert!(ScevId::COULD_NOT_COMPUTE.is_could_not_compute());
        assert!(!ScevId::from_raw(ScevId::FIRST_DYNAMIC).is_could_not_compute());
    }

    #[test]
    fn index_matches_raw() {
        let id = ScevId::from_raw(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn debug_and_display() {
        assert_eq!(
            format!("{:?}", ScevId::COULD_NOT_COMPUTE),
            "ScevId::COULD_NOT_COMPUTE"
        );
        assert_eq!(format!("{:?}", ScevId::from_raw(7)), "ScevId(7)");
        assert_eq!(ScevId::from_raw(7).to_string(), "scev#7");
    }
}
