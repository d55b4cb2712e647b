//! Per-expression metadata flags.
//!
//! Two bitfields live here:
//! - [`NoWrap`]: the arithmetic guarantees a caller may request for a sum,
//!   product, or recurrence.
//! - [`ScevFlags`]: what the pool stores per node, the no-wrap bits plus
//!   the non-standard pointer marker.
//!
//! No-wrap bits are refinable after construction and never take part in
//! uniquing. The pointer marker is fixed at construction.

use bitflags::bitflags;

use crate::ScevKind;

bitflags! {
    /// Arithmetic no-wrap guarantees.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NoWrap: u8 {
        /// No unsigned wrap.
        const NUW = 1 << 0;
        /// No signed wrap.
        const NSW = 1 << 1;
        /// No self-wrap: a recurrence never returns to its start value.
        const NW = 1 << 2;
    }
}

bitflags! {
    /// Flags stored for every pooled expression.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ScevFlags: u8 {
        /// No unsigned wrap.
        const NUW = 1 << 0;
        /// No signed wrap.
        const NSW = 1 << 1;
        /// No self-wrap (recurrences only).
        const NW = 1 << 2;

        /// The expression evaluates to a pointer that cannot round-trip
        /// through an integer.
        const HAS_NON_STANDARD_POINTER = 1 << 7;
    }
}

impl NoWrap {
    /// Keep only the guarantees that mean something for `kind`.
    ///
    /// `NW` is implied by either of the others on recurrences and is
    /// dropped everywhere else.
    #[inline]
    pub fn for_kind(self, kind: ScevKind) -> Self {
        match kind {
            ScevKind::Recurrence => {
                if self.intersects(Self::NUW | Self::NSW) {
                    self | Self::NW
                } else {
                    self
                }
            }
            _ if kind.carries_no_wrap() => self - Self::NW,
            _ => Self::empty(),
        }
    }
}

impl ScevFlags {
    /// The refinable part of the flags.
    pub const NO_WRAP_MASK: Self =
        Self::from_bits_truncate(Self::NUW.bits() | Self::NSW.bits() | Self::NW.bits());

    /// Stored flags for a node with the given pointer marker and guarantees.
    #[inline]
    pub fn new(non_standard_pointer: bool, no_wrap: NoWrap) -> Self {
        let mut flags = Self::from_bits_truncate(no_wrap.bits());
        flags.set(Self::HAS_NON_STANDARD_POINTER, non_standard_pointer);
        flags
    }

    /// Check the non-standard pointer marker.
    #[inline]
    pub const fn has_non_standard_pointer(self) -> bool {
        self.contains(Self::HAS_NON_STANDARD_POINTER)
    }

    /// Extract the no-wrap guarantees.
    #[inline]
    pub const fn no_wrap(self) -> NoWrap {
        NoWrap::from_bits_truncate(self.bits() & Self::NO_WRAP_MASK.bits())
    }

    /// Add guarantees without touching the pointer marker.
    #[inline]
    #[must_use]
    pub fn strengthened(self, no_wrap: NoWrap) -> Self {
        self | Self::from_bits_truncate(no_wrap.bits())
    }

    /// OR of the pointer marker over a set of operand flags.
    #[inline]
    pub fn any_pointer(children: impl IntoIterator<Item = Self>) -> bool {
        children.into_iter().any(Self::has_non_standard_pointer)
    }
}

#[cfg(test)]
mod tests;
