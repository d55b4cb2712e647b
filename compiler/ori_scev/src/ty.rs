//! Host scalar types and the type-layout oracle.
//!
//! Expressions only ever have integer or pointer type. Whether a pointer
//! type is "non-standard" (cannot round-trip through an integer) is not a
//! property of the type itself; it depends on the target and is answered by
//! a [`TypeLayout`].

use std::fmt;

use rustc_hash::FxHashSet;

use crate::error::LayoutError;

/// Type of an expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarType {
    /// Two's-complement integer of the given width.
    Int { bits: u32 },
    /// Pointer into the given address space.
    Ptr { addr_space: u32 },
}

impl ScalarType {
    /// `i1`.
    pub const I1: Self = Self::Int { bits: 1 };
    /// `i8`.
    pub const I8: Self = Self::Int { bits: 8 };
    /// `i32`.
    pub const I32: Self = Self::Int { bits: 32 };
    /// `i64`.
    pub const I64: Self = Self::Int { bits: 64 };

    /// Integer type of the given width.
    #[inline]
    pub const fn int(bits: u32) -> Self {
        Self::Int { bits }
    }

    /// Pointer type in the given address space.
    #[inline]
    pub const fn ptr(addr_space: u32) -> Self {
        Self::Ptr { addr_space }
    }

    #[inline]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::Ptr { .. })
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int { .. })
    }

    /// Width of an integer type, `None` for pointers.
    #[inline]
    pub const fn int_bits(self) -> Option<u32> {
        match self {
            Self::Int { bits } => Some(bits),
            Self::Ptr { .. } => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Ptr { addr_space: 0 } => f.write_str("ptr"),
            Self::Ptr { addr_space } => write!(f, "ptr addrspace({addr_space})"),
        }
    }
}

/// Target knowledge about pointer representations.
///
/// Queried once per opaque leaf to seed the non-standard pointer flag; the
/// flag then propagates structurally and the oracle is not consulted again.
pub trait TypeLayout {
    /// Whether `ty` is a pointer whose bits are not a stable integer.
    fn is_non_standard_pointer(&self, ty: ScalarType) -> bool;

    /// Width of pointers in `addr_space`.
    fn pointer_bits(&self, addr_space: u32) -> u32;

    /// The integer type arithmetic on `ty` is carried out in.
    fn effective_type(&self, ty: ScalarType) -> ScalarType {
        match ty {
            ScalarType::Int { .. } => ty,
            ScalarType::Ptr { addr_space } => ScalarType::int(self.pointer_bits(addr_space)),
        }
    }

    /// Width of [`effective_type`](Self::effective_type).
    fn effective_bits(&self, ty: ScalarType) -> u32 {
        match ty {
            ScalarType::Int { bits } => bits,
            ScalarType::Ptr { addr_space } => self.pointer_bits(addr_space),
        }
    }
}

/// Table-driven [`TypeLayout`]: a default pointer width, per-address-space
/// overrides, and the set of non-integral address spaces.
#[derive(Clone, Debug)]
pub struct DataLayout {
    default_pointer_bits: u32,
    pointer_bits: Vec<(u32, u32)>,
    non_integral: FxHashSet<u32>,
}

impl DataLayout {
    /// A layout where every pointer is `pointer_bits` wide and integral.
    pub fn new(pointer_bits: u32) -> Self {
        Self {
            default_pointer_bits: pointer_bits,
            pointer_bits: Vec::new(),
            non_integral: FxHashSet::default(),
        }
    }

    /// Mark `addr_space` as non-integral.
    #[must_use]
    pub fn with_non_integral(mut self, addr_space: u32) -> Self {
        self.non_integral.insert(addr_space);
        self
    }

    /// Override the pointer width of one address space.
    #[must_use]
    pub fn with_pointer_bits(mut self, addr_space: u32, bits: u32) -> Self {
        self.set_pointer_bits(addr_space, bits);
        self
    }

    fn set_pointer_bits(&mut self, addr_space: u32, bits: u32) {
        if addr_space == 0 {
            self.default_pointer_bits = bits;
        }
        match self.pointer_bits.iter_mut().find(|(space, _)| *space == addr_space) {
            Some(entry) => entry.1 = bits,
            None => self.pointer_bits.push((addr_space, bits)),
        }
    }

    /// Parse a layout description such as `e-p:64:64-p1:32:32-ni:10:11`.
    ///
    /// Only pointer specifications (`p`, `p<as>`) and the non-integral list
    /// (`ni`) are interpreted; every other component is ignored.
    pub fn parse(spec: &str) -> Result<Self, LayoutError> {
        let mut layout = Self::new(64);
        for component in spec.split('-').filter(|c| !c.is_empty()) {
            let mut fields = component.split(':');
            let head = fields.next().unwrap_or_default();
            if head == "ni" {
                for field in fields {
                    let space = parse_number(component, field)?;
                    layout.non_integral.insert(space);
                }
            } else if let Some(space) = head.strip_prefix('p') {
                let addr_space = if space.is_empty() {
                    0
                } else {
                    parse_number(component, space)?
                };
                if let Some(width) = fields.next() {
                    let bits = parse_number(component, width)?;
                    if bits == 0 || bits > 128 {
                        return Err(LayoutError::InvalidPointerWidth {
                            component: component.to_owned(),
                            bits,
                        });
                    }
                    layout.set_pointer_bits(addr_space, bits);
                }
            }
        }
        tracing::debug!(
            pointer_bits = layout.default_pointer_bits,
            non_integral = layout.non_integral.len(),
            "parsed data layout"
        );
        Ok(layout)
    }
}

fn parse_number(component: &str, text: &str) -> Result<u32, LayoutError> {
    text.parse().map_err(|_| LayoutError::InvalidNumber {
        component: component.to_owned(),
        text: text.to_owned(),
    })
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(64)
    }
}

impl TypeLayout for DataLayout {
    fn is_non_standard_pointer(&self, ty: ScalarType) -> bool {
        match ty {
            ScalarType::Ptr { addr_space } => self.non_integral.contains(&addr_space),
            ScalarType::Int { .. } => false,
        }
    }

    fn pointer_bits(&self, addr_space: u32) -> u32 {
        self.pointer_bits
            .iter()
            .find(|(space, _)| *space == addr_space)
            .map_or(self.default_pointer_bits, |&(_, bits)| bits)
    }
}

#[cfg(test)]
mod tests;
