//! The function under analysis, as seen by the expression core.
//!
//! Program values and loops are owned by the surrounding compiler. This
//! module defines the handles the core stores in nodes and the
//! [`FunctionContext`] trait it queries about them, plus [`FunctionInfo`],
//! a plain table implementation.

use crate::ScalarType;

/// Handle of a program value wrapped by an opaque leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a loop. Only identity and nesting are ever inspected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LoopId(u32);

impl LoopId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Queries the expression core makes about the function being analyzed.
pub trait FunctionContext {
    /// Type of a program value.
    fn value_type(&self, value: ValueId) -> ScalarType;

    /// Innermost loop whose body defines `value`, `None` for values
    /// defined outside every loop (arguments, preheader code).
    fn value_loop(&self, value: ValueId) -> Option<LoopId>;

    /// Loop immediately enclosing `l`.
    fn parent_loop(&self, l: LoopId) -> Option<LoopId>;

    /// Printable name of a value, without the `%` sigil.
    fn value_name(&self, _value: ValueId) -> Option<&str> {
        None
    }

    /// Printable name of a loop, without the `%` sigil.
    fn loop_name(&self, _l: LoopId) -> Option<&str> {
        None
    }

    /// Whether `inner` is `outer` or nested somewhere inside it.
    fn loop_contains(&self, outer: LoopId, inner: LoopId) -> bool {
        let mut current = Some(inner);
        while let Some(l) = current {
            if l == outer {
                return true;
            }
            current = self.parent_loop(l);
        }
        false
    }

    /// Nesting depth, 1 for outermost loops.
    fn loop_depth(&self, l: LoopId) -> u32 {
        let mut depth = 1;
        let mut current = self.parent_loop(l);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_loop(parent);
        }
        depth
    }
}

#[derive(Clone, Debug)]
struct ValueInfo {
    name: String,
    ty: ScalarType,
    defined_in: Option<LoopId>,
}

#[derive(Clone, Debug)]
struct LoopInfo {
    name: String,
    parent: Option<LoopId>,
}

/// A [`FunctionContext`] backed by two tables.
#[derive(Clone, Debug, Default)]
pub struct FunctionInfo {
    values: Vec<ValueInfo>,
    loops: Vec<LoopInfo>,
}

impl FunctionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a loop nested in `parent` (or top-level).
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_loop(&mut self, name: impl Into<String>, parent: Option<LoopId>) -> LoopId {
        let id = LoopId::new(self.loops.len() as u32);
        self.loops.push(LoopInfo {
            name: name.into(),
            parent,
        });
        id
    }

    /// Declare a value of type `ty`, defined in `defined_in` (or outside
    /// all loops).
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_value(
        &mut self,
        name: impl Into<String>,
        ty: ScalarType,
        defined_in: Option<LoopId>,
    ) -> ValueId {
        let id = ValueId::new(self.values.len() as u32);
        self.values.push(ValueInfo {
            name: name.into(),
            ty,
            defined_in,
        });
        id
    }
}

impl FunctionContext for FunctionInfo {
    fn value_type(&self, value: ValueId) -> ScalarType {
        self.values[value.index()].ty
    }

    fn value_loop(&self, value: ValueId) -> Option<LoopId> {
        self.values[value.index()].defined_in
    }

    fn parent_loop(&self, l: LoopId) -> Option<LoopId> {
        self.loops[l.index()].parent
    }

    fn value_name(&self, value: ValueId) -> Option<&str> {
        Some(&self.values[value.index()].name)
    }

    fn loop_name(&self, l: LoopId) -> Option<&str> {
        Some(&self.loops[l.index()].name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting_queries() {
        let mut func = FunctionInfo::new();
        let outer = func.add_loop("outer", None);
        let inner = func.add_loop("inner", Some(outer));
        let sibling = func.add_loop("sibling", None);

        assert!(func.loop_contains(outer, inner));
        assert!(func.loop_contains(inner, inner));
        assert!(!func.loop_contains(inner, outer));
        assert!(!func.loop_contains(sibling, inner));
        assert_eq!(func.loop_depth(outer), 1);
        assert_eq!(func.loop_depth(inner), 2);
    }

    #[test]
    fn value_table() {
        let mut func = FunctionInfo::new();
        let l = func.add_loop("body", None);
        let n = func.add_value("n", ScalarType::I64, None);
        let p = func.add_value("p", ScalarType::ptr(10), Some(l));

        assert_eq!(func.value_type(n), ScalarType::I64);
        assert_eq!(func.value_type(p), ScalarType::ptr(10));
        assert_eq!(func.value_loop(n), None);
        assert_eq!(func.value_loop(p), Some(l));
        assert_eq!(func.value_name(p), Some("p"));
        assert_eq!(func.loop_name(l), Some("body"));
    }
}
