//! Shared test fixture: a small function with nested loops and a mix of
//! integer, ordinary pointer, and non-standard pointer values.
//!
//! Only compiled in test builds.

use crate::{
    DataLayout, FunctionInfo, LoopId, ScalarEvolution, ScalarType, ScevConfig, ValueId,
};

/// Address space of garbage-collected references in the fixture layout.
pub(crate) const GC_SPACE: u32 = 10;

/// Pointer type of [`GC_SPACE`].
pub(crate) const GC_PTR: ScalarType = ScalarType::ptr(GC_SPACE);

/// A second non-integral address space.
pub(crate) const FOREIGN_SPACE: u32 = 11;

pub(crate) struct Fixture {
    pub(crate) layout: DataLayout,
    pub(crate) func: FunctionInfo,
    /// Top-level loop.
    pub(crate) outer: LoopId,
    /// Nested in `outer`.
    pub(crate) inner: LoopId,
    /// Top-level loop unrelated to `outer`.
    pub(crate) sibling: LoopId,
    /// `i64` defined before any loop.
    pub(crate) n: ValueId,
    /// `i64` defined before any loop.
    pub(crate) m: ValueId,
    /// `i32` defined before any loop.
    pub(crate) narrow: ValueId,
    /// `i64` defined inside `outer`.
    pub(crate) offset: ValueId,
    /// GC reference defined before any loop.
    pub(crate) base: ValueId,
    /// Another GC reference defined before any loop.
    pub(crate) other: ValueId,
    /// Non-standard pointer in [`FOREIGN_SPACE`].
    pub(crate) foreign: ValueId,
    /// Ordinary pointer.
    pub(crate) raw: ValueId,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let layout = DataLayout::new(64)
            .with_non_integral(GC_SPACE)
            .with_non_integral(FOREIGN_SPACE);
        let mut func = FunctionInfo::new();
        let outer = func.add_loop("outer", None);
        let inner = func.add_loop("inner", Some(outer));
        let sibling = func.add_loop("sibling", None);
        // value ids follow insertion order; `offset` sorts before `base`
        let n = func.add_value("n", ScalarType::I64, None);
        let m = func.add_value("m", ScalarType::I64, None);
        let narrow = func.add_value("w", ScalarType::I32, None);
        let offset = func.add_value("off", ScalarType::I64, Some(outer));
        let base = func.add_value("base", GC_PTR, None);
        let other = func.add_value("other", GC_PTR, None);
        let foreign = func.add_value("foreign", ScalarType::ptr(FOREIGN_SPACE), None);
        let raw = func.add_value("raw", ScalarType::ptr(0), None);
        Self {
            layout,
            func,
            outer,
            inner,
            sibling,
            n,
            m,
            narrow,
            offset,
            base,
            other,
            foreign,
            raw,
        }
    }

    pub(crate) fn session(&self) -> ScalarEvolution<'_> {
        self.session_with(ScevConfig::default())
    }

    pub(crate) fn session_with(&self, config: ScevConfig) -> ScalarEvolution<'_> {
        crate::init_tracing();
        ScalarEvolution::with_config(&self.layout, &self.func, config)
    }
}

/// Render `id` through the session's names.
pub(crate) fn show(se: &ScalarEvolution<'_>, id: crate::ScevId) -> String {
    se.display(id).to_string()
}
