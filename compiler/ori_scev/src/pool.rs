//! Expression pool: the arena and uniquing table of one analysis session.
//!
//! Every expression is stored exactly once. `ScevData` is the uniquing key,
//! so a repeated request finds the existing [`ScevId`] instead of allocating.
//!
//! # Storage
//!
//! Parallel arrays indexed by `ScevId`:
//! - `nodes`: structural content
//! - `flags`: [`ScevFlags`] (no-wrap bits refinable in place)
//!
//! plus `map`, the reverse lookup from content to handle. Nodes are never
//! freed individually; they go away with the pool.

mod format;
mod ty;

pub use format::ScevDisplay;

use rustc_hash::FxHashMap;

use crate::node::{ConstantInt, ScevData, SumShape};
use crate::{LoopId, NoWrap, ScevFlags, ScevId, ScevKind};

/// Arena plus structural uniquing table.
pub struct ScevPool {
    nodes: Vec<ScevData>,
    flags: Vec<ScevFlags>,
    map: FxHashMap<ScevData, ScevId>,
}

impl ScevPool {
    /// Create a pool holding only the could-not-compute sentinel.
    pub fn new() -> Self {
        let mut pool = Self {
            nodes: Vec::with_capacity(256),
            flags: Vec::with_capacity(256),
            map: FxHashMap::default(),
        };
        let sentinel = pool.intern(ScevData::CouldNotCompute, ScevFlags::empty());
        debug_assert_eq!(sentinel, ScevId::COULD_NOT_COMPUTE);
        pool
    }

    /// Find or create the node for `data`.
    ///
    /// On a hit the stored no-wrap guarantees are strengthened with the
    /// requested ones; identity is unaffected.
    pub(crate) fn intern(&mut self, data: ScevData, flags: ScevFlags) -> ScevId {
        let kind = data.kind();
        let no_wrap = flags.no_wrap().for_kind(kind);
        debug_assert!(
            shape_matches(&data, flags),
            "{kind} node shape disagrees with its pointer flag"
        );

        if let Some(&id) = self.map.get(&data) {
            let stored = &mut self.flags[id.index()];
            assert_eq!(
                stored.has_non_standard_pointer(),
                flags.has_non_standard_pointer(),
                "{id} re-requested with a different pointer flag"
            );
            *stored = stored.strengthened(no_wrap);
            return id;
        }

        let id = match u32::try_from(self.nodes.len()) {
            Ok(raw) => ScevId::from_raw(raw),
            Err(_) => panic!("expression pool exceeded u32::MAX nodes"),
        };
        tracing::trace!(
            ?id,
            %kind,
            pointer = flags.has_non_standard_pointer(),
            "interned expression"
        );
        self.nodes.push(data.clone());
        self.flags
            .push(ScevFlags::new(flags.has_non_standard_pointer(), no_wrap));
        self.map.insert(data, id);
        id
    }

    /// Find the node for `data` without creating it.
    pub fn lookup(&self, data: &ScevData) -> Option<ScevId> {
        self.map.get(data).copied()
    }

    /// Strengthen the no-wrap guarantees of an existing node.
    pub(crate) fn refine_no_wrap(&mut self, id: ScevId, no_wrap: NoWrap) {
        let kind = self.kind(id);
        let stored = &mut self.flags[id.index()];
        let before = *stored;
        *stored = stored.strengthened(no_wrap.for_kind(kind));
        if *stored != before {
            tracing::trace!(?id, flags = ?stored.no_wrap(), "strengthened no-wrap flags");
        }
    }

    #[inline]
    pub fn data(&self, id: ScevId) -> &ScevData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ScevId) -> ScevKind {
        self.nodes[id.index()].kind()
    }

    #[inline]
    pub fn flags(&self, id: ScevId) -> ScevFlags {
        self.flags[id.index()]
    }

    #[inline]
    pub fn operands(&self, id: ScevId) -> &[ScevId] {
        self.nodes[id.index()].operands()
    }

    /// Cached non-standard pointer marker; cheaper than asking the layout
    /// oracle about [`ty`](Self::ty).
    #[inline]
    pub fn has_non_standard_pointer(&self, id: ScevId) -> bool {
        self.flags[id.index()].has_non_standard_pointer()
    }

    #[inline]
    pub fn no_wrap(&self, id: ScevId) -> NoWrap {
        self.flags[id.index()].no_wrap()
    }

    #[inline]
    pub fn constant(&self, id: ScevId) -> Option<ConstantInt> {
        self.nodes[id.index()].as_constant()
    }

    /// Loop of a recurrence, `None` for every other kind.
    #[inline]
    pub fn recurrence_loop(&self, id: ScevId) -> Option<LoopId> {
        match self.nodes[id.index()] {
            ScevData::Recurrence { loop_id, .. } => Some(loop_id),
            _ => None,
        }
    }

    /// Number of nodes, including the sentinel.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing but the sentinel has been interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= ScevId::FIRST_DYNAMIC as usize
    }
}

impl Default for ScevPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScevPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScevPool").field("len", &self.len()).finish()
    }
}

/// The sum shape must agree with the pointer marker, and kinds that can
/// never hold a pointer operand must not carry one.
fn shape_matches(data: &ScevData, flags: ScevFlags) -> bool {
    let pointer = flags.has_non_standard_pointer();
    match data {
        ScevData::Sum(SumShape::Plain(_)) => !pointer,
        ScevData::Sum(SumShape::PointerTyped { .. }) => pointer,
        ScevData::CouldNotCompute | ScevData::Constant(_) | ScevData::Cast { .. } => !pointer,
        _ => true,
    }
}

#[cfg(test)]
mod tests;
