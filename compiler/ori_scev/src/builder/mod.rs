//! Expression construction.
//!
//! [`ScalarEvolution`] is one analysis session: it owns the pool and is the
//! only way to create expressions, which keeps every node canonical and
//! uniqued. Each entry point
//!
//! 1. simplifies (constant folding, operand merging) while the recursion
//!    depth is within [`ScevConfig::max_arith_depth`],
//! 2. sorts commutative operands into canonical order,
//! 3. computes the non-standard pointer flag from the operands,
//! 4. interns the chosen node shape.
//!
//! Past the depth budget the sorted, constant-folded operand list is
//! interned as is. Malformed requests (mixed types, a cast of a
//! non-standard pointer, a recurrence step carrying one) are contract
//! violations and panic.

mod cast;
mod min_max;
mod product;
mod recurrence;
mod sum;

use crate::node::{ConstantInt, Operands, ScevData};
use crate::order::sort_operands;
use crate::{
    FunctionContext, NoWrap, ScalarType, ScevConfig, ScevDisplay, ScevFlags, ScevId, ScevKind,
    ScevPool, TypeLayout, ValueId,
};

/// Minimum stack space to keep available before recursing.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated when the red zone is reached.
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// One analysis session: pool, collaborators, and budgets.
///
/// Sessions are independent. Handles from one session mean nothing in
/// another, and nothing is shared, so separate functions can be analyzed
/// on separate threads without locking.
pub struct ScalarEvolution<'a> {
    pub(crate) pool: ScevPool,
    pub(crate) layout: &'a dyn TypeLayout,
    pub(crate) func: &'a dyn FunctionContext,
    pub(crate) config: ScevConfig,
}

impl<'a> ScalarEvolution<'a> {
    /// Start a session with default budgets.
    pub fn new(layout: &'a dyn TypeLayout, func: &'a dyn FunctionContext) -> Self {
        Self::with_config(layout, func, ScevConfig::default())
    }

    /// Start a session with explicit budgets.
    pub fn with_config(
        layout: &'a dyn TypeLayout,
        func: &'a dyn FunctionContext,
        config: ScevConfig,
    ) -> Self {
        tracing::debug!(?config, "starting scalar evolution session");
        Self {
            pool: ScevPool::new(),
            layout,
            func,
            config,
        }
    }

    /// Read-only view of the pool.
    #[inline]
    pub fn pool(&self) -> &ScevPool {
        &self.pool
    }

    #[inline]
    pub fn config(&self) -> &ScevConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &'a dyn TypeLayout {
        self.layout
    }

    #[inline]
    pub fn function(&self) -> &'a dyn FunctionContext {
        self.func
    }

    /// Type of the value `id` computes. See [`ScevPool::ty`].
    #[inline]
    pub fn ty(&self, id: ScevId) -> ScalarType {
        self.pool.ty(id)
    }

    /// Whether `id` evaluates to a non-standard pointer.
    #[inline]
    pub fn has_non_standard_pointer(&self, id: ScevId) -> bool {
        self.pool.has_non_standard_pointer(id)
    }

    /// Render `id` with this session's value and loop names.
    pub fn display(&self, id: ScevId) -> ScevDisplay<'_> {
        self.pool.display(id, self.func)
    }

    /// Record stronger no-wrap guarantees for an existing node.
    ///
    /// Identity and the pointer flag are unaffected; guarantees that make
    /// no sense for the node's kind are ignored.
    pub fn refine_no_wrap(&mut self, id: ScevId, no_wrap: NoWrap) {
        self.pool.refine_no_wrap(id, no_wrap);
    }

    /// The could-not-compute sentinel.
    #[inline]
    pub fn could_not_compute(&self) -> ScevId {
        ScevId::COULD_NOT_COMPUTE
    }

    // === Leaves ===

    /// Integer constant of `ty`'s effective width.
    pub fn constant(&mut self, ty: ScalarType, value: i128) -> ScevId {
        let bits = self.layout.effective_bits(ty);
        self.constant_int(ConstantInt::new(bits, value))
    }

    pub fn constant_int(&mut self, c: ConstantInt) -> ScevId {
        self.pool.intern(ScevData::Constant(c), ScevFlags::empty())
    }

    pub fn zero(&mut self, ty: ScalarType) -> ScevId {
        self.constant(ty, 0)
    }

    pub fn one(&mut self, ty: ScalarType) -> ScevId {
        self.constant(ty, 1)
    }

    pub fn all_ones(&mut self, ty: ScalarType) -> ScevId {
        self.constant(ty, -1)
    }

    /// Leaf for a program value the analysis cannot see through.
    ///
    /// The layout oracle is asked about the value's type only the first
    /// time the leaf is requested.
    pub fn opaque(&mut self, value: ValueId) -> ScevId {
        let ty = self.func.value_type(value);
        let data = ScevData::Opaque { value, ty };
        if let Some(id) = self.pool.lookup(&data) {
            return id;
        }
        let pointer = self.layout.is_non_standard_pointer(ty);
        self.pool
            .intern(data, ScevFlags::new(pointer, NoWrap::empty()))
    }

    // === Shared helpers ===

    pub(crate) fn sort(&self, operands: &mut Operands) {
        sort_operands(
            &self.pool,
            self.func,
            operands,
            self.config.max_compare_depth,
        );
    }

    /// Effective integer width of an expression's type.
    pub(crate) fn effective_bits(&self, id: ScevId) -> u32 {
        self.layout.effective_bits(self.pool.ty(id))
    }

    /// Comma-separated rendering of an operand list, for panic messages.
    pub(crate) fn describe(&self, operands: &[ScevId]) -> String {
        operands
            .iter()
            .map(|&op| self.display(op).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Combine the run of constants at the front of a sorted list into one.
    ///
    /// Returns `true` if anything was folded.
    pub(crate) fn fold_leading_constants(
        &mut self,
        operands: &mut Operands,
        combine: impl Fn(ConstantInt, ConstantInt) -> ConstantInt,
    ) -> bool {
        let Some(mut acc) = self.pool.constant(operands[0]) else {
            return false;
        };
        let mut count = 1;
        while let Some(c) = operands.get(count).and_then(|&op| self.pool.constant(op)) {
            acc = combine(acc, c);
            count += 1;
        }
        if count == 1 {
            return false;
        }
        let folded = self.constant_int(acc);
        operands.drain(0..count);
        operands.insert(0, folded);
        true
    }

    /// Replace operands of kind `kind` by their own operands.
    ///
    /// Returns `None` if no operand has that kind or the flattened list
    /// would exceed `threshold`.
    pub(crate) fn flatten(
        &self,
        operands: &[ScevId],
        kind: ScevKind,
        threshold: usize,
    ) -> Option<Operands> {
        if !operands.iter().any(|&op| self.pool.kind(op) == kind) {
            return None;
        }
        let total: usize = operands
            .iter()
            .map(|&op| {
                if self.pool.kind(op) == kind {
                    self.pool.operands(op).len()
                } else {
                    1
                }
            })
            .sum();
        if total > threshold {
            tracing::trace!(%kind, total, threshold, "flattening skipped, operand list too long");
            return None;
        }
        let mut flat = Operands::with_capacity(total);
        for &op in operands {
            if self.pool.kind(op) == kind {
                flat.extend_from_slice(self.pool.operands(op));
            } else {
                flat.push(op);
            }
        }
        Some(flat)
    }

    /// Contract check for sum and product operands.
    ///
    /// All operands share one effective integer type, and all
    /// non-standard pointer operands share one pointer type.
    pub(crate) fn check_arith_operands(&self, operands: &[ScevId], what: &str) {
        for &op in operands {
            assert!(
                !op.is_could_not_compute(),
                "could-not-compute used as a {what} operand"
            );
        }
        let bits = self.effective_bits(operands[0]);
        let mut pointer_ty = None;
        for &op in operands {
            assert_eq!(
                self.effective_bits(op),
                bits,
                "{what} operands have different effective types: {}",
                self.describe(operands)
            );
            if self.pool.has_non_standard_pointer(op) {
                let ty = self.pool.ty(op);
                match pointer_ty {
                    None => pointer_ty = Some(ty),
                    Some(prev) => assert_eq!(
                        prev,
                        ty,
                        "{what} mixes non-standard pointers of different types: {}",
                        self.describe(operands)
                    ),
                }
            }
        }
    }
}

impl std::fmt::Debug for ScalarEvolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarEvolution")
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
