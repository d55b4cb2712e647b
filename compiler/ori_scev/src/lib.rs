//! Scalar evolution expressions for Ori.
//!
//! Loop optimizations describe how integer and pointer values change across
//! iterations with a small algebra of symbolic expressions: constants,
//! opaque program values, integer casts, sums, products, recurrences over a
//! loop (`{start,+,step}<%loop>`), and unsigned/signed min and max.
//!
//! # Structure
//!
//! - [`ScevPool`]: arena plus uniquing table. Structurally identical
//!   requests yield the same [`ScevId`], so handle equality is expression
//!   equality.
//! - [`ScalarEvolution`]: one analysis session and the only way to build
//!   expressions. It simplifies, canonically orders, and derives flags.
//! - [`ScevFlags`]: per-node no-wrap guarantees (refinable) plus the
//!   non-standard pointer marker (fixed at construction).
//!
//! # Non-standard Pointers
//!
//! Some targets have pointers that cannot round-trip through an integer
//! (garbage-collected references, tagged or fat pointers). The
//! [`TypeLayout`] oracle identifies them. Expressions built from such a
//! pointer carry a marker so later passes never convert them to integers,
//! and sums over them record their pointer type explicitly.
//!
//! # Tracing
//!
//! Set `RUST_LOG=ori_scev=trace` and call [`init_tracing`] to watch
//! construction decisions.

mod analysis;
mod builder;
mod config;
mod error;
mod flags;
mod host;
mod idx;
mod materialize;
mod node;
mod order;
mod pool;
mod tag;
mod ty;

#[cfg(test)]
mod test_helpers;

pub use builder::ScalarEvolution;
pub use config::ScevConfig;
pub use error::{ConfigError, LayoutError, MaterializeError};
pub use flags::{NoWrap, ScevFlags};
pub use host::{FunctionContext, FunctionInfo, LoopId, ValueId};
pub use idx::ScevId;
pub use materialize::Materialization;
pub use node::{CastOp, ConstantInt, MinMaxKind, Operands, ScevData, SumShape};
pub use order::{compare_complexity, sort_operands};
pub use pool::{ScevDisplay, ScevPool};
pub use tag::ScevKind;
pub use ty::{DataLayout, ScalarType, TypeLayout};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            if let Err(err) = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
            {
                tracing::debug!(%err, "keeping the installed tracing subscriber");
            }
        }
    });
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::ScevFlags;
    const _: () = assert!(std::mem::size_of::<ScevFlags>() == 1);
}
