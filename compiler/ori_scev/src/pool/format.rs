//! Expression printing.
//!
//! Renders expressions in the conventional scalar-evolution notation:
//!
//! | node | rendering |
//! |------|-----------|
//! | constant | `-1` (signed) |
//! | opaque | `%name` |
//! | sum / product | `(a + b)<nuw>` / `(a * b)` |
//! | recurrence | `{a,+,b}<nsw><%loop>` |
//! | min / max | `(a umax b)` |
//! | cast | `(zext i32 %x to i64)` |

use std::fmt;

use crate::node::ScevData;
use crate::{FunctionContext, NoWrap, ScevId};

use super::ScevPool;

/// `Display` adapter for one expression.
pub struct ScevDisplay<'a> {
    pool: &'a ScevPool,
    func: &'a dyn FunctionContext,
    id: ScevId,
}

impl ScevPool {
    /// Render `id`, naming values and loops through `func`.
    pub fn display<'a>(&'a self, id: ScevId, func: &'a dyn FunctionContext) -> ScevDisplay<'a> {
        ScevDisplay {
            pool: self,
            func,
            id,
        }
    }
}

impl ScevDisplay<'_> {
    fn write_expr(&self, f: &mut fmt::Formatter<'_>, id: ScevId) -> fmt::Result {
        let pool = self.pool;
        match pool.data(id) {
            ScevData::CouldNotCompute => f.write_str("***COULDNOTCOMPUTE***"),
            ScevData::Constant(c) => write!(f, "{}", c.sext_value()),
            ScevData::Opaque { value, .. } => match self.func.value_name(*value) {
                Some(name) => write!(f, "%{name}"),
                None => write!(f, "%v{}", value.raw()),
            },
            ScevData::Cast { operand, ty, .. } => {
                write!(f, "({} {} ", pool.kind(id), pool.ty(*operand))?;
                self.write_expr(f, *operand)?;
                write!(f, " to {ty})")
            }
            ScevData::Sum(shape) => {
                self.write_joined(f, shape.operands(), " + ")?;
                write_no_wrap(f, pool.no_wrap(id), false)
            }
            ScevData::Product(operands) => {
                self.write_joined(f, operands, " * ")?;
                write_no_wrap(f, pool.no_wrap(id), false)
            }
            ScevData::MinMax { operands, .. } => {
                let separator = format!(" {} ", pool.kind(id));
                self.write_joined(f, operands, &separator)
            }
            ScevData::Recurrence { operands, loop_id } => {
                f.write_str("{")?;
                for (i, &op) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",+,")?;
                    }
                    self.write_expr(f, op)?;
                }
                f.write_str("}")?;
                write_no_wrap(f, pool.no_wrap(id), true)?;
                match self.func.loop_name(*loop_id) {
                    Some(name) => write!(f, "<%{name}>"),
                    None => write!(f, "<%loop{}>", loop_id.raw()),
                }
            }
        }
    }

    fn write_joined(
        &self,
        f: &mut fmt::Formatter<'_>,
        operands: &[ScevId],
        separator: &str,
    ) -> fmt::Result {
        f.write_str("(")?;
        for (i, &op) in operands.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            self.write_expr(f, op)?;
        }
        f.write_str(")")
    }
}

fn write_no_wrap(f: &mut fmt::Formatter<'_>, no_wrap: NoWrap, recurrence: bool) -> fmt::Result {
    if no_wrap.contains(NoWrap::NUW) {
        f.write_str("<nuw>")?;
    }
    if no_wrap.contains(NoWrap::NSW) {
        f.write_str("<nsw>")?;
    }
    // NW is implied by the other two and only spelled out on its own
    if recurrence && no_wrap == NoWrap::NW {
        f.write_str("<nw>")?;
    }
    Ok(())
}

impl fmt::Display for ScevDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_expr(f, self.id)
    }
}

impl fmt::Debug for ScevDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} = {}", self.id, self)
    }
}
