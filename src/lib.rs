//! Immutable symbolic expression trees over numeric constants and named symbols,
//! with precedence-aware infix rendering and symbolic differentiation driven by a
//! sharing-aware post-order fold.

pub mod calculus;
pub mod error;
pub mod expr;
pub mod format;
pub mod traverse;

pub use calculus::{differentiate, Differentiator};
pub use error::{ExprError, Result};
pub use expr::{
    add, div, make_expr, mul, one, pow, sub, zero, Expr, ExprKind, IntoExpr, NodeId, Numeric,
    Operator, Rational,
};
pub use format::render;
pub use traverse::{depth, node_count, post_order_fold};
