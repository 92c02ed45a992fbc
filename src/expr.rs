//! Expression tree definitions and builders.

use std::fmt;
use std::mem;
use std::sync::{Arc, OnceLock};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use crate::error::{ExprError, Result};

pub type Rational = BigRational;

/// Value stored in a `Number` leaf.
#[derive(Clone, Debug, PartialEq)]
pub enum Numeric {
    Integer(BigInt),
    Rational(Rational),
    /// Always finite once wrapped in an [`Expr`].
    Float(f64),
}

impl Numeric {
    /// `self - 1`, keeping the representation.
    pub fn pred(&self) -> Numeric {
        match self {
            Numeric::Integer(n) => Numeric::Integer(n - BigInt::one()),
            Numeric::Rational(r) => Numeric::Rational(r - Rational::one()),
            Numeric::Float(x) => Numeric::Float(x - 1.0),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Numeric::Float(x) => x.is_finite(),
            Numeric::Integer(_) | Numeric::Rational(_) => true,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(n) => write!(f, "{n}"),
            Numeric::Rational(r) if r.denom().is_one() => write!(f, "{}", r.numer()),
            Numeric::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Numeric::Float(x) => write!(f, "{}", float_text(*x)),
        }
    }
}

/// Shortest round-trip text of a float, with a trailing `.0` on integral values
/// and a signed, two-digit exponent in scientific form (`1e+16`, `1e-05`).
fn float_text(x: f64) -> String {
    // Debug switches to scientific form at the same magnitudes.
    let text = format!("{x:?}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

macro_rules! numeric_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Numeric {
                fn from(value: $t) -> Self {
                    Numeric::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

numeric_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Numeric {
    fn from(value: BigInt) -> Self {
        Numeric::Integer(value)
    }
}

impl From<Rational> for Numeric {
    fn from(value: Rational) -> Self {
        Numeric::Rational(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Float(value)
    }
}

impl From<f32> for Numeric {
    fn from(value: f32) -> Self {
        Numeric::Float(f64::from(value))
    }
}

/// Binary operators with their display symbol and binding strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        }
    }

    pub const fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Pow => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operator::Add => "Add",
            Operator::Sub => "Sub",
            Operator::Mul => "Mul",
            Operator::Div => "Div",
            Operator::Pow => "Pow",
        }
    }
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Number(Numeric),
    Symbol(String),
    Add(Expr, Expr),
    Sub(Expr, Expr),
    Mul(Expr, Expr),
    Div(Expr, Expr),
    Pow(Expr, Expr),
}

impl ExprKind {
    /// Operator, left operand and right operand of a binary node.
    pub fn as_binary(&self) -> Option<(Operator, &Expr, &Expr)> {
        match self {
            ExprKind::Number(_) | ExprKind::Symbol(_) => None,
            ExprKind::Add(l, r) => Some((Operator::Add, l, r)),
            ExprKind::Sub(l, r) => Some((Operator::Sub, l, r)),
            ExprKind::Mul(l, r) => Some((Operator::Mul, l, r)),
            ExprKind::Div(l, r) => Some((Operator::Div, l, r)),
            ExprKind::Pow(l, r) => Some((Operator::Pow, l, r)),
        }
    }
}

/// Identity of a node allocation. Only meaningful while the node is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Shared handle to an immutable expression node.
///
/// Cloning is cheap and keeps the identity: both handles point at the same node.
/// There is intentionally no `PartialEq`; compare with [`Expr::ptr_eq`] for
/// identity or [`Expr::structurally_eq`] for shape.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    /// Numeric leaf. Fails for non-finite floats.
    pub fn number(value: impl Into<Numeric>) -> Result<Self> {
        let value = value.into();
        if !value.is_finite() {
            return Err(ExprError::TypeConstraint(format!(
                "Number value must be a real number, got {value}"
            )));
        }
        Ok(Expr(Arc::new(ExprKind::Number(value))))
    }

    /// Integer leaf; integers always satisfy the `Number` constraint.
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Expr(Arc::new(ExprKind::Number(Numeric::Integer(value.into()))))
    }

    /// Symbol leaf. The name must be non-empty.
    ///
    /// Only text is accepted as a name:
    ///
    /// ```compile_fail
    /// let _ = exprdiff::Expr::symbol(42);
    /// ```
    pub fn symbol(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ExprError::TypeConstraint(format!(
                "Symbol name must be a non-empty token, got {name:?}"
            )));
        }
        Ok(Expr(Arc::new(ExprKind::Symbol(name))))
    }

    pub fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Self {
        let kind = match op {
            Operator::Add => ExprKind::Add(lhs, rhs),
            Operator::Sub => ExprKind::Sub(lhs, rhs),
            Operator::Mul => ExprKind::Mul(lhs, rhs),
            Operator::Div => ExprKind::Div(lhs, rhs),
            Operator::Pow => ExprKind::Pow(lhs, rhs),
        };
        Expr(Arc::new(kind))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    pub fn operator(&self) -> Option<Operator> {
        self.as_binary().map(|(op, _, _)| op)
    }

    pub fn as_binary(&self) -> Option<(Operator, &Expr, &Expr)> {
        self.0.as_binary()
    }

    /// Children in declaration order; empty for leaves.
    pub fn operands(&self) -> impl Iterator<Item = &Expr> + '_ {
        self.as_binary()
            .map(|(_, l, r)| [l, r])
            .into_iter()
            .flatten()
    }

    pub fn as_number(&self) -> Option<&Numeric> {
        match self.kind() {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.as_binary().is_none()
    }

    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0) as usize)
    }

    /// Deep comparison of shape and leaf values, ignoring identity.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.ptr_eq(b) {
                continue;
            }
            match (a.kind(), b.kind()) {
                (ExprKind::Number(x), ExprKind::Number(y)) if x == y => {}
                (ExprKind::Symbol(x), ExprKind::Symbol(y)) if x == y => {}
                _ => match (a.as_binary(), b.as_binary()) {
                    (Some((op_a, la, ra)), Some((op_b, lb, rb))) if op_a == op_b => {
                        pending.push((la, lb));
                        pending.push((ra, rb));
                    }
                    _ => return false,
                },
            }
        }
        true
    }
}

impl Drop for Expr {
    // Unlinks uniquely owned children onto a heap stack so that releasing a deep
    // chain does not recurse once per level.
    fn drop(&mut self) {
        let mut orphans = Vec::new();
        detach_operands(&mut self.0, &mut orphans);
        while let Some(mut node) = orphans.pop() {
            detach_operands(&mut node.0, &mut orphans);
        }
    }
}

fn detach_operands(node: &mut Arc<ExprKind>, out: &mut Vec<Expr>) {
    let Some(kind) = Arc::get_mut(node) else {
        return;
    };
    match kind {
        ExprKind::Number(_) | ExprKind::Symbol(_) => {}
        ExprKind::Add(l, r)
        | ExprKind::Sub(l, r)
        | ExprKind::Mul(l, r)
        | ExprKind::Div(l, r)
        | ExprKind::Pow(l, r) => {
            if !l.is_leaf() {
                out.push(mem::replace(l, hollow()));
            }
            if !r.is_leaf() {
                out.push(mem::replace(r, hollow()));
            }
        }
    }
}

fn hollow() -> Expr {
    static HOLLOW: OnceLock<Expr> = OnceLock::new();
    HOLLOW.get_or_init(|| Expr::integer(0)).clone()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::render(self))
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Number(n) => write!(f, "{n}"),
            ExprKind::Symbol(name) => write!(f, "{name:?}"),
            ExprKind::Add(l, r) => write!(f, "Add({l:?}, {r:?})"),
            ExprKind::Sub(l, r) => write!(f, "Sub({l:?}, {r:?})"),
            ExprKind::Mul(l, r) => write!(f, "Mul({l:?}, {r:?})"),
            ExprKind::Div(l, r) => write!(f, "Div({l:?}, {r:?})"),
            ExprKind::Pow(l, r) => write!(f, "Pow({l:?}, {r:?})"),
        }
    }
}

/// Conversion into an expression node at a builder boundary.
///
/// Nodes pass through unchanged, numeric values become `Number` leaves and text
/// becomes `Symbol` leaves. Values of any other kind do not implement the trait.
pub trait IntoExpr {
    fn into_expr(self) -> Result<Expr>;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Result<Expr> {
        Ok(self)
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> Result<Expr> {
        Ok(self.clone())
    }
}

impl IntoExpr for Numeric {
    fn into_expr(self) -> Result<Expr> {
        Expr::number(self)
    }
}

macro_rules! into_expr_numeric {
    ($($t:ty),*) => {
        $(
            impl IntoExpr for $t {
                fn into_expr(self) -> Result<Expr> {
                    Expr::number(self)
                }
            }
        )*
    };
}

into_expr_numeric!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, BigInt, Rational
);

impl IntoExpr for &str {
    fn into_expr(self) -> Result<Expr> {
        Expr::symbol(self)
    }
}

impl IntoExpr for String {
    fn into_expr(self) -> Result<Expr> {
        Expr::symbol(self)
    }
}

impl IntoExpr for &String {
    fn into_expr(self) -> Result<Expr> {
        Expr::symbol(self.as_str())
    }
}

/// Coerce a node, number or string into a node.
///
/// Anything else is rejected by the compiler:
///
/// ```compile_fail
/// let _ = exprdiff::make_expr(vec![1, 2]);
/// ```
pub fn make_expr(value: impl IntoExpr) -> Result<Expr> {
    value.into_expr()
}

fn combine(op: Operator, lhs: impl IntoExpr, rhs: impl IntoExpr) -> Result<Expr> {
    Ok(Expr::binary(op, lhs.into_expr()?, rhs.into_expr()?))
}

pub fn add(lhs: impl IntoExpr, rhs: impl IntoExpr) -> Result<Expr> {
    combine(Operator::Add, lhs, rhs)
}

pub fn sub(lhs: impl IntoExpr, rhs: impl IntoExpr) -> Result<Expr> {
    combine(Operator::Sub, lhs, rhs)
}

pub fn mul(lhs: impl IntoExpr, rhs: impl IntoExpr) -> Result<Expr> {
    combine(Operator::Mul, lhs, rhs)
}

pub fn div(lhs: impl IntoExpr, rhs: impl IntoExpr) -> Result<Expr> {
    combine(Operator::Div, lhs, rhs)
}

pub fn pow(base: impl IntoExpr, exp: impl IntoExpr) -> Result<Expr> {
    combine(Operator::Pow, base, exp)
}

pub fn zero() -> Expr {
    Expr::integer(0)
}

pub fn one() -> Expr {
    Expr::integer(1)
}
