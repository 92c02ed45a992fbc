use crate::error::{ExprError, Result};
use crate::expr::{add, div, mul, one, pow, sub, zero, Expr, ExprKind};
use crate::traverse::post_order_fold;
use tracing::{debug, instrument};

/// Derivative of `expr` with respect to the symbol named `var`.
///
/// The result is not simplified: `x * x` yields `1 * x + x * 1`. Shared
/// subexpressions are differentiated once and their derivative is shared too.
#[instrument(level = "debug", skip(expr))]
pub fn differentiate(expr: &Expr, var: &str) -> Result<Expr> {
    let differentiator = Differentiator::new(var);
    post_order_fold(expr, |node, operands| differentiator.derive(node, operands))
}

/// Per-variant derivative rules, applied to one node at a time.
pub struct Differentiator<'a> {
    var: &'a str,
}

impl<'a> Differentiator<'a> {
    pub fn new(var: &'a str) -> Self {
        Differentiator { var }
    }

    /// Derivative of `expr` given the derivatives of its operands, in order.
    pub fn derive(&self, expr: &Expr, operands: &[&Expr]) -> Result<Expr> {
        match expr.kind() {
            ExprKind::Number(_) => Ok(zero()),
            ExprKind::Symbol(name) if name == self.var => Ok(one()),
            ExprKind::Symbol(_) => Ok(zero()),

            ExprKind::Add(_, _) => {
                let (du, dv) = operand_pair(expr, operands)?;
                add(du, dv)
            }
            ExprKind::Sub(_, _) => {
                let (du, dv) = operand_pair(expr, operands)?;
                sub(du, dv)
            }
            ExprKind::Mul(u, v) => {
                let (du, dv) = operand_pair(expr, operands)?;
                self.product_rule(u, v, du, dv)
            }
            ExprKind::Div(u, v) => {
                let (du, dv) = operand_pair(expr, operands)?;
                self.quotient_rule(u, v, du, dv)
            }
            ExprKind::Pow(base, exp) => {
                let (dbase, _) = operand_pair(expr, operands)?;
                self.power_rule(base, exp, dbase)
            }
        }
    }

    fn product_rule(&self, u: &Expr, v: &Expr, du: &Expr, dv: &Expr) -> Result<Expr> {
        add(mul(du, v)?, mul(u, dv)?)
    }

    fn quotient_rule(&self, u: &Expr, v: &Expr, du: &Expr, dv: &Expr) -> Result<Expr> {
        let numerator = sub(mul(du, v)?, mul(u, dv)?)?;
        div(numerator, pow(v, 2)?)
    }

    fn power_rule(&self, base: &Expr, exp: &Expr, dbase: &Expr) -> Result<Expr> {
        match exp.as_number() {
            Some(n) => {
                let lowered = pow(base, Expr::number(n.pred())?)?;
                mul(mul(exp, lowered)?, dbase)
            }
            None => {
                debug!(var = self.var, exponent = %exp, "non-constant exponent");
                Err(ExprError::Unsupported(
                    "differentiation where the variable is in the exponent is not supported"
                        .to_string(),
                ))
            }
        }
    }
}

fn operand_pair<'e>(expr: &Expr, operands: &[&'e Expr]) -> Result<(&'e Expr, &'e Expr)> {
    match operands {
        [du, dv] => Ok((*du, *dv)),
        _ => Err(ExprError::Unsupported(format!(
            "{} expects 2 operand derivatives, got {}",
            expr.operator().map_or("leaf", |op| op.name()),
            operands.len()
        ))),
    }
}
