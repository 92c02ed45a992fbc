use crate::expr::{Expr, ExprKind, Operator};

/// Infix text of `expr`, parenthesizing only operands that bind more loosely
/// than their parent.
///
/// Only precedence is compared, so `a - (b - c)` and `(a - b) - c` both render
/// as `a - b - c`.
pub fn render(expr: &Expr) -> String {
    match expr.kind() {
        ExprKind::Number(n) => n.to_string(),
        ExprKind::Symbol(name) => name.clone(),
        ExprKind::Add(a, b) => infix(Operator::Add, a, b),
        ExprKind::Sub(a, b) => infix(Operator::Sub, a, b),
        ExprKind::Mul(a, b) => infix(Operator::Mul, a, b),
        ExprKind::Div(a, b) => infix(Operator::Div, a, b),
        ExprKind::Pow(a, b) => infix(Operator::Pow, a, b),
    }
}

fn infix(op: Operator, a: &Expr, b: &Expr) -> String {
    format!("{} {} {}", bracket(op, a), op.symbol(), bracket(op, b))
}

fn bracket(parent: Operator, operand: &Expr) -> String {
    let body = render(operand);
    match operand.operator() {
        Some(op) if op.precedence() < parent.precedence() => format!("({body})"),
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{add, div, mul, pow, sub, Expr, Rational};

    #[test]
    fn leaves_render_their_value() {
        assert_eq!(render(&Expr::integer(-4)), "-4");
        assert_eq!(render(&Expr::number(2.0).unwrap()), "2.0");
        assert_eq!(render(&Expr::number(0.25).unwrap()), "0.25");
        let third = Rational::new(1.into(), 3.into());
        assert_eq!(render(&Expr::number(third).unwrap()), "1/3");
        assert_eq!(render(&Expr::symbol("theta").unwrap()), "theta");
    }

    #[test]
    fn equal_precedence_is_not_bracketed() {
        let e = div(mul("a", "b").unwrap(), "c").unwrap();
        assert_eq!(render(&e), "a * b / c");
        let e = pow("a", pow("b", "c").unwrap()).unwrap();
        assert_eq!(render(&e), "a ^ b ^ c");
    }

    #[test]
    fn looser_operands_are_bracketed_on_both_sides() {
        let e = pow(
            sub("a", 1).unwrap(),
            add("b", mul(2, "c").unwrap()).unwrap(),
        )
        .unwrap();
        assert_eq!(render(&e), "(a - 1) ^ (b + 2 * c)");
    }
}
