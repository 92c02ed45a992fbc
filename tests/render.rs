use exprdiff::{add, div, mul, pow, render, sub, Expr};

fn sym(name: &str) -> Expr {
    Expr::symbol(name).unwrap()
}

#[test]
fn lower_precedence_operands_are_parenthesized() {
    let e = mul(add(sym("x"), sym("y")).unwrap(), sym("z")).unwrap();
    assert_eq!(render(&e), "(x + y) * z");
}

#[test]
fn tighter_operands_are_not_parenthesized() {
    let e = add(mul(sym("x"), sym("y")).unwrap(), sym("z")).unwrap();
    assert_eq!(render(&e), "x * y + z");

    let e = sub(sym("a"), pow(sym("b"), 2).unwrap()).unwrap();
    assert_eq!(render(&e), "a - b ^ 2");
}

#[test]
fn associativity_is_not_considered() {
    let left = sub(sub("a", "b").unwrap(), "c").unwrap();
    let right = sub("a", sub("b", "c").unwrap()).unwrap();
    assert_eq!(render(&left), "a - b - c");
    assert_eq!(render(&right), "a - b - c");

    let nested = div("a", div("b", "c").unwrap()).unwrap();
    assert_eq!(render(&nested), "a / b / c");
}

#[test]
fn display_matches_render() {
    let e = div(add(1, "x").unwrap(), pow("y", 2).unwrap()).unwrap();
    assert_eq!(e.to_string(), render(&e));
    assert_eq!(e.to_string(), "(1 + x) / y ^ 2");
}

#[test]
fn debug_shows_tree_structure() {
    let e = mul(add("x", 1).unwrap(), 2.0).unwrap();
    assert_eq!(format!("{e:?}"), r#"Mul(Add("x", 1), 2.0)"#);
}

#[test]
fn negative_constants_are_not_parenthesized() {
    let e = mul(-3, "x").unwrap();
    assert_eq!(render(&e), "-3 * x");
}

#[test]
fn scientific_floats_use_a_signed_two_digit_exponent() {
    assert_eq!(render(&Expr::number(1e16).unwrap()), "1e+16");
    assert_eq!(render(&Expr::number(1e-5).unwrap()), "1e-05");
    assert_eq!(render(&Expr::number(-2.5e-7).unwrap()), "-2.5e-07");
    assert_eq!(render(&Expr::number(1.5e300).unwrap()), "1.5e+300");
    assert_eq!(render(&Expr::number(1e15).unwrap()), "1000000000000000.0");
    assert_eq!(render(&Expr::number(0.0001).unwrap()), "0.0001");
}

#[test]
fn debug_names_every_operator() {
    let base = sub(div("a", 2).unwrap(), 1).unwrap();
    let exp = mul("b", add("c", 3).unwrap()).unwrap();
    let e = pow(base, exp).unwrap();
    assert_eq!(
        format!("{e:?}"),
        r#"Pow(Sub(Div("a", 2), 1), Mul("b", Add("c", 3)))"#
    );
}
