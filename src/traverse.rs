//! Sharing-aware post-order folding over expression DAGs.
//!
//! A subexpression may be referenced by several parents. The fold keys its
//! results on node identity, so each distinct node is handed to the rule exactly
//! once and every parent sees the same cached result. The walk keeps its own work
//! list instead of recursing, which keeps stack usage flat for deep expressions.

use std::collections::HashMap;
use std::convert::Infallible;

use tracing::trace;

use crate::expr::{Expr, NodeId};

/// Fold `root` bottom-up.
///
/// `rule` receives each node together with the results already computed for its
/// operands, in declaration order, and its error aborts the fold. Extra context
/// for the rule is whatever the closure captures. Each call owns its own cache.
pub fn post_order_fold<R, E, F>(root: &Expr, mut rule: F) -> Result<R, E>
where
    F: FnMut(&Expr, &[&R]) -> Result<R, E>,
{
    let mut folded: HashMap<NodeId, R> = HashMap::new();
    let mut work: Vec<&Expr> = vec![root];

    while let Some(node) = work.pop() {
        // A shared node can be queued by several pending parents.
        if folded.contains_key(&node.id()) {
            continue;
        }

        let unresolved: Vec<&Expr> = node
            .operands()
            .filter(|operand| !folded.contains_key(&operand.id()))
            .collect();

        if unresolved.is_empty() {
            let result = {
                let operands: Vec<&R> = node.operands().map(|o| &folded[&o.id()]).collect();
                rule(node, &operands)?
            };
            folded.insert(node.id(), result);
        } else {
            work.push(node);
            // Reversed so the leftmost operand is folded first.
            work.extend(unresolved.into_iter().rev());
        }
    }

    trace!(visited = folded.len(), "post-order fold complete");
    Ok(folded
        .remove(&root.id())
        .expect("root is folded once the work list drains"))
}

/// Number of distinct node instances reachable from `expr`.
pub fn node_count(expr: &Expr) -> usize {
    let mut count = 0;
    let counted: Result<(), Infallible> = post_order_fold(expr, |_, _| {
        count += 1;
        Ok(())
    });
    match counted {
        Ok(()) => count,
        Err(never) => match never {},
    }
}

/// Length of the longest root-to-leaf path, counting nodes.
pub fn depth(expr: &Expr) -> usize {
    let measured = post_order_fold::<usize, Infallible, _>(expr, |_, operands| {
        Ok(1 + operands.iter().map(|d| **d).max().unwrap_or(0))
    });
    match measured {
        Ok(depth) => depth,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{add, mul, Expr};

    #[test]
    fn rule_sees_operand_results_in_order() {
        let e = add(mul("a", "b").unwrap(), "c").unwrap();
        let text = post_order_fold::<String, Infallible, _>(&e, |node, operands| {
            Ok(match node.as_binary() {
                Some((op, _, _)) => format!("({} {} {})", op.symbol(), operands[0], operands[1]),
                None => node.to_string(),
            })
        });
        assert_eq!(text.unwrap(), "(+ (* a b) c)");
    }

    #[test]
    fn shared_operand_is_folded_once() {
        let v = add("x", 1).unwrap();
        let e = mul(&v, &v).unwrap();
        assert_eq!(node_count(&e), 4);
        assert_eq!(depth(&e), 3);
    }

    #[test]
    fn error_stops_the_fold() {
        let e = add("x", mul("y", "z").unwrap()).unwrap();
        let mut seen = Vec::new();
        let result: Result<(), String> = post_order_fold(&e, |node, _| {
            seen.push(node.to_string());
            match node.as_symbol() {
                Some("y") => Err("y is not allowed".to_string()),
                _ => Ok(()),
            }
        });
        assert_eq!(result, Err("y is not allowed".to_string()));
        assert_eq!(seen, vec!["x", "y"]);
    }

    #[test]
    fn leaf_root_is_folded_directly() {
        let x = Expr::symbol("x").unwrap();
        assert_eq!(node_count(&x), 1);
        assert_eq!(depth(&x), 1);
    }
}
