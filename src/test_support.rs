//! Test-only execution harness: interprets predicate trees the way the
//! downstream query engine would, binding one probe value per row.

use crate::{
    expr::{BinaryOp, Expr},
    value::Value,
};

/// Evaluate `expr` as a boolean predicate with `probe` bound to every
/// parameter node.
pub(crate) fn eval_predicate(expr: &Expr, probe: &Value) -> bool {
    match eval_value(expr, probe) {
        Value::Bool(v) => v,
        other => panic!("predicate evaluated to a non-boolean: {other:?}"),
    }
}

fn eval_value(expr: &Expr, probe: &Value) -> Value {
    match expr {
        Expr::Constant { value, .. } => value.clone(),
        Expr::Parameter { .. } => probe.clone(),
        Expr::Convert { inner, .. } => eval_value(inner, probe),
        Expr::Member { base, member, .. } => match eval_value(base, probe) {
            Value::Holder(cell) => cell.value.clone(),
            Value::Record(fields) => fields
                .iter()
                .find(|(name, _)| name == member)
                .unwrap_or_else(|| panic!("member '{member}' missing from record"))
                .1
                .clone(),
            other => panic!("member '{member}' read off non-record: {other:?}"),
        },
        Expr::Binary { op, left, right } => match op {
            BinaryOp::Eq => Value::Bool(eval_value(left, probe) == eval_value(right, probe)),
            BinaryOp::Or => {
                Value::Bool(eval_predicate(left, probe) || eval_predicate(right, probe))
            }
        },
        Expr::Call {
            receiver,
            method,
            args,
            ..
        } => {
            // The only call the harness executes is the membership test
            // itself, in either form.
            let (collection, probed) = match (receiver, method.as_str(), args.as_slice()) {
                (Some(receiver), "Contains", [probed]) => {
                    (eval_value(receiver, probe), eval_value(probed, probe))
                }
                (None, "Contains", [collection, probed]) => {
                    (eval_value(collection, probe), eval_value(probed, probe))
                }
                _ => panic!("unsupported call in test harness: {method}"),
            };
            let Value::List(items) = collection else {
                panic!("contains receiver must evaluate to a sequence");
            };
            Value::Bool(items.contains(&probed))
        }
        Expr::Thunk { f, .. } => f.invoke(),
    }
}

/// Filter `store` through `predicate`, binding each element as the probe.
pub(crate) fn scan(store: &[i64], predicate: &Expr) -> Vec<i64> {
    store
        .iter()
        .copied()
        .filter(|i| eval_predicate(predicate, &Value::Int(*i)))
        .collect()
}
