
use crate::{
    expr::{Expr, TypeTag},
    value::Value,
};

pub(crate) const STORE: [i64; 7] = [1, 2, 3, 4, 5, 6, 7];

pub(crate) fn int_filter(values: &[i64]) -> Expr {
    Expr::sequence_constant(values.iter().copied().map(Value::Int).collect(), TypeTag::Int)
}

pub(crate) fn probe() -> Expr {
    Expr::parameter("i", TypeTag::Int)
}

/// `filter.Contains(i)` — instance form.
pub(crate) fn contains_instance(values: &[i64]) -> Expr {
    Expr::contains(int_filter(values), probe())
}

/// `Contains(filter, i)` — extension form.
pub(crate) fn contains_extension(values: &[i64]) -> Expr {
    Expr::contains_extension(int_filter(values), probe())
}
