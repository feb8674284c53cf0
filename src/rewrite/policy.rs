use crate::{
    error::RewriteError,
    expr::{BinaryOp, Expr, TypeTag},
    obs::RewriteStats,
    rewrite::{boxing, eval},
    value::Value,
};

/// Decide whether one membership test can be replaced by a bounded
/// equality/OR chain. `None` means leave the original call untouched.
///
/// The receiver is evaluated exactly once per call site: evaluation may
/// invoke a host closure and must not be assumed repeatable without cost.
pub(crate) fn rewrite_contains(
    receiver: &Expr,
    probed: &Expr,
    elements_to_cache: usize,
    stats: &RewriteStats,
) -> Result<Option<Expr>, RewriteError> {
    // Receivers whose declared type carries no element-type argument are
    // not understood; pass the call through rather than guess.
    let receiver_ty = receiver.ty();
    let Some(elem_ty) = receiver_ty.element() else {
        return Ok(None);
    };

    let Value::List(elements) = eval::evaluate(receiver, stats)? else {
        return Err(RewriteError::ReceiverNotSequence {
            ty: receiver_ty.clone(),
        });
    };

    let count = elements.len();
    let replacement = if count == 0 {
        // An empty collection never contains the probed value,
        // regardless of the bound.
        Expr::bool_constant(false)
    } else if count <= elements_to_cache {
        build_chain(probed, &elements, elem_ty)
    } else {
        // Expanding a large collection would reintroduce the shape
        // instability this rewrite exists to remove.
        return Ok(None);
    };

    stats.record_rewrite();
    Ok(Some(replacement))
}

// Left-associated OR chain over boxed equality comparisons, in ascending
// element order so output is deterministic.
fn build_chain(probed: &Expr, elements: &[Value], elem_ty: &TypeTag) -> Expr {
    let mut comparisons = elements.iter().map(|element| {
        Expr::binary(
            BinaryOp::Eq,
            probed.clone(),
            boxing::box_value(element.clone(), elem_ty.clone()),
        )
    });

    // The empty case is handled by the caller; an empty chain here would
    // be vacuously false anyway.
    let Some(first) = comparisons.next() else {
        return Expr::bool_constant(false);
    };

    comparisons.fold(first, |acc, comparison| {
        Expr::binary(BinaryOp::Or, acc, comparison)
    })
}

///
/// TESTS
///
