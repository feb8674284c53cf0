use crate::{
    error::RewriteError,
    expr::{Expr, TypeTag},
    obs::RewriteStats,
    rewrite::policy,
};

const CONTAINS: &str = "Contains";

/// Visit one expression tree depth-first, rewriting membership tests.
///
/// Children of a matched call are visited before the rewrite decision,
/// so membership tests nested inside a receiver or probed-value
/// expression are rewritten before the outer test is evaluated.
pub(crate) fn visit(
    expr: &Expr,
    elements_to_cache: usize,
    stats: &RewriteStats,
) -> Result<Expr, RewriteError> {
    match expr {
        Expr::Call {
            receiver,
            method,
            type_args,
            args,
            ty,
        } => visit_call(
            receiver.as_deref(),
            method,
            type_args,
            args,
            ty,
            elements_to_cache,
            stats,
        ),
        Expr::Member {
            base,
            member,
            kind,
            ty,
        } => Ok(Expr::Member {
            base: Box::new(visit(base, elements_to_cache, stats)?),
            member: member.clone(),
            kind: *kind,
            ty: ty.clone(),
        }),
        Expr::Convert { inner, target } => Ok(Expr::Convert {
            inner: Box::new(visit(inner, elements_to_cache, stats)?),
            target: target.clone(),
        }),
        Expr::Binary { op, left, right } => Ok(Expr::Binary {
            op: *op,
            left: Box::new(visit(left, elements_to_cache, stats)?),
            right: Box::new(visit(right, elements_to_cache, stats)?),
        }),
        Expr::Constant { .. } | Expr::Parameter { .. } | Expr::Thunk { .. } => Ok(expr.clone()),
    }
}

#[allow(clippy::too_many_arguments)]
fn visit_call(
    receiver: Option<&Expr>,
    method: &str,
    type_args: &[TypeTag],
    args: &[Expr],
    ty: &TypeTag,
    elements_to_cache: usize,
    stats: &RewriteStats,
) -> Result<Expr, RewriteError> {
    // Instance form: receiver.Contains(probed).
    if method == CONTAINS
        && let Some(receiver) = receiver
        && args.len() == 1
    {
        stats.record_contains_site();
        let visited_receiver = visit(receiver, elements_to_cache, stats)?;
        let visited_probed = visit(&args[0], elements_to_cache, stats)?;

        if let Some(replacement) =
            policy::rewrite_contains(&visited_receiver, &visited_probed, elements_to_cache, stats)?
        {
            return Ok(replacement);
        }

        return Ok(Expr::Call {
            receiver: Some(Box::new(visited_receiver)),
            method: method.to_string(),
            type_args: type_args.to_vec(),
            args: vec![visited_probed],
            ty: ty.clone(),
        });
    }

    // Extension form: Contains(collection, probed).
    if method == CONTAINS && receiver.is_none() && args.len() == 2 {
        stats.record_contains_site();
        let visited_collection = visit(&args[0], elements_to_cache, stats)?;
        let visited_probed = visit(&args[1], elements_to_cache, stats)?;

        if let Some(replacement) = policy::rewrite_contains(
            &visited_collection,
            &visited_probed,
            elements_to_cache,
            stats,
        )? {
            return Ok(replacement);
        }

        return Ok(Expr::Call {
            receiver: None,
            method: method.to_string(),
            type_args: type_args.to_vec(),
            args: vec![visited_collection, visited_probed],
            ty: ty.clone(),
        });
    }

    // Any other call, including Contains at an unexpected arity: default
    // traversal, structurally unchanged.
    let visited_receiver = match receiver {
        Some(receiver) => Some(Box::new(visit(receiver, elements_to_cache, stats)?)),
        None => None,
    };
    let visited_args = args
        .iter()
        .map(|arg| visit(arg, elements_to_cache, stats))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Expr::Call {
        receiver: visited_receiver,
        method: method.to_string(),
        type_args: type_args.to_vec(),
        args: visited_args,
        ty: ty.clone(),
    })
}
