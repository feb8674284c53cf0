use crate::{
    error::RewriteError, expr::Expr, obs::RewriteStats, rewrite::boxing, value::Value,
};

/// Reduce one sub-expression to a concrete runtime value.
///
/// The fast path is pure structural recursion over constant-like chains
/// (constants, transparent conversions, member reads off evaluated
/// records). Anything else falls to the slow path. Correctness never
/// depends on which path ran; the fast path only avoids the cost of the
/// host-closure fallback on the overwhelmingly common shapes.
///
/// An unevaluable node is a host programming defect, not a recoverable
/// condition: the tree must always be evaluable for a membership-test
/// receiver.
pub(crate) fn evaluate(expr: &Expr, stats: &RewriteStats) -> Result<Value, RewriteError> {
    match expr {
        Expr::Constant { value, .. } => Ok(value.clone()),
        // Coercion is transparent for the purpose of recovering the value.
        Expr::Convert { inner, .. } => evaluate(inner, stats),
        Expr::Member { base, member, .. } => {
            let base = evaluate(base, stats)?;
            read_member(&base, member)
        }
        other => evaluate_slow(other, stats),
    }
}

// Fallback for shapes the structural path does not classify. Counted so
// hosts can spot call sites that dodge the fast path.
fn evaluate_slow(expr: &Expr, stats: &RewriteStats) -> Result<Value, RewriteError> {
    match expr {
        Expr::Thunk { f, .. } => {
            stats.record_slow_fallback();
            Ok(f.invoke())
        }
        Expr::Call { .. } => Err(RewriteError::Unevaluable { kind: "call" }),
        Expr::Binary { .. } => Err(RewriteError::Unevaluable { kind: "binary" }),
        Expr::Parameter { .. } => Err(RewriteError::Unevaluable { kind: "parameter" }),
        Expr::Constant { .. } | Expr::Convert { .. } | Expr::Member { .. } => evaluate(expr, stats),
    }
}

// Property and field reads are the same operation at evaluation time;
// the member kind matters only to shape fingerprinting.
fn read_member(base: &Value, member: &str) -> Result<Value, RewriteError> {
    match base {
        Value::Holder(cell) if member == boxing::HOLDER_FIELD => Ok(cell.value.clone()),
        Value::Record(fields) => fields
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| RewriteError::MemberNotFound {
                member: member.to_string(),
            }),
        _ => Err(RewriteError::MemberOnScalar {
            member: member.to_string(),
        }),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::TypeTag;

    fn int_list(values: &[i64]) -> Value {
        Value::List(values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn constants_evaluate_on_the_fast_path() {
        let stats = RewriteStats::new();
        let expr = Expr::sequence_constant(vec![Value::Int(1)], TypeTag::Int);

        assert_eq!(evaluate(&expr, &stats), Ok(int_list(&[1])));
        assert_eq!(stats.snapshot().slow_evaluation_fallbacks, 0);
    }

    #[test]
    fn conversions_are_transparent() {
        let stats = RewriteStats::new();
        let expr = Expr::convert(
            Expr::sequence_constant(vec![Value::Int(1), Value::Int(2)], TypeTag::Int),
            TypeTag::Opaque("ReadOnlyList".to_string()),
        );

        assert_eq!(evaluate(&expr, &stats), Ok(int_list(&[1, 2])));
        assert_eq!(stats.snapshot().slow_evaluation_fallbacks, 0);
    }

    #[test]
    fn member_reads_resolve_off_evaluated_records() {
        let stats = RewriteStats::new();
        let holder = Expr::constant(
            Value::record([("ids", int_list(&[4, 5]))]),
            TypeTag::Record("Filter".to_string()),
        );
        let expr = Expr::field(holder, "ids", TypeTag::sequence_of(TypeTag::Int));

        assert_eq!(evaluate(&expr, &stats), Ok(int_list(&[4, 5])));
        assert_eq!(stats.snapshot().slow_evaluation_fallbacks, 0);
    }

    #[test]
    fn nested_member_chains_stay_on_the_fast_path() {
        let stats = RewriteStats::new();
        let outer = Expr::constant(
            Value::record([("filter", Value::record([("ids", int_list(&[9]))]))]),
            TypeTag::Record("Request".to_string()),
        );
        let expr = Expr::field(
            Expr::property(outer, "filter", TypeTag::Record("Filter".to_string())),
            "ids",
            TypeTag::sequence_of(TypeTag::Int),
        );

        assert_eq!(evaluate(&expr, &stats), Ok(int_list(&[9])));
        assert_eq!(stats.snapshot().slow_evaluation_fallbacks, 0);
    }

    #[test]
    fn thunks_evaluate_on_the_slow_path_and_are_counted() {
        let stats = RewriteStats::new();
        let expr = Expr::thunk(|| Value::List(vec![Value::Int(3)]), TypeTag::sequence_of(TypeTag::Int));

        assert_eq!(evaluate(&expr, &stats), Ok(int_list(&[3])));
        assert_eq!(stats.snapshot().slow_evaluation_fallbacks, 1);
    }

    #[test]
    fn member_read_over_a_thunk_counts_one_fallback() {
        let stats = RewriteStats::new();
        let expr = Expr::field(
            Expr::thunk(
                || Value::record([("ids", Value::List(vec![Value::Int(6)]))]),
                TypeTag::Record("Filter".to_string()),
            ),
            "ids",
            TypeTag::sequence_of(TypeTag::Int),
        );

        assert_eq!(evaluate(&expr, &stats), Ok(int_list(&[6])));
        assert_eq!(stats.snapshot().slow_evaluation_fallbacks, 1);
    }

    #[test]
    fn missing_member_is_a_fatal_host_defect() {
        let stats = RewriteStats::new();
        let expr = Expr::field(
            Expr::constant(Value::record([("ids", int_list(&[1]))]), TypeTag::Record("Filter".to_string())),
            "keys",
            TypeTag::sequence_of(TypeTag::Int),
        );

        assert_eq!(
            evaluate(&expr, &stats),
            Err(RewriteError::MemberNotFound {
                member: "keys".to_string(),
            })
        );
    }

    #[test]
    fn member_read_off_a_scalar_is_a_fatal_host_defect() {
        let stats = RewriteStats::new();
        let expr = Expr::field(
            Expr::constant(Value::Int(1), TypeTag::Int),
            "ids",
            TypeTag::sequence_of(TypeTag::Int),
        );

        assert_eq!(
            evaluate(&expr, &stats),
            Err(RewriteError::MemberOnScalar {
                member: "ids".to_string(),
            })
        );
    }

    #[test]
    fn unevaluable_shapes_surface_loudly() {
        let stats = RewriteStats::new();
        let call = Expr::call(
            None,
            "Distinct",
            vec![],
            vec![],
            TypeTag::sequence_of(TypeTag::Int),
        );
        let parameter = Expr::parameter("i", TypeTag::Int);

        assert_eq!(
            evaluate(&call, &stats),
            Err(RewriteError::Unevaluable { kind: "call" })
        );
        assert_eq!(
            evaluate(&parameter, &stats),
            Err(RewriteError::Unevaluable { kind: "parameter" })
        );
    }
}
