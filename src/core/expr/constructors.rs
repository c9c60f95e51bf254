//! Canonicalizing constructors: leaf builders, plus the sum (§4.3), product
//! (§4.5), numeric-power (§4.6), and power (§4.7) simplifiers.
//!
//! # Grouping instead of pairwise merge
//! §4.3/§4.5 describe a pairwise, recursive merge over two already-canonical
//! operand lists. This implementation reaches the same canonical multiset by
//! grouping instead: bucket operands by their non-numeric term (sum) or base
//! (product), fold numeric coefficients/exponents within each bucket, then
//! sort once with the §4.4 order relation. Both reach the same fixed point;
//! grouping is the simpler implementation technique and is what the
//! `non_const_term`/`non_numeric_term` helpers in
//! [`super::analysis`] exist to drive.
//!
//! # Why single-occurrence groups are never re-simplified
//! A bucket with exactly one contributing operand is left byte-for-byte as
//! that operand (or its unwrapped base, for exponent `1`): the operand was
//! already canonical when it was constructed, so re-deriving it is both
//! wasted work and, for `Power(Numeric, Numeric)` radicals already reduced
//! by [`numeric_power`], an infinite loop (re-simplifying an irreducible
//! radical returns the same irreducible radical). Only a bucket formed by
//! *merging* two or more operands is eligible for further simplification —
//! merging is precisely the case where the combined exponent/coefficient can
//! newly collapse.

use std::sync::Arc;

use super::{ConstantKind, Expr, ExprKind, FunctionKind, ONE, TrigKind, UNDEFINED, ZERO, expr_cmp};
use crate::core::number::{Number, PowerOutcome, factor_rational_power};
use crate::core::symbol::{intern_symbol, tmp_symbol};

impl Expr {
    /// `undefined()` (§6): the absorbing leaf.
    #[must_use]
    pub fn undefined() -> Arc<Self> {
        UNDEFINED.clone()
    }

    /// `symbol(name, positive?)` (§6).
    #[must_use]
    pub fn symbol(name: &str, positive: bool) -> Arc<Self> {
        Arc::new(Self::new(ExprKind::Symbol(intern_symbol(name, positive))))
    }

    /// `tmpSymbol(positive?)` (§6, §3 Lifecycles): a fresh anonymous symbol.
    #[must_use]
    pub fn tmp_symbol(positive: bool) -> Arc<Self> {
        Arc::new(Self::new(ExprKind::Symbol(tmp_symbol(positive))))
    }

    /// `numeric(int|rational|double)` (§6).
    #[must_use]
    pub fn numeric(n: Number) -> Arc<Self> {
        if n.is_zero() {
            return ZERO.clone();
        }
        if n.is_one() {
            return ONE.clone();
        }
        Arc::new(Self::new(ExprKind::Numeric(n)))
    }

    /// Convenience: an integer-valued numeric leaf.
    #[must_use]
    pub fn integer(n: i64) -> Arc<Self> {
        Self::numeric(Number::from_i64(n))
    }

    /// `constantPi()` (§6).
    #[must_use]
    pub fn constant_pi() -> Arc<Self> {
        Arc::new(Self::new(ExprKind::Constant(ConstantKind::Pi)))
    }

    /// `constantE()` (§6).
    #[must_use]
    pub fn constant_e() -> Arc<Self> {
        Arc::new(Self::new(ExprKind::Constant(ConstantKind::Euler)))
    }

    /// `log(x)` (§6): natural logarithm, with `log(1) -> 0` folded at
    /// construction since it is exact regardless of domain flags.
    #[must_use]
    pub fn log(x: Arc<Self>) -> Arc<Self> {
        if x.is_undefined() {
            return Self::undefined();
        }
        if x.is_one() {
            return Self::integer(0);
        }
        if x.as_ref() == Self::constant_e().as_ref() {
            return Self::integer(1);
        }
        if let ExprKind::Numeric(n) = &x.kind
            && n.is_double()
        {
            return Self::numeric(Number::from_f64(n.to_f64_lossy().ln()));
        }
        Arc::new(Self::new(ExprKind::Function(FunctionKind::Logarithm, vec![x])))
    }

    /// Builds a one-argument trig function, folding the handful of exact
    /// values (`sin(0)=0`, `cos(0)=1`, `tan(0)=0`) and evaluating double
    /// arguments eagerly (transcendental values have no exact rational form).
    #[must_use]
    pub fn trig(kind: TrigKind, x: Arc<Self>) -> Arc<Self> {
        debug_assert_eq!(kind.arity(), 1, "trig() only builds the unary trig functions");
        if x.is_undefined() {
            return Self::undefined();
        }
        if x.is_zero() {
            return match kind {
                TrigKind::Sin | TrigKind::Tan | TrigKind::Asin | TrigKind::Atan => Self::integer(0),
                TrigKind::Cos => Self::integer(1),
                TrigKind::Acos => Self::undefined(), // left symbolic: acos(0) = pi/2, not representable exactly here
                // Guarded by the `debug_assert_eq!` above.
                TrigKind::Atan2 => Self::undefined(),
            };
        }
        if let ExprKind::Numeric(n) = &x.kind
            && n.is_double()
        {
            let v = n.to_f64_lossy();
            let result = match kind {
                TrigKind::Sin => v.sin(),
                TrigKind::Cos => v.cos(),
                TrigKind::Tan => v.tan(),
                TrigKind::Asin => v.asin(),
                TrigKind::Acos => v.acos(),
                TrigKind::Atan => v.atan(),
                // Guarded by the `debug_assert_eq!` above; `trig()` is only
                // ever called with unary kinds, `atan2` goes through its own
                // constructor.
                TrigKind::Atan2 => v,
            };
            return Self::numeric(Number::from_f64(result));
        }
        Arc::new(Self::new(ExprKind::Function(FunctionKind::Trigonometric(kind), vec![x])))
    }

    /// `sin(x)`.
    #[must_use]
    pub fn sin(x: Arc<Self>) -> Arc<Self> {
        Self::trig(TrigKind::Sin, x)
    }

    /// `cos(x)`.
    #[must_use]
    pub fn cos(x: Arc<Self>) -> Arc<Self> {
        Self::trig(TrigKind::Cos, x)
    }

    /// `tan(x)`.
    #[must_use]
    pub fn tan(x: Arc<Self>) -> Arc<Self> {
        Self::trig(TrigKind::Tan, x)
    }

    /// `asin(x)`.
    #[must_use]
    pub fn asin(x: Arc<Self>) -> Arc<Self> {
        Self::trig(TrigKind::Asin, x)
    }

    /// `acos(x)`.
    #[must_use]
    pub fn acos(x: Arc<Self>) -> Arc<Self> {
        Self::trig(TrigKind::Acos, x)
    }

    /// `atan(x)`.
    #[must_use]
    pub fn atan(x: Arc<Self>) -> Arc<Self> {
        Self::trig(TrigKind::Atan, x)
    }

    /// `atan2(y, x)` (§6): the only two-operand trig function.
    #[must_use]
    pub fn atan2(y: Arc<Self>, x: Arc<Self>) -> Arc<Self> {
        if x.is_undefined() || y.is_undefined() {
            return Self::undefined();
        }
        if let (ExprKind::Numeric(ny), ExprKind::Numeric(nx)) = (&y.kind, &x.kind)
            && (ny.is_double() || nx.is_double())
        {
            return Self::numeric(Number::from_f64(ny.to_f64_lossy().atan2(nx.to_f64_lossy())));
        }
        Arc::new(Self::new(ExprKind::Function(FunctionKind::Trigonometric(TrigKind::Atan2), vec![y, x])))
    }

    /// `sum(list)` (§6, §4.3): the canonicalizing sum constructor.
    #[must_use]
    pub fn sum(operands: Vec<Arc<Self>>) -> Arc<Self> {
        let mut flat = Vec::with_capacity(operands.len());
        flatten_sum(operands, &mut flat);

        if flat.iter().any(|o| o.is_undefined()) {
            return Self::undefined();
        }

        let mut numeric_acc = Number::from_i64(0);
        let mut keys: Vec<Arc<Self>> = Vec::new();
        let mut coeffs: Vec<Number> = Vec::new();

        for operand in flat {
            if let ExprKind::Numeric(n) = &operand.kind {
                numeric_acc = numeric_acc.add(n).unwrap_or_else(|_| numeric_acc.clone());
                continue;
            }
            let key = operand.non_numeric_term();
            let coeff = match &operand.numeric_term().kind {
                ExprKind::Numeric(n) => n.clone(),
                _ => Number::from_i64(1),
            };
            if let Some(idx) = keys.iter().position(|k| k.as_ref() == &key) {
                coeffs[idx] = coeffs[idx].add(&coeff).unwrap_or_else(|_| coeffs[idx].clone());
            } else {
                keys.push(Arc::new(key));
                coeffs.push(coeff);
            }
        }

        contract_sin2_cos2(&mut keys, &mut coeffs, &mut numeric_acc);

        let mut terms: Vec<Arc<Self>> = keys
            .into_iter()
            .zip(coeffs)
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(key, coeff)| if coeff.is_one() { key } else { Self::product(vec![Self::numeric(coeff), key]) })
            .collect();
        terms.sort_by(|a, b| expr_cmp(a, b));

        if !numeric_acc.is_zero() {
            terms.insert(0, Self::numeric(numeric_acc));
        }

        match terms.len() {
            0 => Self::integer(0),
            1 => terms.into_iter().next().expect("len checked to be 1"),
            _ => Arc::new(Self::new(ExprKind::Sum(terms))),
        }
    }

    /// `product(list)` (§6, §4.5): the canonicalizing product constructor.
    #[must_use]
    pub fn product(operands: Vec<Arc<Self>>) -> Arc<Self> {
        let mut flat = Vec::with_capacity(operands.len());
        flatten_product(operands, &mut flat);

        if flat.iter().any(|o| o.is_undefined()) {
            return Self::undefined();
        }
        if flat.iter().any(|o| o.is_zero()) {
            return Self::integer(0);
        }

        let mut numeric_coeff = Number::from_i64(1);
        let mut bases: Vec<Arc<Self>> = Vec::new();
        let mut exponents: Vec<Vec<Arc<Self>>> = Vec::new();

        'operands: for operand in flat {
            if let ExprKind::Numeric(n) = &operand.kind {
                numeric_coeff = numeric_coeff.mul(n).unwrap_or_else(|_| numeric_coeff.clone());
                continue;
            }
            let (base, exp) = match &operand.kind {
                ExprKind::Power(b, e) => (b.clone(), e.clone()),
                _ => (operand.clone(), ONE.clone()),
            };
            for (idx, existing) in bases.iter().enumerate() {
                if existing.as_ref() == base.as_ref() {
                    exponents[idx].push(exp);
                    continue 'operands;
                }
            }
            bases.push(base);
            exponents.push(vec![exp]);
        }

        let mut factors: Vec<Arc<Self>> = Vec::with_capacity(bases.len());
        for (base, exp_list) in bases.into_iter().zip(exponents) {
            let factor = if exp_list.len() == 1 {
                let e = exp_list.into_iter().next().expect("len checked to be 1");
                if e.is_one() { base } else { Arc::new(Self::new(ExprKind::Power(base, e))) }
            } else {
                let combined_exp = Self::sum(exp_list);
                Self::power(base, combined_exp)
            };
            match &factor.kind {
                ExprKind::Numeric(n) => numeric_coeff = numeric_coeff.mul(n).unwrap_or_else(|_| numeric_coeff.clone()),
                _ => factors.push(factor),
            }
        }
        factors.sort_by(|a, b| expr_cmp(a, b));

        if numeric_coeff.is_zero() {
            return Self::integer(0);
        }
        if !numeric_coeff.is_one() {
            factors.insert(0, Self::numeric(numeric_coeff));
        }

        match factors.len() {
            0 => Self::integer(1),
            1 => factors.into_iter().next().expect("len checked to be 1"),
            _ => Arc::new(Self::new(ExprKind::Product(factors))),
        }
    }

    /// `power(b, e)` (§6, §4.7): the symbolic power simplifier.
    #[must_use]
    pub fn power(base: Arc<Self>, exp: Arc<Self>) -> Arc<Self> {
        if base.is_undefined() || exp.is_undefined() {
            return Self::undefined();
        }
        if exp.is_zero() {
            return Self::integer(1);
        }
        if exp.is_one() {
            return base;
        }
        if base.is_one() {
            return Self::integer(1);
        }
        if base.is_zero() {
            if exp.is_negative() {
                tracing::debug!("power: 0 raised to a negative exponent, returning undefined");
                return Self::undefined();
            }
            if exp.is_positive() {
                return Self::integer(0);
            }
            return Arc::new(Self::new(ExprKind::Power(base, exp)));
        }

        if let (ExprKind::Numeric(b), ExprKind::Numeric(e)) = (&base.kind, &exp.kind) {
            return numeric_power(b, e);
        }

        if let ExprKind::Power(inner_base, inner_exp) = &base.kind
            && collapse_allowed(inner_base, inner_exp, &exp)
        {
            let combined_exp = Self::product(vec![inner_exp.clone(), exp.clone()]);
            return Self::power(inner_base.clone(), combined_exp);
        }

        if let ExprKind::Product(factors) = &base.kind
            && matches!(&exp.kind, ExprKind::Numeric(n) if is_integer_valued(n))
        {
            let distributed: Vec<Arc<Self>> = factors.iter().map(|f| Self::power(f.clone(), exp.clone())).collect();
            return Self::product(distributed);
        }

        if base.is_constant(ConstantKind::Euler)
            && exp.is_function(FunctionKind::Logarithm)
            && let Some(args) = exp.operands()
        {
            return args[0].clone();
        }

        Arc::new(Self::new(ExprKind::Power(base, exp)))
    }
}

/// Flattens nested `Sum`s and drops zero summands (§3 invariants 1, 2).
fn flatten_sum(operands: Vec<Arc<Expr>>, out: &mut Vec<Arc<Expr>>) {
    for op in operands {
        match &op.kind {
            ExprKind::Sum(inner) => flatten_sum(inner.clone(), out),
            _ if op.is_zero() => {}
            _ => out.push(op),
        }
    }
}

/// Flattens nested `Product`s and drops unit factors (§3 invariants 1, 2).
fn flatten_product(operands: Vec<Arc<Expr>>, out: &mut Vec<Arc<Expr>>) {
    for op in operands {
        match &op.kind {
            ExprKind::Product(inner) => flatten_product(inner.clone(), out),
            _ if op.is_one() => {}
            _ => out.push(op),
        }
    }
}

/// Matches `trig(arg)^2` for `trig ∈ {sin, cos}`, returning `(kind, arg)`.
fn trig_squared(expr: &Expr) -> Option<(TrigKind, Arc<Expr>)> {
    let ExprKind::Power(base, exp) = &expr.kind else { return None };
    if !matches!(&exp.kind, ExprKind::Numeric(n) if *n == Number::from_i64(2)) {
        return None;
    }
    let ExprKind::Function(FunctionKind::Trigonometric(kind @ (TrigKind::Sin | TrigKind::Cos)), args) = &base.kind
    else {
        return None;
    };
    (args.len() == 1).then(|| (*kind, args[0].clone()))
}

/// §3 invariant 6 / §4.3: `k*sin(x)^2 + k*cos(x)^2 -> k` for matching
/// arguments and equal coefficients.
fn contract_sin2_cos2(keys: &mut Vec<Arc<Expr>>, coeffs: &mut Vec<Number>, numeric_acc: &mut Number) {
    let mut i = 0;
    while i < keys.len() {
        let Some((kind_i, arg_i)) = trig_squared(&keys[i]) else {
            i += 1;
            continue;
        };
        let mut matched_at = None;
        for j in (i + 1)..keys.len() {
            if let Some((kind_j, arg_j)) = trig_squared(&keys[j])
                && kind_i != kind_j
                && arg_i == arg_j
                && coeffs[i] == coeffs[j]
            {
                matched_at = Some(j);
                break;
            }
        }
        if let Some(j) = matched_at {
            *numeric_acc = numeric_acc.add(&coeffs[i]).unwrap_or_else(|_| numeric_acc.clone());
            keys.remove(j);
            coeffs.remove(j);
            keys.remove(i);
            coeffs.remove(i);
        } else {
            i += 1;
        }
    }
}

/// §4.6: canonicalizes `base^exp` for numeric operands, factoring partial
/// radicals (`sqrt(8) -> 2*sqrt(2)`) rather than failing outright.
fn numeric_power(base: &Number, exp: &Number) -> Arc<Expr> {
    match (base, exp) {
        (Number::Rational(b), Number::Rational(e)) => match factor_rational_power(b, e) {
            Ok(PowerOutcome::Exact(n)) => Expr::numeric(n),
            Ok(PowerOutcome::Partial { coefficient, radicand, root_degree }) => {
                let radical_base = Expr::numeric(Number::Rational(radicand));
                let radical_exp = Expr::numeric(Number::Rational(num_rational::BigRational::new(
                    num_bigint::BigInt::from(1),
                    num_bigint::BigInt::from(root_degree),
                )));
                // Constructed directly (not via `Expr::power`): the radical is
                // already square-free by construction, so re-simplifying it
                // would recurse into this same `Partial` outcome forever.
                let radical = Arc::new(Expr::new(ExprKind::Power(radical_base, radical_exp)));
                Expr::product(vec![Expr::numeric(coefficient), radical])
            }
            Ok(PowerOutcome::Undefined) => {
                tracing::debug!("numeric_power: even-denominator root of a negative base, returning undefined");
                Expr::undefined()
            }
            Err(err) => {
                tracing::debug!(%err, "numeric_power: rational power could not be resolved, returning undefined");
                Expr::undefined()
            }
        },
        _ => {
            let b = base.to_f64_lossy();
            let e = exp.to_f64_lossy();
            if b < 0.0 && e.fract() != 0.0 {
                tracing::debug!("numeric_power: fractional power of a negative double, returning undefined");
                return Expr::undefined();
            }
            Expr::numeric(Number::from_f64(b.powf(e)))
        }
    }
}

/// True iff `n` is an integer-valued rational (used for the `exp` check in
/// the `Power(Product, integer) -> Product(Power, ...)` distribution rule).
fn is_integer_valued(n: &Number) -> bool {
    match n {
        Number::Rational(r) => num_integer::Integer::is_multiple_of(r.numer(), r.denom()),
        Number::Double(d) => d.fract() == 0.0,
    }
}

/// True iff `n` is an odd integer (only meaningful once `is_integer_valued`
/// has already confirmed `n` is integer-valued).
fn is_odd_integer(n: &Number) -> bool {
    match n {
        Number::Rational(r) => (r.numer() % num_bigint::BigInt::from(2)) != num_bigint::BigInt::from(0),
        Number::Double(d) => (*d as i64) % 2 != 0,
    }
}

/// §4.7's `(b^e1)^e2 -> b^(e1*e2)` collapse guard (tsym's
/// `doContractExpFirst`/`areTwoIntegerExp`): gated on the *inner* exponent
/// `e1`, not on the product `e1*e2` and not on `b`'s sign alone.
///
/// - `e1` itself a non-integer root (e.g. `e1=1/3`): never collapses, even
///   for a positive `b` — `(a^(1/3))^3` stays symbolic for every `a`,
///   because `b^e1` is only ever considered defined for `b >= 0` and no
///   later integer exponent can recover the lost domain information.
/// - `e1`, `e2` both integers: always safe — pure integer-exponent algebra
///   agrees for every real `b` regardless of sign.
/// - `e1` an odd integer, `e2` a non-integer rational whose product with
///   `e1` is *not* itself an integer: safe unconditionally (§4.7(b)) — the
///   odd exponent preserves `b`'s sign, so `b^e1` and `b^(e1*e2)` impose the
///   exact same domain restriction (`b >= 0`) with no information lost.
/// - Everything else (an even `e1`, or an odd `e1` whose product with `e2`
///   degenerates back to an integer, e.g. `e1=3, e2=1/3`) needs `b` known
///   non-negative to be sound.
fn collapse_allowed(base: &Expr, e1: &Expr, e2: &Expr) -> bool {
    let (ExprKind::Numeric(n1), ExprKind::Numeric(n2)) = (&e1.kind, &e2.kind) else { return false };
    if !is_integer_valued(n1) {
        return false;
    }
    if is_integer_valued(n2) {
        return true;
    }
    if is_odd_integer(n1)
        && let Ok(product) = n1.mul(n2)
        && !is_integer_valued(&product)
    {
        return true;
    }
    base.is_positive()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;

    #[test]
    fn sum_collects_like_terms() {
        let x = Expr::symbol("ctor_test_x", false);
        let sum = Expr::sum(vec![x.clone(), x.clone()]);
        let expected = Expr::product(vec![Expr::integer(2), x]);
        assert_eq!(sum, expected);
    }

    #[test]
    fn sqrt_eight_factors_to_two_root_two() {
        let eight = Expr::numeric(Number::from_i64(8));
        let half = Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 2.into())));
        let result = Expr::power(eight, half);
        let two = Expr::integer(2);
        let root_two = Arc::new(Expr::new(ExprKind::Power(
            Expr::integer(2),
            Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 2.into()))),
        )));
        let expected = Expr::product(vec![two, root_two]);
        assert_eq!(result, expected);
    }

    #[test]
    fn sqrt_four_is_exact() {
        let four = Expr::numeric(Number::from_i64(4));
        let half = Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 2.into())));
        assert_eq!(Expr::power(four, half), Expr::integer(2));
    }

    #[test]
    fn division_by_zero_numeric_power_is_undefined() {
        let zero = Expr::integer(0);
        let neg_one = Expr::integer(-1);
        assert!(Expr::power(zero, neg_one).is_undefined());
    }

    #[test]
    fn sin_squared_plus_cos_squared_contracts_to_one() {
        let x = Expr::symbol("ctor_test_trig_x", false);
        let s2 = Expr::power(Expr::sin(x.clone()), Expr::integer(2));
        let c2 = Expr::power(Expr::cos(x), Expr::integer(2));
        assert_eq!(Expr::sum(vec![s2, c2]), Expr::integer(1));
    }

    #[test]
    fn undefined_absorbs_through_sum_and_product() {
        let u = Expr::undefined();
        assert!(Expr::sum(vec![Expr::integer(1), u.clone()]).is_undefined());
        assert!(Expr::product(vec![Expr::integer(1), u]).is_undefined());
    }

    #[test]
    fn product_merges_powers_of_same_base() {
        let x = Expr::symbol("ctor_test_merge_x", false);
        let a = Expr::power(x.clone(), Expr::integer(2));
        let b = Expr::power(x.clone(), Expr::integer(3));
        assert_eq!(Expr::product(vec![a, b]), Expr::power(x, Expr::integer(5)));
    }

    #[test]
    fn cube_root_cubed_stays_symbolic_even_for_a_positive_base() {
        let a = Expr::symbol("ctor_test_collapse_a", true);
        let third = Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 3.into())));
        let inner = Expr::power(a, third);
        let result = Expr::power(inner.clone(), Expr::integer(3));
        assert_eq!(result, Arc::new(Expr::new(ExprKind::Power(inner, Expr::integer(3)))));
    }

    #[test]
    fn cube_then_cube_root_collapses_for_a_positive_base() {
        let a = Expr::symbol("ctor_test_collapse_b", true);
        let cubed = Expr::power(a.clone(), Expr::integer(3));
        let third = Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 3.into())));
        assert_eq!(Expr::power(cubed, third), a);
    }

    #[test]
    fn cube_then_cube_root_stays_symbolic_for_an_unflagged_base() {
        let x = Expr::symbol("ctor_test_collapse_x", false);
        let cubed = Expr::power(x, Expr::integer(3));
        let third = Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 3.into())));
        let result = Expr::power(cubed.clone(), third.clone());
        assert_eq!(result, Arc::new(Expr::new(ExprKind::Power(cubed, third))));
    }

    #[test]
    fn square_then_square_root_stays_symbolic_for_an_unflagged_base() {
        let x = Expr::symbol("ctor_test_collapse_sqrt_x", false);
        let squared = Expr::power(x, Expr::integer(2));
        let half = Expr::numeric(Number::Rational(num_rational::BigRational::new(1.into(), 2.into())));
        let result = Expr::power(squared.clone(), half.clone());
        assert_eq!(result, Arc::new(Expr::new(ExprKind::Power(squared, half))));
    }
}
