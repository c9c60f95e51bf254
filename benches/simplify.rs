//! Core simplifier and polynomial-GCD benchmarks.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use exact_cas::Expr;

fn bench_sum_simplifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");
    let x = Expr::symbol("bench_x", false);

    group.bench_function("like_terms_2x+3x+x", |b| {
        b.iter(|| {
            Expr::sum(vec![
                Expr::product(vec![Expr::integer(2), black_box(x.clone())]),
                Expr::product(vec![Expr::integer(3), black_box(x.clone())]),
                black_box(x.clone()),
            ])
        });
    });

    group.bench_function("pythagorean_sin2+cos2", |b| {
        let sin2 = Expr::power(Expr::sin(x.clone()), Expr::integer(2));
        let cos2 = Expr::power(Expr::cos(x.clone()), Expr::integer(2));
        b.iter(|| Expr::sum(vec![black_box(sin2.clone()), black_box(cos2.clone())]));
    });

    group.finish();
}

fn bench_product_simplifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("product");
    let x = Expr::symbol("bench_product_x", false);

    group.bench_function("power_combine_x2*x3", |b| {
        let x2 = Expr::power(x.clone(), Expr::integer(2));
        let x3 = Expr::power(x.clone(), Expr::integer(3));
        b.iter(|| Expr::product(vec![black_box(x2.clone()), black_box(x3.clone())]));
    });

    group.bench_function("partial_radical_sqrt_eight", |b| {
        let eight = Expr::integer(8);
        let half = Expr::numeric(exact_cas::Number::Rational(num_rational::BigRational::new(1.into(), 2.into())));
        b.iter(|| Expr::power(black_box(eight.clone()), black_box(half.clone())));
    });

    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");
    let x = Expr::symbol("bench_expand_x", false);

    group.bench_function("cube_of_binomial", |b| {
        let binomial = Expr::sum(vec![x.clone(), Expr::integer(1)]);
        let cubed = Expr::power(binomial, Expr::integer(3));
        b.iter(|| black_box(&cubed).expand());
    });

    group.finish();
}

fn bench_gcd(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcd");
    let x = Expr::symbol("bench_gcd_x", false);

    let u = Expr::sum(vec![Expr::power(x.clone(), Expr::integer(2)), Expr::integer(-1)]);
    let v = Expr::sum(vec![
        Expr::power(x.clone(), Expr::integer(2)),
        Expr::product(vec![Expr::integer(-2), x.clone()]),
        Expr::integer(1),
    ]);

    group.bench_function("difference_of_squares_family", |b| {
        b.iter(|| exact_cas::gcd(black_box(&u), black_box(&v)));
    });

    group.finish();
}

criterion_group!(benches, bench_sum_simplifier, bench_product_simplifier, bench_expand, bench_gcd);
criterion_main!(benches);
