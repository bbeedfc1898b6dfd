use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tinyre::{Pattern, Regex};

/// `a?ⁿaⁿ` against `aⁿ` — the classic backtracking killer. The capture
/// group forces the breadth-first simulation, which stays polynomial.
fn pathological(c: &mut Criterion) {
    const N: usize = 40;
    let pattern = format!("({}{})", "a?".repeat(N), "a".repeat(N));
    let input = "a".repeat(N);
    let regex = Regex::new(&pattern).unwrap();
    assert!(regex.find(&input).is_some());

    c.bench_function("pathological_optional_run", |b| {
        b.iter(|| regex.find(black_box(&input)).is_some());
    });
}

fn scan(c: &mut Criterion) {
    let pattern = r"[a-z]+@[a-z]+\.[a-z]{2,3}";
    let text = "write to first@example.com, or maybe second@example.org instead "
        .repeat(32);

    let regex = Regex::new(pattern).unwrap();
    assert_eq!(regex.finditer(&text).count(), 64);
    c.bench_function("scan_backtracking", |b| {
        b.iter(|| regex.finditer(black_box(&text)).count());
    });

    let dfa = regex.to_dfa().unwrap();
    assert_eq!(dfa.finditer(&text).count(), 64);
    c.bench_function("scan_dfa", |b| {
        b.iter(|| dfa.finditer(black_box(&text)).count());
    });

    let minimized = regex.to_dfa().unwrap().minimize();
    c.bench_function("scan_dfa_minimized", |b| {
        b.iter(|| minimized.finditer(black_box(&text)).count());
    });
}

criterion_group!(benches, pathological, scan);
criterion_main!(benches);
