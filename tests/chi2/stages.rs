use chi2test::prelude::*;
use nalgebra::Point2;

use crate::{small_config, uniform_square};

fn square_test() -> ChiSquareTest<PlanarDomain> {
    ChiSquareTest::with_config(
        PlanarDomain::default(),
        SampleFn::unweighted(uniform_square),
        |_: &Point2<f64>| 0.25,
        small_config().seed(21),
    )
    .unwrap()
}

#[test]
fn stage_by_stage_matches_run() {
    let mut staged = square_test();
    let histogram_total = staged.tabulate_histogram().total();
    let pdf_total = staged.tabulate_pdf().total();
    assert!((histogram_total - 100_000.0).abs() < 1e-6);
    assert!((pdf_total - 100_000.0).abs() < 1e-6);

    let stat = staged.evaluate();
    let p = staged.p_value().unwrap();
    assert_eq!(staged.stage(), Stage::Evaluated);
    assert!(staged.messages().contains("Chi^2 statistic"));

    let mut direct = square_test();
    direct.run(0.01, 1).unwrap();
    let result = direct.result().unwrap();
    assert!((result.chi2_statistic - stat.statistic).abs() < 1e-9);
    assert!((result.p_value - p).abs() < 1e-12);
}

#[test]
fn same_seed_same_histogram() {
    let mut a = square_test();
    let mut b = square_test();
    assert_eq!(a.tabulate_histogram(), b.tabulate_histogram());
}

#[test]
fn different_seed_different_histogram() {
    let mut a = square_test();
    let mut b = ChiSquareTest::with_config(
        PlanarDomain::default(),
        SampleFn::unweighted(uniform_square),
        |_: &Point2<f64>| 0.25,
        small_config().seed(22),
    )
    .unwrap();
    assert_ne!(a.tabulate_histogram(), b.tabulate_histogram());
}

#[test]
fn result_summary_is_printable() {
    let mut test = square_test();
    test.run(0.01, 1).unwrap();
    let summary = test.result().unwrap().to_string();
    assert!(summary.starts_with("chi^2 = "));
    assert!(summary.contains("p-value"));
}
