use chi2test::dump::{DUMP_DATA_FILE, DUMP_VIEWER_FILE};
use chi2test::prelude::*;
use nalgebra::Vector3;

use crate::{cosine_hemisphere_pdf, small_config, uniform_sphere};

fn skewed_line(config: ChiSquareConfig) -> ChiSquareTest<LineDomain> {
    // Uniform samples judged against a linear density.
    ChiSquareTest::with_config(
        LineDomain::default(),
        SampleFn::unweighted(|u: &[f64]| 2.0 * u[0] - 1.0),
        |x: &f64| (x + 1.0) / 2.0,
        config.sample_dim(1),
    )
    .unwrap()
}

#[test]
fn wrong_density_is_rejected() {
    let mut test = skewed_line(small_config());

    assert!(!test.run(0.01, 1).unwrap());
    let result = test.result().unwrap();
    assert_eq!(result.decision, Decision::Rejected);
    assert!(!result.failed);
    assert!(result.p_value < 1e-10, "p = {}", result.p_value);
    assert!(test.messages().contains("***** Rejected *****"));

    let dump = test.dump().unwrap();
    assert_eq!(dump.pdf.len(), 1);
    assert_eq!(dump.histogram[0].len(), 21);
}

#[test]
fn samples_where_density_vanishes_fail() {
    // Full sphere samples judged against a hemisphere density.
    let mut test = ChiSquareTest::with_config(
        SphericalDomain,
        SampleFn::unweighted(uniform_sphere),
        cosine_hemisphere_pdf,
        small_config(),
    )
    .unwrap();

    assert!(!test.run(0.01, 1).unwrap());
    assert_eq!(test.result().unwrap().decision, Decision::Failed);
    assert!(test.messages().contains("expected frequency 0"));
    assert!(test.dump().is_some());
}

#[test]
fn sidak_correction_is_reported() {
    let mut test = skewed_line(small_config());
    test.run(0.01, 5).unwrap();

    let expected = chi2test::chi2::sidak_correction(0.01, 5);
    let result = test.result().unwrap();
    assert!((result.significance_level - expected).abs() < 1e-15);
    assert!(result.significance_level < 0.01);
}

#[test]
fn rejection_writes_dump_files() {
    let dir = std::env::temp_dir().join("chi2test_rejection_dump");
    std::fs::remove_dir_all(&dir).ok();

    let mut test = skewed_line(small_config().dump_dir(&dir));
    assert!(!test.run(0.01, 1).unwrap());

    let json = std::fs::read_to_string(dir.join(DUMP_DATA_FILE)).unwrap();
    let reloaded = DiagnosticDump::from_json(&json).unwrap();
    let dump = test.dump().unwrap();
    assert_eq!(reloaded.histogram, dump.histogram);
    for (a, b) in reloaded.pdf.iter().flatten().zip(dump.pdf.iter().flatten()) {
        assert!((a - b).abs() <= 1e-9 * b.abs());
    }

    let html = std::fs::read_to_string(dir.join(DUMP_VIEWER_FILE)).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Plotly.newPlot"));
    assert!(test.messages().contains(DUMP_DATA_FILE));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn acceptance_writes_nothing() {
    let dir = std::env::temp_dir().join("chi2test_acceptance_no_dump");
    std::fs::remove_dir_all(&dir).ok();

    let mut test = ChiSquareTest::with_config(
        SphericalDomain,
        SampleFn::unweighted(uniform_sphere),
        |_: &Vector3<f64>| 1.0 / (4.0 * core::f64::consts::PI),
        small_config().dump_dir(&dir),
    )
    .unwrap();

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
    assert!(!dir.exists());
}
