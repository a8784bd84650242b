use chi2test::density::DensityTable;
use chi2test::histogram::Histogram;
use chi2test::Grid;
use chi2test::prelude::*;
use nalgebra::Point2;

use crate::small_config;

#[test]
fn samples_outside_domain_fail() {
    let mut test = ChiSquareTest::with_config(
        LineDomain::default(),
        SampleFn::unweighted(|u: &[f64]| 3.0 * u[0] - 1.5),
        |x: &f64| if x.abs() <= 1.0 { 0.5 } else { 0.0 },
        small_config().sample_dim(1),
    )
    .unwrap();

    assert!(!test.run(0.01, 1).unwrap());
    assert!(test.failed());
    assert!(test.messages().contains("outside of the specified domain"));
    assert!(test.messages().contains("Not running the test"));
    assert_eq!(test.result().unwrap().decision, Decision::Failed);
}

#[test]
fn negative_density_fails() {
    let mut test = ChiSquareTest::with_config(
        LineDomain::default(),
        SampleFn::unweighted(|u: &[f64]| 2.0 * u[0] - 1.0),
        |x: &f64| x - 0.5,
        small_config().sample_dim(1),
    )
    .unwrap();

    assert!(!test.run(0.01, 1).unwrap());
    assert!(test.messages().contains("negative PDF value"));
}

#[test]
fn negative_sample_weights_fail() {
    let mut test = ChiSquareTest::with_config(
        LineDomain::default(),
        SampleFn::weighted(|u: &[f64]| {
            let x = 2.0 * u[0] - 1.0;
            (x, if x < -0.9 { -1.0 } else { 1.0 })
        }),
        |_: &f64| 0.5,
        small_config().sample_dim(1),
    )
    .unwrap();

    assert!(!test.run(0.01, 1).unwrap());
    assert!(test.messages().contains("negative sample weights"));
}

#[test]
fn too_few_degrees_of_freedom_fail() {
    let mut test = ChiSquareTest::new(LineDomain::default(), |u: &[f64]| u[0], |_: &f64| 0.5);
    let grid = Grid::from_aspect(101, 0.0);
    let table = vec![0.01; grid.len()];
    test.set_histogram(Histogram::from_counts(grid, table.clone()).unwrap()).unwrap();
    test.set_pdf(DensityTable::from_expected(grid, table).unwrap()).unwrap();

    assert!(!test.run(0.01, 1).unwrap());
    let result = test.result().unwrap();
    assert_eq!(result.degrees_of_freedom, 0);
    assert_eq!(result.decision, Decision::Failed);
    assert!(result.p_value.is_nan());
    assert!(test.messages().contains("degrees of freedom is too low"));
}

#[test]
fn invalid_configuration_is_an_error() {
    let build = |config: ChiSquareConfig| {
        ChiSquareTest::with_config(
            LineDomain::default(),
            SampleFn::unweighted(|u: &[f64]| u[0]),
            |_: &f64| 0.5,
            config,
        )
    };
    assert!(matches!(build(small_config().res(20)), Err(Error::EvenResolution(20))));
    assert!(matches!(build(small_config().sample_count(0)), Err(Error::InvalidSampleCount)));
    assert!(matches!(
        build(small_config().ires(1)),
        Err(Error::InvalidQuadratureResolution(1))
    ));
}

#[test]
fn mismatched_tables_are_rejected() {
    let pdf = |_: &Point2<f64>| 0.25;
    let mut test = ChiSquareTest::new(PlanarDomain::default(), crate::uniform_square, pdf);
    let grid = Grid::from_aspect(5, 1.0);
    let err = test
        .set_pdf(DensityTable::from_expected(grid, vec![1.0; 25]).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::GridMismatch { expected: 10201, got: 25 }));
    assert_eq!(test.stage(), Stage::Uninitialized);
}

#[test]
fn valid_tables_after_failed_run_are_accepted() {
    let mut test = ChiSquareTest::new(LineDomain::default(), |u: &[f64]| u[0], |_: &f64| 0.5);
    let grid = Grid::from_aspect(101, 0.0);

    let sparse = vec![0.01; grid.len()];
    test.set_histogram(Histogram::from_counts(grid, sparse.clone()).unwrap()).unwrap();
    test.set_pdf(DensityTable::from_expected(grid, sparse).unwrap()).unwrap();
    assert!(!test.run(0.01, 1).unwrap());
    assert!(test.failed());

    let table: Vec<f64> = (0..grid.len()).map(|i| 10.0 + i as f64).collect();
    test.set_histogram(Histogram::from_counts(grid, table.clone()).unwrap()).unwrap();
    test.set_pdf(DensityTable::from_expected(grid, table).unwrap()).unwrap();
    assert!(!test.failed());

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
    let result = test.result().unwrap();
    assert_eq!(result.decision, Decision::Accepted);
    assert!(!result.failed);
    assert_eq!(result.degrees_of_freedom, 100);
}

#[test]
fn dump_of_nan_density_reloads() {
    let dir = std::env::temp_dir().join("chi2test_nan_density_dump");
    std::fs::remove_dir_all(&dir).ok();

    let mut test = ChiSquareTest::with_config(
        LineDomain::default(),
        SampleFn::unweighted(|u: &[f64]| 2.0 * u[0] - 1.0),
        |x: &f64| if *x > 0.5 { f64::NAN } else { 0.5 },
        small_config().sample_dim(1).dump_dir(&dir),
    )
    .unwrap();

    assert!(!test.run(0.01, 1).unwrap());
    assert_eq!(test.result().unwrap().decision, Decision::Failed);

    let json = std::fs::read_to_string(dir.join(chi2test::dump::DUMP_DATA_FILE)).unwrap();
    let reloaded = DiagnosticDump::from_json(&json).unwrap();
    let dump = test.dump().unwrap();
    assert_eq!(reloaded.histogram, dump.histogram);
    assert!(reloaded.pdf[0][20].is_nan());
    assert!((reloaded.pdf[0][0] - dump.pdf[0][0]).abs() <= 1e-9 * dump.pdf[0][0]);

    std::fs::remove_dir_all(&dir).ok();
}
