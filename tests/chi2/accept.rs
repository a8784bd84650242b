use core::f64::consts::PI;

use chi2test::density::DensityTable;
use chi2test::Grid;
use chi2test::histogram::Histogram;
use chi2test::prelude::*;
use nalgebra::{Point2, Vector3};

use crate::{
    cosine_hemisphere, cosine_hemisphere_pdf, small_config, uniform_sphere, uniform_square,
};

#[test]
fn uniform_square_is_accepted() {
    let mut test = ChiSquareTest::with_config(
        PlanarDomain::default(),
        SampleFn::unweighted(uniform_square),
        |_: &Point2<f64>| 0.25,
        small_config(),
    )
    .unwrap();

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
    let result = test.result().unwrap();
    assert_eq!(result.decision, Decision::Accepted);
    assert_eq!(result.degrees_of_freedom, 21 * 21 - 1);
    assert!(test.messages().contains("Accepted the null hypothesis"));
    assert!(test.dump().is_none());
}

#[test]
fn linear_density_on_line_is_accepted() {
    let mut test = ChiSquareTest::with_config(
        LineDomain::default(),
        SampleFn::unweighted(|u: &[f64]| 2.0 * u[0].sqrt() - 1.0),
        |x: &f64| (x + 1.0) / 2.0,
        small_config().sample_dim(1).seed(3),
    )
    .unwrap();

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
    assert_eq!(test.grid().ny(), 1);
}

#[test]
fn uniform_sphere_is_accepted() {
    let mut test = ChiSquareTest::with_config(
        SphericalDomain,
        SampleFn::unweighted(uniform_sphere),
        |_: &Vector3<f64>| 1.0 / (4.0 * PI),
        small_config(),
    )
    .unwrap();

    assert_eq!((test.grid().nx(), test.grid().ny()), (21, 42));
    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
}

#[test]
fn cosine_hemisphere_is_accepted() {
    let mut test = ChiSquareTest::with_config(
        SphericalDomain,
        SampleFn::unweighted(cosine_hemisphere),
        cosine_hemisphere_pdf,
        small_config().seed(11),
    )
    .unwrap();

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
    // The lower hemisphere is empty in both tables and does not count.
    let dof = test.result().unwrap().degrees_of_freedom;
    assert!(dof < 21 * 21, "d.o.f. = {dof}");
}

#[test]
fn unit_weight_sampler_is_accepted() {
    let mut test = ChiSquareTest::with_config(
        PlanarDomain::default(),
        SampleFn::weighted(|u: &[f64]| (uniform_square(u), 1.0)),
        |_: &Point2<f64>| 0.25,
        small_config().seed(5),
    )
    .unwrap();

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
}

#[test]
fn identical_tables_give_zero_statistic() {
    let mut test = ChiSquareTest::new(LineDomain::default(), |u: &[f64]| u[0], |_: &f64| 0.5);
    let grid = Grid::from_aspect(101, 0.0);
    let table: Vec<f64> = (0..grid.len()).map(|i| 10.0 + i as f64).collect();

    test.set_histogram(Histogram::from_counts(grid, table.clone()).unwrap()).unwrap();
    test.set_pdf(DensityTable::from_expected(grid, table).unwrap()).unwrap();

    assert!(test.run(0.01, 1).unwrap());
    let result = test.result().unwrap();
    assert!(result.chi2_statistic.abs() < f64::EPSILON);
    assert_eq!(result.degrees_of_freedom, 100);
    assert!((result.p_value - 1.0).abs() < f64::EPSILON);
}

#[cfg(feature = "sobol")]
#[test]
fn sobol_input_is_accepted() {
    let mut test = ChiSquareTest::with_config(
        PlanarDomain::default(),
        SampleFn::unweighted(uniform_square),
        |_: &Point2<f64>| 0.25,
        small_config().uniform_source(UniformSource::Sobol),
    )
    .unwrap();

    assert!(test.run(0.01, 1).unwrap(), "{}", test.messages());
}
