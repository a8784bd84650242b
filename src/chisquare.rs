//! The chi-square test driver.

use crate::chi2::{self, ChiSquareStatistic};
use crate::config::ChiSquareConfig;
use crate::density::{self, DensityTable};
use crate::domain::Domain;
use crate::dump::{DUMP_DATA_FILE, DiagnosticDump};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::histogram::{self, Histogram};
use crate::report::{Decision, MessageLog, TestResult};
use crate::sampling::{DensityFn, SampleFn};

/// Progress of a [`ChiSquareTest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Histogram or density table still missing.
    Uninitialized,
    /// Both tables are available.
    Tabulated,
    /// The statistic and p-value have been computed.
    Evaluated,
    /// An accept/reject decision has been made.
    Decided,
}

/// Pearson's chi-square goodness-of-fit test of a sampling routine against
/// the density it claims to sample.
///
/// The test draws `sample_count` samples, bins them on a grid over the
/// domain's parameter rectangle, integrates the density over the same cells
/// and compares the two tables. Problems found on the way (samples outside
/// the domain, negative or excessive mass, observed samples where the
/// density is zero, too few degrees of freedom) are appended to
/// [`messages`](Self::messages) and force a rejection; they are never
/// returned as errors.
///
/// # Examples
///
/// ```
/// use chi2test::domain::LineDomain;
/// use chi2test::{ChiSquareConfig, ChiSquareTest, SampleFn};
///
/// // Sample x with density (x + 1) / 2 on [-1, 1] by inverting its CDF.
/// let sampler = SampleFn::unweighted(|u: &[f64]| 2.0 * u[0].sqrt() - 1.0);
/// let pdf = |x: &f64| (x + 1.0) / 2.0;
/// let config = ChiSquareConfig::default()
///     .sample_dim(1)
///     .sample_count(100_000)
///     .res(31);
///
/// let mut test = ChiSquareTest::with_config(LineDomain::default(), sampler, pdf, config)?;
/// assert!(test.run(0.01, 1)?, "{}", test.messages());
/// # Ok::<(), chi2test::Error>(())
/// ```
pub struct ChiSquareTest<D: Domain> {
    domain: D,
    sampler: SampleFn<D::Point>,
    pdf: DensityFn<D::Point>,
    config: ChiSquareConfig,
    grid: Grid,
    histogram: Option<Histogram>,
    density: Option<DensityTable>,
    statistic: Option<ChiSquareStatistic>,
    p_value: Option<f64>,
    result: Option<TestResult>,
    dump: Option<DiagnosticDump>,
    messages: MessageLog,
    histogram_failures: Vec<String>,
    density_failures: Vec<String>,
    evaluation_failures: Vec<String>,
}

impl<D: Domain> ChiSquareTest<D> {
    /// Create a test of an unweighted sampler with the default configuration.
    #[must_use]
    pub fn new(
        domain: D,
        sampler: impl Fn(&[f64]) -> D::Point + Send + Sync + 'static,
        pdf: impl Fn(&D::Point) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::from_parts(
            domain,
            SampleFn::unweighted(sampler),
            Box::new(pdf),
            ChiSquareConfig::default(),
        )
    }

    /// Create a test of a weighted sampler with the default configuration.
    #[must_use]
    pub fn new_weighted(
        domain: D,
        sampler: impl Fn(&[f64]) -> (D::Point, f64) + Send + Sync + 'static,
        pdf: impl Fn(&D::Point) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::from_parts(
            domain,
            SampleFn::weighted(sampler),
            Box::new(pdf),
            ChiSquareConfig::default(),
        )
    }

    /// Create a test with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error reported by
    /// [`ChiSquareConfig::validate`].
    pub fn with_config(
        domain: D,
        sampler: SampleFn<D::Point>,
        pdf: impl Fn(&D::Point) -> f64 + Send + Sync + 'static,
        config: ChiSquareConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(domain, sampler, Box::new(pdf), config))
    }

    fn from_parts(
        domain: D,
        sampler: SampleFn<D::Point>,
        pdf: DensityFn<D::Point>,
        config: ChiSquareConfig,
    ) -> Self {
        let grid = Grid::from_aspect(config.res, domain.aspect());
        Self {
            domain,
            sampler,
            pdf,
            config,
            grid,
            histogram: None,
            density: None,
            statistic: None,
            p_value: None,
            result: None,
            dump: None,
            messages: MessageLog::default(),
            histogram_failures: Vec::new(),
            density_failures: Vec::new(),
            evaluation_failures: Vec::new(),
        }
    }

    /// The domain adapter.
    #[must_use]
    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ChiSquareConfig {
        &self.config
    }

    /// The histogram grid.
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Current stage of the test.
    #[must_use]
    pub fn stage(&self) -> Stage {
        if self.result.is_some() {
            Stage::Decided
        } else if self.statistic.is_some() {
            Stage::Evaluated
        } else if self.histogram.is_some() && self.density.is_some() {
            Stage::Tabulated
        } else {
            Stage::Uninitialized
        }
    }

    /// The observed histogram, once tabulated.
    #[must_use]
    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.as_ref()
    }

    /// The expected-count table, once tabulated.
    #[must_use]
    pub fn pdf(&self) -> Option<&DensityTable> {
        self.density.as_ref()
    }

    /// The p-value, once evaluated.
    #[must_use]
    pub fn p_value(&self) -> Option<f64> {
        self.p_value
    }

    /// The pooled statistic, once evaluated.
    #[must_use]
    pub fn statistic(&self) -> Option<ChiSquareStatistic> {
        self.statistic
    }

    /// The result of the last [`run`](Self::run).
    #[must_use]
    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    /// Tables captured by the last rejecting [`run`](Self::run).
    #[must_use]
    pub fn dump(&self) -> Option<&DiagnosticDump> {
        self.dump.as_ref()
    }

    /// Diagnostic messages logged so far.
    #[must_use]
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Whether a check on the current tables or their evaluation failed.
    ///
    /// Replacing or re-tabulating a table drops the failures raised for the
    /// previous one, and every evaluation re-checks the degrees of freedom
    /// and zero-density cells.
    #[must_use]
    pub fn failed(&self) -> bool {
        !(self.histogram_failures.is_empty()
            && self.density_failures.is_empty()
            && self.evaluation_failures.is_empty())
    }

    /// Sample the routine under test and bin the results.
    pub fn tabulate_histogram(&mut self) -> &Histogram {
        let checked =
            histogram::tabulate_histogram(&self.domain, &self.sampler, self.grid, &self.config);
        self.messages.extend(&checked.failures);
        self.histogram_failures = checked.failures;
        self.invalidate_evaluation();
        self.histogram.insert(checked.value)
    }

    /// Integrate the density over every cell.
    pub fn tabulate_pdf(&mut self) -> &DensityTable {
        let checked = density::tabulate_density(
            &self.domain,
            &*self.pdf,
            self.grid,
            self.config.ires,
            self.config.sample_count,
        );
        self.messages.extend(&checked.failures);
        self.density_failures = checked.failures;
        self.invalidate_evaluation();
        self.density.insert(checked.value)
    }

    /// Replace the histogram with precomputed counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GridMismatch`] if the histogram is laid out on a
    /// different grid.
    pub fn set_histogram(&mut self, histogram: Histogram) -> Result<()> {
        self.check_grid(histogram.grid())?;
        self.histogram_failures.clear();
        self.invalidate_evaluation();
        self.histogram = Some(histogram);
        Ok(())
    }

    /// Replace the expected-count table with precomputed values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GridMismatch`] if the table is laid out on a
    /// different grid.
    pub fn set_pdf(&mut self, density: DensityTable) -> Result<()> {
        self.check_grid(density.grid())?;
        self.density_failures.clear();
        self.invalidate_evaluation();
        self.density = Some(density);
        Ok(())
    }

    /// Compute the pooled statistic and p-value, tabulating whatever is
    /// still missing.
    pub fn evaluate(&mut self) -> ChiSquareStatistic {
        if self.histogram.is_none() {
            self.tabulate_histogram();
        }
        if self.density.is_none() {
            self.tabulate_pdf();
        }

        let observed = self.histogram.as_ref().map_or(&[][..], Histogram::counts);
        let expected = self.density.as_ref().map_or(&[][..], DensityTable::expected);
        let (observed, expected) = chi2::sort_by_expected(observed, expected);
        let stat = chi2::pool_and_reduce(&observed, &expected, self.config.pooling_threshold);
        let unexplained = chi2::has_unexplained_mass(&observed, &expected);

        self.evaluation_failures.clear();
        if stat.degrees_of_freedom < 1 {
            self.flag("The number of degrees of freedom is too low!");
        }
        if unexplained {
            self.flag(
                "Found samples in a cell with expected frequency 0. \
                 Rejecting the null hypothesis!",
            );
        }
        if stat.pooled_in > 0 {
            self.messages.push(format!(
                "Pooled {} low-valued cells into {} cells to ensure sufficiently \
                 high expected cell frequencies",
                stat.pooled_in, stat.pooled_out
            ));
        }
        self.messages.push(format!(
            "Chi^2 statistic = {} (d.o.f = {})",
            stat.statistic, stat.degrees_of_freedom
        ));

        trace_debug!(
            statistic = stat.statistic,
            dof = stat.degrees_of_freedom,
            pooled_in = stat.pooled_in,
            pooled_out = stat.pooled_out,
            "chi-square statistic evaluated"
        );

        self.p_value = Some(chi2::p_value(stat.statistic, stat.degrees_of_freedom));
        self.result = None;
        *self.statistic.insert(stat)
    }

    /// Run the test at `significance_level`, treating it as one of
    /// `test_count` independent tests (Šidák correction).
    ///
    /// Returns `Ok(true)` if the null hypothesis is accepted. On rejection
    /// the tables are kept in [`dump`](Self::dump) and, when a dump
    /// directory is configured, written there.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSignificanceLevel`] unless `0 < significance_level < 1`.
    /// - [`Error::InvalidTestCount`] if `test_count` is zero.
    pub fn run(&mut self, significance_level: f64, test_count: usize) -> Result<bool> {
        if !(significance_level > 0.0 && significance_level < 1.0) {
            return Err(Error::InvalidSignificanceLevel(significance_level));
        }
        if test_count == 0 {
            return Err(Error::InvalidTestCount);
        }

        let stat = self.evaluate();
        let p_value = self.p_value.unwrap_or(f64::NAN);
        let alpha = chi2::sidak_correction(significance_level, test_count);

        let decision = if self.failed() {
            Decision::Failed
        } else if !p_value.is_finite() || p_value < alpha {
            Decision::Rejected
        } else {
            Decision::Accepted
        };

        match decision {
            Decision::Failed => {
                self.capture_dump();
                self.messages
                    .push("Not running the test for reasons listed above.");
            }
            Decision::Rejected => {
                self.capture_dump();
                self.messages.push(format!(
                    "***** Rejected ***** the null hypothesis (p-value = {p_value}, \
                     significance level = {alpha})"
                ));
            }
            Decision::Accepted => {
                self.messages.push(format!(
                    "Accepted the null hypothesis (p-value = {p_value}, \
                     significance level = {alpha})"
                ));
            }
        }

        trace_info!(
            p_value,
            significance_level = alpha,
            accepted = decision == Decision::Accepted,
            "chi-square test decided"
        );

        let result = self.result.insert(TestResult {
            chi2_statistic: stat.statistic,
            degrees_of_freedom: stat.degrees_of_freedom,
            p_value,
            pooled_cells_in: stat.pooled_in,
            pooled_cells_out: stat.pooled_out,
            significance_level: alpha,
            failed: self.failed(),
            decision,
            messages: self.messages.entries().to_vec(),
        });
        Ok(result.accepted())
    }

    fn capture_dump(&mut self) {
        let (Some(h), Some(d)) = (&self.histogram, &self.density) else {
            return;
        };
        let dump = DiagnosticDump::new(d, h);

        if let Some(dir) = &self.config.dump_dir {
            match dump.write_to_dir(dir) {
                Ok(()) => self.messages.push(format!(
                    "Target density and histogram were written to \"{}\"",
                    dir.join(DUMP_DATA_FILE).display()
                )),
                Err(err) => self
                    .messages
                    .push(format!("Could not write diagnostic dump: {err}")),
            }
        }
        self.dump = Some(dump);
    }

    fn check_grid(&self, grid: Grid) -> Result<()> {
        if grid == self.grid {
            Ok(())
        } else {
            Err(Error::GridMismatch {
                expected: self.grid.len(),
                got: grid.len(),
            })
        }
    }

    fn flag(&mut self, message: &str) {
        self.messages.push(message);
        self.evaluation_failures.push(message.to_owned());
    }

    fn invalidate_evaluation(&mut self) {
        self.evaluation_failures.clear();
        self.statistic = None;
        self.p_value = None;
        self.result = None;
    }
}

impl<D: Domain + core::fmt::Debug> core::fmt::Debug for ChiSquareTest<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChiSquareTest")
            .field("domain", &self.domain)
            .field("sampler", &self.sampler)
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("stage", &self.stage())
            .field("failed", &self.failed())
            .finish_non_exhaustive()
    }
}
