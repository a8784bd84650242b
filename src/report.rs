//! Test outcome and the diagnostic message log.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Append-only log of diagnostic messages produced during a test.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    entries: Vec<String>,
}

impl MessageLog {
    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    pub(crate) fn extend<'a>(&mut self, messages: impl IntoIterator<Item = &'a String>) {
        self.entries.extend(messages.into_iter().cloned());
    }

    /// Messages in the order they were logged.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of logged messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|m| m.contains(needle))
    }
}

impl fmt::Display for MessageLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Outcome of a test run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// The null hypothesis survived: the sampler is consistent with the density.
    Accepted,
    /// The p-value fell below the corrected significance level (or was not finite).
    Rejected,
    /// A tabulation or evaluation check failed; the statistic was not trusted.
    Failed,
}

/// Result of evaluating a chi-square test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Pearson's chi-square statistic over the effective cells.
    pub chi2_statistic: f64,
    /// Effective cells minus one.
    pub degrees_of_freedom: usize,
    /// Probability of a statistic at least this extreme under the null hypothesis.
    pub p_value: f64,
    /// Raw cells merged into pooled cells.
    pub pooled_cells_in: usize,
    /// Pooled cells emitted.
    pub pooled_cells_out: usize,
    /// Significance level after the Šidák correction.
    pub significance_level: f64,
    /// Whether any check flagged a failure.
    pub failed: bool,
    /// Final decision.
    pub decision: Decision,
    /// Snapshot of the message log at decision time.
    pub messages: Vec<String>,
}

impl TestResult {
    /// Whether the null hypothesis was accepted.
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.decision == Decision::Accepted
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.decision {
            Decision::Accepted => "accepted",
            Decision::Rejected => "rejected",
            Decision::Failed => "failed",
        };
        write!(
            f,
            "chi^2 = {:.4} (d.o.f. = {}), p-value = {:.6}, significance level = {:.6}: {verdict}",
            self.chi2_statistic, self.degrees_of_freedom, self.p_value, self.significance_level,
        )
    }
}
