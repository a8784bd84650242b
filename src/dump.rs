//! Diagnostic export of the final density table and histogram.
//!
//! A rejected test keeps a [`DiagnosticDump`] of both tables in `[y][x]`
//! row form. It can be written as re-loadable JSON and as a self-contained
//! HTML page with three [Plotly.js](https://plotly.com/javascript/) heatmaps:
//!
//! | Panel | Content |
//! |---|---|
//! | **PDF** | Expected counts |
//! | **Histogram** | Observed counts |
//! | **Difference** | Histogram minus PDF, symmetric colour range |
//!
//! The HTML page fetches `Plotly.js` from a CDN on first load.

use core::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::density::DensityTable;
use crate::error::Result;
use crate::histogram::Histogram;

/// File name of the JSON data written to a dump directory.
pub const DUMP_DATA_FILE: &str = "chi2_data.json";

/// File name of the HTML viewer written to a dump directory.
pub const DUMP_VIEWER_FILE: &str = "chi2_data.html";

/// Density table and histogram of a test, as `[y][x]` rows.
///
/// In JSON, finite cells are plain numbers. NaN and infinities are written as
/// the strings `"NaN"`, `"inf"` and `"-inf"` so a dump of a failed test
/// reloads unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticDump {
    /// Expected counts.
    #[serde(with = "cells")]
    pub pdf: Vec<Vec<f64>>,
    /// Observed counts.
    #[serde(with = "cells")]
    pub histogram: Vec<Vec<f64>>,
}

impl DiagnosticDump {
    /// Snapshot both tables.
    #[must_use]
    pub fn new(density: &DensityTable, histogram: &Histogram) -> Self {
        Self {
            pdf: density.rows(),
            histogram: histogram.rows(),
        }
    }

    /// Cell-wise `histogram - pdf`.
    #[must_use]
    pub fn difference(&self) -> Vec<Vec<f64>> {
        self.histogram
            .iter()
            .zip(&self.pdf)
            .map(|(h_row, p_row)| h_row.iter().zip(p_row).map(|(h, p)| h - p).collect())
            .collect()
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a dump previously produced by [`to_json`](Self::to_json).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if `json` is not a valid dump.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the JSON data file to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    /// Write the HTML viewer to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the page cannot be built or written.
    pub fn write_html(&self, path: impl AsRef<Path>) -> Result<()> {
        let html = self.to_html()?;
        std::fs::write(path, html)?;
        Ok(())
    }

    /// Write both [`DUMP_DATA_FILE`] and [`DUMP_VIEWER_FILE`] into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if either file cannot be written.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        self.write_json(dir.join(DUMP_DATA_FILE))?;
        self.write_html(dir.join(DUMP_VIEWER_FILE))
    }

    /// Render the HTML viewer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the tables cannot be serialized.
    pub fn to_html(&self) -> Result<String> {
        let diff = self.difference();
        let abs_max = diff
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |m, v| if v.abs() > m { v.abs() } else { m });

        let pdf = serde_json::to_string(&self.pdf)?;
        let histogram = serde_json::to_string(&self.histogram)?;
        let diff = serde_json::to_string(&diff)?;

        let mut html = String::with_capacity(pdf.len() + histogram.len() + diff.len() + 4096);
        html.push_str(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Chi-square test diagnostics</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<style>
  body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
         background: #f5f6fa; color: #2c3e50; padding: 24px; }
  .row { display: flex; gap: 16px; }
  .chart { flex: 1; background: #fff; border-radius: 8px; padding: 8px;
           box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
</style>
</head>
<body>
<div class="row">
<div class="chart" id="pdf"></div>
<div class="chart" id="histogram"></div>
<div class="chart" id="difference"></div>
</div>
<script>
"#,
        );
        let _ = writeln!(html, "const pdf = {pdf};");
        let _ = writeln!(html, "const histogram = {histogram};");
        let _ = writeln!(html, "const diff = {diff};");
        let _ = writeln!(html, "const absdiff = {abs_max};");
        html.push_str(
            r#"function panel(id, title, z, extra) {
  const trace = Object.assign({ z: z, type: "heatmap", colorscale: "Viridis" }, extra);
  Plotly.newPlot(id, [trace], {
    title: title,
    yaxis: { autorange: "reversed", scaleanchor: "x" },
    margin: { t: 40, l: 40, r: 10, b: 30 }
  });
}
panel("pdf", "PDF", pdf, {});
panel("histogram", "Histogram", histogram, {});
panel("difference", "Difference", diff,
      { colorscale: "RdBu", reversescale: true, zmin: -absdiff, zmax: absdiff });
</script>
</body>
</html>
"#,
        );
        Ok(html)
    }
}

/// Serde adapter for `[y][x]` tables that may contain non-finite cells.
mod cells {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Special(String),
    }

    impl From<f64> for Cell {
        fn from(v: f64) -> Self {
            if v.is_finite() {
                Self::Number(v)
            } else if v.is_nan() {
                Self::Special("NaN".to_owned())
            } else if v > 0.0 {
                Self::Special("inf".to_owned())
            } else {
                Self::Special("-inf".to_owned())
            }
        }
    }

    pub(super) fn serialize<S: Serializer>(
        rows: &[Vec<f64>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| row.iter().copied().map(Cell::from).collect())
            .collect();
        rows.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<f64>>, D::Error> {
        Vec::<Vec<Cell>>::deserialize(deserializer)?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        Cell::Number(v) => Ok(v),
                        Cell::Special(s) => match s.as_str() {
                            "NaN" => Ok(f64::NAN),
                            "inf" => Ok(f64::INFINITY),
                            "-inf" => Ok(f64::NEG_INFINITY),
                            other => {
                                Err(D::Error::custom(format!("invalid cell value {other:?}")))
                            }
                        },
                    })
                    .collect()
            })
            .collect()
    }
}
