use tracing::debug;

use crate::error::ProviderError;

/// Square travel-cost matrix in meters. Row/column 0 is the depot and
/// 1..=N are customers in instance order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Validate a provider table.
    ///
    /// The table must be `expected x expected` with finite, non-negative
    /// entries. The diagonal is forced to zero since providers report small
    /// snapping offsets there.
    pub fn from_rows(mut rows: Vec<Vec<f64>>, expected: usize) -> Result<Self, ProviderError> {
        if rows.len() != expected {
            return Err(ProviderError::Malformed(format!(
                "expected {} rows, got {}",
                expected,
                rows.len()
            )));
        }
        for (i, row) in rows.iter_mut().enumerate() {
            if row.len() != expected {
                return Err(ProviderError::Malformed(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    expected
                )));
            }
            if let Some(j) = row.iter().position(|d| !d.is_finite() || *d < 0.0) {
                return Err(ProviderError::Malformed(format!(
                    "invalid distance {} at [{}][{}]",
                    row[j], i, j
                )));
            }
            row[i] = 0.0;
        }
        debug!("Validated {}x{} distance matrix", expected, expected);
        Ok(Self { rows })
    }

    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// Cost from `from` to `to`. Panics on out-of-range indices.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}
