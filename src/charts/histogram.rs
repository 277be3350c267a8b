//! Fixed-count time binning for date-valued columns
//!
//! The span between the earliest and latest date is divided into `bins`
//! equal-width intervals. Each date increments the bucket at
//! `floor((date - min) / bin_size)`.
//!
//! Boundary policy: a date landing exactly on the maximum produces a bucket
//! index equal to `bins` and is discarded, not clamped into the last bucket.
//! This mirrors the backend contract; callers relying on totals must expect
//! max-boundary rows to be absent from every bucket.
//!
//! A zero-width span (`min == max`) would divide by zero; it collapses to a
//! single bucket holding every row instead.

use chrono::NaiveDateTime;

/// A single histogram bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket start date formatted as month + year, e.g. "Jan 2024"
    pub label: String,
    /// Number of dates that fell in this bucket
    pub count: u64,
}

/// Buckets a set of dates into a fixed number of equal-width time bins
#[derive(Debug, Clone, Copy)]
pub struct HistogramBinner {
    bins: usize,
}

impl HistogramBinner {
    /// Create a binner with the given bucket count
    ///
    /// A bucket count of zero is coerced to one so the binner stays total.
    pub fn new(bins: usize) -> Self {
        Self {
            bins: bins.max(1),
        }
    }

    /// Returns the configured bucket count
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Bin the given dates
    ///
    /// Returns one bucket per bin in chronological order. An empty input
    /// yields no buckets. A degenerate range (all dates equal) yields a
    /// single bucket containing every date.
    pub fn bin(&self, dates: &[NaiveDateTime]) -> Vec<Bucket> {
        let timestamps: Vec<i64> = dates.iter().map(|d| d.and_utc().timestamp()).collect();
        let (min, max) = match (timestamps.iter().min(), timestamps.iter().max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => return Vec::new(),
        };

        if min == max {
            // bin_size would be zero; collapse to one bucket with all rows
            return vec![Bucket {
                label: bucket_label(min),
                count: timestamps.len() as u64,
            }];
        }

        let bin_size = (max - min) as f64 / self.bins as f64;
        let mut counts = vec![0u64; self.bins];
        for ts in &timestamps {
            let index = ((ts - min) as f64 / bin_size).floor() as usize;
            if index >= self.bins {
                // Exactly on the maximum boundary; dropped by policy
                continue;
            }
            counts[index] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bucket {
                label: bucket_label(min + (i as f64 * bin_size) as i64),
                count,
            })
            .collect()
    }
}

/// Month + year label for a bucket start timestamp
fn bucket_label(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%b %Y").to_string(),
        None => String::new(),
    }
}
