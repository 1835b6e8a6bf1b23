//! Execution results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement outcome histogram.
///
/// Keys are bit-strings of width `num_clbits`, most significant classical
/// bit first. Iteration is in lexicographic key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Count for `bitstring`, 0 if never observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(bitstring, count)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// The most frequent outcome; ties go to the smaller bit-string.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.top_k(1).into_iter().next()
    }

    /// The `k` most frequent outcomes, by count descending then key.
    pub fn top_k(&self, k: usize) -> Vec<(&String, u64)> {
        let mut sorted: Vec<(&String, u64)> = self.counts.iter().map(|(s, &c)| (s, c)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted.truncate(k);
        sorted
    }

    /// Relative frequencies.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total();
        if total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(s, &c)| (s.clone(), c as f64 / total as f64))
            .collect()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = Counts::new();
        for (s, c) in iter {
            counts.insert(s, c);
        }
        counts
    }
}

/// Expectation value of one observable with its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// `⟨ψ|O|ψ⟩`.
    pub value: f64,
    /// Shot-noise standard error; 0 for exact estimation.
    pub std_error: f64,
}

impl Estimate {
    /// Create an estimate.
    pub fn new(value: f64, std_error: f64) -> Self {
        Self { value, std_error }
    }
}

/// Payload of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum JobOutput {
    /// Sampling histogram.
    Counts(Counts),
    /// One estimate per requested observable, in request order.
    Estimates(Vec<Estimate>),
}

/// Result of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Job payload.
    pub output: JobOutput,
    /// Shots used.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result.
    pub fn new(output: JobOutput, shots: u32) -> Self {
        Self {
            output,
            shots,
            execution_time_ms: None,
        }
    }

    /// Record the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Counts, if this was a sampling job.
    pub fn counts(&self) -> Option<&Counts> {
        match &self.output {
            JobOutput::Counts(c) => Some(c),
            JobOutput::Estimates(_) => None,
        }
    }

    /// Estimates, if this was an estimation job.
    pub fn estimates(&self) -> Option<&[Estimate]> {
        match &self.output {
            JobOutput::Estimates(e) => Some(e),
            JobOutput::Counts(_) => None,
        }
    }
}
