//! Measurement sampling from a final statevector.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use ketra_hal::Counts;
use ketra_ir::MeasurementBinding;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Widest classical register the sampler can key outcomes by.
const MAX_CLBITS: u32 = usize::BITS;

/// Distribution over classical register values.
///
/// Unbound classical bits read 0. When several bindings target the same
/// classical bit, the last one wins.
#[derive(Debug, Clone)]
pub struct Sampler {
    num_clbits: u32,
    bound: bool,
    /// Reachable register values, ascending.
    outcomes: Vec<usize>,
    /// Cumulative probability aligned with `outcomes`.
    cumulative: Vec<f64>,
}

impl Sampler {
    /// Build the marginal distribution of `bindings` over `statevector`.
    pub fn new(
        statevector: &Statevector,
        bindings: &[MeasurementBinding],
        num_clbits: u32,
    ) -> SimResult<Self> {
        if num_clbits > MAX_CLBITS {
            return Err(SimError::ResourceExhausted {
                requested: num_clbits,
                max: MAX_CLBITS,
            });
        }

        // clbit → qubit, later bindings overwrite earlier ones.
        let mut effective: FxHashMap<u32, u32> = FxHashMap::default();
        for binding in bindings {
            effective.insert(binding.clbit.0, binding.qubit.0);
        }
        let effective: Vec<(u32, u32)> = effective.into_iter().collect();

        let mut marginal: FxHashMap<usize, f64> = FxHashMap::default();
        for (index, amp) in statevector.amplitudes().iter().enumerate() {
            let p = amp.norm_sqr();
            if p == 0.0 {
                continue;
            }
            let value = effective.iter().fold(0usize, |acc, &(clbit, qubit)| {
                acc | (((index >> qubit) & 1) << clbit)
            });
            *marginal.entry(value).or_insert(0.0) += p;
        }

        let mut sorted: Vec<(usize, f64)> = marginal.into_iter().collect();
        sorted.sort_unstable_by_key(|&(value, _)| value);
        let mut running = 0.0;
        let (outcomes, cumulative): (Vec<usize>, Vec<f64>) = sorted
            .into_iter()
            .map(|(value, p)| {
                running += p;
                (value, running)
            })
            .unzip();

        Ok(Self {
            num_clbits,
            bound: !bindings.is_empty(),
            outcomes,
            cumulative,
        })
    }

    /// Width of the produced bit-strings.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Marginal probability of every reachable register value, keyed by
    /// bit-string.
    pub fn probabilities(&self) -> Vec<(String, f64)> {
        let mut previous = 0.0;
        self.outcomes
            .iter()
            .zip(&self.cumulative)
            .map(|(&value, &c)| {
                let p = c - previous;
                previous = c;
                (self.bitstring(value), p)
            })
            .collect()
    }

    /// Draw `shots` samples.
    pub fn sample<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> SimResult<Counts> {
        if shots == 0 {
            return Ok(Counts::new());
        }
        if !self.bound {
            return Err(SimError::NoMeasurementBindings);
        }

        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let last = self.outcomes.len().saturating_sub(1);
        let mut tally: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            let r = rng.r#gen::<f64>() * total;
            let slot = self.cumulative.partition_point(|&c| c <= r).min(last);
            if let Some(&value) = self.outcomes.get(slot) {
                *tally.entry(value).or_insert(0) += 1;
            }
        }

        Ok(tally
            .into_iter()
            .map(|(value, count)| (self.bitstring(value), count))
            .collect())
    }

    /// Draw `shots` samples from a generator seeded with `seed`.
    pub fn sample_seeded(&self, shots: u32, seed: u64) -> SimResult<Counts> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.sample(shots, &mut rng)
    }

    /// Register value as a bit-string, highest classical bit first.
    fn bitstring(&self, value: usize) -> String {
        if self.num_clbits == 0 {
            return String::new();
        }
        format!("{value:0width$b}", width = self.num_clbits as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::{ClbitId, QubitId, Unitary2x2};

    fn bind(qubit: u32, clbit: u32) -> MeasurementBinding {
        MeasurementBinding::new(QubitId(qubit), ClbitId(clbit))
    }

    #[test]
    fn test_bitstrings_are_msb_first() {
        // q0 = 1, q1 = 0.
        let mut sv = Statevector::new(2);
        sv.apply_single(QubitId(0), &Unitary2x2::x(), 0);
        let sampler = Sampler::new(&sv, &[bind(0, 0), bind(1, 1)], 2).unwrap();
        let counts = sampler.sample_seeded(50, 1).unwrap();
        assert_eq!(counts.get("01"), 50);
    }

    #[test]
    fn test_marginal_over_subset() {
        let mut sv = Statevector::new(3);
        sv.apply_single(QubitId(2), &Unitary2x2::x(), 0);
        sv.apply_single(QubitId(0), &Unitary2x2::h(), 0);
        // Only qubit 2 is bound, into clbit 0 of a 1-bit register.
        let sampler = Sampler::new(&sv, &[bind(2, 0)], 1).unwrap();
        let probs = sampler.probabilities();
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[0].0, "1");
        assert!((probs[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_later_binding_overwrites() {
        let mut sv = Statevector::new(2);
        sv.apply_single(QubitId(1), &Unitary2x2::x(), 0);
        let sampler = Sampler::new(&sv, &[bind(0, 0), bind(1, 0)], 1).unwrap();
        assert_eq!(sampler.sample_seeded(10, 3).unwrap().get("1"), 10);
    }

    #[test]
    fn test_no_bindings() {
        let sv = Statevector::new(1);
        let sampler = Sampler::new(&sv, &[], 0).unwrap();
        assert!(matches!(
            sampler.sample_seeded(10, 0),
            Err(SimError::NoMeasurementBindings)
        ));
        assert!(sampler.sample_seeded(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let mut sv = Statevector::new(3);
        for q in 0..3 {
            sv.apply_single(QubitId(q), &Unitary2x2::h(), 0);
        }
        let bindings: Vec<_> = (0..3).map(|q| bind(q, q)).collect();
        let sampler = Sampler::new(&sv, &bindings, 3).unwrap();
        let a = sampler.sample_seeded(1000, 42).unwrap();
        let b = sampler.sample_seeded(1000, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total(), 1000);
        assert_eq!(a.len(), 8);
    }
}
