//! Dense statevector and its update kernels.
//!
//! Amplitudes are indexed little-endian: bit `q` of a basis index is the
//! value of qubit `q`. An operation on target qubits `T` with control mask
//! `C` partitions the basis into classes that differ only in the bits of
//! `T`; each class whose members have every bit of `C` set is multiplied by
//! the operation's matrix, every other amplitude is left alone.

use num_complex::Complex64;
use rayon::prelude::*;

use ketra_ir::{
    BlockDefinition, Instruction, InstructionKind, QubitId, Unitary2x2, Unitary4x4,
};

use crate::config::{DEFAULT_PARALLEL_THRESHOLD, MAX_ADDRESSABLE_QUBITS};
use crate::error::{SimError, SimResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Smallest slice handed to one kernel invocation.
const MIN_CHUNK: usize = 1 << 12;

/// Combined bit mask of `qubits`.
pub fn mask_of(qubits: &[QubitId]) -> usize {
    qubits.iter().fold(0, |acc, q| acc | q.mask())
}

/// A pure state of `n` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: u32,
    parallel_threshold: u32,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// # Panics
    ///
    /// Panics if `num_qubits` exceeds [`MAX_ADDRESSABLE_QUBITS`]. The engine
    /// rejects such widths before allocating.
    pub fn new(num_qubits: u32) -> Self {
        assert!(
            num_qubits <= MAX_ADDRESSABLE_QUBITS,
            "{num_qubits} qubits exceed the addressable limit of {MAX_ADDRESSABLE_QUBITS}"
        );
        let mut amplitudes = vec![ZERO; 1usize << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Wrap an amplitude vector of length `2^n`.
    ///
    /// The vector is taken as given; callers wanting a physical state must
    /// normalize it themselves.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() {
            return Err(SimError::InvalidAmplitudes(format!(
                "length {len} is not a power of two"
            )));
        }
        Ok(Self {
            amplitudes,
            num_qubits: len.trailing_zeros(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Run kernels on the rayon pool once the register reaches `threshold`.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: u32) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of amplitudes, `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes, little-endian.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the amplitude vector.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// `Σ |ψ_i|²`.
    pub fn norm_sqr(&self) -> f64 {
        if self.is_parallel() {
            self.amplitudes.par_iter().map(Complex64::norm_sqr).sum()
        } else {
            self.amplitudes.iter().map(Complex64::norm_sqr).sum()
        }
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        if self.is_parallel() {
            self.amplitudes.par_iter().map(Complex64::norm_sqr).collect()
        } else {
            self.amplitudes.iter().map(Complex64::norm_sqr).collect()
        }
    }

    /// `⟨self|other⟩`, or `None` when the widths differ.
    pub fn inner(&self, other: &Statevector) -> Option<Complex64> {
        (self.num_qubits == other.num_qubits).then(|| {
            self.amplitudes
                .iter()
                .zip(&other.amplitudes)
                .map(|(a, b)| a.conj() * b)
                .sum()
        })
    }

    /// `|⟨self|other⟩|²`; 0 when the widths differ.
    pub fn fidelity(&self, other: &Statevector) -> f64 {
        self.inner(other).map_or(0.0, |z| z.norm_sqr())
    }

    /// Apply `u` to `qubit` on every basis state whose `ctrl_mask` bits are set.
    pub fn apply_single(&mut self, qubit: QubitId, u: &Unitary2x2, ctrl_mask: usize) {
        let mask = qubit.mask();
        debug_assert_eq!(ctrl_mask & mask, 0, "target overlaps controls");
        let u = *u;
        self.for_each_chunk(mask << 1, move |offset, chunk| {
            for i in 0..chunk.len() {
                if i & mask != 0 || (offset + i) & ctrl_mask != ctrl_mask {
                    continue;
                }
                let j = i | mask;
                let (a, b) = u.apply(chunk[i], chunk[j]);
                chunk[i] = a;
                chunk[j] = b;
            }
        });
    }

    /// Apply a two-qubit matrix; local index is `b(q0) + 2·b(q1)`.
    pub fn apply_two(&mut self, q0: QubitId, q1: QubitId, u: &Unitary4x4, ctrl_mask: usize) {
        self.apply_matrix(&[q0, q1], &u.data, ctrl_mask);
    }

    /// Apply a row-major `2^w × 2^w` matrix over `qubits`.
    ///
    /// Local bit `j` of the matrix index is the value of `qubits[j]`.
    pub fn apply_matrix(&mut self, qubits: &[QubitId], matrix: &[Complex64], ctrl_mask: usize) {
        let width = qubits.len();
        let dim = 1usize << width;
        debug_assert_eq!(matrix.len(), dim * dim, "matrix does not match operands");
        debug_assert_eq!(ctrl_mask & mask_of(qubits), 0, "target overlaps controls");

        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (local >> j) & 1 == 1)
                    .fold(0, |acc, (_, q)| acc | q.mask())
            })
            .collect();
        let target_mask = offsets[dim - 1];
        let span = qubits.iter().map(|q| q.mask()).max().unwrap_or(1) << 1;

        self.for_each_chunk(span, |offset, chunk| {
            let mut scratch = vec![ZERO; dim];
            for base in 0..chunk.len() {
                if base & target_mask != 0 || (offset + base) & ctrl_mask != ctrl_mask {
                    continue;
                }
                for (slot, &o) in scratch.iter_mut().zip(&offsets) {
                    *slot = chunk[base | o];
                }
                for (row, &o) in offsets.iter().enumerate() {
                    let coeffs = &matrix[row * dim..(row + 1) * dim];
                    chunk[base | o] = coeffs.iter().zip(&scratch).map(|(m, a)| m * a).sum();
                }
            }
        });
    }

    /// Apply one circuit instruction.
    ///
    /// `Mcx` is applied natively through its control mask and decomposed
    /// blocks are applied body-first through their operand mapping.
    pub fn apply_instruction(&mut self, instruction: &Instruction) {
        let qubits = &instruction.qubits;
        match &instruction.kind {
            InstructionKind::Gate(gate) => match gate.target_matrix() {
                Some(u) => {
                    let ctrl = mask_of(instruction.controls());
                    if let Some(&target) = instruction.targets().first() {
                        self.apply_single(target, &u, ctrl);
                    }
                }
                None => {
                    if let [a, b] = qubits.as_slice() {
                        self.apply_two(*a, *b, &Unitary4x4::swap(), 0);
                    }
                }
            },
            InstructionKind::Unitary(u) => {
                if let Some(&q) = qubits.first() {
                    self.apply_single(q, u, 0);
                }
            }
            InstructionKind::Mcx => {
                if let Some((&target, controls)) = qubits.split_last() {
                    self.apply_single(target, &Unitary2x2::x(), mask_of(controls));
                }
            }
            InstructionKind::Block(block) => match &block.definition {
                BlockDefinition::Matrix(m) => self.apply_matrix(qubits, m.data(), 0),
                BlockDefinition::Decomposed(body) => {
                    for child in body {
                        self.apply_instruction(&child.remap(qubits));
                    }
                }
            },
            InstructionKind::Barrier => {}
        }
    }

    fn is_parallel(&self) -> bool {
        self.num_qubits >= self.parallel_threshold
    }

    /// Hand aligned slices of at least `span` amplitudes to `kernel`, which
    /// receives the global index of the slice start.
    fn for_each_chunk<F>(&mut self, span: usize, kernel: F)
    where
        F: Fn(usize, &mut [Complex64]) + Send + Sync,
    {
        let len = self.amplitudes.len();
        let chunk = span.max(MIN_CHUNK).min(len);
        if self.is_parallel() && chunk < len {
            self.amplitudes
                .par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(k, slice)| kernel(k * chunk, slice));
        } else {
            for (k, slice) in self.amplitudes.chunks_mut(chunk).enumerate() {
                kernel(k * chunk, slice);
            }
        }
    }
}
