//! Gate library: canonical unitary matrices.
//!
//! Every generator here returns a matrix that is unitary to within
//! [`DEFAULT_TOLERANCE`]. That is a construction-time guarantee, asserted
//! in debug builds only; the statevector engine never re-checks it.
//!
//! Multi-qubit matrices use the same little-endian convention as the
//! register: bit `j` of a local row/column index belongs to the `j`-th
//! operand qubit of the gate.

use ndarray::ArrayView2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::{IrError, IrResult};

/// Default unitarity tolerance, `‖U†U − I‖_F < ε`.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Single-qubit identity.
pub const I2: Unitary2x2 = Unitary2x2 {
    data: [ONE, ZERO, ZERO, ONE],
};

/// Hadamard.
pub const H: Unitary2x2 = Unitary2x2 {
    data: [
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(-FRAC_1_SQRT_2, 0.0),
    ],
};

/// Pauli-X.
pub const X: Unitary2x2 = Unitary2x2 {
    data: [ZERO, ONE, ONE, ZERO],
};

/// Pauli-Y.
pub const Y: Unitary2x2 = Unitary2x2 {
    data: [
        ZERO,
        Complex64::new(0.0, -1.0),
        Complex64::new(0.0, 1.0),
        ZERO,
    ],
};

/// Pauli-Z.
pub const Z: Unitary2x2 = Unitary2x2 {
    data: [ONE, ZERO, ZERO, Complex64::new(-1.0, 0.0)],
};

/// CNOT with the first operand as control.
pub const CNOT: Unitary4x4 = Unitary4x4 {
    data: [
        ONE, ZERO, ZERO, ZERO, //
        ZERO, ZERO, ZERO, ONE, //
        ZERO, ZERO, ONE, ZERO, //
        ZERO, ONE, ZERO, ZERO,
    ],
};

/// SWAP.
pub const SWAP: Unitary4x4 = Unitary4x4 {
    data: [
        ONE, ZERO, ZERO, ZERO, //
        ZERO, ZERO, ONE, ZERO, //
        ZERO, ONE, ZERO, ZERO, //
        ZERO, ZERO, ZERO, ONE,
    ],
};

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Identity.
    pub fn identity() -> Self {
        I2
    }

    /// Hadamard.
    pub fn h() -> Self {
        H
    }

    /// Pauli-X.
    pub fn x() -> Self {
        X
    }

    /// Pauli-Y.
    pub fn y() -> Self {
        Y
    }

    /// Pauli-Z.
    pub fn z() -> Self {
        Z
    }

    /// S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::p(PI / 2.0)
    }

    /// S-dagger gate.
    pub fn sdg() -> Self {
        Self::p(-PI / 2.0)
    }

    /// T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    /// T-dagger gate.
    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::new(half + half_i, half - half_i, half - half_i, half + half_i)
    }

    /// RX rotation.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
        .checked()
    }

    /// RY rotation.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
        .checked()
    }

    /// RZ rotation.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        )
        .checked()
    }

    /// Phase gate P(lambda) = diag(1, e^{iλ}).
    pub fn p(lambda: f64) -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, lambda)).checked()
    }

    /// Universal gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
        .checked()
    }

    /// `e^{iγ} · U(theta, phi, lambda)`.
    pub fn u_with_phase(theta: f64, phi: f64, lambda: f64, gamma: f64) -> Self {
        Self::u(theta, phi, lambda).scale(Complex64::from_polar(1.0, gamma))
    }

    /// Multiply by a scalar.
    pub fn scale(&self, factor: Complex64) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a * factor, b * factor, c * factor, d * factor)
    }

    /// Matrix product `self * other`.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Determinant.
    pub fn det(&self) -> Complex64 {
        self.data[0] * self.data[3] - self.data[1] * self.data[2]
    }

    /// A principal square root `V` with `V · V = self`.
    ///
    /// Uses the closed form `(U + s·I) / sqrt(tr U + 2s)` with `s = ±sqrt(det U)`,
    /// picking the sign that keeps the denominator away from zero.
    pub fn sqrt(&self) -> Self {
        let trace = self.data[0] + self.data[3];
        let mut s = self.det().sqrt();
        if (trace + 2.0 * s).norm() < (trace - 2.0 * s).norm() {
            s = -s;
        }
        let denom = (trace + 2.0 * s).sqrt();
        let [a, b, c, d] = self.data;
        Self::new((a + s) / denom, b / denom, c / denom, (d + s) / denom)
    }

    /// Parameters `(theta, phi, lambda, gamma)` with `self = e^{iγ} U(θ, φ, λ)`.
    ///
    /// The global phase is kept exactly, which matters once the gate is
    /// controlled.
    pub fn u_params(&self) -> (f64, f64, f64, f64) {
        let [a, b, c, d] = self.data;
        let theta = 2.0 * c.norm().atan2(a.norm());
        if c.norm() < DEFAULT_TOLERANCE {
            let gamma = a.arg();
            return (0.0, 0.0, d.arg() - gamma, gamma);
        }
        if a.norm() < DEFAULT_TOLERANCE {
            let gamma = c.arg();
            return (PI, 0.0, (-b).arg() - gamma, gamma);
        }
        let gamma = a.arg();
        (theta, c.arg() - gamma, (-b).arg() - gamma, gamma)
    }

    /// Apply to an amplitude pair `(|0⟩, |1⟩)`.
    #[inline]
    pub fn apply(&self, a: Complex64, b: Complex64) -> (Complex64, Complex64) {
        (
            self.data[0] * a + self.data[1] * b,
            self.data[2] * a + self.data[3] * b,
        )
    }

    /// Element-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() < eps)
    }

    /// Check `‖U†U − I‖ < eps`.
    pub fn is_unitary(&self, eps: f64) -> bool {
        unitarity_error(2, &self.data) < eps
    }

    fn checked(self) -> Self {
        debug_assert!(
            self.is_unitary(DEFAULT_TOLERANCE),
            "gate library produced a non-unitary matrix: {self:?}"
        );
        self
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

/// A 4x4 two-qubit unitary in row-major order.
///
/// Local index is `b0 + 2·b1` where `b0` is the first operand's bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary4x4 {
    /// Row-major elements.
    pub data: [Complex64; 16],
}

impl Unitary4x4 {
    /// CNOT, first operand controls.
    pub fn cx() -> Self {
        CNOT
    }

    /// SWAP.
    pub fn swap() -> Self {
        SWAP
    }

    /// Controlled-Z.
    pub fn cz() -> Self {
        Self::controlled(&Z)
    }

    /// Controlled phase.
    pub fn cp(lambda: f64) -> Self {
        Self::controlled(&Unitary2x2::p(lambda))
    }

    /// Controlled version of `u`, with the first operand as control.
    pub fn controlled(u: &Unitary2x2) -> Self {
        let mut data = [ZERO; 16];
        data[0] = ONE;
        data[2 * 4 + 2] = ONE;
        data[4 + 1] = u.data[0];
        data[4 + 3] = u.data[1];
        data[3 * 4 + 1] = u.data[2];
        data[3 * 4 + 3] = u.data[3];
        Self { data }
    }

    /// Check `‖U†U − I‖ < eps`.
    pub fn is_unitary(&self, eps: f64) -> bool {
        unitarity_error(4, &self.data) < eps
    }
}

/// Matrix form of a library gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    /// Single-qubit gate.
    One(Unitary2x2),
    /// Two-qubit gate.
    Two(Unitary4x4),
}

impl GateMatrix {
    /// Check unitarity within `eps`.
    pub fn is_unitary(&self, eps: f64) -> bool {
        match self {
            GateMatrix::One(u) => u.is_unitary(eps),
            GateMatrix::Two(u) => u.is_unitary(eps),
        }
    }
}

/// Dense `2^w × 2^w` unitary for custom blocks, row-major.
///
/// Deserialization checks the shape but not unitarity, so drifted matrices
/// can still be loaded and measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitaryMatrix")]
pub struct UnitaryMatrix {
    num_qubits: u32,
    data: Vec<Complex64>,
}

#[derive(Deserialize)]
struct RawUnitaryMatrix {
    num_qubits: u32,
    data: Vec<Complex64>,
}

impl TryFrom<RawUnitaryMatrix> for UnitaryMatrix {
    type Error = IrError;

    fn try_from(raw: RawUnitaryMatrix) -> IrResult<Self> {
        Self::with_shape(raw.num_qubits, raw.data)
    }
}

impl UnitaryMatrix {
    /// Wrap a row-major matrix acting on `num_qubits` qubits.
    ///
    /// Fails if the length is not `(2^w)^2`. Unitarity is asserted in debug
    /// builds only.
    pub fn new(num_qubits: u32, data: Vec<Complex64>) -> IrResult<Self> {
        let matrix = Self::with_shape(num_qubits, data)?;
        debug_assert!(
            matrix.is_unitary(DEFAULT_TOLERANCE),
            "custom block matrix is not unitary"
        );
        Ok(matrix)
    }

    fn with_shape(num_qubits: u32, data: Vec<Complex64>) -> IrResult<Self> {
        let expected = 1usize
            .checked_shl(num_qubits)
            .and_then(|dim| dim.checked_mul(dim));
        if expected != Some(data.len()) {
            return Err(IrError::InvalidBlock {
                name: "unitary".into(),
                reason: match expected {
                    Some(len) => format!(
                        "matrix has {} entries, expected {len} for {num_qubits} qubits",
                        data.len()
                    ),
                    None => format!("{num_qubits} qubits is too wide for a dense matrix"),
                },
            });
        }
        Ok(Self { num_qubits, data })
    }

    /// Permutation matrix sending basis state `c` to `permutation[c]`.
    pub fn from_permutation(num_qubits: u32, permutation: &[usize]) -> IrResult<Self> {
        let invalid = |reason: String| IrError::InvalidBlock {
            name: "permutation".into(),
            reason,
        };
        if 1usize.checked_shl(num_qubits) != Some(permutation.len()) {
            return Err(invalid(format!(
                "permutation has {} entries, expected 2^{num_qubits}",
                permutation.len()
            )));
        }
        let dim = permutation.len();
        let mut seen = vec![false; dim];
        let mut data = vec![ZERO; dim * dim];
        for (col, &row) in permutation.iter().enumerate() {
            if row >= dim || seen[row] {
                return Err(invalid(format!("{row} is not a valid unique image")));
            }
            seen[row] = true;
            data[row * dim + col] = ONE;
        }
        Ok(Self { num_qubits, data })
    }

    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        let dim = 1usize << num_qubits;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = ONE;
        }
        Self { num_qubits, data }
    }

    /// Number of qubits acted on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Matrix dimension `2^w`.
    pub fn dim(&self) -> usize {
        1usize << self.num_qubits
    }

    /// Row-major entries.
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Entry at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim() + col]
    }

    /// Borrow as an ndarray view.
    pub fn view(&self) -> Option<ArrayView2<'_, Complex64>> {
        ArrayView2::from_shape((self.dim(), self.dim()), &self.data).ok()
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let dim = self.dim();
        let mut data = vec![ZERO; dim * dim];
        for row in 0..dim {
            for col in 0..dim {
                data[col * dim + row] = self.data[row * dim + col].conj();
            }
        }
        Self {
            num_qubits: self.num_qubits,
            data,
        }
    }

    /// Check `‖U†U − I‖ < eps`.
    pub fn is_unitary(&self, eps: f64) -> bool {
        unitarity_error(self.dim(), &self.data) < eps
    }
}

/// Frobenius norm of `U†U − I` for a row-major `dim × dim` matrix.
pub fn unitarity_error(dim: usize, data: &[Complex64]) -> f64 {
    let Ok(u) = ArrayView2::from_shape((dim, dim), data) else {
        return f64::INFINITY;
    };
    let adjoint = u.t().mapv(|z| z.conj());
    let product = adjoint.dot(&u);
    product
        .indexed_iter()
        .map(|((row, col), z)| {
            let expected = if row == col { ONE } else { ZERO };
            (z - expected).norm_sqr()
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_named_constants_are_unitary() {
        for u in [I2, H, X, Y, Z] {
            assert!(u.is_unitary(EPS));
        }
        assert!(CNOT.is_unitary(EPS));
        assert!(SWAP.is_unitary(EPS));
    }

    #[test]
    fn test_parametrized_generators_are_unitary() {
        for theta in [-3.0, -0.7, 0.0, 0.3, 1.9, PI] {
            assert!(Unitary2x2::rx(theta).is_unitary(EPS));
            assert!(Unitary2x2::ry(theta).is_unitary(EPS));
            assert!(Unitary2x2::rz(theta).is_unitary(EPS));
            assert!(Unitary2x2::p(theta).is_unitary(EPS));
            assert!(Unitary2x2::u(theta, 0.4, -1.1).is_unitary(EPS));
            assert!(Unitary4x4::cp(theta).is_unitary(EPS));
        }
    }

    #[test]
    fn test_non_unitary_is_detected() {
        let m = Unitary2x2::new(ONE, ONE, ZERO, ONE);
        assert!(!m.is_unitary(DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_hadamard_squared() {
        assert!((H * H).approx_eq(&I2, EPS));
    }

    #[test]
    fn test_s_squared_is_z() {
        let s = Unitary2x2::s();
        assert!((s * s).approx_eq(&Z, EPS));
    }

    #[test]
    fn test_sqrt_squares_back() {
        for u in [X, Y, Z, H, Unitary2x2::u(0.7, -2.1, 1.3), Unitary2x2::rz(2.5)] {
            let v = u.sqrt();
            assert!(v.is_unitary(1e-9));
            assert!((v * v).approx_eq(&u, 1e-9), "sqrt failed for {u:?}");
        }
    }

    #[test]
    fn test_u_params_reconstruct_exactly() {
        let cases = [
            X,
            Y,
            Z,
            H,
            Unitary2x2::sx(),
            Unitary2x2::rz(0.9),
            Unitary2x2::u_with_phase(1.2, 0.3, -0.8, 2.2),
        ];
        for u in cases {
            let (theta, phi, lambda, gamma) = u.u_params();
            let rebuilt = Unitary2x2::u_with_phase(theta, phi, lambda, gamma);
            assert!(rebuilt.approx_eq(&u, 1e-9), "mismatch for {u:?}");
        }
    }

    #[test]
    fn test_cnot_little_endian() {
        // |b1 b0⟩ = |01⟩ (index 1, control set) maps to |11⟩ (index 3).
        assert_eq!(CNOT.data[3 * 4 + 1], ONE);
        assert_eq!(CNOT.data[4 + 3], ONE);
        assert_eq!(Unitary4x4::controlled(&X), CNOT);
    }

    #[test]
    fn test_permutation_matrix() {
        let m = UnitaryMatrix::from_permutation(2, &[1, 2, 3, 0]).unwrap();
        assert!(m.is_unitary(EPS));
        assert_eq!(m.get(1, 0), ONE);
        assert_eq!(m.get(0, 3), ONE);
        assert!(UnitaryMatrix::from_permutation(2, &[0, 0, 1, 2]).is_err());
        assert!(UnitaryMatrix::from_permutation(2, &[0, 1]).is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let ok: UnitaryMatrix = serde_json::from_str(
            r#"{"num_qubits":1,"data":[[0.0,0.0],[1.0,0.0],[1.0,0.0],[0.0,0.0]]}"#,
        )
        .unwrap();
        assert_eq!(ok, UnitaryMatrix::from_permutation(1, &[1, 0]).unwrap());

        let short = serde_json::from_str::<UnitaryMatrix>(
            r#"{"num_qubits":2,"data":[[1.0,0.0],[0.0,0.0],[0.0,0.0],[1.0,0.0]]}"#,
        );
        let msg = short.unwrap_err().to_string();
        assert!(msg.contains("matrix has 4 entries, expected 16"), "{msg}");

        let wide =
            serde_json::from_str::<UnitaryMatrix>(r#"{"num_qubits":64,"data":[[1.0,0.0]]}"#);
        assert!(wide.unwrap_err().to_string().contains("too wide"));
    }

    #[test]
    fn test_permutation_rejects_wide_register() {
        assert!(UnitaryMatrix::from_permutation(70, &[0, 1]).is_err());
    }

    #[test]
    fn test_unitary_matrix_adjoint() {
        let m = UnitaryMatrix::from_permutation(1, &[1, 0]).unwrap();
        assert_eq!(m.adjoint(), m);
        assert!(UnitaryMatrix::new(1, vec![ONE; 3]).is_err());
    }
}
