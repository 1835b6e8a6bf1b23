//! Step-bounded Nelder–Mead simplex search.
//!
//! Reflection steps are clamped to a radius `rho` per coordinate. When the
//! simplex collapses (value spread below `tol`) the radius is halved and the
//! simplex rebuilt around the best vertex, until `rho` reaches `rho_end`.

use super::{OptimizationResult, Optimizer};

/// Nelder–Mead optimizer configuration.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tol: f64,
    /// Initial step radius.
    pub rho_begin: f64,
    /// Final step radius.
    pub rho_end: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            maxiter: 100,
            tol: 1e-6,
            rho_begin: 0.5,
            rho_end: 1e-4,
        }
    }
}

impl NelderMead {
    /// Create an optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the step radius schedule.
    pub fn with_radius(mut self, rho_begin: f64, rho_end: f64) -> Self {
        self.rho_begin = rho_begin;
        self.rho_end = rho_end;
        self
    }
}

/// Simplex vertices and their objective values.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// Vertex indices ordered best to worst.
    fn order(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.values.len()).collect();
        indices.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        indices
    }
}

impl Optimizer for NelderMead {
    fn minimize<F, E>(
        &self,
        mut objective: F,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = initial_params.len();
        let mut num_evaluations = 0;
        let mut eval = |x: &[f64]| {
            num_evaluations += 1;
            objective(x)
        };

        let mut best_value = eval(&initial_params)?;
        let mut history = vec![best_value];

        if n == 0 {
            return Ok(OptimizationResult {
                optimal_params: initial_params,
                optimal_value: best_value,
                num_evaluations: 1,
                num_iterations: 0,
                history,
                converged: true,
            });
        }

        let build = |center: Vec<f64>,
                     center_value: f64,
                     rho: f64,
                     eval: &mut dyn FnMut(&[f64]) -> Result<f64, E>|
         -> Result<Simplex, E> {
            let mut points = vec![center.clone()];
            let mut values = vec![center_value];
            for i in 0..n {
                let mut point = center.clone();
                point[i] += rho;
                values.push(eval(&point)?);
                points.push(point);
            }
            Ok(Simplex { points, values })
        };

        let mut rho = self.rho_begin;
        let mut simplex = build(initial_params, best_value, rho, &mut eval)?;
        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.maxiter {
            iterations += 1;
            let order = simplex.order();
            let best = order[0];
            let second_worst = order[n - 1];
            let worst = order[n];

            let spread = simplex.values[worst] - simplex.values[best];
            if spread < self.tol && rho <= self.rho_end {
                converged = true;
                break;
            }

            if spread < self.tol {
                rho = (rho * 0.5).max(self.rho_end);
                let center = simplex.points[best].clone();
                let center_value = simplex.values[best];
                simplex = build(center, center_value, rho, &mut eval)?;
                continue;
            }

            // Centroid of all vertices except the worst.
            let mut centroid = vec![0.0; n];
            for &idx in &order[..n] {
                for (c, x) in centroid.iter_mut().zip(&simplex.points[idx]) {
                    *c += x;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            let mut reflected: Vec<f64> = centroid
                .iter()
                .zip(&simplex.points[worst])
                .map(|(c, w)| 2.0 * c - w)
                .collect();
            for (r, c) in reflected.iter_mut().zip(&centroid) {
                let diff = *r - c;
                if diff.abs() > rho {
                    *r = c + rho * diff.signum();
                }
            }
            let f_reflected = eval(&reflected)?;

            if f_reflected < simplex.values[best] {
                let expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = eval(&expanded)?;
                if f_expanded < f_reflected {
                    simplex.points[worst] = expanded;
                    simplex.values[worst] = f_expanded;
                } else {
                    simplex.points[worst] = reflected;
                    simplex.values[worst] = f_reflected;
                }
            } else if f_reflected < simplex.values[second_worst] {
                simplex.points[worst] = reflected;
                simplex.values[worst] = f_reflected;
            } else {
                let contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex.points[worst])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = eval(&contracted)?;
                if f_contracted < simplex.values[worst] {
                    simplex.points[worst] = contracted;
                    simplex.values[worst] = f_contracted;
                } else {
                    // Shrink towards the best vertex.
                    let anchor = simplex.points[best].clone();
                    for i in (0..=n).filter(|&i| i != best) {
                        for (x, a) in simplex.points[i].iter_mut().zip(&anchor) {
                            *x = 0.5 * (a + *x);
                        }
                        simplex.values[i] = eval(&simplex.points[i])?;
                    }
                }
            }

            let current = simplex.order()[0];
            if simplex.values[current] < best_value {
                best_value = simplex.values[current];
                history.push(best_value);
            }
        }

        let best = simplex.order()[0];
        let optimal_value = simplex.values[best];
        let optimal_params = simplex.points.swap_remove(best);
        Ok(OptimizationResult {
            optimal_params,
            optimal_value,
            num_evaluations,
            num_iterations: iterations,
            history,
            converged,
        })
    }
}
