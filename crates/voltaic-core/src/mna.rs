//! Dense modified-nodal-analysis systems.
//!
//! An MNA system of `n` non-ground nodes and `m` voltage sources is an
//! `(n + m) × (n + m)` matrix `A` and right-hand side `b`. Node rows come
//! first; each voltage source owns one branch-current row at `n + k`.
//!
//! All stamping primitives are additive read-modify-writes; ground terminals
//! arrive as `None` and are skipped, which is what eliminates the ground row
//! and column. Stamping never fails and never allocates.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

/// Real-valued MNA system, used by transient analysis.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    num_nodes: usize,
    num_vsources: usize,
    matrix: DMatrix<f64>,
    rhs: DVector<f64>,
}

impl MnaSystem {
    /// Create a zeroed system for `num_nodes` non-ground nodes and
    /// `num_vsources` voltage sources.
    pub fn new(num_nodes: usize, num_vsources: usize) -> Self {
        let size = num_nodes + num_vsources;
        MnaSystem {
            num_nodes,
            num_vsources,
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
        }
    }

    pub fn size(&self) -> usize {
        self.num_nodes + self.num_vsources
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vsources(&self) -> usize {
        self.num_vsources
    }

    /// Re-zero the system so the buffers can be reused for a fresh assembly.
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
    }

    /// Stamp an admittance `y` between two node indices.
    pub fn stamp_conductance(&mut self, a: Option<usize>, b: Option<usize>, y: f64) {
        if let Some(i) = a {
            self.matrix[(i, i)] += y;
        }
        if let Some(j) = b {
            self.matrix[(j, j)] += y;
        }
        if let (Some(i), Some(j)) = (a, b) {
            self.matrix[(i, j)] -= y;
            self.matrix[(j, i)] -= y;
        }
    }

    /// Stamp a current `i` flowing from `from` into `to`.
    pub fn stamp_current_source(&mut self, from: Option<usize>, to: Option<usize>, i: f64) {
        if let Some(f) = from {
            self.rhs[f] -= i;
        }
        if let Some(t) = to {
            self.rhs[t] += i;
        }
    }

    /// Stamp a voltage source with branch-current row `branch_row`
    /// (an absolute matrix index, `num_nodes + k`) and value `v`.
    pub fn stamp_voltage_source(
        &mut self,
        pos: Option<usize>,
        neg: Option<usize>,
        branch_row: usize,
        v: f64,
    ) {
        if let Some(i) = pos {
            self.matrix[(i, branch_row)] += 1.0;
            self.matrix[(branch_row, i)] += 1.0;
        }
        if let Some(j) = neg {
            self.matrix[(j, branch_row)] -= 1.0;
            self.matrix[(branch_row, j)] -= 1.0;
        }
        self.rhs[branch_row] += v;
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }
}

/// Complex-valued MNA system, used by AC analysis. Identical to
/// [`MnaSystem`] with complex addition and subtraction.
#[derive(Debug, Clone)]
pub struct ComplexMnaSystem {
    num_nodes: usize,
    num_vsources: usize,
    matrix: DMatrix<Complex<f64>>,
    rhs: DVector<Complex<f64>>,
}

impl ComplexMnaSystem {
    pub fn new(num_nodes: usize, num_vsources: usize) -> Self {
        let size = num_nodes + num_vsources;
        ComplexMnaSystem {
            num_nodes,
            num_vsources,
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
        }
    }

    pub fn size(&self) -> usize {
        self.num_nodes + self.num_vsources
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vsources(&self) -> usize {
        self.num_vsources
    }

    pub fn clear(&mut self) {
        self.matrix.fill(Complex::new(0.0, 0.0));
        self.rhs.fill(Complex::new(0.0, 0.0));
    }

    pub fn stamp_admittance(&mut self, a: Option<usize>, b: Option<usize>, y: Complex<f64>) {
        if let Some(i) = a {
            self.matrix[(i, i)] += y;
        }
        if let Some(j) = b {
            self.matrix[(j, j)] += y;
        }
        if let (Some(i), Some(j)) = (a, b) {
            self.matrix[(i, j)] -= y;
            self.matrix[(j, i)] -= y;
        }
    }

    pub fn stamp_current_source(
        &mut self,
        from: Option<usize>,
        to: Option<usize>,
        i: Complex<f64>,
    ) {
        if let Some(f) = from {
            self.rhs[f] -= i;
        }
        if let Some(t) = to {
            self.rhs[t] += i;
        }
    }

    pub fn stamp_voltage_source(
        &mut self,
        pos: Option<usize>,
        neg: Option<usize>,
        branch_row: usize,
        v: Complex<f64>,
    ) {
        let one = Complex::new(1.0, 0.0);
        if let Some(i) = pos {
            self.matrix[(i, branch_row)] += one;
            self.matrix[(branch_row, i)] += one;
        }
        if let Some(j) = neg {
            self.matrix[(j, branch_row)] -= one;
            self.matrix[(branch_row, j)] -= one;
        }
        self.rhs[branch_row] += v;
    }

    pub fn matrix(&self) -> &DMatrix<Complex<f64>> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<Complex<f64>> {
        &self.rhs
    }
}
