//! Total-variation proximal operators.
//!
//! [`Tv1d`] solves
//!
//! ```text
//! argmin_z  Σ_i |z_{i+1} − z_i| + (1 / 2s) ||z − x||²
//! ```
//!
//! exactly in linear time with Condat's direct algorithm (IEEE Signal
//! Processing Letters, 2013). [`Tv2d`] treats the vector as a row-major image
//! and alternates 1-D passes over columns and rows with Douglas–Rachford
//! splitting (Barbero & Sra, 2014).

use super::Prox;

/// Exact 1-D total-variation denoising of `input` with weight `lambda`.
///
/// # Panics
///
/// Panics if `input` and `output` differ in length.
pub fn tv1d_denoise(input: &[f64], lambda: f64, output: &mut [f64]) {
    assert_eq!(input.len(), output.len(), "input and output length differ");
    let width = input.len();
    if width == 0 {
        return;
    }
    if lambda <= 0.0 {
        output.copy_from_slice(input);
        return;
    }

    let two_lambda = 2.0 * lambda;
    let min_lambda = -lambda;

    // k: current sample, k0: start of the current segment,
    // kplus / kminus: last positions where umax = -lambda / umin = lambda
    let (mut k, mut k0, mut kplus, mut kminus) = (0usize, 0usize, 0usize, 0usize);
    // dual variable bounds and segment value bounds
    let (mut umin, mut umax) = (lambda, min_lambda);
    let (mut vmin, mut vmax) = (input[0] - lambda, input[0] + lambda);

    loop {
        while k == width - 1 {
            if umin < 0.0 {
                // vmin too high: negative jump
                fill_segment(output, &mut k0, kminus, vmin);
                k = k0;
                kminus = k0;
                vmin = input[k0];
                umin = lambda;
                umax = vmin + umin - vmax;
            } else if umax > 0.0 {
                // vmax too low: positive jump
                fill_segment(output, &mut k0, kplus, vmax);
                k = k0;
                kplus = k0;
                vmax = input[k0];
                umax = min_lambda;
                umin = vmax + umax - vmin;
            } else {
                vmin += umin / (k - k0 + 1) as f64;
                fill_segment(output, &mut k0, k, vmin);
                return;
            }
        }

        umin += input[k + 1] - vmin;
        if umin < min_lambda {
            fill_segment(output, &mut k0, kminus, vmin);
            k = k0;
            kplus = k0;
            kminus = k0;
            vmin = input[k0];
            vmax = vmin + two_lambda;
            umin = lambda;
            umax = min_lambda;
            continue;
        }

        umax += input[k + 1] - vmax;
        if umax > lambda {
            fill_segment(output, &mut k0, kplus, vmax);
            k = k0;
            kplus = k0;
            kminus = k0;
            vmax = input[k0];
            vmin = vmax - two_lambda;
            umin = lambda;
            umax = min_lambda;
            continue;
        }

        k += 1;
        if umin >= lambda {
            kminus = k;
            vmin += (umin - lambda) / (kminus - k0 + 1) as f64;
            umin = lambda;
        }
        if umax <= min_lambda {
            kplus = k;
            vmax += (umax + lambda) / (kplus - k0 + 1) as f64;
            umax = min_lambda;
        }
    }
}

/// Write `value` to `output[*k0..=last]` and advance `k0` past the segment.
#[inline]
fn fill_segment(output: &mut [f64], k0: &mut usize, last: usize, value: f64) {
    loop {
        output[*k0] = value;
        *k0 += 1;
        if *k0 > last {
            break;
        }
    }
}

/// Proximal operator of the 1-D total variation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tv1d;

impl Prox for Tv1d {
    fn prox(&self, step_size: f64, x: &mut [f64]) {
        let input = x.to_vec();
        tv1d_denoise(&input, step_size, x);
    }

    fn name(&self) -> &'static str {
        "tv1d"
    }
}

/// Proximal operator of the anisotropic 2-D total variation.
///
/// The point is a row-major `n_rows × n_cols` image. The operator is not
/// available in closed form; Douglas–Rachford iterations stop once the column
/// and row estimates agree to within `tol` (max-norm) or after `max_iter`
/// iterations, with a warning in the latter case.
#[derive(Debug, Clone)]
pub struct Tv2d {
    pub n_rows: usize,
    pub n_cols: usize,
    pub max_iter: usize,
    pub tol: f64,
}

impl Tv2d {
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            max_iter: 500,
            tol: 1e-3,
        }
    }

    /// Apply [`tv1d_denoise`] to every column of the image.
    fn denoise_cols(&self, image: &mut [f64], lambda: f64, buf_in: &mut [f64], buf_out: &mut [f64]) {
        for col in 0..self.n_cols {
            for row in 0..self.n_rows {
                buf_in[row] = image[row * self.n_cols + col];
            }
            tv1d_denoise(buf_in, lambda, buf_out);
            for row in 0..self.n_rows {
                image[row * self.n_cols + col] = buf_out[row];
            }
        }
    }

    /// Apply [`tv1d_denoise`] to every row of the image.
    fn denoise_rows(&self, image: &mut [f64], lambda: f64, buf_out: &mut [f64]) {
        for row in image.chunks_exact_mut(self.n_cols) {
            tv1d_denoise(row, lambda, buf_out);
            row.copy_from_slice(buf_out);
        }
    }
}

impl Prox for Tv2d {
    fn prox(&self, step_size: f64, x: &mut [f64]) {
        let n = self.n_rows * self.n_cols;
        assert_eq!(x.len(), n, "point length does not match image size");
        if n == 0 {
            return;
        }

        let mut p = vec![0.0; n];
        let mut q = vec![0.0; n];
        let mut y = vec![0.0; n];
        let mut col_in = vec![0.0; self.n_rows];
        let mut col_out = vec![0.0; self.n_rows];
        let mut row_out = vec![0.0; self.n_cols];

        let mut accuracy = f64::INFINITY;
        for _ in 0..self.max_iter {
            for i in 0..n {
                y[i] = x[i] + p[i];
            }
            self.denoise_cols(&mut y, step_size, &mut col_in, &mut col_out);
            for i in 0..n {
                p[i] += x[i] - y[i];
                x[i] = y[i] + q[i];
            }
            self.denoise_rows(x, step_size, &mut row_out);
            accuracy = 0.0;
            for i in 0..n {
                q[i] += y[i] - x[i];
                accuracy = f64::max(accuracy, (y[i] - x[i]).abs());
            }
            if accuracy < self.tol {
                return;
            }
        }
        log::warn!(
            "tv2d prox did not converge within {} iterations (accuracy {:.3e})",
            self.max_iter,
            accuracy
        );
    }

    fn name(&self) -> &'static str {
        "tv2d"
    }
}
