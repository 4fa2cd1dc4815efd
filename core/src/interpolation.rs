//! Interpolation Functions
//!
//! Catmull-Rom splines over irregular nodes (used by the subsurface profile
//! and the measured Fourier tables) and truncated Fourier series.

use crate::pbrt::*;

/// Upper bound on Newton-bisection steps; every solver here converges in far
/// fewer steps for well formed input.
const MAX_NEWTON_STEPS: usize = 64;

/// A single cubic segment `[x0, x1]` of a Catmull-Rom spline with end values
/// and finite-difference derivatives scaled to the unit interval.
#[derive(Copy, Clone, Debug)]
struct SplineSegment {
    x0: Float,
    width: Float,
    f0: Float,
    f1: Float,
    d0: Float,
    d1: Float,
}

impl SplineSegment {
    /// Builds segment `i` of a spline with `n` nodes.
    ///
    /// * `x` - Node positions.
    /// * `f` - Function value at a node index.
    /// * `n` - Number of nodes.
    /// * `i` - Segment index in `[0, n - 2]`.
    fn new<F: Fn(usize) -> Float>(x: &[Float], f: F, n: usize, i: usize) -> Self {
        let (x0, x1) = (x[i], x[i + 1]);
        let (f0, f1) = (f(i), f(i + 1));
        let width = x1 - x0;

        let d0 = if i > 0 {
            width * (f1 - f(i - 1)) / (x1 - x[i - 1])
        } else {
            f1 - f0
        };
        let d1 = if i + 2 < n {
            width * (f(i + 2) - f0) / (x[i + 2] - x0)
        } else {
            f1 - f0
        };

        Self {
            x0,
            width,
            f0,
            f1,
            d0,
            d1,
        }
    }

    /// Integral of the segment over `[0, 1]` in the unit parameter.
    fn integral(&self) -> Float {
        (self.d0 - self.d1) * (1.0 / 12.0) + (self.f0 + self.f1) * 0.5
    }

    /// Returns `(F(t), f(t))`, the running integral and the spline value.
    #[allow(non_snake_case)]
    fn integral_and_value(&self, t: Float) -> (Float, Float) {
        let Self { f0, f1, d0, d1, .. } = *self;
        let F = t
            * (f0
                + t * (0.5 * d0
                    + t * ((1.0 / 3.0) * (-2.0 * d0 - d1) + f1 - f0
                        + t * (0.25 * (d0 + d1) + 0.5 * (f0 - f1)))));
        let f = f0 + t * (d0 + t * (-2.0 * d0 - d1 + 3.0 * (f1 - f0) + t * (d0 + d1 + 2.0 * (f0 - f1))));
        (F, f)
    }

    /// Returns `(f(t), f'(t))`.
    fn value_and_derivative(&self, t: Float) -> (Float, Float) {
        let Self { f0, f1, d0, d1, .. } = *self;
        let t2 = t * t;
        let t3 = t2 * t;
        let f = (2.0 * t3 - 3.0 * t2 + 1.0) * f0
            + (-2.0 * t3 + 3.0 * t2) * f1
            + (t3 - 2.0 * t2 + t) * d0
            + (t3 - t2) * d1;
        let df = (6.0 * t2 - 6.0 * t) * f0
            + (-6.0 * t2 + 6.0 * t) * f1
            + (3.0 * t2 - 4.0 * t + 1.0) * d0
            + (3.0 * t2 - 2.0 * t) * d1;
        (f, df)
    }

    /// Solves `F(t) = u` for the unit parameter `t` by Newton-bisection and
    /// returns `(t, f(t))`. `u` is already rescaled by the segment width.
    #[allow(non_snake_case)]
    fn invert_integral(&self, u: Float) -> (Float, Float) {
        let Self { f0, f1, .. } = *self;

        // Initial guess from importance sampling the linear interpolant.
        let mut t = if f0 != f1 {
            (f0 - safe_sqrt(f0 * f0 + 2.0 * u * (f1 - f0))) / (f0 - f1)
        } else {
            u / f0
        };

        let (mut a, mut b) = (0.0, 1.0);
        let mut fhat = f0;
        for _ in 0..MAX_NEWTON_STEPS {
            if !(t >= a && t <= b) {
                t = 0.5 * (a + b);
            }

            let (Fhat, f) = self.integral_and_value(t);
            fhat = f;

            if abs(Fhat - u) < 1e-6 || b - a < 1e-6 {
                break;
            }

            if Fhat - u < 0.0 {
                a = t;
            } else {
                b = t;
            }
            t -= (Fhat - u) / fhat;
        }
        (t, fhat)
    }
}

/// Returns the four spline weights and the index of the node the first
/// weight applies to (which may be -1; that weight is then zero).
///
/// * `nodes` - Interpolation nodes in increasing order.
/// * `x`     - Position to interpolate at.
pub fn catmull_rom_weights(nodes: &[Float], x: Float) -> Option<([Float; 4], isize)> {
    let size = nodes.len();
    if size < 2 || !(x >= nodes[0] && x <= nodes[size - 1]) {
        return None;
    }

    let idx = find_interval(size, |i| nodes[i] <= x);
    let offset = idx as isize - 1;
    let (x0, x1) = (nodes[idx], nodes[idx + 1]);

    let t = (x - x0) / (x1 - x0);
    let t2 = t * t;
    let t3 = t2 * t;

    let mut weights = [0.0; 4];
    weights[1] = 2.0 * t3 - 3.0 * t2 + 1.0;
    weights[2] = -2.0 * t3 + 3.0 * t2;

    if idx > 0 {
        let w0 = (t3 - 2.0 * t2 + t) * (x1 - x0) / (x1 - nodes[idx - 1]);
        weights[0] = -w0;
        weights[2] += w0;
    } else {
        let w0 = t3 - 2.0 * t2 + t;
        weights[0] = 0.0;
        weights[1] -= w0;
        weights[2] += w0;
    }

    if idx + 2 < size {
        let w3 = (t3 - t2) * (x1 - x0) / (nodes[idx + 2] - x0);
        weights[1] -= w3;
        weights[3] = w3;
    } else {
        let w3 = t3 - t2;
        weights[1] -= w3;
        weights[2] += w3;
        weights[3] = 0.0;
    }

    Some((weights, offset))
}

/// Computes the definite integral of a spline and its running CDF.
///
/// * `x`      - Node positions.
/// * `values` - Function values at the nodes.
pub fn integrate_catmull_rom(x: &[Float], values: &[Float]) -> (Vec<Float>, Float) {
    let n = x.len();
    let mut sum = 0.0;
    let mut cdf = vec![0.0; n];

    for i in 0..n.saturating_sub(1) {
        let seg = SplineSegment::new(x, |j| values[j], n, i);
        sum += seg.integral() * seg.width;
        cdf[i + 1] = sum;
    }

    (cdf, sum)
}

/// Inverts a monotone spline: returns `x` such that the spline through
/// `values` equals `u`.
///
/// * `x`      - Node positions.
/// * `values` - Monotonically increasing function values.
/// * `u`      - Target value.
pub fn invert_catmull_rom(x: &[Float], values: &[Float], u: Float) -> Float {
    let n = x.len();
    if u <= values[0] {
        return x[0];
    } else if u >= values[n - 1] {
        return x[n - 1];
    }

    let i = find_interval(n, |i| values[i] <= u);
    let seg = SplineSegment::new(x, |j| values[j], n, i);

    let (mut a, mut b, mut t) = (0.0, 1.0, 0.5);
    for _ in 0..MAX_NEWTON_STEPS {
        if !(t > a && t < b) {
            t = 0.5 * (a + b);
        }

        let (f, df) = seg.value_and_derivative(t);
        if abs(f - u) < 1e-6 || b - a < 1e-6 {
            break;
        }

        if f - u < 0.0 {
            a = t;
        } else {
            b = t;
        }
        t -= (f - u) / df;
    }

    seg.x0 + t * seg.width
}

/// Samples the second dimension of a 2-D spline conditioned on the first.
/// Returns `(sample, fval, pdf)`.
///
/// * `nodes1` - Nodes along the conditioning dimension.
/// * `nodes2` - Nodes along the sampled dimension.
/// * `values` - Row-major function values, one row per `nodes1` entry.
/// * `cdf`    - Row-major running integrals of `values` rows.
/// * `alpha`  - Conditioning parameter.
/// * `u`      - Uniform random variate.
pub fn sample_catmull_rom_2d(
    nodes1: &[Float],
    nodes2: &[Float],
    values: &[Float],
    cdf: &[Float],
    alpha: Float,
    u: Float,
) -> (Float, Float, Float) {
    let size2 = nodes2.len();

    let (weights, offset) = match catmull_rom_weights(nodes1, alpha) {
        Some(w) => w,
        None => return (0.0, 0.0, 0.0),
    };

    let interpolate = |array: &[Float], idx: usize| -> Float {
        (0..4).fold(0.0, |acc, i| {
            if weights[i] != 0.0 {
                let row = (offset + i as isize) as usize;
                acc + array[row * size2 + idx] * weights[i]
            } else {
                acc
            }
        })
    };

    let maximum = interpolate(cdf, size2 - 1);
    if maximum <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let u = u * maximum;
    let idx = find_interval(size2, |i| interpolate(cdf, i) <= u);

    let seg = SplineSegment::new(nodes2, |j| interpolate(values, j), size2, idx);
    let u = (u - interpolate(cdf, idx)) / seg.width;
    let (t, fhat) = seg.invert_integral(u);

    (seg.x0 + seg.width * t, fhat, fhat / maximum)
}

/// Evaluates a truncated cosine series `Σ a_k cos(kΔφ)`, accumulating in
/// double precision.
///
/// * `a`       - Series coefficients.
/// * `cos_phi` - cos(Δφ).
pub fn fourier(a: &[Float], cos_phi: f64) -> Float {
    let mut value = 0.0_f64;
    let mut cos_k_minus_one_phi = cos_phi;
    let mut cos_k_phi = 1.0_f64;
    for &ak in a {
        value += ak as f64 * cos_k_phi;
        let cos_k_plus_one_phi = 2.0 * cos_phi * cos_k_phi - cos_k_minus_one_phi;
        cos_k_minus_one_phi = cos_k_phi;
        cos_k_phi = cos_k_plus_one_phi;
    }
    value as Float
}

/// Importance samples Δφ from a cosine series. Returns `(f, pdf, phi)`.
///
/// * `ak`    - Series coefficients; `ak[0]` must be positive.
/// * `recip` - Table of `1 / k`.
/// * `u`     - Uniform random variate.
#[allow(non_snake_case)]
pub fn sample_fourier(ak: &[Float], recip: &[Float], u: Float) -> (Float, Float, Float) {
    let m = ak.len();

    // The series is symmetric in φ; sample [0, π] and mirror half the time.
    let flip = u >= 0.5;
    let u = if flip { 1.0 - 2.0 * (u - 0.5) } else { u * 2.0 };

    let mut a: f64 = 0.0;
    let mut b = PI as f64;
    let mut phi = 0.5 * PI as f64;
    let mut f: f64 = ak[0] as f64;
    for _ in 0..MAX_NEWTON_STEPS {
        let cos_phi = phi.cos();
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
        let (mut cos_prev, mut cos_cur) = (cos_phi, 1.0_f64);
        let (mut sin_prev, mut sin_cur) = (-sin_phi, 0.0_f64);

        let mut F = ak[0] as f64 * phi;
        f = ak[0] as f64;
        for k in 1..m {
            let sin_next = 2.0 * cos_phi * sin_cur - sin_prev;
            let cos_next = 2.0 * cos_phi * cos_cur - cos_prev;
            sin_prev = sin_cur;
            sin_cur = sin_next;
            cos_prev = cos_cur;
            cos_cur = cos_next;

            F += ak[k] as f64 * recip[k] as f64 * sin_next;
            f += ak[k] as f64 * cos_next;
        }
        F -= (u * ak[0] * PI) as f64;

        if F > 0.0 {
            b = phi;
        } else {
            a = phi;
        }

        if F.abs() < 1e-6 || b - a < 1e-6 {
            break;
        }

        phi -= F / f;
        if !(phi > a && phi < b) {
            phi = 0.5 * (a + b);
        }
    }

    if flip {
        phi = TWO_PI as f64 - phi;
    }
    let pdf = (INV_TWO_PI as f64 * f / ak[0] as f64) as Float;
    (f as Float, pdf, phi as Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    const NODES: [Float; 6] = [0.0, 0.1, 0.3, 0.6, 1.0, 1.5];

    proptest! {
        #[test]
        fn weights_sum_to_one(x in 0.0..1.5f32) {
            let (w, _) = catmull_rom_weights(&NODES, x).unwrap();
            let sum: Float = w.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-4);
        }

        #[test]
        fn invert_recovers_position(x in 0.0..1.5f32) {
            // f(x) = x is reproduced exactly by the spline.
            let r = invert_catmull_rom(&NODES, &NODES, x);
            prop_assert!((r - x).abs() < 1e-3);
        }
    }

    #[test]
    fn weights_out_of_range() {
        assert!(catmull_rom_weights(&NODES, -0.1).is_none());
        assert!(catmull_rom_weights(&NODES, 1.6).is_none());
    }

    #[test]
    fn weights_at_nodes_select_node() {
        for (i, &x) in NODES.iter().enumerate() {
            let (w, offset) = catmull_rom_weights(&NODES, x).unwrap();
            for (k, wk) in w.iter().enumerate() {
                let node = offset + k as isize;
                let expected = if node == i as isize { 1.0 } else { 0.0 };
                assert!(approx_eq!(f32, *wk, expected, epsilon = 0.00001));
            }
        }
    }

    #[test]
    fn integrate_linear_function() {
        let values: Vec<Float> = NODES.iter().map(|x| 2.0 * x).collect();
        let (cdf, total) = integrate_catmull_rom(&NODES, &values);
        assert!(approx_eq!(f32, total, 2.25, epsilon = 0.0001));
        assert!(approx_eq!(f32, cdf[NODES.len() - 1], total, epsilon = 0.00001));
        assert!(cdf.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn fourier_constant_and_cosine() {
        assert!(approx_eq!(f32, fourier(&[2.0], 0.3), 2.0, epsilon = 0.00001));
        assert!(approx_eq!(f32, fourier(&[1.0, 0.5], 0.3), 1.15, epsilon = 0.00001));
        // cos(2φ) = 2cos²φ - 1
        assert!(approx_eq!(f32, fourier(&[0.0, 0.0, 1.0], 0.5), -0.5, epsilon = 0.00001));
    }

    #[test]
    fn sample_fourier_constant_series_is_uniform() {
        let recip = [0.0, 1.0, 0.5];
        let (f, pdf, phi) = sample_fourier(&[1.0, 0.0, 0.0], &recip, 0.25);
        assert!(approx_eq!(f32, f, 1.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, pdf, INV_TWO_PI, epsilon = 0.0001));
        assert!(approx_eq!(f32, phi, PI * 0.5, epsilon = 0.001));
    }

    #[test]
    fn sample_2d_stays_in_range() {
        let nodes1 = [0.0, 1.0];
        let values = [1.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let nodes2 = [0.0, 0.5, 1.0];
        let mut cdf = vec![];
        for row in values.chunks(3) {
            cdf.extend(integrate_catmull_rom(&nodes2, row).0);
        }
        for &u in &[0.0, 0.2, 0.5, 0.8, 0.99] {
            let (x, f, pdf) = sample_catmull_rom_2d(&nodes1, &nodes2, &values, &cdf, 0.5, u);
            assert!((0.0..=1.0).contains(&x));
            assert!(f > 0.0 && pdf > 0.0);
        }
    }
}
