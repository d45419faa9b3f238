//! Statistical primitives used by the profiler and the drift detector
//!
//! All functions are deterministic: inputs are summed in the order given
//! (or in sorted order where sorting is part of the algorithm), so identical
//! inputs always produce bit-identical outputs.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use driftlens_core::Histogram;

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        // The running sum overflowed; divide first
        Some(values.iter().map(|x| x / n).sum())
    }
}

/// Sample standard deviation (N - 1 denominator); `None` below two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let dof = (values.len() - 1) as f64;
    let sum_sq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    if sum_sq.is_finite() {
        return Some((sum_sq / dof).sqrt());
    }

    // Deviations or their squares overflowed: work on halved deviations
    // normalized by the largest one.
    let halved: Vec<f64> = values.iter().map(|x| x / 2.0 - mean / 2.0).collect();
    let scale = halved.iter().fold(0.0f64, |acc, d| acc.max(d.abs()));
    if scale == 0.0 {
        return Some(0.0);
    }
    let sum_sq: f64 = halved.iter().map(|d| (d / scale).powi(2)).sum();
    Some(2.0 * scale * (sum_sq / dof).sqrt())
}

/// Minimum and maximum; `None` for an empty slice
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

/// Equal-width histogram over `[min, max]`
///
/// Each value lands in `floor((v - min) / width)` clamped to the last bin,
/// so the maximum is counted in the final bin. When all values are equal
/// the range is widened to `[v - 0.5, v + 0.5]` so the bins keep a
/// positive width. Ranges wider than `f64::MAX` are binned on halved
/// values so every edge stays finite.
pub fn equal_width_histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let (min, max) = min_max(values)?;
    let (lo, hi) = if min == max { (min - 0.5, max + 0.5) } else { (min, max) };
    let scale = if (hi - lo).is_finite() { 1.0 } else { 0.5 };
    let lo_scaled = lo * scale;
    let width = (hi * scale - lo_scaled) / bins as f64;

    let mut bin_edges: Vec<f64> = (0..bins)
        .map(|i| (lo_scaled + i as f64 * width) / scale)
        .collect();
    bin_edges.push(hi);

    let mut counts = vec![0u64; bins];
    for &value in values {
        let idx = ((value * scale - lo_scaled) / width).floor();
        let idx = if idx < 0.0 { 0 } else { (idx as usize).min(bins - 1) };
        counts[idx] += 1;
    }

    Some(Histogram { bin_edges, counts })
}

/// Result of a two-sample Kolmogorov-Smirnov test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    /// Largest distance between the two empirical CDFs
    pub statistic: f64,

    /// Two-sided p-value
    pub p_value: f64,

    /// Whether the p-value came from the exact distribution
    pub exact: bool,
}

/// Two-sample, two-sided Kolmogorov-Smirnov test
///
/// Uses the exact null distribution when both samples have at most
/// `exact_limit` values and the Kolmogorov asymptotic distribution
/// otherwise. Returns `None` if either sample is empty.
pub fn ks_two_sample(baseline: &[f64], current: &[f64], exact_limit: usize) -> Option<KsResult> {
    if baseline.is_empty() || current.is_empty() {
        return None;
    }

    let mut a = baseline.to_vec();
    let mut b = current.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let m = a.len() as u64;
    let n = b.len() as u64;
    let scaled = ks_scaled_statistic(&a, &b);
    let statistic = scaled as f64 / (m * n) as f64;

    if scaled == 0 {
        return Some(KsResult { statistic, p_value: 1.0, exact: true });
    }

    let exact = a.len().max(b.len()) <= exact_limit;
    let p_value = if exact {
        ks_exact_p_value(a.len(), b.len(), scaled)
    } else {
        let en = (m * n) as f64 / (m + n) as f64;
        ks_asymptotic_p_value(statistic, en)
    };

    Some(KsResult {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
        exact,
    })
}

/// KS statistic scaled by `m * n`, i.e. `max |i * n - j * m|` over all
/// split points, where `i` and `j` count values `<= x` in each sample
///
/// Working in integers keeps ties and the exact lattice bound free of
/// rounding error.
fn ks_scaled_statistic(a: &[f64], b: &[f64]) -> u64 {
    let m = a.len() as i64;
    let n = b.len() as i64;
    let (mut i, mut j) = (0usize, 0usize);
    let mut d_max = 0i64;

    while i < a.len() && j < b.len() {
        let x = match a[i].total_cmp(&b[j]) {
            Ordering::Greater => b[j],
            _ => a[i],
        };
        while i < a.len() && a[i].total_cmp(&x) != Ordering::Greater {
            i += 1;
        }
        while j < b.len() && b[j].total_cmp(&x) != Ordering::Greater {
            j += 1;
        }
        d_max = d_max.max((i as i64 * n - j as i64 * m).abs());
    }

    d_max as u64
}

/// Exact two-sided p-value `P(D >= d)` for sample sizes `m` and `n`
///
/// Counts the fraction of monotone lattice paths from `(0, 0)` to `(m, n)`
/// that stay strictly inside `|i * n - j * m| < h`, where `h = d * m * n`.
/// Path counts are kept normalized by `C(i + j, i)` so the recurrence
/// never overflows.
fn ks_exact_p_value(m: usize, n: usize, h: u64) -> f64 {
    let h = h as i64;
    let (mi, ni) = (m as i64, n as i64);
    let inside = |i: usize, j: usize| (i as i64 * ni - j as i64 * mi).abs() < h;

    let mut row = vec![0.0f64; n + 1];
    row[0] = 1.0;
    for j in 1..=n {
        row[j] = if inside(0, j) { row[j - 1] } else { 0.0 };
    }

    for i in 1..=m {
        if !inside(i, 0) {
            row[0] = 0.0;
        }
        for j in 1..=n {
            if !inside(i, j) {
                row[j] = 0.0;
                continue;
            }
            let total = (i + j) as f64;
            row[j] = (i as f64 / total) * row[j] + (j as f64 / total) * row[j - 1];
        }
    }

    1.0 - row[n]
}

/// Asymptotic two-sided p-value from the Kolmogorov distribution, with
/// Stephens' small-sample correction on the effective size `en`
fn ks_asymptotic_p_value(d: f64, en: f64) -> f64 {
    let sqrt_en = en.sqrt();
    let lambda = (sqrt_en + 0.12 + 0.11 / sqrt_en) * d;
    kolmogorov_survival(lambda)
}

/// `Q(lambda) = 2 * sum_{k>=1} (-1)^(k-1) exp(-2 k^2 lambda^2)`
fn kolmogorov_survival(lambda: f64) -> f64 {
    // The series converges too slowly to be useful near zero, where Q is 1.
    if lambda < 0.2 {
        return 1.0;
    }
    let mut sum = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        sum += term;
        if term.abs() < 1e-12 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Base-2 Jensen-Shannon divergence between two frequency tables
///
/// Categories missing on one side get probability zero. The result lies in
/// `[0, 1]`. Returns `None` if either table is empty.
pub fn js_divergence(baseline: &BTreeMap<String, u64>, current: &BTreeMap<String, u64>) -> Option<f64> {
    let total_p: u64 = baseline.values().sum();
    let total_q: u64 = current.values().sum();
    if total_p == 0 || total_q == 0 {
        return None;
    }

    let mut categories: Vec<&String> = baseline.keys().chain(current.keys()).collect();
    categories.sort();
    categories.dedup();

    let mut kl_pm = 0.0;
    let mut kl_qm = 0.0;
    for category in categories {
        let p = baseline.get(category).copied().unwrap_or(0) as f64 / total_p as f64;
        let q = current.get(category).copied().unwrap_or(0) as f64 / total_q as f64;
        let m = 0.5 * (p + q);
        if p > 0.0 {
            kl_pm += p * (p / m).log2();
        }
        if q > 0.0 {
            kl_qm += q * (q / m).log2();
        }
    }

    Some((0.5 * kl_pm + 0.5 * kl_qm).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn moments() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        let std = sample_std(&values).unwrap();
        assert!((std - 2.138089935299395).abs() < 1e-12);
        assert_eq!(min_max(&values), Some((2.0, 9.0)));

        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn histogram_max_lands_in_last_bin() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let hist = equal_width_histogram(&values, 6).unwrap();

        assert_eq!(hist.bin_edges, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 1, 1, 2]);
    }

    #[test]
    fn moments_near_f64_max_stay_finite() {
        let values = [-1e308, 1e308];
        assert_eq!(mean(&values), Some(0.0));
        let std = sample_std(&values).unwrap();
        assert!(std.is_finite());
        assert!((std / (2.0f64.sqrt() * 1e308) - 1.0).abs() < 1e-12);

        let same_sign = [1.7e308, 1.7e308];
        assert_eq!(mean(&same_sign), Some(1.7e308));
        assert_eq!(sample_std(&same_sign), Some(0.0));
    }

    #[test]
    fn histogram_of_full_f64_range() {
        let hist = equal_width_histogram(&[-1e308, 1e308], 6).unwrap();

        assert!(hist.bin_edges.iter().all(|e| e.is_finite()));
        assert_eq!(hist.bin_edges[0], -1e308);
        assert_eq!(hist.bin_edges[6], 1e308);
        assert_eq!(hist.counts, vec![1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn histogram_of_constant_values() {
        let hist = equal_width_histogram(&[3.0, 3.0, 3.0], 6).unwrap();

        assert_eq!(hist.bin_edges.len(), 7);
        assert_eq!(hist.bin_edges[0], 2.5);
        assert_eq!(hist.bin_edges[6], 3.5);
        assert_eq!(hist.counts, vec![0, 0, 0, 3, 0, 0]);
    }

    #[test]
    fn ks_identical_samples() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let result = ks_two_sample(&values, &values, 10_000).unwrap();

        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn ks_exact_disjoint_small_samples() {
        // Only the two paths hugging the borders reach D = 1: p = 2 / C(6, 3).
        let result = ks_two_sample(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], 10_000).unwrap();
        assert_eq!(result.statistic, 1.0);
        assert!(result.exact);
        assert!((result.p_value - 0.1).abs() < 1e-12);

        let result = ks_two_sample(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[6.0, 7.0, 8.0, 9.0, 10.0],
            10_000,
        )
        .unwrap();
        assert!((result.p_value - 2.0 / 252.0).abs() < 1e-12);
    }

    #[test]
    fn ks_statistic_handles_ties() {
        // CDFs agree at every distinct value.
        let result = ks_two_sample(&[1.0, 1.0, 2.0, 2.0], &[1.0, 2.0], 10_000).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);

        let result = ks_two_sample(&[1.0, 1.0, 1.0, 2.0], &[1.0, 2.0, 2.0, 2.0], 10_000).unwrap();
        assert_eq!(result.statistic, 0.5);
    }

    #[test]
    fn ks_unequal_sizes_exact() {
        // m = 2, n = 4, D = 1: only paths through (2, 0) or (0, 4) are outside,
        // i.e. 2 of C(6, 2) = 15 paths.
        let result = ks_two_sample(&[0.0, 0.5], &[1.0, 2.0, 3.0, 4.0], 10_000).unwrap();
        assert_eq!(result.statistic, 1.0);
        assert!((result.p_value - 2.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn ks_asymptotic_path() {
        let a: Vec<f64> = (0..200).map(f64::from).collect();
        let b: Vec<f64> = (100..300).map(f64::from).collect();
        let result = ks_two_sample(&a, &b, 50).unwrap();

        assert!(!result.exact);
        assert!((result.statistic - 0.5).abs() < 1e-12);
        assert!(result.p_value < 1e-10);

        let same = ks_two_sample(&a, &a, 50).unwrap();
        assert_eq!(same.p_value, 1.0);
    }

    #[test]
    fn ks_empty_sample() {
        assert!(ks_two_sample(&[], &[1.0], 10).is_none());
    }

    #[test]
    fn js_identical_distributions_is_zero() {
        let p = counts(&[("red", 5), ("blue", 5)]);
        let q = counts(&[("red", 50), ("blue", 50)]);
        assert_eq!(js_divergence(&p, &q), Some(0.0));
    }

    #[test]
    fn js_known_value() {
        // P = (0.5, 0.5), Q = (1, 0), M = (0.75, 0.25)
        let p = counts(&[("red", 5), ("blue", 5)]);
        let q = counts(&[("red", 10)]);
        let expected = 0.5 * (0.5 * (0.5f64 / 0.75).log2() + 0.5 * (0.5f64 / 0.25).log2())
            + 0.5 * (1.0f64 / 0.75).log2();

        let js = js_divergence(&p, &q).unwrap();
        assert!((js - expected).abs() < 1e-12);
        assert!((js - 0.3112781244591328).abs() < 1e-9);
    }

    #[test]
    fn js_disjoint_support_is_one() {
        let p = counts(&[("a", 3)]);
        let q = counts(&[("b", 7)]);
        assert!((js_divergence(&p, &q).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn js_is_symmetric() {
        let p = counts(&[("a", 1), ("b", 3), ("c", 6)]);
        let q = counts(&[("a", 4), ("b", 4), ("d", 2)]);
        assert_eq!(js_divergence(&p, &q), js_divergence(&q, &p));
    }

    #[test]
    fn js_empty_table() {
        assert!(js_divergence(&BTreeMap::new(), &counts(&[("a", 1)])).is_none());
    }
}
