//! Gaussian naive Bayes classifier

use super::Classifier;

/// Variance floor; a feature constant within a class would otherwise
/// produce a degenerate Gaussian.
const VAR_FLOOR: f64 = 1e-9;

/// Per-class Gaussian model over independent features
#[derive(Debug, Default)]
pub struct GaussianNaiveBayes {
    log_prior: [f64; 2],
    mean: [Vec<f64>; 2],
    var: [Vec<f64>; 2],
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    fn class_log_likelihood(&self, class: usize, x: &[f64]) -> f64 {
        let mut ll = self.log_prior[class];
        for (i, &xi) in x.iter().enumerate() {
            let mean = self.mean[class][i];
            let var = self.var[class][i];
            ll += -0.5 * (2.0 * std::f64::consts::PI * var).ln()
                - (xi - mean) * (xi - mean) / (2.0 * var);
        }
        ll
    }
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]) {
        let dim = x.first().map(|row| row.len()).unwrap_or(0);
        for class in 0..2 {
            let rows: Vec<&Vec<f64>> = x
                .iter()
                .zip(y)
                .filter(|(_, &label)| label as usize == class)
                .map(|(row, _)| row)
                .collect();
            let n = rows.len() as f64;
            self.log_prior[class] = (n / x.len() as f64).ln();

            let mut mean = vec![0.0; dim];
            for row in &rows {
                for (m, v) in mean.iter_mut().zip(row.iter()) {
                    *m += v;
                }
            }
            for m in mean.iter_mut() {
                *m /= n;
            }

            let mut var = vec![0.0; dim];
            for row in &rows {
                for ((v, &xi), &m) in var.iter_mut().zip(row.iter()).zip(mean.iter()) {
                    *v += (xi - m) * (xi - m);
                }
            }
            for v in var.iter_mut() {
                *v = (*v / n).max(VAR_FLOOR);
            }

            self.mean[class] = mean;
            self.var[class] = var;
        }
    }

    fn predict_proba(&self, x: &[f64]) -> (f64, f64) {
        let ll0 = self.class_log_likelihood(0, x);
        let ll1 = self.class_log_likelihood(1, x);
        // Normalize in log space to keep the exponentials finite
        let max = ll0.max(ll1);
        let e0 = (ll0 - max).exp();
        let e1 = (ll1 - max).exp();
        (e0 / (e0 + e1), e1 / (e0 + e1))
    }
}
