//! L2-regularized logistic regression
//!
//! Batch gradient descent from a zero initialization, so training is fully
//! deterministic. Regularization strength follows the C convention: the
//! penalty weight is `1 / (C * n)`.

use super::Classifier;

/// Inverse regularization strength
const C: f64 = 1.0;

/// Gradient descent step size
const LEARNING_RATE: f64 = 0.1;

/// Fixed iteration count
const MAX_ITER: usize = 1000;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Binary logistic regression model
#[derive(Debug, Default)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }

    fn decision(&self, x: &[f64]) -> f64 {
        let dot: f64 = self.weights.iter().zip(x).map(|(w, xi)| w * xi).sum();
        dot + self.bias
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]) {
        let n = x.len();
        let dim = x.first().map(|row| row.len()).unwrap_or(0);
        self.weights = vec![0.0; dim];
        self.bias = 0.0;
        if n == 0 {
            return;
        }
        let lambda = 1.0 / (C * n as f64);

        for _ in 0..MAX_ITER {
            let mut grad_w = vec![0.0; dim];
            let mut grad_b = 0.0;
            for (row, &label) in x.iter().zip(y) {
                let err = sigmoid(self.decision(row)) - f64::from(label);
                for (g, &xi) in grad_w.iter_mut().zip(row.iter()) {
                    *g += err * xi;
                }
                grad_b += err;
            }
            for (w, g) in self.weights.iter_mut().zip(grad_w.iter()) {
                *w -= LEARNING_RATE * (g / n as f64 + lambda * *w);
            }
            self.bias -= LEARNING_RATE * grad_b / n as f64;
        }
    }

    fn predict_proba(&self, x: &[f64]) -> (f64, f64) {
        let p1 = sigmoid(self.decision(x));
        (1.0 - p1, p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separable_classes() {
        let x = vec![
            vec![-1.0, -1.0],
            vec![-1.2, -0.8],
            vec![-0.8, -1.2],
            vec![1.0, 1.0],
            vec![1.2, 0.8],
            vec![0.8, 1.2],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        let mut lr = LogisticRegression::new();
        lr.fit(&x, &y);

        let (_, p1) = lr.predict_proba(&[1.0, 1.0]);
        assert!(p1 > 0.7, "p1 = {p1}");
        let (p0, _) = lr.predict_proba(&[-1.0, -1.0]);
        assert!(p0 > 0.7, "p0 = {p0}");
    }

    #[test]
    fn test_deterministic_training() {
        let x = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 2.0], vec![3.0, 1.0]];
        let y = vec![0, 1, 0, 1];
        let mut a = LogisticRegression::new();
        let mut b = LogisticRegression::new();
        a.fit(&x, &y);
        b.fit(&x, &y);
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let lr = LogisticRegression {
            weights: vec![0.5, -0.3],
            bias: 0.1,
        };
        let (p0, p1) = lr.predict_proba(&[1.0, 2.0]);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
    }
}
