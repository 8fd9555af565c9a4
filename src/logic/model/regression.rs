//! Regression Models - labeled reference implementations
//!
//! Both fit by batch gradient descent on min-max normalized inputs.
//! - `LinearRegression`: unpenalized least squares; its output is a regression-style
//!   signal, which is why scoring binarizes the magnitude
//! - `LogisticRegression`: L2-penalized (C = 0.1), sigmoid output in [0, 1]

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{RiskError, RiskResult};

use super::handle::LabeledModel;
use super::scaler::NormalizationParams;

// ============================================================================
// SHARED FIT
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    /// Scaled down by the largest squared row norm before use
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once every gradient component is below this
    pub tol: f64,
    /// Inverse regularization strength; infinite disables the penalty
    pub c: f64,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            max_iter: 2000,
            tol: 1e-6,
            c: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
struct Fitted {
    scaler: NormalizationParams,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl Fitted {
    fn linear(&self, name: &str, input: ArrayView1<f64>) -> RiskResult<f64> {
        if input.len() != self.scaler.width() {
            return Err(RiskError::model(
                name,
                format!("expected {} input columns, got {}", self.scaler.width(), input.len()),
            ));
        }
        let x = self.scaler.transform_row(input);
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Gradient descent over normalized features; `link` maps the linear
/// term to the prediction (identity or sigmoid)
fn fit(
    name: &str,
    params: &GradientDescent,
    features: &Array2<f64>,
    targets: &Array1<f64>,
    link: fn(f64) -> f64,
) -> RiskResult<Fitted> {
    let (n_samples, n_features) = features.dim();
    if n_samples == 0 {
        return Err(RiskError::model(name, "cannot fit with zero samples"));
    }
    if targets.len() != n_samples {
        return Err(RiskError::model(
            name,
            format!("{} rows but {} targets", n_samples, targets.len()),
        ));
    }

    let scaler = NormalizationParams::fit(features);
    let x = scaler.transform(features);
    let n = n_samples as f64;
    let lambda = 1.0 / params.c.max(1e-12);
    let max_sq_norm = x
        .rows()
        .into_iter()
        .map(|row| row.dot(&row))
        .fold(0.0, f64::max);
    let step = params.learning_rate / (1.0 + max_sq_norm + lambda / n);

    let mut coefficients = Array1::<f64>::zeros(n_features);
    let mut intercept = 0.0;

    for _ in 0..params.max_iter {
        let predictions = (x.dot(&coefficients) + intercept).mapv(link);
        let errors = &predictions - targets;

        let coef_grad = (x.t().dot(&errors) + &coefficients * lambda) / n;
        let intercept_grad = errors.sum() / n;

        coefficients.scaled_add(-step, &coef_grad);
        intercept -= step * intercept_grad;

        if intercept_grad.abs() < params.tol && coef_grad.iter().all(|g| g.abs() < params.tol) {
            break;
        }
    }

    Ok(Fitted {
        scaler,
        coefficients,
        intercept,
    })
}

// ============================================================================
// LINEAR REGRESSION
// ============================================================================

#[derive(Debug, Clone)]
pub struct LinearRegression {
    params: GradientDescent,
    fitted: Option<Fitted>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self {
            params: GradientDescent {
                c: f64::INFINITY,
                ..Default::default()
            },
            fitted: None,
        }
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LabeledModel for LinearRegression {
    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn train(&mut self, features: &Array2<f64>, targets: &Array1<f64>) -> RiskResult<()> {
        self.fitted = Some(fit(self.name(), &self.params, features, targets, |z| z)?);
        Ok(())
    }

    fn predict(&self, input: ArrayView1<f64>) -> RiskResult<f64> {
        self.fitted
            .as_ref()
            .ok_or_else(|| RiskError::NotTrained(self.name().to_string()))?
            .linear(self.name(), input)
    }
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    params: GradientDescent,
    fitted: Option<Fitted>,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LabeledModel for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn train(&mut self, features: &Array2<f64>, targets: &Array1<f64>) -> RiskResult<()> {
        self.fitted = Some(fit(self.name(), &self.params, features, targets, sigmoid)?);
        Ok(())
    }

    fn predict(&self, input: ArrayView1<f64>) -> RiskResult<f64> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| RiskError::NotTrained(self.name().to_string()))?;
        Ok(sigmoid(fitted.linear(self.name(), input)?))
    }
}
