use std::f64::consts::E;

/// Logistic sigmoid, f(x) = 1 / (1 + e^-x), range (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Sigmoid derivative expressed in terms of the activation itself:
/// σ'(z) = y · (1 − y) for y = σ(z).
///
/// The layers store post-activation values only, so the backward pass never
/// needs the pre-activation z.
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}
