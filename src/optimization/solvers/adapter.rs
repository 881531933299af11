//! Adapters exposing plain objective closures as argmin problems.
//!
//! The solvers in this layer take objectives as closures returning
//! [`OptResult<f64>`]; these adapters wrap them into argmin's
//! [`CostFunction`] so the backend can drive them. Errors raised by an
//! objective are forwarded into the backend run and recovered afterwards by
//! the `From<argmin::core::Error>` conversion on
//! [`OptError`](crate::optimization::errors::OptError), so no error
//! information is lost crossing the boundary.
use crate::optimization::errors::{OptError, OptResult};
use argmin::core::CostFunction;

/// Univariate objective adapter (`Param = f64`).
pub struct ScalarObjective<F> {
    f: F,
}

impl<F> ScalarObjective<F>
where
    F: Fn(f64) -> OptResult<f64>,
{
    pub fn new(f: F) -> Self {
        ScalarObjective { f }
    }
}

impl<F> CostFunction for ScalarObjective<F>
where
    F: Fn(f64) -> OptResult<f64>,
{
    type Param = f64;
    type Output = f64;

    /// Evaluate the wrapped objective, rejecting non-finite values.
    fn cost(&self, x: &f64) -> Result<f64, argmin::core::Error> {
        let value = (self.f)(*x).map_err(argmin::core::Error::new)?;
        if !value.is_finite() {
            return Err(argmin::core::Error::new(OptError::NonFiniteObjective { value }));
        }
        Ok(value)
    }
}

/// Multivariate objective adapter (`Param = Vec<f64>`).
pub struct VectorObjective<F> {
    f: F,
}

impl<F> VectorObjective<F>
where
    F: Fn(&[f64]) -> OptResult<f64>,
{
    pub fn new(f: F) -> Self {
        VectorObjective { f }
    }
}

impl<F> CostFunction for VectorObjective<F>
where
    F: Fn(&[f64]) -> OptResult<f64>,
{
    type Param = Vec<f64>;
    type Output = f64;

    /// Evaluate the wrapped objective, rejecting non-finite values.
    fn cost(&self, x: &Vec<f64>) -> Result<f64, argmin::core::Error> {
        let value = (self.f)(x.as_slice()).map_err(argmin::core::Error::new)?;
        if !value.is_finite() {
            return Err(argmin::core::Error::new(OptError::NonFiniteObjective { value }));
        }
        Ok(value)
    }
}
