//! Numerical integration of the cloud-collapse density equation.
//!
//! [`CollapseIntegrator`] advances the gas density of one position between
//! two output checkpoints by integrating the
//! [`CollapseLaw`](darkcloud_physics::CollapseLaw) rate equation with a
//! Runge–Kutta stepper. Domain errors raised by the rate law inside the
//! stepper are latched, the integration is aborted, and the error is
//! returned to the caller.

pub mod collapse;

pub use collapse::{CollapseIntegrator, Method, SolveError};
