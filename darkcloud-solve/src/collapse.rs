//! Density integration between output checkpoints.

use std::{cell::RefCell, rc::Rc};

use ode_solvers::{SVector, System, dop_shared::IntegrationError};
use thiserror::Error;
use uom::si::{f64::Time, time::second};

use darkcloud_physics::{CollapseLaw, PhysicsError};

/// Error returned by [`CollapseIntegrator::advance`].
///
/// Wraps numerical integration failures and domain errors raised by the
/// collapse rate law.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error("integration produced no output steps")]
    NoOutput,
}

/// Supported numerical integration methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Classic fixed-step 4th-order Runge–Kutta method.
    ///
    /// Step size is the integrator's configured step; no error control.
    /// Adequate for the collapse equation, which is smooth and only mildly
    /// stiff away from the initial density.
    Rk4,

    /// Adaptive Dormand–Prince 5(4) Runge–Kutta method.
    ///
    /// Adjusts its internal step to keep the local error within `abs_tol`
    /// and `rel_tol`. The recommended default for collapse runs.
    Dopri5 { abs_tol: f64, rel_tol: f64 },

    /// Adaptive Dormand–Prince 8(5,3) Runge–Kutta method.
    ///
    /// Higher order per step than `Dopri5`; useful when a run integrates
    /// over very long intervals with tight tolerances.
    Dop853 { abs_tol: f64, rel_tol: f64 },
}

/// Advances the gas density of one position along the collapse rate law.
///
/// The integrator is stateless between calls: each [`advance`] integrates
/// the density from one checkpoint to the next and returns the endpoint
/// value. The caller stores the result back into its physical state.
///
/// [`advance`]: Self::advance
#[derive(Debug, Clone, Copy)]
pub struct CollapseIntegrator {
    law: CollapseLaw,
    method: Method,
    step: Time,
}

impl CollapseIntegrator {
    /// Creates an integrator for a collapse law.
    ///
    /// `step` is the fixed step for [`Method::Rk4`] and the output step for
    /// the adaptive methods.
    #[must_use]
    pub fn new(law: CollapseLaw, method: Method, step: Time) -> Self {
        Self { law, method, step }
    }

    /// Integrates the density from `from` to `to`, returning the density at
    /// the endpoint.
    ///
    /// Returns the input density unchanged when the interval is empty or
    /// reversed.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Physics`] if the rate law rejects a density the
    /// stepper visits, or [`SolveError::Integration`] if the numerical
    /// solver itself fails.
    pub fn advance(&self, density: f64, from: Time, to: Time) -> Result<f64, SolveError> {
        let x_start = from.get::<second>();
        let x_end = to.get::<second>();
        if x_end <= x_start {
            return Ok(density);
        }

        let domain_error = Rc::new(RefCell::new(None));
        let system = CollapseSystem {
            law: self.law,
            domain_error: Rc::clone(&domain_error),
        };
        let y_start = SVector::<f64, 1>::new(density);
        let dx = self.step.get::<second>();

        let (outcome, y_out) = match self.method {
            Method::Rk4 => {
                let mut stepper = ode_solvers::Rk4::new(system, x_start, y_start, x_end, dx);
                let outcome = stepper.integrate();
                (outcome, stepper.y_out().clone())
            }
            Method::Dopri5 { abs_tol, rel_tol } => {
                let mut stepper = ode_solvers::Dopri5::new(
                    system, x_start, x_end, dx, y_start, rel_tol, abs_tol,
                );
                let outcome = stepper.integrate();
                (outcome, stepper.y_out().clone())
            }
            Method::Dop853 { abs_tol, rel_tol } => {
                let mut stepper = ode_solvers::Dop853::new(
                    system, x_start, x_end, dx, y_start, rel_tol, abs_tol,
                );
                let outcome = stepper.integrate();
                (outcome, stepper.y_out().clone())
            }
        };

        // A latched rate-law error takes precedence: the stepper may have
        // failed on the NaN poison before `solout` could abort cleanly.
        if let Some(err) = domain_error.borrow_mut().take() {
            return Err(err.into());
        }
        outcome?;

        y_out.last().map(|y| y[0]).ok_or(SolveError::NoOutput)
    }
}

/// Adapts the collapse law into an ODE solver system.
///
/// A domain error from the rate law is latched, the derivative is poisoned
/// with NaN, and `solout` aborts the integration on the next step.
struct CollapseSystem {
    law: CollapseLaw,
    domain_error: Rc<RefCell<Option<PhysicsError>>>,
}

impl System<f64, SVector<f64, 1>> for CollapseSystem {
    fn system(&self, _x: f64, y: &SVector<f64, 1>, dy: &mut SVector<f64, 1>) {
        match self.law.density_derivative(y[0]) {
            Ok(derivative) => dy[0] = derivative,
            Err(e) => {
                *self.domain_error.borrow_mut() = Some(e);
                dy[0] = f64::NAN;
            }
        }
    }

    fn solout(&mut self, _x: f64, _y: &SVector<f64, 1>, _dy: &SVector<f64, 1>) -> bool {
        self.domain_error.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::time::year;

    use darkcloud_physics::{CloudConfig, CollapseMode};

    use super::*;

    fn years(t: f64) -> Time {
        Time::new::<year>(t)
    }

    fn freefall_law() -> CollapseLaw {
        CollapseLaw::new(&CloudConfig {
            collapse: CollapseMode::Freefall,
            initial_density: 1.0e2,
            final_density: 1.0e5,
            ..CloudConfig::default()
        })
    }

    fn adaptive() -> Method {
        Method::Dopri5 {
            abs_tol: 1.0e-8,
            rel_tol: 1.0e-8,
        }
    }

    #[test]
    fn static_cloud_density_is_constant() {
        let law = CollapseLaw::new(&CloudConfig::default());
        let integrator = CollapseIntegrator::new(law, adaptive(), years(100.0));
        let density = integrator.advance(1.0e2, years(0.0), years(1.0e6)).unwrap();
        assert_relative_eq!(density, 1.0e2);
    }

    #[test]
    fn freefall_density_grows_monotonically() {
        let integrator = CollapseIntegrator::new(freefall_law(), adaptive(), years(100.0));
        let mut density = 1.001e2;
        let mut previous = density;
        for step in 0..10 {
            let from = years(f64::from(step) * 1.0e5);
            let to = years(f64::from(step + 1) * 1.0e5);
            density = integrator.advance(density, from, to).unwrap();
            assert!(density > previous, "density must grow during collapse");
            previous = density;
        }
        assert!(density < 1.0e5);
    }

    #[test]
    fn adaptive_and_fixed_step_agree() {
        let law = freefall_law();
        let fine = CollapseIntegrator::new(law, Method::Rk4, years(10.0));
        let adaptive = CollapseIntegrator::new(law, adaptive(), years(100.0));

        let from_fixed = fine.advance(1.0e3, years(0.0), years(1.0e5)).unwrap();
        let from_adaptive = adaptive.advance(1.0e3, years(0.0), years(1.0e5)).unwrap();
        assert_relative_eq!(from_fixed, from_adaptive, max_relative = 1.0e-5);
    }

    #[test]
    fn density_holds_at_final_density() {
        let integrator = CollapseIntegrator::new(freefall_law(), adaptive(), years(100.0));
        let density = integrator.advance(1.0e5, years(0.0), years(1.0e6)).unwrap();
        assert_relative_eq!(density, 1.0e5);
    }

    #[test]
    fn empty_interval_returns_input_density() {
        let integrator = CollapseIntegrator::new(freefall_law(), adaptive(), years(100.0));
        let density = integrator.advance(5.0e3, years(100.0), years(100.0)).unwrap();
        assert_relative_eq!(density, 5.0e3);
    }

    #[test]
    fn domain_error_aborts_the_integration() {
        let integrator = CollapseIntegrator::new(freefall_law(), adaptive(), years(100.0));
        // Below the initial density the rate law has no real solution.
        let result = integrator.advance(50.0, years(0.0), years(1.0e4));
        assert!(matches!(
            result,
            Err(SolveError::Physics(PhysicsError::DensityBelowInitial { .. }))
        ));
    }
}
