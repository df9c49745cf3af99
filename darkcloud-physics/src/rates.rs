//! Density rate laws for cloud collapse.

use crate::{
    config::{CloudConfig, CollapseMode},
    error::PhysicsError,
};

/// Prefactor of the freefall collapse law, `24·π·G·m_H` in cgs [cm³ g⁻¹ s⁻²
/// times the hydrogen mass], folded into a single constant.
const FREEFALL_PREFACTOR: f64 = 8.4e-30;

/// The density time-derivative of the cloud and its analytic Jacobian.
///
/// In [`CollapseMode::Freefall`] the density grows on the Rawlings et al.
/// (1992) freefall form
///
/// ```text
/// dn/dt = bc · (n⁴/n₀)^0.33 · (8.4e-30 · n₀ · ((n/n₀)^0.33 − 1))^0.5
/// ```
///
/// until `final_density` is reached, after which the derivative is zero. In
/// [`CollapseMode::Static`] the derivative is always zero.
///
/// Both functions are pure and cheap: a stiff external integrator may call
/// them many times per accepted step, including per Jacobian evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapseLaw {
    mode: CollapseMode,
    initial_density: f64,
    final_density: f64,
    bc: f64,
}

impl CollapseLaw {
    /// Builds the law from the run configuration.
    #[must_use]
    pub fn new(config: &CloudConfig) -> Self {
        Self {
            mode: config.collapse,
            initial_density: config.initial_density,
            final_density: config.final_density,
            bc: config.bc,
        }
    }

    /// Returns `dn/dt` [cm⁻³ s⁻¹] at the given density [cm⁻³].
    ///
    /// Zero once `density >= final_density` and always zero for a static
    /// cloud.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DensityBelowInitial`] if the density drops
    /// below the initial density under freefall, where the inner bracket of
    /// the collapse law turns negative. The legacy model silently produced
    /// NaN here; this implementation propagates the domain error instead.
    pub fn density_derivative(&self, density: f64) -> Result<f64, PhysicsError> {
        match self.mode {
            CollapseMode::Static => Ok(0.0),
            CollapseMode::Freefall => {
                if density >= self.final_density {
                    return Ok(0.0);
                }
                let bracket = self.bracket(density)?;
                Ok(self.bc * self.density_term(density) * bracket.sqrt())
            }
        }
    }

    /// Returns `∂(dn/dt)/∂n` [s⁻¹], the closed-form derivative of
    /// [`Self::density_derivative`], for integrators using analytic
    /// Jacobians.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DensityBelowInitial`] if `density` is at or
    /// below the initial density under freefall. The Jacobian diverges as
    /// the density approaches the initial density from above, which is why
    /// freefall runs start from a slightly perturbed density.
    pub fn density_derivative_jacobian(&self, density: f64) -> Result<f64, PhysicsError> {
        match self.mode {
            CollapseMode::Static => Ok(0.0),
            CollapseMode::Freefall => {
                if density >= self.final_density {
                    return Ok(0.0);
                }
                let bracket = self.bracket(density)?;
                if bracket <= 0.0 {
                    return Err(PhysicsError::DensityBelowInitial {
                        density,
                        initial: self.initial_density,
                    });
                }
                let term = self.density_term(density);
                let d_term = 1.32 * term / density;
                let d_bracket = 0.33 * FREEFALL_PREFACTOR
                    * (density / self.initial_density).powf(0.33)
                    * self.initial_density
                    / density;
                Ok(self.bc * (d_term * bracket.sqrt() + term * d_bracket / (2.0 * bracket.sqrt())))
            }
        }
    }

    /// `(n⁴/n₀)^0.33`.
    fn density_term(&self, density: f64) -> f64 {
        (density.powi(4) / self.initial_density).powf(0.33)
    }

    /// `8.4e-30 · n₀ · ((n/n₀)^0.33 − 1)`, the freefall bracket.
    fn bracket(&self, density: f64) -> Result<f64, PhysicsError> {
        if density < self.initial_density {
            return Err(PhysicsError::DensityBelowInitial {
                density,
                initial: self.initial_density,
            });
        }
        Ok(FREEFALL_PREFACTOR
            * self.initial_density
            * ((density / self.initial_density).powf(0.33) - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn freefall_law() -> CollapseLaw {
        CollapseLaw::new(&CloudConfig {
            collapse: CollapseMode::Freefall,
            initial_density: 1.0e2,
            final_density: 1.0e5,
            bc: 1.0,
            ..CloudConfig::default()
        })
    }

    #[test]
    fn static_cloud_never_collapses() {
        let law = CollapseLaw::new(&CloudConfig::default());
        assert_eq!(law.density_derivative(1.0e2).unwrap(), 0.0);
        assert_eq!(law.density_derivative(1.0e4).unwrap(), 0.0);
        assert_eq!(law.density_derivative_jacobian(1.0e4).unwrap(), 0.0);
    }

    #[test]
    fn derivative_is_positive_during_collapse() {
        let law = freefall_law();
        for density in [1.001e2, 1.0e3, 1.0e4, 9.9e4] {
            let dndt = law.density_derivative(density).unwrap();
            assert!(dndt > 0.0, "dn/dt at {density} cm^-3 was {dndt}");
        }
    }

    #[test]
    fn derivative_is_zero_at_and_past_final_density() {
        let law = freefall_law();
        assert_eq!(law.density_derivative(1.0e5).unwrap(), 0.0);
        assert_eq!(law.density_derivative(2.0e5).unwrap(), 0.0);
        assert_eq!(law.density_derivative_jacobian(1.0e5).unwrap(), 0.0);
    }

    #[test]
    fn derivative_rejects_density_below_initial() {
        let law = freefall_law();
        assert!(matches!(
            law.density_derivative(99.0),
            Err(PhysicsError::DensityBelowInitial { .. })
        ));
        assert!(matches!(
            law.density_derivative_jacobian(99.0),
            Err(PhysicsError::DensityBelowInitial { .. })
        ));
    }

    #[test]
    fn jacobian_matches_central_finite_difference() {
        let law = freefall_law();
        for density in [2.0e2, 1.0e3, 1.0e4, 5.0e4] {
            let h = density * 1.0e-6;
            let forward = law.density_derivative(density + h).unwrap();
            let backward = law.density_derivative(density - h).unwrap();
            let numeric = (forward - backward) / (2.0 * h);
            let analytic = law.density_derivative_jacobian(density).unwrap();
            assert_relative_eq!(analytic, numeric, max_relative = 1.0e-5);
        }
    }
}
