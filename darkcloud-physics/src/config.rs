use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Length, ThermodynamicTemperature},
    length::parsec,
    thermodynamic_temperature::kelvin,
};

use crate::{error::PhysicsError, temperature};

/// Evolutionary phase of the modeled cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// A cold cloud: temperatures stay at their initial values.
    Cold,
    /// An evolving hot core: gas heats on the radial/time profile.
    HotCore,
}

/// Density evolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapseMode {
    /// Density is held fixed at the initial value.
    Static,
    /// Density grows on the freefall collapse law until `final_density`.
    Freefall,
}

/// Cosmic-ray spectral model selecting the attenuation coefficient tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IonModel {
    /// Low cosmic-ray spectrum.
    L,
    /// High cosmic-ray spectrum.
    H,
}

/// A validated 1-based row index into the hot-core stellar-mass tables.
///
/// The heating coefficients and desorption trigger temperatures are
/// tabulated for six central stellar masses (1, 5, 10, 15, 25, and 60 solar
/// masses). Construction fails for any index outside `1..=6`, so a held
/// `StellarMassIndex` can be used for table lookups without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct StellarMassIndex(usize);

impl StellarMassIndex {
    /// Creates an index, checking it against the table size.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::StellarMassIndexOutOfRange`] if `index` is
    /// not in `1..=6`.
    pub fn new(index: usize) -> Result<Self, PhysicsError> {
        if (1..=temperature::STELLAR_MASS_ROWS).contains(&index) {
            Ok(Self(index))
        } else {
            Err(PhysicsError::StellarMassIndexOutOfRange {
                index,
                rows: temperature::STELLAR_MASS_ROWS,
            })
        }
    }

    /// Returns the 1-based index.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    /// Returns the 0-based table row.
    pub(crate) fn row(self) -> usize {
        self.0 - 1
    }
}

impl TryFrom<usize> for StellarMassIndex {
    type Error = PhysicsError;
    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<StellarMassIndex> for usize {
    fn from(index: StellarMassIndex) -> Self {
        index.0
    }
}

/// Immutable per-run configuration of the cloud model.
///
/// Quantities carried as raw `f64` follow the cgs conventions of the
/// astrochemical literature: number densities in cm⁻³, extinction in
/// magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Number of radial positions, ordered from cloud center to edge.
    pub points: usize,

    /// Evolutionary phase.
    pub phase: Phase,

    /// Density evolution mode.
    pub collapse: CollapseMode,

    /// When set, the first sublimation call moves all ice into the gas
    /// phase. Fires at most once per run.
    pub instant_sublimation: bool,

    /// Track the cosmic-ray H2 photo-dissociation rate alongside `zeta`.
    pub h2_dissociation: bool,

    /// Bypass the built-in desorption model entirely; ice chemistry is
    /// handled elsewhere by a three-phase network.
    pub three_phase_ice: bool,

    /// Cosmic-ray spectral model.
    pub ion_model: IonModel,

    /// Row of the hot-core stellar-mass coefficient tables.
    pub stellar_mass: StellarMassIndex,

    /// Inner radius of the cloud.
    pub rin: Length,

    /// Outer radius (edge) of the cloud.
    pub rout: Length,

    /// Baseline visual extinction external to the cloud [mag].
    pub base_av: f64,

    /// Magnetic retardation factor on the freefall collapse rate.
    pub bc: f64,

    /// Initial gas number density [cm⁻³].
    pub initial_density: f64,

    /// Density at which collapse halts [cm⁻³].
    pub final_density: f64,

    /// Gas temperature at the start of the run.
    pub initial_temperature: ThermodynamicTemperature,

    /// Upper bound on the hot-core gas temperature.
    pub max_temperature: ThermodynamicTemperature,

    /// User scale factor applied to the cosmic-ray ionization rate.
    pub zeta_scale: f64,
}

impl CloudConfig {
    /// Checks the configuration invariants that the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns a configuration variant of [`PhysicsError`] if the cloud has
    /// no positions, the geometry is inverted, or the density bounds are
    /// non-positive or ordered backwards.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.points == 0 {
            return Err(PhysicsError::EmptyCloud);
        }
        if self.rout <= self.rin {
            return Err(PhysicsError::InvalidGeometry {
                rin_pc: self.rin.get::<parsec>(),
                rout_pc: self.rout.get::<parsec>(),
            });
        }
        if self.initial_density <= 0.0 || self.final_density < self.initial_density {
            return Err(PhysicsError::InvalidDensityBounds {
                initial: self.initial_density,
                final_density: self.final_density,
            });
        }
        Ok(())
    }
}

impl Default for CloudConfig {
    /// A single-point static cold cloud with the documented model defaults.
    fn default() -> Self {
        Self {
            points: 1,
            phase: Phase::Cold,
            collapse: CollapseMode::Static,
            instant_sublimation: false,
            h2_dissociation: false,
            three_phase_ice: false,
            ion_model: IonModel::L,
            stellar_mass: StellarMassIndex(1),
            rin: Length::new::<parsec>(0.0),
            rout: Length::new::<parsec>(0.05),
            base_av: 2.0,
            bc: 1.0,
            initial_density: 1.0e2,
            final_density: 1.0e5,
            initial_temperature: ThermodynamicTemperature::new::<kelvin>(10.0),
            max_temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
            zeta_scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CloudConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_cloud() {
        let config = CloudConfig {
            points: 0,
            ..CloudConfig::default()
        };
        assert_eq!(config.validate(), Err(PhysicsError::EmptyCloud));
    }

    #[test]
    fn rejects_inverted_geometry() {
        let config = CloudConfig {
            rin: Length::new::<parsec>(0.1),
            rout: Length::new::<parsec>(0.05),
            ..CloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PhysicsError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn rejects_backwards_density_bounds() {
        let config = CloudConfig {
            initial_density: 1.0e5,
            final_density: 1.0e2,
            ..CloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PhysicsError::InvalidDensityBounds { .. })
        ));
    }

    #[test]
    fn stellar_mass_index_bounds() {
        assert!(StellarMassIndex::new(1).is_ok());
        assert!(StellarMassIndex::new(6).is_ok());
        assert!(matches!(
            StellarMassIndex::new(0),
            Err(PhysicsError::StellarMassIndexOutOfRange { .. })
        ));
        assert!(matches!(
            StellarMassIndex::new(7),
            Err(PhysicsError::StellarMassIndexOutOfRange { .. })
        ));
    }
}
