//! Read-only views over the external species-network tables.
//!
//! The physics engine has no knowledge of the chemistry beyond these
//! per-species lookup tables, which are owned by the network-definition
//! collaborator and borrowed for the lifetime of a run.

use crate::{error::PhysicsError, fraction::Fraction};

/// One entry of a staged release list: an ice species (by its index into
/// the ice tables, not into the abundance matrix) and the fraction of its
/// inventory released when the channel fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesRelease {
    /// Index into the ice-species tables.
    pub species: usize,
    /// Fraction of the species' ice inventory moved to the gas phase.
    pub fraction: Fraction,
}

/// Borrowed per-species tables driving the sublimation state machine.
///
/// All per-species slices are parallel: entry `i` of each describes the
/// same ice species. `ice_species` and `gas_counterparts` hold row indices
/// into the externally owned abundance matrix.
#[derive(Debug, Clone, Copy)]
pub struct SublimationNetwork<'a> {
    ice_species: &'a [usize],
    gas_counterparts: &'a [usize],
    binding_energies: &'a [f64],
    masses: &'a [f64],
    mono_fractions: &'a [Fraction],
    solid_releases: &'a [SpeciesRelease],
    volcanic_releases: &'a [SpeciesRelease],
}

impl<'a> SublimationNetwork<'a> {
    /// Builds a validated view over the collaborator's tables.
    ///
    /// `binding_energies` are in Kelvin, `masses` in atomic mass units.
    ///
    /// # Errors
    ///
    /// Returns a configuration variant of [`PhysicsError`] if any
    /// per-species table length disagrees with `ice_species`, a release
    /// list addresses a species outside the tables, or a binding energy or
    /// mass is not strictly positive.
    pub fn new(
        ice_species: &'a [usize],
        gas_counterparts: &'a [usize],
        binding_energies: &'a [f64],
        masses: &'a [f64],
        mono_fractions: &'a [Fraction],
        solid_releases: &'a [SpeciesRelease],
        volcanic_releases: &'a [SpeciesRelease],
    ) -> Result<Self, PhysicsError> {
        let expected = ice_species.len();
        for (table, len) in [
            ("gas_counterparts", gas_counterparts.len()),
            ("binding_energies", binding_energies.len()),
            ("masses", masses.len()),
            ("mono_fractions", mono_fractions.len()),
        ] {
            if len != expected {
                return Err(PhysicsError::NetworkTableLength {
                    table,
                    len,
                    expected,
                });
            }
        }
        for release in solid_releases.iter().chain(volcanic_releases) {
            if release.species >= expected {
                return Err(PhysicsError::SpeciesIndexOutOfRange {
                    index: release.species,
                    limit: expected,
                });
            }
        }
        for (species, (&binding_energy, &mass)) in
            binding_energies.iter().zip(masses).enumerate()
        {
            if binding_energy <= 0.0 {
                return Err(PhysicsError::NonPositiveSpeciesQuantity {
                    species,
                    quantity: "binding energy",
                    value: binding_energy,
                });
            }
            if mass <= 0.0 {
                return Err(PhysicsError::NonPositiveSpeciesQuantity {
                    species,
                    quantity: "mass",
                    value: mass,
                });
            }
        }
        Ok(Self {
            ice_species,
            gas_counterparts,
            binding_energies,
            masses,
            mono_fractions,
            solid_releases,
            volcanic_releases,
        })
    }

    /// Number of tracked ice species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ice_species.len()
    }

    /// Whether the network tracks no ice species.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ice_species.is_empty()
    }

    /// Abundance-matrix row of ice species `i`.
    #[must_use]
    pub fn ice_row(&self, i: usize) -> usize {
        self.ice_species[i]
    }

    /// Abundance-matrix row of the gas-phase counterpart of species `i`.
    #[must_use]
    pub fn gas_row(&self, i: usize) -> usize {
        self.gas_counterparts[i]
    }

    /// Binding energy [K] of species `i`.
    #[must_use]
    pub fn binding_energy(&self, i: usize) -> f64 {
        self.binding_energies[i]
    }

    /// Mass [amu] of species `i`.
    #[must_use]
    pub fn mass(&self, i: usize) -> f64 {
        self.masses[i]
    }

    /// Default monotonic evaporation fractions, one per ice species.
    #[must_use]
    pub fn mono_fractions(&self) -> &'a [Fraction] {
        self.mono_fractions
    }

    /// The solid-channel release list.
    #[must_use]
    pub fn solid_releases(&self) -> &'a [SpeciesRelease] {
        self.solid_releases
    }

    /// The volcanic-channel release list.
    #[must_use]
    pub fn volcanic_releases(&self) -> &'a [SpeciesRelease] {
        self.volcanic_releases
    }

    /// Largest abundance-matrix row addressed by any table, if any.
    #[must_use]
    pub fn max_species_row(&self) -> Option<usize> {
        self.ice_species
            .iter()
            .chain(self.gas_counterparts)
            .copied()
            .max()
    }
}
