//! Shared species tables for the example cloud models.
//!
//! A small five-species ice inventory (H2O, CO, CO2, CH3OH, NH3) with
//! literature binding energies, laid out in a ten-row abundance matrix:
//! gas-phase rows first, ice rows second.

use ndarray::Array2;

use darkcloud_physics::{Fraction, SpeciesRelease, SublimationNetwork};

/// Species names, in table order.
pub const SPECIES: [&str; 5] = ["H2O", "CO", "CO2", "CH3OH", "NH3"];

/// Abundance-matrix rows of the gas-phase species.
pub const GAS_ROWS: [usize; 5] = [0, 1, 2, 3, 4];

/// Abundance-matrix rows of the ice-phase species.
pub const ICE_ROWS: [usize; 5] = [5, 6, 7, 8, 9];

/// Binding energies [K].
const BINDING_ENERGIES: [f64; 5] = [5770.0, 1150.0, 2990.0, 4930.0, 3130.0];

/// Molecular masses [amu].
const MASSES: [f64; 5] = [18.0, 28.0, 44.0, 32.0, 17.0];

/// Ice abundances relative to hydrogen for a well-developed dark cloud.
const ICE_ABUNDANCES: [f64; 5] = [1.0e-4, 4.0e-5, 2.0e-5, 5.0e-6, 6.0e-6];

/// Owns the per-species tables the borrowed network view points into.
pub struct SpeciesTables {
    mono: Vec<Fraction>,
    solid: Vec<SpeciesRelease>,
    volcanic: Vec<SpeciesRelease>,
}

impl SpeciesTables {
    /// Builds the demo tables.
    #[must_use]
    pub fn new() -> Self {
        let fraction = |value| Fraction::new(value).expect("demo fractions are in range");
        Self {
            // Most of each inventory desorbs monomolecularly at its own
            // sublimation temperature.
            mono: vec![
                fraction(1.0),
                fraction(0.9),
                fraction(0.9),
                fraction(0.9),
                fraction(0.9),
            ],
            // A few percent of the volatiles co-desorb when amorphous water
            // ice restructures around 20 K.
            solid: vec![
                SpeciesRelease {
                    species: 1,
                    fraction: fraction(0.05),
                },
                SpeciesRelease {
                    species: 2,
                    fraction: fraction(0.05),
                },
            ],
            // The volcanic crystallization event ejects trapped volatiles.
            volcanic: vec![
                SpeciesRelease {
                    species: 1,
                    fraction: fraction(0.5),
                },
                SpeciesRelease {
                    species: 2,
                    fraction: fraction(0.5),
                },
                SpeciesRelease {
                    species: 3,
                    fraction: fraction(0.5),
                },
                SpeciesRelease {
                    species: 4,
                    fraction: fraction(0.5),
                },
            ],
        }
    }

    /// A validated network view over these tables.
    #[must_use]
    pub fn network(&self) -> SublimationNetwork<'_> {
        SublimationNetwork::new(
            &ICE_ROWS,
            &GAS_ROWS,
            &BINDING_ENERGIES,
            &MASSES,
            &self.mono,
            &self.solid,
            &self.volcanic,
        )
        .expect("demo tables are consistent")
    }
}

impl Default for SpeciesTables {
    fn default() -> Self {
        Self::new()
    }
}

/// An abundance matrix (species × position) with the full inventory frozen
/// out at every position.
#[must_use]
pub fn initial_abundances(points: usize) -> Array2<f64> {
    let mut abundances = Array2::zeros((10, points));
    for (row, abundance) in ICE_ROWS.into_iter().zip(ICE_ABUNDANCES) {
        for position in 0..points {
            abundances[[row, position]] = abundance;
        }
    }
    abundances
}
