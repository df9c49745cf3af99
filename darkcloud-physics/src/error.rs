use thiserror::Error;

use crate::fraction::FractionError;

/// Errors raised by the physics engine.
///
/// Configuration problems are detected when a [`crate::PhysicsState`] is
/// built (or re-initialized) and are fatal to the run; no partial recovery
/// is attempted. The one numeric-domain variant,
/// [`PhysicsError::DensityBelowInitial`], replaces the legacy behavior of
/// silently producing an invalid floating-point result when the freefall
/// collapse law is evaluated outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PhysicsError {
    /// The cloud must be sampled at one or more radial positions.
    #[error("cloud must contain at least one radial position")]
    EmptyCloud,

    /// The cloud edge must lie outside the inner radius.
    #[error("cloud edge ({rout_pc} pc) must lie outside the inner radius ({rin_pc} pc)")]
    InvalidGeometry { rin_pc: f64, rout_pc: f64 },

    /// Density bounds must be positive with `final >= initial`.
    #[error("invalid density bounds: initial {initial} cm^-3, final {final_density} cm^-3")]
    InvalidDensityBounds { initial: f64, final_density: f64 },

    /// The stellar-mass index must address a row of the hot-core
    /// coefficient table.
    #[error("stellar mass index {index} is outside the coefficient table (1..={rows})")]
    StellarMassIndexOutOfRange { index: usize, rows: usize },

    /// A per-species network table does not match the ice species list.
    #[error("network table `{table}` has {len} entries, expected {expected}")]
    NetworkTableLength {
        table: &'static str,
        len: usize,
        expected: usize,
    },

    /// A release list refers to a species outside the ice tables, or an
    /// abundance matrix is too small for the network's row indices.
    #[error("species index {index} is out of range ({limit} available)")]
    SpeciesIndexOutOfRange { index: usize, limit: usize },

    /// A per-species physical quantity must be strictly positive.
    #[error("species {species}: {quantity} must be positive, got {value}")]
    NonPositiveSpeciesQuantity {
        species: usize,
        quantity: &'static str,
        value: f64,
    },

    /// A position index addressed a point outside the cloud.
    #[error("position {position} is outside the cloud ({points} positions)")]
    PositionOutOfRange { position: usize, points: usize },

    /// The freefall collapse law was evaluated below the initial density,
    /// where its inner bracket turns negative.
    #[error(
        "density {density} cm^-3 fell below the initial density {initial} cm^-3 during freefall"
    )]
    DensityBelowInitial { density: f64, initial: f64 },

    /// An invalid release fraction was supplied.
    #[error(transparent)]
    Fraction(#[from] FractionError),
}
