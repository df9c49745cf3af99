//! Physical conditions of a spherical gas cloud for astrochemical modeling.
//!
//! This crate computes the time-dependent physical state — density,
//! gas/dust temperature, column density, visual extinction, ice sublimation
//! status, and cosmic-ray ionization rate — at one or more radial positions
//! within a collapsing or static cloud. An external chemical-kinetics
//! integrator drives time forward and consumes these quantities when
//! evaluating its rate coefficients.
//!
//! The central type is [`PhysicsState`], which owns all per-position arrays
//! and exposes the lifecycle entry points:
//!
//! 1. [`PhysicsState::initialize`] — allocate and reset the run.
//! 2. [`PhysicsState::advance_target_time`] — pick the next output
//!    checkpoint on a log-staged schedule.
//! 3. [`PhysicsState::update_at_current_time`] — refresh column density,
//!    extinction, ionization, and temperature at one position.
//! 4. [`PhysicsState::apply_sublimation`] — run the staged desorption state
//!    machine against an externally owned abundance matrix.
//!
//! Species data (binding energies, masses, release fractions) is supplied
//! by the caller as a read-only [`SublimationNetwork`]; the engine has no
//! knowledge of the chemistry beyond these lookup tables.

pub mod config;
pub mod constants;
mod error;
mod fraction;
pub mod geometry;
pub mod ionization;
pub mod network;
pub mod rates;
pub mod schedule;
pub mod state;
pub mod sublimation;
pub mod temperature;

pub use config::{CloudConfig, CollapseMode, IonModel, Phase, StellarMassIndex};
pub use error::PhysicsError;
pub use fraction::{Fraction, FractionError};
pub use network::{SpeciesRelease, SublimationNetwork};
pub use rates::CollapseLaw;
pub use state::{PhysicsState, PositionState, TimeState};
pub use sublimation::{ChannelState, DesorptionChannels};
