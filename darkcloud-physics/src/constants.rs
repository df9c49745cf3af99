//! Physical constants and model thresholds, in cgs convention.

/// Boltzmann constant [erg K⁻¹].
pub const K_BOLTZ: f64 = 1.380_649e-16;

/// Atomic mass unit [g].
pub const AMU: f64 = 1.660_539_068_92e-24;

/// Grain surface binding-site density [cm⁻²].
pub const SURFACE_SITE_DENSITY: f64 = 1.5e15;

/// Hydrogen column density per magnitude of visual extinction [cm⁻²].
pub const COLUMN_PER_AV: f64 = 1.6e21;

/// Reference cosmic-ray ionization rate used to normalize `zeta` [s⁻¹].
pub const ZETA_REFERENCE_RATE: f64 = 1.3e-17;

/// Ice abundance floor; below this a position is treated as ice-depleted.
pub const MIN_ICE_ABUNDANCE: f64 = 1e-30;

/// Desorption rate constant above which a species leaves the grain within a
/// single model step [s⁻¹].
pub const DESORPTION_RATE_THRESHOLD: f64 = 0.99;
