//! Column-density-dependent cosmic-ray ionization and H2 dissociation.
//!
//! Rates follow degree-9 polynomial fits in `log10(N)` to the attenuated
//! cosmic-ray models L and H of Padovani et al. (2018), valid for column
//! densities between 1e19 and 1e27 cm⁻². Inputs outside the fitted range
//! are clamped to its edges, since the polynomials diverge beyond them.
//!
//! Both entry points are pure functions of the column density and must be
//! re-evaluated whenever it changes; nothing here is cached.

use crate::{config::IonModel, constants::ZETA_REFERENCE_RATE};

/// Lower edge of the fitted range, `log10(N [cm⁻²])`.
const LOG_COLUMN_MIN: f64 = 19.0;

/// Upper edge of the fitted range, `log10(N [cm⁻²])`.
const LOG_COLUMN_MAX: f64 = 27.0;

/// `log10(zeta)` fit coefficients, model L, ascending powers of `log10(N)`.
const ZETA_COEFFS_L: [f64; 10] = [
    6.904518862491e+06,
    -2.788249177380e+06,
    4.994434370079e+05,
    -5.208131994686e+04,
    3.484176453150e+03,
    -1.550667693761e+02,
    4.591149173067e+00,
    -8.719621646382e-02,
    9.639043752149e-04,
    -4.725154312707e-06,
];

/// `log10(zeta)` fit coefficients, model H.
const ZETA_COEFFS_H: [f64; 10] = [
    6.904525099391e+06,
    -2.788249648680e+06,
    4.994434487079e+05,
    -5.208132004686e+04,
    3.484176453150e+03,
    -1.550667693761e+02,
    4.591149173067e+00,
    -8.719621646381e-02,
    9.639043752148e-04,
    -4.725154312706e-06,
];

/// `log10` H2 dissociation-rate fit coefficients, model L.
const DISSOCIATION_COEFFS_L: [f64; 10] = [
    6.904517849649e+06,
    -2.788249157381e+06,
    4.994434370079e+05,
    -5.208131994686e+04,
    3.484176453150e+03,
    -1.550667693761e+02,
    4.591149173067e+00,
    -8.719621646382e-02,
    9.639043752149e-04,
    -4.725154312707e-06,
];

/// `log10` H2 dissociation-rate fit coefficients, model H.
const DISSOCIATION_COEFFS_H: [f64; 10] = [
    6.904524086549e+06,
    -2.788249628681e+06,
    4.994434487079e+05,
    -5.208132004686e+04,
    3.484176453150e+03,
    -1.550667693761e+02,
    4.591149173067e+00,
    -8.719621646382e-02,
    9.639043752149e-04,
    -4.725154312707e-06,
];

/// Evaluates a fit table at a column density [cm⁻²], returning the rate
/// [s⁻¹] it encodes.
fn evaluate(coefficients: &[f64; 10], column_density: f64) -> f64 {
    let x = column_density
        .max(f64::MIN_POSITIVE)
        .log10()
        .clamp(LOG_COLUMN_MIN, LOG_COLUMN_MAX);
    let log_rate = coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c);
    10.0_f64.powf(log_rate)
}

/// The cosmic-ray ionization rate multiplier `zeta` at a column density.
///
/// The fitted rate is normalized by the reference rate 1.3e-17 s⁻¹ and
/// scaled by the user's `zeta_scale`, yielding the dimensionless multiplier
/// the kinetics integrator applies to its cosmic-ray-driven reactions.
#[must_use]
pub fn ionization_scale(column_density: f64, model: IonModel, zeta_scale: f64) -> f64 {
    let coefficients = match model {
        IonModel::L => &ZETA_COEFFS_L,
        IonModel::H => &ZETA_COEFFS_H,
    };
    evaluate(coefficients, column_density) / ZETA_REFERENCE_RATE * zeta_scale
}

/// The cosmic-ray H2 photo-dissociation rate [s⁻¹] at a column density.
///
/// Same polynomial evaluation as [`ionization_scale`] against a second
/// coefficient table; unnormalized, scaled by the same user factor. Only
/// meaningful when H2 dissociation tracking is enabled for the run.
#[must_use]
pub fn dissociation_rate(column_density: f64, model: IonModel, zeta_scale: f64) -> f64 {
    let coefficients = match model {
        IonModel::L => &DISSOCIATION_COEFFS_L,
        IonModel::H => &DISSOCIATION_COEFFS_H,
    };
    evaluate(coefficients, column_density) * zeta_scale
}
