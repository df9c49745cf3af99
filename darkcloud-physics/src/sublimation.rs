//! The staged ice-sublimation (desorption) state machine.
//!
//! Each radial position carries three independent desorption channels
//! (solid, volcanic, co-desorption) that progress strictly forward through
//! [`ChannelState`]. A call to [`SublimationMachine::apply`] evaluates the
//! transition rules once against one position's column of the abundance
//! matrix, in a fixed order: instant sublimation, staged triggers, solid
//! release, binding-energy-driven evaporation, volcanic release, and
//! finally co-desorption of everything left. Later stages must see the
//! reduced ice inventory left by earlier ones within the same call.

use std::f64::consts::PI;

use ndarray::Array2;

use crate::{
    config::StellarMassIndex,
    constants::{AMU, DESORPTION_RATE_THRESHOLD, K_BOLTZ, MIN_ICE_ABUNDANCE, SURFACE_SITE_DENSITY},
    fraction::Fraction,
    network::{SpeciesRelease, SublimationNetwork},
    temperature::DesorptionTriggers,
};

/// Progress of one desorption channel at one position.
///
/// Transitions are one-directional — `Pending → Triggered → Done` — and are
/// reset only by a full re-initialization of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    /// The channel's trigger temperature has not been reached.
    #[default]
    Pending,
    /// The trigger temperature has been exceeded; the release happens on
    /// the next evaluation.
    Triggered,
    /// The release has happened; the channel never fires again.
    Done,
}

impl ChannelState {
    /// Promotes `Pending` to `Triggered` when `condition` holds.
    fn trigger_if(&mut self, condition: bool) {
        if *self == Self::Pending && condition {
            *self = Self::Triggered;
        }
    }
}

/// The three per-position desorption channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DesorptionChannels {
    pub solid: ChannelState,
    pub volcanic: ChannelState,
    pub co_desorption: ChannelState,
}

/// Evaluates the staged desorption rules against an abundance matrix.
#[derive(Debug, Clone, Copy)]
pub struct SublimationMachine<'a> {
    network: SublimationNetwork<'a>,
    triggers: DesorptionTriggers,
}

impl<'a> SublimationMachine<'a> {
    /// Builds the machine for a network and a stellar-mass table row.
    #[must_use]
    pub fn new(network: SublimationNetwork<'a>, stellar_mass: StellarMassIndex) -> Self {
        Self {
            network,
            triggers: DesorptionTriggers::for_stellar_mass(stellar_mass),
        }
    }

    /// The network view the machine operates on.
    #[must_use]
    pub fn network(&self) -> &SublimationNetwork<'a> {
        &self.network
    }

    /// Runs one evaluation of the transition rules at `position`.
    ///
    /// `mono_remaining` is the position's per-species
    /// monotonic-evaporation-fraction-remaining vector; entries are
    /// decremented to zero and never replenished. `instant_pending` is the
    /// run-global one-shot instant-sublimation latch; when set, the entire
    /// ice inventory moves to the gas phase and the latch clears.
    ///
    /// No-op when the co-desorption channel is already done or when the
    /// total ice abundance at the position is at the ice-depleted floor.
    pub fn apply(
        &self,
        channels: &mut DesorptionChannels,
        mono_remaining: &mut [f64],
        gas_temperature_k: f64,
        instant_pending: &mut bool,
        abundances: &mut Array2<f64>,
        position: usize,
    ) {
        if channels.co_desorption == ChannelState::Done {
            return;
        }
        if self.total_ice(abundances, position) <= MIN_ICE_ABUNDANCE {
            return;
        }

        if *instant_pending {
            *instant_pending = false;
            self.release_all(abundances, position);
            return;
        }

        channels
            .solid
            .trigger_if(gas_temperature_k > self.triggers.solid);
        channels
            .volcanic
            .trigger_if(gas_temperature_k > self.triggers.volcanic);
        channels
            .co_desorption
            .trigger_if(gas_temperature_k > self.triggers.co_desorption);

        if channels.solid == ChannelState::Triggered {
            self.release_list(self.network.solid_releases(), abundances, position);
            channels.solid = ChannelState::Done;
        }

        self.monotonic_evaporation(mono_remaining, gas_temperature_k, abundances, position);

        if channels.volcanic == ChannelState::Triggered {
            self.release_list(self.network.volcanic_releases(), abundances, position);
            channels.volcanic = ChannelState::Done;
        }

        if channels.co_desorption == ChannelState::Triggered {
            self.release_all(abundances, position);
            channels.co_desorption = ChannelState::Done;
        }
    }

    /// Total ice abundance at a position.
    fn total_ice(&self, abundances: &Array2<f64>, position: usize) -> f64 {
        (0..self.network.len())
            .map(|i| abundances[[self.network.ice_row(i), position]])
            .sum()
    }

    /// Moves every ice species entirely into its gas-phase counterpart,
    /// flooring the ice at the depleted threshold.
    fn release_all(&self, abundances: &mut Array2<f64>, position: usize) {
        for i in 0..self.network.len() {
            let ice = abundances[[self.network.ice_row(i), position]];
            abundances[[self.network.gas_row(i), position]] += ice;
            abundances[[self.network.ice_row(i), position]] = MIN_ICE_ABUNDANCE;
        }
    }

    /// Moves a fraction of one species' ice into its gas-phase counterpart.
    fn release_fraction(
        &self,
        species: usize,
        fraction: Fraction,
        abundances: &mut Array2<f64>,
        position: usize,
    ) {
        let ice = abundances[[self.network.ice_row(species), position]];
        abundances[[self.network.gas_row(species), position]] += fraction * ice;
        abundances[[self.network.ice_row(species), position]] = fraction.complement() * ice;
    }

    /// Applies one channel's fixed-fraction release list.
    fn release_list(
        &self,
        releases: &[SpeciesRelease],
        abundances: &mut Array2<f64>,
        position: usize,
    ) {
        for release in releases {
            self.release_fraction(release.species, release.fraction, abundances, position);
        }
    }

    /// Binding-energy-driven monotonic evaporation.
    ///
    /// A species whose first-order desorption rate constant exceeds the
    /// rate threshold is effectively instantaneous on the model time step:
    /// its remaining monotonic fraction is released and zeroed so it cannot
    /// re-trigger.
    fn monotonic_evaporation(
        &self,
        mono_remaining: &mut [f64],
        gas_temperature_k: f64,
        abundances: &mut Array2<f64>,
        position: usize,
    ) {
        for (species, remaining) in mono_remaining.iter_mut().enumerate() {
            if *remaining <= 0.0 {
                continue;
            }
            let rate = desorption_rate_constant(
                self.network.binding_energy(species),
                self.network.mass(species),
                gas_temperature_k,
            );
            if rate > DESORPTION_RATE_THRESHOLD {
                let fraction = Fraction::new(*remaining)
                    .expect("mono fractions start in [0, 1] and only shrink");
                self.release_fraction(species, fraction, abundances, position);
                *remaining = 0.0;
            }
        }
    }
}

/// First-order thermal desorption rate constant `k = ν·exp(−E_b/T)` [s⁻¹],
/// with the characteristic vibration frequency
/// `ν = sqrt(2·n_s·E_b·k_B / (π²·m))` (Hasegawa et al. 1992).
#[must_use]
pub fn desorption_rate_constant(
    binding_energy_k: f64,
    mass_amu: f64,
    gas_temperature_k: f64,
) -> f64 {
    let nu = (2.0 * SURFACE_SITE_DENSITY * binding_energy_k * K_BOLTZ / (PI * PI * mass_amu * AMU))
        .sqrt();
    nu * (-binding_energy_k / gas_temperature_k).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const ICE_ROWS: [usize; 2] = [2, 3];
    const GAS_ROWS: [usize; 2] = [0, 1];
    // Water-like and CO-like species.
    const BINDING: [f64; 2] = [5770.0, 1150.0];
    const MASSES: [f64; 2] = [18.0, 28.0];

    fn mono_table() -> [Fraction; 2] {
        [Fraction::new(0.5).unwrap(), Fraction::new(1.0).unwrap()]
    }

    fn solid_list() -> [SpeciesRelease; 1] {
        [SpeciesRelease {
            species: 0,
            fraction: Fraction::new(0.3).unwrap(),
        }]
    }

    fn volcanic_list() -> [SpeciesRelease; 1] {
        [SpeciesRelease {
            species: 1,
            fraction: Fraction::new(0.5).unwrap(),
        }]
    }

    fn machine<'a>(
        mono: &'a [Fraction; 2],
        solid: &'a [SpeciesRelease; 1],
        volcanic: &'a [SpeciesRelease; 1],
    ) -> SublimationMachine<'a> {
        let network = SublimationNetwork::new(
            &ICE_ROWS, &GAS_ROWS, &BINDING, &MASSES, mono, solid, volcanic,
        )
        .unwrap();
        SublimationMachine::new(network, StellarMassIndex::new(1).unwrap())
    }

    /// Abundance matrix with the given ice inventory and empty gas phase.
    fn matrix(ice: [f64; 2]) -> Array2<f64> {
        let mut abundances = Array2::zeros((4, 1));
        abundances[[2, 0]] = ice[0];
        abundances[[3, 0]] = ice[1];
        abundances
    }

    #[test]
    fn instant_sublimation_fires_exactly_once() {
        let (mono, solid, volcanic) = (mono_table(), solid_list(), volcanic_list());
        let machine = machine(&mono, &solid, &volcanic);
        let mut abundances = matrix([0.4, 0.6]);
        let mut channels = DesorptionChannels::default();
        let mut remaining = [0.5, 1.0];
        let mut instant = true;

        machine.apply(&mut channels, &mut remaining, 10.0, &mut instant, &mut abundances, 0);

        assert!(!instant);
        assert_relative_eq!(abundances[[0, 0]], 0.4);
        assert_relative_eq!(abundances[[1, 0]], 0.6);
        assert_eq!(abundances[[2, 0]], MIN_ICE_ABUNDANCE);
        assert_eq!(abundances[[3, 0]], MIN_ICE_ABUNDANCE);

        // A second call must not fire again.
        let before = abundances.clone();
        machine.apply(&mut channels, &mut remaining, 10.0, &mut instant, &mut abundances, 0);
        assert_eq!(abundances, before);
    }

    #[test]
    fn solid_channel_releases_fixed_fraction_once() {
        let (mono, solid, volcanic) = (mono_table(), solid_list(), volcanic_list());
        let machine = machine(&mono, &solid, &volcanic);
        let mut abundances = matrix([1.0, 0.0]);
        let mut channels = DesorptionChannels::default();
        let mut remaining = [0.0, 0.0];
        let mut instant = false;

        // Above the solid trigger (20 K for stellar mass 1) but too cold
        // for anything else.
        machine.apply(&mut channels, &mut remaining, 25.0, &mut instant, &mut abundances, 0);

        assert_eq!(channels.solid, ChannelState::Done);
        assert_relative_eq!(abundances[[2, 0]], 0.7);
        assert_relative_eq!(abundances[[0, 0]], 0.3);

        // Re-applying at the same temperature must not release more.
        machine.apply(&mut channels, &mut remaining, 25.0, &mut instant, &mut abundances, 0);
        assert_relative_eq!(abundances[[2, 0]], 0.7);
        assert_relative_eq!(abundances[[0, 0]], 0.3);
    }

    #[test]
    fn channels_progress_strictly_forward() {
        let (mono, solid, volcanic) = (mono_table(), solid_list(), volcanic_list());
        let machine = machine(&mono, &solid, &volcanic);
        let mut abundances = matrix([0.5, 0.5]);
        let mut channels = DesorptionChannels::default();
        let mut remaining = [0.0, 0.0];
        let mut instant = false;

        machine.apply(&mut channels, &mut remaining, 25.0, &mut instant, &mut abundances, 0);
        assert_eq!(channels.solid, ChannelState::Done);
        assert_eq!(channels.volcanic, ChannelState::Pending);

        // Cooling back down must not revert any channel.
        machine.apply(&mut channels, &mut remaining, 5.0, &mut instant, &mut abundances, 0);
        assert_eq!(channels.solid, ChannelState::Done);

        // Past the volcanic trigger (84 K).
        machine.apply(&mut channels, &mut remaining, 90.0, &mut instant, &mut abundances, 0);
        assert_eq!(channels.volcanic, ChannelState::Done);
        assert_eq!(channels.co_desorption, ChannelState::Pending);

        // Past the co-desorption trigger (95 K): everything goes.
        machine.apply(&mut channels, &mut remaining, 100.0, &mut instant, &mut abundances, 0);
        assert_eq!(channels.co_desorption, ChannelState::Done);
        assert_eq!(abundances[[2, 0]], MIN_ICE_ABUNDANCE);
        assert_eq!(abundances[[3, 0]], MIN_ICE_ABUNDANCE);
        assert_relative_eq!(abundances[[0, 0]] + abundances[[1, 0]], 1.0, max_relative = 1e-12);

        // Once co-desorption is done the position is inert.
        let before = abundances.clone();
        machine.apply(&mut channels, &mut remaining, 150.0, &mut instant, &mut abundances, 0);
        assert_eq!(abundances, before);
    }

    #[test]
    fn binding_energy_evaporation_is_one_shot() {
        let (mono, solid, volcanic) = (mono_table(), solid_list(), volcanic_list());
        let machine = machine(&mono, &solid, &volcanic);
        let mut abundances = matrix([0.0, 1.0]);
        let mut channels = DesorptionChannels {
            // Keep the staged channels quiet.
            solid: ChannelState::Done,
            ..DesorptionChannels::default()
        };
        let mut remaining = [0.5, 1.0];
        let mut instant = false;

        // 60 K: far above the CO-like species' sublimation temperature
        // (~42 K for E_b = 1150 K) but far below the water-like one.
        machine.apply(&mut channels, &mut remaining, 60.0, &mut instant, &mut abundances, 0);

        assert_eq!(remaining[1], 0.0);
        assert_eq!(remaining[0], 0.5);
        assert_relative_eq!(abundances[[1, 0]], 1.0);
        assert_relative_eq!(abundances[[3, 0]], 0.0);
    }

    #[test]
    fn rate_constant_crosses_threshold_near_sublimation_temperature() {
        // CO-like species: k is negligible at 20 K and effectively
        // instantaneous at 60 K.
        assert!(desorption_rate_constant(1150.0, 28.0, 20.0) < DESORPTION_RATE_THRESHOLD);
        assert!(desorption_rate_constant(1150.0, 28.0, 60.0) > DESORPTION_RATE_THRESHOLD);
        // Water-like species holds on well past 100 K.
        assert!(desorption_rate_constant(5770.0, 18.0, 100.0) < DESORPTION_RATE_THRESHOLD);
        assert!(desorption_rate_constant(5770.0, 18.0, 250.0) > DESORPTION_RATE_THRESHOLD);
    }

    #[test]
    fn ice_depleted_position_is_a_no_op() {
        let (mono, solid, volcanic) = (mono_table(), solid_list(), volcanic_list());
        let machine = machine(&mono, &solid, &volcanic);
        let mut abundances = matrix([0.0, 0.0]);
        abundances[[0, 0]] = 0.9;
        let mut channels = DesorptionChannels::default();
        let mut remaining = [0.5, 1.0];
        let mut instant = true;

        machine.apply(&mut channels, &mut remaining, 120.0, &mut instant, &mut abundances, 0);

        // Nothing ran: the latch survives and no channel moved.
        assert!(instant);
        assert_eq!(channels, DesorptionChannels::default());
        assert_relative_eq!(abundances[[0, 0]], 0.9);
    }
}
