//! A four-point hot core warming around a newly formed 10 M☉ star.
//!
//! The cloud is static at 1e7 cm⁻³; the temperature climbs on the measured
//! power-law profile and walks each position through the staged desorption
//! events. Prints the center and edge temperatures and the growing
//! gas-phase CO and CH3OH inventories at the cloud center.

use std::error::Error;

use uom::si::{
    f64::{Length, ThermodynamicTemperature},
    length::parsec,
    thermodynamic_temperature::kelvin,
};

use darkcloud_examples::{SpeciesTables, initial_abundances};
use darkcloud_physics::{CloudConfig, Phase, PhysicsState, StellarMassIndex};

const POINTS: usize = 4;

fn main() -> Result<(), Box<dyn Error>> {
    let tables = SpeciesTables::new();
    let config = CloudConfig {
        points: POINTS,
        phase: Phase::HotCore,
        stellar_mass: StellarMassIndex::new(3)?,
        rout: Length::new::<parsec>(0.03),
        initial_density: 1.0e7,
        final_density: 1.0e7,
        max_temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
        ..CloudConfig::default()
    };
    let mut state = PhysicsState::new(config, tables.network())?;
    let mut abundances = initial_abundances(POINTS);

    println!(
        "{:>12} {:>10} {:>10} {:>12} {:>12}",
        "t [yr]", "T_in [K]", "T_out [K]", "CO(gas)", "CH3OH(gas)"
    );
    while state.time().in_years() < 1.0e6 {
        state.advance_target_time();
        state.set_current_time(state.time().target_time);
        for position in 0..POINTS {
            state.update_at_current_time(position)?;
            state.apply_sublimation(position, &mut abundances)?;
        }

        println!(
            "{:>12.3e} {:>10.2} {:>10.2} {:>12.3e} {:>12.3e}",
            state.time().in_years(),
            state.position(0)?.gas_temperature.get::<kelvin>(),
            state.position(POINTS - 1)?.gas_temperature.get::<kelvin>(),
            abundances[[1, 0]],
            abundances[[3, 0]],
        );
    }
    Ok(())
}
