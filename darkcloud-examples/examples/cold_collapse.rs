//! A single-point cold dark cloud collapsing in freefall from 1e2 to
//! 1e5 cm⁻³, with the ice inventory frozen out the whole way.
//!
//! Prints the physical conditions at each output checkpoint and the final
//! gas-phase inventory.

use std::error::Error;

use uom::si::{f64::Time, time::year};

use darkcloud_examples::{GAS_ROWS, SPECIES, SpeciesTables, initial_abundances};
use darkcloud_physics::{CloudConfig, CollapseMode, PhysicsState};
use darkcloud_solve::{CollapseIntegrator, Method};

fn main() -> Result<(), Box<dyn Error>> {
    let tables = SpeciesTables::new();
    let config = CloudConfig {
        collapse: CollapseMode::Freefall,
        initial_density: 1.0e2,
        final_density: 1.0e5,
        ..CloudConfig::default()
    };
    let mut state = PhysicsState::new(config, tables.network())?;
    let integrator = CollapseIntegrator::new(
        state.collapse_law(),
        Method::Dopri5 {
            abs_tol: 1.0e-6,
            rel_tol: 1.0e-6,
        },
        Time::new::<year>(100.0),
    );
    let mut abundances = initial_abundances(1);

    println!(
        "{:>12} {:>12} {:>8} {:>10}",
        "t [yr]", "n_H [cm^-3]", "Av", "zeta"
    );
    while state.time().in_years() < 6.0e6 {
        state.advance_target_time();
        let target = state.time().target_time;
        let density = integrator.advance(
            state.positions()[0].density,
            state.time().current_time,
            target,
        )?;
        state.set_current_time(target);
        state.set_density(0, density)?;
        state.update_at_current_time(0)?;
        state.apply_sublimation(0, &mut abundances)?;

        let position = state.position(0)?;
        println!(
            "{:>12.3e} {:>12.3e} {:>8.2} {:>10.3e}",
            state.time().in_years(),
            position.density,
            position.visual_extinction,
            position.zeta,
        );
    }

    println!("\nfinal gas-phase inventory:");
    for (name, row) in SPECIES.into_iter().zip(GAS_ROWS) {
        println!("  {name:>6}: {:.3e}", abundances[[row, 0]]);
    }
    Ok(())
}
