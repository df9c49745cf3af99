//! The owned aggregate physical state of one model run.

use ndarray::Array2;
use uom::si::{
    f64::{ThermodynamicTemperature, Time},
    thermodynamic_temperature::kelvin,
    time::year,
};

use crate::{
    config::{CloudConfig, CollapseMode, Phase},
    error::PhysicsError,
    geometry::CloudGeometry,
    ionization,
    network::SublimationNetwork,
    rates::CollapseLaw,
    schedule,
    sublimation::{DesorptionChannels, SublimationMachine},
    temperature::HotCoreProfile,
};

/// Relative perturbation applied to the initial density so a freefall run
/// starts off the zero-derivative point of the collapse law.
const FREEFALL_START_PERTURBATION: f64 = 1.001;

/// Physical state of one radial position.
///
/// Positions are 0-based, ordered from the cloud center (0) to the edge
/// (`points − 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct PositionState {
    /// Gas number density [cm⁻³].
    pub density: f64,

    /// Gas temperature.
    pub gas_temperature: ThermodynamicTemperature,

    /// Dust temperature; follows the gas temperature in this model.
    pub dust_temperature: ThermodynamicTemperature,

    /// Column density from this position to the cloud edge [cm⁻²].
    pub column_density: f64,

    /// Visual extinction [mag].
    pub visual_extinction: f64,

    /// Cosmic-ray ionization rate multiplier.
    pub zeta: f64,

    /// Cosmic-ray H2 dissociation rate [s⁻¹], when tracking is enabled.
    pub h2_dissociation_rate: Option<f64>,

    /// Staged desorption channel states.
    pub channels: DesorptionChannels,

    /// Per-species monotonic-evaporation fraction remaining. Mutated
    /// irreversibly downward to zero; restored only by a full reset.
    mono_remaining: Vec<f64>,
}

impl PositionState {
    /// The position's monotonic-evaporation fractions remaining, one per
    /// ice species.
    #[must_use]
    pub fn mono_remaining(&self) -> &[f64] {
        &self.mono_remaining
    }
}

/// Global time state of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeState {
    /// Time the integrator has reached.
    pub current_time: Time,

    /// Next requested output checkpoint.
    pub target_time: Time,
}

impl TimeState {
    fn zero() -> Self {
        Self {
            current_time: Time::new::<year>(0.0),
            target_time: Time::new::<year>(0.0),
        }
    }

    /// Current time in years.
    #[must_use]
    pub fn in_years(&self) -> f64 {
        self.current_time.get::<year>()
    }
}

/// The aggregate physical state: all per-position arrays, the time state,
/// and the derived physical models of one run.
///
/// The external kinetics integrator drives the lifecycle in strict order:
/// [`initialize`](Self::initialize) once, then per outer loop iteration
/// [`advance_target_time`](Self::advance_target_time), integration of the
/// density variable up to the target, and per accepted step and position
/// [`update_at_current_time`](Self::update_at_current_time) followed by
/// [`apply_sublimation`](Self::apply_sublimation). Calls must not be
/// reordered: later steps depend on flag and column-density state left by
/// earlier ones.
#[derive(Debug, Clone)]
pub struct PhysicsState<'a> {
    config: CloudConfig,
    geometry: CloudGeometry,
    collapse: CollapseLaw,
    profile: HotCoreProfile,
    machine: SublimationMachine<'a>,
    positions: Vec<PositionState>,
    time: TimeState,
    instant_sublimation_pending: bool,
}

impl<'a> PhysicsState<'a> {
    /// Builds and initializes the state for a configuration and a network.
    ///
    /// # Errors
    ///
    /// Returns a configuration variant of [`PhysicsError`] if the
    /// configuration is invalid.
    pub fn new(
        config: CloudConfig,
        network: SublimationNetwork<'a>,
    ) -> Result<Self, PhysicsError> {
        config.validate()?;
        let mut state = Self {
            geometry: CloudGeometry::new(&config),
            collapse: CollapseLaw::new(&config),
            profile: HotCoreProfile::new(&config),
            machine: SublimationMachine::new(network, config.stellar_mass),
            positions: Vec::new(),
            time: TimeState::zero(),
            instant_sublimation_pending: false,
            config,
        };
        state.initialize()?;
        Ok(state)
    }

    /// Resets the run: all per-position arrays, desorption flags, monotonic
    /// evaporation fractions, and the time state return to their initial
    /// values.
    ///
    /// # Errors
    ///
    /// Returns a configuration variant of [`PhysicsError`] if the
    /// configuration is invalid.
    pub fn initialize(&mut self) -> Result<(), PhysicsError> {
        self.config.validate()?;

        let initial_density = match self.config.collapse {
            CollapseMode::Static => self.config.initial_density,
            CollapseMode::Freefall => FREEFALL_START_PERTURBATION * self.config.initial_density,
        };
        let mono_defaults: Vec<f64> = self
            .machine
            .network()
            .mono_fractions()
            .iter()
            .map(|f| f.get())
            .collect();

        self.positions = (0..self.config.points)
            .map(|position| {
                let column_density = self
                    .geometry
                    .initial_column_density(position, self.config.initial_density);
                PositionState {
                    density: initial_density,
                    gas_temperature: self.config.initial_temperature,
                    dust_temperature: self.config.initial_temperature,
                    column_density,
                    visual_extinction: self.geometry.visual_extinction(column_density),
                    zeta: ionization::ionization_scale(
                        column_density,
                        self.config.ion_model,
                        self.config.zeta_scale,
                    ),
                    h2_dissociation_rate: self.config.h2_dissociation.then(|| {
                        ionization::dissociation_rate(
                            column_density,
                            self.config.ion_model,
                            self.config.zeta_scale,
                        )
                    }),
                    channels: DesorptionChannels::default(),
                    mono_remaining: mono_defaults.clone(),
                }
            })
            .collect();

        self.time = TimeState::zero();
        self.instant_sublimation_pending = self.config.instant_sublimation;
        Ok(())
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// The collapse rate law, for the external integrator's right-hand side
    /// and Jacobian.
    #[must_use]
    pub fn collapse_law(&self) -> CollapseLaw {
        self.collapse
    }

    /// The global time state.
    #[must_use]
    pub fn time(&self) -> TimeState {
        self.time
    }

    /// All per-position states, center first.
    #[must_use]
    pub fn positions(&self) -> &[PositionState] {
        &self.positions
    }

    /// The state of one position.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::PositionOutOfRange`] for an index outside
    /// the cloud.
    pub fn position(&self, position: usize) -> Result<&PositionState, PhysicsError> {
        self.positions
            .get(position)
            .ok_or(PhysicsError::PositionOutOfRange {
                position,
                points: self.config.points,
            })
    }

    /// Moves the next output checkpoint forward on the log-staged schedule.
    pub fn advance_target_time(&mut self) {
        self.time.target_time = schedule::next_target_time(self.time.current_time);
    }

    /// Records the time the integrator has reached.
    pub fn set_current_time(&mut self, time: Time) {
        self.time.current_time = time;
    }

    /// Stores the density the integrator computed for a position.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::PositionOutOfRange`] for an index outside
    /// the cloud.
    pub fn set_density(&mut self, position: usize, density: f64) -> Result<(), PhysicsError> {
        self.check_position(position)?;
        self.positions[position].density = density;
        Ok(())
    }

    /// Recomputes the column-dependent state of one position at the current
    /// time: column density (suffix sum over this and all outer positions),
    /// visual extinction, ionization (and H2 dissociation when enabled),
    /// and — for a hot core still below the temperature cap — the gas and
    /// dust temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::PositionOutOfRange`] for an index outside
    /// the cloud.
    pub fn update_at_current_time(&mut self, position: usize) -> Result<(), PhysicsError> {
        self.check_position(position)?;

        let column_density = self
            .geometry
            .column_density(self.positions[position..].iter().map(|p| p.density));
        let state = &mut self.positions[position];
        state.column_density = column_density;
        state.visual_extinction = self.geometry.visual_extinction(column_density);
        state.zeta = ionization::ionization_scale(
            column_density,
            self.config.ion_model,
            self.config.zeta_scale,
        );
        state.h2_dissociation_rate = self.config.h2_dissociation.then(|| {
            ionization::dissociation_rate(
                column_density,
                self.config.ion_model,
                self.config.zeta_scale,
            )
        });

        // Hot-core heating is monotone: once a position reaches the cap it
        // stays there.
        if self.config.phase == Phase::HotCore
            && state.gas_temperature < self.config.max_temperature
        {
            state.gas_temperature = self.profile.temperature(
                self.time.current_time.get::<year>(),
                self.geometry.radial_falloff(position),
            );
        }
        state.dust_temperature = state.gas_temperature;
        Ok(())
    }

    /// Runs the staged desorption state machine for one position against
    /// the externally owned abundance matrix (species × position).
    ///
    /// A complete no-op when the run uses a three-phase ice network; ice
    /// chemistry is handled elsewhere in that case.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::PositionOutOfRange`] for an index outside
    /// the cloud, or [`PhysicsError::SpeciesIndexOutOfRange`] if the matrix
    /// has fewer rows than the network addresses.
    pub fn apply_sublimation(
        &mut self,
        position: usize,
        abundances: &mut Array2<f64>,
    ) -> Result<(), PhysicsError> {
        self.check_position(position)?;
        if self.config.three_phase_ice {
            return Ok(());
        }
        if let Some(max_row) = self.machine.network().max_species_row() {
            if max_row >= abundances.nrows() {
                return Err(PhysicsError::SpeciesIndexOutOfRange {
                    index: max_row,
                    limit: abundances.nrows(),
                });
            }
        }

        let state = &mut self.positions[position];
        self.machine.apply(
            &mut state.channels,
            &mut state.mono_remaining,
            state.gas_temperature.get::<kelvin>(),
            &mut self.instant_sublimation_pending,
            abundances,
            position,
        );
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<(), PhysicsError> {
        if position < self.config.points {
            Ok(())
        } else {
            Err(PhysicsError::PositionOutOfRange {
                position,
                points: self.config.points,
            })
        }
    }
}
