use super::commands::{CommandError, CommandIssuer, SERVO_CLOSED, SERVO_OPEN};
use super::devices::{RelayId, SensorId, ServoId};
use super::fill::FillMachine;
use super::flight::FlightMachine;
use super::heater::HeaterMachine;
use super::ignition::IgnitionMachine;
use super::phase::Phase;
use super::routing::{CommandEdge, CommandOutcome, Route};
use crate::comms::{DeviceKind, Operation};
use crate::info;
use std::fmt::{Display, Formatter};

/// The simulator does not report exactly zero at touchdown, so landing is
/// declared at or below this altitude.
const LANDED_ALTITUDE: f32 = 3.0;

#[derive(Debug)]
pub enum SequenceError {
    /// Negative acknowledgement for an actuator command. Unrecoverable:
    /// the sequence stops, no retry is attempted.
    Rejected {
        device: DeviceKind,
        index: u8,
        operation: Operation,
    },
    /// A command failed validation or the link is gone before submission.
    Command(CommandError),
}

impl Display for SequenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::Rejected { device, index, operation } => {
                write!(f, "{device} {index} rejected the {operation} command")
            }
            SequenceError::Command(e) => write!(f, "command not submitted: {e}"),
        }
    }
}

impl std::error::Error for SequenceError {}
impl From<CommandError> for SequenceError {
    fn from(value: CommandError) -> Self { SequenceError::Command(value) }
}

/// Phase transition requested by a sub-machine completion.
///
/// Keying the wiring on this enum instead of constructor-time callbacks
/// keeps the completion table in one place: every variant is produced by
/// exactly one acknowledgement edge in `on_acknowledged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Fueling,
    Heating,
    Ignition,
    Ignite,
    Flight,
}

/// Owner of the launch sequence.
///
/// Holds the single current [`Phase`] and the five sub-machines, runs every
/// inbound event to completion on the caller's task, and issues actuator
/// commands fire-and-forget. Created once at startup; sub-machines live for
/// the process lifetime and are never reset.
pub struct LaunchSequencer {
    phase: Phase,
    oxidizer: FillMachine,
    fuel: FillMachine,
    heater: HeaterMachine,
    ignition: IgnitionMachine,
    flight: FlightMachine,
    landing_armed: bool,
    issuer: CommandIssuer,
}

impl LaunchSequencer {
    pub fn new(issuer: CommandIssuer) -> Self {
        Self {
            phase: Phase::Begin,
            oxidizer: FillMachine::oxidizer(),
            fuel: FillMachine::fuel(),
            heater: HeaterMachine::new(),
            ignition: IgnitionMachine::new(),
            flight: FlightMachine::new(),
            landing_armed: false,
            issuer,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }

    pub fn oxidizer(&self) -> &FillMachine { &self.oxidizer }

    pub fn fuel(&self) -> &FillMachine { &self.fuel }

    pub fn heater(&self) -> &HeaterMachine { &self.heater }

    pub fn flight(&self) -> &FlightMachine { &self.flight }

    /// Applies one routed inbound event. Every phase transition in the
    /// process happens inside this call chain; the caller only decides what
    /// a returned error means (it stops the sequence).
    pub fn handle(&mut self, route: Route) -> Result<(), SequenceError> {
        match route {
            Route::Feed(sensor, value) => self.on_feed(sensor, value),
            Route::Result(edge, CommandOutcome::Acknowledged) => self.on_acknowledged(edge),
            Route::Result(edge, CommandOutcome::Rejected) => {
                let (device, index, operation) = edge.pattern();
                Err(SequenceError::Rejected { device, index, operation })
            }
        }
    }

    /// Kicks off phase one. Called once, before the receive loop starts.
    pub fn begin_oxidizing(&mut self) -> Result<(), SequenceError> {
        info!("Begin oxidizing");
        self.phase = Phase::Oxidizing;
        self.issuer.servo_position(self.oxidizer.servo(), SERVO_OPEN)?;
        self.oxidizer.command_sent(SERVO_OPEN);
        Ok(())
    }

    fn begin_fueling(&mut self) -> Result<(), SequenceError> {
        info!("Begin fueling");
        self.phase = Phase::Fueling;
        self.issuer.servo_position(self.fuel.servo(), SERVO_OPEN)?;
        self.fuel.command_sent(SERVO_OPEN);
        Ok(())
    }

    fn begin_heating(&mut self) -> Result<(), SequenceError> {
        info!("Begin heating");
        self.phase = Phase::Heating;
        self.issuer.relay(RelayId::OxidizerHeater, Operation::Open)?;
        self.heater.engage();
        Ok(())
    }

    fn begin_ignition(&mut self) -> Result<(), SequenceError> {
        info!("Begin ignition - opening main valves");
        self.phase = Phase::Ignition;
        self.issuer.servo_position(ServoId::FuelMain, SERVO_OPEN)?;
        self.issuer.servo_position(ServoId::OxidizerMain, SERVO_OPEN)?;
        Ok(())
    }

    fn do_ignite(&mut self) -> Result<(), SequenceError> {
        info!("Igniting");
        self.issuer.relay(RelayId::Igniter, Operation::Open)?;
        Ok(())
    }

    fn enter_flight(&mut self) -> Result<(), SequenceError> {
        info!("Flying");
        self.phase = Phase::Flight;
        Ok(())
    }

    fn open_parachute(&mut self) -> Result<(), SequenceError> {
        info!("Opening parachute");
        self.issuer.relay(RelayId::Parachute, Operation::Open)?;
        self.phase = Phase::Landing;
        self.landing_armed = true;
        Ok(())
    }

    fn finish(&mut self) {
        self.phase = Phase::Done;
        self.flight.clear_descent();
        info!("Finished simulation");
    }

    /// The completion table: sub-machine completion -> phase entry action.
    fn advance(&mut self, step: Advance) -> Result<(), SequenceError> {
        match step {
            Advance::Fueling => self.begin_fueling(),
            Advance::Heating => self.begin_heating(),
            Advance::Ignition => self.begin_ignition(),
            Advance::Ignite => self.do_ignite(),
            Advance::Flight => self.enter_flight(),
        }
    }

    fn on_feed(&mut self, sensor: SensorId, value: f32) -> Result<(), SequenceError> {
        match sensor {
            SensorId::OxidizerLevel => {
                if self.oxidizer.record_level(value) {
                    self.issuer.servo_position(self.oxidizer.servo(), SERVO_CLOSED)?;
                    self.oxidizer.command_sent(SERVO_CLOSED);
                }
                Ok(())
            }
            SensorId::FuelLevel => {
                if self.fuel.record_level(value) {
                    self.issuer.servo_position(self.fuel.servo(), SERVO_CLOSED)?;
                    self.fuel.command_sent(SERVO_CLOSED);
                }
                Ok(())
            }
            SensorId::OxidizerPressure => {
                // During the fill the reading belongs to the oxidizer
                // machine; from heating onwards it belongs to the heater.
                if self.phase == Phase::Oxidizing {
                    self.oxidizer.record_pressure(value);
                } else if self.phase >= Phase::Heating && self.heater.record_pressure(value) {
                    self.issuer.relay(RelayId::OxidizerHeater, Operation::Close)?;
                    self.heater.commanded_off();
                }
                Ok(())
            }
            SensorId::Altitude => self.on_altitude(value),
        }
    }

    /// Flight-level decision logic. The accumulator stays side-effect free,
    /// so parachute and touchdown decisions happen here, after the update.
    fn on_altitude(&mut self, altitude: f32) -> Result<(), SequenceError> {
        if self.phase < Phase::Flight {
            return Ok(());
        }
        self.flight.record_altitude(altitude);
        if self.phase == Phase::Flight && self.flight.is_descending() {
            self.open_parachute()?;
        } else if self.flight.altitude() <= LANDED_ALTITUDE && self.landing_armed {
            self.landing_armed = false;
            self.finish();
        }
        Ok(())
    }

    fn on_acknowledged(&mut self, edge: CommandEdge) -> Result<(), SequenceError> {
        match edge {
            CommandEdge::OxidizerIntake => {
                if self.oxidizer.acked() {
                    self.advance(Advance::Fueling)?;
                }
                Ok(())
            }
            CommandEdge::FuelIntake => {
                if self.fuel.acked() {
                    self.advance(Advance::Heating)?;
                }
                Ok(())
            }
            CommandEdge::HeaterOpen => {
                self.heater.open_acked();
                Ok(())
            }
            CommandEdge::HeaterClose => {
                if self.heater.close_acked() {
                    self.advance(Advance::Ignition)?;
                }
                Ok(())
            }
            CommandEdge::FuelMain => {
                if self.ignition.fuel_main_acked() {
                    self.advance(Advance::Ignite)?;
                }
                Ok(())
            }
            CommandEdge::OxidizerMain => {
                if self.ignition.oxidizer_main_acked() {
                    self.advance(Advance::Ignite)?;
                }
                Ok(())
            }
            CommandEdge::IgniterOpen => {
                // Guarded by phase so a duplicate delivery cannot re-enter.
                if self.phase == Phase::Ignition {
                    self.advance(Advance::Flight)?;
                }
                Ok(())
            }
            // The igniter is never commanded closed in this sequence; the
            // pattern is registered for protocol completeness only.
            CommandEdge::IgniterClose => Ok(()),
            CommandEdge::ParachuteOpen => Ok(()),
        }
    }
}
