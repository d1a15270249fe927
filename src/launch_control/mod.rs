mod commands;
mod fill;
mod flight;
mod heater;
mod ignition;
mod phase;
mod routing;
mod sequencer;

pub(crate) mod devices;

pub use commands::{CommandError, CommandIssuer, SERVO_CLOSED, SERVO_OPEN};
pub use fill::{FillMachine, FillStage};
pub use flight::FlightMachine;
pub use heater::HeaterMachine;
pub use ignition::IgnitionMachine;
pub use phase::Phase;
pub use routing::{CommandEdge, CommandOutcome, Route, Router};
pub use sequencer::{LaunchSequencer, SequenceError};
