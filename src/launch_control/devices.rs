use strum_macros::{Display, EnumIter};

/// Servo wire indices as the simulator assigns them.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ServoId {
    FuelIntake,
    OxidizerIntake,
    FuelMain,
    OxidizerMain,
}

impl ServoId {
    pub fn index(self) -> u8 {
        match self {
            ServoId::FuelIntake => 0,
            ServoId::OxidizerIntake => 1,
            ServoId::FuelMain => 2,
            ServoId::OxidizerMain => 3,
        }
    }
}

/// Relay wire indices as the simulator assigns them.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RelayId {
    OxidizerHeater,
    Igniter,
    Parachute,
}

impl RelayId {
    pub fn index(self) -> u8 {
        match self {
            RelayId::OxidizerHeater => 0,
            RelayId::Igniter => 1,
            RelayId::Parachute => 2,
        }
    }
}

/// Sensor wire indices for the four feeds the sequencer consumes.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SensorId {
    FuelLevel,
    OxidizerLevel,
    Altitude,
    OxidizerPressure,
}

impl SensorId {
    pub fn index(self) -> u8 {
        match self {
            SensorId::FuelLevel => 0,
            SensorId::OxidizerLevel => 1,
            SensorId::Altitude => 2,
            SensorId::OxidizerPressure => 3,
        }
    }
}
