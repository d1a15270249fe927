use strum_macros::Display;

/// Top-level stage of the launch sequence.
///
/// The derived ordering is load-bearing: guard conditions compare against the
/// current phase (`phase >= Phase::Flight` etc.), and the sequencer only ever
/// moves forward through this list. No phase is re-entered or skipped.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Begin,
    Oxidizing,
    Fueling,
    Heating,
    Ignition,
    Flight,
    Landing,
    Done,
}
