use thiserror::Error;

/// A setting outside its allowed range. Rejected before any run starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("array size {0} is not one of 10, 15, ..., 100")]
    InvalidSize(usize),

    #[error("speed {0} is outside 1..=100")]
    InvalidSpeed(u64),

    #[error("unknown algorithm `{0}` (expected bubble, selection, insertion, merge or quick)")]
    UnknownAlgorithm(String),

    #[error("unknown pacing `{0}` (expected realtime or immediate)")]
    InvalidPacing(String),

    #[error("{key} has unparsable value `{value}`")]
    Unparsable { key: &'static str, value: String },
}

/// A playback command that could not be carried out.
#[derive(Error, Debug)]
pub enum ControlError {
    /// The command is only allowed while no run is active.
    #[error("a sort is running; stop it first")]
    Busy,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn run thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Cooperative early exit of a driver after its run was cancelled.
///
/// Drivers return this through every recursion level with `?`; it never
/// reaches the collaborator as a failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("run interrupted")]
pub struct Interrupted;
