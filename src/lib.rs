pub mod algorithm;
pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod instrument;
pub mod sort;
mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use algorithm::Algorithm;
pub use bubble::bubble_sort;
pub use config::{Pacing, Settings};
pub use controller::{Controller, Outcome, Phase, PlaybackState, RunReport};
pub use element::{from_values, generate_elements, Element, Highlight};
pub use error::{ConfigError, ControlError, Interrupted};
pub use insertion::insertion_sort;
pub use instrument::{CancelToken, Event, Flow, Instrument, RunCounters, Snapshot, SpeedHandle};
pub use merge::merge_sort;
pub use quick::quick_sort;
pub use selection::selection_sort;
pub use sort::{driver_for, sort, Driver};
