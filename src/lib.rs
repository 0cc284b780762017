//! testprof core library: per-test wall-clock timing, run aggregates, snapshot comparison and
//! report rendering.

mod clock;
mod config;
mod error;
mod events;
mod fsutil;
mod ledger;
mod profile;
mod profiler;
mod reporting;
mod sample;
mod snapshot;
mod summary;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use fsutil::*;
pub use ledger::*;
pub use profile::*;
pub use profiler::*;
pub use reporting::*;
pub use sample::*;
pub use snapshot::*;
pub use summary::*;
