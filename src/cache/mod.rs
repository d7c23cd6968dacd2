//! Cache Module
//!
//! In-memory cache of resolved configuration, cleared as a whole once per
//! calendar day or on demand.

pub mod clock;
pub mod store;

pub use clock::{next_midnight, Clock, ManualClock, SystemClock};
pub use store::{CachedValue, ValueCache};
