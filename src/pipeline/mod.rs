//! Event-damping primitives for high-frequency UI input.
//!
//! Three small pieces, composed per stream by the engine: a trailing-edge
//! [`DebounceWindow`], a distinct-until-changed [`Distinct`] filter, and a
//! [`FlightSwitch`] that guarantees only the newest in-flight call can ever
//! land.

pub mod debounce;
pub mod distinct;
pub mod switcher;

pub use debounce::DebounceWindow;
pub use distinct::Distinct;
pub use switcher::{FlightSwitch, FlightTicket};
