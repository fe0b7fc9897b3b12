//! Device state
//!
//! Everything the visualizer shows or controls: screen selection, LED,
//! switch and button bitmasks, ADC registers and the wall clock. The main
//! loop owns [`DeviceState`]; only [`TickCounter`] is shared with an
//! interrupt.

pub mod clock;
pub mod device;
pub mod noise;

pub use clock::{Clock, TickCounter};
pub use device::DeviceState;
pub use noise::{AdcNoise, Lcg, ADC_MAX};
