//! Device driver abstraction
//!
//! The vendor SDK is hidden behind the [`CameraDriver`] trait: a minimal
//! open/close/configure/allocate/trigger/copy/free capability surface. The
//! acquisition controller talks only to this trait, so production code can
//! wrap a real SDK while tests and demos run against [`SimulatedDriver`].

mod interface;
mod sim;
pub mod types;

pub use interface::CameraDriver;
pub use sim::{SimulatedDriver, TestPattern};
pub use types::{
    AutoFeature, BinningMode, BufferToken, ColorMode, DisplayMode, DriverError, DriverResult,
    SensorInfo, SensorType,
};
