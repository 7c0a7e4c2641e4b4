//! # ruskvader-engine
//!
//! The control layer of the impairment proxy: a capture session wires a
//! `PacketSource` through the impairment pipeline into an `InjectionSink`,
//! dispatching every captured frame into its own task so the capture loop
//! is never stalled by one packet's delay.

mod error;
mod session;

pub use error::SessionError;
pub use session::{CaptureSession, SessionOptions, SessionState, DEFAULT_MAX_IN_FLIGHT};
