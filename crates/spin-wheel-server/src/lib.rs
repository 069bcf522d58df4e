//! Spin Wheel Server - registration gate and single-use prize wheel.
//!
//! Serves the backend of a promotional wheel widget:
//! - Admit each phone number through the registration gate only once
//! - Give every admitted registrant exactly one weighted spin
//! - Report the locked outcome for the front end to animate

pub mod api;
pub mod config;
pub mod error;
pub mod session;

pub use config::Config;
pub use error::ServerError;
pub use session::{Session, SessionRegistry};
