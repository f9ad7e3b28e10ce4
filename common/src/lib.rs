#[cfg(feature = "config")]
pub mod config;
#[cfg(feature = "logging")]
pub mod logging;
pub mod utils;
#[cfg(feature = "z3")]
pub mod z3;
