//! Events published by the Validator Set subsystem

mod published;

pub use published::*;
