//! Domain layer for the Validator Set subsystem
//!
//! ## Core Modules
//! - validator: Validator record and guarded lifecycle transitions
//! - power_index: Validators ordered by rank (power, tie-break)
//! - bonded_index: Bonded membership
//! - cliff: Lowest-ranked member of a full bonded set
//! - update_buffer: Per-block power updates for the consensus engine
//! - pool: Bonded / not-bonded token counters
//! - params: Staking parameters and block context
//! - state: The three views plus the validator table, kept in step

mod bonded_index;
mod cliff;
mod params;
mod pool;
mod power_index;
mod state;
mod update_buffer;
mod validator;

pub use bonded_index::*;
pub use cliff::*;
pub use params::*;
pub use pool::*;
pub use power_index::*;
pub use state::*;
pub use update_buffer::*;
pub use validator::*;
