//! # qc-18-validator-set
//!
//! Bonded validator set maintenance for a proof-of-stake chain.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Bonded set**: The top `max_validators` non-jailed validators by power
//! - **Cliff tracking**: The lowest bonded member of a full set, used to skip
//!   candidates that cannot get in
//! - **Incremental updates**: One power change swaps at most one validator
//! - **Full reconciliation**: Recompute membership from scratch on demand
//! - **Consensus updates**: Per-block `(validator, power)` list, zero for leavers
//!
//! ## Architecture
//!
//! ```text
//! Staking tx handlers ──apply_power_change / jail / unjail──→ Validator Set (18)
//!                                                                  │
//!                                                                  ├── PoolInstruction ──→ Pool ledger
//!                                                                  ├── ValidatorSetEvent ──→ Hooks
//!                                                                  │
//! Block executor ──────begin_block / end_block──────────────→ Vec<ValidatorUpdate> ──→ Consensus (8)
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! [UNBONDED] ──admitted──→ [BONDED] ──evicted / jailed / zero power──→ [UNBONDING]
//!     ↑                        ↑                                           │
//!     │                        └──────────────readmitted───────────────────┤
//!     └──────────────────────────period elapsed────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_18_validator_set::{
//!     BlockContext, InMemoryEventSink, InMemoryPoolLedger, StakingParams, ValidatorSetService,
//! };
//! use qc_18_validator_set::ports::inbound::ValidatorSetApi;
//!
//! let service = ValidatorSetService::new(
//!     StakingParams::default(),
//!     Arc::new(InMemoryPoolLedger::new()),
//!     Arc::new(InMemoryEventSink::new()),
//! )?;
//!
//! service.begin_block(BlockContext::new(1, 1_700_000_000))?;
//! service.apply_power_change(validator_id, 1_000, false)?;
//! let updates = service.end_block()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryEventSink, InMemoryPoolLedger};
pub use domain::{
    BlockContext, BondStatus, CliffValidator, Pool, PoolBucket, PoolInstruction, Power, PowerRank,
    StakingParams, Validator, ValidatorId, ValidatorSetState, ValidatorUpdate, MAX_VOTING_POWER,
};
pub use error::{ValidatorSetError, ValidatorSetResult};
pub use events::ValidatorSetEvent;
pub use ports::inbound::{GenesisValidator, ReconcileOutcome};
pub use service::{Engine, ReconcileMode, ValidatorSetService};
