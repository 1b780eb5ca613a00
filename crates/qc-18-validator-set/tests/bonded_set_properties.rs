//! # Bonded Set Properties (qc-18)
//!
//! Random power change sequences against the service, checking after every
//! block that:
//!
//! 1. **Bound** - bonded count never exceeds `max_validators`
//! 2. **Cliff** - defined iff the set is full, and equal to its lowest member
//! 3. **Jail exclusion** - no jailed validator is bonded
//! 4. **Idempotence** - a second full reconciliation changes nothing
//! 5. **Ranking** - after a full reconciliation the bonded set is exactly the
//!    top eligible validators by rank

use proptest::prelude::*;
use qc_18_validator_set::ports::inbound::ValidatorSetApi;
use qc_18_validator_set::{
    BlockContext, InMemoryEventSink, InMemoryPoolLedger, StakingParams, Validator, ValidatorId,
    ValidatorSetService,
};
use std::collections::BTreeSet;
use std::sync::Arc;

type Service = ValidatorSetService<InMemoryPoolLedger, InMemoryEventSink>;

#[derive(Clone, Debug)]
enum Op {
    Power { validator: u8, power: i64, jailed: bool },
    Reconcile,
}

fn vid(n: u8) -> ValidatorId {
    let mut bytes = [0u8; 32];
    bytes[0] = n;
    ValidatorId(bytes)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (0u8..10, 0i64..40, prop::bool::weighted(0.15)).prop_map(
            |(validator, power, jailed)| Op::Power { validator, power, jailed }
        ),
        1 => Just(Op::Reconcile),
    ]
}

fn blocks_strategy() -> impl Strategy<Value = Vec<Vec<Op>>> {
    prop::collection::vec(prop::collection::vec(op_strategy(), 0..12), 1..6)
}

fn create_service(max_validators: u16) -> Service {
    ValidatorSetService::new(
        StakingParams::default().with_max_validators(max_validators),
        Arc::new(InMemoryPoolLedger::new()),
        Arc::new(InMemoryEventSink::new()),
    )
    .expect("valid params")
}

fn all_validators(service: &Service) -> Vec<Validator> {
    (0u8..10).filter_map(|n| service.validator(&vid(n))).collect()
}

fn check_committed(service: &Service, max_validators: u16) -> Result<(), TestCaseError> {
    prop_assert!(service.check_invariants().is_ok());

    let bonded = service.bonded_validators();
    prop_assert!(bonded.len() <= max_validators as usize);
    prop_assert!(bonded.iter().all(|v| !v.jailed && v.power > 0));

    let full = max_validators > 0 && bonded.len() == max_validators as usize;
    prop_assert_eq!(service.cliff().is_some(), full);
    if let Some(cliff) = service.cliff() {
        prop_assert_eq!(Some(cliff.id), bonded.last().map(|v| v.id));
    }
    Ok(())
}

fn top_eligible(validators: &[Validator], max_validators: u16) -> BTreeSet<ValidatorId> {
    let mut eligible: Vec<_> = validators
        .iter()
        .filter(|v| v.is_eligible())
        .map(|v| v.rank())
        .collect();
    eligible.sort();
    eligible
        .into_iter()
        .take(max_validators as usize)
        .map(|rank| rank.id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_bonded_set_invariants_hold(max_validators in 0u16..5, blocks in blocks_strategy()) {
        let service = create_service(max_validators);

        for (height, ops) in blocks.into_iter().enumerate() {
            let height = height as u64 + 1;
            service.begin_block(BlockContext::new(height, height * 6)).expect("begin");
            for op in ops {
                match op {
                    Op::Power { validator, power, jailed } => {
                        let result = service.apply_power_change(vid(validator), power, jailed);
                        prop_assert!(result.is_ok(), "power change failed: {:?}", result);
                    }
                    Op::Reconcile => {
                        prop_assert!(service.reconcile_all().is_ok());
                    }
                }
            }
            service.end_block().expect("end");
            check_committed(&service, max_validators)?;
        }
    }

    #[test]
    fn prop_full_reconcile_is_idempotent_and_ranked(
        max_validators in 0u16..5,
        blocks in blocks_strategy(),
    ) {
        let service = create_service(max_validators);

        for (height, ops) in blocks.into_iter().enumerate() {
            let height = height as u64 + 1;
            service.begin_block(BlockContext::new(height, height * 6)).expect("begin");
            for op in ops {
                if let Op::Power { validator, power, jailed } = op {
                    service
                        .apply_power_change(vid(validator), power, jailed)
                        .expect("power change");
                }
            }
            service.reconcile_all().expect("first reconcile");
            let second = service.reconcile_all().expect("second reconcile");
            prop_assert!(second.is_empty());
            service.end_block().expect("end");

            let bonded: BTreeSet<_> = service
                .bonded_validators()
                .into_iter()
                .map(|v| v.id)
                .collect();
            prop_assert_eq!(
                bonded,
                top_eligible(&all_validators(&service), max_validators)
            );
            check_committed(&service, max_validators)?;
        }
    }
}
