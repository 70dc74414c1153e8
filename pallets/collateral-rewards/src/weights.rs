#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_collateral_rewards.
pub trait WeightInfo {
    fn register() -> Weight;
    fn claim_rewards() -> Weight;
    fn start_withdrawal() -> Weight;
    fn complete_withdrawal() -> Weight;
    fn assign_legacy_tiers(a: u32) -> Weight;
}

/// Default weights for pallet_collateral_rewards
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn register() -> Weight {
        Weight::from_parts(45_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(8))
            .saturating_add(T::DbWeight::get().writes(7))
    }

    fn claim_rewards() -> Weight {
        Weight::from_parts(40_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(9))
            .saturating_add(T::DbWeight::get().writes(5))
    }

    fn start_withdrawal() -> Weight {
        Weight::from_parts(50_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(9))
            .saturating_add(T::DbWeight::get().writes(8))
    }

    fn complete_withdrawal() -> Weight {
        Weight::from_parts(42_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(7))
            .saturating_add(T::DbWeight::get().writes(7))
    }

    fn assign_legacy_tiers(a: u32) -> Weight {
        Weight::from_parts(8_000_000, 1_489)
            .saturating_add(Weight::from_parts(2_500_000, 0).saturating_mul(a as u64))
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
            .saturating_add(T::DbWeight::get().writes(a as u64))
    }
}

impl WeightInfo for () {
    fn register() -> Weight {
        Weight::from_parts(45_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(8))
            .saturating_add(RocksDbWeight::get().writes(7))
    }

    fn claim_rewards() -> Weight {
        Weight::from_parts(40_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(9))
            .saturating_add(RocksDbWeight::get().writes(5))
    }

    fn start_withdrawal() -> Weight {
        Weight::from_parts(50_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(9))
            .saturating_add(RocksDbWeight::get().writes(8))
    }

    fn complete_withdrawal() -> Weight {
        Weight::from_parts(42_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(7))
            .saturating_add(RocksDbWeight::get().writes(7))
    }

    fn assign_legacy_tiers(a: u32) -> Weight {
        Weight::from_parts(8_000_000, 0)
            .saturating_add(Weight::from_parts(2_500_000, 0).saturating_mul(a as u64))
            .saturating_add(RocksDbWeight::get().writes((a as u64).saturating_add(1)))
    }
}
