//! Benchmarking setup for pallet-collateral-rewards
#![cfg(feature = "runtime-benchmarks")]

use super::*;
use crate::Pallet as CollateralRewards;
use frame_benchmarking::v2::*;
use frame_support::{
	assert_ok,
	traits::{Currency, Get},
};
use frame_system::{pallet_prelude::BlockNumberFor, RawOrigin};
use sp_runtime::traits::Saturating;
use sp_std::vec::Vec;

const SEED: u32 = 0;

fn assert_last_event<T: Config>(generic_event: <T as Config>::RuntimeEvent) {
	frame_system::Pallet::<T>::assert_last_event(generic_event.into());
}

/// Open the pot and seal the legacy registry so lifecycle calls are accepted.
fn prepare<T: Config>() {
	let pot = CollateralRewards::<T>::account_id();
	if T::Currency::free_balance(&pot) < T::Currency::minimum_balance() {
		T::Currency::make_free_balance_be(&pot, T::Currency::minimum_balance());
	}
	LegacyTiersInitialized::<T>::put(true);
}

/// Create an account holding enough for standard collateral plus headroom.
fn create_funded_user<T: Config>(name: &'static str, index: u32) -> T::AccountId {
	let user: T::AccountId = account(name, index, SEED);
	let balance = T::StandardCollateral::get()
		.saturating_mul(2u32.into())
		.saturating_add(T::Currency::minimum_balance());
	T::Currency::make_free_balance_be(&user, balance);
	user
}

fn register_user<T: Config>(name: &'static str, index: u32) -> T::AccountId {
	let user = create_funded_user::<T>(name, index);
	assert_ok!(CollateralRewards::<T>::register(
		RawOrigin::Signed(user.clone()).into(),
		T::StandardCollateral::get(),
	));
	user
}

/// Leave `user` with a pending reward by letting blocks pass and topping up the pot.
fn accrue<T: Config>(blocks: u32) {
	let now = frame_system::Pallet::<T>::block_number();
	frame_system::Pallet::<T>::set_block_number(now.saturating_add(blocks.into()));
	let _ = T::Currency::deposit_creating(
		&CollateralRewards::<T>::account_id(),
		T::Currency::minimum_balance().saturating_mul(1_000u32.into()),
	);
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn register() {
		prepare::<T>();
		// Another staker keeps the global advance on its non-trivial path.
		register_user::<T>("staker", 0);
		accrue::<T>(5);
		let caller = create_funded_user::<T>("caller", 0);
		let collateral = T::StandardCollateral::get();

		#[extrinsic_call]
		register(RawOrigin::Signed(caller.clone()), collateral);

		assert_eq!(CollateralRewards::<T>::status_of(&caller), StakerStatus::Registered);
		assert_last_event::<T>(
			Event::Registration { who: caller, tier: CollateralTier::Standard, collateral }.into(),
		);
	}

	#[benchmark]
	fn claim_rewards() {
		prepare::<T>();
		let caller = register_user::<T>("caller", 0);
		register_user::<T>("staker", 0);
		accrue::<T>(10);
		let before = T::Currency::free_balance(&caller);

		#[extrinsic_call]
		claim_rewards(RawOrigin::Signed(caller.clone()));

		assert!(T::Currency::free_balance(&caller) > before);
	}

	#[benchmark]
	fn start_withdrawal() {
		prepare::<T>();
		let caller = register_user::<T>("caller", 0);
		register_user::<T>("staker", 0);
		accrue::<T>(10);

		#[extrinsic_call]
		start_withdrawal(RawOrigin::Signed(caller.clone()));

		assert_eq!(CollateralRewards::<T>::status_of(&caller), StakerStatus::Withdrawing);
	}

	#[benchmark]
	fn complete_withdrawal() {
		prepare::<T>();
		let caller = register_user::<T>("caller", 0);
		assert_ok!(CollateralRewards::<T>::start_withdrawal(
			RawOrigin::Signed(caller.clone()).into()
		));
		let unlocks_at: BlockNumberFor<T> =
			frame_system::Pallet::<T>::block_number().saturating_add(T::WithdrawalDelay::get());
		frame_system::Pallet::<T>::set_block_number(unlocks_at);

		#[extrinsic_call]
		complete_withdrawal(RawOrigin::Signed(caller.clone()));

		assert_eq!(CollateralRewards::<T>::status_of(&caller), StakerStatus::Unregistered);
	}

	#[benchmark]
	fn assign_legacy_tiers(a: Linear<0, { T::MaxLegacyAccounts::get() }>) {
		LegacyTiersInitialized::<T>::kill();
		let half = a / 2;
		let legacy_10k: Vec<T::AccountId> = (0..half).map(|i| account("legacy", i, SEED)).collect();
		let legacy_50k: Vec<T::AccountId> = (half..a).map(|i| account("legacy", i, SEED)).collect();

		#[extrinsic_call]
		assign_legacy_tiers(RawOrigin::Root, legacy_10k, legacy_50k);

		assert!(LegacyTiersInitialized::<T>::get());
	}

	impl_benchmark_test_suite!(CollateralRewards, crate::mock::new_test_ext(), crate::mock::Test);
}
