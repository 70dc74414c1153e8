//! # Collateral Rewards Pallet
//!
//! ## Overview
//!
//! Accounts lock a fixed amount of collateral in the pallet pot to become registered stakers.
//! While registered they accrue a share of the pot's reward balance, weighted by the number of
//! blocks they have spent registered. Shares are settled lazily whenever an account interacts
//! with the pallet, so no work is done per block or per staker.
//!
//! Anything the pot holds above the locked collateral (and its existential deposit) is the
//! reward pool. Rewards are topped up by plain transfers into [`Pallet::account_id`].
//!
//! ### Accrual
//!
//! [`TotalWeight`] counts outstanding "account-blocks": every block adds one unit per active
//! registration, and every settlement removes the settling account's share. A claim pays
//! `reward_pool * elapsed / TotalWeight`, rounding down; the remainder stays in the pool.
//!
//! ### Collateral tiers
//!
//! Most accounts lock [`Config::StandardCollateral`]. A one-time legacy registry grants reduced
//! tiers ([`Config::Legacy10kCollateral`], [`Config::Legacy50kCollateral`]) to listed accounts.
//! A legacy tier is consumed by the account's first completed withdrawal.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `register`: lock the tier-specific collateral and start accruing.
//! - `claim_rewards`: pay out the caller's accrued share of the reward pool.
//! - `start_withdrawal`: flush rewards, stop accruing and start the withdrawal delay.
//! - `complete_withdrawal`: return the collateral once the delay has passed.
//!
//! ### Privileged Functions
//!
//! - `assign_legacy_tiers`: populate and seal the legacy tier registry. Root only, callable once.
//!
//! Lifecycle calls are rejected until the registry is sealed, either by `assign_legacy_tiers` or
//! through genesis.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;
pub use types::*;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

mod types;
pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::collateral-rewards";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use frame_support::{
		pallet_prelude::*,
		traits::{Currency, ExistenceRequirement},
		PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_runtime::{
		helpers_128bit::multiply_by_rational_with_rounding,
		traits::{AccountIdConversion, CheckedAdd, Saturating, Zero},
		ArithmeticError, Rounding, SaturatedConversion,
	};
	use sp_std::{collections::btree_set::BTreeSet, vec::Vec};

	pub type BalanceOf<T> =
		<<T as Config>::Currency as Currency<<T as frame_system::Config>::AccountId>>::Balance;

	pub type StakerRecordOf<T> = StakerRecord<BlockNumberFor<T>, BalanceOf<T>>;

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Currency holding collateral and rewards.
		type Currency: Currency<Self::AccountId>;

		/// The pallet's id, used for deriving the pot account that holds all funds.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Collateral required from accounts without a legacy tier.
		#[pallet::constant]
		type StandardCollateral: Get<BalanceOf<Self>>;

		#[pallet::constant]
		type Legacy10kCollateral: Get<BalanceOf<Self>>;

		#[pallet::constant]
		type Legacy50kCollateral: Get<BalanceOf<Self>>;

		/// Blocks between `start_withdrawal` and the earliest `complete_withdrawal`.
		#[pallet::constant]
		type WithdrawalDelay: Get<BlockNumberFor<Self>>;

		/// Upper bound on the combined size of the legacy tier lists.
		#[pallet::constant]
		type MaxLegacyAccounts: Get<u32>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;
	}

	/// Outstanding account-blocks not yet settled by any claimant.
	#[pallet::storage]
	#[pallet::getter(fn total_weight)]
	pub type TotalWeight<T> = StorageValue<_, u128, ValueQuery>;

	/// Block at which `TotalWeight` was last advanced.
	#[pallet::storage]
	#[pallet::getter(fn last_update_block)]
	pub type LastUpdateBlock<T: Config> = StorageValue<_, BlockNumberFor<T>, ValueQuery>;

	/// Number of accounts currently accruing weight.
	#[pallet::storage]
	#[pallet::getter(fn total_registrations)]
	pub type ActiveRegistrations<T> = StorageValue<_, u32, ValueQuery>;

	/// Collateral locked by registered accounts.
	#[pallet::storage]
	#[pallet::getter(fn total_collateral_held)]
	pub type TotalCollateralHeld<T: Config> = StorageValue<_, BalanceOf<T>, ValueQuery>;

	/// Collateral of accounts waiting out the withdrawal delay.
	#[pallet::storage]
	#[pallet::getter(fn collateral_in_withdrawal)]
	pub type CollateralInWithdrawal<T: Config> = StorageValue<_, BalanceOf<T>, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn staker)]
	pub type Stakers<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, StakerRecordOf<T>>;

	/// Accounts entitled to a reduced collateral tier.
	#[pallet::storage]
	#[pallet::getter(fn legacy_tier)]
	pub type LegacyTiers<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, CollateralTier>;

	/// Set once the legacy registry has been written; it can't be written again.
	#[pallet::storage]
	#[pallet::getter(fn legacy_tiers_initialized)]
	pub type LegacyTiersInitialized<T> = StorageValue<_, bool, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		pub legacy_10k: Vec<T::AccountId>,
		pub legacy_50k: Vec<T::AccountId>,
		/// Seal the registry even when both lists are empty. Non-empty lists always seal it.
		pub seal_legacy_tiers: bool,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			let pot = Pallet::<T>::account_id();
			let min = T::Currency::minimum_balance();
			if T::Currency::free_balance(&pot) < min {
				let _ = T::Currency::make_free_balance_be(&pot, min);
			}

			if self.seal_legacy_tiers || !self.legacy_10k.is_empty() || !self.legacy_50k.is_empty()
			{
				Pallet::<T>::do_assign_legacy_tiers(&self.legacy_10k, &self.legacy_50k)
					.expect("legacy tier lists must be disjoint and within MaxLegacyAccounts");
			}
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// An account locked its collateral and started accruing rewards.
		Registration { who: T::AccountId, tier: CollateralTier, collateral: BalanceOf<T> },
		/// An account stopped accruing; its collateral unlocks at `unlocks_at`.
		Deregistration { who: T::AccountId, unlocks_at: BlockNumberFor<T> },
		/// Accrued rewards were paid out.
		RewardsClaimed { who: T::AccountId, amount: BalanceOf<T> },
		/// Collateral was returned and the account's record removed.
		WithdrawalCompleted { who: T::AccountId, collateral: BalanceOf<T> },
		/// The legacy registry was written and sealed.
		LegacyTiersAssigned { legacy_10k: u32, legacy_50k: u32 },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Collateral doesn't exactly match the amount required for the caller's tier
		InvalidCollateral,
		/// Caller already holds a registration or is withdrawing
		AlreadyRegistered,
		/// Caller isn't registered
		NotRegistered,
		/// Caller hasn't started a withdrawal
		NotStarted,
		/// The withdrawal delay hasn't passed yet
		DelayNotElapsed,
		/// The legacy registry has already been written
		AlreadyInitialized,
		/// The legacy registry must be sealed before accounts can register
		NotInitialized,
		/// An account was listed in both legacy tiers
		OverlappingLegacyTiers,
		/// The legacy lists exceed `MaxLegacyAccounts`
		TooManyLegacyAccounts,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state()
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Lock `collateral` in the pot and start accruing rewards.
		///
		/// `collateral` must equal the amount required for the caller's tier exactly.
		///
		/// Emits `Registration`.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::register())]
		pub fn register(origin: OriginFor<T>, collateral: BalanceOf<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_initialized()?;

			ensure!(!Stakers::<T>::contains_key(&who), Error::<T>::AlreadyRegistered);
			let tier = Self::tier_of(&who);
			ensure!(collateral == Self::required_collateral(tier), Error::<T>::InvalidCollateral);

			// Bring the global weight up to date before the newcomer is counted.
			Self::advance_global_weight();
			let now = frame_system::Pallet::<T>::block_number();

			Self::ensure_pot_funded(&who)?;
			T::Currency::transfer(
				&who,
				&Self::account_id(),
				collateral,
				ExistenceRequirement::KeepAlive,
			)?;

			ActiveRegistrations::<T>::try_mutate(|count| -> DispatchResult {
				*count = count.checked_add(1).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;
			TotalCollateralHeld::<T>::try_mutate(|held| -> DispatchResult {
				*held = held.checked_add(&collateral).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;
			Stakers::<T>::insert(
				&who,
				StakerRecord {
					state: StakerState::Registered,
					tier,
					collateral,
					last_settled_at: now,
					registered_at: now,
				},
			);

			log::debug!(target: LOG_TARGET, "{:?} registered at {:?} with {:?}", who, now, tier);
			Self::deposit_event(Event::Registration { who, tier, collateral });
			Ok(())
		}

		/// Pay the caller its share of the reward pool accrued since its last settlement.
		///
		/// A zero share is not an error; nothing is transferred in that case.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::claim_rewards())]
		pub fn claim_rewards(origin: OriginFor<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_initialized()?;

			Self::do_claim_rewards(&who, false)?;
			Ok(())
		}

		/// Flush pending rewards, stop accruing, and start the withdrawal delay.
		///
		/// Emits `Deregistration`.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::start_withdrawal())]
		pub fn start_withdrawal(origin: OriginFor<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_initialized()?;

			Self::do_claim_rewards(&who, true)?;

			let now = frame_system::Pallet::<T>::block_number();
			let unlocks_at =
				now.checked_add(&T::WithdrawalDelay::get()).ok_or(ArithmeticError::Overflow)?;

			let collateral = Stakers::<T>::try_mutate(&who, |maybe_record| {
				let record = maybe_record.as_mut().ok_or(Error::<T>::NotRegistered)?;
				record.state = StakerState::Withdrawing { unlocks_at };
				Ok::<_, DispatchError>(record.collateral)
			})?;

			ActiveRegistrations::<T>::mutate(|count| *count = count.saturating_sub(1));
			TotalCollateralHeld::<T>::mutate(|held| *held = held.saturating_sub(collateral));
			CollateralInWithdrawal::<T>::mutate(|in_flight| {
				*in_flight = in_flight.saturating_add(collateral)
			});

			log::debug!(target: LOG_TARGET, "{:?} deregistered, unlocks at {:?}", who, unlocks_at);
			Self::deposit_event(Event::Deregistration { who, unlocks_at });
			Ok(())
		}

		/// Return the caller's collateral once its withdrawal delay has passed.
		///
		/// Any legacy tier the caller held is consumed.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::complete_withdrawal())]
		pub fn complete_withdrawal(origin: OriginFor<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_initialized()?;

			let record = Stakers::<T>::get(&who).ok_or(Error::<T>::NotStarted)?;
			let StakerState::Withdrawing { unlocks_at } = record.state else {
				return Err(Error::<T>::NotStarted.into());
			};

			let now = frame_system::Pallet::<T>::block_number();
			ensure!(now >= unlocks_at, Error::<T>::DelayNotElapsed);
			Self::advance_global_weight();

			LegacyTiers::<T>::remove(&who);
			CollateralInWithdrawal::<T>::mutate(|in_flight| {
				*in_flight = in_flight.saturating_sub(record.collateral)
			});
			Stakers::<T>::remove(&who);

			T::Currency::transfer(
				&Self::account_id(),
				&who,
				record.collateral,
				ExistenceRequirement::KeepAlive,
			)?;

			log::debug!(target: LOG_TARGET, "{:?} withdrew {:?}", who, record.collateral);
			Self::deposit_event(Event::WithdrawalCompleted { who, collateral: record.collateral });
			Ok(())
		}

		/// Populate the legacy tier registry and seal it.
		///
		/// The origin must be Root. Can only succeed once.
		#[pallet::call_index(4)]
		#[pallet::weight(T::WeightInfo::assign_legacy_tiers(
			legacy_10k.len().saturating_add(legacy_50k.len()) as u32
		))]
		pub fn assign_legacy_tiers(
			origin: OriginFor<T>,
			legacy_10k: Vec<T::AccountId>,
			legacy_50k: Vec<T::AccountId>,
		) -> DispatchResult {
			ensure_root(origin)?;
			Self::do_assign_legacy_tiers(&legacy_10k, &legacy_50k)
		}
	}

	impl<T: Config> Pallet<T> {
		/// The pot account holding all collateral and rewards.
		pub fn account_id() -> T::AccountId {
			T::PalletId::get().into_account_truncating()
		}

		/// Advance `TotalWeight` to the current block. At most one update per block.
		pub(crate) fn advance_global_weight() {
			let now = frame_system::Pallet::<T>::block_number();
			let last = LastUpdateBlock::<T>::get();
			if now <= last {
				return;
			}

			let elapsed: u128 = now.saturating_sub(last).saturated_into();
			let accrued = elapsed.saturating_mul(ActiveRegistrations::<T>::get() as u128);
			TotalWeight::<T>::mutate(|weight| *weight = weight.saturating_add(accrued));
			LastUpdateBlock::<T>::put(now);
		}

		/// Fold the account's elapsed weight into a payable amount and reset its checkpoint.
		///
		/// Only storage is touched here; the caller moves the funds afterwards.
		pub(crate) fn settle(who: &T::AccountId) -> Result<BalanceOf<T>, DispatchError> {
			let mut record = Stakers::<T>::get(who).ok_or(Error::<T>::NotRegistered)?;
			ensure!(matches!(record.state, StakerState::Registered), Error::<T>::NotRegistered);

			Self::advance_global_weight();
			let now = frame_system::Pallet::<T>::block_number();

			let elapsed: u128 = now.saturating_sub(record.last_settled_at).saturated_into();
			let total_weight = TotalWeight::<T>::get();
			if total_weight.is_zero() || elapsed.is_zero() {
				return Ok(Zero::zero());
			}

			let pool: u128 = Self::reward_pool().saturated_into();
			let payable =
				multiply_by_rational_with_rounding(pool, elapsed, total_weight, Rounding::Down)
					.ok_or(ArithmeticError::Overflow)?;

			TotalWeight::<T>::put(total_weight.saturating_sub(elapsed));
			record.last_settled_at = now;
			Stakers::<T>::insert(who, record);

			Ok(payable.saturated_into())
		}

		/// Settle `who` and transfer the result from the pot.
		///
		/// With `forfeit_dust`, a payout the recipient account can't hold (below the existential
		/// deposit into an empty account) is left in the pool instead of failing the call.
		pub fn do_claim_rewards(
			who: &T::AccountId,
			forfeit_dust: bool,
		) -> Result<BalanceOf<T>, DispatchError> {
			let amount = Self::settle(who)?;
			if amount.is_zero() {
				return Ok(amount);
			}
			if forfeit_dust &&
				T::Currency::total_balance(who).is_zero() &&
				amount < T::Currency::minimum_balance()
			{
				log::debug!(
					target: LOG_TARGET,
					"{:?} forfeits {:?} below existential deposit",
					who,
					amount
				);
				return Ok(Zero::zero());
			}

			T::Currency::transfer(
				&Self::account_id(),
				who,
				amount,
				ExistenceRequirement::KeepAlive,
			)?;

			Self::deposit_event(Event::RewardsClaimed { who: who.clone(), amount });
			Ok(amount)
		}

		pub fn do_assign_legacy_tiers(
			legacy_10k: &[T::AccountId],
			legacy_50k: &[T::AccountId],
		) -> DispatchResult {
			ensure!(!LegacyTiersInitialized::<T>::get(), Error::<T>::AlreadyInitialized);
			ensure!(
				legacy_10k.len().saturating_add(legacy_50k.len()) <=
					T::MaxLegacyAccounts::get() as usize,
				Error::<T>::TooManyLegacyAccounts
			);

			let tier_10k: BTreeSet<&T::AccountId> = legacy_10k.iter().collect();
			let tier_50k: BTreeSet<&T::AccountId> = legacy_50k.iter().collect();
			ensure!(tier_10k.is_disjoint(&tier_50k), Error::<T>::OverlappingLegacyTiers);

			for who in tier_10k.iter() {
				LegacyTiers::<T>::insert(*who, CollateralTier::Legacy10K);
			}
			for who in tier_50k.iter() {
				LegacyTiers::<T>::insert(*who, CollateralTier::Legacy50K);
			}
			LegacyTiersInitialized::<T>::put(true);

			Self::deposit_event(Event::LegacyTiersAssigned {
				legacy_10k: tier_10k.len() as u32,
				legacy_50k: tier_50k.len() as u32,
			});
			Ok(())
		}

		/// Top the pot up to the existential deposit at `payer`'s expense if it has fallen short,
		/// so collateral can always leave with `KeepAlive`.
		fn ensure_pot_funded(payer: &T::AccountId) -> DispatchResult {
			let pot = Self::account_id();
			let shortfall =
				T::Currency::minimum_balance().saturating_sub(T::Currency::free_balance(&pot));
			if shortfall.is_zero() {
				return Ok(());
			}

			log::debug!(target: LOG_TARGET, "{:?} tops up the pot by {:?}", payer, shortfall);
			T::Currency::transfer(payer, &pot, shortfall, ExistenceRequirement::KeepAlive)
		}

		fn ensure_initialized() -> DispatchResult {
			ensure!(LegacyTiersInitialized::<T>::get(), Error::<T>::NotInitialized);
			Ok(())
		}

		pub fn tier_of(who: &T::AccountId) -> CollateralTier {
			LegacyTiers::<T>::get(who).unwrap_or(CollateralTier::Standard)
		}

		pub fn required_collateral(tier: CollateralTier) -> BalanceOf<T> {
			match tier {
				CollateralTier::Standard => T::StandardCollateral::get(),
				CollateralTier::Legacy10K => T::Legacy10kCollateral::get(),
				CollateralTier::Legacy50K => T::Legacy50kCollateral::get(),
			}
		}

		pub fn status_of(who: &T::AccountId) -> StakerStatus {
			match Stakers::<T>::get(who).map(|record| record.state) {
				None => StakerStatus::Unregistered,
				Some(StakerState::Registered) => StakerStatus::Registered,
				Some(StakerState::Withdrawing { .. }) => StakerStatus::Withdrawing,
			}
		}

		/// Distributable balance: pot funds minus all collateral and the pot's existential deposit.
		pub fn reward_pool() -> BalanceOf<T> {
			T::Currency::free_balance(&Self::account_id())
				.saturating_sub(TotalCollateralHeld::<T>::get())
				.saturating_sub(CollateralInWithdrawal::<T>::get())
				.saturating_sub(T::Currency::minimum_balance())
		}

		/// Weight the account would settle if it claimed now. Zero unless registered.
		///
		/// Read-only: global weight is not advanced.
		pub fn unsettled_weight(who: &T::AccountId) -> u128 {
			match Stakers::<T>::get(who) {
				Some(record) if matches!(record.state, StakerState::Registered) => {
					let now = frame_system::Pallet::<T>::block_number();
					now.saturating_sub(record.last_settled_at).saturated_into()
				},
				_ => 0,
			}
		}

		/// `TotalWeight` as it would read after advancing to the current block.
		pub fn projected_total_weight() -> u128 {
			let now = frame_system::Pallet::<T>::block_number();
			let elapsed: u128 = now.saturating_sub(LastUpdateBlock::<T>::get()).saturated_into();
			TotalWeight::<T>::get()
				.saturating_add(elapsed.saturating_mul(ActiveRegistrations::<T>::get() as u128))
		}

		/// Estimate of what `claim_rewards` would pay `who` in the current block.
		pub fn estimate_rewards(who: &T::AccountId) -> BalanceOf<T> {
			let elapsed = Self::unsettled_weight(who);
			let total_weight = Self::projected_total_weight();
			if total_weight.is_zero() || elapsed.is_zero() {
				return Zero::zero();
			}

			let pool: u128 = Self::reward_pool().saturated_into();
			multiply_by_rational_with_rounding(pool, elapsed, total_weight, Rounding::Down)
				.unwrap_or_default()
				.saturated_into()
		}

		pub fn ledger_summary() -> LedgerSummary<BlockNumberFor<T>, BalanceOf<T>> {
			LedgerSummary {
				total_weight: TotalWeight::<T>::get(),
				last_update_block: LastUpdateBlock::<T>::get(),
				total_registrations: ActiveRegistrations::<T>::get(),
				total_collateral_held: TotalCollateralHeld::<T>::get(),
				collateral_in_withdrawal: CollateralInWithdrawal::<T>::get(),
				reward_pool: Self::reward_pool(),
			}
		}

		/// Cross-check the global counters against the individual records.
		#[cfg(any(feature = "try-runtime", test))]
		pub fn do_try_state() -> Result<(), DispatchError> {
			let now = frame_system::Pallet::<T>::block_number();
			let mut registered = 0u32;
			let mut unsettled = 0u128;
			let mut held = BalanceOf::<T>::zero();
			let mut in_flight = BalanceOf::<T>::zero();

			for (_, record) in Stakers::<T>::iter() {
				match record.state {
					StakerState::Registered => {
						registered = registered.saturating_add(1);
						let elapsed: u128 =
							now.saturating_sub(record.last_settled_at).saturated_into();
						unsettled = unsettled.saturating_add(elapsed);
						held = held.saturating_add(record.collateral);
					},
					StakerState::Withdrawing { .. } => {
						in_flight = in_flight.saturating_add(record.collateral);
					},
				}
			}

			let checks = [
				(registered == ActiveRegistrations::<T>::get(), "active registrations mismatch"),
				(unsettled == Self::projected_total_weight(), "total weight mismatch"),
				(held == TotalCollateralHeld::<T>::get(), "collateral held mismatch"),
				(in_flight == CollateralInWithdrawal::<T>::get(), "in-flight collateral mismatch"),
			];
			for (ok, reason) in checks {
				if !ok {
					log::warn!(target: LOG_TARGET, "try-state failed: {}", reason);
					return Err(DispatchError::Other(reason));
				}
			}
			Ok(())
		}
	}
}
