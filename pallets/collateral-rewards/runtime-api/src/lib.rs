//! Runtime API definition for the collateral rewards pallet.
#![cfg_attr(not(feature = "std"), no_std)]

use codec::Codec;
pub use pallet_collateral_rewards::{CollateralTier, LedgerSummary, StakerStatus};

sp_api::decl_runtime_apis! {
    /// Read-only access to the reward ledger. None of these calls advance accrual.
    pub trait CollateralRewardsApi<AccountId, Balance, BlockNumber>
    where
        AccountId: Codec,
        Balance: Codec,
        BlockNumber: Codec,
    {
        fn ledger_summary() -> LedgerSummary<BlockNumber, Balance>;
        fn status_of(who: AccountId) -> StakerStatus;
        /// Blocks the account would settle if it claimed in the current block.
        fn unsettled_weight(who: AccountId) -> u128;
        /// Reward the account would receive if it claimed in the current block.
        fn estimate_rewards(who: AccountId) -> Balance;
        fn required_collateral(tier: CollateralTier) -> Balance;
    }
}
