use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::pallet_prelude::RuntimeDebug;
use scale_info::TypeInfo;

/// Collateral class an account registers under.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum CollateralTier {
    Standard,
    Legacy10K,
    Legacy50K,
}

impl Default for CollateralTier {
    fn default() -> Self {
        CollateralTier::Standard
    }
}

/// Lifecycle state of an account that holds a record.
///
/// Accounts without a record are unregistered.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum StakerState<BlockNumber> {
    /// Collateral is locked and the account accrues weight.
    Registered,
    /// Accrual stopped; collateral can leave from `unlocks_at` onwards.
    Withdrawing { unlocks_at: BlockNumber },
}

/// Public view of an account's lifecycle, including the record-less state.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum StakerStatus {
    Unregistered,
    Registered,
    Withdrawing,
}

impl Default for StakerStatus {
    fn default() -> Self {
        StakerStatus::Unregistered
    }
}

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct StakerRecord<BlockNumber, Balance> {
    pub state: StakerState<BlockNumber>,
    /// Tier resolved at registration time
    pub tier: CollateralTier,
    /// Exact amount locked at registration and returned on exit
    pub collateral: Balance,
    /// Block at which this account's weight was last settled
    pub last_settled_at: BlockNumber,
    pub registered_at: BlockNumber,
}

/// Snapshot of the global ledger, served to off-chain readers.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct LedgerSummary<BlockNumber, Balance> {
    pub total_weight: u128,
    pub last_update_block: BlockNumber,
    pub total_registrations: u32,
    pub total_collateral_held: Balance,
    pub collateral_in_withdrawal: Balance,
    pub reward_pool: Balance,
}
