use crate as pallet_collateral_rewards;
use frame_support::{derive_impl, parameter_types, traits::Currency, PalletId};
use sp_runtime::{traits::IdentityLookup, BuildStorage};

pub type AccountId = u64;
pub type Balance = u64;
pub type BlockNumber = u64;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
/// Listed in the 10k legacy tier at genesis.
pub const CHARLIE: AccountId = 3;
/// Listed in the 50k legacy tier at genesis.
pub const DAVE: AccountId = 4;
pub const EVE: AccountId = 5;

pub const INITIAL_BALANCE: Balance = 1_000_000;
pub const STANDARD: Balance = 100_000;
pub const LEGACY_10K: Balance = 10_000;
pub const LEGACY_50K: Balance = 50_000;
pub const DELAY: BlockNumber = 10;

frame_support::construct_runtime!(
	pub enum Test
	{
		System: frame_system,
		Balances: pallet_balances,
		CollateralRewards: pallet_collateral_rewards,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = frame_system::mocking::MockBlock<Test>;
	type AccountId = AccountId;
	type AccountData = pallet_balances::AccountData<Balance>;
	type Lookup = IdentityLookup<Self::AccountId>;
}

parameter_types! {
	pub static ExistentialDeposit: Balance = 1;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type AccountStore = System;
	type ExistentialDeposit = ExistentialDeposit;
}

parameter_types! {
	pub const CollateralRewardsPalletId: PalletId = PalletId(*b"py/colrw");
	pub const StandardCollateral: Balance = STANDARD;
	pub const Legacy10kCollateral: Balance = LEGACY_10K;
	pub const Legacy50kCollateral: Balance = LEGACY_50K;
	pub const WithdrawalDelay: BlockNumber = DELAY;
	pub const MaxLegacyAccounts: u32 = 16;
}

impl pallet_collateral_rewards::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Currency = Balances;
	type PalletId = CollateralRewardsPalletId;
	type StandardCollateral = StandardCollateral;
	type Legacy10kCollateral = Legacy10kCollateral;
	type Legacy50kCollateral = Legacy50kCollateral;
	type WithdrawalDelay = WithdrawalDelay;
	type MaxLegacyAccounts = MaxLegacyAccounts;
	type WeightInfo = ();
}

pub fn build(genesis: pallet_collateral_rewards::GenesisConfig<Test>) -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_balances::GenesisConfig::<Test> {
		balances: vec![
			(ALICE, INITIAL_BALANCE),
			(BOB, INITIAL_BALANCE),
			(CHARLIE, INITIAL_BALANCE),
			(DAVE, INITIAL_BALANCE),
			(EVE, INITIAL_BALANCE),
		],
	}
	.assimilate_storage(&mut t)
	.unwrap();

	genesis.assimilate_storage(&mut t).unwrap();

	let mut ext: sp_io::TestExternalities = t.into();
	ext.execute_with(|| System::set_block_number(1));
	ext
}

/// Registry sealed at genesis with CHARLIE on the 10k tier and DAVE on the 50k tier.
pub fn new_test_ext() -> sp_io::TestExternalities {
	build(pallet_collateral_rewards::GenesisConfig {
		legacy_10k: vec![CHARLIE],
		legacy_50k: vec![DAVE],
		seal_legacy_tiers: true,
	})
}

/// Registry left open for `assign_legacy_tiers`.
pub fn new_test_ext_unsealed() -> sp_io::TestExternalities {
	build(Default::default())
}

pub fn run_to_block(n: BlockNumber) {
	while System::block_number() < n {
		System::set_block_number(System::block_number() + 1);
	}
}

pub fn pot() -> AccountId {
	CollateralRewards::account_id()
}

/// Grow the reward pool by sending `amount` straight to the pot.
pub fn fund_pool(amount: Balance) {
	let _ = <Balances as Currency<AccountId>>::deposit_creating(&pot(), amount);
}
