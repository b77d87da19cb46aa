//! Staking program instructions.

use super::{build, InstructionArgs, ToAccountMetas};
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

// === Arguments ===

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Initialize {}

impl InstructionArgs for Initialize {
    const NAME: &'static str = "initialize";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitBlacklist {}

impl InstructionArgs for InitBlacklist {
    const NAME: &'static str = "init_blacklist";
}

/// Create the user state for `user` with `referrer` as its initial referrer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitUserState {
    pub user: Pubkey,
    pub referrer: Pubkey,
}

impl InstructionArgs for InitUserState {
    const NAME: &'static str = "init_user_state";
}

/// `seed_key` is a throwaway key that makes each invest data address unique.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Deposit {
    pub amount: u64,
    pub seed_key: Pubkey,
}

impl InstructionArgs for Deposit {
    const NAME: &'static str = "deposit";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Unstake {}

impl InstructionArgs for Unstake {
    const NAME: &'static str = "unstake";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Compound {}

impl InstructionArgs for Compound {
    const NAME: &'static str = "compound";
}

// === Account Structures ===

pub struct InitializeAccounts {
    pub admin: Pubkey,
    pub settings: Pubkey,
    pub pool: Pubkey,
    pub dev_wallet: Pubkey,
    pub marketing_wallet: Pubkey,
}

impl ToAccountMetas for InitializeAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.admin, true),
            AccountMeta::new(self.settings, false),
            AccountMeta::new(self.pool, false),
            AccountMeta::new_readonly(self.dev_wallet, false),
            AccountMeta::new_readonly(self.marketing_wallet, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

pub struct InitBlacklistAccounts {
    pub admin: Pubkey,
    pub settings: Pubkey,
    pub blacklist: Pubkey,
}

impl ToAccountMetas for InitBlacklistAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.admin, true),
            AccountMeta::new_readonly(self.settings, false),
            AccountMeta::new(self.blacklist, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

pub struct InitUserStateAccounts {
    pub payer: Pubkey,
    pub settings: Pubkey,
    pub user_state: Pubkey,
}

impl InitUserStateAccounts {
    /// Position of the created record in the account list.
    pub const USER_STATE_INDEX: usize = 2;
}

impl ToAccountMetas for InitUserStateAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.settings, false),
            AccountMeta::new(self.user_state, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

pub struct DepositAccounts {
    pub user: Pubkey,
    pub settings: Pubkey,
    pub dev_wallet: Pubkey,
    pub pool: Pubkey,
    pub user_state: Pubkey,
    pub invest_data: Pubkey,
    pub referrer: Pubkey,
    pub ref_user_state: Pubkey,
    pub last_deposit_user: Pubkey,
}

impl DepositAccounts {
    pub const USER_STATE_INDEX: usize = 4;
    pub const INVEST_DATA_INDEX: usize = 5;
    pub const REFERRER_INDEX: usize = 6;
    pub const REF_USER_STATE_INDEX: usize = 7;
}

impl ToAccountMetas for DepositAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.settings, false),
            AccountMeta::new(self.dev_wallet, false),
            AccountMeta::new(self.pool, false),
            AccountMeta::new(self.user_state, false),
            AccountMeta::new(self.invest_data, false),
            AccountMeta::new_readonly(self.referrer, false),
            AccountMeta::new(self.ref_user_state, false),
            AccountMeta::new_readonly(self.last_deposit_user, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

pub struct UnstakeAccounts {
    pub user: Pubkey,
    pub settings: Pubkey,
    pub blacklist: Pubkey,
    pub pool: Pubkey,
    pub invest_data: Pubkey,
    pub user_state: Pubkey,
    pub dev_wallet: Pubkey,
}

impl ToAccountMetas for UnstakeAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.settings, false),
            AccountMeta::new_readonly(self.blacklist, false),
            AccountMeta::new(self.pool, false),
            AccountMeta::new(self.invest_data, false),
            AccountMeta::new(self.user_state, false),
            AccountMeta::new(self.dev_wallet, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

pub struct CompoundAccounts {
    pub user: Pubkey,
    pub settings: Pubkey,
    pub pool: Pubkey,
    pub invest_data: Pubkey,
    pub marketing_wallet: Pubkey,
}

impl ToAccountMetas for CompoundAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.settings, false),
            AccountMeta::new(self.pool, false),
            AccountMeta::new(self.invest_data, false),
            AccountMeta::new(self.marketing_wallet, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

// === Builders ===

pub fn initialize(program_id: Pubkey, accounts: &InitializeAccounts) -> Instruction {
    build(program_id, accounts, &Initialize {})
}

pub fn init_blacklist(program_id: Pubkey, accounts: &InitBlacklistAccounts) -> Instruction {
    build(program_id, accounts, &InitBlacklist {})
}

pub fn init_user_state(
    program_id: Pubkey,
    accounts: &InitUserStateAccounts,
    user: Pubkey,
    referrer: Pubkey,
) -> Instruction {
    build(program_id, accounts, &InitUserState { user, referrer })
}

pub fn deposit(
    program_id: Pubkey,
    accounts: &DepositAccounts,
    amount: u64,
    seed_key: Pubkey,
) -> Instruction {
    build(program_id, accounts, &Deposit { amount, seed_key })
}

pub fn unstake(program_id: Pubkey, accounts: &UnstakeAccounts) -> Instruction {
    build(program_id, accounts, &Unstake {})
}

pub fn compound(program_id: Pubkey, accounts: &CompoundAccounts) -> Instruction {
    build(program_id, accounts, &Compound {})
}
