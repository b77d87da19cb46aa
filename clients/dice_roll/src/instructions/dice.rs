//! Dice program instructions.

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

/// Bet `amount` on a roll at or below `target`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlaceTokenBet {
    pub amount: u64,
    pub target: u8,
}

impl InstructionArgs for PlaceTokenBet {
    const NAME: &'static str = "place_token_bet";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlaceSolBet {
    pub amount: u64,
    pub target: u8,
}

impl InstructionArgs for PlaceSolBet {
    const NAME: &'static str = "place_sol_bet";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DepositSol {
    pub amount: u64,
}

impl InstructionArgs for DepositSol {
    const NAME: &'static str = "deposit_sol";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DepositToken {
    pub amount: u64,
}

impl InstructionArgs for DepositToken {
    const NAME: &'static str = "deposit_token";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WithdrawSol {
    pub amount: u64,
}

impl InstructionArgs for WithdrawSol {
    const NAME: &'static str = "withdraw_sol";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WithdrawToken {
    pub amount: u64,
}

impl InstructionArgs for WithdrawToken {
    const NAME: &'static str = "withdraw_token";
}

// === Account Structures ===

pub struct InitializeAccounts {
    pub authority: Pubkey,
    pub state: Pubkey,
    pub gang_mint: Pubkey,
    pub usdc_mint: Pubkey,
    pub pool_gang_token_account: Pubkey,
    pub pool_usdc_token_account: Pubkey,
    pub pool_sol_vault: Pubkey,
}

impl ToAccountMetas for InitializeAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new(self.state, false),
            AccountMeta::new_readonly(self.gang_mint, false),
            AccountMeta::new_readonly(self.usdc_mint, false),
            AccountMeta::new(self.pool_gang_token_account, false),
            AccountMeta::new(self.pool_usdc_token_account, false),
            AccountMeta::new_readonly(self.pool_sol_vault, false),
            AccountMeta::new_readonly(anchor_spl::token::ID, false),
            AccountMeta::new_readonly(anchor_spl::associated_token::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

/// Shared by token bets, token deposits and token withdrawals.
pub struct TokenTransferAccounts {
    pub authority: Pubkey,
    pub state: Pubkey,
    pub pool_token_account: Pubkey,
    pub user_token_account: Pubkey,
    pub bet_token_mint: Pubkey,
}

impl ToAccountMetas for TokenTransferAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new(self.state, false),
            AccountMeta::new(self.pool_token_account, false),
            AccountMeta::new(self.user_token_account, false),
            AccountMeta::new_readonly(self.bet_token_mint, false),
            AccountMeta::new_readonly(anchor_spl::token::ID, false),
            AccountMeta::new_readonly(anchor_spl::associated_token::ID, false),
        ]
    }
}

pub struct PlaceSolBetAccounts {
    pub authority: Pubkey,
    pub state: Pubkey,
    pub pool_sol_vault: Pubkey,
    /// Passed after the declared accounts, as a remaining account.
    pub price_feed: Pubkey,
}

impl PlaceSolBetAccounts {
    pub const PRICE_FEED_INDEX: usize = 5;
}

impl ToAccountMetas for PlaceSolBetAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new(self.state, false),
            AccountMeta::new(self.pool_sol_vault, false),
            AccountMeta::new_readonly(anchor_spl::token::ID, false),
            AccountMeta::new_readonly(anchor_spl::associated_token::ID, false),
            AccountMeta::new_readonly(self.price_feed, false),
        ]
    }
}

pub struct DepositSolAccounts {
    pub authority: Pubkey,
    pub pool_sol_vault: Pubkey,
}

impl ToAccountMetas for DepositSolAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new(self.pool_sol_vault, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ]
    }
}

pub struct WithdrawSolAccounts {
    pub authority: Pubkey,
    pub state: Pubkey,
    pub pool_sol_vault: Pubkey,
}

impl ToAccountMetas for WithdrawSolAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new_readonly(self.state, false),
            AccountMeta::new(self.pool_sol_vault, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ]
    }
}

// === Builders ===

pub fn initialize(program_id: Pubkey, accounts: &InitializeAccounts) -> Instruction {
    build(program_id, accounts, &Initialize {})
}

pub fn place_token_bet(
    program_id: Pubkey,
    accounts: &TokenTransferAccounts,
    amount: u64,
    target: u8,
) -> Instruction {
    build(program_id, accounts, &PlaceTokenBet { amount, target })
}

pub fn place_sol_bet(
    program_id: Pubkey,
    accounts: &PlaceSolBetAccounts,
    amount: u64,
    target: u8,
) -> Instruction {
    build(program_id, accounts, &PlaceSolBet { amount, target })
}

pub fn deposit_sol(program_id: Pubkey, accounts: &DepositSolAccounts, amount: u64) -> Instruction {
    build(program_id, accounts, &DepositSol { amount })
}

pub fn deposit_token(
    program_id: Pubkey,
    accounts: &TokenTransferAccounts,
    amount: u64,
) -> Instruction {
    build(program_id, accounts, &DepositToken { amount })
}

pub fn withdraw_sol(program_id: Pubkey, accounts: &WithdrawSolAccounts, amount: u64) -> Instruction {
    build(program_id, accounts, &WithdrawSol { amount })
}

pub fn withdraw_token(
    program_id: Pubkey,
    accounts: &TokenTransferAccounts,
    amount: u64,
) -> Instruction {
    build(program_id, accounts, &WithdrawToken { amount })
}
