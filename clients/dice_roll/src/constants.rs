//! Seeds and well-known addresses shared with the on-chain programs.

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Staking program (settings, user state, invest data).
pub const STAKING_PROGRAM_ID: Pubkey = pubkey!("6uc1K4HZ79uDQnmucsH5pMSe7NVvrDwgKTNotBY4rXvR");

/// Dice program (global state, SOL vault, pool token accounts).
pub const DICE_PROGRAM_ID: Pubkey = pubkey!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

// === Staking seeds ===

pub const SETTINGS_SEED: &[u8] = b"SETTINGS_SEED";
pub const POOL_SEED: &[u8] = b"POOL_SEED";
pub const BLACKLIST_SEED: &[u8] = b"BLACKLIST_SEED";
pub const USER_STATE_SEED: &[u8] = b"USER_STATE_SEED";
pub const INVEST_DATA_SEED: &[u8] = b"INVEST_DATA_SEED";

// === Dice seeds ===

pub const STATE_SEED: &[u8] = b"STATE_SEED";
pub const VAULT_SEED: &[u8] = b"VAULT_SEED";

// === Well-known wallets ===

/// Receives the staking program's dev fee.
pub const DEV_WALLET: Pubkey = pubkey!("BVeCCujTwxBGpZ2aWSbn21E8YasLnkDdJTWqv3jf9Fbg");

/// Receives the staking program's marketing fee on compound.
pub const MARKETING_WALLET: Pubkey = pubkey!("HCeTJKUw324tyx4bMFxzxoxW6RcA9YBm967DgW21pCV7");

/// Pyth SOL/USD price account (devnet), read by SOL bets.
pub const SOL_USD_PRICE_FEED: Pubkey = pubkey!("J83w4HKfqxwcq3BEMMkPFSppX3gqekLyLJBexebFVkix");

/// Sentinel stored in `UserState::referrer` when no referrer has been set.
pub const NO_REFERRER: Pubkey = Pubkey::new_from_array([0u8; 32]);
