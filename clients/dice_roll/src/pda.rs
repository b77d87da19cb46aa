//! Program-derived address helpers.
//!
//! Addresses are computed locally, without network access, with the same
//! derivation the runtime uses when a program signs for a PDA.

use crate::constants::*;
use crate::error::{Error, Result};
use anchor_spl::associated_token::get_associated_token_address;
use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

fn check_seeds(seeds: &[&[u8]]) -> Result<()> {
    if seeds.len() > MAX_SEEDS {
        return Err(Error::InvalidSeeds(format!(
            "{} seeds exceeds the maximum of {MAX_SEEDS}",
            seeds.len()
        )));
    }
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(Error::InvalidSeeds(format!(
            "seed of {} bytes exceeds the maximum of {MAX_SEED_LEN}",
            seed.len()
        )));
    }
    Ok(())
}

/// Compute the address for an exact seed list, where the last seed is
/// normally the bump.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
    Pubkey::create_program_address(seeds, program_id)
        .map_err(|e| Error::InvalidSeeds(e.to_string()))
}

/// Find the canonical (highest valid bump) address for `seeds`.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    check_seeds(seeds)?;
    // One slot is reserved for the bump.
    if seeds.len() == MAX_SEEDS {
        return Err(Error::InvalidSeeds(format!(
            "{} seeds leaves no room for the bump",
            seeds.len()
        )));
    }
    Pubkey::try_find_program_address(seeds, program_id).ok_or(Error::DerivationExhausted {
        program_id: *program_id,
    })
}

// === Staking PDA Derivations ===

/// Derive the global settings PDA address
pub fn derive_settings_pda(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[SETTINGS_SEED], program_id)
}

/// Derive the staking pool PDA address
pub fn derive_pool_pda(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[POOL_SEED], program_id)
}

/// Derive the blacklist PDA address
pub fn derive_blacklist_pda(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[BLACKLIST_SEED], program_id)
}

/// Derive the user state PDA address
pub fn derive_user_state_pda(owner: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[USER_STATE_SEED, owner.as_ref()], program_id)
}

/// Derive the invest data PDA address for one deposit
pub fn derive_invest_data_pda(
    owner: &Pubkey,
    seed_key: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_program_address(
        &[INVEST_DATA_SEED, owner.as_ref(), seed_key.as_ref()],
        program_id,
    )
}

// === Dice PDA Derivations ===

/// Derive the dice state PDA address
pub fn derive_state_pda(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[STATE_SEED], program_id)
}

/// Derive the SOL vault PDA address
pub fn derive_vault_pda(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[VAULT_SEED], program_id)
}

/// Every address the client needs, derived once per program pair.
///
/// Global addresses are computed up front; per-owner ones on demand.
#[derive(Debug, Clone)]
pub struct AddressBook {
    staking_program: Pubkey,
    dice_program: Pubkey,
    settings: Pubkey,
    pool: Pubkey,
    blacklist: Pubkey,
    dice_state: Pubkey,
    vault: Pubkey,
}

impl AddressBook {
    pub fn new(staking_program: Pubkey, dice_program: Pubkey) -> Result<Self> {
        Ok(Self {
            staking_program,
            dice_program,
            settings: derive_settings_pda(&staking_program)?.0,
            pool: derive_pool_pda(&staking_program)?.0,
            blacklist: derive_blacklist_pda(&staking_program)?.0,
            dice_state: derive_state_pda(&dice_program)?.0,
            vault: derive_vault_pda(&dice_program)?.0,
        })
    }

    pub fn staking_program(&self) -> Pubkey {
        self.staking_program
    }

    pub fn dice_program(&self) -> Pubkey {
        self.dice_program
    }

    pub fn settings(&self) -> Pubkey {
        self.settings
    }

    pub fn pool(&self) -> Pubkey {
        self.pool
    }

    pub fn blacklist(&self) -> Pubkey {
        self.blacklist
    }

    pub fn dice_state(&self) -> Pubkey {
        self.dice_state
    }

    pub fn vault(&self) -> Pubkey {
        self.vault
    }

    pub fn user_state(&self, owner: &Pubkey) -> Result<Pubkey> {
        Ok(derive_user_state_pda(owner, &self.staking_program)?.0)
    }

    pub fn invest_data(&self, owner: &Pubkey, seed_key: &Pubkey) -> Result<Pubkey> {
        Ok(derive_invest_data_pda(owner, seed_key, &self.staking_program)?.0)
    }

    /// Pool token account: the dice state's associated token account for `mint`.
    pub fn pool_token_account(&self, mint: &Pubkey) -> Pubkey {
        get_associated_token_address(&self.dice_state, mint)
    }

    pub fn user_token_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        get_associated_token_address(owner, mint)
    }
}
