//! Wire encoding of every remote operation.
//!
//! Instruction data is an 8-byte discriminator (`sha256("global:<name>")`)
//! followed by the Borsh-encoded arguments. Account lists are declared as
//! plain structs whose field order is the order the program expects.

pub mod dice;
pub mod staking;

use crate::state::{discriminator, DISCRIMINATOR_LEN};
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

/// Arguments of one program instruction.
pub trait InstructionArgs: AnchorSerialize + AnchorDeserialize + Sized {
    /// Snake-case handler name in the program.
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        discriminator("global", Self::NAME)
    }

    fn data(&self) -> Vec<u8> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .expect("serializing into a Vec cannot fail");
        data
    }

    /// Decode instruction data produced by [`InstructionArgs::data`]; `None`
    /// if it belongs to a different instruction or is malformed.
    fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < DISCRIMINATOR_LEN || data[..DISCRIMINATOR_LEN] != Self::discriminator() {
            return None;
        }
        Self::deserialize(&mut &data[DISCRIMINATOR_LEN..]).ok()
    }
}

/// Account list of one program instruction.
pub trait ToAccountMetas {
    fn to_account_metas(&self) -> Vec<AccountMeta>;
}

pub(crate) fn build<A: ToAccountMetas, I: InstructionArgs>(
    program_id: Pubkey,
    accounts: &A,
    args: &I,
) -> Instruction {
    Instruction {
        program_id,
        accounts: accounts.to_account_metas(),
        data: args.data(),
    }
}

/// Create `wallet`'s associated token account for `mint`, succeeding if it
/// already exists.
pub fn create_associated_token_account_idempotent(
    payer: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    let associated = anchor_spl::associated_token::get_associated_token_address(wallet, mint);
    Instruction {
        program_id: anchor_spl::associated_token::ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(associated, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(anchor_spl::token::ID, false),
        ],
        // AssociatedTokenAccountInstruction::CreateIdempotent
        data: vec![1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::staking::Deposit;

    #[test]
    fn test_args_parse_rejects_other_instruction() {
        let args = Deposit {
            amount: 10,
            seed_key: Pubkey::new_unique(),
        };
        let data = args.data();
        assert_eq!(Deposit::parse(&data), Some(args));
        assert_eq!(crate::instructions::dice::DepositSol::parse(&data), None);
    }

    #[test]
    fn test_discriminator_uses_global_namespace() {
        let expected = solana_sha256_hasher::hashv(&[b"global:deposit"]).to_bytes();
        assert_eq!(Deposit::discriminator(), expected[..8]);
    }

    #[test]
    fn test_create_ata_targets_associated_address() {
        let payer = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = create_associated_token_account_idempotent(&payer, &wallet, &mint);
        assert_eq!(
            ix.accounts[1].pubkey,
            anchor_spl::associated_token::get_associated_token_address(&wallet, &mint)
        );
        assert!(ix.accounts[0].is_signer);
    }
}
