//! Account records owned by the staking and dice programs.
//!
//! Every record is stored as an 8-byte discriminator followed by the Borsh
//! encoding of its fields. The client only ever reads these; `encode` exists
//! so test ledgers can seed accounts in the same layout.

use crate::constants::NO_REFERRER;
use crate::error::{Error, Result};
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sha256_hasher::hashv;

pub const DISCRIMINATOR_LEN: usize = 8;

fn sighash(namespace: &str, name: &str) -> Hash {
    hashv(&[namespace.as_bytes(), b":", name.as_bytes()])
}

/// First eight bytes of `sha256("<namespace>:<name>")`.
pub fn discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&sighash(namespace, name).to_bytes()[..DISCRIMINATOR_LEN]);
    out
}

/// A typed account blob.
pub trait AccountRecord: AnchorSerialize + AnchorDeserialize + Sized {
    /// Type name as declared by the program; it seeds the discriminator.
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        discriminator("account", Self::NAME)
    }

    fn decode(address: &Pubkey, data: &[u8]) -> Result<Self> {
        let fail = |reason: String| Error::Decode {
            record: Self::NAME,
            address: *address,
            reason,
        };
        if data.len() < DISCRIMINATOR_LEN {
            return Err(fail(format!("{} bytes is shorter than a discriminator", data.len())));
        }
        let (head, mut body) = data.split_at(DISCRIMINATOR_LEN);
        if head != Self::discriminator() {
            return Err(fail("discriminator mismatch".into()));
        }
        Self::deserialize(&mut body).map_err(|e| fail(e.to_string()))
    }

    fn encode(&self) -> Vec<u8> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .expect("serializing into a Vec cannot fail");
        data
    }
}

// === Staking Records ===

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub admin: Pubkey,
    pub pool: Pubkey,
    pub dev_wallet: Pubkey,
    pub marketing_wallet: Pubkey,
    pub last_deposit_user: Pubkey,
    pub total_invested: u64,
    pub bump: u8,
}

impl AccountRecord for Settings {
    const NAME: &'static str = "Settings";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UserState {
    pub user: Pubkey,
    pub referrer: Pubkey,
    pub total_deposit: u64,
    pub referral_reward: u64,
    pub invest_count: u64,
    pub bump: u8,
}

impl UserState {
    /// The stored referrer, unless it is the "unset" sentinel.
    pub fn referrer(&self) -> Option<Pubkey> {
        (self.referrer != NO_REFERRER).then_some(self.referrer)
    }
}

impl AccountRecord for UserState {
    const NAME: &'static str = "UserState";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InvestData {
    pub user: Pubkey,
    pub seed_key: Pubkey,
    pub amount: u64,
    pub deposit_time: i64,
    pub last_claim_time: i64,
    pub reward_amount: u64,
    pub bump: u8,
}

impl AccountRecord for InvestData {
    const NAME: &'static str = "InvestData";
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Blacklist {
    pub admin: Pubkey,
    pub entries: Vec<Pubkey>,
    pub bump: u8,
}

impl Blacklist {
    pub fn contains(&self, wallet: &Pubkey) -> bool {
        self.entries.contains(wallet)
    }
}

impl AccountRecord for Blacklist {
    const NAME: &'static str = "Blacklist";
}

// === Dice Records ===

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    pub authority: Pubkey,
    pub gang_mint: Pubkey,
    pub usdc_mint: Pubkey,
}

impl AccountRecord for State {
    const NAME: &'static str = "State";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminator_matches_anchor_layout() {
        let expected = hashv(&[b"account:Settings"]).to_bytes();
        assert_eq!(Settings::discriminator(), expected[..8]);
        assert_ne!(Settings::discriminator(), UserState::discriminator());
    }

    #[test]
    fn test_decode_rejects_wrong_record_type() {
        let address = Pubkey::new_unique();
        let data = State::default().encode();
        let err = Settings::decode(&address, &data).unwrap_err();
        assert!(matches!(err, Error::Decode { record: "Settings", .. }));
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let address = Pubkey::new_unique();
        let err = UserState::decode(&address, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_truncated_body() {
        let address = Pubkey::new_unique();
        let mut data = UserState::default().encode();
        data.truncate(20);
        assert!(UserState::decode(&address, &data).is_err());
    }

    #[test]
    fn test_decode_tolerates_trailing_space() {
        let address = Pubkey::new_unique();
        let state = UserState {
            user: Pubkey::new_unique(),
            referrer: Pubkey::new_unique(),
            total_deposit: 5,
            ..Default::default()
        };
        let mut data = state.encode();
        data.extend_from_slice(&[0u8; 64]);
        assert_eq!(UserState::decode(&address, &data).unwrap(), state);
    }

    #[test]
    fn test_sentinel_referrer_reads_as_none() {
        let state = UserState::default();
        assert_eq!(state.referrer(), None);
        let referrer = Pubkey::new_unique();
        let state = UserState {
            referrer,
            ..Default::default()
        };
        assert_eq!(state.referrer(), Some(referrer));
    }
}
