//! Client configuration.
//!
//! Every field has a default taken from [`crate::constants`], so a config file
//! only needs the values that differ (typically the cluster URLs and, on
//! localnet, the program ids).

use crate::constants::*;
use crate::error::{Error, Result};
use serde::Deserialize;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub commitment: Commitment,
    /// RPC request timeout in seconds.
    pub timeout_secs: u64,
    #[serde(with = "pubkey_str")]
    pub staking_program_id: Pubkey,
    #[serde(with = "pubkey_str")]
    pub dice_program_id: Pubkey,
    #[serde(with = "pubkey_str")]
    pub dev_wallet: Pubkey,
    #[serde(with = "pubkey_str")]
    pub marketing_wallet: Pubkey,
    #[serde(with = "pubkey_str")]
    pub price_feed: Pubkey,
    #[serde(with = "pubkey_str")]
    pub gang_mint: Pubkey,
    #[serde(with = "pubkey_str")]
    pub usdc_mint: Pubkey,
    /// Re-read and log pool and fee wallet balances after each submission.
    pub log_balances: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8899".to_string(),
            ws_url: "ws://127.0.0.1:8900".to_string(),
            commitment: Commitment::default(),
            timeout_secs: 30,
            staking_program_id: STAKING_PROGRAM_ID,
            dice_program_id: DICE_PROGRAM_ID,
            dev_wallet: DEV_WALLET,
            marketing_wallet: MARKETING_WALLET,
            price_feed: SOL_USD_PRICE_FEED,
            gang_mint: Pubkey::default(),
            usdc_mint: Pubkey::default(),
            log_balances: true,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Public keys as base58 strings.
mod pubkey_str {
    use serde::{de::Error as _, Deserialize, Deserializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|e| D::Error::custom(format!("invalid pubkey {s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config.staking_program_id, STAKING_PROGRAM_ID);
        assert_eq!(config.dice_program_id, DICE_PROGRAM_ID);
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let program = Pubkey::new_unique();
        let json = format!(
            r#"{{"rpc_url": "https://api.devnet.solana.com", "commitment": "finalized", "staking_program_id": "{program}", "log_balances": false}}"#
        );
        let config = ClientConfig::from_json(&json).unwrap();
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.staking_program_id, program);
        assert!(!config.log_balances);
        assert_eq!(config.dev_wallet, DEV_WALLET);
    }

    #[test]
    fn test_invalid_pubkey_is_config_error() {
        let err = ClientConfig::from_json(r#"{"dev_wallet": "nope"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ClientConfig::from_file("/nonexistent/dice-roll.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
