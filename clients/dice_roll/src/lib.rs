//! Client for the staking and dice roll programs.
//!
//! Derives program addresses locally, reads and decodes program records,
//! composes atomic operation sets (creating missing prerequisite records in
//! the same set) and submits them through a [`Ledger`].

pub mod client;
pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod reader;
pub mod rpc;
pub mod state;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use client::{DepositReceipt, DiceRollClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use pda::AddressBook;
pub use rpc::{subscribe_logs, LogSubscription, RpcLedger};
