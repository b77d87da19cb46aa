//! The boundary to the remote cluster.
//!
//! Everything that touches the network goes through [`Ledger`], so the reader,
//! composer and orchestration layers can run against the RPC client or an
//! in-memory ledger alike.

use crate::composer::PendingOperationSet;
use crate::error::Result;
use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature, signer::keypair::Keypair};
use std::sync::Arc;

/// System program error for creating an account that already exists.
pub const ACCOUNT_ALREADY_IN_USE: u32 = 0;

/// Read and submit access to the cluster.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Raw data of the account at `address`, or `None` if it does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Every account owned by `program_id` whose data starts with `prefix`.
    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        prefix: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    /// Lamport balance; zero for accounts that do not exist.
    async fn balance(&self, address: &Pubkey) -> Result<u64>;

    /// Sign `set` with `payer`, submit it as one transaction and wait for
    /// confirmation. Rejections are classified with
    /// [`PendingOperationSet::rejection`].
    async fn submit(&self, set: &PendingOperationSet, payer: &Keypair) -> Result<Signature>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        (**self).account_data(address).await
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        prefix: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        (**self).program_accounts(program_id, prefix).await
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        (**self).balance(address).await
    }

    async fn submit(&self, set: &PendingOperationSet, payer: &Keypair) -> Result<Signature> {
        (**self).submit(set, payer).await
    }
}

/// Why the cluster declined an operation set, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Index of the failing instruction within the set.
    pub instruction: Option<usize>,
    /// Program-specific error code, when the failure was `Custom(code)`.
    pub custom_code: Option<u32>,
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            instruction: None,
            custom_code: None,
            reason: reason.into(),
        }
    }

    pub fn at(mut self, instruction: usize, custom_code: Option<u32>) -> Self {
        self.instruction = Some(instruction);
        self.custom_code = custom_code;
        self
    }
}
