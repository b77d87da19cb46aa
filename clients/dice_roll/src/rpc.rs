//! [`Ledger`] over a Solana JSON-RPC node, plus a websocket logs
//! subscription feeding [`crate::events`].

use crate::composer::PendingOperationSet;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::events::LogBatch;
use crate::ledger::{Ledger, Rejection};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    client_error::ClientError,
    nonblocking::{pubsub_client::PubsubClient, rpc_client::RpcClient},
    rpc_config::{
        RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcTransactionLogsConfig,
        RpcTransactionLogsFilter,
    },
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::Signature,
    signer::{keypair::Keypair, Signer},
    transaction::{Transaction, TransactionError},
};
use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const LOG_CHANNEL_CAPACITY: usize = 1024;

pub struct RpcLedger {
    client: RpcClient,
}

impl RpcLedger {
    pub fn new(config: &ClientConfig) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            config.timeout(),
            config.commitment.into(),
        );
        Self { client }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

fn transport(err: ClientError) -> Error {
    Error::Transport(err.to_string())
}

/// A client error carrying a transaction error was raised by the cluster
/// while executing the set; anything else never reached execution.
fn classify(err: ClientError) -> std::result::Result<Rejection, Error> {
    let Some(tx_err) = err.get_transaction_error() else {
        return Err(transport(err));
    };
    let rejection = Rejection::new(err.to_string());
    Ok(match tx_err {
        TransactionError::InstructionError(index, InstructionError::Custom(code)) => {
            rejection.at(index as usize, Some(code))
        }
        TransactionError::InstructionError(index, _) => rejection.at(index as usize, None),
        _ => rejection,
    })
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let account = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(transport)?
            .value;
        Ok(account.map(|account| account.data))
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        prefix: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                0, prefix,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.client.commitment()),
                ..Default::default()
            },
            ..Default::default()
        };
        let accounts = self
            .client
            .get_program_accounts_with_config(program_id, config)
            .await
            .map_err(transport)?;
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        self.client.get_balance(address).await.map_err(transport)
    }

    async fn submit(&self, set: &PendingOperationSet, payer: &Keypair) -> Result<Signature> {
        let blockhash = self.client.get_latest_blockhash().await.map_err(transport)?;
        let transaction = Transaction::new_signed_with_payer(
            &set.instructions(),
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        match self.client.send_and_confirm_transaction(&transaction).await {
            Ok(signature) => Ok(signature),
            Err(err) => {
                let rejection = classify(err)?;
                warn!(
                    instruction = ?rejection.instruction,
                    code = ?rejection.custom_code,
                    reason = %rejection.reason,
                    "operation set rejected"
                );
                Err(set.rejection(rejection))
            }
        }
    }
}

/// Log batches of every transaction mentioning a program.
///
/// Dropping the subscription stops the background reader.
pub struct LogSubscription {
    receiver: mpsc::Receiver<LogBatch>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl Stream for LogSubscription {
    type Item = LogBatch;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<LogBatch>> {
        self.receiver.poll_recv(cx)
    }
}

/// Subscribe to logs mentioning `program_id`. Returns once the subscription
/// is established.
pub async fn subscribe_logs(
    ws_url: &str,
    program_id: Pubkey,
    commitment: CommitmentConfig,
) -> Result<LogSubscription> {
    let pubsub = PubsubClient::new(ws_url)
        .await
        .map_err(|e| Error::Transport(e.to_string()))?;
    let (tx, receiver) = mpsc::channel(LOG_CHANNEL_CAPACITY);
    let (ready_tx, ready_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let filter = RpcTransactionLogsFilter::Mentions(vec![program_id.to_string()]);
        let config = RpcTransactionLogsConfig {
            commitment: Some(commitment),
        };
        let (mut notifications, unsubscribe) = match pubsub.logs_subscribe(filter, config).await {
            Ok(subscription) => {
                let _ = ready_tx.send(Ok(()));
                subscription
            }
            Err(e) => {
                let _ = ready_tx.send(Err(Error::Transport(e.to_string())));
                return;
            }
        };

        while let Some(response) = notifications.next().await {
            let logs = response.value;
            let batch = LogBatch {
                signature: logs.signature,
                failed: logs.err.is_some(),
                logs: logs.logs,
            };
            if tx.send(batch).await.is_err() {
                break;
            }
        }
        drop(notifications);
        unsubscribe().await;
        debug!(%program_id, "logs subscription closed");
    });

    match ready_rx.await {
        Ok(Ok(())) => Ok(LogSubscription { receiver, handle }),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(Error::Transport("logs subscription task exited".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::client_error::ClientErrorKind;

    #[test]
    fn test_custom_instruction_error_keeps_index_and_code() {
        let err = ClientError::from(ClientErrorKind::TransactionError(
            TransactionError::InstructionError(1, InstructionError::Custom(0)),
        ));
        let rejection = classify(err).unwrap();
        assert_eq!(rejection.instruction, Some(1));
        assert_eq!(rejection.custom_code, Some(0));
    }

    #[test]
    fn test_transaction_level_error_has_no_index() {
        let err = ClientError::from(ClientErrorKind::TransactionError(
            TransactionError::BlockhashNotFound,
        ));
        let rejection = classify(err).unwrap();
        assert_eq!(rejection.instruction, None);
        assert!(!rejection.reason.is_empty());
    }

    #[test]
    fn test_non_transaction_error_is_transport() {
        let err = ClientError::from(ClientErrorKind::Custom("connection refused".to_string()));
        assert!(matches!(classify(err), Err(Error::Transport(_))));
    }

    #[test]
    fn test_duplicate_create_from_cluster() {
        let record = Pubkey::new_unique();
        let ix = solana_sdk::instruction::Instruction::new_with_bytes(Pubkey::new_unique(), &[], vec![]);
        let mut set = PendingOperationSet::new();
        set.push_create("init_user_state", record, ix.clone());
        set.push("deposit", ix);

        let err = ClientError::from(ClientErrorKind::TransactionError(
            TransactionError::InstructionError(0, InstructionError::Custom(0)),
        ));
        let err = set.rejection(classify(err).unwrap());
        assert!(matches!(err, Error::DuplicateCreate { address } if address == record));
    }
}
