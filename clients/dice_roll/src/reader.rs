//! Typed reads of program records.

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::pda::AddressBook;
use crate::state::{AccountRecord, Settings, State};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::trace;

/// Typed, read-only access to program records.
pub struct AccountReader<L: ?Sized> {
    ledger: Arc<L>,
}

impl<L: ?Sized> Clone for AccountReader<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
        }
    }
}

impl<L: Ledger + ?Sized> AccountReader<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Fetch one record. `Ok(None)` means the account has never been created;
    /// data that exists but does not decode as `T` is an error.
    pub async fn fetch_one<T: AccountRecord>(&self, address: &Pubkey) -> Result<Option<T>> {
        let Some(data) = self.ledger.account_data(address).await? else {
            trace!(record = T::NAME, %address, "record absent");
            return Ok(None);
        };
        T::decode(address, &data).map(Some)
    }

    /// Every `T` owned by `program_id`.
    ///
    /// This is a full scan of the program's accounts; only use it for record
    /// types known to have a handful of instances.
    pub async fn fetch_all<T: AccountRecord>(&self, program_id: &Pubkey) -> Result<Vec<(Pubkey, T)>> {
        let accounts = self
            .ledger
            .program_accounts(program_id, &T::discriminator())
            .await?;
        accounts
            .into_iter()
            .map(|(address, data)| T::decode(&address, &data).map(|record| (address, record)))
            .collect()
    }

    /// Lamport balance of any account.
    pub async fn balance(&self, address: &Pubkey) -> Result<u64> {
        self.ledger.balance(address).await
    }

    /// The staking program's global settings, at their derived address.
    pub async fn settings(&self, addresses: &AddressBook) -> Result<Settings> {
        self.fetch_one::<Settings>(&addresses.settings())
            .await?
            .ok_or(Error::NotInitialized)
    }

    /// The dice program's global state, at its derived address.
    pub async fn dice_state(&self, addresses: &AddressBook) -> Result<State> {
        self.fetch_one::<State>(&addresses.dice_state())
            .await?
            .ok_or(Error::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DICE_PROGRAM_ID, STAKING_PROGRAM_ID};
    use crate::mocks::MockLedger;
    use crate::state::UserState;

    fn setup() -> (Arc<MockLedger>, AccountReader<MockLedger>, AddressBook) {
        let ledger = Arc::new(MockLedger::new(STAKING_PROGRAM_ID, DICE_PROGRAM_ID));
        let reader = AccountReader::new(ledger.clone());
        let addresses = AddressBook::new(STAKING_PROGRAM_ID, DICE_PROGRAM_ID).unwrap();
        (ledger, reader, addresses)
    }

    #[tokio::test]
    async fn test_fetch_one_absent_is_none() {
        let (_ledger, reader, addresses) = setup();
        for _ in 0..8 {
            let address = addresses.user_state(&Pubkey::new_unique()).unwrap();
            let record = reader.fetch_one::<UserState>(&address).await.unwrap();
            assert!(record.is_none());
        }
    }

    #[tokio::test]
    async fn test_fetch_one_decodes_record() {
        let (ledger, reader, addresses) = setup();
        let owner = Pubkey::new_unique();
        let address = addresses.user_state(&owner).unwrap();
        let state = UserState {
            user: owner,
            ..Default::default()
        };
        ledger.put_record(STAKING_PROGRAM_ID, address, &state);
        assert_eq!(reader.fetch_one::<UserState>(&address).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_fetch_one_surfaces_decode_error() {
        let (ledger, reader, addresses) = setup();
        let address = addresses.user_state(&Pubkey::new_unique()).unwrap();
        ledger.put_raw(STAKING_PROGRAM_ID, address, vec![0xAB; 40]);
        let err = reader.fetch_one::<UserState>(&address).await.unwrap_err();
        assert!(matches!(err, Error::Decode { record: "UserState", .. }));
    }

    #[tokio::test]
    async fn test_settings_missing_is_not_initialized() {
        let (_ledger, reader, addresses) = setup();
        let err = reader.settings(&addresses).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
        let err = reader.dice_state(&addresses).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }

    #[tokio::test]
    async fn test_fetch_all_filters_by_record_type() {
        let (ledger, reader, addresses) = setup();
        ledger.put_record(STAKING_PROGRAM_ID, addresses.settings(), &Settings::default());
        for _ in 0..3 {
            let owner = Pubkey::new_unique();
            let state = UserState {
                user: owner,
                ..Default::default()
            };
            ledger.put_record(STAKING_PROGRAM_ID, addresses.user_state(&owner).unwrap(), &state);
        }

        let settings = reader.fetch_all::<Settings>(&STAKING_PROGRAM_ID).await.unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].0, addresses.settings());
        let users = reader.fetch_all::<UserState>(&STAKING_PROGRAM_ID).await.unwrap();
        assert_eq!(users.len(), 3);
        let none = reader.fetch_all::<UserState>(&DICE_PROGRAM_ID).await.unwrap();
        assert!(none.is_empty());
    }
}
