//! One call per user action.
//!
//! Every operation loads the relevant global record first (failing with
//! [`Error::NotInitialized`] when it is missing), derives the addresses it
//! needs, composes the operation set, submits it and waits for confirmation.
//! Nothing is cached locally between calls.

use crate::composer::{compose_deposit, Composer, DepositRequest, PendingOperationSet};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::instructions::{create_associated_token_account_idempotent, dice, staking};
use crate::ledger::Ledger;
use crate::pda::AddressBook;
use crate::reader::AccountReader;
use crate::state::{InvestData, Settings, State, UserState};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::Signature,
    signer::{keypair::Keypair, Signer},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a confirmed deposit.
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub signature: Signature,
    /// The new position; pass it to `unstake` / `compound`.
    pub invest_data: Pubkey,
    pub user_state: Pubkey,
    /// Referrer credited by the program.
    pub referrer: Pubkey,
}

pub struct DiceRollClient<L: ?Sized> {
    reader: AccountReader<L>,
    addresses: AddressBook,
    config: ClientConfig,
}

impl<L: Ledger + ?Sized> DiceRollClient<L> {
    pub fn new(ledger: Arc<L>, config: ClientConfig) -> Result<Self> {
        let addresses = AddressBook::new(config.staking_program_id, config.dice_program_id)?;
        Ok(Self {
            reader: AccountReader::new(ledger),
            addresses,
            config,
        })
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    pub fn reader(&self) -> &AccountReader<L> {
        &self.reader
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn submit(
        &self,
        label: &'static str,
        set: PendingOperationSet,
        payer: &Keypair,
    ) -> Result<Signature> {
        debug!(
            label,
            operations = set.len(),
            creates = set.creates().count(),
            payer = %payer.pubkey(),
            "submitting operation set"
        );
        let signature = self.reader.ledger().submit(&set, payer).await?;
        info!(label, %signature, "operation set confirmed");
        Ok(signature)
    }

    /// Log balances after a confirmed submission. Read failures are only
    /// logged: the submission itself already succeeded.
    async fn log_balances(&self, label: &'static str, accounts: &[(&'static str, Pubkey)]) {
        if !self.config.log_balances {
            return;
        }
        for (name, address) in accounts {
            match self.reader.balance(address).await {
                Ok(lamports) => info!(
                    label,
                    account = name,
                    %address,
                    sol = lamports as f64 / LAMPORTS_PER_SOL as f64,
                    "balance"
                ),
                Err(e) => warn!(label, account = name, %address, error = %e, "balance read failed"),
            }
        }
    }

    // === Reads ===

    pub async fn settings(&self) -> Result<Settings> {
        self.reader.settings(&self.addresses).await
    }

    /// Settings located by scanning every settings record of the program.
    pub async fn find_settings_by_scan(&self) -> Result<(Pubkey, Settings)> {
        self.reader
            .fetch_all::<Settings>(&self.addresses.staking_program())
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NotInitialized)
    }

    pub async fn user_state(&self, owner: &Pubkey) -> Result<Option<UserState>> {
        let address = self.addresses.user_state(owner)?;
        self.reader.fetch_one(&address).await
    }

    pub async fn invest_data(&self, address: &Pubkey) -> Result<Option<InvestData>> {
        self.reader.fetch_one(address).await
    }

    pub async fn dice_state(&self) -> Result<State> {
        self.reader.dice_state(&self.addresses).await
    }

    async fn require_user_state(&self, owner: &Pubkey) -> Result<Pubkey> {
        let address = self.addresses.user_state(owner)?;
        match self.reader.fetch_one::<UserState>(&address).await? {
            Some(_) => Ok(address),
            None => Err(Error::UserStateMissing(*owner)),
        }
    }

    // === Staking ===

    /// Create the settings record and pool.
    pub async fn initialize(&self, admin: &Keypair) -> Result<Signature> {
        let accounts = staking::InitializeAccounts {
            admin: admin.pubkey(),
            settings: self.addresses.settings(),
            pool: self.addresses.pool(),
            dev_wallet: self.config.dev_wallet,
            marketing_wallet: self.config.marketing_wallet,
        };
        let mut set = PendingOperationSet::new();
        set.push_create(
            "initialize",
            self.addresses.settings(),
            staking::initialize(self.addresses.staking_program(), &accounts),
        );
        self.submit("initialize", set, admin).await
    }

    pub async fn init_blacklist(&self, admin: &Keypair) -> Result<Signature> {
        self.settings().await?;
        let accounts = staking::InitBlacklistAccounts {
            admin: admin.pubkey(),
            settings: self.addresses.settings(),
            blacklist: self.addresses.blacklist(),
        };
        let mut set = PendingOperationSet::new();
        set.push_create(
            "init_blacklist",
            self.addresses.blacklist(),
            staking::init_blacklist(self.addresses.staking_program(), &accounts),
        );
        self.submit("init_blacklist", set, admin).await
    }

    /// Deposit `lamports` as a new position. `referrer` is recorded only if
    /// the user has no referrer yet; pass [`crate::constants::NO_REFERRER`]
    /// for none.
    ///
    /// A concurrent deposit can create the same user state first; that
    /// surfaces as [`Error::DuplicateCreate`] and the call may be repeated.
    pub async fn deposit(
        &self,
        user: &Keypair,
        lamports: u64,
        referrer: Pubkey,
    ) -> Result<DepositReceipt> {
        let settings = self.settings().await?;
        let request = DepositRequest {
            user: user.pubkey(),
            amount: lamports,
            referrer,
            seed_key: Keypair::new().pubkey(),
        };
        let plan = compose_deposit(&self.reader, &self.addresses, &settings, &request).await?;
        let signature = self.submit("deposit", plan.set, user).await?;

        self.log_balances(
            "deposit",
            &[("pool", settings.pool), ("dev_wallet", settings.dev_wallet)],
        )
        .await;

        Ok(DepositReceipt {
            signature,
            invest_data: plan.invest_data,
            user_state: plan.user_state,
            referrer: plan.referrer,
        })
    }

    /// Close out the position at `invest_data`.
    pub async fn unstake(&self, user: &Keypair, invest_data: Pubkey) -> Result<Signature> {
        let settings = self.settings().await?;
        let owner = user.pubkey();
        let user_state = self.require_user_state(&owner).await?;

        let accounts = staking::UnstakeAccounts {
            user: owner,
            settings: self.addresses.settings(),
            blacklist: self.addresses.blacklist(),
            pool: settings.pool,
            invest_data,
            user_state,
            dev_wallet: settings.dev_wallet,
        };
        let mut set = PendingOperationSet::new();
        set.push(
            "unstake",
            staking::unstake(self.addresses.staking_program(), &accounts),
        );
        let signature = self.submit("unstake", set, user).await?;

        self.log_balances(
            "unstake",
            &[
                ("pool", settings.pool),
                ("dev_wallet", settings.dev_wallet),
                ("user", owner),
            ],
        )
        .await;
        Ok(signature)
    }

    /// Reinvest the rewards of the position at `invest_data`.
    pub async fn compound(&self, user: &Keypair, invest_data: Pubkey) -> Result<Signature> {
        let settings = self.settings().await?;
        let owner = user.pubkey();
        self.require_user_state(&owner).await?;

        let accounts = staking::CompoundAccounts {
            user: owner,
            settings: self.addresses.settings(),
            pool: settings.pool,
            invest_data,
            marketing_wallet: settings.marketing_wallet,
        };
        let mut set = PendingOperationSet::new();
        set.push(
            "compound",
            staking::compound(self.addresses.staking_program(), &accounts),
        );
        let signature = self.submit("compound", set, user).await?;

        self.log_balances(
            "compound",
            &[
                ("pool", settings.pool),
                ("marketing_wallet", settings.marketing_wallet),
            ],
        )
        .await;
        Ok(signature)
    }

    // === Dice ===

    /// Create the dice state, its pool token accounts and the SOL vault.
    pub async fn initialize_dice(&self, authority: &Keypair) -> Result<Signature> {
        let gang_mint = self.config.gang_mint;
        let usdc_mint = self.config.usdc_mint;
        let accounts = dice::InitializeAccounts {
            authority: authority.pubkey(),
            state: self.addresses.dice_state(),
            gang_mint,
            usdc_mint,
            pool_gang_token_account: self.addresses.pool_token_account(&gang_mint),
            pool_usdc_token_account: self.addresses.pool_token_account(&usdc_mint),
            pool_sol_vault: self.addresses.vault(),
        };
        let mut set = PendingOperationSet::new();
        set.push_create(
            "initialize",
            self.addresses.dice_state(),
            dice::initialize(self.addresses.dice_program(), &accounts),
        );
        self.submit("initialize_dice", set, authority).await
    }

    fn token_accounts(&self, owner: &Pubkey, mint: &Pubkey) -> dice::TokenTransferAccounts {
        dice::TokenTransferAccounts {
            authority: *owner,
            state: self.addresses.dice_state(),
            pool_token_account: self.addresses.pool_token_account(mint),
            user_token_account: self.addresses.user_token_account(owner, mint),
            bet_token_mint: *mint,
        }
    }

    pub async fn place_token_bet(
        &self,
        user: &Keypair,
        mint: Pubkey,
        amount: u64,
        target: u8,
    ) -> Result<Signature> {
        self.dice_state().await?;
        let accounts = self.token_accounts(&user.pubkey(), &mint);
        let pool_token_account = accounts.pool_token_account;
        let mut set = PendingOperationSet::new();
        set.push(
            "place_token_bet",
            dice::place_token_bet(self.addresses.dice_program(), &accounts, amount, target),
        );
        let signature = self.submit("place_token_bet", set, user).await?;
        self.log_balances("place_token_bet", &[("pool_token_account", pool_token_account)])
            .await;
        Ok(signature)
    }

    pub async fn place_sol_bet(&self, user: &Keypair, amount: u64, target: u8) -> Result<Signature> {
        self.dice_state().await?;
        let accounts = dice::PlaceSolBetAccounts {
            authority: user.pubkey(),
            state: self.addresses.dice_state(),
            pool_sol_vault: self.addresses.vault(),
            price_feed: self.config.price_feed,
        };
        let mut set = PendingOperationSet::new();
        set.push(
            "place_sol_bet",
            dice::place_sol_bet(self.addresses.dice_program(), &accounts, amount, target),
        );
        let signature = self.submit("place_sol_bet", set, user).await?;
        self.log_balances(
            "place_sol_bet",
            &[("vault", self.addresses.vault()), ("user", user.pubkey())],
        )
        .await;
        Ok(signature)
    }

    /// Fund the SOL vault.
    pub async fn deposit_sol(&self, authority: &Keypair, amount: u64) -> Result<Signature> {
        self.dice_state().await?;
        let accounts = dice::DepositSolAccounts {
            authority: authority.pubkey(),
            pool_sol_vault: self.addresses.vault(),
        };
        let mut set = PendingOperationSet::new();
        set.push(
            "deposit_sol",
            dice::deposit_sol(self.addresses.dice_program(), &accounts, amount),
        );
        let signature = self.submit("deposit_sol", set, authority).await?;
        self.log_balances("deposit_sol", &[("vault", self.addresses.vault())])
            .await;
        Ok(signature)
    }

    /// Fund the pool token account for `mint`.
    pub async fn deposit_token(
        &self,
        authority: &Keypair,
        mint: Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        self.dice_state().await?;
        let accounts = self.token_accounts(&authority.pubkey(), &mint);
        let mut set = PendingOperationSet::new();
        set.push(
            "deposit_token",
            dice::deposit_token(self.addresses.dice_program(), &accounts, amount),
        );
        self.submit("deposit_token", set, authority).await
    }

    /// Withdraw from the SOL vault; only the state authority may.
    pub async fn withdraw_sol(&self, authority: &Keypair, amount: u64) -> Result<Signature> {
        self.dice_state().await?;
        let accounts = dice::WithdrawSolAccounts {
            authority: authority.pubkey(),
            state: self.addresses.dice_state(),
            pool_sol_vault: self.addresses.vault(),
        };
        let mut set = PendingOperationSet::new();
        set.push(
            "withdraw_sol",
            dice::withdraw_sol(self.addresses.dice_program(), &accounts, amount),
        );
        let signature = self.submit("withdraw_sol", set, authority).await?;
        self.log_balances("withdraw_sol", &[("vault", self.addresses.vault())])
            .await;
        Ok(signature)
    }

    /// Withdraw pool tokens to the authority, creating its token account first
    /// if needed.
    pub async fn withdraw_token(
        &self,
        authority: &Keypair,
        mint: Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        self.dice_state().await?;
        let owner = authority.pubkey();
        let accounts = self.token_accounts(&owner, &mint);

        let mut composer = Composer::new(&self.reader);
        composer
            .require_account("create_token_account", accounts.user_token_account, || {
                create_associated_token_account_idempotent(&owner, &owner, &mint)
            })
            .await?;
        composer.push(
            "withdraw_token",
            dice::withdraw_token(self.addresses.dice_program(), &accounts, amount),
        );
        self.submit("withdraw_token", composer.finish(), authority)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::OperationRole;
    use crate::constants::{DICE_PROGRAM_ID, NO_REFERRER, STAKING_PROGRAM_ID};
    use crate::instructions::{staking::DepositAccounts, InstructionArgs};
    use crate::ledger::Rejection;
    use crate::mocks::MockLedger;

    fn setup() -> (Arc<MockLedger>, DiceRollClient<MockLedger>) {
        let ledger = Arc::new(MockLedger::new(STAKING_PROGRAM_ID, DICE_PROGRAM_ID));
        let config = ClientConfig {
            gang_mint: Pubkey::new_unique(),
            usdc_mint: Pubkey::new_unique(),
            ..Default::default()
        };
        let client = DiceRollClient::new(ledger.clone(), config).unwrap();
        (ledger, client)
    }

    fn roles(ixs: &[solana_sdk::instruction::Instruction]) -> Vec<Option<&'static str>> {
        ixs.iter()
            .map(|ix| {
                if staking::InitUserState::parse(&ix.data).is_some() {
                    Some("init_user_state")
                } else if staking::Deposit::parse(&ix.data).is_some() {
                    Some("deposit")
                } else {
                    None
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_deposit_before_initialize_fails() {
        let (ledger, client) = setup();
        let user = Keypair::new();
        let err = client.deposit(&user, 10, NO_REFERRER).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
        assert!(ledger.confirmed().is_empty());
    }

    #[tokio::test]
    async fn test_referral_scenario() {
        let (ledger, client) = setup();
        let admin = Keypair::new();
        let a = Keypair::new();
        let b = Keypair::new();
        let c = Keypair::new();

        client.initialize(&admin).await.unwrap();
        let settings = client.settings().await.unwrap();
        assert_eq!(settings.admin, admin.pubkey());

        // A deposits with no referrer: create(A) then deposit, both on A's state.
        let receipt = client
            .deposit(&a, 10 * LAMPORTS_PER_SOL, NO_REFERRER)
            .await
            .unwrap();
        let a_state = client.addresses().user_state(&a.pubkey()).unwrap();
        let submitted = ledger.confirmed();
        let last = submitted.last().unwrap();
        assert_eq!(roles(last), vec![Some("init_user_state"), Some("deposit")]);
        assert_eq!(last[0].accounts[2].pubkey, a_state);
        assert_eq!(last[1].accounts[DepositAccounts::USER_STATE_INDEX].pubkey, a_state);
        assert_eq!(receipt.referrer, NO_REFERRER);
        let invest = client.invest_data(&receipt.invest_data).await.unwrap().unwrap();
        assert_eq!(invest.amount, 10 * LAMPORTS_PER_SOL);

        // B deposits with referrer A: A already exists, so only create(B).
        let receipt = client
            .deposit(&b, 5 * LAMPORTS_PER_SOL, a.pubkey())
            .await
            .unwrap();
        assert_eq!(receipt.referrer, a.pubkey());
        let submitted = ledger.confirmed();
        let last = submitted.last().unwrap();
        assert_eq!(roles(last), vec![Some("init_user_state"), Some("deposit")]);
        assert_eq!(last[1].accounts[DepositAccounts::REFERRER_INDEX].pubkey, a.pubkey());

        // B deposits again naming C: the stored referrer A wins.
        let receipt = client
            .deposit(&b, 5 * LAMPORTS_PER_SOL, c.pubkey())
            .await
            .unwrap();
        assert_eq!(receipt.referrer, a.pubkey());
        let submitted = ledger.confirmed();
        let last = submitted.last().unwrap();
        assert_eq!(roles(last), vec![Some("deposit")]);
        assert_eq!(last[0].accounts[DepositAccounts::REFERRER_INDEX].pubkey, a.pubkey());

        let b_state = client.user_state(&b.pubkey()).await.unwrap().unwrap();
        assert_eq!(b_state.referrer, a.pubkey());
        assert_eq!(b_state.total_deposit, 10 * LAMPORTS_PER_SOL);
        assert!(client.user_state(&c.pubkey()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_finds_same_settings() {
        let (_ledger, client) = setup();
        let err = client.find_settings_by_scan().await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));

        client.initialize(&Keypair::new()).await.unwrap();
        let (address, scanned) = client.find_settings_by_scan().await.unwrap();
        assert_eq!(address, client.addresses().settings());
        assert_eq!(scanned, client.settings().await.unwrap());
    }

    #[tokio::test]
    async fn test_initialize_twice_is_duplicate_create() {
        let (_ledger, client) = setup();
        client.initialize(&Keypair::new()).await.unwrap();
        let err = client.initialize(&Keypair::new()).await.unwrap_err();
        assert!(
            matches!(err, Error::DuplicateCreate { address } if address == client.addresses().settings())
        );
    }

    #[tokio::test]
    async fn test_lost_create_race_is_duplicate_create() {
        let (ledger, client) = setup();
        client.initialize(&Keypair::new()).await.unwrap();
        let settings = client.settings().await.unwrap();
        let user = Keypair::new();

        let request = DepositRequest {
            user: user.pubkey(),
            amount: 1,
            referrer: NO_REFERRER,
            seed_key: Pubkey::new_unique(),
        };
        let plan = compose_deposit(client.reader(), client.addresses(), &settings, &request)
            .await
            .unwrap();
        assert!(matches!(
            plan.set.operations()[0].role,
            OperationRole::Create { .. }
        ));

        // Another client creates the user state before we submit.
        let concurrent = UserState {
            user: user.pubkey(),
            ..Default::default()
        };
        ledger.put_record(STAKING_PROGRAM_ID, plan.user_state, &concurrent);

        let err = ledger.submit(&plan.set, &user).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateCreate { address } if address == plan.user_state));
        assert!(err.is_retryable());

        // Re-reading and composing again succeeds.
        let receipt = client.deposit(&user, 1, NO_REFERRER).await.unwrap();
        assert_eq!(receipt.user_state, plan.user_state);
    }

    #[tokio::test]
    async fn test_rejection_is_surfaced_and_nothing_applies() {
        let (ledger, client) = setup();
        client.initialize(&Keypair::new()).await.unwrap();
        let user = Keypair::new();

        ledger.reject_next(Rejection::new("Transaction simulation failed: insufficient lamports"));
        let err = client.deposit(&user, 1, NO_REFERRER).await.unwrap_err();
        match err {
            Error::RemoteRejected { reason, .. } => {
                assert_eq!(reason, "Transaction simulation failed: insufficient lamports")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(client.user_state(&user.pubkey()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unstake_and_compound_require_user_state() {
        let (_ledger, client) = setup();
        client.initialize(&Keypair::new()).await.unwrap();
        let user = Keypair::new();

        let err = client.unstake(&user, Pubkey::new_unique()).await.unwrap_err();
        assert!(matches!(err, Error::UserStateMissing(owner) if owner == user.pubkey()));
        let err = client.compound(&user, Pubkey::new_unique()).await.unwrap_err();
        assert!(matches!(err, Error::UserStateMissing(_)));

        let receipt = client.deposit(&user, 3, NO_REFERRER).await.unwrap();
        client.compound(&user, receipt.invest_data).await.unwrap();
        client.unstake(&user, receipt.invest_data).await.unwrap();
    }

    #[tokio::test]
    async fn test_init_blacklist_needs_settings() {
        let (ledger, client) = setup();
        let admin = Keypair::new();
        let err = client.init_blacklist(&admin).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));

        client.initialize(&admin).await.unwrap();
        client.init_blacklist(&admin).await.unwrap();
        let blacklist = ledger
            .record::<crate::state::Blacklist>(&client.addresses().blacklist())
            .unwrap();
        assert_eq!(blacklist.admin, admin.pubkey());
        assert!(!blacklist.contains(&admin.pubkey()));
    }

    #[tokio::test]
    async fn test_dice_flow() {
        let (ledger, client) = setup();
        let authority = Keypair::new();
        let player = Keypair::new();

        let err = client.place_sol_bet(&player, 100, 3).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));

        client.initialize_dice(&authority).await.unwrap();
        let state = client.dice_state().await.unwrap();
        assert_eq!(state.authority, authority.pubkey());
        assert_eq!(state.gang_mint, client.config().gang_mint);

        let vault = client.addresses().vault();
        ledger.set_balance(vault, 400);
        client.deposit_sol(&authority, 600).await.unwrap();
        client.place_sol_bet(&player, 100, 3).await.unwrap();
        assert_eq!(ledger.balance(&vault).await.unwrap(), 1_100);

        let submitted = ledger.confirmed();
        let bet = &submitted.last().unwrap()[0];
        assert_eq!(bet.accounts[3].pubkey, anchor_spl::token::ID);
        assert_eq!(bet.accounts[4].pubkey, anchor_spl::associated_token::ID);
        assert_eq!(
            bet.accounts[dice::PlaceSolBetAccounts::PRICE_FEED_INDEX].pubkey,
            client.config().price_feed
        );

        client.withdraw_sol(&authority, 600).await.unwrap();
        assert_eq!(ledger.balance(&client.addresses().vault()).await.unwrap(), 500);

        // Only the state authority may withdraw.
        let err = client.withdraw_sol(&player, 1).await.unwrap_err();
        assert!(matches!(err, Error::RemoteRejected { instruction: Some(0), .. }));
    }

    #[tokio::test]
    async fn test_withdraw_token_creates_missing_token_account() {
        let (ledger, client) = setup();
        let authority = Keypair::new();
        client.initialize_dice(&authority).await.unwrap();
        let mint = client.config().usdc_mint;
        let pool = client.addresses().pool_token_account(&mint);
        ledger.put_raw(anchor_spl::token::ID, pool, vec![0; 165]);

        client.withdraw_token(&authority, mint, 50).await.unwrap();
        let submitted = ledger.confirmed();
        let last = submitted.last().unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].program_id, anchor_spl::associated_token::ID);

        // Second time the account exists and no create is queued.
        client.withdraw_token(&authority, mint, 50).await.unwrap();
        let submitted = ledger.confirmed();
        assert_eq!(submitted.last().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_token_bet_needs_token_accounts() {
        let (ledger, client) = setup();
        let authority = Keypair::new();
        let player = Keypair::new();
        client.initialize_dice(&authority).await.unwrap();
        let mint = client.config().gang_mint;

        let err = client.place_token_bet(&player, mint, 10, 2).await.unwrap_err();
        assert!(matches!(err, Error::RemoteRejected { .. }));

        ledger.put_raw(anchor_spl::token::ID, client.addresses().pool_token_account(&mint), vec![0; 165]);
        ledger.put_raw(
            anchor_spl::token::ID,
            client.addresses().user_token_account(&player.pubkey(), &mint),
            vec![0; 165],
        );
        client.place_token_bet(&player, mint, 10, 2).await.unwrap();
        client.deposit_token(&player, mint, 10).await.unwrap();
    }
}
