//! In-memory ledger for tests.
//!
//! [`MockLedger`] stores raw accounts and emulates the parts of the staking
//! and dice programs the client depends on: which records each instruction
//! creates, that creating an existing record fails, that a deposit records
//! the referrer only when none is set, and that a set is applied atomically.
//! Game and interest math are not emulated.

use crate::composer::PendingOperationSet;
use crate::constants::NO_REFERRER;
use crate::error::Result;
use crate::instructions::{dice, staking, InstructionArgs};
use crate::ledger::{Ledger, Rejection, ACCOUNT_ALREADY_IN_USE};
use crate::state::{AccountRecord, Blacklist, InvestData, Settings, State, UserState};
use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::Signature,
    signer::{keypair::Keypair, Signer},
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Anchor's `AccountNotInitialized`.
pub const ACCOUNT_NOT_INITIALIZED: u32 = 3012;
const TOKEN_ACCOUNT_LEN: usize = 165;

#[derive(Clone)]
struct MockAccount {
    owner: Pubkey,
    data: Vec<u8>,
}

#[derive(Clone, Default)]
struct Accounts {
    records: HashMap<Pubkey, MockAccount>,
    balances: HashMap<Pubkey, u64>,
}

#[derive(Default)]
struct Inner {
    accounts: Accounts,
    confirmed: Vec<Vec<Instruction>>,
    reject_next: Option<Rejection>,
    signatures: u64,
}

pub struct MockLedger {
    staking_program: Pubkey,
    dice_program: Pubkey,
    inner: Mutex<Inner>,
}

fn key(ix: &Instruction, index: usize) -> std::result::Result<Pubkey, Rejection> {
    ix.accounts
        .get(index)
        .map(|meta| meta.pubkey)
        .ok_or_else(|| Rejection::new(format!("missing account #{index}")))
}

impl Accounts {
    fn create<T: AccountRecord>(
        &mut self,
        owner: Pubkey,
        address: Pubkey,
        record: &T,
    ) -> std::result::Result<(), Rejection> {
        if self.records.contains_key(&address) {
            return Err(Rejection {
                instruction: None,
                custom_code: Some(ACCOUNT_ALREADY_IN_USE),
                reason: format!("Allocate: account {address} already in use"),
            });
        }
        self.records.insert(
            address,
            MockAccount {
                owner,
                data: record.encode(),
            },
        );
        Ok(())
    }

    fn load<T: AccountRecord>(&self, address: &Pubkey) -> std::result::Result<T, Rejection> {
        let not_initialized = || Rejection {
            instruction: None,
            custom_code: Some(ACCOUNT_NOT_INITIALIZED),
            reason: format!("AccountNotInitialized: {address}"),
        };
        let account = self.records.get(address).ok_or_else(not_initialized)?;
        T::decode(address, &account.data).map_err(|e| Rejection::new(e.to_string()))
    }

    fn store<T: AccountRecord>(&mut self, address: &Pubkey, record: &T) {
        if let Some(account) = self.records.get_mut(address) {
            account.data = record.encode();
        }
    }

    fn credit(&mut self, address: Pubkey, lamports: u64) {
        *self.balances.entry(address).or_default() += lamports;
    }

    fn debit(&mut self, address: Pubkey, lamports: u64) -> std::result::Result<(), Rejection> {
        let balance = self.balances.entry(address).or_default();
        if *balance < lamports {
            return Err(Rejection::new(format!(
                "insufficient funds in {address}: {balance} < {lamports}"
            )));
        }
        *balance -= lamports;
        Ok(())
    }
}

impl MockLedger {
    pub fn new(staking_program: Pubkey, dice_program: Pubkey) -> Self {
        Self {
            staking_program,
            dice_program,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock ledger lock poisoned")
    }

    pub fn put_record<T: AccountRecord>(&self, owner: Pubkey, address: Pubkey, record: &T) {
        self.put_raw(owner, address, record.encode());
    }

    pub fn put_raw(&self, owner: Pubkey, address: Pubkey, data: Vec<u8>) {
        self.lock()
            .accounts
            .records
            .insert(address, MockAccount { owner, data });
    }

    pub fn set_balance(&self, address: Pubkey, lamports: u64) {
        self.lock().accounts.balances.insert(address, lamports);
    }

    /// Decode the record at `address`, if any.
    pub fn record<T: AccountRecord>(&self, address: &Pubkey) -> Option<T> {
        let inner = self.lock();
        let account = inner.accounts.records.get(address)?;
        T::decode(address, &account.data).ok()
    }

    /// Reject the next submission with `rejection`, leaving state untouched.
    pub fn reject_next(&self, rejection: Rejection) {
        self.lock().reject_next = Some(rejection);
    }

    /// Instructions of every confirmed submission, oldest first.
    pub fn confirmed(&self) -> Vec<Vec<Instruction>> {
        self.lock().confirmed.clone()
    }

    fn apply(
        &self,
        accounts: &mut Accounts,
        ix: &Instruction,
    ) -> std::result::Result<(), Rejection> {
        if ix.program_id == self.staking_program {
            self.apply_staking(accounts, ix)
        } else if ix.program_id == self.dice_program {
            self.apply_dice(accounts, ix)
        } else if ix.program_id == anchor_spl::associated_token::ID {
            let address = key(ix, 1)?;
            accounts
                .records
                .entry(address)
                .or_insert_with(|| MockAccount {
                    owner: anchor_spl::token::ID,
                    data: vec![0; TOKEN_ACCOUNT_LEN],
                });
            Ok(())
        } else {
            Err(Rejection::new(format!("unknown program {}", ix.program_id)))
        }
    }

    fn apply_staking(
        &self,
        accounts: &mut Accounts,
        ix: &Instruction,
    ) -> std::result::Result<(), Rejection> {
        let program = self.staking_program;
        if staking::Initialize::parse(&ix.data).is_some() {
            let settings = Settings {
                admin: key(ix, 0)?,
                pool: key(ix, 2)?,
                dev_wallet: key(ix, 3)?,
                marketing_wallet: key(ix, 4)?,
                ..Default::default()
            };
            accounts.create(program, key(ix, 1)?, &settings)
        } else if staking::InitBlacklist::parse(&ix.data).is_some() {
            accounts.load::<Settings>(&key(ix, 1)?)?;
            let blacklist = Blacklist {
                admin: key(ix, 0)?,
                ..Default::default()
            };
            accounts.create(program, key(ix, 2)?, &blacklist)
        } else if let Some(args) = staking::InitUserState::parse(&ix.data) {
            accounts.load::<Settings>(&key(ix, 1)?)?;
            let state = UserState {
                user: args.user,
                referrer: args.referrer,
                ..Default::default()
            };
            accounts.create(program, key(ix, 2)?, &state)
        } else if let Some(args) = staking::Deposit::parse(&ix.data) {
            let user = key(ix, 0)?;
            let settings_key = key(ix, 1)?;
            let user_state_key = key(ix, staking::DepositAccounts::USER_STATE_INDEX)?;
            let referrer = key(ix, staking::DepositAccounts::REFERRER_INDEX)?;
            let mut settings = accounts.load::<Settings>(&settings_key)?;
            accounts.load::<UserState>(&key(ix, staking::DepositAccounts::REF_USER_STATE_INDEX)?)?;
            let mut state = accounts.load::<UserState>(&user_state_key)?;

            let invest = InvestData {
                user,
                seed_key: args.seed_key,
                amount: args.amount,
                ..Default::default()
            };
            accounts.create(
                program,
                key(ix, staking::DepositAccounts::INVEST_DATA_INDEX)?,
                &invest,
            )?;

            if state.referrer == NO_REFERRER && referrer != NO_REFERRER && referrer != user {
                state.referrer = referrer;
            }
            state.total_deposit += args.amount;
            state.invest_count += 1;
            accounts.store(&user_state_key, &state);

            settings.last_deposit_user = user;
            settings.total_invested += args.amount;
            accounts.store(&settings_key, &settings);
            accounts.credit(key(ix, 3)?, args.amount);
            Ok(())
        } else if staking::Unstake::parse(&ix.data).is_some() {
            accounts.load::<Settings>(&key(ix, 1)?)?;
            accounts.load::<InvestData>(&key(ix, 4)?)?;
            accounts.load::<UserState>(&key(ix, 5)?)?;
            Ok(())
        } else if staking::Compound::parse(&ix.data).is_some() {
            accounts.load::<Settings>(&key(ix, 1)?)?;
            accounts.load::<InvestData>(&key(ix, 3)?)?;
            Ok(())
        } else {
            Err(Rejection::new("unknown staking instruction"))
        }
    }

    fn apply_dice(
        &self,
        accounts: &mut Accounts,
        ix: &Instruction,
    ) -> std::result::Result<(), Rejection> {
        if dice::Initialize::parse(&ix.data).is_some() {
            let state = State {
                authority: key(ix, 0)?,
                gang_mint: key(ix, 2)?,
                usdc_mint: key(ix, 3)?,
            };
            accounts.create(self.dice_program, key(ix, 1)?, &state)
        } else if let Some(args) = dice::DepositSol::parse(&ix.data) {
            accounts.credit(key(ix, 1)?, args.amount);
            Ok(())
        } else if let Some(args) = dice::WithdrawSol::parse(&ix.data) {
            let state = accounts.load::<State>(&key(ix, 1)?)?;
            if state.authority != key(ix, 0)? {
                return Err(Rejection::new("ConstraintHasOne: authority"));
            }
            accounts.debit(key(ix, 2)?, args.amount)
        } else if let Some(args) = dice::PlaceSolBet::parse(&ix.data) {
            accounts.load::<State>(&key(ix, 1)?)?;
            accounts.credit(key(ix, 2)?, args.amount);
            Ok(())
        } else if dice::PlaceTokenBet::parse(&ix.data).is_some()
            || dice::DepositToken::parse(&ix.data).is_some()
            || dice::WithdrawToken::parse(&ix.data).is_some()
        {
            accounts.load::<State>(&key(ix, 1)?)?;
            for index in [2, 3] {
                let token_account = key(ix, index)?;
                if !accounts.records.contains_key(&token_account) {
                    return Err(Rejection {
                        instruction: None,
                        custom_code: Some(ACCOUNT_NOT_INITIALIZED),
                        reason: format!("AccountNotInitialized: {token_account}"),
                    });
                }
            }
            Ok(())
        } else {
            Err(Rejection::new("unknown dice instruction"))
        }
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self
            .lock()
            .accounts
            .records
            .get(address)
            .map(|account| account.data.clone()))
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        prefix: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        Ok(self
            .lock()
            .accounts
            .records
            .iter()
            .filter(|(_, account)| account.owner == *program_id && account.data.starts_with(prefix))
            .map(|(address, account)| (*address, account.data.clone()))
            .collect())
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self
            .lock()
            .accounts
            .balances
            .get(address)
            .copied()
            .unwrap_or_default())
    }

    async fn submit(&self, set: &PendingOperationSet, payer: &Keypair) -> Result<Signature> {
        let mut inner = self.lock();
        if let Some(rejection) = inner.reject_next.take() {
            return Err(set.rejection(rejection));
        }

        let instructions = set.instructions();
        let payer = payer.pubkey();
        let mut scratch = inner.accounts.clone();
        for (index, ix) in instructions.iter().enumerate() {
            let signed = ix
                .accounts
                .iter()
                .filter(|meta| meta.is_signer)
                .all(|meta| meta.pubkey == payer);
            if !signed {
                return Err(set.rejection(Rejection::new("missing signature").at(index, None)));
            }
            if let Err(mut rejection) = self.apply(&mut scratch, ix) {
                rejection.instruction = Some(index);
                return Err(set.rejection(rejection));
            }
        }

        inner.accounts = scratch;
        inner.confirmed.push(instructions);
        inner.signatures += 1;
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&inner.signatures.to_le_bytes());
        Ok(Signature::from(bytes))
    }
}
