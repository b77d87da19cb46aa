//! Assembly of atomic operation sets.
//!
//! A [`PendingOperationSet`] is submitted as one transaction: the cluster
//! applies every instruction or none. The composer's job is to make the set
//! complete (every record the primary operation touches exists or is created
//! first) and correctly ordered (creates before the operations that use them).

use crate::constants::NO_REFERRER;
use crate::error::{Error, Result};
use crate::instructions::staking::{self, DepositAccounts, InitUserStateAccounts};
use crate::ledger::{Ledger, Rejection, ACCOUNT_ALREADY_IN_USE};
use crate::pda::AddressBook;
use crate::reader::AccountReader;
use crate::state::{AccountRecord, Settings, UserState};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationRole {
    /// Creates `record`, which later operations in the set may reference.
    Create { record: Pubkey },
    Primary,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub label: &'static str,
    pub role: OperationRole,
    pub instruction: Instruction,
}

/// Ordered operations submitted together.
#[derive(Debug, Clone, Default)]
pub struct PendingOperationSet {
    operations: Vec<Operation>,
}

impl PendingOperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a create-operation ahead of every primary operation.
    pub fn push_create(&mut self, label: &'static str, record: Pubkey, instruction: Instruction) {
        let position = self
            .operations
            .iter()
            .position(|op| op.role == OperationRole::Primary)
            .unwrap_or(self.operations.len());
        self.operations.insert(
            position,
            Operation {
                label,
                role: OperationRole::Create { record },
                instruction,
            },
        );
    }

    pub fn push(&mut self, label: &'static str, instruction: Instruction) {
        self.operations.push(Operation {
            label,
            role: OperationRole::Primary,
            instruction,
        });
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        self.operations
            .iter()
            .map(|op| op.instruction.clone())
            .collect()
    }

    /// Records created by this set, in order.
    pub fn creates(&self) -> impl Iterator<Item = Pubkey> + '_ {
        self.operations.iter().filter_map(|op| match op.role {
            OperationRole::Create { record } => Some(record),
            OperationRole::Primary => None,
        })
    }

    pub fn creates_record(&self, record: &Pubkey) -> bool {
        self.creates().any(|created| created == *record)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Classify a rejection of this set.
    ///
    /// "Account already in use" raised by one of our create-operations means
    /// another client created the record between our read and our submit;
    /// that case is reported as [`Error::DuplicateCreate`]. Anything else is
    /// passed through as [`Error::RemoteRejected`].
    pub fn rejection(&self, rejection: Rejection) -> Error {
        if let (Some(index), Some(ACCOUNT_ALREADY_IN_USE)) =
            (rejection.instruction, rejection.custom_code)
        {
            if let Some(OperationRole::Create { record }) =
                self.operations.get(index).map(|op| op.role)
            {
                return Error::DuplicateCreate { address: record };
            }
        }
        Error::RemoteRejected {
            instruction: rejection.instruction,
            reason: rejection.reason,
        }
    }
}

/// Builds a [`PendingOperationSet`], checking prerequisites against the
/// current remote state.
pub struct Composer<'a, L: ?Sized> {
    reader: &'a AccountReader<L>,
    set: PendingOperationSet,
}

impl<'a, L: Ledger + ?Sized> Composer<'a, L> {
    pub fn new(reader: &'a AccountReader<L>) -> Self {
        Self {
            reader,
            set: PendingOperationSet::new(),
        }
    }

    /// Require that record `address` exists. Returns the current record, or
    /// `None` after queueing `create` because it is absent (or already queued
    /// by this composer).
    pub async fn require<T: AccountRecord>(
        &mut self,
        label: &'static str,
        address: Pubkey,
        create: impl FnOnce() -> Instruction,
    ) -> Result<Option<T>> {
        if self.set.creates_record(&address) {
            return Ok(None);
        }
        let record = self.reader.fetch_one::<T>(&address).await?;
        if record.is_none() {
            debug!(record = T::NAME, %address, "queueing create");
            self.set.push_create(label, address, create());
        }
        Ok(record)
    }

    /// Like [`Composer::require`] for accounts that are not program records
    /// (token accounts); only existence is checked.
    pub async fn require_account(
        &mut self,
        label: &'static str,
        address: Pubkey,
        create: impl FnOnce() -> Instruction,
    ) -> Result<bool> {
        if self.set.creates_record(&address) {
            return Ok(false);
        }
        let exists = self.reader.ledger().account_data(&address).await?.is_some();
        if !exists {
            debug!(%address, label, "queueing account create");
            self.set.push_create(label, address, create());
        }
        Ok(exists)
    }

    pub fn push(&mut self, label: &'static str, instruction: Instruction) {
        self.set.push(label, instruction);
    }

    pub fn finish(self) -> PendingOperationSet {
        self.set
    }
}

/// One deposit, as requested by the caller.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub user: Pubkey,
    pub amount: u64,
    /// Referrer to record if the user has none yet; [`NO_REFERRER`] for none.
    pub referrer: Pubkey,
    /// Makes the new invest data address unique.
    pub seed_key: Pubkey,
}

/// A composed deposit and the addresses it resolved.
#[derive(Debug, Clone)]
pub struct DepositPlan {
    pub set: PendingOperationSet,
    pub user_state: Pubkey,
    /// The referrer actually credited; differs from the request when the user
    /// already has one.
    pub referrer: Pubkey,
    pub ref_user_state: Pubkey,
    pub invest_data: Pubkey,
}

/// Compose a deposit, resolving the referrer.
///
/// A stored referrer always wins over the requested one, so the first
/// referrer ever recorded for a user is permanent. A referrer without a user
/// state gets one created in the same set. Self-referral counts as no
/// referrer; with no referrer the user's own state stands in as the
/// referrer state.
pub async fn compose_deposit<L: Ledger + ?Sized>(
    reader: &AccountReader<L>,
    addresses: &AddressBook,
    settings: &Settings,
    request: &DepositRequest,
) -> Result<DepositPlan> {
    let program_id = addresses.staking_program();
    let user = request.user;
    let requested = if request.referrer == user {
        NO_REFERRER
    } else {
        request.referrer
    };

    let mut composer = Composer::new(reader);

    let user_state = addresses.user_state(&user)?;
    let existing = composer
        .require::<UserState>("init_user_state", user_state, || {
            let accounts = InitUserStateAccounts {
                payer: user,
                settings: addresses.settings(),
                user_state,
            };
            staking::init_user_state(program_id, &accounts, user, requested)
        })
        .await?;

    let referrer = match existing.as_ref().and_then(UserState::referrer) {
        Some(stored) => {
            if stored != requested {
                debug!(%user, %stored, %requested, "keeping stored referrer");
            }
            stored
        }
        None => requested,
    };

    let ref_user_state = if referrer == NO_REFERRER {
        user_state
    } else {
        let ref_user_state = addresses.user_state(&referrer)?;
        composer
            .require::<UserState>("init_user_state", ref_user_state, || {
                let accounts = InitUserStateAccounts {
                    payer: user,
                    settings: addresses.settings(),
                    user_state: ref_user_state,
                };
                staking::init_user_state(program_id, &accounts, referrer, NO_REFERRER)
            })
            .await?;
        ref_user_state
    };

    let invest_data = addresses.invest_data(&user, &request.seed_key)?;
    let accounts = DepositAccounts {
        user,
        settings: addresses.settings(),
        dev_wallet: settings.dev_wallet,
        pool: settings.pool,
        user_state,
        invest_data,
        referrer,
        ref_user_state,
        last_deposit_user: settings.last_deposit_user,
    };
    composer.push(
        "deposit",
        staking::deposit(program_id, &accounts, request.amount, request.seed_key),
    );

    Ok(DepositPlan {
        set: composer.finish(),
        user_state,
        referrer,
        ref_user_state,
        invest_data,
    })
}
