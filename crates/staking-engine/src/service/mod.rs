//! Staking service - core business logic.
//!
//! Every mutating operation follows the same shape: validate, settle accrual,
//! commit the engine's own state, then perform the outbound ledger calls.
//! A failed ledger call reverses the committed deltas, so no partial state
//! survives; the per-(account, pool) in-flight guard makes that reversal
//! race-free and rejects reentrant exits.

use crate::domain::{
    accrual, ExitReceipt, MigrationProgress, Pool, PoolRate, SettleReceipt, StakingConfig,
    StakingError, StakingResult,
};
use crate::events::StakingEvent;
use crate::metrics;
use crate::ports::{
    Authorizer, EventSink, StakingAdminApi, StakingApi, SystemTimeSource, TimeSource, TokenLedger,
};
use crate::state::StakingState;
use crate::validation::StakeValidator;
use async_trait::async_trait;
use shared_types::{
    display_address, Address, Amount, BasisPoints, PoolId, PoolSummary, PositionSummary,
};
use std::sync::Arc;
use tracing::{info, warn};


/// Which exit path is being taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitKind {
    Ordinary,
    Early,
}

impl ExitKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "unstake",
            Self::Early => "early_unstake",
        }
    }
}

/// The staking engine service, generic over its outbound ports.
pub struct StakingService<L, A, E>
where
    L: TokenLedger,
    A: Authorizer,
    E: EventSink,
{
    ledger_client: Arc<L>,
    authorizer: Arc<A>,
    events: Arc<E>,
    state: Arc<StakingState>,
    /// The engine's custody account on the external ledger; holds
    /// `sum of principals + treasury` at all times.
    custody: Address,
    time_source: Box<dyn TimeSource>,
}

/// Dependencies for [`StakingService`].
pub struct StakingDependencies<L, A, E> {
    pub ledger_client: Arc<L>,
    pub authorizer: Arc<A>,
    pub events: Arc<E>,
    pub custody: Address,
    pub config: StakingConfig,
}

impl<L, A, E> StakingService<L, A, E>
where
    L: TokenLedger,
    A: Authorizer,
    E: EventSink,
{
    /// Create a new service. Fails on malformed configuration.
    pub fn new(deps: StakingDependencies<L, A, E>) -> StakingResult<Self> {
        Ok(Self {
            ledger_client: deps.ledger_client,
            authorizer: deps.authorizer,
            events: deps.events,
            state: Arc::new(StakingState::new(deps.config)?),
            custody: deps.custody,
            time_source: Box::new(SystemTimeSource),
        })
    }

    /// Set custom time source (for testing).
    pub fn with_time_source(mut self, time_source: Box<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Whether every pool total matches the sum of its member principals.
    pub fn ledger_consistent(&self) -> bool {
        self.state.ledger.read().is_consistent()
    }

    /// Current treasury / fee-allowance balance.
    pub fn treasury(&self) -> Amount {
        self.state.ledger.read().treasury
    }

    fn require_admin(&self, caller: &Address) -> StakingResult<()> {
        if !self.authorizer.is_admin(caller) {
            metrics::record_rejection("unauthorized");
            return Err(StakingError::Unauthorized(*caller));
        }
        Ok(())
    }

    async fn emit(&self, event: StakingEvent) {
        let kind = event.kind();
        if let Err(err) = self.events.publish(event).await {
            warn!("[staking] failed to publish {kind} event: {err}");
        }
    }

    async fn emit_stats(&self, pool_id: PoolId) {
        let stats = {
            let book = self.state.ledger.read();
            book.pools
                .get(&pool_id)
                .map(|pool| (pool.total_staked, pool.staker_count))
        };
        if let Some((total_staked, staker_count)) = stats {
            self.emit(StakingEvent::StatisticsUpdated {
                pool: pool_id,
                total_staked,
                staker_count,
            })
            .await;
        }
    }

    fn rollback_settle(&self, account: &Address, pool: &PoolId, receipt: &SettleReceipt) {
        self.state.ledger.write().unsettle(account, pool, receipt);
    }

    fn rollback_exit(
        &self,
        account: &Address,
        pool: &PoolId,
        exit: &ExitReceipt,
        settle: &SettleReceipt,
    ) {
        let mut book = self.state.ledger.write();
        book.revert_exit(account, pool, exit);
        book.unsettle(account, pool, settle);
    }

    async fn process_exit(
        &self,
        caller: Address,
        pool_id: PoolId,
        kind: ExitKind,
    ) -> StakingResult<Amount> {
        let _guard = self.state.try_begin(caller, pool_id)?;
        let now = self.time_source.now();

        let (settle_receipt, exit_receipt, fee, payout) = {
            let mut book = self.state.ledger.write();
            if !book.pools.contains(&pool_id) {
                return Err(StakingError::PoolNotFound(pool_id));
            }
            let Some(stake) = book.positions.stake(&caller, &pool_id) else {
                return Err(StakingError::InsufficientStake { pool: pool_id });
            };
            if stake.principal == 0 {
                return Err(StakingError::InsufficientStake { pool: pool_id });
            }
            if kind == ExitKind::Ordinary {
                StakeValidator::validate_maturity(
                    now,
                    stake.staked_at,
                    book.config.staking_duration_secs,
                )?;
            }
            let principal = stake.principal;

            // the treasury must cover the rewards that settlement is about
            // to credit, before anything is mutated
            let projected = book.projected_increment(&caller, &pool_id, now)?;
            let rewards_after = book
                .positions
                .position(&caller)
                .map_or(0, |position| position.rewards)
                .checked_add(projected)
                .ok_or(StakingError::ArithmeticOverflow("reward accumulator"))?;
            if book.treasury < rewards_after {
                metrics::record_rejection("treasury_exhausted");
                return Err(StakingError::TreasuryExhausted {
                    available: book.treasury,
                    required: rewards_after,
                });
            }

            let fee_bps = match kind {
                ExitKind::Ordinary => book.config.staking_fee_bps,
                ExitKind::Early => book.config.early_unstake_fee_bps,
            };
            let fee = accrual::fee_amount(principal, fee_bps)?;

            let settle_receipt = book.settle(&caller, &pool_id, now)?;
            let exit_receipt = book.apply_exit(&caller, &pool_id, now)?;
            let payout = exit_receipt
                .principal
                .checked_sub(fee)
                .ok_or(StakingError::ArithmeticOverflow("payout"))?
                .checked_add(exit_receipt.rewards)
                .ok_or(StakingError::ArithmeticOverflow("payout"))?;
            (settle_receipt, exit_receipt, fee, payout)
        };

        // interactions only after every state mutation is committed; the
        // payout transfer is the one call that can reach third-party code
        if let Err(err) = self.ledger_client.transfer(caller, payout).await {
            self.rollback_exit(&caller, &pool_id, &exit_receipt, &settle_receipt);
            metrics::record_rejection("ledger");
            return Err(StakingError::Ledger(err));
        }
        if fee > 0 {
            if let Err(err) = self.ledger_client.burn(fee).await {
                // the payout has irrevocably left custody; the exit stays
                // committed and the unburned fee remains in custody
                warn!("[staking] fee burn failed after payout, {fee} retained in custody: {err}");
            }
        }

        let rewards = exit_receipt.rewards;
        info!(
            "[staking] {} exited pool {} via {}: principal {}, fee {}, rewards {}",
            display_address(&caller),
            display_address(&pool_id),
            kind.as_str(),
            exit_receipt.principal,
            fee,
            rewards
        );
        metrics::record_exit(kind.as_str());

        match kind {
            ExitKind::Ordinary => {
                self.emit(StakingEvent::Unstaked {
                    user: caller,
                    pool: pool_id,
                    amount: exit_receipt.principal,
                    fee,
                })
                .await;
            }
            ExitKind::Early => {
                self.emit(StakingEvent::EarlyUnstaked {
                    user: caller,
                    pool: pool_id,
                    amount: exit_receipt.principal,
                    penalty: fee,
                })
                .await;
            }
        }
        if rewards > 0 {
            metrics::record_rewards_paid(rewards);
            self.emit(StakingEvent::RewardPaid {
                user: caller,
                pool: pool_id,
                amount: rewards,
            })
            .await;
        }
        self.emit_stats(pool_id).await;

        Ok(payout)
    }
}

#[async_trait]
impl<L, A, E> StakingApi for StakingService<L, A, E>
where
    L: TokenLedger,
    A: Authorizer,
    E: EventSink,
{
    async fn stake(&self, caller: Address, pool_id: PoolId, amount: Amount) -> StakingResult<()> {
        StakeValidator::validate_amount(amount)?;
        let _guard = self.state.try_begin(caller, pool_id)?;
        let now = self.time_source.now();

        let (fee, settle_receipt) = {
            let mut book = self.state.ledger.write();
            if book.paused {
                metrics::record_rejection("paused");
                return Err(StakingError::Paused);
            }
            if !book.pools.contains(&pool_id) {
                return Err(StakingError::PoolNotFound(pool_id));
            }
            book.check_stake_capacity(&caller, &pool_id, amount)?;
            let fee = accrual::fee_amount(amount, book.config.staking_fee_bps)?;
            if book.treasury < fee {
                metrics::record_rejection("treasury_exhausted");
                return Err(StakingError::TreasuryExhausted {
                    available: book.treasury,
                    required: fee,
                });
            }
            let settle_receipt = book.settle(&caller, &pool_id, now)?;
            (fee, settle_receipt)
        };

        let balance = match self.ledger_client.balance_of(caller).await {
            Ok(balance) => balance,
            Err(err) => {
                self.rollback_settle(&caller, &pool_id, &settle_receipt);
                return Err(StakingError::Ledger(err));
            }
        };
        if balance < amount {
            self.rollback_settle(&caller, &pool_id, &settle_receipt);
            metrics::record_rejection("insufficient_balance");
            return Err(StakingError::InsufficientBalance {
                balance,
                required: amount,
            });
        }

        if let Err(err) = self
            .ledger_client
            .transfer_from(caller, self.custody, amount)
            .await
        {
            self.rollback_settle(&caller, &pool_id, &settle_receipt);
            metrics::record_rejection("ledger");
            return Err(StakingError::Ledger(err));
        }

        // the entry fee burns from the fee allowance, not from the user's
        // recorded principal
        if fee > 0 {
            if let Err(err) = self.ledger_client.burn(fee).await {
                if let Err(refund_err) = self.ledger_client.transfer(caller, amount).await {
                    warn!(
                        "[staking] refund after failed entry-fee burn also failed: {refund_err}"
                    );
                }
                self.rollback_settle(&caller, &pool_id, &settle_receipt);
                return Err(StakingError::Ledger(err));
            }
        }

        let commit = {
            let mut book = self.state.ledger.write();
            book.apply_stake(caller, pool_id, amount, now).and_then(|_| {
                if fee > 0 {
                    book.treasury_debit(fee)
                } else {
                    Ok(())
                }
            })
        };
        if let Err(err) = commit {
            // capacity was prechecked under the guard; reaching this means
            // the book changed out from under us, so compensate and abort
            if let Err(refund_err) = self.ledger_client.transfer(caller, amount).await {
                warn!("[staking] refund after failed stake commit also failed: {refund_err}");
            }
            self.rollback_settle(&caller, &pool_id, &settle_receipt);
            return Err(err);
        }

        info!(
            "[staking] {} staked {} into pool {} (entry fee {})",
            display_address(&caller),
            amount,
            display_address(&pool_id),
            fee
        );
        metrics::record_stake();
        self.emit(StakingEvent::Staked {
            user: caller,
            pool: pool_id,
            amount,
            fee,
        })
        .await;
        self.emit_stats(pool_id).await;
        Ok(())
    }

    async fn unstake(&self, caller: Address, pool_id: PoolId) -> StakingResult<Amount> {
        self.process_exit(caller, pool_id, ExitKind::Ordinary).await
    }

    async fn early_unstake(&self, caller: Address, pool_id: PoolId) -> StakingResult<Amount> {
        self.process_exit(caller, pool_id, ExitKind::Early).await
    }

    async fn pending_reward(&self, account: Address, pool_id: PoolId) -> StakingResult<Amount> {
        let now = self.time_source.now();
        let book = self.state.ledger.read();
        if !book.pools.contains(&pool_id) {
            return Err(StakingError::PoolNotFound(pool_id));
        }
        book.projected_increment(&account, &pool_id, now)
    }

    async fn position(&self, account: Address) -> Option<PositionSummary> {
        let book = self.state.ledger.read();
        book.positions
            .position(&account)
            .map(|position| position.summary(account))
    }

    async fn pool(&self, pool_id: PoolId) -> Option<PoolSummary> {
        let book = self.state.ledger.read();
        book.pools.get(&pool_id).map(Pool::summary)
    }

    async fn list_pools(&self) -> Vec<PoolId> {
        let book = self.state.ledger.read();
        book.pools.ids().to_vec()
    }
}

#[async_trait]
impl<L, A, E> StakingAdminApi for StakingService<L, A, E>
where
    L: TokenLedger,
    A: Authorizer,
    E: EventSink,
{
    async fn create_pool(
        &self,
        caller: Address,
        pool_id: PoolId,
        rate: PoolRate,
    ) -> StakingResult<()> {
        self.require_admin(&caller)?;
        StakeValidator::validate_rate(&rate)?;
        let now = self.time_source.now();
        {
            let mut book = self.state.ledger.write();
            book.pools.register(Pool::new(pool_id, rate, now))?;
        }
        info!("[staking] pool {} created", display_address(&pool_id));
        self.emit(StakingEvent::PoolCreated {
            pool: pool_id,
            rate,
        })
        .await;
        Ok(())
    }

    async fn update_pool_rate(
        &self,
        caller: Address,
        pool_id: PoolId,
        rate: PoolRate,
    ) -> StakingResult<()> {
        self.require_admin(&caller)?;
        StakeValidator::validate_rate(&rate)?;
        {
            let mut book = self.state.ledger.write();
            let pool = book
                .pools
                .get_mut(&pool_id)
                .ok_or(StakingError::PoolNotFound(pool_id))?;
            // yield terms never change under live principal; migrate instead
            if pool.total_staked != 0 {
                return Err(StakingError::PoolNotEmpty {
                    pool: pool_id,
                    total_staked: pool.total_staked,
                });
            }
            pool.rate = rate;
        }
        info!("[staking] pool {} rate updated", display_address(&pool_id));
        self.emit(StakingEvent::PoolUpdated {
            pool: pool_id,
            rate,
        })
        .await;
        Ok(())
    }

    async fn migrate_pool(
        &self,
        caller: Address,
        pool_id: PoolId,
        new_rate: PoolRate,
        cursor: usize,
        limit: usize,
    ) -> StakingResult<MigrationProgress> {
        self.require_admin(&caller)?;
        StakeValidator::validate_rate(&new_rate)?;
        let now = self.time_source.now();

        let progress = {
            let mut book = self.state.ledger.write();
            if !book.pools.contains(&pool_id) {
                return Err(StakingError::PoolNotFound(pool_id));
            }
            let members_len = book.positions.members(&pool_id).len();
            if cursor > members_len {
                return Err(StakingError::InvalidCursor {
                    cursor,
                    members: members_len,
                });
            }
            let batch = limit.min(book.config.max_migration_batch).max(1);

            // new entries stake under the new configuration from the first
            // batch onwards
            if cursor == 0 {
                if let Some(pool) = book.pools.get_mut(&pool_id) {
                    pool.rate = new_rate;
                }
            }

            let mut processed = 0usize;
            let mut index = cursor;
            while index < members_len && processed < batch {
                let account = book.positions.members(&pool_id)[index];
                let needs_migration = book
                    .positions
                    .stake(&account, &pool_id)
                    .map_or(false, |stake| {
                        stake.principal > 0 && stake.rate != new_rate
                    });
                if needs_migration {
                    if self.state.is_in_flight(&account, &pool_id) {
                        // stop at the busy member; the caller resumes from
                        // this index
                        break;
                    }
                    // settle at the stamped old rate, then restamp; the
                    // lock start is untouched so migration never extends a
                    // member's holding period
                    book.settle(&account, &pool_id, now)?;
                    if let Some(stake) = book.positions.stake_mut(&account, &pool_id) {
                        stake.rate = new_rate;
                    }
                    processed += 1;
                }
                index += 1;
            }

            let remaining = members_len - index;
            MigrationProgress {
                pool: pool_id,
                processed,
                remaining,
                next_cursor: index,
                complete: remaining == 0,
            }
        };

        info!(
            "[staking] pool {} migration batch: {} migrated, {} remaining",
            display_address(&pool_id),
            progress.processed,
            progress.remaining
        );
        if progress.complete {
            self.emit(StakingEvent::PoolUpdated {
                pool: pool_id,
                rate: new_rate,
            })
            .await;
        }
        self.emit_stats(pool_id).await;
        Ok(progress)
    }

    async fn set_staking_duration(
        &self,
        caller: Address,
        duration_secs: u64,
    ) -> StakingResult<()> {
        self.require_admin(&caller)?;
        if duration_secs == 0 {
            return Err(StakingError::InvalidDuration);
        }
        let now = self.time_source.now();
        {
            let mut book = self.state.ledger.write();
            // the duration normalizes accrual; settle every live stake at
            // the old value before changing it
            book.settle_all(now)?;
            book.config.staking_duration_secs = duration_secs;
        }
        info!("[staking] staking duration set to {duration_secs}s");
        Ok(())
    }

    async fn set_staking_fee(&self, caller: Address, fee_bps: BasisPoints) -> StakingResult<()> {
        self.require_admin(&caller)?;
        StakeValidator::validate_fee(fee_bps)?;
        self.state.ledger.write().config.staking_fee_bps = fee_bps;
        info!("[staking] staking fee set to {fee_bps} bps");
        Ok(())
    }

    async fn set_early_unstake_fee(
        &self,
        caller: Address,
        fee_bps: BasisPoints,
    ) -> StakingResult<()> {
        self.require_admin(&caller)?;
        StakeValidator::validate_fee(fee_bps)?;
        self.state.ledger.write().config.early_unstake_fee_bps = fee_bps;
        info!("[staking] early-unstake fee set to {fee_bps} bps");
        Ok(())
    }

    async fn set_reward_rate(&self, caller: Address, rate_bps: BasisPoints) -> StakingResult<()> {
        self.require_admin(&caller)?;
        if rate_bps == 0 {
            return Err(StakingError::InvalidRate(0));
        }
        let now = self.time_source.now();
        {
            let mut book = self.state.ledger.write();
            // settle follows-global stakes at the old rate first; an
            // unsettled rate change would misattribute past time to the new
            // rate
            book.settle_global_rate_stakes(now)?;
            book.config.reward_rate_bps = rate_bps;
        }
        info!("[staking] global reward rate set to {rate_bps} bps");
        Ok(())
    }

    async fn set_paused(&self, caller: Address, paused: bool) -> StakingResult<()> {
        self.require_admin(&caller)?;
        self.state.ledger.write().paused = paused;
        info!("[staking] stake entry paused: {paused}");
        Ok(())
    }

    async fn fund_treasury(&self, caller: Address, amount: Amount) -> StakingResult<()> {
        self.require_admin(&caller)?;
        StakeValidator::validate_amount(amount)?;
        {
            let book = self.state.ledger.read();
            book.treasury
                .checked_add(amount)
                .ok_or(StakingError::ArithmeticOverflow("treasury"))?;
        }
        self.ledger_client
            .transfer_from(caller, self.custody, amount)
            .await
            .map_err(StakingError::Ledger)?;
        let treasury = {
            let mut book = self.state.ledger.write();
            book.treasury_credit(amount)?;
            book.treasury
        };
        info!("[staking] treasury funded with {amount}, now {treasury}");
        self.emit(StakingEvent::TreasuryFunded { amount, treasury }).await;
        Ok(())
    }
}
