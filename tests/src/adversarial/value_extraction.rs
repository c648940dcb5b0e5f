//! Attempts to leak value out of the engine. Every scenario must end with
//! balances conserved and the pool-total invariant intact.

#[cfg(test)]
mod tests {
    use crate::support::{addr, Harness, ADMIN, DURATION};
    use staking_engine::{PoolRate, StakingAdminApi, StakingApi, StakingError};

    #[tokio::test]
    async fn test_double_exit_yields_nothing() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(1_000).await;
        harness.stake_as(addr(1), pool, 1_000).await;
        harness.clock.advance(DURATION);

        harness.service.unstake(addr(1), pool).await.unwrap();
        // the stake record is drained; a second exit finds nothing
        assert!(matches!(
            harness.service.unstake(addr(1), pool).await,
            Err(StakingError::InsufficientStake { .. })
        ));
        assert!(matches!(
            harness.service.early_unstake(addr(1), pool).await,
            Err(StakingError::InsufficientStake { .. })
        ));
        assert!(harness.service.ledger_consistent());
    }

    #[tokio::test]
    async fn test_zero_balance_attacker_cannot_enter() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(1_000).await;

        assert!(matches!(
            harness.service.stake(addr(0x66), pool, 1).await,
            Err(StakingError::InsufficientBalance { .. })
        ));
        assert!(harness.service.position(addr(0x66)).await.is_none());
    }

    #[tokio::test]
    async fn test_backwards_clock_mints_no_rewards() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(1_000).await;
        harness.stake_as(addr(1), pool, 1_000).await;

        // a stale timestamp behind the accrual window yields zero, and the
        // window never moves backwards
        harness.clock.set(harness.clock.now() - 100_000);
        assert_eq!(
            harness.service.pending_reward(addr(1), pool).await.unwrap(),
            0
        );

        harness.clock.set(crate::support::START + DURATION);
        assert_eq!(
            harness.service.pending_reward(addr(1), pool).await.unwrap(),
            100
        );
        let payout = harness.service.unstake(addr(1), pool).await.unwrap();
        assert_eq!(payout, 1_000 - 10 + 100);
    }

    #[tokio::test]
    async fn test_ledger_failure_cannot_strand_or_duplicate_value() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(1_000).await;
        harness.stake_as(addr(1), pool, 1_000).await;
        harness.clock.advance(DURATION);

        let watched = [addr(1), ADMIN];
        let before = harness.total_value(&watched);

        harness.ledger.fail_next_call();
        assert!(harness.service.unstake(addr(1), pool).await.is_err());
        assert_eq!(harness.total_value(&watched), before);

        // a successful retry pays exactly once
        let payout = harness.service.unstake(addr(1), pool).await.unwrap();
        assert_eq!(payout, 1_090);
        assert_eq!(harness.total_value(&watched), before);
        assert!(matches!(
            harness.service.unstake(addr(1), pool).await,
            Err(StakingError::InsufficientStake { .. })
        ));
    }

    #[tokio::test]
    async fn test_full_scale_fee_cannot_underflow() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(10_000).await;
        harness.service.set_staking_fee(ADMIN, 10_000).await.unwrap();

        harness.stake_as(addr(1), pool, 1_000).await;
        harness.clock.advance(DURATION);

        // a 100% fee consumes the whole principal; the payout is the reward
        let payout = harness.service.unstake(addr(1), pool).await.unwrap();
        assert_eq!(payout, 100);
        assert!(harness.service.ledger_consistent());
    }

    #[tokio::test]
    async fn test_dust_stakes_round_down_never_up() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1)).await;
        harness.fund_treasury(1_000).await;
        harness.stake_as(addr(1), pool, 3).await;

        // 1 bp on 3 units: every window truncates to zero
        harness.clock.advance(DURATION * 10);
        assert_eq!(
            harness.service.pending_reward(addr(1), pool).await.unwrap(),
            0
        );
        let payout = harness.service.unstake(addr(1), pool).await.unwrap();
        assert_eq!(payout, 3);
    }

    #[tokio::test]
    async fn test_many_small_exits_preserve_pool_invariant() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(100_000).await;
        for tag in 1..=8 {
            harness.stake_as(addr(tag), pool, 97 * tag as u128).await;
        }
        harness.clock.advance(DURATION);

        for tag in (1..=8).rev() {
            harness.service.unstake(addr(tag), pool).await.unwrap();
            assert!(harness.service.ledger_consistent());
        }
        assert_eq!(harness.service.pool(pool).await.unwrap().total_staked, 0);
        assert_eq!(harness.service.pool(pool).await.unwrap().staker_count, 0);
    }
}
