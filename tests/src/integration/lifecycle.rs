//! Full staking lifecycles: multiple users, multiple pools, entries and
//! exits interleaved over time, with the pool-total invariant and value
//! conservation checked along the way.

#[cfg(test)]
mod tests {
    use crate::support::{addr, Harness, ADMIN, DURATION};
    use staking_engine::{PoolRate, StakingApi, StakingAdminApi, StakingError};

    #[tokio::test]
    async fn test_multi_user_multi_pool_lifecycle() {
        let harness = Harness::new();
        let fixed = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        let global = harness.create_pool(2, PoolRate::Global).await;
        harness.fund_treasury(10_000).await;

        let users = [addr(1), addr(2), addr(3)];
        let watched = [addr(1), addr(2), addr(3), ADMIN];

        harness.stake_as(users[0], fixed, 1_000).await;
        harness.stake_as(users[1], fixed, 2_000).await;
        let baseline = harness.total_value(&watched);
        assert!(harness.service.ledger_consistent());

        harness.clock.advance(DURATION / 2);
        harness.stake_as(users[2], global, 4_000).await;
        assert_eq!(harness.total_value(&watched), baseline + 4_000);
        assert!(harness.service.ledger_consistent());

        // user 2 bails out early, paying the 20% penalty on 2000 but
        // keeping the 750s reward of 150
        harness.clock.advance(DURATION / 4);
        let payout = harness
            .service
            .early_unstake(users[1], fixed)
            .await
            .unwrap();
        assert_eq!(payout, 2_000 - 400 + 150);
        assert!(harness.service.ledger_consistent());

        // user 1 waits out the full lock
        harness.clock.advance(DURATION / 4);
        let payout = harness.service.unstake(users[0], fixed).await.unwrap();
        assert_eq!(payout, 1_000 - 10 + 100);

        // user 3's global-rate stake matures on its own schedule
        harness.clock.advance(DURATION / 2);
        let payout = harness.service.unstake(users[2], global).await.unwrap();
        assert_eq!(payout, 4_000 - 40 + 400);

        // both pools fully drained, never destroyed
        assert_eq!(harness.service.pool(fixed).await.unwrap().total_staked, 0);
        assert_eq!(harness.service.pool(global).await.unwrap().total_staked, 0);
        assert_eq!(harness.service.list_pools().await.len(), 2);
        assert!(harness.service.ledger_consistent());

        // no value appeared or vanished across the whole run
        assert_eq!(harness.total_value(&watched), baseline + 4_000);
    }

    #[tokio::test]
    async fn test_restake_after_full_exit() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(1_000).await;

        harness.stake_as(addr(1), pool, 1_000).await;
        harness.clock.advance(DURATION);
        harness.service.unstake(addr(1), pool).await.unwrap();

        // the drained record accepts a fresh stake with a fresh lock
        harness.stake_as(addr(1), pool, 500).await;
        let summary = harness.service.pool(pool).await.unwrap();
        assert_eq!(summary.total_staked, 500);
        assert_eq!(summary.staker_count, 1);

        assert!(matches!(
            harness.service.unstake(addr(1), pool).await,
            Err(StakingError::LockNotMatured { .. })
        ));
        harness.clock.advance(DURATION);
        let payout = harness.service.unstake(addr(1), pool).await.unwrap();
        assert_eq!(payout, 500 - 5 + 50);
        assert!(harness.service.ledger_consistent());
    }

    #[tokio::test]
    async fn test_pause_blocks_entry_not_exit() {
        let harness = Harness::new();
        let pool = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        harness.fund_treasury(1_000).await;
        harness.stake_as(addr(1), pool, 1_000).await;

        harness.service.set_paused(ADMIN, true).await.unwrap();

        harness.ledger.credit(addr(2), 500);
        assert!(matches!(
            harness.service.stake(addr(2), pool, 500).await,
            Err(StakingError::Paused)
        ));

        // exits keep working while paused
        harness.clock.advance(DURATION);
        assert!(harness.service.unstake(addr(1), pool).await.is_ok());
    }

    #[tokio::test]
    async fn test_queries_reflect_live_positions() {
        let harness = Harness::new();
        let pool_a = harness.create_pool(1, PoolRate::Fixed(1_000)).await;
        let pool_b = harness.create_pool(2, PoolRate::Fixed(500)).await;
        harness.fund_treasury(1_000).await;

        harness.stake_as(addr(1), pool_a, 300).await;
        harness.stake_as(addr(1), pool_b, 700).await;

        let position = harness.service.position(addr(1)).await.unwrap();
        assert_eq!(position.total_staked, 1_000);
        assert_eq!(position.stakes.len(), 2);

        harness.clock.advance(DURATION);
        harness.service.unstake(addr(1), pool_a).await.unwrap();

        let position = harness.service.position(addr(1)).await.unwrap();
        assert_eq!(position.stakes.len(), 1);
        assert_eq!(position.stakes[0].pool, pool_b);
        assert_eq!(position.total_staked, 700);
    }
}
