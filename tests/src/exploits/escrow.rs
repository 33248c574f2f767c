//! # Escrow Attacks
//!
//! Attempts to pull funds out of escrow, bypass the premium cap or act
//! without the required role.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use flight_surety::prelude::*;
    use proptest::prelude::*;

    // =============================================================================
    // ROLE BYPASS
    // =============================================================================

    #[tokio::test]
    async fn test_unauthorized_status_report() {
        let (service, key) = deploy_with_flight().await;
        let before = service.snapshot().await;

        for caller in [MALLORY, A1, OWNER] {
            let err = service
                .set_flight_status(caller, key, FlightOutcome::Late)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(service.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_deauthorized_oracle_loses_access() {
        let (service, key) = deploy_with_flight().await;
        assert_eq!(service.deauthorize_caller(OWNER, ORACLE).await, Ok(true));

        let err = service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_outsider_cannot_self_authorize_or_pause() {
        let service = deploy();
        assert_eq!(
            service.authorize_caller(MALLORY, MALLORY).await.map_err(|e| e.kind()),
            Err(ErrorKind::Unauthorized)
        );
        assert_eq!(
            service.set_operating_status(MALLORY, false).await.map_err(|e| e.kind()),
            Err(ErrorKind::Unauthorized)
        );
        assert!(service.is_operational().await);
    }

    #[tokio::test]
    async fn test_outsider_cannot_nominate_or_reset() {
        let service = deploy();
        let err = service
            .init_airline(MALLORY, MALLORY, "Shell Air".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CallerNotRegisteredAirline);

        // Registered airlines may nominate but not reset.
        let err = service
            .init_airline(A1, A1, "Hijacked".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(service.airline(A1).await.unwrap().name, "Bootstrap Air");
    }

    #[tokio::test]
    async fn test_outsider_deposits_rejected() {
        let service = deploy();
        let before = service.snapshot().await;

        let err = service.fund_contract(MALLORY, ether(5)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CallerNotRegisteredAirline);

        let err = service.fund_airline(MALLORY, A1, ether(10)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        assert_eq!(service.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_claim_without_credit_rejected() {
        let (service, key) = deploy_with_flight().await;
        service.buy(passenger(1), key, ether(1)).await.unwrap();

        // Policy bought but never credited, and a passenger with no policy.
        for p in [passenger(1), passenger(2)] {
            let err = service.pay(p, key).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NothingToWithdraw);
        }
        assert_eq!(service.total_held().await, ether(11));
    }

    // =============================================================================
    // UNDERWRITING
    // =============================================================================

    #[tokio::test]
    async fn test_oversold_flight_cannot_block_credit() {
        let (service, key) = deploy_with_flight().await;

        // 10 ether of equity underwrites twenty 0.5 ether bonuses.
        for n in 1..=20 {
            service.buy(passenger(n), key, ether(1)).await.unwrap();
        }
        let before = service.snapshot().await;
        let err = service.buy(passenger(21), key, ether(1)).await.unwrap_err();
        assert!(matches!(
            err,
            SuretyError::InsufficientCapacity { airline, available, .. }
                if airline == A1 && available.is_zero()
        ));
        assert_eq!(service.snapshot().await, before);

        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();
        let summary = service.credit_insurees(ORACLE, key).await.unwrap();
        assert_eq!(summary.credited.len(), 20);
        assert!(service.account_balance(Account::InsurancePool).await.is_zero());
        assert_invariants(&service).await;

        let payout = service.pay(passenger(20), key).await.unwrap();
        assert_eq!(payout.amount, ether(3) / U256::from(2));
    }

    #[tokio::test]
    async fn test_reset_cannot_strand_open_premiums() {
        let (service, key) = deploy_with_flight().await;
        service.buy(passenger(1), key, ether(1)).await.unwrap();

        let err = service
            .init_airline(OWNER, A1, "Bootstrap Air Reborn".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OpenPolicies);
        assert_eq!(
            service.airline(A1).await.unwrap().status,
            AirlineStatus::Funded
        );

        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();
        let summary = service.credit_insurees(ORACLE, key).await.unwrap();
        assert_eq!(summary.credited, vec![passenger(1)]);
        assert_invariants(&service).await;
    }

    // =============================================================================
    // PREMIUM CAP
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn premium_outside_bounds_never_escrowed(excess in 1u64..u64::MAX) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                let (service, key) = deploy_with_flight().await;
                let before = service.snapshot().await;

                let over = ether(1) + U256::from(excess);
                let err = service.buy(passenger(1), key, over).await.unwrap_err();
                prop_assert_eq!(err.kind(), ErrorKind::PremiumExceedsCap);

                let err = service.buy(passenger(1), key, U256::zero()).await.unwrap_err();
                prop_assert_eq!(err.kind(), ErrorKind::InvalidPremium);

                prop_assert_eq!(service.snapshot().await, before);
                Ok::<(), TestCaseError>(())
            })?;
        }
    }
}
