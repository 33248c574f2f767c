//! # Replay Attacks
//!
//! Repeating a call that already took effect must never count twice.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use flight_surety::prelude::*;

    #[tokio::test]
    async fn test_double_vote_rejected() {
        let service = deploy();
        for n in 2..=4u8 {
            let airline = Address::repeat(n);
            service
                .init_airline(OWNER, airline, format!("Air {n}"))
                .await
                .unwrap();
            service.vote(A1, airline).await.unwrap();
        }
        let candidate = Address::repeat(5);
        service
            .init_airline(OWNER, candidate, "Fifth Air".to_string())
            .await
            .unwrap();
        service.vote(A1, candidate).await.unwrap();

        let before = service.snapshot().await;
        assert_eq!(
            service.vote(A1, candidate).await,
            Err(SuretyError::DuplicateVote {
                voter: A1,
                candidate
            })
        );
        assert_eq!(service.snapshot().await, before);
        assert_eq!(service.airline(candidate).await.unwrap().votes, 1);
    }

    #[tokio::test]
    async fn test_double_withdrawal_rejected() {
        let (service, key) = deploy_with_flight().await;
        let p = passenger(1);
        service.buy(p, key, ether(1)).await.unwrap();
        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();
        service.credit_insurees(ORACLE, key).await.unwrap();
        service.pay(p, key).await.unwrap();

        let before = service.snapshot().await;
        for _ in 0..3 {
            let err = service.pay(p, key).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NothingToWithdraw);
        }
        assert_eq!(service.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_concurrent_withdrawals_pay_once() {
        let (service, key) = deploy_with_flight().await;
        let p = passenger(1);
        service.buy(p, key, ether(1)).await.unwrap();
        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();
        service.credit_insurees(ORACLE, key).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.pay(p, key).await }));
        }
        let mut paid = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                paid += 1;
            }
        }
        assert_eq!(paid, 1);
        assert_eq!(
            service.read(|s| s.paid_out(&p)).await,
            ether(3) / U256::from(2)
        );
        assert_invariants(&service).await;
    }

    #[tokio::test]
    async fn test_repeated_credit_moves_no_funds() {
        let (service, key) = deploy_with_flight().await;
        service.buy(passenger(1), key, ether(1)).await.unwrap();
        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();
        service.credit_insurees(ORACLE, key).await.unwrap();

        let before = service.snapshot().await;
        let summary = service.credit_insurees(ORACLE, key).await.unwrap();
        assert!(summary.credited.is_empty());
        assert_eq!(service.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_oracle_cannot_flip_outcome() {
        let (service, key) = deploy_with_flight().await;
        service
            .set_flight_status(ORACLE, key, FlightOutcome::OnTime)
            .await
            .unwrap();

        assert_eq!(
            service
                .set_flight_status(ORACLE, key, FlightOutcome::Late)
                .await,
            Ok(StatusUpdate::AlreadyResolved(FlightStatus::OnTime))
        );
        assert_eq!(
            service.flight(key).await.unwrap().status,
            FlightStatus::OnTime
        );
    }

    #[tokio::test]
    async fn test_reregistering_resolved_flight_rejected() {
        let (service, key) = deploy_with_flight().await;
        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();

        let before = service.snapshot().await;
        let err = service
            .register_flight(A1, FLIGHT.to_string(), DEPARTURE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FlightAlreadyResolved);
        assert_eq!(service.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_second_policy_on_same_flight_rejected() {
        let (service, key) = deploy_with_flight().await;
        service.buy(passenger(1), key, ether(1) / 2).await.unwrap();

        let err = service
            .buy(passenger(1), key, ether(1) / 2)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicatePolicy);
        assert_eq!(
            service.account_balance(Account::InsurancePool).await,
            ether(1) / 2
        );
    }
}
