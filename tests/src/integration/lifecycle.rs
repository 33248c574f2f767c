//! # Insurance Lifecycle Flows
//!
//! Purchase, oracle resolution, credit and withdrawal driven through the
//! `FlightSuretyApi` and `OracleApi` ports.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use flight_surety::prelude::*;

    fn one_and_a_half() -> Amount {
        ether(3) / U256::from(2)
    }

    /// Passenger side of the flow, written against the ports only.
    async fn insure_and_claim(
        api: &dyn FlightSuretyApi,
        oracle: &dyn OracleApi,
        passenger: Address,
        key: FlightKey,
        premium: Amount,
    ) -> Result<Payout, SuretyError> {
        api.buy(passenger, key, premium).await?;
        oracle.set_flight_status(ORACLE, key, FlightOutcome::Late).await?;
        oracle.credit_insurees(ORACLE, key).await?;
        api.pay(passenger, key).await
    }

    // =============================================================================
    // DELAY PAYOUT
    // =============================================================================

    #[tokio::test]
    async fn test_late_flight_pays_one_and_a_half_once() {
        let (service, key) = deploy_with_flight().await;
        let p = passenger(1);

        let payout = insure_and_claim(service.as_ref(), service.as_ref(), p, key, ether(1))
            .await
            .unwrap();
        assert_eq!(payout.amount, one_and_a_half());
        assert_eq!(service.read(|s| s.paid_out(&p)).await, one_and_a_half());

        // Replay of the withdrawal
        assert_eq!(
            service.pay(p, key).await,
            Err(SuretyError::NothingToWithdraw {
                passenger: p,
                flight: key
            })
        );

        // Airline equity covered the half-ether bonus.
        assert_eq!(
            service.account_balance(Account::Airline(A1)).await,
            ether(10) - ether(1) / 2
        );
        assert_eq!(service.total_held().await, ether(10) - ether(1) / 2);
        assert_invariants(&service).await;
    }

    #[tokio::test]
    async fn test_credit_batch_follows_purchase_order() {
        let (service, key) = deploy_with_flight().await;
        let buyers = [passenger(3), passenger(1), passenger(2)];
        for p in buyers {
            service.buy(p, key, ether(1) / 2).await.unwrap();
        }
        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();

        let summary = service.credit_insurees(ORACLE, key).await.unwrap();
        assert_eq!(summary.credited, buyers.to_vec());
        assert_eq!(summary.total, ether(3) * 3 / 4);

        // Retry credits nothing new.
        let retry = service.credit_insurees(ORACLE, key).await.unwrap();
        assert!(retry.credited.is_empty());
        assert!(retry.total.is_zero());
        assert_invariants(&service).await;
    }

    #[tokio::test]
    async fn test_on_time_flight_keeps_premiums_in_pool() {
        let (service, key) = deploy_with_flight().await;
        service.buy(passenger(1), key, ether(1)).await.unwrap();
        assert_eq!(
            service
                .set_flight_status(ORACLE, key, FlightOutcome::OnTime)
                .await,
            Ok(StatusUpdate::Applied(FlightStatus::OnTime))
        );

        let err = service.credit_insurees(ORACLE, key).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FlightNotLate);
        assert_eq!(
            service.account_balance(Account::InsurancePool).await,
            ether(1)
        );
        let policy = service.policy(passenger(1), key).await.unwrap();
        assert_eq!(policy.status, PolicyStatus::Purchased);
        assert_invariants(&service).await;
    }

    #[tokio::test]
    async fn test_cannot_buy_after_resolution() {
        let (service, key) = deploy_with_flight().await;
        service
            .set_flight_status(ORACLE, key, FlightOutcome::Late)
            .await
            .unwrap();

        let err = service.buy(passenger(1), key, ether(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FlightAlreadyResolved);
    }

    // =============================================================================
    // EVENTS
    // =============================================================================

    #[tokio::test]
    async fn test_lifecycle_event_stream() {
        let (service, key) = deploy_with_flight().await;
        service.sink().take();

        insure_and_claim(service.as_ref(), service.as_ref(), passenger(1), key, ether(1))
            .await
            .unwrap();

        let names: Vec<&str> = service
            .sink()
            .events()
            .iter()
            .map(|e| e.event.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "InsurancePurchased",
                "FlightStatusUpdated",
                "InsureeCredited",
                "InsuranceWithdrawn",
            ]
        );

        let envelope = &service.sink().events()[3];
        let json = serde_json::to_value(envelope).unwrap();
        assert_eq!(json["event"]["type"], "InsuranceWithdrawn");
        assert_eq!(envelope.topic(), "flight_surety.InsuranceWithdrawn");
    }

    #[tokio::test]
    async fn test_snapshot_reflects_final_state() {
        let (service, key) = deploy_with_flight().await;
        insure_and_claim(service.as_ref(), service.as_ref(), passenger(1), key, ether(1))
            .await
            .unwrap();

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.owner, OWNER);
        assert!(snapshot.operational);
        assert_eq!(snapshot.authorized_callers, vec![ORACLE]);
        assert_eq!(snapshot.flights.len(), 1);
        assert_eq!(snapshot.flights[0].status, FlightStatus::Late);
        assert_eq!(snapshot.policies[0].status, PolicyStatus::Withdrawn);
        assert_eq!(snapshot.total_held, ether(10) - ether(1) / 2);
        assert_eq!(
            snapshot.accounts,
            vec![AccountBalance {
                account: Account::Airline(A1),
                balance: ether(10) - ether(1) / 2,
            }]
        );
    }
}
