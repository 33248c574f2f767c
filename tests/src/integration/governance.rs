//! # Airline Governance Flows
//!
//! Nomination, quorum voting and funding across a growing airline set.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use flight_surety::prelude::*;

    async fn admit(service: &TestService, candidate: Address, voters: &[Address]) {
        service
            .init_airline(OWNER, candidate, format!("Air {candidate}"))
            .await
            .unwrap();
        for voter in voters {
            let outcome = service.vote(*voter, candidate).await.unwrap();
            if outcome.registered {
                return;
            }
        }
        panic!("{candidate} not admitted by {voters:?}");
    }

    // =============================================================================
    // BOOTSTRAP PHASE
    // =============================================================================

    #[tokio::test]
    async fn test_bootstrap_scenario() {
        let service = deploy();
        let a1 = service.airline(A1).await.unwrap();
        assert_eq!(a1.status, AirlineStatus::Registered);
        assert_eq!(a1.votes, 0);

        // A2 admitted by A1 alone.
        service
            .init_airline(A1, A2, "Second Air".to_string())
            .await
            .unwrap();
        let outcome = service.vote(A1, A2).await.unwrap();
        assert_eq!(
            outcome,
            VoteOutcome {
                votes: 1,
                threshold: 1,
                registered: true
            }
        );
        assert_eq!(
            service.fund_airline(A2, A2, ether(10)).await,
            Ok(AirlineStatus::Funded)
        );

        // A3 needs exactly one vote.
        service
            .init_airline(A2, A3, "Third Air".to_string())
            .await
            .unwrap();
        let a3 = service.airline(A3).await.unwrap();
        assert_eq!(a3.status, AirlineStatus::Init);
        assert_eq!(a3.votes, 0);

        let outcome = service.vote(A2, A3).await.unwrap();
        assert!(outcome.registered);
        assert_eq!(
            service.airline(A3).await.unwrap().status,
            AirlineStatus::Registered
        );
        assert_invariants(&service).await;
    }

    // =============================================================================
    // MAJORITY PHASE
    // =============================================================================

    #[tokio::test]
    async fn test_quorum_grows_with_registered_set() {
        let service = deploy();
        let airlines: Vec<Address> = (1..=7u8).map(Address::repeat).collect();

        admit(&service, airlines[1], &airlines[..1]).await;
        admit(&service, airlines[2], &airlines[..2]).await;
        admit(&service, airlines[3], &airlines[..3]).await;
        assert_eq!(service.read(SuretyState::quorum_threshold).await, 2);

        // Fifth airline: 4 registered, needs 2.
        service
            .init_airline(OWNER, airlines[4], "Fifth Air".to_string())
            .await
            .unwrap();
        let first = service.vote(airlines[0], airlines[4]).await.unwrap();
        assert!(!first.registered);
        assert_eq!(first.threshold, 2);
        let second = service.vote(airlines[1], airlines[4]).await.unwrap();
        assert!(second.registered);

        // Sixth airline: 5 registered, needs 3.
        service
            .init_airline(OWNER, airlines[5], "Sixth Air".to_string())
            .await
            .unwrap();
        for (i, voter) in airlines[..3].iter().enumerate() {
            let outcome = service.vote(*voter, airlines[5]).await.unwrap();
            assert_eq!(outcome.threshold, 3);
            assert_eq!(outcome.registered, i == 2);
        }

        assert_eq!(service.read(SuretyState::registered_airline_count).await, 6);
        assert_invariants(&service).await;
    }

    #[tokio::test]
    async fn test_vote_on_admitted_airline_is_rejected() {
        let service = deploy();
        admit(&service, A2, &[A1]).await;

        let err = service.vote(A2, A2).await.unwrap_err();
        assert!(matches!(
            err,
            SuretyError::InvalidAirlineState {
                actual: Some(AirlineStatus::Registered),
                ..
            }
        ));
    }

    // =============================================================================
    // FUNDING & RESET
    // =============================================================================

    #[tokio::test]
    async fn test_funding_accumulates_to_threshold() {
        let service = deploy();
        assert_eq!(
            service.fund_airline(A1, A1, ether(4)).await,
            Ok(AirlineStatus::Registered)
        );
        assert_eq!(
            service.fund_contract(A1, ether(6)).await,
            Ok(DepositRoute::Airline(AirlineStatus::Funded))
        );
        assert_eq!(service.airline(A1).await.unwrap().balance, ether(10));

        // Further funding keeps it Funded.
        assert_eq!(
            service.fund_airline(OWNER, A1, ether(1)).await,
            Ok(AirlineStatus::Funded)
        );
        assert_eq!(
            service.account_balance(Account::Airline(A1)).await,
            ether(11)
        );
    }

    #[tokio::test]
    async fn test_owner_reset_moves_equity_to_owner() {
        let service = deploy();
        admit(&service, A2, &[A1]).await;
        service.fund_airline(A2, A2, ether(10)).await.unwrap();

        service
            .init_airline(OWNER, A2, "Second Air (restructured)".to_string())
            .await
            .unwrap();

        let a2 = service.airline(A2).await.unwrap();
        assert_eq!(a2.status, AirlineStatus::Init);
        assert!(a2.balance.is_zero());
        assert_eq!(a2.votes, 0);
        assert_eq!(service.account_balance(Account::Owner).await, ether(10));
        assert_eq!(service.total_held().await, ether(10));

        // The reset airline goes through voting again.
        assert!(service.vote(A1, A2).await.unwrap().registered);
        assert_invariants(&service).await;
    }

    #[tokio::test]
    async fn test_pause_and_resume() {
        let service = deploy();
        assert_eq!(service.set_operating_status(OWNER, false).await, Ok(true));
        assert_eq!(service.set_operating_status(OWNER, false).await, Ok(false));

        let err = service
            .init_airline(A1, A2, "Second Air".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, SuretyError::NotOperational);

        assert_eq!(service.set_operating_status(OWNER, true).await, Ok(true));
        assert!(service
            .init_airline(A1, A2, "Second Air".to_string())
            .await
            .is_ok());

        let stats = service.stats().await;
        assert_eq!(
            stats.rejections_by_kind.get(&ErrorKind::NotOperational),
            Some(&1)
        );
    }
}
