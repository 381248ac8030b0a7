//! End-to-end airline workflow against a deployed core:
//! operational gate → funding → direct admission → consensus admission.
//!
//! Runs against `Deployment`, the same surface external modules use.

use flightsurety_governance::{Deployment, GovernanceError, RegistrationOutcome};
use flightsurety_registry::RegistryError;
use flightsurety_types::{Address, AirlineStatus, GovernanceParams, Wei};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const OWNER: u64 = 1;
const APP: u64 = 2;
const FIRST_AIRLINE: u64 = 100;

fn account(n: u64) -> Address {
    Address::from_low_u64(n)
}

/// Account used as the i-th airline, counting the first airline as 0.
fn airline(i: u64) -> Address {
    account(FIRST_AIRLINE + i)
}

fn ante() -> Wei {
    Wei::from_ether(10)
}

fn deploy() -> Deployment {
    Deployment::deploy(
        account(OWNER),
        account(APP),
        airline(0),
        GovernanceParams::new(ante(), 4),
    )
    .expect("deploy")
}

/// Deployment with airlines 0..4 registered and all of them funded.
fn four_funded() -> Deployment {
    let deployment = deploy();
    deployment.fund(&airline(0), ante()).unwrap();
    for i in 1..4 {
        deployment.register_airline(&airline(0), airline(i)).unwrap();
        deployment.fund(&airline(i), ante()).unwrap();
    }
    deployment
}

// ---------------------------------------------------------------------------
// 1. Operations and settings
// ---------------------------------------------------------------------------

#[test]
fn initial_operating_status_is_true() {
    assert!(deploy().is_operational());
}

#[test]
fn non_owner_cannot_set_operating_status() {
    let deployment = deploy();
    let err = deployment
        .set_operating_status(&account(3), false)
        .unwrap_err();
    assert_eq!(
        err,
        GovernanceError::Registry(RegistryError::Unauthorized(account(3)))
    );
    assert!(deployment.is_operational());

    // Not even the governance engine or an airline.
    assert!(deployment.set_operating_status(&account(APP), false).is_err());
    assert!(deployment.set_operating_status(&airline(0), false).is_err());
}

#[test]
fn owner_can_set_operating_status() {
    let deployment = deploy();
    deployment
        .set_operating_status(&account(OWNER), false)
        .unwrap();
    assert!(!deployment.is_operational());
    deployment
        .set_operating_status(&account(OWNER), true)
        .unwrap();
    assert!(deployment.is_operational());
}

#[test]
fn paused_system_blocks_every_mutator_until_restored() {
    let deployment = four_funded();
    deployment
        .set_operating_status(&account(OWNER), false)
        .unwrap();

    assert_eq!(
        deployment.register_airline(&airline(0), airline(4)),
        Err(GovernanceError::SystemPaused)
    );
    assert_eq!(
        deployment.fund(&airline(1), ante()),
        Err(GovernanceError::SystemPaused)
    );
    assert_eq!(
        deployment.authorize_caller(&account(OWNER), account(9)),
        Err(GovernanceError::Registry(RegistryError::SystemPaused))
    );
    assert_eq!(
        deployment.deauthorize_caller(&account(OWNER), &account(APP)),
        Err(GovernanceError::Registry(RegistryError::SystemPaused))
    );
    assert!(!deployment.is_caller_authorized(&account(9)));
    assert!(deployment.is_caller_authorized(&account(APP)));
    assert_eq!(deployment.vote_count(&airline(4)), 0);
    assert_eq!(deployment.airlines_length(), 4);

    deployment
        .set_operating_status(&account(OWNER), true)
        .unwrap();
    assert_eq!(
        deployment.register_airline(&airline(0), airline(4)),
        Ok(RegistrationOutcome::VoteRecorded {
            votes: 1,
            threshold: 2
        })
    );
    assert!(deployment.fund(&airline(1), ante()).unwrap());
}

#[test]
fn unauthorized_caller_cannot_reach_registry_mutators() {
    let deployment = deploy();
    deployment.fund(&airline(0), ante()).unwrap();
    deployment
        .deauthorize_caller(&account(OWNER), &account(APP))
        .unwrap();
    let err = deployment
        .register_airline(&airline(0), airline(1))
        .unwrap_err();
    assert_eq!(
        err,
        GovernanceError::Registry(RegistryError::NotAuthorized(account(APP)))
    );
    assert!(!deployment.is_airline(&airline(1)));

    deployment
        .authorize_caller(&account(OWNER), account(APP))
        .unwrap();
    deployment.register_airline(&airline(0), airline(1)).unwrap();
    assert!(deployment.is_airline(&airline(1)));
}

// ---------------------------------------------------------------------------
// 2. Airlines
// ---------------------------------------------------------------------------

#[test]
fn unfunded_airline_cannot_register_another() {
    let deployment = deploy();
    let err = deployment
        .register_airline(&airline(0), airline(1))
        .unwrap_err();
    assert_eq!(err, GovernanceError::NotActiveVoter(airline(0)));
    assert!(!deployment.is_airline(&airline(1)));
}

#[test]
fn first_airline_registered_at_deployment() {
    let deployment = deploy();
    assert_eq!(deployment.airlines_length(), 1);
    assert!(deployment.is_airline(&airline(0)));
    assert!(!deployment.is_airline_active(&airline(0)));
}

#[test]
fn funding_below_ante_fails() {
    let deployment = deploy();
    let err = deployment
        .fund(&airline(0), Wei::from_ether(1))
        .unwrap_err();
    assert_eq!(
        err,
        GovernanceError::InsufficientFunds {
            sent: Wei::from_ether(1),
            required: ante()
        }
    );
    assert!(!deployment.is_airline_active(&airline(0)));
}

#[test]
fn funding_the_ante_activates() {
    let deployment = deploy();
    assert!(deployment.fund(&airline(0), ante()).unwrap());
    assert!(deployment.is_airline_active(&airline(0)));
    assert_eq!(deployment.status(&airline(0)), AirlineStatus::Active);
}

#[test]
fn initial_auto_register() {
    let deployment = deploy();
    deployment.fund(&airline(0), ante()).unwrap();
    for i in 1..4 {
        assert_eq!(
            deployment.register_airline(&airline(0), airline(i)),
            Ok(RegistrationOutcome::Registered)
        );
        assert!(deployment.is_airline(&airline(i)));
        assert!(!deployment.is_airline_active(&airline(i)));
    }
    assert_eq!(deployment.airlines_length(), 4);
}

#[test]
fn fifth_airline_needs_votes() {
    let deployment = four_funded();
    let outcome = deployment
        .register_airline(&airline(0), airline(4))
        .unwrap();
    assert_eq!(
        outcome,
        RegistrationOutcome::VoteRecorded {
            votes: 1,
            threshold: 2
        }
    );
    assert!(!deployment.is_airline(&airline(4)));
    assert!(!deployment.is_airline_active(&airline(4)));
    assert_eq!(deployment.airlines_length(), 4);
}

#[test]
fn duplicate_vote_fails() {
    let deployment = four_funded();
    deployment.register_airline(&airline(0), airline(4)).unwrap();
    let err = deployment
        .register_airline(&airline(0), airline(4))
        .unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(deployment.vote_count(&airline(4)), 1);
}

#[test]
fn fifty_percent_consensus_registers() {
    // Voters are funded only once auto-admission is over.
    let deployment = deploy();
    deployment.fund(&airline(0), ante()).unwrap();
    for i in 1..4 {
        deployment.register_airline(&airline(0), airline(i)).unwrap();
    }
    let candidate = airline(4);
    let consensus = GovernanceParams::consensus_threshold(deployment.airlines_length());
    assert_eq!(consensus, 2);

    for i in 1..=consensus as u64 {
        let voter = airline(i);
        assert_eq!(
            deployment.register_airline(&voter, candidate),
            Err(GovernanceError::NotActiveVoter(voter))
        );
        deployment.fund(&voter, ante()).unwrap();
        deployment.register_airline(&voter, candidate).unwrap();
    }

    assert!(deployment.is_airline(&candidate));
    assert!(!deployment.is_airline_active(&candidate));
    assert_eq!(deployment.airlines_length(), 5);
    assert!(deployment.pending_candidates().is_empty());
}

#[test]
fn unfunded_member_vote_is_not_counted() {
    let deployment = four_funded();
    // Airline 4 joins by consensus and stays unfunded.
    deployment.register_airline(&airline(0), airline(4)).unwrap();
    deployment.register_airline(&airline(1), airline(4)).unwrap();
    assert_eq!(deployment.status(&airline(4)), AirlineStatus::Registered);

    assert_eq!(
        deployment.register_airline(&airline(4), airline(5)),
        Err(GovernanceError::NotActiveVoter(airline(4)))
    );
    assert_eq!(deployment.vote_count(&airline(5)), 0);
    assert!(!deployment.has_voted(&airline(5), &airline(4)));
    assert!(deployment.pending_candidates().is_empty());
}

#[test]
fn threshold_uses_registry_size_at_deciding_vote() {
    let deployment = four_funded();
    // Two candidates each get one vote while n = 4.
    deployment.register_airline(&airline(0), airline(4)).unwrap();
    deployment.register_airline(&airline(0), airline(5)).unwrap();
    // Candidate 4 admitted: n becomes 5, threshold for candidate 5 becomes 3.
    deployment.register_airline(&airline(1), airline(4)).unwrap();
    assert_eq!(deployment.airlines_length(), 5);

    assert_eq!(
        deployment.register_airline(&airline(1), airline(5)),
        Ok(RegistrationOutcome::VoteRecorded {
            votes: 2,
            threshold: 3
        })
    );
    assert!(!deployment.is_airline(&airline(5)));
    assert_eq!(
        deployment.register_airline(&airline(2), airline(5)),
        Ok(RegistrationOutcome::Registered)
    );
    assert_eq!(deployment.airlines_length(), 6);
}

#[test]
fn non_member_cannot_fund() {
    let deployment = deploy();
    assert_eq!(
        deployment.fund(&airline(7), ante()),
        Err(GovernanceError::NotRegistered(airline(7)))
    );
    assert!(deployment.airline(&airline(7)).is_none());
}
