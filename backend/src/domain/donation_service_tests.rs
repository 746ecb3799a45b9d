//! Behaviour coverage for [`crate::domain::DonationService`].

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;

use super::money::Amount;
use super::ports::{
    DonationStoreError, FixturePaymentGateway, MemoryDonationLedger, MockDonationRepository,
    MockPaymentGateway, PaymentGatewayError, VerifiedCharge,
};
use super::{
    DonationReference, DonationService, DonationSource, EmailAddress, ErrorCode,
    FundraisingGoal, VerificationOutcome,
};

fn amount(kobo: i64) -> Amount {
    Amount::from_kobo(kobo).expect("non-negative")
}

fn reference(raw: &str) -> DonationReference {
    DonationReference::new(raw).expect("valid reference")
}

fn goal(kobo: i64) -> FundraisingGoal {
    FundraisingGoal::new(amount(kobo)).expect("positive goal")
}

fn charge(raw_reference: &str, kobo: i64, succeeded: bool) -> VerifiedCharge {
    VerifiedCharge {
        reference: reference(raw_reference),
        amount: amount(kobo),
        email: EmailAddress::new("grace@example.com").expect("valid email"),
        succeeded,
    }
}

fn service_with_gateway(gateway: FixturePaymentGateway) -> DonationService {
    DonationService::new(
        Arc::new(MemoryDonationLedger::new()),
        Arc::new(gateway),
        goal(100_000),
        Arc::new(DefaultClock),
    )
}

#[tokio::test]
async fn confirmed_matching_charge_is_recorded() {
    let gateway = FixturePaymentGateway::new().with_charge(charge("ref-1", 5000, true));
    let service = service_with_gateway(gateway);

    let outcome = service
        .verify_and_record(reference("ref-1"), amount(5000))
        .await
        .expect("verification reaches the gateway");

    let VerificationOutcome::Recorded(donation) = outcome else {
        panic!("expected the donation to be recorded, got {outcome:?}");
    };
    assert_eq!(donation.amount().kobo(), 5000);
    assert_eq!(donation.source(), DonationSource::Checkout);
    assert_eq!(donation.email().as_str(), "grace@example.com");

    let progress = service.progress().await.expect("progress is readable");
    assert_eq!(progress.raised().kobo(), 5000);
    assert_eq!(progress.percent(), 5);
}

#[rstest]
#[case::amount_mismatch(charge("ref-1", 9999, true))]
#[case::gateway_declined(charge("ref-1", 5000, false))]
#[tokio::test]
async fn unconfirmed_charges_are_rejected_not_recorded(#[case] seeded: VerifiedCharge) {
    let gateway = FixturePaymentGateway::new().with_charge(seeded);
    let service = service_with_gateway(gateway);

    let outcome = service
        .verify_and_record(reference("ref-1"), amount(5000))
        .await
        .expect("verification reaches the gateway");

    assert_eq!(
        outcome,
        VerificationOutcome::Rejected {
            message: "Verification failed".to_owned()
        }
    );
    let progress = service.progress().await.expect("progress is readable");
    assert!(progress.raised().is_zero(), "nothing may be recorded");
}

#[tokio::test]
async fn unknown_references_are_a_business_rejection() {
    let service = service_with_gateway(FixturePaymentGateway::new());
    let outcome = service
        .verify_and_record(reference("missing"), amount(5000))
        .await
        .expect("an unknown reference is not a transport failure");
    assert!(matches!(outcome, VerificationOutcome::Rejected { .. }));
}

#[rstest]
#[case::timeout(PaymentGatewayError::timeout("deadline exceeded"))]
#[case::rate_limited(PaymentGatewayError::rate_limited("429"))]
#[case::transport(PaymentGatewayError::transport("connection refused"))]
#[case::decode(PaymentGatewayError::decode("unexpected body"))]
#[tokio::test]
async fn gateway_outages_surface_as_upstream_errors(#[case] failure: PaymentGatewayError) {
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_verify()
        .returning(move |_| Err(failure.clone()));
    let service = DonationService::new(
        Arc::new(MemoryDonationLedger::new()),
        Arc::new(gateway),
        goal(100_000),
        Arc::new(DefaultClock),
    );

    let err = service
        .verify_and_record(reference("ref-1"), amount(5000))
        .await
        .expect_err("outages must not look like rejections");
    assert_eq!(err.code(), ErrorCode::UpstreamUnavailable);
}

#[tokio::test]
async fn ledger_failures_during_record_surface_as_errors() {
    let mut ledger = MockDonationRepository::new();
    ledger
        .expect_record()
        .returning(|_| Err(DonationStoreError::connection("pool exhausted")));
    let gateway = FixturePaymentGateway::new().with_charge(charge("ref-1", 5000, true));
    let service = DonationService::new(
        Arc::new(ledger),
        Arc::new(gateway),
        goal(100_000),
        Arc::new(DefaultClock),
    );

    let err = service
        .verify_and_record(reference("ref-1"), amount(5000))
        .await
        .expect_err("store outage surfaces");
    assert_eq!(err.code(), ErrorCode::UpstreamUnavailable);
}

#[tokio::test]
async fn webhook_charges_are_recorded_with_webhook_source() {
    let service = service_with_gateway(FixturePaymentGateway::new());
    let donation = service
        .record_webhook_charge(super::webhook::ChargeNotification {
            reference: reference("hook-1"),
            amount: amount(2500),
            email: EmailAddress::new("mary@example.com").expect("valid email"),
        })
        .await
        .expect("webhook charge records");

    assert_eq!(donation.source(), DonationSource::Webhook);
    let recent = service
        .recent_donations(5)
        .await
        .expect("feed is readable");
    assert_eq!(recent.len(), 1);
    assert_eq!(
        recent.first().map(|d| d.reference().as_str()),
        Some("hook-1")
    );
}
