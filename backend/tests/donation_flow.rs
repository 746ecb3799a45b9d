//! End-to-end donation flow over the public and admin HTTP surface.
//!
//! Drives one donation through checkout verification and one through the
//! signed webhook, then checks that the progress bar, the public donor
//! feed, and the admin export all observe both.

use actix_web::{App, http::StatusCode, test, web};
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha512;

use backend::domain::money::Amount;
use backend::domain::ports::{FixturePaymentGateway, VerifiedCharge};
use backend::domain::{DonationReference, EmailAddress};
use backend::inbound::http::admin::{LoginRequest, export_donors, list_donors, login, logout};
use backend::inbound::http::donations::{get_donors, get_progress, verify_payment};
use backend::inbound::http::test_utils::{
    TEST_ADMIN, TEST_WEBHOOK_SECRET, TestStateConfig, test_session_middleware, test_state,
};
use backend::inbound::http::webhook::{SIGNATURE_HEADER, paystack_webhook};

const WEBHOOK_BODY: &[u8] = br#"{"event":"charge.success","data":{"reference":"hook-1","amount":2500,"customer":{"email":"mary@example.com"}}}"#;

fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(TEST_WEBHOOK_SECRET.as_bytes())
        .expect("any key length works");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

fn checkout_charge() -> VerifiedCharge {
    VerifiedCharge {
        reference: DonationReference::new("checkout-1").expect("valid reference"),
        amount: Amount::from_kobo(5000).expect("non-negative"),
        email: EmailAddress::new("grace@example.com").expect("valid email"),
        succeeded: true,
    }
}

#[actix_web::test]
async fn donations_flow_from_checkout_and_webhook_to_the_admin_export() {
    let config = TestStateConfig {
        gateway: FixturePaymentGateway::new().with_charge(checkout_charge()),
        ..TestStateConfig::default()
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(config)))
            .wrap(test_session_middleware())
            .service(get_progress)
            .service(get_donors)
            .service(verify_payment)
            .service(paystack_webhook)
            .service(login)
            .service(logout)
            .service(list_donors)
            .service(export_donors),
    )
    .await;

    // Checkout verification records the first donation.
    let verify = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/verify-payment")
            .set_json(json!({ "reference": "checkout-1", "amount": 5000 }))
            .to_request(),
    )
    .await;
    assert_eq!(verify.status(), StatusCode::OK);
    let verify_body: Value = test::read_body_json(verify).await;
    assert_eq!(verify_body["status"], "success");

    // The signed webhook records the second.
    let webhook = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/paystack-webhook")
            .insert_header((SIGNATURE_HEADER, sign(WEBHOOK_BODY)))
            .set_payload(WEBHOOK_BODY)
            .to_request(),
    )
    .await;
    assert_eq!(webhook.status(), StatusCode::OK);

    // Progress sums both contributions against the configured goal.
    let progress = test::call_service(
        &app,
        test::TestRequest::get().uri("/get-progress").to_request(),
    )
    .await;
    let progress_body: Value = test::read_body_json(progress).await;
    assert_eq!(progress_body["raised"], 7500);
    assert_eq!(progress_body["percent"], 7);

    // The public feed masks both donors, newest first.
    let donors = test::call_service(
        &app,
        test::TestRequest::get().uri("/get-donors").to_request(),
    )
    .await;
    let donors_body: Value = test::read_body_json(donors).await;
    let feed = donors_body["donors"].as_array().expect("donor feed");
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["email"], "ma***@example.com");
    assert_eq!(feed[1]["email"], "gr***@example.com");

    // The admin surface sees full records once logged in.
    let login_response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/login")
            .set_json(LoginRequest {
                username: TEST_ADMIN.0.to_owned(),
                password: TEST_ADMIN.1.to_owned(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(login_response.status(), StatusCode::OK);
    let cookie = login_response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let listing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/donors")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let listing_body: Value = test::read_body_json(listing).await;
    assert_eq!(listing_body["total"], 2);
    assert_eq!(listing_body["donors"][0]["email"], "mary@example.com");
    assert_eq!(listing_body["donors"][0]["source"], "webhook");
    assert_eq!(listing_body["donors"][1]["source"], "checkout");

    let export = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/export")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(export.status(), StatusCode::OK);
    let csv = test::read_body(export).await;
    let text = std::str::from_utf8(&csv).expect("utf8 body");
    assert!(text.contains("grace@example.com,5000,checkout-1,checkout"));
    assert!(text.contains("mary@example.com,2500,hook-1,webhook"));
}
