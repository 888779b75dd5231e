//! Tests for sign-in, sign-out and signup handlers.

use super::*;
use crate::inbound::http::state::HttpOptions;
use crate::inbound::http::test_utils::{
    TestHarness, location, session_cookie, test_session_middleware,
};
use crate::inbound::http::views::home;
use crate::test_support::{PlaintextHasher, StoreFailure};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn harness() -> TestHarness {
    let harness = TestHarness::new();
    harness.seed_landlord("ada@example.com", "secret");
    harness
}

fn test_app(
    harness: &TestHarness,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(harness.state(HttpOptions::default())))
        .wrap(test_session_middleware())
        .service(home)
        .service(login_page)
        .service(login)
        .service(logout)
        .service(signup_page)
        .service(signup)
}

fn login_request(email: &str, password: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri("/login").set_form(LoginForm {
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

fn signup_request(email: &str, password: &str, confirm: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri("/signup").set_form(SignupForm {
        email: email.to_owned(),
        password: password.to_owned(),
        confirm_password: confirm.to_owned(),
    })
}

async fn home_view(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    cookie: Cookie<'static>,
) -> Value {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::get().uri("/").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    actix_test::read_body_json(res).await
}

async fn page_view(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    uri: &str,
    cookie: Cookie<'static>,
) -> Value {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    actix_test::read_body_json(res).await
}

#[rstest]
#[actix_web::test]
async fn login_page_renders_title(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;
    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/login").to_request())
            .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["title"], "Login");
    assert_eq!(body["flash"], serde_json::json!([]));
}

#[rstest]
#[actix_web::test]
async fn valid_login_signs_in_and_flashes_success(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;

    let res = actix_test::call_service(
        &app,
        login_request("Ada@Example.com", "secret").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");

    let body = home_view(&app, session_cookie(&res)).await;
    assert_eq!(body["signedInAs"], "ada@example.com");
    assert_eq!(body["flash"][0]["kind"], "success");
    assert_eq!(body["flash"][0]["message"], "Success! You are logged in.");
}

#[rstest]
#[case("ada@example.com", "wrong")]
#[case("nobody@example.com", "secret")]
#[actix_web::test]
async fn bad_credentials_return_to_form(
    harness: TestHarness,
    #[case] email: &str,
    #[case] password: &str,
) {
    let app = actix_test::init_service(test_app(&harness)).await;

    let res = actix_test::call_service(&app, login_request(email, password).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/login");

    let body = page_view(&app, "/login", session_cookie(&res)).await;
    assert_eq!(body["flash"][0]["kind"], "errors");
    assert_eq!(body["flash"][0]["message"], INVALID_LOGIN_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn malformed_login_lists_every_field_error(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;

    let res = actix_test::call_service(&app, login_request("not-an-email", "").to_request()).await;
    assert_eq!(location(&res), "/login");

    let body = page_view(&app, "/login", session_cookie(&res)).await;
    let messages: Vec<&str> = body["flash"]
        .as_array()
        .expect("flash array")
        .iter()
        .filter_map(|flash| flash["message"].as_str())
        .collect();
    assert_eq!(messages, vec!["Email is not valid", "Password cannot be blank"]);
}

#[rstest]
#[actix_web::test]
async fn store_outage_surfaces_as_unavailable(harness: TestHarness) {
    harness.store.fail_on(StoreFailure::FindLandlord);
    let app = actix_test::init_service(test_app(&harness)).await;

    let res = actix_test::call_service(
        &app,
        login_request("ada@example.com", "secret").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[rstest]
#[case("/login")]
#[case("/signup")]
#[actix_web::test]
async fn signed_in_landlords_skip_auth_pages(harness: TestHarness, #[case] uri: &str) {
    let app = actix_test::init_service(test_app(&harness)).await;
    let login_res = actix_test::call_service(
        &app,
        login_request("ada@example.com", "secret").to_request(),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(session_cookie(&login_res))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn logout_clears_identity(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;
    let login_res = actix_test::call_service(
        &app,
        login_request("ada@example.com", "secret").to_request(),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/logout")
            .cookie(session_cookie(&login_res))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");

    let body = home_view(&app, session_cookie(&res)).await;
    assert_eq!(body["signedInAs"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn logout_without_session_is_harmless(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;
    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/logout").to_request())
            .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn signup_stores_hash_and_signs_in(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;

    let res = actix_test::call_service(
        &app,
        signup_request("Bob@Example.com", "abcd", "abcd").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");

    let stored = harness
        .store
        .landlord_by_email("bob@example.com")
        .expect("landlord created");
    assert_ne!(stored.password_hash.as_str(), "abcd");
    assert_eq!(stored.password_hash, PlaintextHasher::encode("abcd"));

    let body = home_view(&app, session_cookie(&res)).await;
    assert_eq!(body["signedInAs"], "bob@example.com");
}

#[rstest]
#[actix_web::test]
async fn short_signup_password_is_rejected(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;

    let res = actix_test::call_service(
        &app,
        signup_request("bob@example.com", "abc", "abc").to_request(),
    )
    .await;
    assert_eq!(location(&res), "/signup");
    assert!(harness.store.landlord_by_email("bob@example.com").is_none());

    let body = page_view(&app, "/signup", session_cookie(&res)).await;
    assert_eq!(body["title"], "Create Account");
    assert_eq!(
        body["flash"][0]["message"],
        "Password must be at least 4 characters long"
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_signup_keeps_original_account(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;
    let original = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("seeded");

    let res = actix_test::call_service(
        &app,
        signup_request("ADA@example.com", "other", "other").to_request(),
    )
    .await;
    assert_eq!(location(&res), "/signup");

    let body = page_view(&app, "/signup", session_cookie(&res)).await;
    assert_eq!(body["flash"][0]["message"], EMAIL_TAKEN_MESSAGE);
    assert_eq!(
        harness.store.landlord_by_email("ada@example.com"),
        Some(original)
    );
}
