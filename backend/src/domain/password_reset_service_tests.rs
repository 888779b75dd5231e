//! Tests for the password reset service.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockNotificationPort, NotificationError};
use crate::domain::{ErrorCode, TokenDigest};
use crate::test_support::fixtures::{email, landlord};
use crate::test_support::{
    InMemoryStore, MutableClock, PlaintextHasher, RecordingNotifier, SentNotification,
    StoreFailure,
};

type Service = PasswordResetService<InMemoryStore, PlaintextHasher, RecordingNotifier>;

struct Harness {
    store: Arc<InMemoryStore>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<MutableClock>,
    service: Service,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    store.insert_landlord(landlord("ada@example.com", "old-password"));
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(MutableClock::fixed());
    let service = PasswordResetService::new(
        store.clone(),
        Arc::new(PlaintextHasher),
        notifier.clone(),
        clock.clone(),
    );
    Harness {
        store,
        notifier,
        clock,
        service,
    }
}

fn new_password(raw: &str) -> NewPassword {
    NewPassword::try_from_parts(raw, raw, "confirm").expect("valid password")
}

#[rstest]
#[tokio::test]
async fn request_stores_digest_with_one_hour_expiry(harness: Harness) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");

    let stored = harness
        .store
        .landlord_by_email("ada@example.com")
        .and_then(|landlord| landlord.password_reset)
        .expect("reset window stored");
    assert_eq!(stored.token_digest, token.digest());
    assert_ne!(stored.token_digest.as_str(), token.as_str());
    assert_eq!(
        stored.expires_at,
        harness.clock.utc() + TimeDelta::hours(1)
    );
}

#[rstest]
#[tokio::test]
async fn request_for_unknown_email_reports_missing_account(harness: Harness) {
    let error = harness
        .service
        .request_reset(&email("nobody@example.com"))
        .await
        .expect_err("unknown email");
    assert!(matches!(error, ResetRequestError::AccountNotFound));
}

#[rstest]
#[tokio::test]
async fn newer_request_invalidates_earlier_token(harness: Harness) {
    let first = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("first token");
    let second = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("second token");

    assert!(matches!(
        harness.service.verify_reset_token(&first).await,
        Err(ResetError::TokenInvalidOrExpired)
    ));
    assert!(harness.service.verify_reset_token(&second).await.is_ok());
}

#[rstest]
#[case(59, true)]
#[case(60, false)]
#[case(61, false)]
#[tokio::test]
async fn token_is_accepted_strictly_before_expiry(
    harness: Harness,
    #[case] minutes_later: i64,
    #[case] accepted: bool,
) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");
    harness.clock.advance_minutes(minutes_later);

    assert_eq!(
        harness.service.verify_reset_token(&token).await.is_ok(),
        accepted
    );
}

#[rstest]
#[tokio::test]
async fn redeem_sets_password_clears_window_and_logs_in(harness: Harness) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");

    let session = harness
        .service
        .redeem_reset(SessionState::anonymous(), &token, &new_password("fresh"))
        .await
        .expect("redeemed");

    let stored = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("landlord exists");
    assert_eq!(stored.password_hash, PlaintextHasher::encode("fresh"));
    assert!(stored.password_reset.is_none());
    assert_eq!(session.identity(), Some(&stored.identity()));
    assert_eq!(session.flash()[0].message, RESET_COMPLETE_MESSAGE);
    assert!(harness.notifier.sent().contains(&SentNotification::PasswordChanged {
        to: "ada@example.com".to_owned(),
    }));
}

#[rstest]
#[tokio::test]
async fn token_redeems_at_most_once(harness: Harness) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");
    harness
        .service
        .redeem_reset(SessionState::anonymous(), &token, &new_password("first"))
        .await
        .expect("first redemption");

    let error = harness
        .service
        .redeem_reset(SessionState::anonymous(), &token, &new_password("second"))
        .await
        .expect_err("second redemption");

    assert!(matches!(error, ResetError::TokenInvalidOrExpired));
    let stored = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("landlord exists");
    assert_eq!(stored.password_hash, PlaintextHasher::encode("first"));
}

#[rstest]
#[tokio::test]
async fn expired_token_leaves_password_unchanged(harness: Harness) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");
    harness.clock.advance(TimeDelta::hours(2));

    let error = harness
        .service
        .redeem_reset(SessionState::anonymous(), &token, &new_password("late"))
        .await
        .expect_err("expired");

    assert!(matches!(error, ResetError::TokenInvalidOrExpired));
    let stored = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("landlord exists");
    assert_eq!(stored.password_hash, PlaintextHasher::encode("old-password"));
}

async fn mark_ada_for_deletion(harness: &Harness) {
    let ada = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("landlord exists");
    harness
        .store
        .mark_deletion_requested(&ada.id, harness.clock.utc())
        .await
        .expect("marked");
}

#[rstest]
#[tokio::test]
async fn account_pending_deletion_cannot_redeem_issued_token(harness: Harness) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");
    mark_ada_for_deletion(&harness).await;

    assert!(matches!(
        harness.service.verify_reset_token(&token).await,
        Err(ResetError::TokenInvalidOrExpired)
    ));
    let error = harness
        .service
        .redeem_reset(SessionState::anonymous(), &token, &new_password("new-password"))
        .await
        .expect_err("pending deletion blocks redemption");

    assert!(matches!(error, ResetError::TokenInvalidOrExpired));
    let stored = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("landlord exists");
    assert_eq!(stored.password_hash, PlaintextHasher::encode("old-password"));
}

#[rstest]
#[tokio::test]
async fn account_pending_deletion_is_not_issued_a_token(harness: Harness) {
    mark_ada_for_deletion(&harness).await;

    let error = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect_err("pending deletion");

    assert!(matches!(error, ResetRequestError::AccountNotFound));
    let stored = harness
        .store
        .landlord_by_email("ada@example.com")
        .expect("landlord exists");
    assert!(stored.password_reset.is_none());
}

#[rstest]
#[tokio::test]
async fn failed_change_notice_does_not_undo_redemption(harness: Harness) {
    let token = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect("token issued");
    harness.notifier.set_failing(true);

    let session = harness
        .service
        .redeem_reset(SessionState::anonymous(), &token, &new_password("fresh"))
        .await
        .expect("redemption survives notifier failure");
    assert!(session.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn store_outage_while_issuing_is_unexpected(harness: Harness) {
    harness.store.fail_on(StoreFailure::FindLandlord);

    let error = harness
        .service
        .request_reset(&email("ada@example.com"))
        .await
        .expect_err("outage");
    let inner = match error {
        ResetRequestError::Unexpected(inner) => inner,
        other => panic!("expected unexpected error, got {other:?}"),
    };
    assert_eq!(inner.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn delivery_failure_maps_to_service_unavailable() {
    let mut notifier = MockNotificationPort::new();
    notifier
        .expect_send_reset_link()
        .times(1)
        .return_once(|_, _| Err(NotificationError::delivery("smtp down")));
    let service = PasswordResetService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(PlaintextHasher),
        Arc::new(notifier),
        Arc::new(MutableClock::fixed()),
    );
    let token = ResetToken::generate();
    let link = ResetLink::for_token("http://localhost:3000", &token);

    let error = service
        .deliver_reset_link(&email("ada@example.com"), &link)
        .await
        .expect_err("delivery fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
fn digest_is_not_the_token() {
    let token = ResetToken::generate();
    assert_ne!(token.digest(), TokenDigest::from_hex(token.as_str()));
}
