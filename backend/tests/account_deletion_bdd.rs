//! Behaviour tests for cascading account deletion.
//!
//! These scenarios run the deletion service over the in-memory store and
//! check what remains after a full and an interrupted cascade.

use std::cell::RefCell;
use std::sync::Arc;

use landlord_backend::domain::ports::{AccountDeletion, DeletionError, ResumeSummary};
use landlord_backend::domain::{AccountDeletionService, SessionState};
use landlord_backend::test_support::fixtures::{apartment, booking, landlord};
use landlord_backend::test_support::{InMemoryStore, MutableClock, StoreFailure};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

type Service = AccountDeletionService<InMemoryStore, InMemoryStore, InMemoryStore>;

struct DeletionWorld {
    runtime: Runtime,
    store: Arc<InMemoryStore>,
    service: Service,
    next_apartment: RefCell<i32>,
    outcome: RefCell<Option<Result<SessionState, DeletionError>>>,
    resumed: RefCell<Option<ResumeSummary>>,
}

impl DeletionWorld {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = AccountDeletionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(MutableClock::fixed()),
        );
        Self {
            runtime: Runtime::new().expect("create runtime"),
            store,
            service,
            next_apartment: RefCell::new(100),
            outcome: RefCell::new(None),
            resumed: RefCell::new(None),
        }
    }

    fn seed_landlord(&self, email: &str, apartments: usize) {
        self.store.insert_landlord(landlord(email, "pw"));
        for _ in 0..apartments {
            let number = {
                let mut next = self.next_apartment.borrow_mut();
                *next += 1;
                *next
            };
            self.store.insert_apartment(apartment(number, email));
            self.store.insert_booking(booking(number, 2));
        }
    }

    fn owned_numbers(&self, email: &str) -> Vec<i32> {
        let mut numbers: Vec<i32> = self
            .store
            .apartments()
            .iter()
            .filter(|apartment| apartment.landlord_email.as_ref() == email)
            .map(|apartment| apartment.number.value())
            .collect();
        numbers.sort_unstable();
        numbers
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&Result<SessionState, DeletionError>),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("deletion was attempted"));
    }
}

#[fixture]
fn world() -> DeletionWorld {
    DeletionWorld::new()
}

#[given("a landlord {email} owning {count} booked apartments")]
fn a_landlord_owning_booked_apartments(world: &DeletionWorld, email: String, count: usize) {
    world.seed_landlord(&email, count);
}

#[given("another landlord {email} owning {count} booked apartment")]
fn another_landlord_owning_booked_apartment(world: &DeletionWorld, email: String, count: usize) {
    world.seed_landlord(&email, count);
}

#[given("the store fails while deleting apartments")]
fn the_store_fails_while_deleting_apartments(world: &DeletionWorld) {
    world.store.fail_on(StoreFailure::DeleteApartments);
}

#[when("{email} deletes their account")]
fn landlord_deletes_their_account(world: &DeletionWorld, email: String) {
    let landlord = world
        .store
        .landlord_by_email(&email)
        .expect("seeded landlord");
    let session = SessionState::anonymous().login(landlord.identity());
    let outcome = world
        .runtime
        .block_on(world.service.delete_account(session));
    *world.outcome.borrow_mut() = Some(outcome);
}

#[when("the store recovers and pending deletions are resumed")]
fn the_store_recovers_and_deletions_resume(world: &DeletionWorld) {
    world.store.clear_failures();
    let summary = world
        .runtime
        .block_on(world.service.resume_pending_deletions())
        .expect("pending deletions listed");
    *world.resumed.borrow_mut() = Some(summary);
}

#[then("the session is signed out")]
fn the_session_is_signed_out(world: &DeletionWorld) {
    world.with_outcome(|outcome| {
        let session = outcome.as_ref().expect("deletion succeeds");
        assert!(!session.is_authenticated());
    });
}

#[then("the deletion stops partway")]
fn the_deletion_stops_partway(world: &DeletionWorld) {
    world.with_outcome(|outcome| {
        assert!(matches!(
            outcome,
            Err(DeletionError::PartialFailure { .. })
        ));
    });
}

#[then("no credential remains for {email}")]
fn no_credential_remains(world: &DeletionWorld, email: String) {
    assert!(world.store.landlord_by_email(&email).is_none());
}

#[then("the credential of {email} is marked for deletion")]
fn the_credential_is_marked(world: &DeletionWorld, email: String) {
    let landlord = world
        .store
        .landlord_by_email(&email)
        .expect("credential kept until the cascade finishes");
    assert!(landlord.deletion_requested_at.is_some());
}

#[then("only the apartments of {email} remain")]
fn only_the_apartments_of_remain(world: &DeletionWorld, email: String) {
    let owned = world.owned_numbers(&email);
    let mut remaining: Vec<i32> = world
        .store
        .apartments()
        .iter()
        .map(|apartment| apartment.number.value())
        .collect();
    remaining.sort_unstable();
    assert_eq!(remaining, owned);
}

#[then("only the bookings of {email} remain")]
fn only_the_bookings_of_remain(world: &DeletionWorld, email: String) {
    let owned = world.owned_numbers(&email);
    let bookings = world.store.bookings();
    assert!(!bookings.is_empty());
    assert!(
        bookings
            .iter()
            .all(|booking| owned.contains(&booking.apartment_number.value()))
    );
}

#[then("{count} pending deletion is completed")]
fn pending_deletions_completed(world: &DeletionWorld, count: usize) {
    let resumed = world.resumed.borrow();
    let summary = resumed.as_ref().expect("resume ran");
    assert_eq!(summary.completed.len(), count);
    assert!(summary.failed.is_empty());
}

#[scenario(
    path = "tests/features/account_deletion.feature",
    name = "Deleting an account removes listings and bookings"
)]
fn deleting_an_account_removes_listings(world: DeletionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_deletion.feature",
    name = "An interrupted deletion is finished on resume"
)]
fn interrupted_deletion_is_resumed(world: DeletionWorld) {
    drop(world);
}
