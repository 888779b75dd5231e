//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod clock;
pub mod doubles;
pub mod memory_store;

pub use clock::MutableClock;
pub use doubles::{PlaintextHasher, RecordingNotifier, SentNotification};
pub use memory_store::{InMemoryStore, StoreFailure};

pub mod fixtures {
    //! Builders for seeded landlords, listings and bookings.

    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::PlaintextHasher;
    use crate::domain::{
        Apartment, ApartmentNumber, Booking, EmailAddress, Landlord, MonthlyPrices,
    };

    /// Parse a fixture email, panicking on typos in test data.
    pub fn email(raw: &str) -> EmailAddress {
        match EmailAddress::parse(raw) {
            Ok(email) => email,
            Err(error) => panic!("fixture email {raw:?} is invalid: {error}"),
        }
    }

    /// Registered landlord whose password verifies with [`PlaintextHasher`].
    pub fn landlord(raw_email: &str, password: &str) -> Landlord {
        Landlord::register(email(raw_email), PlaintextHasher::encode(password))
    }

    pub fn apartment(number: i32, owner: &str) -> Apartment {
        Apartment {
            number: ApartmentNumber::new(number),
            landlord_email: email(owner),
            bedrooms: 2,
            bathrooms: 1,
            photos_folder: Some(format!("photos/{number}")),
            prices: MonthlyPrices::new([900; 12]),
            additional_information: None,
            for_sale_price: None,
        }
    }

    /// Booking of `nights` consecutive evenings from 1 July 2026.
    pub fn booking(number: i32, nights: u32) -> Booking {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap_or_default();
        Booking {
            id: Uuid::new_v4(),
            apartment_number: ApartmentNumber::new(number),
            evenings_booked: start.iter_days().take(nights as usize).collect(),
        }
    }
}
