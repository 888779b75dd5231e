//! Apartment listings and their bookings.
//!
//! Listings and bookings are created outside this service; here they are only
//! read for display and removed when their owner deletes the account.

use std::fmt;

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::landlord::EmailAddress;

/// Unique apartment number shared by listings and bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentNumber(i32);

impl ApartmentNumber {
    /// Wrap a raw apartment number.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ApartmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nightly price for each calendar month, in whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyPrices([i32; 12]);

impl MonthlyPrices {
    /// Build prices ordered January through December.
    #[must_use]
    pub const fn new(prices: [i32; 12]) -> Self {
        Self(prices)
    }

    /// Price charged during `month`.
    #[must_use]
    pub fn for_month(&self, month: Month) -> i32 {
        let index = month.number_from_month().saturating_sub(1) as usize;
        self.0.get(index).copied().unwrap_or_default()
    }

    /// Prices ordered January through December.
    #[must_use]
    pub const fn as_array(&self) -> &[i32; 12] {
        &self.0
    }
}

/// Apartment listing owned by a landlord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apartment {
    pub number: ApartmentNumber,
    pub landlord_email: EmailAddress,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub photos_folder: Option<String>,
    pub prices: MonthlyPrices,
    pub additional_information: Option<String>,
    /// Absent or zero means the apartment is not for sale.
    pub for_sale_price: Option<i32>,
}

impl Apartment {
    /// Whether the listing carries a positive sale price.
    ///
    /// # Examples
    /// ```
    /// use landlord_backend::domain::{Apartment, ApartmentNumber, EmailAddress, MonthlyPrices};
    ///
    /// let mut apartment = Apartment {
    ///     number: ApartmentNumber::new(12),
    ///     landlord_email: EmailAddress::parse("ada@example.com").unwrap(),
    ///     bedrooms: 2,
    ///     bathrooms: 1,
    ///     photos_folder: None,
    ///     prices: MonthlyPrices::default(),
    ///     additional_information: None,
    ///     for_sale_price: Some(0),
    /// };
    /// assert!(!apartment.is_for_sale());
    /// apartment.for_sale_price = Some(250_000);
    /// assert!(apartment.is_for_sale());
    /// ```
    #[must_use]
    pub fn is_for_sale(&self) -> bool {
        self.for_sale_price.is_some_and(|price| price > 0)
    }
}

/// Evenings booked against one apartment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub apartment_number: ApartmentNumber,
    pub evenings_booked: Vec<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Month::January, 100)]
    #[case(Month::June, 600)]
    #[case(Month::December, 1200)]
    fn monthly_prices_follow_calendar_order(#[case] month: Month, #[case] expected: i32) {
        let prices = MonthlyPrices::new([100, 200, 300, 400, 500, 600, 700, 800, 900, 1000, 1100, 1200]);
        assert_eq!(prices.for_month(month), expected);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(0), false)]
    #[case(Some(-5), false)]
    #[case(Some(90_000), true)]
    fn sale_price_must_be_positive(#[case] price: Option<i32>, #[case] expected: bool) {
        let apartment = Apartment {
            number: ApartmentNumber::new(1),
            landlord_email: EmailAddress::parse("a@b.com").expect("valid"),
            bedrooms: 1,
            bathrooms: 1,
            photos_folder: None,
            prices: MonthlyPrices::default(),
            additional_information: None,
            for_sale_price: price,
        };
        assert_eq!(apartment.is_for_sale(), expected);
    }
}
