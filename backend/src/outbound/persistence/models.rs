//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain values live here so
//! repositories stay thin.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Apartment, ApartmentNumber, EmailAddress, Landlord, LandlordId, LandlordProfile,
    LinkedProvider, MonthlyPrices, PasswordHash, PasswordResetWindow, TokenDigest,
};

use super::schema::{apartments, landlords};

/// Reasons a stored row cannot become a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RowConversionError {
    #[error("stored email {0:?} is not a valid address")]
    Email(String),
    #[error("stored reset window is incomplete")]
    PartialResetWindow,
    #[error("stored {column} is not valid JSON for its type: {message}")]
    Json {
        column: &'static str,
        message: String,
    },
    #[error("stored prices hold {0} entries, expected 12")]
    Prices(usize),
}

fn parse_email(raw: String) -> Result<EmailAddress, RowConversionError> {
    EmailAddress::parse(&raw).map_err(|_| RowConversionError::Email(raw))
}

// ---------------------------------------------------------------------------
// Landlords
// ---------------------------------------------------------------------------

/// Row struct for reading from the landlords table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = landlords)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LandlordRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub reset_token_digest: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub apartment_numbers: Vec<i32>,
    pub linked_providers: serde_json::Value,
    pub profile: serde_json::Value,
    pub deletion_requested_at: Option<DateTime<Utc>>,
}

impl LandlordRow {
    pub(crate) fn into_domain(self) -> Result<Landlord, RowConversionError> {
        let password_reset = match (self.reset_token_digest, self.reset_expires_at) {
            (Some(digest), Some(expires_at)) => Some(PasswordResetWindow {
                token_digest: TokenDigest::from_hex(digest),
                expires_at,
            }),
            (None, None) => None,
            _ => return Err(RowConversionError::PartialResetWindow),
        };
        Ok(Landlord {
            id: LandlordId::from_uuid(self.id),
            email: parse_email(self.email)?,
            password_hash: PasswordHash::from_encoded(self.password_hash),
            password_reset,
            apartment_numbers: self
                .apartment_numbers
                .into_iter()
                .map(ApartmentNumber::new)
                .collect(),
            linked_providers: decode_providers(self.linked_providers)?,
            profile: serde_json::from_value(self.profile).map_err(|err| {
                RowConversionError::Json {
                    column: "profile",
                    message: err.to_string(),
                }
            })?,
            deletion_requested_at: self.deletion_requested_at,
        })
    }
}

pub(crate) fn decode_providers(
    value: serde_json::Value,
) -> Result<Vec<LinkedProvider>, RowConversionError> {
    serde_json::from_value(value).map_err(|err| RowConversionError::Json {
        column: "linked_providers",
        message: err.to_string(),
    })
}

pub(crate) fn encode_providers(providers: &[LinkedProvider]) -> serde_json::Value {
    serde_json::Value::Array(
        providers
            .iter()
            .map(|provider| {
                serde_json::json!({
                    "kind": provider.kind,
                    "accessToken": provider.access_token,
                })
            })
            .collect(),
    )
}

fn encode_profile(profile: &LandlordProfile) -> serde_json::Value {
    serde_json::json!({
        "name": profile.name,
        "gender": profile.gender,
        "location": profile.location,
        "website": profile.website,
        "picture": profile.picture,
    })
}

/// Insertable struct for registering a landlord.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = landlords)]
pub(crate) struct NewLandlordRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub apartment_numbers: Vec<i32>,
    pub linked_providers: serde_json::Value,
    pub profile: serde_json::Value,
}

impl<'a> NewLandlordRow<'a> {
    pub(crate) fn from_domain(landlord: &'a Landlord) -> Self {
        Self {
            id: *landlord.id.as_uuid(),
            email: landlord.email.as_ref(),
            password_hash: landlord.password_hash.as_str(),
            apartment_numbers: landlord
                .apartment_numbers
                .iter()
                .map(|number| number.value())
                .collect(),
            linked_providers: encode_providers(&landlord.linked_providers),
            profile: encode_profile(&landlord.profile),
        }
    }
}

// ---------------------------------------------------------------------------
// Apartments
// ---------------------------------------------------------------------------

/// Row struct for reading from the apartments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = apartments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApartmentRow {
    pub number: i32,
    pub landlord_email: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub photos_folder: Option<String>,
    pub prices: Vec<i32>,
    pub additional_information: Option<String>,
    pub for_sale_price: Option<i32>,
}

impl ApartmentRow {
    pub(crate) fn into_domain(self) -> Result<Apartment, RowConversionError> {
        let count = self.prices.len();
        let prices: [i32; 12] = self
            .prices
            .try_into()
            .map_err(|_| RowConversionError::Prices(count))?;
        Ok(Apartment {
            number: ApartmentNumber::new(self.number),
            landlord_email: parse_email(self.landlord_email)?,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            photos_folder: self.photos_folder,
            prices: MonthlyPrices::new(prices),
            additional_information: self.additional_information,
            for_sale_price: self.for_sale_price,
        })
    }
}
