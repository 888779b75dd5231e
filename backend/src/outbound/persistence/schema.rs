//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after a migration changes a table.

diesel::table! {
    /// Landlord credentials.
    ///
    /// `reset_token_digest` and `reset_expires_at` are set or cleared
    /// together (enforced by a CHECK constraint).
    landlords (id) {
        id -> Uuid,
        /// Lower-cased login email; unique.
        email -> Text,
        /// PHC-encoded Argon2id hash.
        password_hash -> Text,
        /// SHA-256 hex digest of the active reset token.
        reset_token_digest -> Nullable<Text>,
        reset_expires_at -> Nullable<Timestamptz>,
        apartment_numbers -> Array<Int4>,
        /// `[{"kind": ..., "accessToken": ...}]`
        linked_providers -> Jsonb,
        profile -> Jsonb,
        /// Set while a cascading deletion is in progress.
        deletion_requested_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Apartment listings, owned by `landlord_email`.
    apartments (number) {
        number -> Int4,
        landlord_email -> Text,
        bedrooms -> Int4,
        bathrooms -> Int4,
        photos_folder -> Nullable<Text>,
        /// Twelve monthly prices, January first.
        prices -> Array<Int4>,
        additional_information -> Nullable<Text>,
        for_sale_price -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Evenings booked against an apartment.
    apartment_bookings (id) {
        id -> Uuid,
        apartment_number -> Int4,
        evenings_booked -> Array<Date>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(landlords, apartments, apartment_bookings);
