//! Diesel table definitions.
//!
//! Kept in lockstep with the SQL under `migrations/`.

diesel::table! {
    /// Donation ledger.
    donations (id) {
        /// Ledger row identifier.
        id -> Uuid,
        /// Donor email address.
        email -> Text,
        /// Contribution amount in kobo.
        amount_kobo -> Int8,
        /// Gateway transaction reference.
        reference -> Text,
        /// How the donation entered the ledger (`checkout`, `webhook`, `seed`).
        source -> Text,
        /// When the donation was recorded.
        created_at -> Timestamptz,
    }
}
