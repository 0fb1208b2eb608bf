//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. `diesel print-schema` against a migrated database regenerates
//! them.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login (max 255 characters).
        login -> Varchar,
        /// Argon2 hash in PHC string format.
        password_hash -> Text,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submitted orders; the order number is globally unique.
    orders (number) {
        /// Luhn-valid order number.
        number -> Varchar,
        /// Owning user; immutable once written.
        user_id -> Uuid,
        /// One of `NEW`, `PROCESSING`, `INVALID`, `PROCESSED`.
        status -> Varchar,
        /// Points credited; only set for `PROCESSED` rows.
        accrual -> Nullable<Numeric>,
        /// First acceptance timestamp.
        uploaded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only withdrawal ledger.
    withdrawals (id) {
        id -> Uuid,
        user_id -> Uuid,
        /// Free-form reference to the order being paid for.
        order_ref -> Varchar,
        /// Debited amount; the column is named `sum` in SQL.
        #[sql_name = "sum"]
        amount -> Numeric,
        processed_at -> Timestamptz,
    }
}

diesel::joinable!(orders -> users (user_id));
diesel::joinable!(withdrawals -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(orders, users, withdrawals);
