//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored normalised.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        password_hash -> Text,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tags and ingredients; `kind` is `tag` or `ingredient`.
    attributes (id) {
        id -> Int8,
        user_id -> Uuid,
        kind -> Varchar,
        name -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        /// NUMERIC(5, 2).
        price -> Numeric,
        link -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Join table linking recipes to their tags and ingredients.
    recipe_attributes (recipe_id, attribute_id) {
        recipe_id -> Int8,
        attribute_id -> Int8,
    }
}

diesel::joinable!(attributes -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_attributes -> recipes (recipe_id));
diesel::joinable!(recipe_attributes -> attributes (attribute_id));

diesel::allow_tables_to_appear_in_same_query!(users, attributes, recipes, recipe_attributes);
