// Mirrors the tables of the marketing backend that Herald reads and writes.

diesel::table! {
    companies (id) {
        id -> Int4,
        user_id -> Int4,
        name -> Text,
        website -> Nullable<Text>,
        logo_url -> Nullable<Text>,
    }
}

diesel::table! {
    strategies (id) {
        id -> Int4,
        company_id -> Int4,
        status -> Text,
        approved_at -> Nullable<Timestamptz>,
        archived_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    content_items (id) {
        id -> Int4,
        company_id -> Int4,
        strategy_id -> Int4,
        user_id -> Int4,
        platform -> Text,
        content_type -> Text,
        caption -> Nullable<Text>,
        hashtags -> Nullable<Text>,
        image_prompt -> Nullable<Text>,
        media_link -> Nullable<Text>,
        video_placeholder -> Nullable<Text>,
        best_time -> Nullable<Text>,
        status -> Text,
        rejected_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    user_linked_accounts (id) {
        id -> Int4,
        user_id -> Int4,
        platform -> Text,
        account_id -> Nullable<Text>,
        page_id -> Nullable<Text>,
        instagram_id -> Nullable<Text>,
        access_token -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(content_items -> companies (company_id));
diesel::joinable!(strategies -> companies (company_id));

diesel::allow_tables_to_appear_in_same_query!(
    companies,
    content_items,
    strategies,
    user_linked_accounts,
);
