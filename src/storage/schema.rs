//! Diesel schema for marketplace persistence.

diesel::table! {
    /// Projects posted by hirers.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning hirer.
        hirer_id -> Uuid,
        /// Project title.
        #[max_length = 200]
        title -> Varchar,
        /// Project description.
        description -> Text,
        /// Optional budget in minor currency units.
        budget_cents -> Nullable<Int8>,
        /// Optional delivery deadline.
        timeline -> Nullable<Date>,
        /// Required skill identifiers.
        required_skills -> Array<Uuid>,
        /// Hire preference (`individual`, `team`, `either`).
        #[max_length = 20]
        hire_preference -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Whether payment was confirmed.
        paid -> Bool,
        /// Bidding deadline, set on first activation.
        bidding_end_time -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applications submitted against projects.
    applications (id) {
        /// Application identifier.
        id -> Uuid,
        /// Project applied to.
        project_id -> Uuid,
        /// Applying coder (the owner for team applications).
        applicant_id -> Uuid,
        /// Applicant kind (`individual`, `team`).
        #[max_length = 20]
        applicant_kind -> Varchar,
        /// Team applied on behalf of, if any.
        team_id -> Nullable<Uuid>,
        /// Optional bid in minor currency units.
        bid_amount_cents -> Nullable<Int8>,
        /// Optional years of experience.
        experience_years -> Nullable<Int4>,
        /// Cover message.
        message -> Text,
        /// Decision status (`pending`, `accepted`, `rejected`).
        #[max_length = 20]
        status -> Varchar,
        /// Submission timestamp.
        created_at -> Timestamptz,
        /// Decision timestamp.
        decided_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Teams and their owners.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Display name, unique case-insensitively.
        #[max_length = 100]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Owning coder.
        owner_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notifications awaiting or past delivery.
    notification_outbox (id) {
        /// Outbox entry identifier.
        id -> Uuid,
        /// Idempotency key (`<application id>:<kind>`).
        #[max_length = 100]
        dedupe_key -> Varchar,
        /// Recipient user.
        recipient_id -> Uuid,
        /// Notification kind.
        #[max_length = 20]
        kind -> Varchar,
        /// Notification title.
        title -> Text,
        /// Notification body.
        message -> Text,
        /// Related entity identifier.
        related_id -> Uuid,
        /// Delivery status (`pending`, `delivered`).
        #[max_length = 20]
        status -> Varchar,
        /// Delivery attempts so far.
        attempts -> Int4,
        /// Latest delivery error.
        last_error -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Delivery timestamp.
        delivered_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Notifications visible to users.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Idempotency key shared with the outbox entry.
        #[max_length = 100]
        dedupe_key -> Varchar,
        /// Recipient user.
        user_id -> Uuid,
        /// Notification title.
        title -> Text,
        /// Notification body.
        message -> Text,
        /// Notification kind.
        #[max_length = 20]
        kind -> Varchar,
        /// Related entity identifier.
        related_id -> Uuid,
        /// Whether the recipient has read it.
        read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(applications -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(
    projects,
    applications,
    teams,
    notification_outbox,
    notifications,
);
