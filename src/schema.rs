diesel::table! {
    tutors (id) {
        id -> Uuid,
        display_name -> Text,
        hourly_rate_cents -> Int8,
        active -> Bool,
    }
}

diesel::table! {
    tutor_subjects (tutor_id, subject_id) {
        tutor_id -> Uuid,
        subject_id -> Uuid,
    }
}

diesel::table! {
    availability_windows (id) {
        id -> Uuid,
        tutor_id -> Uuid,
        weekday -> Nullable<Int2>,
        date -> Nullable<Date>,
        start_minute -> Int2,
        end_minute -> Int2,
        is_available -> Bool,
    }
}

diesel::table! {
    sessions (id) {
        id -> Uuid,
        student_id -> Uuid,
        tutor_id -> Uuid,
        subject_id -> Uuid,
        scheduled_at -> Timestamptz,
        duration_minutes -> Int4,
        status -> Text,
        price_cents -> Int8,
        notes -> Text,
        meeting_link -> Nullable<Text>,
    }
}

diesel::joinable!(tutor_subjects -> tutors (tutor_id));
diesel::joinable!(availability_windows -> tutors (tutor_id));

diesel::allow_tables_to_appear_in_same_query!(
    availability_windows,
    sessions,
    tutor_subjects,
    tutors,
);
