use uuid::Uuid;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Random key for a line item that has not been persisted yet
pub fn transient_key() -> Uuid {
    Uuid::new_v4()
}

/// Today's business date in local time
pub fn business_date() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
