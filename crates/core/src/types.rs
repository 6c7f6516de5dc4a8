/// Server-assigned product identifier.
pub type ProductId = i64;

/// Server-assigned category identifier.
pub type CategoryId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
