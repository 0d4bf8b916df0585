/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Due dates carry no time component.
pub type DueDate = chrono::NaiveDate;

/// Opaque user identifier supplied by the authentication provider.
///
/// Every row carries one; every query filters on it.
pub type OwnerId = String;
