/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (periods, entry dates, contract terms) carry no time zone.
pub type Date = chrono::NaiveDate;

/// Money amounts, rates and hours are fixed-point decimals (`NUMERIC` in the database).
pub type Amount = rust_decimal::Decimal;
