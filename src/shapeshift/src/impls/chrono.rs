use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::impl_leaf;

impl_leaf!(
    DateTime<Utc>,
    DateTime<FixedOffset>,
    NaiveDateTime,
    NaiveDate,
    NaiveTime,
);
