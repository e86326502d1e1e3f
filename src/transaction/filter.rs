//! Optional date bounds that narrow the transaction list and the summary.

use std::ops::Range;

use axum::extract::{Query, rejection::QueryRejection};
use serde::Deserialize;
use time::{Date, macros::date};

use crate::{Error, transaction::core::date_format::parse_date};

/// The first date a ledger query can match.
const EARLIEST_DATE: Date = date!(0001 - 01 - 01);
/// The day after the last date a ledger query can match.
const END_OF_SUPPORTED_DATES: Date = date!(9999 - 01 - 01);

/// The query string of a request that may be limited to a date range,
/// e.g. `?start_date=2025-08-01&end_date=2025-08-31`.
///
/// Both bounds are inclusive and either may be left out. An empty value is
/// treated the same as a missing one.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct DateFilterQuery {
    /// The first date to include, formatted as YYYY-MM-DD.
    pub start_date: Option<String>,
    /// The last date to include, formatted as YYYY-MM-DD.
    pub end_date: Option<String>,
}

impl DateFilterQuery {
    /// Convert the bounds into a half-open date range.
    ///
    /// Returns `None` if neither bound was given, i.e. the query should not
    /// be filtered at all.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::InvalidDate] or [Error::DateOutOfRange] if a bound is not a valid date,
    /// - or [Error::InvalidDateRange] if the start date is after the end date.
    pub fn to_range(&self) -> Result<Option<Range<Date>>, Error> {
        let start = parse_bound(self.start_date.as_deref())?;
        let end = parse_bound(self.end_date.as_deref())?;

        if start.is_none() && end.is_none() {
            return Ok(None);
        }

        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(Error::InvalidDateRange { start, end });
        }

        let range_start = start.unwrap_or(EARLIEST_DATE);
        let range_end = match end {
            Some(end) => end.next_day().ok_or(Error::DateOutOfRange(end))?,
            None => END_OF_SUPPORTED_DATES,
        };

        Ok(Some(range_start..range_end))
    }
}

fn parse_bound(bound: Option<&str>) -> Result<Option<Date>, Error> {
    match bound.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text).map(Some),
    }
}

/// Read the optional date range from the query string of a request.
///
/// # Errors
/// Returns an [Error::InvalidRequest] if the query string could not be
/// parsed, otherwise the errors of [DateFilterQuery::to_range].
pub(crate) fn parse_date_filter(
    query: Result<Query<DateFilterQuery>, QueryRejection>,
) -> Result<Option<Range<Date>>, Error> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("Rejected date filter: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    })?;

    query.to_range()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, transaction::DateFilterQuery};

    fn query(start_date: Option<&str>, end_date: Option<&str>) -> DateFilterQuery {
        DateFilterQuery {
            start_date: start_date.map(str::to_owned),
            end_date: end_date.map(str::to_owned),
        }
    }

    #[test]
    fn no_bounds_means_no_filter() {
        assert_eq!(query(None, None).to_range(), Ok(None));
        assert_eq!(query(Some(""), Some(" ")).to_range(), Ok(None));
    }

    #[test]
    fn end_date_is_inclusive() {
        let range = query(Some("2025-08-01"), Some("2025-08-31"))
            .to_range()
            .unwrap()
            .unwrap();

        assert_eq!(range, date!(2025 - 08 - 01)..date!(2025 - 09 - 01));
    }

    #[test]
    fn single_day_range() {
        let range = query(Some("2025-08-01"), Some("2025-08-01"))
            .to_range()
            .unwrap()
            .unwrap();

        assert!(range.contains(&date!(2025 - 08 - 01)));
        assert!(!range.contains(&date!(2025 - 08 - 02)));
    }

    #[test]
    fn open_ended_ranges_cover_every_supported_date() {
        let from = query(Some("2025-08-01"), None).to_range().unwrap().unwrap();
        assert!(from.contains(&date!(9998 - 12 - 31)));
        assert!(!from.contains(&date!(2025 - 07 - 31)));

        let until = query(None, Some("2025-08-01")).to_range().unwrap().unwrap();
        assert!(until.contains(&date!(0001 - 01 - 01)));
        assert!(!until.contains(&date!(2025 - 08 - 02)));
    }

    #[test]
    fn start_after_end_is_rejected() {
        assert_eq!(
            query(Some("2025-08-02"), Some("2025-08-01")).to_range(),
            Err(Error::InvalidDateRange {
                start: date!(2025 - 08 - 02),
                end: date!(2025 - 08 - 01),
            })
        );
    }

    #[test]
    fn invalid_bound_is_rejected() {
        assert_eq!(
            query(Some("last week"), None).to_range(),
            Err(Error::InvalidDate("last week".to_owned()))
        );
    }
}
