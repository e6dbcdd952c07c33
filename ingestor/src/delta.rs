//! Daily deltas from the source's cumulative series.
//!
//! The previous day's total is always read from the record store, never from
//! the batch being ingested.

use crate::models::{CumulativeCount, InfectionStatus};
use chrono::{Days, NaiveDate};
use std::future::Future;
use tracing::{debug, warn};

/// Source of previously stored cumulative totals.
///
/// `Ok(None)` means no row exists for that day and region, which is a normal
/// outcome and distinct from a failed lookup.
pub trait PriorLookup {
    type Error;

    fn prior_cumulative(
        &mut self,
        date: NaiveDate,
        region: &str,
    ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send;
}

/// Missing prior values count as zero, so a region's first record carries its
/// whole cumulative total as the delta. No clamping: revisions go negative.
/// Totals are non-negative, so the difference only saturates on rows that
/// violate that.
pub fn daily_delta(cumulative_total: i64, prior: Option<i64>) -> i64 {
    cumulative_total.saturating_sub(prior.unwrap_or(0))
}

/// Looks up the stored total for the day before `count.date` exactly once and
/// derives the persisted record from it.
pub async fn derive<L: PriorLookup>(
    count: &CumulativeCount,
    lookup: &mut L,
) -> Result<InfectionStatus, L::Error> {
    let prior = match count.date.checked_sub_days(Days::new(1)) {
        Some(previous_day) => lookup.prior_cumulative(previous_day, &count.region).await?,
        None => None,
    };

    if prior.is_none() {
        debug!(
            date = %count.date,
            region = count.region,
            "no prior cumulative total stored, treating as zero"
        );
    }

    let daily_delta = daily_delta(count.cumulative_total, prior);
    if daily_delta < 0 {
        warn!(
            date = %count.date,
            region = count.region,
            cumulative_total = count.cumulative_total,
            prior = ?prior,
            daily_delta,
            "cumulative total decreased, source likely revised an earlier value"
        );
    }

    Ok(InfectionStatus {
        date: count.date,
        region: count.region.clone(),
        daily_delta,
        cumulative_total: count.cumulative_total,
    })
}
