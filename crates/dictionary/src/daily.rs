//! Deterministic word-of-the-day selection.
//!
//! Candidates are ranked shortest first and the rank for a date is
//! `days_since_epoch(date) mod count + 1`, so a date always maps to the same
//! rank and the pool is cycled with period `count`. Growing the pool may remap
//! dates to other words.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::assemble::assemble_word;
use crate::storage::{Candidates, Storage};
use crate::{DictionaryError, Word};

/// 2024-01-01 counted in days from 0001-01-01 (day 1).
const EPOCH_DAYS_FROM_CE: i64 = 738_886;

/// Whole days from 2024-01-01 to `date`; negative for earlier dates.
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE
}

/// 1-based rank of the word for `date` in a pool of `count`, or `None` when empty.
pub fn daily_rank(date: NaiveDate, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    let count = i64::try_from(count).ok()?;
    let rank = days_since_epoch(date).rem_euclid(count) + 1;
    Some(rank as u64)
}

pub(crate) async fn word_of_the_day(storage: &Storage, date: NaiveDate) -> Result<Word, DictionaryError> {
    let count = storage.count_candidates(Candidates::Daily).await?;
    let rank = daily_rank(date, count)
        .ok_or_else(|| DictionaryError::not_found("No word of the day available"))?;
    debug!(%date, count, rank, "word of the day");

    let id = storage
        .candidate_at(Candidates::Daily, rank - 1)
        .await?
        .ok_or_else(|| DictionaryError::not_found("No word of the day available"))?;
    let rows = storage.detail_rows_by_id(id).await?;
    assemble_word(rows).ok_or_else(|| DictionaryError::not_found("No word of the day available"))
}
