use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    models::{RatingAggregate, RatingResult, RatingSubmission},
    store::{Store, UpsertOutcome},
};

/// A rating on the 0.5..=5.0 scale, held as a count of half points.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN_HALF_POINTS: u8 = 1;
    pub const MAX_HALF_POINTS: u8 = 10;

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for RatingValue {
    type Error = AppError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let doubled = value * 2.0;
        let in_range = (f64::from(Self::MIN_HALF_POINTS)..=f64::from(Self::MAX_HALF_POINTS))
            .contains(&doubled);
        if !in_range || doubled.fract() != 0.0 {
            return Err(AppError::Unprocessable("Invalid rating value".to_string()));
        }
        Ok(Self(doubled as u8))
    }
}

/// Rounds to one decimal place, half up: `trunc(x * 10 + 0.5) / 10`.
pub fn round_half_up(mean: f64) -> f64 {
    (mean * 10.0 + 0.5).trunc() / 10.0
}

impl RatingAggregate {
    pub fn from_totals(sum: f64, count: u64) -> Self {
        if count == 0 {
            return Self { average: 0.0, count: 0 };
        }
        Self { average: round_half_up(sum / count as f64), count }
    }
}

/// Validates and stores a rating. Checks run in a fixed order so the caller sees the
/// first failing precondition: rater, movie, body, value.
pub async fn submit_rating(
    store: &Store,
    title: &str,
    rater_id: Option<&str>,
    body: AppResult<RatingSubmission>,
) -> AppResult<(UpsertOutcome, RatingResult)> {
    let Some(rater_id) = rater_id.filter(|r| !r.trim().is_empty()) else {
        return Err(AppError::Unauthorized("Missing X-Rater-Id header".to_string()));
    };

    if !store.movie_exists(title).await? {
        return Err(AppError::movie_not_found());
    }

    let value = RatingValue::try_from(body?.rating)?;
    let outcome = store.upsert_rating(title, rater_id, value).await?;

    debug!(title = %title, outcome = ?outcome, rating = value.as_f64(), "rating stored");

    Ok((
        outcome,
        RatingResult {
            movie_title: title.to_string(),
            rater_id: rater_id.to_string(),
            rating: value.as_f64(),
        },
    ))
}

pub async fn rating_aggregate(store: &Store, title: &str) -> AppResult<RatingAggregate> {
    if !store.movie_exists(title).await? {
        return Err(AppError::movie_not_found());
    }

    let (sum, count) = store.rating_totals(title).await?;
    Ok(RatingAggregate::from_totals(sum, count))
}
