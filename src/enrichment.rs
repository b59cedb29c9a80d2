use jiff::Timestamp;
use tracing::{debug, error, warn};

use crate::{
    boxoffice::{BoxOfficeClient, BoxOfficeRecord},
    error::{AppError, AppResult},
    models::{BOX_OFFICE_CURRENCY, BOX_OFFICE_SOURCE, BoxOffice, Movie, MovieInput, Revenue},
    store::Store,
};

/// Creates a movie, then enriches it from the box-office provider on a best-effort basis.
///
/// The unenriched record is persisted first, so a slow or failing provider never loses the
/// movie. Provider failures degrade to `box_office: None`; they never fail the request.
pub async fn create_movie(
    store: &Store,
    provider: &BoxOfficeClient,
    input: MovieInput,
) -> AppResult<Movie> {
    input.validate().map_err(AppError::BadRequest)?;

    let movie = candidate(input);
    store.insert_movie(&movie).await?;
    debug!(movie_id = %movie.id, title = %movie.title, "movie created, fetching box office");

    let record = match provider.fetch(&movie.title).await {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(title = %movie.title, error = %err, "box office enrichment failed");
            None
        },
    };

    let enriched = merge_box_office(movie.clone(), record, Timestamp::now());

    if let Err(err) = store.save_movie(&enriched).await {
        error!(
            movie_id = %movie.id,
            error = %err,
            "failed to persist enrichment, store keeps the unenriched record"
        );
        return Ok(movie);
    }

    Ok(enriched)
}

pub fn candidate(input: MovieInput) -> Movie {
    Movie {
        id: uuid::Uuid::new_v4().to_string(),
        title: input.title,
        release_date: input.release_date,
        genre: input.genre,
        distributor: input.distributor,
        budget: input.budget,
        mpa_rating: input.mpa_rating,
        box_office: None,
    }
}

/// User-supplied fields win; the provider only fills what was left empty or zero.
/// The snapshot is replaced wholesale, and cleared when there is no record.
pub fn merge_box_office(
    mut movie: Movie,
    record: Option<BoxOfficeRecord>,
    fetched_at: Timestamp,
) -> Movie {
    let Some(record) = record else {
        movie.box_office = None;
        return movie;
    };

    if is_blank(&movie.distributor) && !is_blank(&record.distributor) {
        movie.distributor = record.distributor;
    }
    let provider_budget = record.budget.filter(|b| *b > 0);
    if movie.budget.unwrap_or(0) == 0 && provider_budget.is_some() {
        movie.budget = provider_budget;
    }
    if is_blank(&movie.mpa_rating) && !is_blank(&record.mpa_rating) {
        movie.mpa_rating = record.mpa_rating;
    }

    movie.box_office = Some(BoxOffice {
        revenue: Revenue {
            worldwide: record.revenue.worldwide,
            opening_weekend_usa: record.revenue.opening_weekend_usa,
        },
        currency: BOX_OFFICE_CURRENCY.to_string(),
        source: BOX_OFFICE_SOURCE.to_string(),
        last_updated: fetched_at,
    });

    movie
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
