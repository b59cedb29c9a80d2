use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, Unchanged,
    sea_query::{Expr, OnConflict},
};

use crate::{
    entities::{movie, rating},
    error::{AppError, AppResult},
    models::{Movie, MovieQuery},
    ratings::RatingValue,
};

pub const DEFAULT_LIST_LIMIT: u64 = 10;
pub const MAX_LIST_LIMIT: u64 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.db.ping().await?;
        Ok(())
    }

    pub async fn insert_movie(&self, movie: &Movie) -> AppResult<()> {
        let now = now_sec();
        let model = movie::ActiveModel {
            id: Set(movie.id.clone()),
            title: Set(movie.title.clone()),
            title_search: Set(movie.title.to_lowercase()),
            release_date: Set(movie.release_date.to_string()),
            genre: Set(movie.genre.clone()),
            distributor: Set(movie.distributor.clone()),
            budget: Set(movie.budget),
            mpa_rating: Set(movie.mpa_rating.clone()),
            box_office: Set(movie.box_office.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        movie::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, "a movie with this title already exists"))?;

        Ok(())
    }

    /// Overwrites the enrichable columns of an existing movie.
    pub async fn save_movie(&self, movie: &Movie) -> AppResult<()> {
        let model = movie::ActiveModel {
            id: Unchanged(movie.id.clone()),
            distributor: Set(movie.distributor.clone()),
            budget: Set(movie.budget),
            mpa_rating: Set(movie.mpa_rating.clone()),
            box_office: Set(movie.box_office.clone()),
            updated_at: Set(now_sec()),
            ..Default::default()
        };

        model.update(&self.db).await?;
        Ok(())
    }

    pub async fn get_movie(&self, id: &str) -> AppResult<Option<Movie>> {
        let row = movie::Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(row.map(Movie::try_from).transpose()?)
    }

    pub async fn movie_exists(&self, title: &str) -> AppResult<bool> {
        let count =
            movie::Entity::find().filter(movie::Column::Title.eq(title)).count(&self.db).await?;
        Ok(count > 0)
    }

    pub async fn list_movies(&self, query: &MovieQuery) -> AppResult<Vec<Movie>> {
        let mut select = movie::Entity::find();

        if let Some(q) = non_empty(&query.q) {
            select = select
                .filter(Expr::cust_with_values("instr(title_search, ?) > 0", [q.to_lowercase()]));
        }
        if let Some(year) = query.year {
            select = select.filter(movie::Column::ReleaseDate.starts_with(format!("{year:04}-")));
        }
        if let Some(genre) = non_empty(&query.genre) {
            select = select.filter(movie::Column::Genre.eq(genre));
        }
        if let Some(distributor) = non_empty(&query.distributor) {
            select = select.filter(movie::Column::Distributor.eq(distributor));
        }
        if let Some(budget) = query.budget {
            select = select.filter(movie::Column::Budget.lte(budget));
        }
        if let Some(mpa_rating) = non_empty(&query.mpa_rating) {
            select = select.filter(movie::Column::MpaRating.eq(mpa_rating));
        }

        let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

        let rows =
            select.order_by_asc(movie::Column::Title).limit(limit).all(&self.db).await?;

        Ok(rows.into_iter().map(Movie::try_from).collect::<Result<Vec<_>, _>>()?)
    }

    /// Inserts the (title, rater) rating, or overwrites the value of the existing one in place.
    /// The unique index on (movie_title, rater_id) makes the insert the single arbiter.
    pub async fn upsert_rating(
        &self,
        title: &str,
        rater_id: &str,
        value: RatingValue,
    ) -> AppResult<UpsertOutcome> {
        let now = now_sec();
        let model = rating::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            movie_title: Set(title.to_string()),
            rater_id: Set(rater_id.to_string()),
            rating: Set(value.as_f64()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = rating::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([rating::Column::MovieTitle, rating::Column::RaterId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            return Ok(UpsertOutcome::Created);
        }

        rating::Entity::update_many()
            .col_expr(rating::Column::Rating, Expr::value(value.as_f64()))
            .col_expr(rating::Column::UpdatedAt, Expr::value(now))
            .filter(rating::Column::MovieTitle.eq(title))
            .filter(rating::Column::RaterId.eq(rater_id))
            .exec(&self.db)
            .await?;

        Ok(UpsertOutcome::Updated)
    }

    /// Sum and count of all rating values for a title.
    pub async fn rating_totals(&self, title: &str) -> AppResult<(f64, u64)> {
        let totals: Option<(Option<f64>, i64)> = rating::Entity::find()
            .select_only()
            .column_as(Expr::col(rating::Column::Rating).sum(), "total")
            .column_as(Expr::col(rating::Column::Id).count(), "count")
            .filter(rating::Column::MovieTitle.eq(title))
            .into_tuple()
            .one(&self.db)
            .await?;

        let (sum, count) = totals.unwrap_or((None, 0));
        Ok((sum.unwrap_or(0.0), count.max(0) as u64))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
