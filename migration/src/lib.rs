pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_movies;
mod m20250301_000002_create_ratings;
mod m20250308_000001_add_rating_rater_unique;
mod m20250315_000001_add_movie_title_search;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_movies::Migration),
            Box::new(m20250301_000002_create_ratings::Migration),
            Box::new(m20250308_000001_add_rating_rater_unique::Migration),
            Box::new(m20250315_000001_add_movie_title_search::Migration),
        ]
    }
}
