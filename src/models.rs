use std::{fmt::Display, str::FromStr};

use jiff::{Timestamp, civil::Date};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::movie;

pub const BOX_OFFICE_CURRENCY: &str = "USD";
pub const BOX_OFFICE_SOURCE: &str = "BoxOfficeAPI";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub worldwide: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_weekend_usa: Option<i64>,
}

/// Latest box-office snapshot attached to a movie. Replaced wholesale on every enrichment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct BoxOffice {
    pub revenue: Revenue,
    pub currency: String,
    pub source: String,
    pub last_updated: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub release_date: Date,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpa_rating: Option<String>,
    pub box_office: Option<BoxOffice>,
}

impl TryFrom<movie::Model> for Movie {
    type Error = jiff::Error;

    fn try_from(row: movie::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            release_date: row.release_date.parse()?,
            genre: row.genre,
            distributor: row.distributor,
            budget: row.budget,
            mpa_rating: row.mpa_rating,
            box_office: row.box_office,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub title: String,
    pub release_date: Date,
    pub genre: String,
    #[serde(default)]
    pub distributor: Option<String>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub mpa_rating: Option<String>,
}

impl MovieInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.genre.trim().is_empty() {
            return Err("genre is required".to_string());
        }
        if self.budget.is_some_and(|b| b < 0) {
            return Err("budget must be non-negative".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub year: Option<i16>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub distributor: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub budget: Option<i64>,
    #[serde(default)]
    pub mpa_rating: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MovieList {
    pub items: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
pub struct RatingSubmission {
    pub rating: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResult {
    pub movie_title: String,
    pub rater_id: String,
    pub rating: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: u64,
}

/// Parses an optional query value, reading an empty or blank value as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
