use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{
    models::{OneOrMany, TitleRecord},
    store::ReviewRow,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchCard {
    pub href: String,
    pub title: String,
    pub image: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<i64>,
}

impl SearchCard {
    pub fn from_record(record: &TitleRecord) -> Self {
        Self {
            href: format!("/detail/{}", urlencoding::encode(&record.id)),
            title: record.primary_title.clone(),
            image: image_url(record),
            genre: record.genres.as_ref().and_then(|g| g.first()).cloned(),
            year: record.start_year,
            rating: aggregate_rating(record).map(|r| (r / 2.0).round() as i64),
        }
    }
}

/// Builds search cards from the raw `titles` array. Records that do not
/// decode are skipped.
pub fn search_cards(titles: &[Value]) -> Vec<SearchCard> {
    titles
        .iter()
        .filter_map(|raw| match serde_json::from_value::<TitleRecord>(raw.clone()) {
            Ok(record) => Some(SearchCard::from_record(&record)),
            Err(err) => {
                warn!(error = %err, "skipped card");
                None
            },
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailCard {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub runtime_minutes: Option<i64>,
    pub directors: Vec<String>,
    pub stars: Vec<String>,
    pub languages: Vec<String>,
    pub plot: Option<String>,
}

impl DetailCard {
    pub fn from_record(record: &TitleRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.primary_title.clone(),
            image: image_url(record),
            genres: record.genres.clone().map(OneOrMany::into_vec).unwrap_or_default(),
            year: record.start_year,
            rating: aggregate_rating(record).map(|r| r / 2.0),
            runtime_minutes: record.runtime_seconds.map(|s| (s / 60.0).round() as i64),
            directors: inner_attributes(record.directors.as_ref(), |p| p.display_name.as_deref()),
            stars: inner_attributes(record.stars.as_ref(), |p| p.display_name.as_deref()),
            languages: inner_attributes(record.spoken_languages.as_ref(), |l| l.name.as_deref()),
            plot: record.plot.clone(),
        }
    }
}

/// Flattens one attribute out of a single object or a list of objects.
/// Elements without the attribute are left out.
pub fn inner_attributes<T>(
    source: Option<&OneOrMany<T>>,
    attr: impl Fn(&T) -> Option<&str>,
) -> Vec<String> {
    let Some(source) = source else {
        return Vec::new();
    };
    source.iter().filter_map(|el| attr(el).map(str::to_string)).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LandingCard {
    pub href: String,
    pub title: String,
    pub image: Option<String>,
    pub rating: f64,
}

impl LandingCard {
    pub fn from_row(row: &ReviewRow) -> Self {
        Self {
            href: format!("/review/{}", row.id),
            title: row.review_title.clone(),
            image: row.image.clone(),
            rating: row.rating,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReviewCard {
    pub id: i32,
    pub detail_href: String,
    pub review_title: String,
    pub content: String,
    pub cache_title: String,
    pub image: Option<String>,
    pub rating: f64,
    pub plot: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl ReviewCard {
    pub fn from_row(row: &ReviewRow) -> Self {
        Self {
            id: row.id,
            detail_href: format!("/detail/{}", urlencoding::encode(&row.title_id)),
            review_title: row.review_title.clone(),
            content: row.content.clone(),
            cache_title: row.cache_title.clone(),
            image: row.image.clone(),
            rating: row.rating,
            plot: row.plot.clone(),
            author: row.author.clone(),
            date: format_timestamp(row.date),
        }
    }
}

fn image_url(record: &TitleRecord) -> Option<String> {
    record.primary_image.as_ref().and_then(|i| i.url.clone())
}

fn aggregate_rating(record: &TitleRecord) -> Option<f64> {
    record.rating.as_ref().and_then(|r| r.aggregate_rating)
}

fn format_timestamp(secs: i64) -> Option<String> {
    let ts = jiff::Timestamp::from_second(secs).ok()?;
    Some(ts.strftime("%Y-%m-%d %H:%M").to_string())
}
