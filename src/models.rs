use serde::{Deserialize, Deserializer, de::DeserializeOwned};

/// A provider field that arrives either as a single value or as a list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(v) => Some(v),
            OneOrMany::Many(vs) => vs.first(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v).iter(),
            OneOrMany::Many(vs) => vs.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

/// One title as returned by the provider. Only `id` and `primaryTitle` are
/// required; every other field degrades to `None` when absent or malformed.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRecord {
    pub id: String,
    pub primary_title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_image: Option<Image>,
    #[serde(default, deserialize_with = "lenient")]
    pub genres: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<Rating>,
    #[serde(default, deserialize_with = "lenient")]
    pub runtime_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub directors: Option<OneOrMany<Person>>,
    #[serde(default, deserialize_with = "lenient")]
    pub stars: Option<OneOrMany<Person>>,
    #[serde(default, deserialize_with = "lenient")]
    pub spoken_languages: Option<OneOrMany<Language>>,
    #[serde(default, deserialize_with = "lenient")]
    pub plot: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Image {
    pub url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub aggregate_rating: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Language {
    pub name: Option<String>,
}

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(de)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(v) => Ok(Some(v)),
        Err(err) => {
            tracing::warn!(error = %err, "unable to parse provider field");
            Ok(None)
        },
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub rating: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "movieTitle")]
    pub movie_title: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default, rename = "reviewTitle")]
    pub review_title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "reviewAuth")]
    pub review_auth: String,
    #[serde(default)]
    pub rating: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FindQuery {
    #[serde(default, rename = "searchString")]
    pub search_string: String,
}

/// Parses a form rating. Blank input counts as zero.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Blank form values are stored as NULL.
pub fn non_empty(raw: &str) -> Option<String> {
    let s = raw.trim();
    (!s.is_empty()).then(|| s.to_string())
}
