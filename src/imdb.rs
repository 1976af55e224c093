use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{SearchForm, parse_rating};

/// Read-only client for the title provider. Calls are one-shot: failures are
/// logged and reported as `None`, never as errors.
pub struct ImdbClient {
    client: reqwest::Client,
    base_url: String,
}

impl ImdbClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Searches by title when one is given, otherwise by the form's filters.
    /// The provider does not combine the two.
    pub async fn search(&self, form: &SearchForm) -> Option<Value> {
        let title = form.title.trim();
        if !title.is_empty() {
            return self.search_by_title(title).await;
        }
        self.search_by_filter(&TitleFilter::from_form(form)).await
    }

    pub async fn search_by_title(&self, title: &str) -> Option<Value> {
        self.get_json("/search/titles", &[("query", title.to_string())]).await
    }

    pub async fn search_by_filter(&self, filter: &TitleFilter) -> Option<Value> {
        self.get_json("/titles", &filter.query_pairs()).await
    }

    pub async fn get_title(&self, id: &str) -> Option<Value> {
        let path = format!("/titles/{}", urlencoding::encode(id));
        self.get_json(&path, &[]).await
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Option<Value> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(url = %url, ?query, "querying title provider");

        let result: Result<Value, reqwest::Error> = async {
            self.client.get(&url).query(query).send().await?.error_for_status()?.json().await
        }
        .await;

        match result {
            Ok(body) => Some(body),
            Err(err) => {
                warn!(url = %url, error = %err, "unable to retrieve titles");
                None
            },
        }
    }
}

/// Structured search used when no title text is supplied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleFilter {
    pub genre: Option<String>,
    pub start_year: Option<String>,
    /// Minimum rating on the provider's 0-10 scale.
    pub min_aggregate_rating: Option<f64>,
}

impl TitleFilter {
    /// Ratings on the form are 0-5 and get doubled for the provider.
    pub fn from_form(form: &SearchForm) -> Self {
        let genre = form.genre.trim();
        let year = form.year.trim();
        Self {
            genre: (!genre.is_empty()).then(|| genre.to_string()),
            start_year: (!year.is_empty()).then(|| year.to_string()),
            min_aggregate_rating: parse_rating(&form.rating).filter(|r| *r > 0.0).map(|r| r * 2.0),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("types", "MOVIE".to_string())];
        if let Some(genre) = &self.genre {
            pairs.push(("genres", genre.clone()));
        }
        if let Some(year) = &self.start_year {
            pairs.push(("startYear", year.clone()));
        }
        if let Some(rating) = self.min_aggregate_rating {
            pairs.push(("minAggregateRating", rating.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
    };
    use serde_json::json;

    use super::*;

    /// Serves `router` on an ephemeral port and returns its base URL.
    pub(crate) async fn spawn_provider(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn echo(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({ "titles": [], "query": q }))
    }

    async fn title(Path(id): Path<String>) -> Json<Value> {
        Json(json!({ "id": id, "primaryTitle": "Echo" }))
    }

    fn client(base_url: String) -> ImdbClient {
        ImdbClient::new(reqwest::Client::new(), base_url)
    }

    fn form(title: &str, genre: &str, year: &str, rating: &str) -> SearchForm {
        SearchForm {
            title: title.to_string(),
            genre: genre.to_string(),
            year: year.to_string(),
            rating: rating.to_string(),
        }
    }

    #[test]
    fn filter_doubles_rating_and_skips_blanks() {
        let filter = TitleFilter::from_form(&form("", "Drama", "1994", "4"));
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("types", "MOVIE".to_string()),
                ("genres", "Drama".to_string()),
                ("startYear", "1994".to_string()),
                ("minAggregateRating", "8".to_string()),
            ]
        );

        let bare = TitleFilter::from_form(&form("", " ", "", "0"));
        assert_eq!(bare.query_pairs(), vec![("types", "MOVIE".to_string())]);
    }

    #[tokio::test]
    async fn title_text_takes_precedence_over_filters() {
        let base = spawn_provider(
            Router::new().route("/search/titles", get(echo)).route("/titles", get(echo)),
        )
        .await;
        let body = client(base).search(&form("heat", "Drama", "1995", "3")).await.unwrap();
        assert_eq!(body["query"], json!({ "query": "heat" }));
    }

    #[tokio::test]
    async fn empty_title_uses_filters() {
        let base = spawn_provider(Router::new().route("/titles", get(echo))).await;
        let body = client(base).search(&form("", "Comedy", "", "2.5")).await.unwrap();
        assert_eq!(
            body["query"],
            json!({ "types": "MOVIE", "genres": "Comedy", "minAggregateRating": "5" })
        );
    }

    #[tokio::test]
    async fn get_title_by_id() {
        let base = spawn_provider(Router::new().route("/titles/{id}", get(title))).await;
        let body = client(base).get_title("tt0113277").await.unwrap();
        assert_eq!(body["id"], "tt0113277");
    }

    #[tokio::test]
    async fn failures_become_none() {
        let base = spawn_provider(
            Router::new().route("/titles/{id}", get(|| async { StatusCode::INTERNAL_SERVER_ERROR })),
        )
        .await;
        assert!(client(base).get_title("tt1").await.is_none());

        assert!(client("http://127.0.0.1:1".to_string()).search_by_title("x").await.is_none());
    }
}
