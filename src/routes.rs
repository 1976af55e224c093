use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    AppState,
    cards::{self, DetailCard, LandingCard, ReviewCard},
    error::{AppError, AppResult},
    models::{FindQuery, ReviewForm, SearchForm, TitleRecord, UpdateForm, non_empty, parse_rating},
    store::{CacheEntry, ReviewInput},
    templates,
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let rows = state.store.list_reviews().await?;
    let cards: Vec<LandingCard> = rows.iter().map(LandingCard::from_row).collect();
    Ok(Html(templates::index_page(&cards, None)))
}

pub async fn search_form() -> Html<String> {
    Html(templates::search_page(&[], None))
}

pub async fn search(State(state): State<Arc<AppState>>, Form(form): Form<SearchForm>) -> Response {
    let body = state.imdb.search(&form).await;

    let Some(titles) = body.as_ref().and_then(|b| b.get("titles")).and_then(Value::as_array)
    else {
        warn!("title provider response has no titles list");
        let page = templates::search_page(&[], Some(templates::SEARCH_ERROR));
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response();
    };

    let cards = cards::search_cards(titles);
    Html(templates::search_page(&cards, None)).into_response()
}

/// Falls back to the landing page when the title cannot be fetched or decoded.
pub async fn detail(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let record = state.imdb.get_title(&id).await.and_then(|body| {
        serde_json::from_value::<TitleRecord>(body)
            .inspect_err(|err| warn!(title_id = %id, error = %err, "unable to decode title"))
            .ok()
    });

    let Some(record) = record else {
        warn!(title_id = %id, "title unavailable, redirecting");
        return Redirect::to("/").into_response();
    };

    Html(templates::detail_page(&DetailCard::from_record(&record))).into_response()
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    let rating = parse_rating(&form.rating)
        .ok_or_else(|| AppError::BadRequest("rating must be a number".to_string()))?;

    let entry = CacheEntry {
        title_id,
        title: form.movie_title.trim().to_string(),
        plot: non_empty(&form.plot),
        image: non_empty(&form.image),
    };
    let input = ReviewInput {
        rating,
        title: form.title.trim().to_string(),
        content: form.content,
        author: non_empty(&form.author),
    };

    state.store.submit_review(&entry, &input).await?;
    Ok(Redirect::to("/"))
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let row = state.store.get_review(id).await?;
    Ok(Html(templates::review_page(&ReviewCard::from_row(&row))))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<UpdateForm>,
) -> AppResult<Redirect> {
    let rating = parse_rating(&form.rating)
        .ok_or_else(|| AppError::BadRequest("rating must be a number".to_string()))?;

    let input = ReviewInput {
        rating,
        title: form.review_title.trim().to_string(),
        content: form.content,
        author: non_empty(&form.review_auth),
    };

    state.store.update_review(id, &input).await?;
    Ok(Redirect::to(&format!("/review/{id}")))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    let removed = state.store.delete_review(id).await?;
    info!(review_id = id, removed, "review deleted");
    Ok(Redirect::to("/"))
}

pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FindQuery>,
) -> AppResult<Html<String>> {
    let needle = q.search_string.trim();
    let rows = state.store.filter_reviews_by_title(needle).await?;
    let cards: Vec<LandingCard> = rows.iter().map(LandingCard::from_row).collect();
    Ok(Html(templates::index_page(&cards, Some(needle))))
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        body::Body,
        http::{Request, header},
        routing::get,
    };
    use sea_orm::EntityTrait;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        entities::cache,
        imdb::{ImdbClient, tests::spawn_provider},
        store::{
            Store,
            tests::{entry, input, memory_store},
        },
    };

    async fn state_with(store: Store, provider: Router) -> Arc<AppState> {
        let base = spawn_provider(provider).await;
        Arc::new(AppState { store, imdb: Arc::new(ImdbClient::new(reqwest::Client::new(), base)) })
    }

    async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Option<String>, String) {
        let resp = crate::app(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn provider(titles: Value) -> Router {
        Router::new().route(
            "/titles",
            get(move || {
                let titles = titles.clone();
                async move { Json(titles) }
            }),
        )
    }

    #[tokio::test]
    async fn search_without_titles_list_is_500() {
        for payload in [json!({}), json!({ "titles": "nope" }), json!({ "titles": null })] {
            let state = state_with(memory_store().await, provider(payload)).await;
            let (status, _, body) =
                send(&state, post_form("/search", "title=&genre=Drama&year=&rating=0")).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("Oops. Something went wrong."));
        }
    }

    #[tokio::test]
    async fn search_with_unreachable_provider_is_500() {
        let store = memory_store().await;
        let state = Arc::new(AppState {
            store,
            imdb: Arc::new(ImdbClient::new(
                reqwest::Client::new(),
                "http://127.0.0.1:1".to_string(),
            )),
        });
        let (status, _, body) = send(&state, post_form("/search", "title=heat")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Oops. Something went wrong."));
    }

    #[tokio::test]
    async fn search_renders_decodable_cards() {
        let titles = json!({ "titles": [
            { "id": "tt1", "primaryTitle": "Heat", "rating": { "aggregateRating": 8.3 } },
            { "primaryTitle": "No id" },
            { "id": "tt2", "primaryTitle": "Ronin" }
        ]});
        let state = state_with(memory_store().await, provider(titles)).await;
        let (status, _, body) = send(&state, post_form("/search", "title=&genre=Crime")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Heat"));
        assert!(body.contains("Ronin"));
        assert!(body.contains("/detail/tt1"));
        assert!(!body.contains("No id"));
    }

    #[tokio::test]
    async fn detail_renders_or_redirects() {
        let router = Router::new().route(
            "/titles/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "tt1" {
                    Json(json!({
                        "id": "tt1",
                        "primaryTitle": "Heat",
                        "runtimeSeconds": 10200,
                        "directors": { "displayName": "Michael Mann" }
                    }))
                    .into_response()
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }),
        );
        let state = state_with(memory_store().await, router).await;

        let (status, _, body) = send(&state, get_req("/detail/tt1")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Michael Mann"));
        assert!(body.contains("170 min"));
        assert!(body.contains("action=\"/review/tt1\""));

        let (status, location, _) = send(&state, get_req("/detail/tt404")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn submit_then_list_review() {
        let state = state_with(memory_store().await, Router::new()).await;

        let (status, location, _) = send(
            &state,
            post_form(
                "/review/tt7",
                "rating=4&title=Tense&content=Great+heist&movieTitle=Heat&plot=Cops&image=",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (_, _, body) = send(&state, get_req("/")).await;
        assert!(body.contains("Tense"));
        assert!(body.contains("/review/1"));

        let caches = cache::Entity::find().all(state.store.db()).await.unwrap();
        assert_eq!(caches.len(), 1);
        assert_eq!(caches[0].title_id, "tt7");
        assert_eq!(caches[0].image, None);
    }

    #[tokio::test]
    async fn submit_rejects_non_numeric_rating() {
        let state = state_with(memory_store().await, Router::new()).await;
        let (status, _, _) =
            send(&state, post_form("/review/tt7", "rating=lots&title=x&movieTitle=Heat")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn review_page_update_and_delete() {
        let store = memory_store().await;
        let (_, id) = store.submit_review(&entry("tt1", "plot"), &input("Draft", 2.0)).await.unwrap();
        let state = state_with(store, Router::new()).await;

        let (status, _, body) = send(&state, get_req(&format!("/review/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Draft"));
        assert!(body.contains("Title tt1"));

        let (status, location, _) = send(
            &state,
            post_form(
                &format!("/update/{id}"),
                "reviewTitle=Final&content=Better&reviewAuth=kim&rating=5",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, Some(format!("/review/{id}")));

        let row = state.store.get_review(id).await.unwrap();
        assert_eq!(row.review_title, "Final");
        assert_eq!(row.author.as_deref(), Some("kim"));
        assert_eq!(row.rating, 5.0);

        let (status, location, _) = send(&state, post_form(&format!("/delete/{id}"), "")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (status, _, _) = send(&state, get_req(&format!("/review/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn find_filters_by_review_title() {
        let store = memory_store().await;
        store.submit_review(&entry("tt1", "p"), &input("Heist classic", 5.0)).await.unwrap();
        store.submit_review(&entry("tt2", "p"), &input("Space opera", 3.0)).await.unwrap();
        let state = state_with(store, Router::new()).await;

        let (status, _, body) = send(&state, get_req("/find?searchString=Heist")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Heist classic"));
        assert!(!body.contains("Space opera"));

        let (status, _, body) = send(&state, get_req("/find?searchString=zzz")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No reviews yet"));
    }
}
