use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::app_state::AppState;
use crate::domain::{Movie, TitleQuery};
use crate::handlers::shared_types::{ApiError, FormOrJson, MessageBody};

/// Handler for creating a movie (POST /addmovie).
///
/// Accepts the add-movie form or an equivalent JSON body.
///
/// - On success, redirects to `/` with `303 See Other`.
/// - If a movie with the same title exists, responds with `409 Conflict`.
/// - On store failure, responds with `500` and `{ "error": ... }`.
#[tracing::instrument(skip(state, movie), fields(title = %movie.title))]
pub async fn add_movie(
    State(state): State<AppState>,
    FormOrJson(movie): FormOrJson<Movie>,
) -> Result<Redirect, ApiError> {
    // ---
    state.store().create(movie).await?;
    state.metrics().record_movie_created();

    tracing::info!("Movie created");
    Ok(Redirect::to("/"))
}

/// Handler for listing every movie (GET /movies).
///
/// Responds with `200 OK` and a JSON array; there is no pagination.
#[tracing::instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, ApiError> {
    // ---
    let movies = state.store().find_all().await?;

    tracing::debug!(count = movies.len(), "Listed movies");
    Ok(Json(movies))
}

/// Handler for deleting a movie by title (POST /deletemovie).
///
/// Redirects to `/` whether or not a movie matched.
#[tracing::instrument(skip(state, query), fields(title = %query.title))]
pub async fn delete_movie(
    State(state): State<AppState>,
    FormOrJson(query): FormOrJson<TitleQuery>,
) -> Result<Redirect, ApiError> {
    // ---
    let deleted = state.store().delete_one(&query.title).await?;

    tracing::info!(deleted, "Delete movie");
    Ok(Redirect::to("/"))
}

/// Handler for replacing a movie (POST /updatemovie).
///
/// The body's `title` selects the record and the whole body replaces it.
/// Redirects to `/` whether or not a movie matched.
#[tracing::instrument(skip(state, movie), fields(title = %movie.title))]
pub async fn update_movie(
    State(state): State<AppState>,
    FormOrJson(movie): FormOrJson<Movie>,
) -> Result<Redirect, ApiError> {
    // ---
    let title = movie.title.clone();
    let updated = state.store().update_one(&title, movie).await?;

    tracing::info!(updated, "Update movie");
    Ok(Redirect::to("/"))
}

/// Handler for looking up a movie by title (POST /findmovie).
///
/// - If the movie exists, responds with `200 OK` and the movie as JSON.
/// - Otherwise responds with `404 Not Found` and `{ "message": "Movie not found" }`.
#[tracing::instrument(skip(state, query), fields(title = %query.title))]
pub async fn find_movie(
    State(state): State<AppState>,
    FormOrJson(query): FormOrJson<TitleQuery>,
) -> Result<Response, ApiError> {
    // ---
    let response = match state.store().find_one(&query.title).await? {
        Some(movie) => Json(movie).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(MessageBody {
                message: "Movie not found",
            }),
        )
            .into_response(),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    // ---
    use crate::app_state::AppState;
    use crate::domain::{Movie, MovieStore, StoreError, StoreResult};
    use crate::infrastructure::{create_memory_store, create_noop_metrics};
    use crate::build_router;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(store: crate::domain::MovieStorePtr) -> Router {
        // ---
        let public_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("public");
        build_router(AppState::new(store, create_noop_metrics().unwrap()), &public_dir)
    }

    fn app() -> Router {
        app_with(create_memory_store())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn inception() -> Value {
        json!({
            "title": "Inception",
            "year": 2010,
            "runtime": 148,
            "genres": ["Sci-Fi"],
            "cast": ["Leonardo DiCaprio"]
        })
    }

    #[tokio::test]
    async fn add_redirects_and_find_returns_verbatim() {
        // ---
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/addmovie", inception()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app
            .oneshot(post_json("/findmovie", json!({ "title": "Inception" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, inception());
    }

    #[tokio::test]
    async fn add_accepts_html_form() {
        // ---
        let store = create_memory_store();
        let app = app_with(store.clone());

        let response = app
            .oneshot(post_form(
                "/addmovie",
                "title=Heat&year=1995&runtime=&genres=Crime%2C+Drama&cast=Al+Pacino&cast=Robert+De+Niro",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let heat = store.find_one("Heat").await.unwrap().unwrap();
        assert_eq!(heat.year, Some(1995));
        assert_eq!(heat.runtime, None);
        assert_eq!(heat.genres, vec!["Crime", "Drama"]);
        assert_eq!(heat.cast, vec!["Al Pacino", "Robert De Niro"]);
    }

    #[tokio::test]
    async fn add_duplicate_title_conflicts() {
        // ---
        let app = app();

        app.clone()
            .oneshot(post_json("/addmovie", inception()))
            .await
            .unwrap();
        let response = app
            .oneshot(post_json("/addmovie", inception()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        // ---
        let response = app()
            .oneshot(
                Request::post("/addmovie")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{ invalid json }"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn find_missing_is_not_found_with_message() {
        // ---
        let response = app()
            .oneshot(post_form("/findmovie", "title=Nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "message": "Movie not found" }));
    }

    #[tokio::test]
    async fn update_replaces_whole_record_idempotently() {
        // ---
        let store = create_memory_store();
        let app = app_with(store.clone());
        app.clone()
            .oneshot(post_json("/addmovie", inception()))
            .await
            .unwrap();

        let replacement = json!({ "title": "Inception", "year": 2011, "genres": ["Thriller"] });
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/updatemovie", replacement.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }

        let movie = store.find_one("Inception").await.unwrap().unwrap();
        assert_eq!(
            movie,
            Movie::new("Inception").with_year(2011).with_genres(["Thriller"])
        );
    }

    #[tokio::test]
    async fn delete_then_list_no_longer_contains_it() {
        // ---
        let app = app();
        app.clone()
            .oneshot(post_json("/addmovie", inception()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_form("/deletemovie", "title=Inception"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(Request::get("/movies").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn delete_missing_title_still_redirects() {
        // ---
        let response = app()
            .oneshot(post_form("/deletemovie", "title=Ghost"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    /// Store whose every operation fails, standing in for a lost connection.
    struct UnreachableStore;

    #[async_trait::async_trait]
    impl MovieStore for UnreachableStore {
        // ---
        async fn create(&self, _movie: Movie) -> StoreResult<Movie> {
            Err(anyhow::anyhow!("connection refused").into())
        }
        async fn find_all(&self) -> StoreResult<Vec<Movie>> {
            Err(anyhow::anyhow!("connection refused").into())
        }
        async fn find_one(&self, _title: &str) -> StoreResult<Option<Movie>> {
            Err(anyhow::anyhow!("connection refused").into())
        }
        async fn update_one(&self, _title: &str, _movie: Movie) -> StoreResult<bool> {
            Err(anyhow::anyhow!("connection refused").into())
        }
        async fn delete_one(&self, _title: &str) -> StoreResult<bool> {
            Err(anyhow::anyhow!("connection refused").into())
        }
        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }
    }

    #[tokio::test]
    async fn store_failures_are_internal_errors_with_message() {
        // ---
        let app = app_with(Arc::new(UnreachableStore));

        let requests = vec![
            post_json("/addmovie", inception()),
            Request::get("/movies").body(Body::empty()).unwrap(),
            post_form("/deletemovie", "title=Inception"),
            post_json("/updatemovie", inception()),
            post_form("/findmovie", "title=Inception"),
        ];

        for request in requests {
            let uri = request.uri().clone();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(
                body_json(response).await,
                json!({ "error": "connection refused" }),
                "{uri}"
            );
        }
    }
}
