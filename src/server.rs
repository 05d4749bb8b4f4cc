//! JSON HTTP API over the scraper: one fetch-parse-respond cycle per request.

use crate::commands::{CategoriesCommand, DetailCommand, ListCommand, ListScope};
use crate::config::Config;
use crate::mybest::{ArticleDetail, ArticleList, CategoryTile, MybestClient, MybestFetch};
use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<dyn MybestFetch>,
    api_base: Arc<str>,
    list: Arc<ListCommand>,
    detail: Arc<DetailCommand>,
    categories: Arc<CategoriesCommand>,
}

impl AppState {
    pub fn new(config: Config, fetcher: Arc<dyn MybestFetch>) -> Self {
        Self {
            fetcher,
            api_base: Arc::from(config.api_base.trim_end_matches('/')),
            list: Arc::new(ListCommand::new(config.clone())),
            detail: Arc::new(DetailCommand::new(config.clone())),
            categories: Arc::new(CategoriesCommand::new(config)),
        }
    }
}

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0:#}")]
    Upstream(anyhow::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("{} {}", status, self);

        let body = serde_json::to_string(&ErrorBody { message: self.to_string() })
            .unwrap_or_else(|_| "{}".to_string());
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

/// Two-space indented JSON body.
struct PrettyJson<T>(T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_string_pretty(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => ApiError::from(e).into_response(),
        }
    }
}

type ApiResult<T> = Result<PrettyJson<T>, ApiError>;

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api", get(first_page))
        .route("/api/categories", get(categories))
        .route("/api/detail/{id}", get(detail))
        .route("/api/category/{slug}", get(category))
        .route("/api/{page}", get(page))
        .with_state(state)
}

/// Binds the configured address and serves until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let client = MybestClient::new(&config).await.context("Failed to create HTTP client")?;

    let addr: SocketAddr =
        config.bind.parse().with_context(|| format!("Invalid bind address {}", config.bind))?;
    let app = router(AppState::new(config, Arc::new(client)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server shutdown")?;
    Ok(())
}

/// Page numbers that are missing or not numeric fall back to 1.
fn page_number(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}

/// Status document with absolute endpoint links under the public API base.
async fn root(State(state): State<AppState>) -> PrettyJson<serde_json::Value> {
    let base = &state.api_base;
    PrettyJson(json!({
        "status": "active",
        "message": "MyBest Scraper API is Running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "list_articles": base.to_string(),
            "list_page": format!("{}/{{page}}", base),
            "detail_article": format!("{}/detail/{{id}}", base),
            "categories": format!("{}/categories", base),
            "category_articles": format!("{}/category/{{slug}}?page={{page}}", base),
        },
    }))
}

async fn first_page(State(state): State<AppState>) -> ApiResult<ArticleList> {
    list_page(&state, ListScope::Global, 1).await
}

async fn page(State(state): State<AppState>, Path(page): Path<String>) -> ApiResult<ArticleList> {
    list_page(&state, ListScope::Global, page_number(Some(&page))).await
}

async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<ArticleList> {
    if slug.trim().is_empty() {
        return Err(ApiError::BadRequest("category slug must not be empty".to_string()));
    }
    list_page(&state, ListScope::Category(slug), page_number(query.page.as_deref())).await
}

async fn list_page(state: &AppState, scope: ListScope, page: u32) -> ApiResult<ArticleList> {
    let list =
        state.list.fetch(state.fetcher.as_ref(), &scope, page).await.map_err(ApiError::Upstream)?;
    Ok(PrettyJson(list))
}

async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ArticleDetail> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest("article id must not be empty".to_string()));
    }
    let detail =
        state.detail.fetch(state.fetcher.as_ref(), &id).await.map_err(ApiError::Upstream)?;
    Ok(PrettyJson(detail))
}

async fn categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryTile>> {
    let tiles =
        state.categories.fetch(state.fetcher.as_ref()).await.map_err(ApiError::Upstream)?;
    Ok(PrettyJson(tiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mock::MockFetch;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const LISTING: &str = r#"<html><body>
        <div data-testid="content_list_item"><a href="/12345"><h2>Rice Cooker Terbaik</h2></a></div>
        <nav role="navigation"><ul><li>1</li><li>2</li><li>3</li></ul></nav>
    </body></html>"#;

    fn app(fetcher: MockFetch) -> Router {
        router(AppState::new(Config::default(), Arc::new(fetcher)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, String) {
        let response =
            app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some("4")), 4);
        assert_eq!(page_number(Some("abc")), 1);
        assert_eq!(page_number(Some("-2")), 1);
    }

    #[tokio::test]
    async fn test_root_status_document() {
        let (status, body) = get_json(app(MockFetch::new()), "/").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "active");
        assert_eq!(value["message"], "MyBest Scraper API is Running!");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["endpoints"]["list_articles"], "http://localhost:8080/api");
        assert_eq!(value["endpoints"]["detail_article"], "http://localhost:8080/api/detail/{id}");
    }

    #[tokio::test]
    async fn test_root_endpoints_follow_api_base() {
        let config = Config { api_base: "https://scraper.example/api/".to_string(), ..Config::default() };
        let app = router(AppState::new(config, Arc::new(MockFetch::new())));

        let (_, body) = get_json(app, "/").await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["endpoints"]["list_articles"], "https://scraper.example/api");
        assert_eq!(
            value["endpoints"]["category_articles"],
            "https://scraper.example/api/category/{slug}?page={page}"
        );
    }

    #[tokio::test]
    async fn test_listing_pages() {
        let fetcher = MockFetch::new().with_page("listing:1", LISTING).with_page("listing:2", LISTING);
        let app = app(fetcher);

        let (status, body) = get_json(app.clone(), "/api").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\n  \"meta\": {"));
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["meta"]["current_page"], 1);
        assert_eq!(value["data"][0]["original_id"], "12345");

        let (_, body) = get_json(app.clone(), "/api/2").await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["meta"]["current_page"], 2);
        assert_eq!(value["meta"]["prev_page_url"], "http://localhost:8080/api");

        let (_, body) = get_json(app, "/api/abc").await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["meta"]["current_page"], 1);
    }

    #[tokio::test]
    async fn test_category_listing_query_page() {
        let fetcher = MockFetch::new().with_page("category:101:2", LISTING);
        let (status, body) = get_json(app(fetcher), "/api/category/101?page=2").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["meta"]["next_page_url"], "http://localhost:8080/api/category/101?page=3");
    }

    #[tokio::test]
    async fn test_detail_and_categories() {
        let fetcher = MockFetch::new()
            .with_page("article:12345", "<html></html>")
            .with_page("index:/", r#"<a href="/categories/9"><div>Dapur</div></a>"#)
            .with_page("index:/categories", "<html></html>");
        let app = app(fetcher);

        let (status, body) = get_json(app.clone(), "/api/detail/12345").await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["id"], "12345");
        assert_eq!(value["products"], Value::Array(Vec::new()));

        let (status, body) = get_json(app, "/api/categories").await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value[0]["slug"], "9");
        assert_eq!(value[0]["api_link"], "http://localhost:8080/api/category/9");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let (status, body) = get_json(app(MockFetch::failing()), "/api/detail/1").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value["message"].as_str().unwrap().contains("network error"));
    }
}
