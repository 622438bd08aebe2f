use crate::catalog::{engine, ListingRequest};
use crate::config::ServerConfig;
use crate::domain::{ListParams, MonsterFullListResponse, MonsterFullResponse};
use crate::error::{CatalogError, Result};
use crate::graphql::{create_schema, GraphQLSchema};
use crate::images::ImageLoader;
use crate::masters::{MasterEntry, MasterRegistry, MasterType};
use crate::metrics::{self, QueryMetrics};
use crate::source::InMemorySource;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

/// Shared state of the catalog server.
pub struct AppState {
    pub catalog: Arc<InMemorySource>,
    pub masters: Arc<MasterRegistry>,
    pub images: ImageLoader,
    pub max_page_size: NonZeroUsize,
}

impl AppState {
    pub fn new(catalog: InMemorySource, image_root: impl Into<PathBuf>, max_page_size: usize) -> Result<Self> {
        let max_page_size = NonZeroUsize::new(max_page_size).ok_or_else(|| {
            CatalogError::Config("server.max_page_size must be greater than 0".to_string())
        })?;
        let masters = MasterRegistry::from_entries(catalog.entries());
        Ok(Self {
            catalog: Arc::new(catalog),
            masters: Arc::new(masters),
            images: ImageLoader::new(image_root),
            max_page_size,
        })
    }

    pub fn schema(&self) -> GraphQLSchema {
        create_schema(self.catalog.clone(), self.masters.clone(), self.max_page_size)
    }
}

/// Health check endpoint
async fn health(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "monst-dex",
        "version": env!("CARGO_PKG_VERSION"),
        "monsters": state.catalog.len(),
    }))
}

/// `GET /monster/select/all`
async fn list_monsters(
    Extension(state): Extension<Arc<AppState>>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<MonsterFullListResponse>> {
    let Query(params) = params.map_err(|e| CatalogError::invalid("query", e.body_text()))?;
    let request = ListingRequest::from_params(&params, &state.masters, state.max_page_size)
        .map_err(|e| {
            QueryMetrics::record_rejected();
            e
        })?;
    let page_index = request.state.page();
    let size = request.state.page_size().get();

    if request.unsatisfiable {
        debug!(?params, "Listing filter references unknown values");
        return Ok(Json(MonsterFullListResponse {
            items: Vec::new(),
            page: page_index,
            size,
            total: 0,
        }));
    }

    let started = Instant::now();
    let page = engine::query_by(state.catalog.entries(), &request.state, |e| &e.record);
    QueryMetrics::record_query(started.elapsed().as_secs_f64(), page.total);

    let mut items: Vec<MonsterFullResponse> = page.items.iter().map(|e| e.detail.clone()).collect();
    for item in &mut items {
        state.images.hydrate(item, request.include_images).await;
    }

    Ok(Json(MonsterFullListResponse {
        items,
        page: page.page,
        size: page.size,
        total: page.total,
    }))
}

/// `GET /monster/select/:id`; images always carry their contents.
async fn get_monster(
    Extension(state): Extension<Arc<AppState>>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<MonsterFullResponse>> {
    let Path(id) = id.map_err(|e| CatalogError::invalid("id", e.body_text()))?;
    let entry = state.catalog.get(id).ok_or(CatalogError::NotFound(id))?;
    let mut detail = entry.detail.clone();
    state.images.hydrate(&mut detail, true).await;
    Ok(Json(detail))
}

/// `GET /master/:type/select/all`
async fn list_masters(
    Extension(state): Extension<Arc<AppState>>,
    Path(master_type): Path<String>,
) -> Result<Json<Vec<MasterEntry>>> {
    let master: MasterType = master_type.parse()?;
    Ok(Json(state.masters.entries(master).to_vec()))
}

/// Prometheus scrape endpoint
async fn metrics_handler() -> impl IntoResponse {
    match metrics::render() {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            "metrics recorder not installed\n".to_string(),
        ),
    }
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Create the HTTP server with all routes, including GraphQL
pub fn create_server(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let schema = state.schema();

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/monster/select/all", get(list_monsters))
        .route("/monster/select/:id", get(get_monster))
        .route("/master/:type/select/all", get(list_masters))
        .route("/graphql", post(graphql_handler).get(graphql_handler))
        .route("/graphiql", get(graphiql))
        .layer(Extension(schema))
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn start_server(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    let app = create_server(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| CatalogError::Config(format!("Invalid server address: {}", e)))?;

    info!("HTTP server running on http://{addr}");
    info!("Listing:  http://{addr}/monster/select/all");
    info!("GraphiQL: http://{addr}/graphiql");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CatalogError::Config(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
