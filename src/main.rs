//! Chat session web server backed by the Gemini API
//!
//! (c) Softlandia 2025

use tokio_gemini_chat_api::api;
use tokio_gemini_chat_api::config::Settings;
use tokio_gemini_chat_api::core::services::MyChatService;
use tokio_gemini_chat_api::infrastructure::database::DatabaseConnection;
use tokio_gemini_chat_api::infrastructure::gemini::GeminiClient;
use tokio_gemini_chat_api::infrastructure::repositories::DbChatRepository;
use tokio_gemini_chat_api::infrastructure::traits::CompletionClient;

use anyhow::anyhow;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::response::Html;
use axum::routing::get;
use di::{Injectable, Ref, ServiceCollection, ServiceProvider, singleton, singleton_as_self};
use di_axum::RouterServiceProviderExtensions;
use log::{info, warn};
use tokio::runtime::{Builder, Runtime};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // initialize tracing, `RUST_LOG` overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(web_server_task(settings))
}

async fn web_server_task(settings: Settings) -> anyhow::Result<()> {
    let database = DatabaseConnection::connect(&settings.database_url).await?;
    info!("database ready at {}", settings.database_url);

    let provider = build_provider(settings.clone(), database)?;

    // build our application with a route
    let app = Router::new()
        .route("/", get(index))
        .nest_service(
            "/static",
            ServiceBuilder::new().service(ServeDir::new("static")),
        )
        .merge(api::router())
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    info!("Shutting down...");

    Ok(())
}

fn build_provider(settings: Settings, database: DatabaseConnection) -> anyhow::Result<ServiceProvider> {
    let settings = Ref::new(settings);
    let database = Ref::new(database);
    let completion: Ref<dyn CompletionClient> = Ref::new(
        GeminiClient::new(settings.clone())
            .map_err(|e| anyhow!("failed to build the Gemini HTTP client: {e}"))?,
    );

    ServiceCollection::new()
        .add(singleton_as_self::<Settings>().from(move |_| settings.clone()))
        .add(singleton_as_self::<DatabaseConnection>().from(move |_| database.clone()))
        .add(singleton::<dyn CompletionClient, GeminiClient>().from(move |_| completion.clone()))
        .add(DbChatRepository::scoped())
        .add(MyChatService::scoped())
        .build_provider()
        .map_err(|e| anyhow!("invalid service configuration: {e:?}"))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(origins)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}
