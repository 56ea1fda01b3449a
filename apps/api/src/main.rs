mod config;
mod db;
mod errors;
mod extraction;
mod matching;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::extractor::ResumeExtractor;
use crate::extraction::reader::StoredDocumentReader;
use crate::extraction::vocabulary::Vocabulary;
use crate::matching::scorer::WeightedMatchScorer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgPortalStore, S3ResumeStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgPortalStore::new(db));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let storage = Arc::new(S3ResumeStorage::new(s3, config.s3_bucket.clone()));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Keyword vocabularies: built-in lists unless VOCABULARY_PATH overrides them
    let vocabulary = Vocabulary::load(config.vocabulary_path.as_deref())?;
    info!(
        "Vocabulary loaded: {} skills, {} education terms",
        vocabulary.skill_count(),
        vocabulary.education_count()
    );
    let extractor = Arc::new(ResumeExtractor::new(Arc::new(vocabulary)));

    let reader = Arc::new(StoredDocumentReader::new(
        storage.clone(),
        config.doc_converter.clone(),
    ));
    info!("Legacy .doc converter: {}", config.doc_converter);

    // Build app state
    let state = AppState {
        store,
        storage,
        reader,
        extractor,
        scorer: Arc::new(WeightedMatchScorer::default()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobmatch-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
