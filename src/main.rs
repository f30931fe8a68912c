use anyhow::{Context, Result};
use clap::Parser;
use interview_coach::{
    create_router, AppState, AuthServiceClient, Config, FeedbackStore, GeminiClient,
    HttpFeedbackStore, IdentityProvider, LanguageModel, MemoryFeedbackStore,
    StaticIdentityProvider,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "interview-coach", about = "Interview practice service")]
struct Args {
    /// Config file name (without extension)
    #[arg(long, default_value = "config/interview-coach")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("Interview Coach v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let api_key = std::env::var(&cfg.llm.api_key_env)
        .with_context(|| format!("Missing API key in ${}", cfg.llm.api_key_env))?;
    let llm: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(
        &cfg.llm.base_url,
        &cfg.llm.model,
        api_key,
    ));
    info!("Language model: {}", cfg.llm.model);

    let store: Arc<dyn FeedbackStore> = match &cfg.store.base_url {
        Some(base_url) => {
            info!("Feedback store: {}/{}", base_url, cfg.store.collection);
            Arc::new(HttpFeedbackStore::new(base_url, &cfg.store.collection))
        }
        None => {
            info!("No store URL configured; using in-memory feedback store");
            Arc::new(MemoryFeedbackStore::new())
        }
    };

    let identity: Arc<dyn IdentityProvider> = match &cfg.auth.verify_url {
        Some(verify_url) => {
            info!("Identity provider: {}", verify_url);
            Arc::new(AuthServiceClient::new(verify_url))
        }
        None => {
            info!("No identity provider configured; callers are anonymous");
            Arc::new(StaticIdentityProvider::signed_out())
        }
    };

    let state = AppState::new(llm, store, identity);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
