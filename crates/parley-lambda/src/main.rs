use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use parley_chat::turn::ChatDeps;
use parley_lambda::router;
use parley_lambda::state::AppState;
use parley_openai::client::OpenAiClient;
use parley_openai::config::OpenAiConfig;
use parley_storage::memory::MemoryProjectStore;
use parley_storage::s3::S3ProjectStore;
use parley_storage::store::ProjectStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let store: Arc<dyn ProjectStore> = match env::var("PARLEY_BUCKET") {
        Ok(bucket) if !bucket.trim().is_empty() => {
            let s3 = parley_storage::client::build_client().await;
            tracing::info!(bucket = %bucket, "using S3 project store");
            Arc::new(S3ProjectStore::new(s3, bucket))
        }
        _ => {
            tracing::warn!("PARLEY_BUCKET not set, using in-memory project store");
            Arc::new(MemoryProjectStore::new())
        }
    };

    let config = OpenAiConfig::from_env()?;
    tracing::info!(
        chat_model = %config.chat_model,
        image_model = %config.image_model,
        "completion client configured"
    );
    let client = OpenAiClient::new(config)?;

    let state = AppState {
        chat: ChatDeps::with_client(store, client),
    };

    lambda_http::run(router(state)).await.map_err(|e| eyre::eyre!(e))
}
