use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use listing_api::config::AppConfig;
use listing_api::testing::{new_user, MemoryRepository};
use listing_api::AppState;
use reqwest::StatusCode;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub repo: Arc<MemoryRepository>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Serves the real router over an in-memory repository on a free port.
    pub async fn spawn(repo: Arc<MemoryRepository>) -> Result<Self> {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        Self::spawn_with_config(repo, config).await
    }

    pub async fn spawn_with_config(repo: Arc<MemoryRepository>, config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let app = listing_api::app(AppState::new(repo.clone()), &config);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, repo, task };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Repository with one category ("Residential") and one owner ("Jane Doe").
/// Returns the repository with the category and owner ids.
pub async fn seeded_repo() -> Result<(Arc<MemoryRepository>, i32, i32)> {
    use listing_api::database::UserRepository;

    let repo = Arc::new(MemoryRepository::new());
    let category_id = repo.add_category("Residential");
    let user_id = repo
        .create_user(&new_user("jane@example.com", "correct-hash", "Jane Doe"))
        .await?;
    Ok((repo, category_id, user_id))
}
