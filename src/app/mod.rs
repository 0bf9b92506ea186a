mod commands;

use crate::{cli, context, repository::BannersRepository, rest};
use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The main application state.
/// Decoupled from CLI parsing so it can be built directly in tests.
pub struct App {
    ctx: context::Context,
    repository: rest::SharedRepository,
    shutdown: CancellationToken,
}

impl App {
    /// Parses the CLI, routes logs, and opens the banner store.
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::logging::set_log_file(ctx.log_file.as_deref()).context("opening log file")?;
        log_startup_info(&ctx);

        let repository = init_repository(&ctx)?;
        Ok((Self::new(ctx, repository), cli))
    }

    pub fn new(ctx: context::Context, repository: rest::SharedRepository) -> Self {
        Self {
            ctx,
            repository,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serves HTTP until Ctrl-C, the shutdown token, or a server failure.
    pub async fn run_daemon(&self) -> Result<()> {
        if let Some(path) = self.ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.to_string_lossy());
        }

        let mut http_handle = self.spawn_http_server();
        self.wait_for_shutdown(&mut http_handle).await
    }

    fn spawn_http_server(&self) -> JoinHandle<()> {
        let addr = self.ctx.api_listen;
        let repository = self.repository.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            if let Err(e) = rest::serve(addr, repository, token).await {
                log::error!("HTTP server failed: {:#}", e);
            }
        })
    }

    async fn wait_for_shutdown(&self, http_task: &mut JoinHandle<()>) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("🧨 Ctrl-C received, shutting down..."),
            _ = self.shutdown.cancelled() => log::info!("🧨 Shutdown requested"),
            _ = &mut *http_task => log::error!("HTTP task exited unexpectedly"),
        }

        self.shutdown.cancel();

        // Polling a finished JoinHandle again panics.
        if !http_task.is_finished() {
            http_task.await.context("joining HTTP task")?;
        }

        log::info!("✅ Shutdown complete");
        Ok(())
    }
}

fn log_startup_info(ctx: &context::Context) {
    log::info!("🚀 Starting bannerflow");
    log::info!("🗄️ Store endpoint: {}", ctx.store.endpoint);
    log::info!("📂 Database: {}", ctx.store.database);
    log::info!("🗂️ Collection: {}", ctx.store.collection);
}

fn init_repository(ctx: &context::Context) -> Result<rest::SharedRepository> {
    let repository = BannersRepository::connect(&ctx.store).with_context(|| {
        format!(
            "opening document store {} (database {}, collection {})",
            ctx.store.endpoint, ctx.store.database, ctx.store.collection
        )
    })?;
    Ok(Arc::new(repository))
}

// --- Entry Point ---

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        return cmd.run(app.repository.as_ref()).await;
    }

    app.run_daemon().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;

    fn make_app(api_listen: &str) -> App {
        let ctx = context::Context {
            store: StoreConfig::in_memory("banners"),
            api_listen: api_listen.parse().unwrap(),
            log_file: None,
        };
        let repository = init_repository(&ctx).unwrap();
        App::new(ctx, repository)
    }

    #[test]
    fn init_repository_reports_bad_store_config() {
        let ctx = context::Context {
            store: StoreConfig::new("sqlite::memory:", "db", "bad name"),
            api_listen: "127.0.0.1:0".parse().unwrap(),
            log_file: None,
        };
        let err = init_repository(&ctx).err().expect("invalid collection must fail");
        assert!(format!("{err:#}").contains("opening document store"));
    }

    #[tokio::test]
    async fn wait_for_shutdown_exits_when_task_finishes() {
        let app = make_app("127.0.0.1:0");

        let mut http_task = tokio::spawn(async {});

        let res = app.wait_for_shutdown(&mut http_task).await;
        assert!(res.is_ok());
        assert!(app.shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn run_daemon_serves_health_until_cancelled() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let app = Arc::new(make_app(&format!("127.0.0.1:{port}")));
        let token = app.shutdown_token();
        let daemon = {
            let app = app.clone();
            tokio::spawn(async move { app.run_daemon().await })
        };

        let mut response = String::new();
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            if let Ok(mut stream) = tokio::net::TcpStream::connect(("127.0.0.1", port)).await {
                use tokio::io::{AsyncReadExt, AsyncWriteExt};
                stream
                    .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                    .await
                    .unwrap();
                let mut buffer = Vec::new();
                stream.read_to_end(&mut buffer).await.unwrap();
                response = String::from_utf8_lossy(&buffer).into_owned();
                break;
            }
        }

        assert!(response.contains("200 OK"), "no health response: {response}");
        assert!(response.contains("uptime_secs"));

        token.cancel();
        daemon.await.unwrap().unwrap();
    }
}
