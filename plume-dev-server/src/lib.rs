use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

/// Configuration for the preview server
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Generated output directory to serve
    pub root: PathBuf,
    /// Auto-open browser
    pub open: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            root: PathBuf::from("./output"),
            open: false,
        }
    }
}

/// A static file server over the generated output directory.
///
/// Serves until the operator interrupts the process; there is no cleanup
/// to do on shutdown since nothing here mutates the output.
pub struct PreviewServer {
    config: PreviewConfig,
}

impl PreviewServer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        Ok(addr)
    }

    /// Serve the output directory. Blocks until interrupted.
    pub async fn run(self) -> Result<()> {
        if !self.config.root.is_dir() {
            anyhow::bail!(
                "output directory does not exist: {} (run a build first)",
                self.config.root.display()
            );
        }

        let app = Router::new().fallback_service(ServeDir::new(&self.config.root));
        let addr = self.addr()?;

        // Claim success only once the port is actually ours
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        println!("Serving {} at http://{} ...", self.config.root.display(), addr);

        if self.config.open {
            if let Err(e) = open::that(format!("http://{}", addr)) {
                log::warn!("failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_from_host_and_port() {
        let server = PreviewServer::new(PreviewConfig::default());
        assert_eq!(server.addr().unwrap().to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_addr_rejects_garbage_host() {
        let server = PreviewServer::new(PreviewConfig {
            host: "not a host".to_string(),
            ..PreviewConfig::default()
        });
        assert!(server.addr().is_err());
    }

    #[tokio::test]
    async fn test_run_reports_bind_failure() {
        let dir = tempfile::tempdir().unwrap();
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let server = PreviewServer::new(PreviewConfig {
            port,
            root: dir.path().to_path_buf(),
            ..PreviewConfig::default()
        });

        let err = server.run().await.unwrap_err();
        assert!(err.to_string().contains("failed to bind"));
    }

    #[tokio::test]
    async fn test_run_requires_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let server = PreviewServer::new(PreviewConfig {
            root: dir.path().join("missing"),
            ..PreviewConfig::default()
        });

        assert!(server.run().await.is_err());
    }
}
