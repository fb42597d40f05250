use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;

/// Content type of the Prometheus text format.
const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Serves the last published document.
///
/// The file is read on every request, so the endpoint never holds state of its own
/// and always returns one complete pass.
async fn metrics(State(path): State<Arc<PathBuf>>) -> Response {
    match tokio::fs::read(path.as_path()).await {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no document published at `{}` yet", path.display());
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "no metrics published yet",
            )
                .into_response()
        }
        Err(err) => {
            log::error!("Failed to read `{}`: {}", path.display(), err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read metrics",
            )
                .into_response()
        }
    }
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new(document_path: PathBuf) -> Self {
        let router = axum::Router::new()
            .route("/metrics", get(metrics))
            .with_state(Arc::new(document_path));
        Self { router }
    }

    pub async fn listen(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router.into_make_service()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_metrics_serves_published_document() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");
        crate::fsutil::write_atomic(&path, b"m{a=\"b\"} 1\n").unwrap();

        let response = metrics(State(Arc::new(path))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE
        );
        assert_eq!(body_string(response).await, "m{a=\"b\"} 1\n");
    }

    #[tokio::test]
    async fn test_metrics_before_first_publish() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");

        let response = metrics(State(Arc::new(path))).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_metrics_read_error() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");

        // reading a directory fails with something other than `NotFound`
        let response = metrics(State(Arc::new(tmp.path().to_path_buf()))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_server_over_tcp() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");
        crate::fsutil::write_atomic(&path, b"up 1\n").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(APIServer::new(path).listen(listener));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("up 1\n"));
    }
}
