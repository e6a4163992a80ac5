use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Instant,
};

use axum::{
    body::Body,
    extract::Request,
    http::{uri::PathAndQuery, Uri},
    middleware::{self, Next},
    response::Response,
    Router,
};
use log::{debug, info, warn};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::ServeDir;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("static file service unavailable: {0}")]
    ServiceUnavailable(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 0 lets the OS pick a free port.
    pub port: u16,
    pub public_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 0,
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Serves files under `public_dir`. A missing extensionless path is retried
/// with `.html` appended, so `/about` finds `about.html`.
pub fn router(public_dir: impl AsRef<Path>) -> Router {
    let root = public_dir.as_ref();
    let with_html = ServeDir::new(root).map_request(append_html_extension);
    let files = ServeDir::new(root).fallback(with_html);

    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn(log_request))
}

pub async fn bind(config: &Config) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    Ok(TcpListener::bind(addr).await?)
}

pub async fn serve(listener: TcpListener, public_dir: impl AsRef<Path>) -> Result<(), ServerError> {
    let public_dir = public_dir.as_ref();
    if !public_dir.is_dir() {
        warn!("{} is not a directory, every request will 404", public_dir.display());
    }

    let port = listener.local_addr()?.port();
    info!("Server listening on http://localhost:{port}");
    axum::serve(listener, router(public_dir)).await?;
    Ok(())
}

fn append_html_extension(mut req: Request<Body>) -> Request<Body> {
    let path = req.uri().path();
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() || last.contains('.') {
        return req;
    }

    let rewritten = match req.uri().query() {
        Some(query) => format!("{path}.html?{query}"),
        None => format!("{path}.html"),
    };
    let Ok(path_and_query) = rewritten.parse::<PathAndQuery>() else {
        return req;
    };

    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *req.uri_mut() = uri;
    }
    req
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let resp = next.run(req).await;

    debug!(
        "{method} {path} -> {} in {:?}",
        resp.status(),
        start.elapsed()
    );
    resp
}
