mod basic;
mod problem;

use crate::Result;
use crate::analysis::{Analyzer, GenerativeModel, Sleep};
use crate::config;
use crate::logging::{DEFAULT, info, o};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_BODY_LIMIT: usize = 20 * 1024 * 1024;

pub struct AppState<M, S> {
    analyzer: Analyzer<M, S>,
}

impl<M, S> AppState<M, S> {
    pub fn new(analyzer: Analyzer<M, S>) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &Analyzer<M, S> {
        &self.analyzer
    }
}

pub fn router<M, S>(state: Arc<AppState<M, S>>, body_limit: usize) -> Router
where
    M: GenerativeModel + Send + Sync + 'static,
    S: Sleep + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    add_routes(
        Router::new(),
        &[
            basic::add_route::<Arc<AppState<M, S>>>,
            problem::add_route::<M, S>,
        ],
    )
    .with_state(state)
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(cors)
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}

pub async fn run<M, S>(analyzer: Analyzer<M, S>) -> Result<()>
where
    M: GenerativeModel + Send + Sync + 'static,
    S: Sleep + Send + Sync + 'static,
{
    let log = DEFAULT.new(o!("function" => "web::run"));

    let addr = config::get("SERVER_BIND_ADDRESS")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let body_limit = config::get("SERVER_BODY_LIMIT_BYTES")
        .and_then(|v| Ok(v.parse::<usize>()?))
        .unwrap_or(DEFAULT_BODY_LIMIT);

    let app = router(Arc::new(AppState::new(analyzer)), body_limit);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(log, "listening"; "addr" => %addr, "body_limit" => body_limit);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    Ok(())
}
