use axum::{Router, routing::get};

pub fn add_route<S>(app: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    app.route("/healthcheck", get(|| async { "OK" }))
}
