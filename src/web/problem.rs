use super::AppState;
use crate::analysis::{GenerativeModel, Sleep, Solution};
use crate::logging::{DEFAULT, error, info, o, warn};
use crate::payload::ImagePayload;
use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const NO_IMAGE: &str = "no image provided";
const INVALID_IMAGE: &str = "invalid image payload";
const SERVER_ERROR: &str = "server error";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: Option<Value>,
}

enum ImageField<'a> {
    Missing,
    Text(&'a str),
    NotText,
}

impl AnalyzeRequest {
    /// `null`, `false`, `0` and blank strings all count as no image.
    fn image(&self) -> ImageField<'_> {
        match &self.image {
            None | Some(Value::Null) | Some(Value::Bool(false)) => ImageField::Missing,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => ImageField::Missing,
            Some(Value::String(s)) if s.trim().is_empty() => ImageField::Missing,
            Some(Value::String(s)) => ImageField::Text(s),
            Some(_) => ImageField::NotText,
        }
    }
}

#[derive(Debug, Serialize)]
struct SolutionBody {
    solution: Solution,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

pub fn add_route<M, S>(app: Router<Arc<AppState<M, S>>>) -> Router<Arc<AppState<M, S>>>
where
    M: GenerativeModel + Send + Sync + 'static,
    S: Sleep + Send + Sync + 'static,
{
    app.route("/api/analyze-problem", post(analyze_problem::<M, S>))
}

async fn analyze_problem<M, S>(
    State(state): State<Arc<AppState<M, S>>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response
where
    M: GenerativeModel + Send + Sync + 'static,
    S: Sleep + Send + Sync + 'static,
{
    let log = DEFAULT.new(o!("function" => "analyze_problem"));
    info!(log, "start");

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(log, "request body too large"; "error" => %rejection);
            return rejection.into_response();
        }
        Err(rejection) => {
            error!(log, "failed to read request body"; "error" => %rejection);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
        }
    };

    let image = match request.image() {
        ImageField::Text(image) => image,
        ImageField::Missing => {
            info!(log, "no image in request");
            return error_response(StatusCode::BAD_REQUEST, NO_IMAGE);
        }
        ImageField::NotText => {
            info!(log, "image is not a string");
            return error_response(StatusCode::BAD_REQUEST, INVALID_IMAGE);
        }
    };

    let payload = match ImagePayload::from_data_uri(image) {
        Ok(payload) => payload,
        Err(err) => {
            info!(log, "rejected image"; "error" => %err);
            return error_response(StatusCode::BAD_REQUEST, INVALID_IMAGE);
        }
    };

    let task = tokio::spawn(async move { state.analyzer().analyze(&payload).await });
    match task.await {
        Ok(solution) => {
            info!(log, "done"; "overloaded" => solution.is_overloaded());
            (StatusCode::OK, Json(SolutionBody { solution })).into_response()
        }
        Err(err) => {
            error!(log, "analysis task failed"; "error" => %err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
        }
    }
}
