#![deny(warnings)]

use snapsolve::analysis::{Analyzer, RetryPolicy, TokioSleep};
use snapsolve::logging::{DEFAULT, error, info, o};
use snapsolve::{gemini, web};

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up");

    let model = gemini::Client::new_default();
    let policy = RetryPolicy::from_config();
    info!(log, "retry policy";
        "max_attempts" => policy.max_attempts,
        "initial_backoff" => ?policy.initial_backoff,
    );
    let analyzer = Analyzer::new(model, TokioSleep, policy);

    match web::run(analyzer).await {
        Ok(_) => info!(log, "shutting down"),
        Err(err) => error!(log, "shutting down: {:?}", err),
    }
}
