use crate::config;
use once_cell::sync::Lazy;
pub use slog::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Term,
}

impl Format {
    /// Anything other than `json` falls back to the terminal format.
    fn from_config_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Format::Json
        } else {
            Format::Term
        }
    }
}

fn wrap<D>(drain: D) -> Fuse<slog_async::Async>
where
    D: Drain<Err = Never, Ok = ()> + Send + 'static,
{
    slog_async::Async::new(slog_envlogger::new(drain))
        .chan_size(2 << 12)
        .thread_name("snapsolve-log".into())
        .build()
        .fuse()
}

pub static DEFAULT: Lazy<Logger> = Lazy::new(|| {
    let mk_term = || {
        slog_term::FullFormat::new(slog_term::TermDecorator::new().build())
            .build()
            .fuse()
    };

    let mk_json = || slog_json::Json::default(std::io::stdout()).fuse();

    let format = config::get("RUST_LOG_FORMAT").unwrap_or_default();
    let drain = match Format::from_config_value(&format) {
        Format::Json => wrap(mk_json()),
        Format::Term => wrap(mk_term()),
    };

    Logger::root(
        drain,
        o!(
            "service" => env!("CARGO_PKG_NAME"),
            "version" => env!("CARGO_PKG_VERSION"),
            "build" => option_env!("SNAPSOLVE_BUILD_ID").unwrap_or("dev"),
        ),
    )
});
