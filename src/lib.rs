// snapsolve: photographed problem in, formatted AI solution out.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod gemini;
pub mod logging;
pub mod payload;
pub mod web;

type Result<T> = anyhow::Result<T>;
