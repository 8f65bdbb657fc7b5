//! End-to-end HTTP tests: an in-process server over a scripted database and a mock model,
//! exercised with `reqwest`. Run with `--nocapture` to see received bodies.

mod common;
mod errors;
mod explorer;
mod init_logging;
mod query;
