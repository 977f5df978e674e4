// The binary entry point is main.rs; the library target carries the whole
// module tree so integration tests can drive a quiz through `quizdr::*`.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
