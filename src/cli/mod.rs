pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod fill;
pub mod output;
pub mod page;
pub mod run;
pub mod runtime;
pub mod snapshot;
pub mod templates;
