pub mod api;
pub mod config;
pub mod confirm;
pub mod credentials;
pub mod fetch;
pub mod output;
pub mod rules;
pub mod tui;
