pub mod cli;
pub mod config;
pub mod fetch;
pub mod history_audit;
pub mod history_parse;
pub mod history_run;
pub mod http_client;
pub mod logging;
pub mod normalize;
pub mod persist;
pub mod records;
pub mod registry;
