#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod inspect;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod plot;
pub mod run;
pub mod summary;
pub mod warnings;
