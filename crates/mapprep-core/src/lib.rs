pub mod config;
pub mod logging;

pub mod archive;
pub mod fetch;
pub mod pipeline;
pub mod readme;
pub mod rewrite;
