pub mod config;
pub mod logging;

pub mod fetch;
pub mod harvest;
mod http;
pub mod source;
pub mod storage;
