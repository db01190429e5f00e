pub mod config;
pub mod curl_runner;
pub mod output;
