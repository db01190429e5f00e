use crate::application::builders::command_builder;
use crate::application::parsers::{request, response};
use crate::infrastructure::config::Config;
use crate::infrastructure::curl_runner::RunnerError;
use crate::infrastructure::output;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Subprocess seam so the orchestrator can be exercised without curl.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str, timeout_secs: u64) -> Result<CommandOutput, RunnerError>;
}

/// Raw streams of a finished curl run. Kept separate; the response
/// parser decides which one holds the response.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Elapsed-time strings keyed by response destination, shared across
/// concurrent executions. Process-lifetime state, never evicted.
#[derive(Debug, Clone, Default)]
pub struct TimingStore(Arc<Mutex<HashMap<String, String>>>);

impl TimingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, destination: &str, elapsed_secs: f64) {
        let mut timings = self.0.lock().unwrap();
        timings.insert(destination.to_string(), format!("{elapsed_secs:.2}"));
    }

    pub fn get(&self, destination: &str) -> Option<String> {
        self.0.lock().unwrap().get(destination).cloned()
    }
}

/// Outcome of one request execution, ready for presentation.
#[derive(Debug, Clone)]
pub struct Execution {
    pub status_code: u16,
    pub status_text: String,
    pub rendered: String,
    pub elapsed_secs: f64,
}

/// Orchestrates one request: parse, build, run (timed), parse response,
/// format. Any stage failure aborts the whole execution; nothing
/// partial is ever emitted.
pub struct RequestService {
    runner: Box<dyn CommandRunner>,
    config: Config,
    timings: TimingStore,
}

impl RequestService {
    pub fn new(runner: Box<dyn CommandRunner>, config: Config, timings: TimingStore) -> Self {
        Self {
            runner,
            config,
            timings,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timings(&self) -> &TimingStore {
        &self.timings
    }

    /// Executes the request in `text`, recording its duration under
    /// `destination`. Only the subprocess run is timed.
    pub async fn execute(&self, text: &str, destination: &str) -> Result<Execution> {
        let spec = request::parse(text)
            .ok_or_else(|| anyhow!("no request could be parsed from the input"))?;
        let command = command_builder::build(&spec);
        debug!("invoking: {command}");

        let started = Instant::now();
        let output = self
            .runner
            .run(&command, self.config.timeout_secs)
            .await?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        let result = response::parse(&output.stdout, &output.stderr);
        let body = output::format_body(&result.body, result.header("content-type"));
        let rendered = output::render_response(&result, &body);

        self.timings.record(destination, elapsed_secs);

        Ok(Execution {
            status_code: result.status_code,
            status_text: result.status_text,
            rendered,
            elapsed_secs,
        })
    }
}
