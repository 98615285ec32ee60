//! Common test utilities for session integration tests

use bmi_calculator_cli::{
    config::{AppConfig, OutputFormat},
    session::{run_session, SessionSummary},
};
use tokio::io::{AsyncBufRead, AsyncRead, BufReader};

pub fn config(format: OutputFormat) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.format = format;
    config
}

/// Run a session over `input` and return its summary and output text
pub async fn run<R: AsyncBufRead + Unpin>(input: R, config: &AppConfig) -> (SessionSummary, String) {
    let mut out = Vec::new();
    let summary = run_session(input, &mut out, config)
        .await
        .expect("session failed");
    (summary, String::from_utf8(out).expect("output is not UTF-8"))
}

/// Run a session over a raw reader, such as a `tokio_test` mock
pub async fn run_reader<R: AsyncRead + Unpin>(input: R, config: &AppConfig) -> (SessionSummary, String) {
    run(BufReader::new(input), config).await
}

/// Parse JSON-mode output into one value per record
pub fn records(output: &str) -> Vec<serde_json::Value> {
    output
        .lines()
        .map(|line| serde_json::from_str(line).expect("record is not JSON"))
        .collect()
}

/// Records that carry a BMI result
pub fn results(output: &str) -> Vec<serde_json::Value> {
    records(output)
        .into_iter()
        .filter(|record| !record["result"].is_null())
        .collect()
}
