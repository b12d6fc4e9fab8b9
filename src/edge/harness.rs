//! Local stand-in for the platform's "test function" call.
//!
//! Feeds a literal event payload through the handler and reports the
//! function output together with how much of the compute budget the
//! invocation used, the two things the integration suite asserts on.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::edge::event::{EdgeResponse, ViewerRequestEvent};
use crate::edge::handler::handle_event;
use crate::engine::RedirectEngine;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Malformed event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// `{ "response": ... }` as the platform prints it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionOutput {
    pub response: EdgeResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Present when the function returned a response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_output: Option<FunctionOutput>,

    /// Present when the function failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_error_message: Option<String>,

    /// Percentage (0-100) of the compute budget used by the invocation.
    pub compute_utilization: u8,
}

/// Parse `event` and run it through the handler, measuring compute use.
///
/// Only the handler call is timed, not the JSON parse.
pub fn test_function(
    engine: &RedirectEngine,
    event: &[u8],
    budget: Duration,
) -> Result<TestResult, EventError> {
    let event: ViewerRequestEvent = serde_json::from_slice(event)?;

    let start = Instant::now();
    let outcome = handle_event(engine, &event);
    let elapsed = start.elapsed();

    let compute_utilization = utilization(elapsed, budget);
    tracing::debug!(elapsed = ?elapsed, compute_utilization, "Test invocation finished");

    Ok(match outcome {
        Ok(response) => TestResult {
            function_output: Some(FunctionOutput { response }),
            function_error_message: None,
            compute_utilization,
        },
        Err(e) => TestResult {
            function_output: None,
            function_error_message: Some(e.to_string()),
            compute_utilization,
        },
    })
}

fn utilization(elapsed: Duration, budget: Duration) -> u8 {
    let budget = budget.as_nanos().max(1);
    let percent = (elapsed.as_nanos() * 100).div_ceil(budget);
    percent.min(100) as u8
}
