//! AWS Lambda handler for running calculators
//!
//! Accepts either a single calculation request or a batch of them as JSON and
//! returns the outcome envelope for each. Guardrails come from `CALC_GUARDRAILS`
//! when it is set.

use calculator_suite::{CalculationRequest, CalculationResponse, CalculatorRunner};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Incoming event: one request, or `{ "requests": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LambdaRequest {
    Batch { requests: Vec<CalculationRequest> },
    Single(CalculationRequest),
}

#[derive(Debug, Serialize)]
pub struct LambdaResponse {
    pub results: Vec<CalculationResponse>,
    pub execution_time_ms: u64,
}

async fn handler(
    runner: &CalculatorRunner,
    event: LambdaEvent<LambdaRequest>,
) -> Result<LambdaResponse, Error> {
    let start = std::time::Instant::now();

    let results = match event.payload {
        LambdaRequest::Single(request) => vec![runner.run_request(&request)],
        LambdaRequest::Batch { requests } => runner.run_batch(&requests),
    };

    Ok(LambdaResponse {
        results,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let runner = CalculatorRunner::from_env()?;
    let runner = &runner;
    run(service_fn(move |event| async move { handler(runner, event).await })).await
}
