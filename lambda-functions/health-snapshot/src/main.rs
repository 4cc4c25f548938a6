use health_snapshot::HealthSnapshot;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::debug;

async fn function_handler(_event: LambdaEvent<Value>) -> Result<HealthSnapshot, Error> {
    let snapshot = HealthSnapshot::generate();

    for entry in &snapshot.services {
        debug!(service = %entry.name, status = %entry.status, "Generated service status");
    }

    Ok(snapshot)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(function_handler)).await
}
