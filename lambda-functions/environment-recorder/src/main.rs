use environment_recorder::{DynamoEnvironmentStore, EnvironmentRecorder, HttpResponse, RecorderConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

async fn function_handler(
    recorder: &EnvironmentRecorder<DynamoEnvironmentStore>,
    event: LambdaEvent<Value>,
) -> Result<HttpResponse, Error> {
    Ok(recorder.handle_value(event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    // Built once per process and shared by every invocation.
    let config = RecorderConfig::from_env();
    let store = DynamoEnvironmentStore::from_config(&config).await;
    info!(
        table = %store.table_name(),
        consistent_read = config.consistent_read,
        "Starting environment recorder"
    );

    let recorder = EnvironmentRecorder::new(store);
    run(service_fn(|event| function_handler(&recorder, event))).await
}
