// This is the Lambda bootstrap entry point for the policy manager function

use ai_optout::api::handler;
use lambda_runtime::{Error, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    ai_optout::setup_logging();
    run(service_fn(handler)).await
}
