/// AI services opt-out policy manager for AWS Organizations.
///
/// This crate implements a single Lambda function that manages
/// `AISERVICES_OPT_OUT_POLICY` policies:
/// 1. `create` - an organization-wide opt-out policy on the root, plus
///    optional per-account override policies
/// 2. `list` - every opt-out policy with its content and targets
/// 3. `get_effective` - the effective opt-out policy of one account
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - aws-sdk-organizations for the Organizations control plane
/// - serde for the typed policy documents and the `{statusCode, body}` envelope
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use ai_optout::clients::OrganizationsClient;
/// use ai_optout::core::config::AppConfig;
/// use ai_optout::policies::PolicyManager;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     ai_optout::setup_logging();
///
///     let config = AppConfig::default();
///     let client = OrganizationsClient::from_env().await;
///     let manager = PolicyManager::new(&client, &config);
///
///     for policy in manager.list_policies().await?.policies {
///         println!("{} ({}): {} targets", policy.name, policy.id, policy.targets.len());
///     }
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod policies;

pub use errors::OptOutError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to `CloudWatch` Logs. The level comes from `RUST_LOG` and
/// defaults to `info` (`debug` with the `debug-logs` feature). Calling it
/// again after a subscriber is installed has no effect.
///
/// # Example
///
/// ```
/// ai_optout::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    #[cfg(feature = "debug-logs")]
    let default_level = "debug";
    #[cfg(not(feature = "debug-logs"))]
    let default_level = "info";

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
