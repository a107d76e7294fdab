//! Lambda handler - parses the invocation and dispatches on `action`.

use super::helpers;
use crate::clients::{OrganizationsApi, OrganizationsClient};
use crate::core::config::AppConfig;
use crate::core::models::{Action, OptOutRequest};
use crate::policies::PolicyManager;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

/// Lambda handler for the policy manager.
///
/// Failures are reported in the response as `statusCode` 400/500, not as a
/// Lambda error.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<impl Serialize, Error> {
    let config = AppConfig::from_env();

    let client = OrganizationsClient::from_env().await;
    Ok(dispatch(&event.payload, &config, &client).await)
}

/// Routes one invocation payload to its operation and builds the response.
///
/// Input errors are answered with a 400 before `api` is called.
pub async fn dispatch<A: OrganizationsApi>(payload: &Value, config: &AppConfig, api: &A) -> Value {
    let request: OptOutRequest = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid request payload: {}", e);
            return helpers::err_response(400, &format!("Invalid request: {e}"));
        }
    };

    let action = match request.action() {
        Ok(a) => a,
        Err(e) => {
            error!("{}", e);
            return helpers::error_for("Invalid request", &e);
        }
    };
    info!(%action, "Dispatching request");

    let manager = PolicyManager::new(api, config);

    match action {
        Action::Create => match manager.create_policies(request.details.as_ref()).await {
            Ok(result) => helpers::ok_json(&result),
            Err(e) => {
                error!("Error creating policies: {}", e);
                helpers::error_for("Error creating policies", &e)
            }
        },
        Action::List => match manager.list_policies().await {
            Ok(result) => helpers::ok_json(&result),
            Err(e) => {
                error!("Error listing policies: {}", e);
                helpers::error_for("Error listing policies", &e)
            }
        },
        Action::GetEffective => {
            let account_id = request
                .account_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .or(config.target_account_id.as_deref());
            let Some(account_id) = account_id else {
                return helpers::err_response(400, "account_id is required");
            };

            match manager.get_effective_policy(account_id).await {
                Ok(result) => helpers::ok_json(&result),
                Err(e) => {
                    error!(account_id, "Error getting effective policy: {}", e);
                    helpers::error_for("Error getting effective policy", &e)
                }
            }
        }
    }
}
