use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::policy::DEFAULT_SERVICE;
use crate::errors::OptOutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Create,
    List,
    GetEffective,
}

impl FromStr for Action {
    type Err = OptOutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "list" => Ok(Action::List),
            "get_effective" => Ok(Action::GetEffective),
            other => Err(OptOutError::InvalidInput(format!("Invalid action: {other}"))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Create => "create",
            Action::List => "list",
            Action::GetEffective => "get_effective",
        };
        f.write_str(label)
    }
}

/// Lambda invocation payload. `action` stays a string here so that an unknown
/// label can be reported back verbatim.
#[derive(Debug, Default, Deserialize)]
pub struct OptOutRequest {
    pub action: Option<String>,
    pub account_id: Option<String>,
    pub details: Option<CreateDetails>,
}

impl OptOutRequest {
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unrecognized action label.
    pub fn action(&self) -> Result<Action, OptOutError> {
        self.action
            .as_deref()
            .map_or(Ok(Action::default()), str::parse::<Action>)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateDetails {
    pub account_opt_outs: Option<Vec<AccountOptOut>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountOptOut {
    pub account_id: Option<String>,
    #[serde(default = "default_services")]
    pub services: Vec<String>,
}

fn default_services() -> Vec<String> {
    vec![DEFAULT_SERVICE.to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPolicyResult {
    pub account_id: String,
    pub policy_id: String,
    pub policy_name: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateResult {
    pub org_policy: PolicyRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_opt_outs: Option<Vec<AccountPolicyResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub id: String,
    pub name: String,
}

/// A root, organizational unit, or account a policy is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyTarget {
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyListing {
    pub name: String,
    pub id: String,
    pub content: Value,
    pub targets: Vec<PolicyTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub policies: Vec<PolicyListing>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePolicyResult {
    pub account_id: String,
    pub effective_policy: Value,
}

/// One page of a paginated listing and the cursor for the next page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}
