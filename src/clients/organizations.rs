//! AWS Organizations client
//!
//! `OrganizationsApi` is the narrow set of control-plane calls the policy
//! manager needs. `OrganizationsClient` implements it on top of
//! `aws-sdk-organizations`; each call is a single request, paging is left to
//! the caller through `Page::next_token`.

use async_trait::async_trait;
use aws_sdk_organizations::Client;
use aws_sdk_organizations::error::DisplayErrorContext;
use aws_sdk_organizations::types::{EffectivePolicyType, PolicyType};
use tracing::debug;

use crate::core::models::{Page, PolicySummary, PolicyTarget};
use crate::errors::OptOutError;

#[async_trait]
pub trait OrganizationsApi: Send + Sync {
    /// One page of AI services opt-out policies.
    async fn list_policies(&self, next_token: Option<String>)
    -> Result<Page<PolicySummary>, OptOutError>;

    /// Raw JSON content of a policy.
    async fn describe_policy(&self, policy_id: &str) -> Result<String, OptOutError>;

    /// One page of targets the policy is attached to.
    async fn list_targets_for_policy(
        &self,
        policy_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<PolicyTarget>, OptOutError>;

    /// Creates an AI services opt-out policy and returns its id.
    async fn create_policy(
        &self,
        name: &str,
        description: &str,
        content: &str,
    ) -> Result<String, OptOutError>;

    async fn attach_policy(&self, policy_id: &str, target_id: &str) -> Result<(), OptOutError>;

    /// Ids of the organization roots.
    async fn list_roots(&self) -> Result<Vec<String>, OptOutError>;

    /// Raw JSON content of the effective opt-out policy for a target.
    async fn describe_effective_policy(&self, target_id: &str) -> Result<String, OptOutError>;
}

fn aws_error<E>(operation: &str, error: &E) -> OptOutError
where
    E: std::error::Error,
{
    OptOutError::AwsError(format!("{operation}: {}", DisplayErrorContext(error)))
}

pub struct OrganizationsClient {
    client: Client,
}

impl OrganizationsClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration (region, credentials).
    pub async fn from_env() -> Self {
        let shared_config = aws_config::from_env().load().await;
        Self::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl OrganizationsApi for OrganizationsClient {
    async fn list_policies(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<PolicySummary>, OptOutError> {
        let resp = self
            .client
            .list_policies()
            .filter(PolicyType::AiservicesOptOutPolicy)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| aws_error("list_policies", &e))?;

        let items = resp
            .policies()
            .iter()
            .filter_map(|p| {
                Some(PolicySummary {
                    id: p.id()?.to_string(),
                    name: p.name().unwrap_or_default().to_string(),
                })
            })
            .collect();

        Ok(Page {
            items,
            next_token: resp.next_token().map(ToString::to_string),
        })
    }

    async fn describe_policy(&self, policy_id: &str) -> Result<String, OptOutError> {
        let resp = self
            .client
            .describe_policy()
            .policy_id(policy_id)
            .send()
            .await
            .map_err(|e| aws_error("describe_policy", &e))?;

        Ok(resp
            .policy()
            .and_then(|p| p.content())
            .unwrap_or("{}")
            .to_string())
    }

    async fn list_targets_for_policy(
        &self,
        policy_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<PolicyTarget>, OptOutError> {
        let resp = self
            .client
            .list_targets_for_policy()
            .policy_id(policy_id)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| aws_error("list_targets_for_policy", &e))?;

        let items = resp
            .targets()
            .iter()
            .filter_map(|t| {
                Some(PolicyTarget {
                    target_id: t.target_id()?.to_string(),
                    arn: t.arn().map(ToString::to_string),
                    name: t.name().map(ToString::to_string),
                    target_type: t.r#type().map(|ty| ty.as_str().to_string()),
                })
            })
            .collect();

        Ok(Page {
            items,
            next_token: resp.next_token().map(ToString::to_string),
        })
    }

    async fn create_policy(
        &self,
        name: &str,
        description: &str,
        content: &str,
    ) -> Result<String, OptOutError> {
        let resp = self
            .client
            .create_policy()
            .content(content)
            .description(description)
            .name(name)
            .r#type(PolicyType::AiservicesOptOutPolicy)
            .send()
            .await
            .map_err(|e| aws_error("create_policy", &e))?;

        let policy_id = resp
            .policy()
            .and_then(|p| p.policy_summary())
            .and_then(|s| s.id())
            .ok_or_else(|| {
                OptOutError::AwsError(format!("create_policy: no policy id returned for {name}"))
            })?;

        debug!(policy_id, policy_name = name, "Created policy");
        Ok(policy_id.to_string())
    }

    async fn attach_policy(&self, policy_id: &str, target_id: &str) -> Result<(), OptOutError> {
        self.client
            .attach_policy()
            .policy_id(policy_id)
            .target_id(target_id)
            .send()
            .await
            .map_err(|e| aws_error("attach_policy", &e))?;
        Ok(())
    }

    async fn list_roots(&self) -> Result<Vec<String>, OptOutError> {
        let resp = self
            .client
            .list_roots()
            .send()
            .await
            .map_err(|e| aws_error("list_roots", &e))?;

        Ok(resp
            .roots()
            .iter()
            .filter_map(|r| r.id().map(ToString::to_string))
            .collect())
    }

    async fn describe_effective_policy(&self, target_id: &str) -> Result<String, OptOutError> {
        let resp = self
            .client
            .describe_effective_policy()
            .policy_type(EffectivePolicyType::AiservicesOptOutPolicy)
            .target_id(target_id)
            .send()
            .await
            .map_err(|e| aws_error("describe_effective_policy", &e))?;

        Ok(resp
            .effective_policy()
            .and_then(|p| p.policy_content())
            .unwrap_or("{}")
            .to_string())
    }
}
