//! Policy manager: the create, list, and effective-policy operations.
//!
//! Every operation is a short sequence of Organizations calls. Nothing is
//! rolled back: if account `n` fails during `create_policies`, the org policy
//! and accounts `0..n` stay created and attached.

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

use super::naming::timestamped_name;
use crate::clients::OrganizationsApi;
use crate::core::config::AppConfig;
use crate::core::models::{
    AccountPolicyResult, CreateDetails, CreateResult, EffectivePolicyResult, ListResult,
    PolicyListing, PolicyRef, PolicySummary, PolicyTarget,
};
use crate::core::policy::{Decision, PolicyDocument};
use crate::errors::OptOutError;

const ORG_POLICY_DESCRIPTION: &str = "Organization-wide AI opt-out policy";

/// Account-level override: opts the account back in to everything except
/// `services`. Listing `default` opts the account out of everything.
#[must_use]
pub fn build_account_policy(services: &[String]) -> PolicyDocument {
    services
        .iter()
        .fold(PolicyDocument::new(Decision::OptIn), |doc, service| {
            doc.with(service, Decision::OptOut)
        })
}

pub struct PolicyManager<'a, A: OrganizationsApi> {
    api: &'a A,
    config: &'a AppConfig,
}

impl<'a, A: OrganizationsApi> PolicyManager<'a, A> {
    pub fn new(api: &'a A, config: &'a AppConfig) -> Self {
        Self { api, config }
    }

    async fn all_policies(&self) -> Result<Vec<PolicySummary>, OptOutError> {
        let mut policies = Vec::new();
        let mut next_token = None;
        loop {
            let page = self.api.list_policies(next_token).await?;
            policies.extend(page.items);
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(policies),
            }
        }
    }

    async fn all_targets(&self, policy_id: &str) -> Result<Vec<PolicyTarget>, OptOutError> {
        let mut targets = Vec::new();
        let mut next_token = None;
        loop {
            let page = self.api.list_targets_for_policy(policy_id, next_token).await?;
            targets.extend(page.items);
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(targets),
            }
        }
    }

    /// Opt-out policies whose name starts with `prefix`. A listing failure is
    /// logged and reported as no matches.
    pub async fn find_policies_by_name_prefix(&self, prefix: &str) -> Vec<PolicySummary> {
        match self.all_policies().await {
            Ok(policies) => policies
                .into_iter()
                .filter(|p| p.name.starts_with(prefix))
                .collect(),
            Err(e) => {
                error!(prefix, "Error finding AI opt-out policy: {}", e);
                Vec::new()
            }
        }
    }

    /// `base` if no existing policy name starts with it, otherwise `base`
    /// with a timestamp suffix. Not atomic against concurrent invocations.
    pub async fn unique_name(&self, base: &str) -> String {
        if self.find_policies_by_name_prefix(base).await.is_empty() {
            base.to_string()
        } else {
            timestamped_name(base, Utc::now())
        }
    }

    /// Creates a new policy under a deduplicated name and attaches it to
    /// `target_id` when given. Existing policies are never modified.
    ///
    /// # Errors
    ///
    /// Propagates any serialization or Organizations failure.
    pub async fn create_or_update_policy(
        &self,
        name: &str,
        document: &PolicyDocument,
        description: &str,
        target_id: Option<&str>,
    ) -> Result<PolicyRef, OptOutError> {
        let result = async {
            let policy_name = self.unique_name(name).await;
            let content = document.to_json()?;

            #[cfg(feature = "debug-logs")]
            info!(policy_name = %policy_name, content = %content, "Creating policy");
            #[cfg(not(feature = "debug-logs"))]
            info!(policy_name = %policy_name, "Creating policy");

            let policy_id = self
                .api
                .create_policy(&policy_name, description, &content)
                .await?;
            if let Some(target) = target_id {
                self.api.attach_policy(&policy_id, target).await?;
                info!(policy_id = %policy_id, target_id = target, "Attached policy");
            }
            Ok::<_, OptOutError>(PolicyRef {
                id: policy_id,
                name: policy_name,
            })
        }
        .await;

        if let Err(e) = &result {
            error!(policy_name = name, "Error in create_or_update_policy: {}", e);
        }
        result
    }

    /// Creates and attaches the account-level override policy for `account_id`.
    ///
    /// # Errors
    ///
    /// Same as [`PolicyManager::create_or_update_policy`].
    pub async fn create_account_policy(
        &self,
        account_id: &str,
        services: &[String],
    ) -> Result<PolicyRef, OptOutError> {
        let document = build_account_policy(services);
        let description = format!("Account-specific AI opt-out policy for {account_id}");
        self.create_or_update_policy(
            &self.config.account_policy_name(account_id),
            &document,
            &description,
            Some(account_id),
        )
        .await
    }

    /// Creates the org-wide opt-out policy on the first root, then one
    /// override policy per requested account. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `NoRoots` for an organization without roots, or the first
    /// Organizations failure.
    pub async fn create_policies(
        &self,
        details: Option<&CreateDetails>,
    ) -> Result<CreateResult, OptOutError> {
        let roots = self.api.list_roots().await?;
        let root_id = roots.first().ok_or(OptOutError::NoRoots)?;

        let org_policy = self
            .create_or_update_policy(
                &self.config.org_policy_name,
                &PolicyDocument::organization(),
                ORG_POLICY_DESCRIPTION,
                Some(root_id.as_str()),
            )
            .await?;

        let mut account_opt_outs = None;
        if let Some(entries) = details.and_then(|d| d.account_opt_outs.as_ref()) {
            let mut results = Vec::with_capacity(entries.len());
            for entry in entries {
                let Some(account_id) = entry.account_id.as_deref().filter(|id| !id.is_empty())
                else {
                    warn!("Skipping account opt-out entry without account_id");
                    continue;
                };
                let policy = self.create_account_policy(account_id, &entry.services).await?;
                results.push(AccountPolicyResult {
                    account_id: account_id.to_string(),
                    policy_id: policy.id,
                    policy_name: policy.name,
                    services: entry.services.clone(),
                });
            }
            account_opt_outs = Some(results);
        }

        Ok(CreateResult {
            org_policy,
            account_opt_outs,
        })
    }

    async fn policy_listing(&self, summary: &PolicySummary) -> Result<PolicyListing, OptOutError> {
        let content = self.api.describe_policy(&summary.id).await?;
        let content: Value = serde_json::from_str(&content)?;
        let targets = self.all_targets(&summary.id).await?;
        Ok(PolicyListing {
            name: summary.name.clone(),
            id: summary.id.clone(),
            content,
            targets,
        })
    }

    /// All opt-out policies with content and targets. A policy whose details
    /// cannot be fetched is logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error only if the policy listing itself fails.
    pub async fn list_policies(&self) -> Result<ListResult, OptOutError> {
        let summaries = self.all_policies().await?;

        let mut policies = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            match self.policy_listing(summary).await {
                Ok(listing) => policies.push(listing),
                Err(e) => {
                    error!(policy_id = %summary.id, "Error getting policy details: {}", e);
                }
            }
        }

        Ok(ListResult { policies })
    }

    /// The effective opt-out policy for an account, as computed by Organizations.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the content is not JSON.
    pub async fn get_effective_policy(
        &self,
        account_id: &str,
    ) -> Result<EffectivePolicyResult, OptOutError> {
        let content = self.api.describe_effective_policy(account_id).await?;
        Ok(EffectivePolicyResult {
            account_id: account_id.to_string(),
            effective_policy: serde_json::from_str(&content)?,
        })
    }
}
