#![allow(dead_code)]

use ai_optout::OptOutError;
use ai_optout::clients::OrganizationsApi;
use ai_optout::core::models::{Page, PolicySummary, PolicyTarget};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct StoredPolicy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
}

/// In-memory Organizations double. Records every call and serves list
/// results in pages of `page_size`.
pub struct FakeOrganizations {
    pub roots: Vec<String>,
    pub page_size: usize,
    pub policies: Mutex<Vec<StoredPolicy>>,
    pub attachments: Mutex<Vec<(String, String)>>,
    pub effective: HashMap<String, String>,
    pub failing_describe: HashSet<String>,
    pub failing_create: HashSet<String>,
    pub fail_list: bool,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeOrganizations {
    fn default() -> Self {
        Self {
            roots: vec!["r-root".to_string()],
            page_size: 2,
            policies: Mutex::new(Vec::new()),
            attachments: Mutex::new(Vec::new()),
            effective: HashMap::new(),
            failing_describe: HashSet::new(),
            failing_create: HashSet::new(),
            fail_list: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeOrganizations {
    pub fn with_policy(self, id: &str, name: &str, content: &str) -> Self {
        self.policies.lock().unwrap().push(StoredPolicy {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            content: content.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<StoredPolicy> {
        self.policies
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.id.starts_with("p-new"))
            .cloned()
            .collect()
    }

    pub fn attachments(&self) -> Vec<(String, String)> {
        self.attachments.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn page<T: Clone>(&self, all: &[T], next_token: Option<String>) -> Page<T> {
        let start: usize = next_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        Page {
            items: all[start..end].to_vec(),
            next_token: (end < all.len()).then(|| end.to_string()),
        }
    }
}

#[async_trait]
impl OrganizationsApi for FakeOrganizations {
    async fn list_policies(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<PolicySummary>, OptOutError> {
        self.record("list_policies");
        if self.fail_list {
            return Err(OptOutError::AwsError("list_policies: AccessDenied".into()));
        }
        let summaries: Vec<PolicySummary> = self
            .policies
            .lock()
            .unwrap()
            .iter()
            .map(|p| PolicySummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();
        Ok(self.page(&summaries, next_token))
    }

    async fn describe_policy(&self, policy_id: &str) -> Result<String, OptOutError> {
        self.record("describe_policy");
        if self.failing_describe.contains(policy_id) {
            return Err(OptOutError::AwsError(format!(
                "describe_policy: PolicyNotFoundException {policy_id}"
            )));
        }
        self.policies
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == policy_id)
            .map(|p| p.content.clone())
            .ok_or_else(|| OptOutError::AwsError(format!("describe_policy: {policy_id}")))
    }

    async fn list_targets_for_policy(
        &self,
        policy_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<PolicyTarget>, OptOutError> {
        self.record("list_targets_for_policy");
        let targets: Vec<PolicyTarget> = self
            .attachments
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == policy_id)
            .map(|(_, target)| PolicyTarget {
                target_id: target.clone(),
                arn: None,
                name: None,
                target_type: Some("ACCOUNT".to_string()),
            })
            .collect();
        Ok(self.page(&targets, next_token))
    }

    async fn create_policy(
        &self,
        name: &str,
        description: &str,
        content: &str,
    ) -> Result<String, OptOutError> {
        self.record("create_policy");
        if self.failing_create.iter().any(|f| name.starts_with(f)) {
            return Err(OptOutError::AwsError(format!(
                "create_policy: DuplicatePolicyException {name}"
            )));
        }
        let mut policies = self.policies.lock().unwrap();
        let id = format!("p-new{}", policies.len());
        policies.push(StoredPolicy {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            content: content.to_string(),
        });
        Ok(id)
    }

    async fn attach_policy(&self, policy_id: &str, target_id: &str) -> Result<(), OptOutError> {
        self.record("attach_policy");
        self.attachments
            .lock()
            .unwrap()
            .push((policy_id.to_string(), target_id.to_string()));
        Ok(())
    }

    async fn list_roots(&self) -> Result<Vec<String>, OptOutError> {
        self.record("list_roots");
        Ok(self.roots.clone())
    }

    async fn describe_effective_policy(&self, target_id: &str) -> Result<String, OptOutError> {
        self.record("describe_effective_policy");
        self.effective.get(target_id).cloned().ok_or_else(|| {
            OptOutError::AwsError(format!(
                "describe_effective_policy: EffectivePolicyNotFoundException {target_id}"
            ))
        })
    }
}
