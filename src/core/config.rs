use std::env;

pub const DEFAULT_ORG_POLICY_NAME: &str = "AI-OptOut-Org-Policy";
pub const DEFAULT_ACCOUNT_POLICY_PREFIX: &str = "AI-OptOut-Account-";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Account used by `get_effective` when the request names none.
    pub target_account_id: Option<String>,
    pub org_policy_name: String,
    pub account_policy_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_account_id: None,
            org_policy_name: DEFAULT_ORG_POLICY_NAME.to_string(),
            account_policy_prefix: DEFAULT_ACCOUNT_POLICY_PREFIX.to_string(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset;
    /// account ids are passed through to Organizations as given.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            target_account_id: get("TARGET_ACCOUNT_ID"),
            org_policy_name: get("ORG_POLICY_NAME")
                .unwrap_or_else(|| DEFAULT_ORG_POLICY_NAME.to_string()),
            account_policy_prefix: get("ACCOUNT_POLICY_PREFIX")
                .unwrap_or_else(|| DEFAULT_ACCOUNT_POLICY_PREFIX.to_string()),
        }
    }

    #[must_use]
    pub fn account_policy_name(&self, account_id: &str) -> String {
        format!("{}{}", self.account_policy_prefix, account_id)
    }
}
