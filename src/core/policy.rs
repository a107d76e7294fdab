//! Typed AI services opt-out policy documents.
//!
//! AWS Organizations stores these policies as
//! `{"services": {"<service>": {"opt_out_policy": {"@@assign": "optOut"}}}}`.
//! In memory a document is a default decision plus per-service overrides; the
//! conversion to and from the wire shape happens in serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Service key that applies to every service without its own entry.
pub const DEFAULT_SERVICE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "optIn")]
    OptIn,
    #[serde(rename = "optOut")]
    OptOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WirePolicy", into = "WirePolicy")]
pub struct PolicyDocument {
    pub default: Decision,
    pub overrides: BTreeMap<String, Decision>,
}

impl PolicyDocument {
    #[must_use]
    pub fn new(default: Decision) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Organization-wide policy: every service opted out.
    #[must_use]
    pub fn organization() -> Self {
        Self::new(Decision::OptOut)
    }

    /// Sets the decision for `service`. The `default` key replaces the default
    /// decision rather than adding an override.
    pub fn set(&mut self, service: &str, decision: Decision) {
        if service == DEFAULT_SERVICE {
            self.default = decision;
        } else {
            self.overrides.insert(service.to_string(), decision);
        }
    }

    #[must_use]
    pub fn with(mut self, service: &str, decision: Decision) -> Self {
        self.set(service, decision);
        self
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePolicy {
    services: BTreeMap<String, WireService>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireService {
    opt_out_policy: WireAssign,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireAssign {
    #[serde(rename = "@@assign")]
    assign: Decision,
}

impl TryFrom<WirePolicy> for PolicyDocument {
    type Error = String;

    fn try_from(mut wire: WirePolicy) -> Result<Self, Self::Error> {
        let default = wire
            .services
            .remove(DEFAULT_SERVICE)
            .ok_or_else(|| format!("policy has no '{DEFAULT_SERVICE}' service entry"))?
            .opt_out_policy
            .assign;

        let overrides = wire
            .services
            .into_iter()
            .map(|(name, svc)| (name, svc.opt_out_policy.assign))
            .collect();

        Ok(Self { default, overrides })
    }
}

impl From<PolicyDocument> for WirePolicy {
    fn from(doc: PolicyDocument) -> Self {
        let entry = |assign| WireService {
            opt_out_policy: WireAssign { assign },
        };

        let mut services: BTreeMap<String, WireService> = doc
            .overrides
            .into_iter()
            .map(|(name, decision)| (name, entry(decision)))
            .collect();
        services.insert(DEFAULT_SERVICE.to_string(), entry(doc.default));

        Self { services }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_policy_wire_shape() {
        let value = serde_json::to_value(PolicyDocument::organization()).unwrap();
        assert_eq!(
            value,
            json!({"services": {"default": {"opt_out_policy": {"@@assign": "optOut"}}}})
        );
    }

    #[test]
    fn test_default_key_replaces_default_decision() {
        let doc = PolicyDocument::new(Decision::OptIn).with("default", Decision::OptOut);
        assert_eq!(doc.default, Decision::OptOut);
        assert!(doc.overrides.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_default() {
        let raw = r#"{"services": {"s3": {"opt_out_policy": {"@@assign": "optOut"}}}}"#;
        assert!(serde_json::from_str::<PolicyDocument>(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_decision() {
        let raw = r#"{"services": {"default": {"opt_out_policy": {"@@assign": "maybe"}}}}"#;
        assert!(serde_json::from_str::<PolicyDocument>(raw).is_err());
    }

    #[test]
    fn test_parse_account_policy() {
        let raw = r#"{"services": {
            "default": {"opt_out_policy": {"@@assign": "optIn"}},
            "lex": {"opt_out_policy": {"@@assign": "optOut"}}
        }}"#;
        let doc: PolicyDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.default, Decision::OptIn);
        assert_eq!(doc.overrides.get("lex"), Some(&Decision::OptOut));
        assert_eq!(doc.overrides.len(), 1);
    }
}
