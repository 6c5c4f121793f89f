use serde::{Deserialize, Serialize};

/// Where the module keeps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Process-local maps; data is lost on exit.
    #[default]
    Memory,
    /// The relational database configured in the `database` section.
    Database,
}

/// Configuration for the org_info module (`modules.org_info`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrgInfoConfig {
    #[serde(default)]
    pub storage: StorageKind,
    /// Deadline for the store calls of one request; 0 disables it.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

impl Default for OrgInfoConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            request_timeout_ms: default_request_timeout_ms(),
            max_name_length: default_max_name_length(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_max_name_length() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: OrgInfoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.storage, StorageKind::Memory);
        assert_eq!(cfg.request_timeout_ms, 5_000);
        assert_eq!(cfg.max_name_length, 100);
    }

    #[test]
    fn storage_kind_is_snake_case() {
        let cfg: OrgInfoConfig =
            serde_json::from_str(r#"{"storage":"database","request_timeout_ms":0}"#).unwrap();
        assert_eq!(cfg.storage, StorageKind::Database);
        assert_eq!(cfg.request_timeout_ms, 0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<OrgInfoConfig>(r#"{"bogus":1}"#).is_err());
    }
}
