//! Thread settings applied to every call issued through a `Spawner`.
//!
//! Embedding toolchains may keep these in their own manifest; the free
//! functions (`spawn_async`, `spawn`) always use the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{AsyncCallError, Result};

pub const DEFAULT_THREAD_NAME_PREFIX: &str = "tc-async";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpawnConfig {
    /// Threads are named `{prefix}-{call id}`
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,

    /// Stack size in bytes; the platform default when absent
    #[serde(default)]
    pub stack_size: Option<usize>,
}

fn default_thread_name_prefix() -> String {
    DEFAULT_THREAD_NAME_PREFIX.to_string()
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            thread_name_prefix: default_thread_name_prefix(),
            stack_size: None,
        }
    }
}

impl SpawnConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: SpawnConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.thread_name_prefix.is_empty() {
            return Err(AsyncCallError::config("thread name prefix is empty"));
        }
        // std::thread::Builder panics on interior NULs.
        if self.thread_name_prefix.contains('\0') {
            return Err(AsyncCallError::config(
                "thread name prefix contains a NUL byte",
            ));
        }
        if self.stack_size == Some(0) {
            return Err(AsyncCallError::config("stack size must be non-zero"));
        }
        Ok(())
    }

    pub(crate) fn thread_name(&self, id: u64) -> String {
        format!("{}-{id}", self.thread_name_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SpawnConfig::from_toml_str("").expect("parse");
        assert_eq!(config, SpawnConfig::default());
    }

    #[test]
    fn fields_parse_from_toml() {
        let src = r#"
thread_name_prefix = "tiger"
stack_size = 262144
"#;
        let config = SpawnConfig::from_toml_str(src).expect("parse");
        assert_eq!(config.thread_name_prefix, "tiger");
        assert_eq!(config.stack_size, Some(256 * 1024));
        assert_eq!(config.thread_name(3), "tiger-3");
    }

    #[test]
    fn zero_stack_is_rejected() {
        let err = SpawnConfig::from_toml_str("stack_size = 0").expect_err("invalid");
        assert!(matches!(err, AsyncCallError::Config { .. }), "{err:?}");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SpawnConfig::from_toml_str("stack_size = \"big\"").expect_err("invalid");
        assert!(matches!(err, AsyncCallError::ConfigParse(_)), "{err:?}");
    }

    #[test]
    fn serialized_config_reads_back() {
        let config = SpawnConfig::default()
            .with_thread_name_prefix("worker")
            .with_stack_size(1 << 20);
        let text = toml::to_string(&config).expect("serialize");
        assert!(text.contains("thread_name_prefix = \"worker\""), "{text}");
        assert_eq!(SpawnConfig::from_toml_str(&text).expect("parse"), config);
    }

    #[test]
    fn nul_in_prefix_is_rejected() {
        let config = SpawnConfig::default().with_thread_name_prefix("a\0b");
        assert!(config.validate().is_err());
    }
}
