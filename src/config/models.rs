use super::bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default = "default_contexts")]
    pub contexts: HashMap<String, ContextConfig>,
    #[serde(default = "default_context_name")]
    pub default_context: String,
    #[serde(default)]
    pub form: FormConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            providers: default_providers(),
            contexts: default_contexts(),
            default_context: default_context_name(),
            form: FormConfig::default(),
        }
    }
}

fn default_context_name() -> String {
    "default".to_string()
}

/// Built-in provider set: a generic file provider and an image provider
fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert(
        "file".to_string(),
        ProviderConfig {
            kind: ProviderKind::File,
            allowed_extensions: Vec::new(),
            allowed_content_types: Vec::new(),
            max_payload_bytes: Some(default_max_payload_bytes()),
        },
    );
    providers.insert(
        "image".to_string(),
        ProviderConfig {
            kind: ProviderKind::Image,
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_content_types: ["image/png", "image/jpeg", "image/gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_payload_bytes: Some(default_max_payload_bytes()),
        },
    );
    providers
}

fn default_contexts() -> HashMap<String, ContextConfig> {
    let mut contexts = HashMap::new();
    contexts.insert(
        "default".to_string(),
        ContextConfig {
            providers: vec!["file".to_string(), "image".to_string()],
        },
    );
    contexts
}

fn default_max_payload_bytes() -> ByteSize {
    ByteSize(64 * 1024 * 1024) // 64 MB
}

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Local,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: default_bucket(),
            root: default_storage_root(),
        }
    }
}

fn default_bucket() -> String {
    "mediabox-default".to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("data/media")
}

/// Provider implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    File,
    Image,
}

/// Per-provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Allowed file extensions (lowercase, no dot); empty allows all
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
    /// Allowed content types; empty allows all
    #[serde(default)]
    pub allowed_content_types: Vec<String>,
    /// Maximum upload size
    #[serde(default)]
    pub max_payload_bytes: Option<ByteSize>,
}

/// Media context: which providers may serve it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContextConfig {
    pub providers: Vec<String>,
}

/// Form transformer defaults
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FormConfig {
    #[serde(default = "default_true")]
    pub new_on_update: bool,
    #[serde(default = "default_true")]
    pub empty_on_new: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            new_on_update: true,
            empty_on_new: true,
        }
    }
}

fn default_true() -> bool {
    true
}
