use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No providers configured (at least one provider is required)")]
    NoProvidersConfigured,

    #[error("Context '{context}' references non-existent provider '{provider}'")]
    InvalidProviderReference { context: String, provider: String },

    #[error("Default context '{0}' is not configured")]
    UnknownDefaultContext(String),

    #[error("Context '{0}' lists no providers")]
    EmptyContext(String),

    #[error("Provider '{provider}' has zero max_payload_bytes")]
    ZeroPayloadLimit { provider: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_providers(config)?;
    validate_contexts(config)?;
    validate_default_context(config)?;
    Ok(())
}

/// Ensure providers exist and carry sane limits
fn validate_providers(config: &Config) -> Result<(), ValidationError> {
    if config.providers.is_empty() {
        return Err(ValidationError::NoProvidersConfigured);
    }

    for (name, provider) in &config.providers {
        if let Some(limit) = provider.max_payload_bytes {
            if limit.as_u64() == 0 {
                return Err(ValidationError::ZeroPayloadLimit {
                    provider: name.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Ensure every context references configured providers only
fn validate_contexts(config: &Config) -> Result<(), ValidationError> {
    for (context_name, context) in &config.contexts {
        if context.providers.is_empty() {
            return Err(ValidationError::EmptyContext(context_name.clone()));
        }

        for provider in &context.providers {
            if !config.providers.contains_key(provider) {
                return Err(ValidationError::InvalidProviderReference {
                    context: context_name.clone(),
                    provider: provider.clone(),
                });
            }
        }
    }

    Ok(())
}

/// The default context must be one of the configured contexts
fn validate_default_context(config: &Config) -> Result<(), ValidationError> {
    if !config.contexts.contains_key(&config.default_context) {
        return Err(ValidationError::UnknownDefaultContext(
            config.default_context.clone(),
        ));
    }

    Ok(())
}
