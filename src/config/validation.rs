//! Configuration validation.
//!
//! Semantic checks on the gateway's own configuration; serde already covers
//! the syntactic ones. Returns every error found, not just the first.

use thiserror::Error;

use crate::config::schema::PresenterConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("content_service.url {0:?} is not a valid URL")]
    ContentServiceUrl(String),

    #[error("content_service.timeout_secs must be greater than zero")]
    ContentServiceTimeout,

    #[error("staging.default_domain must be set when staging is enabled")]
    StagingDefaultDomain,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PresenterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if url::Url::parse(&config.content_service.url).is_err() {
        errors.push(ValidationError::ContentServiceUrl(
            config.content_service.url.clone(),
        ));
    }

    if config.content_service.timeout_secs == 0 {
        errors.push(ValidationError::ContentServiceTimeout);
    }

    if config.staging.enabled && config.staging.default_domain.is_empty() {
        errors.push(ValidationError::StagingDefaultDomain);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PresenterConfig::default()).is_ok());
    }

    #[test]
    fn all_errors_are_reported_together() {
        let mut config = PresenterConfig::default();
        config.listener.bind_address = "nonsense".to_string();
        config.content_service.timeout_secs = 0;
        config.staging.enabled = true;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
