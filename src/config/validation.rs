use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("additional_upload_events[{index}] has an empty event_name")]
    EmptyEventName { index: usize },

    #[error("additional_upload_events entry '{event}' has an empty payload_path_key")]
    EmptyPayloadKey { event: String },

    #[error("upload_timeout_secs must be positive when set")]
    ZeroUploadTimeout,
}

/// Validate the entire configuration
///
/// Only structural problems are fatal here. Unknown or duplicate event
/// identifiers stay non-fatal and are skipped with a warning when the event
/// mapping table is rebuilt.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_additional_events(config)?;
    validate_timeout(config)?;
    Ok(())
}

fn validate_additional_events(config: &Config) -> Result<(), ValidationError> {
    for (index, entry) in config.additional_upload_events.iter().enumerate() {
        if entry.event_name.is_empty() {
            return Err(ValidationError::EmptyEventName { index });
        }
        if entry.payload_path_key.is_empty() {
            return Err(ValidationError::EmptyPayloadKey {
                event: entry.event_name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_timeout(config: &Config) -> Result<(), ValidationError> {
    if config.upload_timeout_secs == Some(0) {
        return Err(ValidationError::ZeroUploadTimeout);
    }
    Ok(())
}
