//! Fields handed to the contact form when the visitor proceeds from the
//! builder.
use crate::catalog::BuilderCatalog;
use crate::config::ExperienceConfig;
use crate::error::BuilderError;
use crate::render::build_message;
use serde::{Deserialize, Serialize};

/// Name of the hidden input carrying the serialised state.
pub const STATE_FIELD: &str = "experience_builder";
pub const MESSAGE_FIELD: &str = "message";
pub const TOPIC_FIELD: &str = "topic";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHandoff {
    /// JSON of the full configuration.
    pub experience_builder: String,
    pub message: String,
    /// Topic to pre-select, when the form offers it.
    pub topic: Option<String>,
}

impl ContactHandoff {
    /// Assemble the hand-off for a form offering `topic_options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialised.
    pub fn prepare(
        config: &ExperienceConfig,
        catalog: &BuilderCatalog,
        topic_options: &[String],
    ) -> Result<Self, BuilderError> {
        Ok(Self {
            experience_builder: serde_json::to_string(config)?,
            message: build_message(config),
            topic: catalog.contact_topic(topic_options).map(str::to_string),
        })
    }

    /// Read the state back out of the hidden field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field does not hold a serialised configuration.
    pub fn restore(&self) -> Result<ExperienceConfig, BuilderError> {
        Ok(serde_json::from_str(&self.experience_builder)?)
    }
}
