//! SMS transport configuration

use serde::{Deserialize, Serialize};

/// SMS delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// SMS provider identifier ("mock" for development)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Sender phone number or alphanumeric sender id
    #[serde(default)]
    pub from_number: String,

    /// Template for the confirmation instruction message; `{token}` is
    /// replaced with the raw confirmation token.
    #[serde(default = "default_message_template")]
    pub message_template: String,
}

fn default_provider() -> String {
    "mock".to_string()
}

fn default_message_template() -> String {
    "Your confirmation code is: {token}".to_string()
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            from_number: String::new(),
            message_template: default_message_template(),
        }
    }
}

impl SmsConfig {
    /// Render the instruction message for a raw token
    pub fn render_message(&self, token: &str) -> String {
        self.message_template.replace("{token}", token)
    }
}
