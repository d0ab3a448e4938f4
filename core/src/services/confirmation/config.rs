//! Configuration for the confirmation manager

use chrono::Duration;

use confirm_shared::config::ConfirmationSettings;

/// Configuration for the confirmation manager
///
/// Resolved once at construction and immutable thereafter; there is no
/// ambient module-level state to consult.
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// Grace period before confirmation becomes mandatory for
    /// authentication. `None` means unlimited grace; a zero duration means
    /// confirmation is always mandatory.
    pub allow_unconfirmed_access_for: Option<Duration>,

    /// Validity window for an issued token; `None` means tokens never
    /// expire.
    pub confirm_within: Option<Duration>,

    /// Whether phone-number changes require re-confirmation
    pub reconfirmable: bool,

    /// Record fields used to locate an account for resend requests
    pub confirmation_lookup_keys: Vec<String>,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            allow_unconfirmed_access_for: Some(Duration::zero()),
            confirm_within: None,
            reconfirmable: true,
            confirmation_lookup_keys: vec!["phone".to_string()],
        }
    }
}

impl From<ConfirmationSettings> for ConfirmationConfig {
    fn from(settings: ConfirmationSettings) -> Self {
        Self {
            allow_unconfirmed_access_for: settings
                .allow_unconfirmed_access_secs
                .map(Duration::seconds),
            confirm_within: settings.confirm_within_secs.map(Duration::seconds),
            reconfirmable: settings.reconfirmable,
            confirmation_lookup_keys: settings.confirmation_lookup_keys,
        }
    }
}
