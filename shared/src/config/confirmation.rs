//! Confirmation policy configuration

use serde::{Deserialize, Serialize};

/// Confirmation policy settings
///
/// Durations are expressed in whole seconds so the struct can be loaded
/// from flat configuration sources. The core crate converts these into
/// its richer duration-based config at construction time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfirmationSettings {
    /// Grace period (seconds) during which an unconfirmed account may
    /// still authenticate. `None` means unlimited grace; `0` means
    /// confirmation is always mandatory.
    #[serde(default = "default_grace_secs")]
    pub allow_unconfirmed_access_secs: Option<i64>,

    /// Validity window (seconds) for an issued confirmation token.
    /// `None` means tokens never expire.
    #[serde(default)]
    pub confirm_within_secs: Option<i64>,

    /// Whether phone-number changes require re-confirmation
    #[serde(default = "default_reconfirmable")]
    pub reconfirmable: bool,

    /// Record fields used to locate an account for resend requests
    #[serde(default = "default_lookup_keys")]
    pub confirmation_lookup_keys: Vec<String>,
}

fn default_grace_secs() -> Option<i64> {
    Some(0)
}

fn default_reconfirmable() -> bool {
    true
}

fn default_lookup_keys() -> Vec<String> {
    vec!["phone".to_string()]
}

impl Default for ConfirmationSettings {
    fn default() -> Self {
        Self {
            allow_unconfirmed_access_secs: default_grace_secs(),
            confirm_within_secs: None,
            reconfirmable: default_reconfirmable(),
            confirmation_lookup_keys: default_lookup_keys(),
        }
    }
}

impl ConfirmationSettings {
    /// Set the grace period in days
    pub fn with_grace_days(mut self, days: i64) -> Self {
        self.allow_unconfirmed_access_secs = Some(days * 86400);
        self
    }

    /// Set the token validity window in days
    pub fn with_confirm_within_days(mut self, days: i64) -> Self {
        self.confirm_within_secs = Some(days * 86400);
        self
    }

    /// Remove the grace-period restriction entirely
    pub fn with_unlimited_grace(mut self) -> Self {
        self.allow_unconfirmed_access_secs = None;
        self
    }

    /// Enable or disable reconfirmation of phone changes
    pub fn with_reconfirmable(mut self, reconfirmable: bool) -> Self {
        self.reconfirmable = reconfirmable;
        self
    }

    /// Check whether confirmation is mandatory before any authentication
    pub fn is_confirmation_mandatory(&self) -> bool {
        self.allow_unconfirmed_access_secs == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ConfirmationSettings::default();
        assert_eq!(settings.allow_unconfirmed_access_secs, Some(0));
        assert_eq!(settings.confirm_within_secs, None);
        assert!(settings.reconfirmable);
        assert_eq!(settings.confirmation_lookup_keys, vec!["phone"]);
        assert!(settings.is_confirmation_mandatory());
    }

    #[test]
    fn test_builders() {
        let settings = ConfirmationSettings::default()
            .with_grace_days(5)
            .with_confirm_within_days(3)
            .with_reconfirmable(false);

        assert_eq!(settings.allow_unconfirmed_access_secs, Some(5 * 86400));
        assert_eq!(settings.confirm_within_secs, Some(3 * 86400));
        assert!(!settings.reconfirmable);
        assert!(!settings.is_confirmation_mandatory());
    }

    #[test]
    fn test_unlimited_grace() {
        let settings = ConfirmationSettings::default().with_unlimited_grace();
        assert_eq!(settings.allow_unconfirmed_access_secs, None);
        assert!(!settings.is_confirmation_mandatory());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let settings: ConfirmationSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.allow_unconfirmed_access_secs, Some(0));
        assert!(settings.reconfirmable);

        let settings: ConfirmationSettings =
            serde_json::from_str(r#"{"confirm_within_secs": 259200, "reconfirmable": false}"#)
                .unwrap();
        assert_eq!(settings.confirm_within_secs, Some(259200));
        assert!(!settings.reconfirmable);
    }
}
