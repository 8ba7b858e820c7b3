use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// UI preference flags persisted next to the watch state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub enable_welcome_animation: bool,
    #[serde(default)]
    pub enable_sandbox_protection: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            enable_welcome_animation: false,
            enable_sandbox_protection: false,
        }
    }
}

/// Partial update applied over the stored preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_welcome_animation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_sandbox_protection: Option<bool>,
}

impl Preferences {
    pub fn apply(&mut self, update: &PreferencesUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(enabled) = update.enable_welcome_animation {
            self.enable_welcome_animation = enabled;
        }
        if let Some(enabled) = update.enable_sandbox_protection {
            self.enable_sandbox_protection = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(!prefs.enable_welcome_animation);
        assert!(!prefs.enable_sandbox_protection);
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut prefs = Preferences {
            theme: Theme::Dark,
            ..Preferences::default()
        };
        prefs.apply(&PreferencesUpdate {
            enable_sandbox_protection: Some(true),
            ..PreferencesUpdate::default()
        });
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.enable_sandbox_protection);
    }
}
