use crate::value::SettingValue;
use strum_macros::EnumIter;

/// Storage policy of a setting slot, chosen at declaration time.
///
/// Scalar kinds are written as plain JSON scalars; `Json` slots hold a
/// serialized document. The policy is resolved by an explicit match on the
/// key, never by inspecting the value at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Timestamp,
    Json,
}

/// The closed set of persisted settings.
///
/// Identifiers are the on-disk contract: they must never be renamed without
/// a migration. New keys are added here, with their kind and default, and
/// nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SettingKey {
    // App state
    FirstLaunch,
    AppUsageCount,
    LastAppVersion,

    // User preferences
    DailyNotificationEnabled,
    DataCollectionConsent,
    BiometricEnabled,

    // Onboarding & profile
    OnboardingCompleted,
    UserProfile,
    UserPreferences,

    // Sync & developer tooling
    LastSyncDate,
    EnvironmentOverride,

    // Theme & UI
    PreferredTheme,
    PreferredLanguage,
    TextScale,
}

impl SettingKey {
    /// The stable slot identifier used as the on-disk file stem.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::FirstLaunch => "first_launch",
            Self::AppUsageCount => "app_usage_count",
            Self::LastAppVersion => "last_app_version",
            Self::DailyNotificationEnabled => "daily_notification_enabled",
            Self::DataCollectionConsent => "data_collection_consent",
            Self::BiometricEnabled => "biometric_enabled",
            Self::OnboardingCompleted => "onboarding_completed",
            Self::UserProfile => "user_profile",
            Self::UserPreferences => "user_preferences",
            Self::LastSyncDate => "last_sync_date",
            Self::EnvironmentOverride => "environment_override",
            Self::PreferredTheme => "preferred_theme",
            Self::PreferredLanguage => "preferred_language",
            Self::TextScale => "text_scale",
        }
    }

    /// The declared storage policy for this slot.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::FirstLaunch
            | Self::DailyNotificationEnabled
            | Self::DataCollectionConsent
            | Self::BiometricEnabled
            | Self::OnboardingCompleted => ValueKind::Bool,
            Self::AppUsageCount => ValueKind::Int,
            Self::TextScale => ValueKind::Float,
            Self::LastAppVersion
            | Self::EnvironmentOverride
            | Self::PreferredTheme
            | Self::PreferredLanguage => ValueKind::Text,
            Self::LastSyncDate => ValueKind::Timestamp,
            Self::UserProfile | Self::UserPreferences => ValueKind::Json,
        }
    }

    /// The value reads fall back to while the slot is absent or corrupt.
    /// `None` means "no default": the slot reads as absent.
    #[must_use]
    pub fn default_value(self) -> Option<SettingValue> {
        match self {
            Self::FirstLaunch | Self::DailyNotificationEnabled => Some(SettingValue::Bool(true)),
            Self::DataCollectionConsent | Self::BiometricEnabled | Self::OnboardingCompleted => {
                Some(SettingValue::Bool(false))
            },
            Self::AppUsageCount => Some(SettingValue::Int(0)),
            Self::TextScale => Some(SettingValue::Float(1.0)),
            Self::LastAppVersion => Some(SettingValue::Text(String::new())),
            Self::PreferredTheme => Some(SettingValue::Text("system".to_owned())),
            Self::PreferredLanguage => Some(SettingValue::Text("en".to_owned())),
            Self::UserProfile
            | Self::UserPreferences
            | Self::LastSyncDate
            | Self::EnvironmentOverride => None,
        }
    }
}
