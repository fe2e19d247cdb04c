use crate::constants::{
    ANALYTICS, BIOMETRIC_AUTH, CRASH_REPORTING, DATA_EXPORT, OFFLINE_MODE, PUSH_NOTIFICATIONS,
};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;

bitflags! {
    /// Represents a set of build-time feature toggles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FeatureSet: u32 {
        const BIOMETRIC_AUTH     = 1 << 0;
        const PUSH_NOTIFICATIONS = 1 << 1;
        const ANALYTICS          = 1 << 2;
        const CRASH_REPORTING    = 1 << 3;
        const OFFLINE_MODE       = 1 << 4;
        const DATA_EXPORT        = 1 << 5;

        const ALL = Self::BIOMETRIC_AUTH.bits()
            | Self::PUSH_NOTIFICATIONS.bits()
            | Self::ANALYTICS.bits()
            | Self::CRASH_REPORTING.bits()
            | Self::OFFLINE_MODE.bits()
            | Self::DATA_EXPORT.bits();
    }
}

impl FeatureSet {
    /// The toggles shipped on by default. Analytics stays opt-in.
    pub const DEFAULT: Self = Self::BIOMETRIC_AUTH
        .union(Self::PUSH_NOTIFICATIONS)
        .union(Self::CRASH_REPORTING)
        .union(Self::OFFLINE_MODE)
        .union(Self::DATA_EXPORT);
}

impl From<&str> for FeatureSet {
    fn from(s: &str) -> Self {
        match s {
            BIOMETRIC_AUTH => Self::BIOMETRIC_AUTH,
            PUSH_NOTIFICATIONS => Self::PUSH_NOTIFICATIONS,
            ANALYTICS => Self::ANALYTICS,
            CRASH_REPORTING => Self::CRASH_REPORTING,
            OFFLINE_MODE => Self::OFFLINE_MODE,
            DATA_EXPORT => Self::DATA_EXPORT,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl From<u32> for FeatureSet {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for FeatureSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}
