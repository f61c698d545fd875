//! Target platforms and platform family classification.
//!
//! Platform identifiers travel through the pipeline as the engine's own
//! strings (`StandaloneWindows64`, `Android`, ...). The predicates here take
//! raw identifiers so unrecognized values can flow through the resolver and
//! only get rejected by the in-container driver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build targets understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPlatform {
    /// macOS standalone player
    #[serde(rename = "StandaloneOSX")]
    StandaloneOsx,
    /// 32-bit Windows standalone player
    StandaloneWindows,
    /// 64-bit Windows standalone player
    StandaloneWindows64,
    /// 64-bit Linux standalone player
    StandaloneLinux64,
    /// iOS player
    #[serde(rename = "iOS")]
    Ios,
    /// Android player
    Android,
    /// WebGL player
    #[serde(rename = "WebGL")]
    WebGl,
    /// Universal Windows Platform
    #[serde(rename = "WSAPlayer")]
    WsaPlayer,
    /// PlayStation 4
    #[serde(rename = "PS4")]
    Ps4,
    /// Xbox One
    XboxOne,
    /// Apple TV
    #[serde(rename = "tvOS")]
    TvOs,
    /// Nintendo Switch
    Switch,
    /// Magic Leap
    Lumin,
    /// Google Stadia
    Stadia,
    /// No target selected
    NoTarget,
}

impl TargetPlatform {
    /// Every defined target
    pub const ALL: [TargetPlatform; 15] = [
        TargetPlatform::StandaloneOsx,
        TargetPlatform::StandaloneWindows,
        TargetPlatform::StandaloneWindows64,
        TargetPlatform::StandaloneLinux64,
        TargetPlatform::Ios,
        TargetPlatform::Android,
        TargetPlatform::WebGl,
        TargetPlatform::WsaPlayer,
        TargetPlatform::Ps4,
        TargetPlatform::XboxOne,
        TargetPlatform::TvOs,
        TargetPlatform::Switch,
        TargetPlatform::Lumin,
        TargetPlatform::Stadia,
        TargetPlatform::NoTarget,
    ];

    /// Platform used when the caller does not name one
    pub const DEFAULT: TargetPlatform = TargetPlatform::StandaloneWindows64;

    /// Engine identifier for this target
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::StandaloneOsx => "StandaloneOSX",
            TargetPlatform::StandaloneWindows => "StandaloneWindows",
            TargetPlatform::StandaloneWindows64 => "StandaloneWindows64",
            TargetPlatform::StandaloneLinux64 => "StandaloneLinux64",
            TargetPlatform::Ios => "iOS",
            TargetPlatform::Android => "Android",
            TargetPlatform::WebGl => "WebGL",
            TargetPlatform::WsaPlayer => "WSAPlayer",
            TargetPlatform::Ps4 => "PS4",
            TargetPlatform::XboxOne => "XboxOne",
            TargetPlatform::TvOs => "tvOS",
            TargetPlatform::Switch => "Switch",
            TargetPlatform::Lumin => "Lumin",
            TargetPlatform::Stadia => "Stadia",
            TargetPlatform::NoTarget => "NoTarget",
        }
    }

    /// Whether this target produces a Windows executable
    pub fn is_windows(&self) -> bool {
        matches!(
            self,
            TargetPlatform::StandaloneWindows | TargetPlatform::StandaloneWindows64
        )
    }

    /// Whether this target produces an Android package
    pub fn is_android(&self) -> bool {
        matches!(self, TargetPlatform::Android)
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier that does not name a [`TargetPlatform`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for TargetPlatform {
    type Err = UnknownPlatform;

    /// Exact, case-sensitive match on the engine identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetPlatform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Is `platform` one of the Windows standalone targets?
pub fn is_windows(platform: &str) -> bool {
    platform
        .parse::<TargetPlatform>()
        .is_ok_and(|p| p.is_windows())
}

/// Is `platform` the Android target?
pub fn is_android(platform: &str) -> bool {
    platform
        .parse::<TargetPlatform>()
        .is_ok_and(|p| p.is_android())
}
