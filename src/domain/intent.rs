//! Usage: Abstract, platform-independent system-control requests.

/// One requested system action. Constructed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Intent {
    GetVolume,
    SetVolume(u8),
    ToggleMute,
    Shutdown,
    Restart,
    Sleep,
    ScanWifi,
    ConnectWifi {
        ssid: String,
        password: Option<String>,
        hidden: bool,
    },
    DisconnectWifi,
    GetCurrentWifiConnection,
    GetNetworkInterfaces,
    OpenExternalLink(String),
}

impl Intent {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::GetVolume => "get-volume",
            Self::SetVolume(_) => "set-volume",
            Self::ToggleMute => "toggle-mute",
            Self::Shutdown => "shutdown",
            Self::Restart => "restart",
            Self::Sleep => "sleep",
            Self::ScanWifi => "scan-wifi",
            Self::ConnectWifi { .. } => "connect-wifi",
            Self::DisconnectWifi => "disconnect-wifi",
            Self::GetCurrentWifiConnection => "get-current-wifi-connection",
            Self::GetNetworkInterfaces => "get-network-interfaces",
            Self::OpenExternalLink(_) => "open-external-link",
        }
    }
}

/// Out-of-range volume requests are clamped, not rejected: 150 sets 100, -5 sets 0.
pub(crate) fn clamp_volume_level(level: i64) -> u8 {
    level.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_levels_are_clamped_to_percent_range() {
        assert_eq!(clamp_volume_level(-5), 0);
        assert_eq!(clamp_volume_level(0), 0);
        assert_eq!(clamp_volume_level(42), 42);
        assert_eq!(clamp_volume_level(100), 100);
        assert_eq!(clamp_volume_level(150), 100);
        assert_eq!(clamp_volume_level(i64::MAX), 100);
    }
}
