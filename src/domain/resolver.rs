//! Usage: Pure mapping from (intent, platform) to an executable command plus parser.

use super::command::{ExternalCommand, ParserKind, PlatformCommand};
use super::intent::Intent;
use super::platform::Platform;

#[cfg(test)]
mod tests;

// Interface the macOS networking commands operate on. `networksetup` needs a
// hardware port device name and en0 is the Wi-Fi interface on every supported model.
const MACOS_WIFI_DEVICE: &str = "en0";

// Finds the connected Wi-Fi device, then disconnects it. nmcli has no
// one-shot "disconnect whatever wifi is up", so this stays a shell pipeline.
const LINUX_WIFI_DISCONNECT_SCRIPT: &str = "nmcli --terse --fields DEVICE,TYPE,STATE device status \
     | awk -F: '$2 == \"wifi\" && $3 == \"connected\" { print $1 }' \
     | xargs --no-run-if-empty --max-args 1 nmcli device disconnect";

fn unsupported(intent: &Intent, platform: Platform) -> String {
    format!(
        "UNSUPPORTED_PLATFORM: {} is not supported on {}",
        intent.name(),
        platform.as_str()
    )
}

/// Resolves an intent into the platform's command sequence. Pure: no I/O, no
/// side effects; uncovered (intent, platform) pairs come back as a structured
/// `UNSUPPORTED_PLATFORM` failure for the façade to relay.
pub(crate) fn resolve(intent: &Intent, platform: Platform) -> Result<PlatformCommand, String> {
    match (intent, platform) {
        (Intent::GetVolume, Platform::Linux) => Ok(PlatformCommand {
            steps: vec![
                ExternalCommand::new("pactl", &["get-sink-volume", "@DEFAULT_SINK@"]),
                ExternalCommand::new("pactl", &["get-sink-mute", "@DEFAULT_SINK@"]),
            ],
            parser: ParserKind::VolumeStatusPulse,
        }),
        (Intent::GetVolume, Platform::MacOs) => Ok(PlatformCommand {
            steps: vec![
                ExternalCommand::new(
                    "osascript",
                    &["-e", "output volume of (get volume settings)"],
                ),
                ExternalCommand::new(
                    "osascript",
                    &["-e", "output muted of (get volume settings)"],
                ),
            ],
            parser: ParserKind::VolumeStatusAppleScript,
        }),

        (Intent::SetVolume(level), Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::with_args(
                "pactl",
                vec![
                    "set-sink-volume".to_string(),
                    "@DEFAULT_SINK@".to_string(),
                    format!("{level}%"),
                ],
            ),
            ParserKind::Ack,
        )),
        (Intent::SetVolume(level), Platform::MacOs) => Ok(PlatformCommand::single(
            ExternalCommand::with_args(
                "osascript",
                vec!["-e".to_string(), format!("set volume output volume {level}")],
            ),
            ParserKind::Ack,
        )),

        (Intent::ToggleMute, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new("pactl", &["set-sink-mute", "@DEFAULT_SINK@", "toggle"]),
            ParserKind::Ack,
        )),
        (Intent::ToggleMute, Platform::MacOs) => Ok(PlatformCommand::single(
            ExternalCommand::new(
                "osascript",
                &[
                    "-e",
                    "set volume output muted (not (output muted of (get volume settings)))",
                ],
            ),
            ParserKind::Ack,
        )),

        (Intent::Shutdown, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new("systemctl", &["poweroff"]),
            ParserKind::Ack,
        )),
        (Intent::Shutdown, Platform::MacOs) => Ok(PlatformCommand::single(
            ExternalCommand::new(
                "osascript",
                &["-e", "tell application \"System Events\" to shut down"],
            ),
            ParserKind::Ack,
        )),
        (Intent::Shutdown, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("shutdown", &["/s", "/t", "0"]),
            ParserKind::Ack,
        )),

        (Intent::Restart, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new("systemctl", &["reboot"]),
            ParserKind::Ack,
        )),
        (Intent::Restart, Platform::MacOs) => Ok(PlatformCommand::single(
            ExternalCommand::new(
                "osascript",
                &["-e", "tell application \"System Events\" to restart"],
            ),
            ParserKind::Ack,
        )),
        (Intent::Restart, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("shutdown", &["/r", "/t", "0"]),
            ParserKind::Ack,
        )),

        (Intent::Sleep, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new("systemctl", &["suspend"]),
            ParserKind::Ack,
        )),
        (Intent::Sleep, Platform::MacOs) => Ok(PlatformCommand::single(
            ExternalCommand::new("pmset", &["sleepnow"]),
            ParserKind::Ack,
        )),
        (Intent::Sleep, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("rundll32", &["powrprof.dll,SetSuspendState", "0,1,0"]),
            ParserKind::Ack,
        )),

        (Intent::ScanWifi, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new(
                "nmcli",
                &[
                    "--terse",
                    "--fields",
                    "IN-USE,SSID,SIGNAL,SECURITY",
                    "device",
                    "wifi",
                    "list",
                ],
            ),
            ParserKind::WifiScanNmcli,
        )),
        (Intent::ScanWifi, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("netsh", &["wlan", "show", "networks", "mode=bssid"]),
            ParserKind::WifiScanNetsh,
        )),

        (
            Intent::ConnectWifi {
                ssid,
                password,
                hidden,
            },
            Platform::Linux,
        ) => {
            let mut args = vec![
                "device".to_string(),
                "wifi".to_string(),
                "connect".to_string(),
                ssid.clone(),
            ];
            if let Some(password) = password {
                args.push("password".to_string());
                args.push(password.clone());
            }
            args.push("hidden".to_string());
            args.push(if *hidden { "yes" } else { "no" }.to_string());
            Ok(PlatformCommand::single(
                ExternalCommand::with_args("nmcli", args),
                ParserKind::ConnectMessage,
            ))
        }
        (Intent::ConnectWifi { ssid, password, .. }, Platform::MacOs) => {
            let mut args = vec![
                "-setairportnetwork".to_string(),
                MACOS_WIFI_DEVICE.to_string(),
                ssid.clone(),
            ];
            if let Some(password) = password {
                args.push(password.clone());
            }
            Ok(PlatformCommand::single(
                ExternalCommand::with_args("networksetup", args),
                ParserKind::ConnectMessage,
            ))
        }
        // netsh connects by profile name; the password comes from the stored profile.
        (Intent::ConnectWifi { ssid, .. }, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::with_args(
                "netsh",
                vec![
                    "wlan".to_string(),
                    "connect".to_string(),
                    format!("name={ssid}"),
                ],
            ),
            ParserKind::ConnectMessage,
        )),

        (Intent::DisconnectWifi, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new("sh", &["-c", LINUX_WIFI_DISCONNECT_SCRIPT]),
            ParserKind::ConnectMessage,
        )),
        (Intent::DisconnectWifi, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("netsh", &["wlan", "disconnect"]),
            ParserKind::ConnectMessage,
        )),

        (Intent::GetCurrentWifiConnection, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new(
                "nmcli",
                &[
                    "--terse",
                    "--fields",
                    "ACTIVE,SSID,SIGNAL,SECURITY",
                    "device",
                    "wifi",
                    "list",
                ],
            ),
            ParserKind::WifiCurrentNmcli,
        )),
        (Intent::GetCurrentWifiConnection, Platform::MacOs) => Ok(PlatformCommand::single(
            ExternalCommand::new("networksetup", &["-getairportnetwork", MACOS_WIFI_DEVICE]),
            ParserKind::WifiCurrentNetworksetup,
        )),
        (Intent::GetCurrentWifiConnection, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("netsh", &["wlan", "show", "interfaces"]),
            ParserKind::WifiCurrentNetsh,
        )),

        (Intent::GetNetworkInterfaces, Platform::Linux) => Ok(PlatformCommand::single(
            ExternalCommand::new(
                "nmcli",
                &["--terse", "--fields", "DEVICE,TYPE,STATE", "device", "status"],
            ),
            ParserKind::InterfacesNmcli,
        )),
        (Intent::GetNetworkInterfaces, Platform::Windows) => Ok(PlatformCommand::single(
            ExternalCommand::new("ipconfig", &[]),
            ParserKind::InterfacesIpconfig,
        )),

        // Link opening goes through the opener plugin in the façade, not a shell command.
        (Intent::OpenExternalLink(_), _) => Err(unsupported(intent, platform)),

        (intent, platform) => Err(unsupported(intent, platform)),
    }
}
