//! Usage: Normalize Wi-Fi scan/connection command output into typed structs.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WifiNetwork {
    pub ssid: String,
    pub signal: Option<u8>,
    pub security: Option<String>,
    pub in_use: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WifiConnection {
    pub ssid: String,
    pub signal: Option<u8>,
    pub security: Option<String>,
}

/// Splits one `nmcli --terse` row, honoring `\:` and `\\` escapes.
fn split_terse_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn normalize_security(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "--" {
        return None;
    }
    Some(trimmed.to_string())
}

fn parse_signal(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().map(|v| v.min(100))
}

/// Parses `nmcli --terse --fields IN-USE,SSID,SIGNAL,SECURITY device wifi list`.
pub(crate) fn parse_nmcli_scan(raw: &str) -> Result<Vec<WifiNetwork>, String> {
    let mut networks = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_terse_row(line);
        if fields.len() != 4 {
            return Err(format!(
                "PARSE_ERROR: expected 4 terse fields, got {} in: {line}",
                fields.len()
            ));
        }
        let ssid = fields[1].trim();
        if ssid.is_empty() {
            // Hidden networks show up as empty SSIDs; nothing useful to list.
            continue;
        }
        networks.push(WifiNetwork {
            ssid: ssid.to_string(),
            signal: parse_signal(&fields[2]),
            security: normalize_security(&fields[3]),
            in_use: fields[0].trim() == "*",
        });
    }
    Ok(networks)
}

/// Parses `nmcli --terse --fields ACTIVE,SSID,SIGNAL,SECURITY device wifi list`,
/// returning the active row if any.
pub(crate) fn parse_nmcli_current(raw: &str) -> Result<Option<WifiConnection>, String> {
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_terse_row(line);
        if fields.len() != 4 {
            return Err(format!(
                "PARSE_ERROR: expected 4 terse fields, got {} in: {line}",
                fields.len()
            ));
        }
        if !fields[0].trim().eq_ignore_ascii_case("yes") {
            continue;
        }
        let ssid = fields[1].trim();
        if ssid.is_empty() {
            continue;
        }
        return Ok(Some(WifiConnection {
            ssid: ssid.to_string(),
            signal: parse_signal(&fields[2]),
            security: normalize_security(&fields[3]),
        }));
    }
    Ok(None)
}

fn netsh_value(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value.trim())
}

fn netsh_signal(value: &str) -> Option<u8> {
    parse_signal(value.trim_end_matches('%'))
}

/// Parses `netsh wlan show networks mode=bssid` block output.
pub(crate) fn parse_netsh_scan(raw: &str) -> Result<Vec<WifiNetwork>, String> {
    let mut networks: Vec<WifiNetwork> = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("SSID ") {
            let Some(ssid) = netsh_value(trimmed) else {
                continue;
            };
            if ssid.is_empty() {
                continue;
            }
            networks.push(WifiNetwork {
                ssid: ssid.to_string(),
                signal: None,
                security: None,
                in_use: false,
            });
        } else if trimmed.starts_with("Authentication") {
            if let (Some(network), Some(value)) = (networks.last_mut(), netsh_value(trimmed)) {
                if network.security.is_none() {
                    network.security = normalize_security(value);
                }
            }
        } else if trimmed.starts_with("Signal") {
            if let (Some(network), Some(value)) = (networks.last_mut(), netsh_value(trimmed)) {
                if network.signal.is_none() {
                    network.signal = netsh_signal(value);
                }
            }
        }
    }
    Ok(networks)
}

/// Parses `netsh wlan show interfaces`, returning the connected interface if any.
pub(crate) fn parse_netsh_current(raw: &str) -> Result<Option<WifiConnection>, String> {
    let mut connected = false;
    let mut ssid: Option<String> = None;
    let mut signal: Option<u8> = None;
    let mut security: Option<String> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("State") {
            connected = netsh_value(trimmed)
                .map(|v| v.eq_ignore_ascii_case("connected"))
                .unwrap_or(false);
        } else if trimmed.starts_with("SSID") {
            ssid = netsh_value(trimmed)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
        } else if trimmed.starts_with("Signal") {
            signal = netsh_value(trimmed).and_then(netsh_signal);
        } else if trimmed.starts_with("Authentication") {
            security = netsh_value(trimmed).and_then(normalize_security);
        }
    }

    if !connected {
        return Ok(None);
    }
    let Some(ssid) = ssid else {
        return Ok(None);
    };
    Ok(Some(WifiConnection {
        ssid,
        signal,
        security,
    }))
}

/// Parses `networksetup -getairportnetwork en0`.
pub(crate) fn parse_networksetup_current(raw: &str) -> Result<Option<WifiConnection>, String> {
    let trimmed = raw.trim();
    if trimmed.contains("not associated") {
        return Ok(None);
    }
    let Some((_, ssid)) = trimmed.split_once(':') else {
        return Err(format!(
            "PARSE_ERROR: unrecognized networksetup output: {trimmed}"
        ));
    };
    let ssid = ssid.trim();
    if ssid.is_empty() {
        return Ok(None);
    }
    Ok(Some(WifiConnection {
        ssid: ssid.to_string(),
        signal: None,
        security: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmcli_scan_parses_terse_rows() {
        let raw = "*:HomeLab:87:WPA2\n:Cafe Guest:52:WPA1 WPA2\n::30:--\n:PlainOpen:44:--";
        let networks = parse_nmcli_scan(raw).expect("parse");
        assert_eq!(networks.len(), 3);
        assert_eq!(
            networks[0],
            WifiNetwork {
                ssid: "HomeLab".to_string(),
                signal: Some(87),
                security: Some("WPA2".to_string()),
                in_use: true,
            }
        );
        assert_eq!(networks[2].security, None);
    }

    #[test]
    fn nmcli_scan_honors_escaped_colons_in_ssids() {
        let raw = r"*:Cafe\: Upstairs:66:WPA2";
        let networks = parse_nmcli_scan(raw).expect("parse");
        assert_eq!(networks[0].ssid, "Cafe: Upstairs");
    }

    #[test]
    fn nmcli_scan_rejects_malformed_rows() {
        let err = parse_nmcli_scan("onlyonefield").expect_err("malformed");
        assert!(err.starts_with("PARSE_ERROR:"), "{err}");
    }

    #[test]
    fn nmcli_current_picks_the_active_row() {
        let raw = "no:Cafe Guest:52:WPA2\nyes:HomeLab:87:WPA2\nno:Other:10:--";
        let connection = parse_nmcli_current(raw).expect("parse").expect("active row");
        assert_eq!(connection.ssid, "HomeLab");
        assert_eq!(connection.signal, Some(87));
    }

    #[test]
    fn nmcli_current_returns_null_when_disconnected() {
        let raw = "no:Cafe Guest:52:WPA2";
        assert_eq!(parse_nmcli_current(raw).expect("parse"), None);
    }

    #[test]
    fn netsh_scan_collects_blocks() {
        let raw = "\
Interface name : Wi-Fi
There are 2 networks currently visible.

SSID 1 : HomeLab
    Network type            : Infrastructure
    Authentication          : WPA2-Personal
    Encryption              : CCMP
    BSSID 1                 : aa:bb:cc:dd:ee:ff
         Signal             : 87%

SSID 2 : Cafe Guest
    Network type            : Infrastructure
    Authentication          : Open
    Encryption              : None
    BSSID 1                 : 11:22:33:44:55:66
         Signal             : 52%
";
        let networks = parse_netsh_scan(raw).expect("parse");
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].ssid, "HomeLab");
        assert_eq!(networks[0].signal, Some(87));
        assert_eq!(networks[0].security, Some("WPA2-Personal".to_string()));
        assert_eq!(networks[1].signal, Some(52));
    }

    #[test]
    fn netsh_current_requires_connected_state() {
        let connected = "\
    Name                   : Wi-Fi
    State                  : connected
    SSID                   : HomeLab
    Signal                 : 87%
    Authentication         : WPA2-Personal
";
        let connection = parse_netsh_current(connected)
            .expect("parse")
            .expect("connected");
        assert_eq!(connection.ssid, "HomeLab");
        assert_eq!(connection.signal, Some(87));

        let disconnected = "    Name : Wi-Fi\n    State : disconnected\n";
        assert_eq!(parse_netsh_current(disconnected).expect("parse"), None);
    }

    #[test]
    fn networksetup_current_handles_both_shapes() {
        let connection = parse_networksetup_current("Current Wi-Fi Network: HomeLab")
            .expect("parse")
            .expect("connected");
        assert_eq!(connection.ssid, "HomeLab");

        let none =
            parse_networksetup_current("You are not associated with an AirPort network.")
                .expect("parse");
        assert_eq!(none, None);

        assert!(parse_networksetup_current("garbage output").is_err());
    }
}
