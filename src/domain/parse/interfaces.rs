//! Usage: Normalize network-interface listings into active interfaces + wired-LAN flag.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NetworkInterface {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NetworkInterfaces {
    pub active_interfaces: Vec<NetworkInterface>,
    pub wired_lan_detected: bool,
}

/// Parses `nmcli --terse --fields DEVICE,TYPE,STATE device status`.
pub(crate) fn parse_nmcli_status(raw: &str) -> Result<NetworkInterfaces, String> {
    let mut active = Vec::new();
    let mut wired = false;

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 3 {
            return Err(format!(
                "PARSE_ERROR: expected 3 terse fields, got {} in: {line}",
                fields.len()
            ));
        }
        let (device, kind, state) = (fields[0].trim(), fields[1].trim(), fields[2].trim());
        if kind == "loopback" {
            continue;
        }
        // nmcli reports e.g. "connected" or "connected (externally)".
        if !state.starts_with("connected") {
            continue;
        }
        if kind == "ethernet" {
            wired = true;
        }
        active.push(NetworkInterface {
            name: device.to_string(),
            kind: kind.to_string(),
        });
    }

    Ok(NetworkInterfaces {
        active_interfaces: active,
        wired_lan_detected: wired,
    })
}

fn ipconfig_adapter_header(line: &str) -> Option<NetworkInterface> {
    let trimmed = line.trim_end_matches(':').trim();
    let (prefix, kind) = if let Some(rest) = trimmed.strip_prefix("Ethernet adapter ") {
        (rest, "ethernet")
    } else if let Some(rest) = trimmed.strip_prefix("Wireless LAN adapter ") {
        (rest, "wifi")
    } else {
        return None;
    };
    Some(NetworkInterface {
        name: prefix.trim().to_string(),
        kind: kind.to_string(),
    })
}

/// Parses `ipconfig` output: an adapter counts as active once an IPv4 address
/// line shows up inside its block.
pub(crate) fn parse_ipconfig(raw: &str) -> Result<NetworkInterfaces, String> {
    let mut active = Vec::new();
    let mut wired = false;
    let mut current: Option<NetworkInterface> = None;

    for raw_line in raw.lines() {
        if let Some(adapter) = ipconfig_adapter_header(raw_line) {
            current = Some(adapter);
            continue;
        }

        let line = raw_line.trim();
        if !(line.contains("IPv4 Address") || line.contains("IP Address")) {
            continue;
        }
        let Some(adapter) = current.take() else {
            continue;
        };
        let Some((_, tail)) = line.rsplit_once(':') else {
            current = Some(adapter);
            continue;
        };
        let ip = tail.trim();
        if ip.is_empty() || ip.parse::<std::net::Ipv4Addr>().is_err() {
            current = Some(adapter);
            continue;
        }
        if adapter.kind == "ethernet" {
            wired = true;
        }
        active.push(adapter);
    }

    Ok(NetworkInterfaces {
        active_interfaces: active,
        wired_lan_detected: wired,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmcli_status_reports_connected_non_loopback_devices() {
        let raw = "\
eth0:ethernet:connected
wlan0:wifi:disconnected
lo:loopback:unmanaged
wlan1:wifi:connected";
        let parsed = parse_nmcli_status(raw).expect("parse");
        assert!(parsed.wired_lan_detected);
        assert_eq!(parsed.active_interfaces.len(), 2);
        assert_eq!(parsed.active_interfaces[0].name, "eth0");
        assert_eq!(parsed.active_interfaces[1].kind, "wifi");
    }

    #[test]
    fn nmcli_status_without_wired_connection() {
        let raw = "eth0:ethernet:unavailable\nwlan0:wifi:connected";
        let parsed = parse_nmcli_status(raw).expect("parse");
        assert!(!parsed.wired_lan_detected);
        assert_eq!(parsed.active_interfaces.len(), 1);
    }

    #[test]
    fn nmcli_status_rejects_malformed_rows() {
        let err = parse_nmcli_status("eth0:ethernet").expect_err("malformed");
        assert!(err.starts_with("PARSE_ERROR:"), "{err}");
    }

    #[test]
    fn ipconfig_detects_adapters_with_ipv4_addresses() {
        let raw = "\
Windows IP Configuration

Ethernet adapter Ethernet0:

   Connection-specific DNS Suffix  . : home
   IPv4 Address. . . . . . . . . . . : 192.168.1.20
   Subnet Mask . . . . . . . . . . . : 255.255.255.0

Wireless LAN adapter Wi-Fi:

   Media State . . . . . . . . . . . : Media disconnected

Ethernet adapter vEthernet (WSL):

   IPv4 Address. . . . . . . . . . . : 172.28.0.1
";
        let parsed = parse_ipconfig(raw).expect("parse");
        assert!(parsed.wired_lan_detected);
        assert_eq!(parsed.active_interfaces.len(), 2);
        assert_eq!(parsed.active_interfaces[0].name, "Ethernet0");
        assert_eq!(parsed.active_interfaces[1].name, "vEthernet (WSL)");
    }

    #[test]
    fn ipconfig_ignores_disconnected_adapters() {
        let raw = "\
Wireless LAN adapter Wi-Fi:

   Media State . . . . . . . . . . . : Media disconnected
";
        let parsed = parse_ipconfig(raw).expect("parse");
        assert!(parsed.active_interfaces.is_empty());
        assert!(!parsed.wired_lan_detected);
    }
}
