//! Usage: Typed parse functions keyed by `ParserKind`, normalizing platform output.

pub(crate) mod interfaces;
pub(crate) mod volume;
pub(crate) mod wifi;

use super::command::ParserKind;

fn encode<T: serde::Serialize>(value: T) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|e| format!("PARSE_ERROR: failed to encode payload: {e}"))
}

/// Turns raw combined stdout into the operation's payload. Each variant is one
/// typed parse function; anything ambiguous fails closed with `PARSE_ERROR`.
pub(crate) fn parse_payload(
    parser: ParserKind,
    raw: &str,
) -> Result<Option<serde_json::Value>, String> {
    match parser {
        ParserKind::Ack => Ok(Some(serde_json::json!({}))),
        ParserKind::ConnectMessage => {
            let message = raw.trim();
            let message = if message.is_empty() { "ok" } else { message };
            Ok(Some(serde_json::json!({ "message": message })))
        }
        ParserKind::VolumeStatusPulse => {
            encode(volume::parse_pulse_status(raw)?).map(Some)
        }
        ParserKind::VolumeStatusAppleScript => {
            encode(volume::parse_applescript_status(raw)?).map(Some)
        }
        ParserKind::WifiScanNmcli => {
            let networks = wifi::parse_nmcli_scan(raw)?;
            Ok(Some(serde_json::json!({ "networks": networks })))
        }
        ParserKind::WifiScanNetsh => {
            let networks = wifi::parse_netsh_scan(raw)?;
            Ok(Some(serde_json::json!({ "networks": networks })))
        }
        ParserKind::WifiCurrentNmcli => {
            let connection = wifi::parse_nmcli_current(raw)?;
            Ok(Some(serde_json::json!({ "connection": connection })))
        }
        ParserKind::WifiCurrentNetsh => {
            let connection = wifi::parse_netsh_current(raw)?;
            Ok(Some(serde_json::json!({ "connection": connection })))
        }
        ParserKind::WifiCurrentNetworksetup => {
            let connection = wifi::parse_networksetup_current(raw)?;
            Ok(Some(serde_json::json!({ "connection": connection })))
        }
        ParserKind::InterfacesNmcli => encode(interfaces::parse_nmcli_status(raw)?).map(Some),
        ParserKind::InterfacesIpconfig => encode(interfaces::parse_ipconfig(raw)?).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_yields_an_empty_payload() {
        let payload = parse_payload(ParserKind::Ack, "").expect("ack").expect("payload");
        assert_eq!(payload, serde_json::json!({}));
    }

    #[test]
    fn connect_message_falls_back_to_ok() {
        let payload = parse_payload(ParserKind::ConnectMessage, "  \n")
            .expect("parse")
            .expect("payload");
        assert_eq!(payload, serde_json::json!({ "message": "ok" }));

        let payload = parse_payload(
            ParserKind::ConnectMessage,
            "Device 'wlan0' successfully activated.",
        )
        .expect("parse")
        .expect("payload");
        assert_eq!(
            payload,
            serde_json::json!({ "message": "Device 'wlan0' successfully activated." })
        );
    }
}
