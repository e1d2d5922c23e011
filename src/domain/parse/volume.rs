//! Usage: Normalize platform volume output to a 0-100 integer scale plus mute flag.

use serde::Serialize;

/// PulseAudio reports raw sample volume where this value means 100%.
pub(crate) const PULSE_RAW_SCALE: u32 = 65_536;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeState {
    pub volume: u8,
    pub is_muted: bool,
}

pub(crate) fn raw_to_percent(raw: u32) -> u8 {
    let percent = (raw as u64 * 100 + PULSE_RAW_SCALE as u64 / 2) / PULSE_RAW_SCALE as u64;
    percent.min(100) as u8
}

fn parse_percent_token(token: &str) -> Result<u8, String> {
    let digits = token.trim_end_matches('%');
    // Locale-dependent decimal separators make the value ambiguous; fail closed.
    if digits.contains(',') || digits.contains('.') {
        return Err(format!(
            "PARSE_ERROR: ambiguous volume percentage token: {token}"
        ));
    }
    digits
        .parse::<u32>()
        .map(|v| v.min(100) as u8)
        .map_err(|e| format!("PARSE_ERROR: invalid volume percentage {token}: {e}"))
}

/// Parses the combined output of `pactl get-sink-volume` + `pactl get-sink-mute`.
///
/// Example line: `Volume: front-left: 39321 /  60% / -13.15 dB,  front-right: ...`
/// The raw sample value (0-65536 scale) is authoritative; the percentage token is
/// used as a cross-check and the parse fails closed when the two disagree.
pub(crate) fn parse_pulse_status(raw: &str) -> Result<VolumeState, String> {
    let volume_line = raw
        .lines()
        .find(|line| line.trim_start().starts_with("Volume:"))
        .ok_or_else(|| "PARSE_ERROR: no Volume: line in pactl output".to_string())?;

    let tokens: Vec<&str> = volume_line.split_whitespace().collect();
    let raw_value = tokens
        .iter()
        .find_map(|token| token.parse::<u32>().ok());
    let percent_token = tokens.iter().find(|token| token.ends_with('%'));

    let volume = match (raw_value, percent_token) {
        (Some(raw_value), Some(token)) => {
            let normalized = raw_to_percent(raw_value);
            let percent = parse_percent_token(token)?;
            if normalized.abs_diff(percent) > 1 {
                return Err(format!(
                    "PARSE_ERROR: raw volume {raw_value} and percentage {percent}% disagree"
                ));
            }
            normalized
        }
        (Some(raw_value), None) => raw_to_percent(raw_value),
        (None, Some(token)) => parse_percent_token(token)?,
        (None, None) => {
            return Err(format!(
                "PARSE_ERROR: no volume value in pactl line: {volume_line}"
            ))
        }
    };

    let mute_line = raw
        .lines()
        .find(|line| line.trim_start().starts_with("Mute:"))
        .ok_or_else(|| "PARSE_ERROR: no Mute: line in pactl output".to_string())?;
    let is_muted = match mute_line.split(':').nth(1).map(str::trim) {
        Some("yes") => true,
        Some("no") => false,
        other => {
            return Err(format!(
                "PARSE_ERROR: unrecognized mute state: {:?}",
                other.unwrap_or("")
            ))
        }
    };

    Ok(VolumeState { volume, is_muted })
}

/// Parses the combined output of the two AppleScript volume queries:
/// a 0-100 integer on the first line, `true`/`false` on the second.
pub(crate) fn parse_applescript_status(raw: &str) -> Result<VolumeState, String> {
    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

    let volume_line = lines
        .next()
        .ok_or_else(|| "PARSE_ERROR: empty osascript volume output".to_string())?;
    let volume = volume_line
        .parse::<u32>()
        .map(|v| v.min(100) as u8)
        .map_err(|e| format!("PARSE_ERROR: invalid osascript volume {volume_line}: {e}"))?;

    let muted_line = lines
        .next()
        .ok_or_else(|| "PARSE_ERROR: missing osascript mute output".to_string())?;
    let is_muted = match muted_line {
        "true" => true,
        "false" => false,
        other => return Err(format!("PARSE_ERROR: unrecognized mute state: {other}")),
    };

    Ok(VolumeState { volume, is_muted })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACTL_OUTPUT: &str = "Volume: front-left: 39321 /  60% / -13.15 dB,   front-right: 39321 /  60% / -13.15 dB\nMute: no";

    #[test]
    fn pulse_output_normalizes_raw_scale() {
        let state = parse_pulse_status(PACTL_OUTPUT).expect("parse");
        assert_eq!(
            state,
            VolumeState {
                volume: 60,
                is_muted: false
            }
        );
    }

    #[test]
    fn pulse_mute_flag_is_read_from_its_own_line() {
        let raw = "Volume: front-left: 65536 / 100% / 0.00 dB\nMute: yes";
        let state = parse_pulse_status(raw).expect("parse");
        assert_eq!(state.volume, 100);
        assert!(state.is_muted);
    }

    #[test]
    fn pulse_locale_decimal_separator_fails_closed() {
        let raw = "Volume: front-left: 60,5% / -13 dB\nMute: no";
        let err = parse_pulse_status(raw).expect_err("ambiguous");
        assert!(err.starts_with("PARSE_ERROR:"), "{err}");
    }

    #[test]
    fn pulse_raw_and_percent_disagreement_fails_closed() {
        let raw = "Volume: front-left: 65536 / 20% / 0.00 dB\nMute: no";
        let err = parse_pulse_status(raw).expect_err("mismatch");
        assert!(err.contains("disagree"), "{err}");
    }

    #[test]
    fn raw_scale_round_trips_within_rounding() {
        for percent in [0u8, 1, 25, 50, 60, 99, 100] {
            let raw = (percent as u64 * PULSE_RAW_SCALE as u64 / 100) as u32;
            let normalized = raw_to_percent(raw);
            assert!(
                normalized.abs_diff(percent) <= 1,
                "{percent}% -> raw {raw} -> {normalized}%"
            );
        }
    }

    #[test]
    fn applescript_output_parses_volume_and_mute() {
        let state = parse_applescript_status("45\nfalse").expect("parse");
        assert_eq!(
            state,
            VolumeState {
                volume: 45,
                is_muted: false
            }
        );

        let state = parse_applescript_status("0\ntrue").expect("parse");
        assert!(state.is_muted);
    }

    #[test]
    fn applescript_garbage_fails_closed() {
        assert!(parse_applescript_status("").is_err());
        assert!(parse_applescript_status("loud\nfalse").is_err());
        assert!(parse_applescript_status("45\nmaybe").is_err());
    }
}
