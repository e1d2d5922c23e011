use super::*;

const ALL_PLATFORMS: [Platform; 3] = [Platform::Linux, Platform::MacOs, Platform::Windows];

#[test]
fn resolve_is_pure_for_identical_inputs() {
    let intent = Intent::ConnectWifi {
        ssid: "lab".to_string(),
        password: Some("secret".to_string()),
        hidden: true,
    };
    let first = resolve(&intent, Platform::Linux).expect("resolve");
    let second = resolve(&intent, Platform::Linux).expect("resolve");
    assert_eq!(first, second);
}

#[test]
fn get_volume_on_linux_is_a_two_step_pulse_query() {
    let command = resolve(&Intent::GetVolume, Platform::Linux).expect("resolve");
    assert_eq!(command.parser, ParserKind::VolumeStatusPulse);
    assert_eq!(command.steps.len(), 2);
    assert_eq!(command.steps[0].program, "pactl");
    assert!(command.steps[0].args.contains(&"get-sink-volume".to_string()));
    assert!(command.steps[1].args.contains(&"get-sink-mute".to_string()));
}

#[test]
fn set_volume_embeds_the_level_in_platform_units() {
    let linux = resolve(&Intent::SetVolume(37), Platform::Linux).expect("resolve");
    assert_eq!(linux.steps[0].args.last().map(String::as_str), Some("37%"));

    let macos = resolve(&Intent::SetVolume(37), Platform::MacOs).expect("resolve");
    assert_eq!(
        macos.steps[0].args.last().map(String::as_str),
        Some("set volume output volume 37")
    );
}

#[test]
fn connect_wifi_on_linux_carries_the_hidden_flag() {
    let hidden = resolve(
        &Intent::ConnectWifi {
            ssid: "lab".to_string(),
            password: None,
            hidden: true,
        },
        Platform::Linux,
    )
    .expect("resolve");
    let args = &hidden.steps[0].args;
    assert_eq!(args.last().map(String::as_str), Some("yes"));
    assert!(!args.contains(&"password".to_string()));

    let visible = resolve(
        &Intent::ConnectWifi {
            ssid: "lab".to_string(),
            password: Some("secret".to_string()),
            hidden: false,
        },
        Platform::Linux,
    )
    .expect("resolve");
    let args = &visible.steps[0].args;
    assert_eq!(args.last().map(String::as_str), Some("no"));
    let pw_index = args.iter().position(|a| a == "password").expect("password flag");
    assert_eq!(args.get(pw_index + 1).map(String::as_str), Some("secret"));
}

#[test]
fn ssid_is_passed_as_a_single_argv_entry() {
    let command = resolve(
        &Intent::ConnectWifi {
            ssid: "cafe wifi; rm -rf /".to_string(),
            password: None,
            hidden: true,
        },
        Platform::Linux,
    )
    .expect("resolve");
    assert!(command.steps[0]
        .args
        .contains(&"cafe wifi; rm -rf /".to_string()));
}

#[test]
fn power_intents_resolve_on_every_platform() {
    for platform in ALL_PLATFORMS {
        for intent in [Intent::Shutdown, Intent::Restart, Intent::Sleep] {
            let command = resolve(&intent, platform).expect("resolve");
            assert_eq!(command.parser, ParserKind::Ack);
            assert_eq!(command.steps.len(), 1);
        }
    }
}

#[test]
fn uncovered_pairs_fail_closed_as_unsupported() {
    for (intent, platform) in [
        (Intent::GetVolume, Platform::Windows),
        (Intent::SetVolume(50), Platform::Windows),
        (Intent::ToggleMute, Platform::Windows),
        (Intent::ScanWifi, Platform::MacOs),
        (Intent::DisconnectWifi, Platform::MacOs),
        (Intent::GetNetworkInterfaces, Platform::MacOs),
    ] {
        let err = resolve(&intent, platform).expect_err("must be unsupported");
        assert!(err.starts_with("UNSUPPORTED_PLATFORM:"), "{err}");
        assert!(err.contains(platform.as_str()), "{err}");
    }
}

#[test]
fn open_external_link_is_never_shelled_out() {
    for platform in ALL_PLATFORMS {
        let err = resolve(
            &Intent::OpenExternalLink("https://example.com".to_string()),
            platform,
        )
        .expect_err("opener plugin owns this");
        assert!(err.starts_with("UNSUPPORTED_PLATFORM:"), "{err}");
    }
}
