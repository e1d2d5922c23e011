//! Usage: Resolved, executable command representation plus its output-parsing tag.

/// One program invocation. Arguments are passed as argv entries, never through a shell,
/// unless the resolver itself chose a shell as the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub tolerated_exit_codes: Vec<i32>,
}

impl ExternalCommand {
    pub(crate) fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            tolerated_exit_codes: Vec::new(),
        }
    }

    pub(crate) fn with_args(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
            tolerated_exit_codes: Vec::new(),
        }
    }

    pub(crate) fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// Tags the typed parse function that turns raw command output into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParserKind {
    /// No meaningful output; success is the payload.
    Ack,
    /// Success message relayed from the command's stdout.
    ConnectMessage,
    VolumeStatusPulse,
    VolumeStatusAppleScript,
    WifiScanNmcli,
    WifiScanNetsh,
    WifiCurrentNmcli,
    WifiCurrentNetsh,
    WifiCurrentNetworksetup,
    InterfacesNmcli,
    InterfacesIpconfig,
}

/// A fully resolved intent: the command steps to run and how to read their output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlatformCommand {
    pub steps: Vec<ExternalCommand>,
    pub parser: ParserKind,
}

impl PlatformCommand {
    pub(crate) fn single(step: ExternalCommand, parser: ParserKind) -> Self {
        Self {
            steps: vec![step],
            parser,
        }
    }
}
