//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary
//! lean. Supports environment variable overrides via the `DTOP_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

use dtop_layout::Direction;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
dtop — deployment topology viewer with power control

USAGE:
    dtop [OPTIONS]

OPTIONS:
    --file=PATH          Load the deployment document from a JSON file
                         instead of the built-in demo fixture
    --deployment=ID      Deployment identifier to request (default: demo)
    --direction=DIR      Graph flow direction: tb, bt, lr, rl (default: tb)
    --fetch-delay-ms=N   Simulated fetch/mutation latency for the demo
                         client (default: 400)
    --log-file=PATH      Diagnostic log destination (default: dtop.log)
    --no-mouse           Disable mouse event capture
    --exit-after-ms=N    Auto-quit after N milliseconds (for scripting)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    j/k, Up/Down    Move node selection
    Enter, m        Open the action menu for the selected node
    Esc             Dismiss the menu
    Tab             Switch focus between node list and graph
    Arrows          Pan the graph (graph focus)
    +/-, 0          Zoom / fit the graph
    d               Cycle the layout flow direction
    a               Deployment actions (destroy)
    r               Reload the deployment
    q, Ctrl+C       Quit

ENVIRONMENT VARIABLES:
    DTOP_LOG             Log filter (tracing EnvFilter syntax)
    DTOP_FILE            Override --file
    DTOP_DEPLOYMENT      Override --deployment
    DTOP_DIRECTION       Override --direction
    DTOP_EXIT_AFTER_MS   Override --exit-after-ms";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub file: Option<PathBuf>,
    pub deployment: String,
    pub direction: Direction,
    pub fetch_delay_ms: u64,
    pub log_file: PathBuf,
    pub mouse: bool,
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            file: None,
            deployment: "demo".into(),
            direction: Direction::TopToBottom,
            fetch_delay_ms: 400,
            log_file: PathBuf::from("dtop.log"),
            mouse: true,
            exit_after_ms: 0,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables. Explicit
    /// flags override environment values.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        if let Ok(val) = env::var("DTOP_FILE") {
            opts.file = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("DTOP_DEPLOYMENT") {
            opts.deployment = val;
        }
        if let Ok(val) = env::var("DTOP_DIRECTION")
            && let Ok(direction) = val.parse()
        {
            opts.direction = direction;
        }
        if let Ok(val) = env::var("DTOP_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        let args: Vec<String> = env::args().skip(1).collect();
        for arg in &args {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("dtop {VERSION}");
                    process::exit(0);
                }
                "--no-mouse" => {
                    opts.mouse = false;
                }
                other => {
                    if let Some(val) = other.strip_prefix("--file=") {
                        opts.file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--deployment=") {
                        opts.deployment = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--direction=") {
                        match val.parse() {
                            Ok(direction) => opts.direction = direction,
                            Err(err) => {
                                eprintln!("Invalid --direction value: {err}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--fetch-delay-ms=") {
                        match val.parse() {
                            Ok(n) => opts.fetch_delay_ms = n,
                            Err(_) => {
                                eprintln!("Invalid --fetch-delay-ms value: {val}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        match val.parse() {
                            Ok(n) => opts.exit_after_ms = n,
                            Err(_) => {
                                eprintln!("Invalid --exit-after-ms value: {val}");
                                process::exit(1);
                            }
                        }
                    } else {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.deployment, "demo");
        assert_eq!(opts.direction, Direction::TopToBottom);
        assert_eq!(opts.fetch_delay_ms, 400);
        assert!(opts.mouse);
        assert!(opts.file.is_none());
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_mentions_flags() {
        assert!(HELP_TEXT.contains("--direction=DIR"));
        assert!(HELP_TEXT.contains("--file=PATH"));
        assert!(HELP_TEXT.contains("DTOP_LOG"));
    }

    #[test]
    fn help_text_mentions_keybindings() {
        assert!(HELP_TEXT.contains("Dismiss the menu"));
        assert!(HELP_TEXT.contains("Cycle the layout flow direction"));
    }
}
