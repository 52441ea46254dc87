use clap::{Parser, ValueEnum};

/// Which APIs the server mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    /// `/api/bugs` only.
    Bugs,
    /// `/api/agro` only.
    Agro,
    All,
}

impl Service {
    #[must_use]
    pub const fn bugs(self) -> bool {
        matches!(self, Self::Bugs | Self::All)
    }

    #[must_use]
    pub const fn agro(self) -> bool {
        matches!(self, Self::Agro | Self::All)
    }
}

/// Command-line arguments for `tallyd`.
#[derive(Debug, Parser)]
#[command(
    name = "tallyd",
    version,
    about = "Tally - bug tracker and agro marketplace API server"
)]
pub struct Cli {
    /// APIs to serve
    #[arg(short, long, value_enum, default_value_t = Service::All)]
    pub service: Service,

    /// Bind host (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides server.port and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Database path (overrides database.path)
    #[arg(long)]
    pub database: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Service};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_serve_everything() {
        let cli = Cli::try_parse_from(["tallyd"]).expect("cli should parse");
        assert_eq!(cli.service, Service::All);
        assert!(cli.service.bugs() && cli.service.agro());
        assert_eq!(cli.port, None);
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from([
            "tallyd",
            "--service",
            "agro",
            "--port",
            "5000",
            "--database",
            ":memory:",
            "-v",
        ])
        .expect("cli should parse");

        assert_eq!(cli.service, Service::Agro);
        assert!(!cli.service.bugs());
        assert_eq!(cli.port, Some(5000));
        assert_eq!(cli.database.as_deref(), Some(":memory:"));
        assert!(cli.verbose);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["tallyd", "-q", "-v"]).is_err());
    }
}
