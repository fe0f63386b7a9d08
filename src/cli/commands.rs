use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "studydash")]
#[command(version)]
#[command(about = "A terminal dashboard for AWS and GCP study notes")]
#[command(
    long_about = "studydash - Browse a catalog of AWS and GCP study notes from your terminal.\n\n\
    Launch without a command for the interactive dashboard: a grouped, searchable sidebar,\n\
    rendered Markdown with syntax highlighting, and browser links for PDF resources.\n\
    Use a command for one-shot output.\n\n\
    Examples:\n  \
    studydash                          # Interactive dashboard\n  \
    studydash --offline                # Dashboard with placeholder documents\n  \
    studydash list --filter lambda     # Search the catalog\n  \
    studydash render AWS/EC2.md --out ec2.html"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Base URL of the document host
    ///
    /// Every catalog path is fetched from `<BASE_URL>/<path>`.
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Serve placeholder documents instead of fetching
    #[arg(long = "offline", global = true)]
    pub offline: bool,

    /// Start in dark mode
    #[arg(long = "dark", conflicts_with = "light", global = true)]
    pub dark: bool,

    /// Start in light mode
    #[arg(long = "light", global = true)]
    pub light: bool,

    /// Force color mode (auto, rgb, 256)
    ///
    /// Override automatic terminal detection:
    ///   auto - Detect terminal capabilities (default)
    ///   rgb  - Force true color (16M colors)
    ///   256  - Force 256-color palette
    ///
    /// Example: --color-mode 256
    #[arg(long = "color-mode", value_name = "MODE", global = true)]
    pub color_mode: Option<ColorModeArg>,

    /// Read configuration from this file instead of the default location
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Dark-mode override from `--dark` / `--light`
    pub fn dark_mode(&self) -> Option<bool> {
        if self.dark {
            Some(true)
        } else if self.light {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorModeArg {
    Auto,
    Rgb,
    #[value(name = "256")]
    Color256,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the document catalog, grouped
    ///
    /// Example: studydash list --filter "cloud" --output json
    List {
        /// Case-insensitive title filter
        #[arg(long = "filter", value_name = "QUERY", default_value = "")]
        filter: String,

        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,
    },

    /// Fetch a catalog document and print it as a standalone HTML page
    ///
    /// PDF entries produce a page that links to the embedded viewer.
    ///
    /// Example: studydash render AWS/EC2.md --out ec2.html
    Render {
        /// Catalog path, e.g. AWS/EC2.md
        path: String,

        /// Write to this file instead of stdout
        #[arg(long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_launches_tui() {
        let cli = Cli::try_parse_from(["studydash", "--offline", "--light"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.global.offline);
        assert_eq!(cli.global.dark_mode(), Some(false));
    }

    #[test]
    fn test_list_command() {
        let cli =
            Cli::try_parse_from(["studydash", "list", "--filter", "s3", "-o", "json"]).unwrap();
        let Some(Command::List { filter, output }) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(filter, "s3");
        assert_eq!(output, OutputFormat::Json);
    }

    #[test]
    fn test_render_with_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "studydash",
            "render",
            "AWS/EC2.md",
            "--base-url",
            "http://localhost:8000",
            "--color-mode",
            "256",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Render { ref path, out: None }) if path == "AWS/EC2.md"
        ));
        assert_eq!(cli.global.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(cli.global.color_mode, Some(ColorModeArg::Color256));
    }

    #[test]
    fn test_dark_and_light_conflict() {
        assert!(Cli::try_parse_from(["studydash", "--dark", "--light"]).is_err());
    }
}
