//! # studydash
//!
//! A terminal dashboard for browsing AWS and GCP study notes.
//!
//! ## Usage
//!
//! Launch the interactive dashboard:
//! ```sh
//! studydash
//! ```
//!
//! List the catalog:
//! ```sh
//! studydash list --filter lambda
//! ```
//!
//! Render a document to HTML:
//! ```sh
//! studydash render AWS/EC2.md --out ec2.html
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, ColorModeArg, Command, GlobalArgs, OutputFormat};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use std::io::Write;
use std::path::Path;
use studydash::catalog::{Catalog, DocumentEntry};
use studydash::fetch::{raw_url, viewer_url};
use studydash::markdown::html;
use studydash::tui::{App, AppOptions, ColorMode, TerminalCapabilities};
use studydash::{Config, logging};
use tempfile::NamedTempFile;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    match args.command {
        None => {
            let log_path = logging::init_file();
            let config = load_config(&args.global)?;
            run_tui(&args.global, config, log_path.as_deref())
        }
        Some(Command::List { filter, output }) => {
            logging::init_stderr();
            print_catalog(&filter, output)
        }
        Some(Command::Render { path, out }) => {
            logging::init_stderr();
            let config = load_config(&args.global)?;
            render_document(&config, &path, out.as_deref())
        }
    }
}

/// Config file, then CLI overrides on top
fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if let Some(ref base_url) = args.base_url {
        config.source.base_url = base_url.clone();
    }
    if args.offline {
        config.source.offline = true;
    }
    if let Some(dark) = args.dark_mode() {
        config.ui.dark_mode = dark;
    }
    Ok(config)
}

fn run_tui(args: &GlobalArgs, config: Config, log_path: Option<&Path>) -> Result<()> {
    // Detect terminal capabilities and determine color mode
    // Priority: CLI args > config file > auto-detection
    let forced = match args.color_mode {
        Some(ColorModeArg::Auto) => None,
        Some(ColorModeArg::Rgb) => Some(ColorMode::Rgb),
        Some(ColorModeArg::Color256) => Some(ColorMode::Indexed256),
        None => config.color_mode(),
    };
    let color_mode = TerminalCapabilities::resolve(forced);

    let source = config
        .document_source()
        .wrap_err("could not set up the HTTP client")?;
    tracing::info!(
        source = source.name(),
        base_url = %config.source.base_url,
        log = ?log_path,
        ?color_mode,
        "starting dashboard"
    );

    let app = App::new(
        AppOptions {
            base_url: config.source.base_url.clone(),
            dark_mode: config.ui.dark_mode,
            sidebar_width: config.ui.sidebar_width,
            back_to_top_threshold: config.ui.back_to_top_threshold,
            color_mode,
        },
        source,
        config.keybindings(),
    );

    // Enters raw mode and the alternate screen, and installs a panic hook that
    // restores the terminal
    let mut terminal = ratatui::try_init()?;
    let result = studydash::tui::run(&mut terminal, app);
    ratatui::restore();
    result
}

fn print_catalog(filter: &str, output: OutputFormat) -> Result<()> {
    let catalog = Catalog::builtin();
    let groups = catalog.filtered(filter);

    match output {
        OutputFormat::Plain => {
            let mut stdout = std::io::stdout().lock();
            for (group, entries) in groups {
                if entries.is_empty() {
                    continue;
                }
                writeln!(stdout, "{}", group.name)?;
                for entry in entries {
                    writeln!(stdout, "  {:<40} {}", entry.title, entry.path)?;
                }
            }
        }
        OutputFormat::Json => {
            let json: Vec<_> = groups
                .into_iter()
                .map(|(group, entries)| {
                    serde_json::json!({
                        "name": group.name,
                        "entries": entries,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

fn render_document(config: &Config, path: &str, out: Option<&Path>) -> Result<()> {
    let catalog = Catalog::builtin();
    let entry = catalog
        .find(path)
        .ok_or_else(|| eyre!("'{path}' is not in the catalog (see `studydash list`)"))?;

    let page = if entry.is_pdf() {
        pdf_page(config, entry)
    } else {
        let source = config
            .document_source()
            .wrap_err("could not set up the HTTP client")?;
        let markdown = source
            .fetch(entry.path)
            .wrap_err_with(|| format!("could not fetch {}", entry.path))?
            .into_text();
        tracing::info!(path = entry.path, bytes = markdown.len(), "document fetched");
        let title = entry.file_name().replacen(".md", "", 1);
        html::standalone_page(&title, &html::render(&markdown), config.ui.dark_mode)
    };

    match out {
        Some(out) => write_atomic(out, &page)
            .wrap_err_with(|| format!("could not write {}", out.display())),
        None => {
            print!("{page}");
            Ok(())
        }
    }
}

/// PDFs aren't converted: the page links to the viewer and the file
fn pdf_page(config: &Config, entry: &DocumentEntry) -> String {
    let base_url = &config.source.base_url;
    let viewer = html::escape_text(&viewer_url(base_url, entry.path));
    let direct = html::escape_text(&raw_url(base_url, entry.path));
    let body = format!(
        "<h1>{title}</h1>\n<p><a href=\"{viewer}\">Open in the document viewer</a></p>\n\
         <p><a href=\"{direct}\">Download the PDF</a></p>\n",
        title = html::escape_text(entry.title),
    );
    html::standalone_page(entry.file_name(), &body, config.ui.dark_mode)
}

/// Write via a temp file in the same directory, then rename over the target
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path)?;
    tracing::info!(path = %path.display(), "page written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = GlobalArgs {
            base_url: Some("http://localhost:9000".to_string()),
            offline: true,
            light: true,
            ..GlobalArgs::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[source]\nbase_url = \"http://file\"\n[ui]\ndark_mode = true\n")
            .unwrap();
        let args = GlobalArgs {
            config: Some(path),
            ..args
        };

        let config = load_config(&args).unwrap();
        assert_eq!(config.source.base_url, "http://localhost:9000");
        assert!(config.source.offline);
        assert!(!config.ui.dark_mode);
    }

    #[test]
    fn test_render_offline_markdown_to_file() {
        let mut config = Config::default();
        config.source.offline = true;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ec2.html");

        render_document(&config, "AWS/EC2.md", Some(&out)).unwrap();
        let page = std::fs::read_to_string(&out).unwrap();
        assert!(page.contains("<title>EC2</title>"));
        assert!(page.contains("<h1>EC2</h1>"));
    }

    #[test]
    fn test_render_pdf_links_viewer() {
        let config = Config::default();
        let entry = Catalog::builtin()
            .find("AWS/123/Cloud_QA_with_Diagrams.pdf")
            .cloned()
            .unwrap();
        let page = pdf_page(&config, &entry);
        assert!(page.contains("https://docs.google.com/viewer?url="));
        assert!(page.contains("Cloud Q&amp;A with Diagrams"));
    }

    #[test]
    fn test_render_unknown_path_fails() {
        let config = Config::default();
        assert!(render_document(&config, "AWS/Nope.md", None).is_err());
    }
}
