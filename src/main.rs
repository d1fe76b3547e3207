//! docview - Documentation viewer with asynchronous diagram rendering
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;

use docview_app::config::init_config_dir;

/// docview - Documentation viewer with asynchronous diagram rendering
#[derive(Parser, Debug)]
#[command(name = "docview")]
#[command(about = "Documentation viewer with asynchronous diagram rendering", long_about = None)]
struct Args {
    /// Path to the docs project (directory holding menu.toml)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Run in headless mode (JSON events on stdout, commands on stdin)
    #[arg(long, conflicts_with = "export")]
    headless: bool,

    /// Export every page as static HTML into this directory
    #[arg(long, value_name = "OUT")]
    export: Option<PathBuf>,

    /// Write a commented default .docview/config.toml
    #[arg(long)]
    init: bool,
}

/// What a run does once the config directory is taken care of.
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Export(PathBuf),
    Headless,
    /// `--init` alone: write the config and stop
    InitOnly,
    /// Nothing requested
    Help,
}

impl Args {
    fn mode(&self) -> Mode {
        match (&self.export, self.headless) {
            (Some(out_dir), _) => Mode::Export(out_dir.clone()),
            (None, true) => Mode::Headless,
            (None, false) if self.init => Mode::InitOnly,
            (None, false) => Mode::Help,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let mode = args.mode();
    if mode == Mode::Help {
        Args::command().print_help()?;
        return Ok(());
    }

    docview_core::logging::init()?;

    let project_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if args.init {
        init_config_dir(&project_path)?;
        eprintln!("✅ Wrote {}/.docview/config.toml", project_path.display());
        if mode == Mode::InitOnly {
            return Ok(());
        }
    }

    let state = match docview::load_project(&project_path) {
        Ok(state) => state,
        Err(e) if e.is_fatal() => {
            eprintln!("❌ {}", e);
            eprintln!();
            eprintln!("A docs project must have:");
            eprintln!("  • menu.toml with [[groups]] and [[groups.items]] (id, label, icon)");
            eprintln!("  • docs/<id>.md for each entry that has content");
            eprintln!();
            eprintln!("Hint: pass the project path as an argument:");
            eprintln!("      docview --export site/ /path/to/docs");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let mut engine = docview::system_engine(state);

    match mode {
        Mode::Export(out_dir) => {
            let summary = docview::export_site(&mut engine, &out_dir).await?;
            eprintln!(
                "✅ Exported {} page(s) to {}",
                summary.pages.len(),
                out_dir.display()
            );
            if !summary.unsettled.is_empty() {
                eprintln!(
                    "⚠️  Diagrams still rendering when written: {}",
                    summary.unsettled.join(", ")
                );
            }
            Ok(())
        }
        Mode::Headless => Ok(docview::run_headless(&mut engine, &project_path).await?),
        Mode::InitOnly | Mode::Help => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_of(argv: &[&str]) -> Mode {
        Args::try_parse_from(argv).unwrap().mode()
    }

    #[test]
    fn test_bare_invocation_prints_help() {
        assert_eq!(mode_of(&["docview"]), Mode::Help);
        assert_eq!(mode_of(&["docview", "./site"]), Mode::Help);
    }

    #[test]
    fn test_modes_from_flags() {
        assert_eq!(mode_of(&["docview", "--headless", "./site"]), Mode::Headless);
        assert_eq!(
            mode_of(&["docview", "--export", "out", "./site"]),
            Mode::Export(PathBuf::from("out"))
        );
        assert_eq!(mode_of(&["docview", "--init"]), Mode::InitOnly);
        assert_eq!(mode_of(&["docview", "--init", "--headless"]), Mode::Headless);
    }

    #[test]
    fn test_headless_conflicts_with_export() {
        assert!(Args::try_parse_from(["docview", "--headless", "--export", "out"]).is_err());
    }
}
