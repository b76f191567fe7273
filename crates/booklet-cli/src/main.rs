mod logger;

use anyhow::{Context, Result, bail};
use booklet_core::layout::FaceSide;
use booklet_core::{BookletOptions, BookletStatistics, Margins, compose};
use booklet_runtime::{BookletCommand, BookletUpdate, worker_task};
use clap::{ArgAction, Args, Parser, Subcommand};
use logger::ConsoleLogger;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(
    name = "booklet",
    about = "Reorder a PDF into booklet order, two pages per A4 landscape side",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors and the final result
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Job settings that override the defaults or a loaded configuration
#[derive(Args, Debug, Default)]
struct JobOverrides {
    /// Input PDF file (may come from --config instead)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output PDF file [default: <input>_booklet_landscape.pdf]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gap between the two pages of a side, in mm [default: 10]
    #[arg(long)]
    center_margin: Option<f32>,

    /// Margin along the sheet edges, in mm [default: 5]
    #[arg(long)]
    outer_margin: Option<f32>,

    /// Fail instead of appending blank pages when the page count is not a multiple of 4
    #[arg(long)]
    no_pad: bool,
}

impl JobOverrides {
    /// Overwrite every setting given on the command line
    fn apply(self, options: &mut BookletOptions) {
        if let Some(input) = self.input {
            options.input_file = input;
        }
        if self.output.is_some() {
            options.output_file = self.output;
        }
        if let Some(center) = self.center_margin {
            options.margins.center_mm = center;
        }
        if let Some(outer) = self.outer_margin {
            options.margins.outer_mm = outer;
        }
        if self.no_pad {
            options.pad_to_multiple_of_4 = false;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a printable booklet PDF
    Create {
        #[command(flatten)]
        overrides: JobOverrides,

        /// Load options from a JSON file; flags given here override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective options to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Print the side-by-side page order for a page count
    Plan {
        /// Number of pages in the source document
        #[arg(short, long)]
        pages: usize,

        /// Fail instead of padding with blank pages
        #[arg(long)]
        no_pad: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    ConsoleLogger::new(ConsoleLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Create {
            overrides,
            config,
            save_config,
            stats_only,
        } => {
            let mut session = Session::start(cli.quiet);

            let mut options = match config {
                Some(path) => session.load_config(path).await?,
                None => BookletOptions::default(),
            };
            overrides.apply(&mut options);
            options.validate()?;

            if let Some(path) = &save_config {
                options
                    .save(path)
                    .await
                    .with_context(|| format!("Failed to save configuration {}", path.display()))?;
                log::info!("Saved configuration to {}", path.display());
            }

            session.run_job(options, stats_only).await?;
            session.finish().await?;
        }

        Commands::Plan { pages, no_pad } => {
            for line in plan_lines(pages, !no_pad)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// A running worker plus the channels to talk to it
struct Session {
    command_tx: mpsc::UnboundedSender<BookletCommand>,
    update_rx: mpsc::UnboundedReceiver<BookletUpdate>,
    worker: JoinHandle<()>,
    quiet: bool,
}

impl Session {
    fn start(quiet: bool) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(worker_task(command_rx, update_tx));
        Self {
            command_tx,
            update_rx,
            worker,
            quiet,
        }
    }

    /// Send one command and print its updates until its final one, which is
    /// returned. An `Error` update becomes `Err`.
    async fn request(&mut self, command: BookletCommand) -> Result<BookletUpdate> {
        self.command_tx.send(command)?;

        while let Some(update) = self.update_rx.recv().await {
            match update {
                BookletUpdate::Error { message } => bail!(message),
                update if update.is_terminal() => return Ok(update),
                BookletUpdate::Status { message } if !self.quiet => eprintln!("{message}"),
                BookletUpdate::Progress {
                    operation,
                    current,
                    total,
                } if !self.quiet => {
                    eprintln!("[{:>3}%] {operation}", current * 100 / total.max(1));
                }
                other => log::trace!("Ignoring update {:?}", other),
            }
        }
        bail!("Worker stopped before answering")
    }

    async fn load_config(&mut self, path: PathBuf) -> Result<BookletOptions> {
        match self.request(BookletCommand::LoadConfig { path }).await? {
            BookletUpdate::ConfigLoaded { options } => Ok(options),
            other => bail!("Unexpected reply to config request: {:?}", other),
        }
    }

    /// Generate the booklet, or only report statistics
    async fn run_job(&mut self, options: BookletOptions, stats_only: bool) -> Result<()> {
        // Generate reports statistics on completion
        let command = if stats_only {
            BookletCommand::CalculateStats { options }
        } else {
            BookletCommand::Generate { options }
        };

        match self.request(command).await? {
            BookletUpdate::StatsCalculated { stats } => print_statistics(&stats),
            BookletUpdate::Complete { path, stats } => {
                print_statistics(&stats);
                println!(
                    "Booklet with {} sheet(s) written to {}",
                    stats.output_sheets,
                    path.display()
                );
                println!("Print double-sided, flipping on the long edge, then fold in half.");
            }
            other => bail!("Unexpected reply to job: {:?}", other),
        }
        Ok(())
    }

    /// Close the command channel and wait for the worker to exit
    async fn finish(self) -> Result<()> {
        drop(self.command_tx);
        self.worker.await.context("Worker task failed")
    }
}

fn print_statistics(stats: &BookletStatistics) {
    println!("Booklet Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);
    println!("  Effective pages: {}", stats.effective_pages);
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Output pages: {}", stats.output_faces);
}

/// One line per face: sheet number, side and the pages on its two halves
fn plan_lines(pages: usize, pad: bool) -> Result<Vec<String>> {
    let sheets = compose(pages, &Margins::default(), pad)?;
    if sheets.is_empty() {
        return Ok(vec!["No pages, nothing to print".to_string()]);
    }

    let label = |page: Option<usize>| match page {
        Some(index) => (index + 1).to_string(),
        None => "blank".to_string(),
    };

    let mut lines = Vec::new();
    for sheet in &sheets {
        for face in sheet.faces() {
            let side = match face.side {
                FaceSide::Front => "front",
                FaceSide::Back => "back",
            };
            let [left, right] = face.pages();
            lines.push(format!(
                "Sheet {:>3} {:<5}  {:>5} | {}",
                sheet.sheet_index + 1,
                side,
                label(left),
                label(right)
            ));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklet_core::BookletError;

    fn create_args(args: &[&str]) -> (JobOverrides, Option<PathBuf>, bool) {
        let cli = Cli::try_parse_from(["booklet", "create"].iter().chain(args).copied()).unwrap();
        match cli.command {
            Commands::Create {
                overrides,
                config,
                stats_only,
                ..
            } => (overrides, config, stats_only),
            Commands::Plan { .. } => panic!("Expected create"),
        }
    }

    #[test]
    fn test_flags_override_loaded_options() {
        let mut options = BookletOptions {
            input_file: "from_config.pdf".into(),
            output_file: Some("config_out.pdf".into()),
            margins: Margins::new(20.0, 8.0),
            pad_to_multiple_of_4: true,
        };

        let (overrides, _, _) = create_args(&["-i", "zine.pdf", "--outer-margin", "3", "--no-pad"]);
        overrides.apply(&mut options);

        assert_eq!(options.input_file, PathBuf::from("zine.pdf"));
        assert_eq!(options.output_file, Some(PathBuf::from("config_out.pdf")));
        assert_eq!(options.margins.center_mm, 20.0);
        assert_eq!(options.margins.outer_mm, 3.0);
        assert!(!options.pad_to_multiple_of_4);
    }

    #[test]
    fn test_no_flags_keep_loaded_options() {
        let loaded = BookletOptions {
            input_file: "from_config.pdf".into(),
            margins: Margins::new(12.0, 4.0),
            ..Default::default()
        };
        let mut options = loaded.clone();

        let (overrides, config, stats_only) = create_args(&["--config", "job.json"]);
        overrides.apply(&mut options);

        assert_eq!(options, loaded);
        assert_eq!(config, Some(PathBuf::from("job.json")));
        assert!(!stats_only);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["booklet", "plan", "--pages", "8", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        assert!(Cli::try_parse_from(["booklet", "plan"]).is_err());
        assert!(Cli::try_parse_from(["booklet", "create", "--center-margin", "wide"]).is_err());
    }

    #[test]
    fn test_plan_lines_for_six_pages() {
        let lines = plan_lines(6, true).unwrap();
        assert_eq!(
            lines,
            vec![
                "Sheet   1 front  blank | 1",
                "Sheet   1 back       2 | blank",
                "Sheet   2 front      6 | 3",
                "Sheet   2 back       4 | 5",
            ]
        );
    }

    #[test]
    fn test_plan_lines_edge_cases() {
        assert_eq!(plan_lines(0, true).unwrap(), vec!["No pages, nothing to print"]);

        let err = plan_lines(6, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BookletError>(),
            Some(BookletError::InvalidPageCount { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_loads_config_then_reports_stats() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("job.json");
        let saved = BookletOptions {
            input_file: dir.path().join("missing.pdf"),
            margins: Margins::new(12.0, 4.0),
            ..Default::default()
        };
        saved.save(&config).await.unwrap();

        let mut session = Session::start(true);
        assert_eq!(session.load_config(config).await.unwrap(), saved);

        // The input does not exist, so the job fails with the worker's message
        let err = session.run_job(saved, true).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to load PDF for stats"));

        let err = session
            .load_config(dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to load configuration"));

        session.finish().await.unwrap();
    }
}
