use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::eyre;
use csk_protocol::{BuildTarget, Distribution, WizardStep};
use std::path::PathBuf;
use tracing::Level;

mod headless;

#[derive(Parser, Debug)]
#[command(name = "ci-setup", version, about = "Set up CI/CD for a Unity mobile game")]
struct Cli {
    /// Unity project directory.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive setup wizard (default).
    Tui,
    /// Show artifacts and step statuses.
    Status,
    /// Write the CI templates into the project.
    Generate,
    /// Commit and push the generated files.
    Publish,
    /// Create the Firebase project through the remote workflow.
    Provision,
    /// Pull the backend configs committed by provisioning.
    Sync,
    /// List recent build runs.
    Runs {
        #[arg(long)]
        json: bool,
    },
    /// Check that the external tools are installed.
    Doctor {
        #[arg(long)]
        json: bool,
    },
    /// Dispatch the build workflow.
    Build {
        #[arg(long, value_enum, default_value_t = TargetArg::Ios)]
        target: TargetArg,
        #[arg(long, value_enum, default_value_t = DistributionArg::None)]
        distribution: DistributionArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TargetArg {
    Android,
    Ios,
    Both,
}

impl From<TargetArg> for BuildTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Android => BuildTarget::Android,
            TargetArg::Ios => BuildTarget::Ios,
            TargetArg::Both => BuildTarget::Both,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DistributionArg {
    None,
    Testflight,
    Firebase,
}

impl From<DistributionArg> for Distribution {
    fn from(arg: DistributionArg) -> Self {
        match arg {
            DistributionArg::None => Distribution::NoUpload,
            DistributionArg::Testflight => Distribution::TestFlight,
            DistributionArg::Firebase => Distribution::Firebase,
        }
    }
}

fn init_stderr_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Tui);
    if let Command::Tui = command {
        // When `ci-setup` is called without any arguments, launch the TUI
        csk_tui::init_file_logging(&cli.project, cli.verbose).map_err(|e| eyre!(e))?;
        return csk_tui::run_app(&cli.project)
            .await
            .map_err(|e| eyre!(e));
    }

    init_stderr_logging(cli.verbose);
    let mut session = headless::Session::open(&cli.project)?;
    match command {
        Command::Tui => Ok(()),
        Command::Status => {
            session.print_status();
            Ok(())
        }
        Command::Generate => session.run_step(WizardStep::Generate).await,
        Command::Publish => session.run_step(WizardStep::Publish).await,
        Command::Provision => session.run_step(WizardStep::Provision).await,
        Command::Sync => session.run_step(WizardStep::Synchronize).await,
        Command::Runs { json } => session.runs(json).await,
        Command::Doctor { json } => session.doctor(json).await,
        Command::Build {
            target,
            distribution,
        } => session.build(target.into(), distribution.into()).await,
    }
}
