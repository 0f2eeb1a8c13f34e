//! crtgeom CLI - interactive CRT geometry calibration.
//!
//! ```text
//! crtgeom 320 240 59.94                 calibrate, saving to switchres.ini
//! crtgeom 320 240 59.94 -g 1.1:-2:0     start from a given geometry
//! crtgeom probe 320 240 59.94           show the monitor range only
//! crtgeom config list                   show settings
//! ```
//!
//! Exit status is 0 when the operator saved a calibration, 1 when they quit
//! without saving and 2 on errors.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use crtgeom::calibration::SessionOutcome;
use crtgeom::model::Geometry;

use commands::calibrate::CalibrateArgs;
use commands::config::ConfigCommands;
use commands::probe::ProbeArgs;
use runner::LogOptions;

const EXIT_SAVED: u8 = 0;
const EXIT_ABORTED: u8 = 1;
const EXIT_FAILED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "crtgeom")]
#[command(version, about = "Calibrate analog CRT geometry interactively through switchres")]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    calibrate: CalibrateCli,

    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Query switchres once and print the monitor range, without switching mode
    Probe(ProbeCli),

    /// View or edit ~/.crtgeom/config.ini
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Video mode positionals.
#[derive(Debug, Args)]
struct ModeCli {
    /// Horizontal resolution
    #[arg(value_name = "WIDTH", required = true)]
    width: Option<f64>,

    /// Vertical resolution
    #[arg(value_name = "HEIGHT", required = true)]
    height: Option<f64>,

    /// Refresh rate in Hz
    #[arg(value_name = "REFRESH", required = true)]
    refresh: Option<f64>,
}

impl ModeCli {
    /// clap guarantees all three are present; 0 is rejected by mode validation.
    fn values(&self) -> (f64, f64, f64) {
        (
            self.width.unwrap_or_default(),
            self.height.unwrap_or_default(),
            self.refresh.unwrap_or_default(),
        )
    }
}

/// Options shared by every command that runs switchres.
#[derive(Debug, Args)]
struct SwitchresCli {
    /// switchres binary [default: switchres]
    #[arg(short = 's', long = "switchres", value_name = "BINARY")]
    switchres: Option<String>,

    /// Display index passed to switchres [default: 0]
    #[arg(short, long, value_name = "INDEX")]
    display: Option<u32>,

    /// Starting geometry as h_size:h_shift:v_shift [default: 1.0:0:0]
    #[arg(short, long, value_name = "GEOMETRY")]
    geometry: Option<Geometry>,
}

#[derive(Debug, Args)]
struct CalibrateCli {
    #[command(flatten)]
    mode: ModeCli,

    #[command(flatten)]
    switchres: SwitchresCli,

    /// Calibration pattern program launched by switchres [default: grid]
    #[arg(short, long, value_name = "COMMAND")]
    launch: Option<String>,

    /// switchres.ini to update when the calibration is saved [default: switchres.ini]
    #[arg(short, long, value_name = "PATH")]
    ini: Option<PathBuf>,

    /// Pause between switchres runs in milliseconds [default: 2000]
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,
}

impl CalibrateCli {
    fn into_args(self, log: LogOptions) -> CalibrateArgs {
        let (width, height, refresh) = self.mode.values();
        CalibrateArgs {
            width,
            height,
            refresh,
            launch: self.launch,
            ini: self.ini,
            switchres: self.switchres.switchres,
            display: self.switchres.display,
            geometry: self.switchres.geometry,
            delay_ms: self.delay_ms,
            log,
        }
    }
}

#[derive(Debug, Args)]
struct ProbeCli {
    #[command(flatten)]
    mode: ModeCli,

    #[command(flatten)]
    switchres: SwitchresCli,
}

impl ProbeCli {
    fn into_args(self, log: LogOptions) -> ProbeArgs {
        let (width, height, refresh) = self.mode.values();
        ProbeArgs {
            width,
            height,
            refresh,
            switchres: self.switchres.switchres,
            display: self.switchres.display,
            geometry: self.switchres.geometry,
            log,
        }
    }
}

fn session_status(outcome: &SessionOutcome) -> u8 {
    match outcome {
        SessionOutcome::Committed { .. } => EXIT_SAVED,
        SessionOutcome::Aborted { .. } => EXIT_ABORTED,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = LogOptions {
        verbose: cli.verbose,
        log_file: cli.log_file,
    };

    let result = match cli.command {
        Some(Commands::Probe(args)) => {
            commands::probe::run(args.into_args(log)).map(|()| ExitCode::SUCCESS)
        }
        Some(Commands::Config { command }) => {
            commands::config::run(command).map(|()| ExitCode::SUCCESS)
        }
        None => commands::calibrate::run(cli.calibrate.into_args(log))
            .map(|outcome| ExitCode::from(session_status(&outcome))),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}
