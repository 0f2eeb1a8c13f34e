//! Calibrate command - the interactive geometry loop.

use std::path::PathBuf;
use std::time::Duration;

use crtgeom::calibration::{CalibrationLoop, LoopConfig, SessionOutcome};
use crtgeom::config::ConfigFile;
use crtgeom::feedback::TextFeedback;
use crtgeom::invoker::{ProcessRunner, SwitchresInvoker};
use crtgeom::model::{CrtRange, Geometry, Mode};
use crtgeom::update_config;
use tracing::info;

use crate::error::CliError;
use crate::runner::{CliRunner, LogOptions};

/// Arguments for the calibrate command.
#[derive(Debug, Clone, Default)]
pub struct CalibrateArgs {
    pub width: f64,
    pub height: f64,
    pub refresh: f64,
    pub launch: Option<String>,
    pub ini: Option<PathBuf>,
    pub switchres: Option<String>,
    pub display: Option<u32>,
    pub geometry: Option<Geometry>,
    pub delay_ms: Option<u64>,
    pub log: LogOptions,
}

/// Settings for one session after merging CLI and config.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrateSettings {
    pub mode: Mode,
    pub switchres: String,
    pub ini: PathBuf,
    pub display: u32,
    pub launch: String,
    pub geometry: Geometry,
    pub delay: Duration,
    pub feedback_variable: String,
}

/// Resolve settings: CLI > config > defaults.
pub fn resolve(args: &CalibrateArgs, config: &ConfigFile) -> Result<CalibrateSettings, CliError> {
    let mode = Mode::from_floats(args.width, args.height, args.refresh)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let launch = args
        .launch
        .clone()
        .unwrap_or_else(|| config.calibration.launch.clone());
    if launch.trim().is_empty() {
        return Err(CliError::Config(
            "launch command must not be empty".to_string(),
        ));
    }

    let switchres = args
        .switchres
        .clone()
        .unwrap_or_else(|| config.switchres.binary.clone());
    if switchres.trim().is_empty() {
        return Err(CliError::Config(
            "switchres binary must not be empty".to_string(),
        ));
    }

    Ok(CalibrateSettings {
        mode,
        switchres,
        ini: args
            .ini
            .clone()
            .unwrap_or_else(|| config.switchres.ini.clone()),
        display: args.display.unwrap_or(config.switchres.display),
        launch,
        geometry: args.geometry.unwrap_or(config.calibration.geometry),
        delay: args
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.calibration.delay()),
        feedback_variable: config.calibration.feedback_variable.clone(),
    })
}

/// Run the calibrate command.
///
/// A committed range is written to switchres.ini before returning.
pub fn run(args: CalibrateArgs) -> Result<SessionOutcome, CliError> {
    let runner = CliRunner::new(&args.log)?;
    runner.log_startup("calibrate");
    let settings = resolve(&args, runner.config())?;

    println!("crtgeom v{}", crtgeom::VERSION);
    println!("=============");
    println!();
    println!("Mode:      {}", settings.mode);
    println!("Geometry:  {}", settings.geometry);
    println!("Launch:    {}", settings.launch);
    println!("switchres: {}", settings.switchres);
    if settings.display > 0 {
        println!("Display:   {}", settings.display);
    }
    println!();
    println!("Use the arrow keys and PAGE UP/DOWN in the pattern to adjust,");
    println!("ENTER to save, ESC to quit without saving.");
    println!();

    let invoker = SwitchresInvoker::new(ProcessRunner::new(), settings.switchres.as_str())
        .with_display(settings.display)
        .with_feedback_variable(settings.feedback_variable.as_str());
    let config = LoopConfig::default()
        .with_launch(settings.launch.as_str())
        .with_delay(settings.delay);

    let mut calibration = CalibrationLoop::new(invoker, TextFeedback::new(), settings.mode, config);
    let outcome = calibration.run(settings.geometry)?;

    match &outcome {
        SessionOutcome::Committed { geometry, range } => {
            print!("{}", committed_report(geometry, range));
            update_config(range, &settings.ini)?;
            info!(geometry = %geometry, ini = %settings.ini.display(), "Calibration committed");
            println!("Saved to {}", settings.ini.display());
        }
        SessionOutcome::Aborted { geometry } => {
            info!(geometry = %geometry, "Calibration aborted");
            println!("Aborted at geometry {}", geometry);
            println!("{} left unchanged", settings.ini.display());
        }
    }

    Ok(outcome)
}

/// Calibration result, printed before switchres.ini is written.
fn committed_report(geometry: &Geometry, range: &CrtRange) -> String {
    format!("Final geometry: {}\ncrt_range0 {}\n", geometry, range)
}
