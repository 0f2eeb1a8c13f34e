//! Probe command - ask switchres for the monitor range without switching mode.

use crtgeom::config::ConfigFile;
use crtgeom::feedback::TextFeedback;
use crtgeom::invoker::{ProbeResult, ProcessRunner, SwitchresInvoker};
use crtgeom::model::{Geometry, Mode};

use crate::error::CliError;
use crate::runner::{CliRunner, LogOptions};

/// Arguments for the probe command.
#[derive(Debug, Clone, Default)]
pub struct ProbeArgs {
    pub width: f64,
    pub height: f64,
    pub refresh: f64,
    pub switchres: Option<String>,
    pub display: Option<u32>,
    pub geometry: Option<Geometry>,
    pub log: LogOptions,
}

impl ProbeArgs {
    fn resolve(&self, config: &ConfigFile) -> Result<(Mode, String, u32, Geometry), CliError> {
        let mode = Mode::from_floats(self.width, self.height, self.refresh)
            .map_err(|e| CliError::Config(e.to_string()))?;
        let switchres = self
            .switchres
            .clone()
            .unwrap_or_else(|| config.switchres.binary.clone());
        if switchres.trim().is_empty() {
            return Err(CliError::Config(
                "switchres binary must not be empty".to_string(),
            ));
        }

        Ok((
            mode,
            switchres,
            self.display.unwrap_or(config.switchres.display),
            self.geometry.unwrap_or(config.calibration.geometry),
        ))
    }
}

/// Run the probe command.
pub fn run(args: ProbeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(&args.log)?;
    runner.log_startup("probe");
    let (mode, switchres, display, geometry) = args.resolve(runner.config())?;

    let mut invoker = SwitchresInvoker::new(ProcessRunner::new(), switchres).with_display(display);
    let result = invoker
        .probe(&mode, &geometry, &mut TextFeedback::new())
        .map_err(CliError::Probe)?;

    print!("{}", report(&mode, &geometry, &result));
    Ok(())
}

fn report(mode: &Mode, requested: &Geometry, result: &ProbeResult) -> String {
    let mut out = format!("Mode:      {}\n", mode);
    out.push_str(&format!("Requested: {}\n", requested));
    out.push_str(&format!("Applied:   {}\n", result.geometry));
    out.push_str(&format!("Range:     {}\n", result.range));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_config() {
        let mut config = ConfigFile::default();
        config.switchres.binary = "sr".to_string();
        config.switchres.display = 2;

        let args = ProbeArgs {
            width: 640.0,
            height: 480.0,
            refresh: 60.0,
            geometry: Some(Geometry::new(0.9, 0, 1)),
            ..Default::default()
        };

        let (mode, switchres, display, geometry) = args.resolve(&config).unwrap();
        assert_eq!(mode, Mode::new(640, 480, 60.0));
        assert_eq!(switchres, "sr");
        assert_eq!(display, 2);
        assert_eq!(geometry, Geometry::new(0.9, 0, 1));
    }

    #[test]
    fn test_report() {
        let result = ProbeResult {
            range: "15625-16200,49.5-65,2.0,4.7,8.0,0.064,0.192,1.024,0,0,192,288,448,576"
                .parse()
                .unwrap(),
            geometry: "1.000:0:0".to_string(),
        };

        let text = report(&Mode::new(320, 240, 59.94), &Geometry::default(), &result);
        assert_eq!(
            text,
            "Mode:      320x240@59.94\n\
             Requested: 1.0:0:0\n\
             Applied:   1.000:0:0\n\
             Range:     15625.0-16200.0,49.5-65.0,2.0,4.7,8.0,0.064,0.192,1.024,0,0,192,288,448,576\n"
        );
    }
}
