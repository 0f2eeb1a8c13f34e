//! switchres command line construction.

use crate::model::{Geometry, Mode};

/// Build the switchres argument vector, program first.
///
/// ```text
/// <tool> <w> <h> <rr> -v [-d <display>] -s -l "<launch> [<display>]" -g <geom> -g <geom>
/// <tool> <w> <h> <rr> -v [-d <display>] -c -g <geom>
/// ```
///
/// With a launch command switchres switches mode and runs it (`-s -l`);
/// without one it only computes the mode (`-c`). A non-zero display index is
/// also passed to the launched program as its last argument.
pub fn build_args(
    tool: &str,
    mode: &Mode,
    geometry: &Geometry,
    launch: Option<&str>,
    display: u32,
) -> Vec<String> {
    let geometry = geometry.to_string();

    let mut args = vec![tool.to_string()];
    args.extend(mode.args());
    args.push("-v".to_string());

    if display > 0 {
        args.push("-d".to_string());
        args.push(display.to_string());
    }

    match launch {
        Some(launch) => {
            let launch = if display > 0 {
                format!("{} {}", launch, display)
            } else {
                launch.to_string()
            };
            args.extend([
                "-s".to_string(),
                "-l".to_string(),
                launch,
                "-g".to_string(),
                geometry.clone(),
            ]);
        }
        None => args.push("-c".to_string()),
    }

    args.push("-g".to_string());
    args.push(geometry);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode() -> Mode {
        Mode::new(320, 240, 59.94)
    }

    #[test]
    fn test_query_only() {
        let args = build_args("switchres", &mode(), &Geometry::default(), None, 0);
        assert_eq!(
            args,
            ["switchres", "320", "240", "59.94", "-v", "-c", "-g", "1.0:0:0"]
        );
    }

    #[test]
    fn test_launch() {
        let geometry = Geometry::new(1.05, -3, 2);
        let args = build_args("switchres", &mode(), &geometry, Some("grid"), 0);
        assert_eq!(
            args,
            [
                "switchres", "320", "240", "59.94", "-v", "-s", "-l", "grid", "-g", "1.05:-3:2",
                "-g", "1.05:-3:2"
            ]
        );
    }

    #[test]
    fn test_launch_on_second_display() {
        let args = build_args(
            "/usr/local/bin/switchres",
            &mode(),
            &Geometry::default(),
            Some("grid"),
            1,
        );
        assert_eq!(
            args,
            [
                "/usr/local/bin/switchres",
                "320",
                "240",
                "59.94",
                "-v",
                "-d",
                "1",
                "-s",
                "-l",
                "grid 1",
                "-g",
                "1.0:0:0",
                "-g",
                "1.0:0:0"
            ]
        );
    }

    #[test]
    fn test_query_on_second_display() {
        let args = build_args("switchres", &mode(), &Geometry::default(), None, 2);
        assert_eq!(
            args,
            ["switchres", "320", "240", "59.94", "-v", "-d", "2", "-c", "-g", "1.0:0:0"]
        );
    }
}
