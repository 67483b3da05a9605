//! Woxel command-line front end (headless).
//!
//! Usage:
//!   woxel [project] [sensitivity] [palette_file]
//!   woxel loadgz <path>
//!   woxel export <project> <wox|txt|vv|ply> <path>
//!   woxel render <project> <out.png> [width] [height]
//!
//! Options:
//!   --config <PATH>   Config file (default: woxel.json)
//!
//! Projects live in `<data_dir>/<project>.wox.gz`. Opening a project that
//! does not exist creates a new seeded canvas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use woxel::core::config::{EditorConfig, CONFIG_FILENAME};
use woxel::core::Result;
use woxel::export::{export_to_path, ExportFormat};
use woxel::render::{PngSurface, PresentationSurface};
use woxel::session::Session;
use woxel::voxel::palette::Palette;

const DEFAULT_PROJECT: &str = "Untitled";

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Open {
        project: String,
        sensitivity: Option<f32>,
        palette: Option<PathBuf>,
    },
    LoadGz {
        path: PathBuf,
    },
    Export {
        project: String,
        format: ExportFormat,
        path: PathBuf,
    },
    Render {
        project: String,
        output: PathBuf,
        width: Option<u32>,
        height: Option<u32>,
    },
}

fn main() -> ExitCode {
    woxel::core::logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = take_str_arg(&mut args, "--config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = EditorConfig::load_or_default(&config_path);

    match run(parse_command(&args), config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: EditorConfig) -> Result<()> {
    match command {
        Command::Open { project, sensitivity, palette } => {
            let mut session = Session::open(config, &project);
            log_opened(&session);
            if let Some(sensitivity) = sensitivity {
                session.set_sensitivity(sensitivity);
            }
            if let Some(path) = palette {
                match Palette::load_file(&path) {
                    Ok(palette) => session.apply_palette(palette),
                    Err(e) => log::error!("Failed to load palette {}: {}", path.display(), e),
                }
            }
            session.close()
        }
        Command::LoadGz { path } => {
            let session = Session::open_path(config, &path);
            log_opened(&session);
            session.close()
        }
        Command::Export { project, format, path } => {
            let session = Session::open(config, &project);
            export_to_path(session.canvas(), format, &path)
        }
        Command::Render { project, output, width, height } => {
            let width = width.unwrap_or(config.render_width);
            let height = height.unwrap_or(config.render_height);
            let session = Session::open(config, &project);
            let frame = session.render(width, height);
            PngSurface::new(output).present(&frame)
        }
    }
}

fn log_opened(session: &Session) {
    let path = session.location().path();
    log::info!(
        "Opened: {} ({} voxels)",
        path.display(),
        session.canvas().volume.count_occupied()
    );
}

fn parse_command(args: &[String]) -> Command {
    let arg = |i: usize| args.get(i).map(String::as_str);

    match arg(0) {
        Some("loadgz") if args.len() >= 2 => Command::LoadGz {
            path: PathBuf::from(&args[1]),
        },
        Some("export") if args.len() >= 4 => Command::Export {
            project: args[1].clone(),
            format: ExportFormat::parse(&args[2]),
            path: PathBuf::from(&args[3]),
        },
        Some("render") if args.len() >= 3 => Command::Render {
            project: args[1].clone(),
            output: PathBuf::from(&args[2]),
            width: arg(3).and_then(|s| s.parse().ok()),
            height: arg(4).and_then(|s| s.parse().ok()),
        },
        project => Command::Open {
            project: project.unwrap_or(DEFAULT_PROJECT).to_string(),
            sensitivity: arg(1).map(|s| s.parse().unwrap_or(0.0)),
            palette: arg(2).map(|s| Path::new(s).to_path_buf()),
        },
    }
}

/// Remove `flag <value>` from the argument list, returning the value
fn take_str_arg(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let i = args.iter().position(|a| a == flag)?;
    let value = args.get(i + 1).cloned();
    let end = if value.is_some() { i + 2 } else { i + 1 };
    args.drain(i..end);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_open() {
        assert_eq!(
            parse_command(&[]),
            Command::Open { project: "Untitled".into(), sensitivity: None, palette: None }
        );
        assert_eq!(
            parse_command(&args(&["castle", "0.005", "colors.txt"])),
            Command::Open {
                project: "castle".into(),
                sensitivity: Some(0.005),
                palette: Some(PathBuf::from("colors.txt")),
            }
        );
        // Unparseable sensitivity falls back to the default later
        assert_eq!(
            parse_command(&args(&["castle", "fast"])),
            Command::Open { project: "castle".into(), sensitivity: Some(0.0), palette: None }
        );
    }

    #[test]
    fn test_parse_subcommands() {
        assert_eq!(
            parse_command(&args(&["loadgz", "/tmp/a.wox.gz"])),
            Command::LoadGz { path: PathBuf::from("/tmp/a.wox.gz") }
        );
        assert_eq!(
            parse_command(&args(&["export", "castle", "ply", "out.ply"])),
            Command::Export {
                project: "castle".into(),
                format: ExportFormat::Ply,
                path: PathBuf::from("out.ply"),
            }
        );
        assert_eq!(
            parse_command(&args(&["render", "castle", "shot.png", "320"])),
            Command::Render {
                project: "castle".into(),
                output: PathBuf::from("shot.png"),
                width: Some(320),
                height: None,
            }
        );
        // Incomplete export is treated as a project name
        assert!(matches!(
            parse_command(&args(&["export", "castle"])),
            Command::Open { .. }
        ));
    }

    #[test]
    fn test_take_config_flag() {
        let mut list = args(&["--config", "alt.json", "castle"]);
        assert_eq!(take_str_arg(&mut list, "--config"), Some("alt.json".into()));
        assert_eq!(list, args(&["castle"]));
        assert_eq!(take_str_arg(&mut list, "--config"), None);
    }

    #[test]
    fn test_export_command_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig { data_dir: dir.path().to_path_buf(), ..EditorConfig::default() };
        let out = dir.path().join("points.txt");
        run(
            Command::Export { project: "demo".into(), format: ExportFormat::Txt, path: out.clone() },
            config,
        )
        .unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.starts_with("# Woxel v1.0\n"));
    }
}
