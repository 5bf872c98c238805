// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::core::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Parser, Debug, Clone)]
#[command(name = "replay-viewer")]
#[command(about = "3D replay viewer with synchronized playback and camera", long_about = None)]
pub struct Cli {
    /// Replay data file (JSON)
    pub replay: PathBuf,

    /// Field model (glTF); built-in geometry when omitted
    #[arg(long)]
    pub field: Option<PathBuf>,

    /// Ball model (glTF)
    #[arg(long)]
    pub ball: Option<PathBuf>,

    /// Car model (glTF), cloned once per player
    #[arg(long)]
    pub car: Option<PathBuf>,

    /// Player to follow from the start
    #[arg(long)]
    pub track: Option<String>,

    /// Fixed view: 0 orange goal, 1 blue goal, 2 mid field
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub view: u8,

    /// Frame rate assumed when the replay has no timeline
    #[arg(long, default_value_t = 30.0)]
    pub fps: f32,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Play the whole replay through the software renderer without a window
    #[arg(long)]
    pub headless: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["replay-viewer", "game.json"]).unwrap();
        assert_eq!(cli.replay, PathBuf::from("game.json"));
        assert_eq!(cli.view, 0);
        assert_eq!(cli.fps, 30.0);
        assert_eq!((cli.width, cli.height), (640, 480));
        assert!(!cli.headless);
        assert!(cli.track.is_none());
    }

    #[test]
    fn view_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["replay-viewer", "game.json", "--view", "3"]).is_err());
    }

    #[test]
    fn asset_paths_and_tracking() {
        let cli = Cli::try_parse_from([
            "replay-viewer",
            "game.json",
            "--car",
            "octane.glb",
            "--track",
            "A",
            "--headless",
        ])
        .unwrap();
        assert_eq!(cli.car, Some(PathBuf::from("octane.glb")));
        assert_eq!(cli.track.as_deref(), Some("A"));
        assert!(cli.headless);
    }
}
