use std::io::Write;
use std::path::PathBuf;

use glam::Vec3;
use replay_viewer::core::{FrameClock, PlaybackClock};
use replay_viewer::error::ReplayError;
use replay_viewer::playback::AnimationClip;
use replay_viewer::replay::ReplayData;

const REPLAY: &str = r#"{
    "names": ["A", "B"],
    "colors": [false, true],
    "players": [
        [[0, -1000, 17, 0, 0, 0, false], [0, -900, 17, 0, 0, 0, true], [0, -800, 17, 0, 0, 0, null]],
        [[0, 1000, 17, 0, 0, 0, 0], [0, 900, 17, 0, 0, 0, 1], [0, 800, 17, 0, 0, 0, 0]]
    ],
    "ball": [[0, 0, 93, 0, 0, 0], [50, 0, 93, 0, 0, 0], [100, 0, 93, 0, 0, 0]],
    "frames": [[0.1, 300, 5.0], [0.1, 299.9, 5.1], [0.1, 299.8, 5.2]]
}"#;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("replay-viewer-{}-{}", std::process::id(), name));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[cfg(test)]
mod replay_tests {
    use super::*;

    #[test]
    fn load_reads_file_from_disk() {
        let path = write_temp("ok.json", REPLAY);
        let replay = ReplayData::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(replay.player_count(), 2);
        assert_eq!(replay.frame_count(), 3);
        assert!(replay.player_frame(0, 1).boost_active);
        assert!(!replay.player_frame(0, 2).boost_active);
        assert!(replay.player_frame(1, 1).boost_active);
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = ReplayData::load("/definitely/missing/replay.json").unwrap_err();
        assert!(format!("{:#}", err).contains("missing/replay.json"));
    }

    #[test]
    fn load_rejects_mismatched_roster() {
        let path = write_temp(
            "bad.json",
            r#"{"names":["A"],"colors":[false,true],"players":[[]]}"#,
        );
        let err = ReplayData::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            err.downcast_ref::<ReplayError>(),
            Some(ReplayError::LengthMismatch { names: 1, colors: 2, players: 1 })
        ));
    }

    #[test]
    fn malformed_tuple_is_a_parse_error() {
        let json = r#"{"names":["A"],"colors":[false],"players":[[[0,0,0]]]}"#;
        assert!(matches!(ReplayData::from_json(json), Err(ReplayError::Parse(_))));
    }

    #[test]
    fn trailing_tuple_fields_are_ignored() {
        let json = r#"{
            "names": ["A"],
            "colors": [true],
            "players": [[[0, 0, 0, 0, 0, 0, true, 50], [1, 2, 3, 0, 0, 0, 0, "extra", [1]]]],
            "ball": [[10, 20, 30, 0, 0, 0, 7, null]]
        }"#;
        let replay = ReplayData::from_json(json).unwrap();

        assert_eq!(replay.frame_count(), 2);
        assert!(replay.player_frame(0, 0).boost_active);
        assert!(!replay.player_frame(0, 1).boost_active);
        assert_eq!(replay.player_frame(0, 1).position, Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(replay.ball[0].position, Vec3::new(10.0, 30.0, 20.0));
    }

    #[test]
    fn clock_and_clips_share_the_timeline() {
        let replay = ReplayData::from_json(REPLAY).unwrap();
        let times = replay.frame_times(30.0);
        let clip = AnimationClip::from_player_track(&replay, 1, &times);
        let ball = AnimationClip::from_ball_track(&replay, &times);

        assert_eq!(clip.name, "B");
        assert!((clip.duration() - 0.2).abs() < 1e-4);
        assert_eq!(ball.sample(0.0).unwrap().0, Vec3::new(0.0, 93.0, 0.0));

        let mut clock = FrameClock::from_replay(&replay, 30.0);
        assert_eq!(clock.frame_count(), 3);
        clock.advance(0.15).unwrap();
        assert_eq!(clock.frame(), 1);
        assert!(!clock.is_paused());
    }
}
