//! Decoded replay dataset consumed by the viewer.
//!
//! Replay tuples use a z-up coordinate system; every position is converted
//! to the y-up scene convention on deserialization.

use std::fmt;
use std::io::Read;
use std::path::Path;

use glam::{EulerRot, Quat, Vec3};
use serde::de::{self, Deserializer, Expected, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::ReplayError;

/// Per-player, per-frame state
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "WirePlayerFrame")]
pub struct PlayerFrame {
    pub position: Vec3,
    /// Euler angles in radians: pitch, yaw, roll
    pub rotation: Vec3,
    pub boost_active: bool,
}

impl PlayerFrame {
    pub fn new(position: Vec3, rotation: Vec3, boost_active: bool) -> Self {
        Self {
            position,
            rotation,
            boost_active,
        }
    }

    pub fn orientation(&self) -> Quat {
        euler_to_quat(self.rotation)
    }
}

/// Per-frame ball state
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "WireBallFrame")]
pub struct BallFrame {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl BallFrame {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn orientation(&self) -> Quat {
        euler_to_quat(self.rotation)
    }
}

/// Timeline entry for one frame
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "WireFrameMeta")]
pub struct FrameMeta {
    pub delta: f32,
    pub seconds_remaining: f32,
    /// Seconds since the start of the recording
    pub time: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayData {
    pub names: Vec<String>,
    pub colors: Vec<bool>,
    /// `players[i][f]` is player `i` at frame `f`
    pub players: Vec<Vec<PlayerFrame>>,
    #[serde(default)]
    pub ball: Vec<BallFrame>,
    #[serde(default)]
    pub frames: Vec<FrameMeta>,
}

impl ReplayData {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let replay: ReplayData = serde_json::from_str(json)?;
        replay.validate()?;
        Ok(replay)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ReplayError> {
        let replay: ReplayData = serde_json::from_reader(reader)?;
        replay.validate()?;
        Ok(replay)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open replay file: {:?}", path))?;
        let replay = Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to read replay file: {:?}", path))?;
        Ok(replay)
    }

    /// Roster arrays must line up one-to-one
    pub fn validate(&self) -> Result<(), ReplayError> {
        let (names, colors, players) = (self.names.len(), self.colors.len(), self.players.len());
        if names == colors && colors == players {
            Ok(())
        } else {
            Err(ReplayError::LengthMismatch {
                names,
                colors,
                players,
            })
        }
    }

    pub fn player_count(&self) -> usize {
        self.names.len()
    }

    pub fn frame_count(&self) -> usize {
        let track = self.players.first().map_or(0, Vec::len);
        self.frames.len().max(self.ball.len()).max(track)
    }

    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Frame lookup; `frame` must be in range.
    pub fn player_frame(&self, player: usize, frame: usize) -> &PlayerFrame {
        &self.players[player][frame]
    }

    /// Start time of every frame relative to the first one.
    /// Falls back to a fixed rate when the replay carries no timeline.
    pub fn frame_times(&self, fallback_fps: f32) -> Vec<f32> {
        if let Some(first) = self.frames.first() {
            return self.frames.iter().map(|f| (f.time - first.time).max(0.0)).collect();
        }

        let step = 1.0 / fallback_fps.max(f32::EPSILON);
        (0..self.frame_count()).map(|f| f as f32 * step).collect()
    }
}

fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

/// z-up replay coordinates to y-up scene coordinates
fn to_scene(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, z, y)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum BoostFlag {
    Flag(bool),
    Number(f64),
}

impl BoostFlag {
    fn is_set(self) -> bool {
        match self {
            BoostFlag::Flag(flag) => flag,
            BoostFlag::Number(n) => n != 0.0,
        }
    }
}

/// First `N` numbers of a frame tuple
fn read_numbers<'de, A, const N: usize>(
    seq: &mut A,
    expected: &dyn Expected,
) -> Result<[f32; N], A::Error>
where
    A: SeqAccess<'de>,
{
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = seq
            .next_element()?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, expected))?;
    }
    Ok(values)
}

/// Consume fields past the ones the viewer reads
fn skip_rest<'de, A: SeqAccess<'de>>(seq: &mut A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

/// `[x, y, z, pitch, yaw, roll, boost, ...]`
struct WirePlayerFrame {
    values: [f32; 6],
    boost: Option<BoostFlag>,
}

impl<'de> Deserialize<'de> for WirePlayerFrame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlayerFrameVisitor;

        impl<'de> Visitor<'de> for PlayerFrameVisitor {
            type Value = WirePlayerFrame;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a player frame tuple of at least 6 numbers")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let values = read_numbers(&mut seq, &self)?;
                let boost = seq.next_element::<Option<BoostFlag>>()?.flatten();
                skip_rest(&mut seq)?;
                Ok(WirePlayerFrame { values, boost })
            }
        }

        deserializer.deserialize_seq(PlayerFrameVisitor)
    }
}

impl From<WirePlayerFrame> for PlayerFrame {
    fn from(w: WirePlayerFrame) -> Self {
        let [x, y, z, pitch, yaw, roll] = w.values;
        PlayerFrame {
            position: to_scene(x, y, z),
            rotation: Vec3::new(pitch, yaw, roll),
            boost_active: w.boost.is_some_and(BoostFlag::is_set),
        }
    }
}

/// `[x, y, z, pitch, yaw, roll, ...]`
struct WireBallFrame([f32; 6]);

impl<'de> Deserialize<'de> for WireBallFrame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BallFrameVisitor;

        impl<'de> Visitor<'de> for BallFrameVisitor {
            type Value = WireBallFrame;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a ball frame tuple of at least 6 numbers")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let values = read_numbers(&mut seq, &self)?;
                skip_rest(&mut seq)?;
                Ok(WireBallFrame(values))
            }
        }

        deserializer.deserialize_seq(BallFrameVisitor)
    }
}

impl From<WireBallFrame> for BallFrame {
    fn from(w: WireBallFrame) -> Self {
        let [x, y, z, pitch, yaw, roll] = w.0;
        BallFrame {
            position: to_scene(x, y, z),
            rotation: Vec3::new(pitch, yaw, roll),
        }
    }
}

#[derive(Deserialize)]
struct WireFrameMeta(f32, f32, f32);

impl From<WireFrameMeta> for FrameMeta {
    fn from(w: WireFrameMeta) -> Self {
        FrameMeta {
            delta: w.0,
            seconds_remaining: w.1,
            time: w.2,
        }
    }
}
