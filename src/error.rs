use std::fmt;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which of the startup loads an asset error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Field,
    Ball,
    Car,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Field => "field",
            AssetKind::Ball => "ball",
            AssetKind::Car => "car",
        };
        f.write_str(name)
    }
}

/// Replay dataset did not satisfy its shape contract
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("roster length mismatch: {names} names, {colors} team flags, {players} player tracks")]
    LengthMismatch {
        names: usize,
        colors: usize,
        players: usize,
    },

    #[error("failed to parse replay data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Camera state machine misuse
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("unknown fixed view id: {0}")]
    UnknownView(u8),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(String),

    #[error("invalid pixel buffer size: expected {expected} bytes, got {got}")]
    BufferSize { expected: usize, got: usize },
}

/// Aggregated failure of the startup join
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load {asset} asset: {source}")]
    AssetLoad {
        asset: AssetKind,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    InvalidReplay(#[from] ReplayError),

    #[error("initial render failed: {0}")]
    Render(#[from] RenderError),
}

impl StartupError {
    pub fn asset_load(asset: AssetKind, error: anyhow::Error) -> Self {
        StartupError::AssetLoad {
            asset,
            source: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_load_message_names_the_asset() {
        let err = StartupError::asset_load(AssetKind::Ball, anyhow::anyhow!("file missing"));
        assert_eq!(err.to_string(), "failed to load ball asset: file missing");
    }

    #[test]
    fn asset_load_keeps_source() {
        use std::error::Error as _;
        let err = StartupError::asset_load(AssetKind::Car, anyhow::anyhow!("bad mesh"));
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_view_message() {
        assert_eq!(CameraError::UnknownView(7).to_string(), "unknown fixed view id: 7");
    }
}
