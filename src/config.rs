use crate::constants::DEFAULT_BLOCK_FRAMES;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs::read_to_string;

pub const DEFAULT_CONFIG_PATH: &str = "Config.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// WAVE file to stream
    pub file: PathBuf,

    /// Frames pulled from the file per playback block
    #[serde(default = "default_block_frames")]
    pub block_frames: usize,

    /// Initial position in seconds
    #[serde(default)]
    pub start_secs: f64,

    /// Fail on unknown chunks instead of skipping them
    #[serde(default)]
    pub strict: bool,

    /// Pace output to the file's sample rate
    #[serde(default = "default_realtime")]
    pub realtime: bool,
}

fn default_block_frames() -> usize {
    DEFAULT_BLOCK_FRAMES
}

fn default_realtime() -> bool {
    true
}

impl Config {
    /// Defaults for streaming a single file given on the command line.
    pub fn for_file<P: Into<PathBuf>>(file: P) -> Self {
        Self {
            file: file.into(),
            block_frames: DEFAULT_BLOCK_FRAMES,
            start_secs: 0.0,
            strict: false,
            realtime: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_frames == 0 {
            bail!("block_frames must be greater than zero");
        }
        if !self.start_secs.is_finite() {
            bail!("start_secs must be a finite number");
        }
        Ok(())
    }
}

pub fn parse(config: &str) -> Result<Config> {
    let config: Config = toml::from_str(config)?;
    config.validate()?;

    Ok(config)
}

pub async fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let config = read_to_string(path)
        .await
        .with_context(|| format!("Could not read config file {}", path.display()))?;

    parse(&config).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Treat `arg` as a WAVE file when it has a `.wav` extension, otherwise as
/// a config file.
pub async fn resolve(arg: &str) -> Result<Config> {
    let path = Path::new(arg);
    let is_wave = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wave {
        Ok(Config::for_file(path))
    } else {
        load(path).await
    }
}
