use anyhow::{Context, Result};
use wavstream::{
    config,
    playback,
    sources::wave::WaveSource,
    wave::{OpenOptions, WaveFile},
};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let config = config::resolve(&arg).await?;

    let options = OpenOptions::new().strict(config.strict);
    let mut wave = WaveFile::open_with(&config.file, options)
        .with_context(|| format!("Could not open {}", config.file.display()))?;

    wave.seek_to_time(config.start_secs)?;

    let sample_rate = wave.sample_rate();
    log::info!(
        "Streaming {:.2}s of audio from {:.2}s",
        wave.duration().as_secs_f64(),
        wave.position_secs()
    );

    let source = WaveSource::new(wave)?;
    let blocks = playback::start(source, config.block_frames);

    let period = playback::block_interval(config.block_frames, sample_rate);
    let pacing = config.realtime.then_some(period);
    let mut stdout = tokio::io::stdout();

    playback::drain(blocks, &mut stdout, pacing)
        .await
        .context("Could not write samples to stdout")?;

    Ok(())
}
