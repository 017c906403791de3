//! Playback loop plumbing.
//!
//! A source is not meant to be shared between threads, so it is confined to
//! a single blocking producer task that pushes blocks into a bounded queue.
//! The consumer drains the queue at whatever pace it needs.

use crate::{
    constants::PLAYBACK_QUEUE_DEPTH,
    sources::{AudioSource, Sample},
};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

pub type PlaybackOutput = mpsc::Receiver<Vec<Sample>>;

/// Start pulling `block_frames` sized blocks from `source`.
///
/// The producer stops when the source is exhausted or the returned receiver
/// is dropped. Must be called from within a tokio runtime.
pub fn start<S: AudioSource + 'static>(mut source: S, block_frames: usize) -> PlaybackOutput {
    let (tx, rx) = mpsc::channel(PLAYBACK_QUEUE_DEPTH);

    tokio::task::spawn_blocking(move || {
        let mut blocks = 0usize;

        while let Some(block) = source.pull_samples(block_frames) {
            if tx.blocking_send(block).is_err() {
                debug!("Playback receiver dropped after {blocks} blocks");
                return;
            }
            blocks += 1;
        }

        debug!("Source exhausted after {blocks} blocks");
    });

    rx
}

/// How long one block of `block_frames` lasts at `sample_rate`.
pub fn block_interval(block_frames: usize, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }

    Duration::from_micros(((block_frames as f64 / sample_rate as f64) * 1_000_000.0) as u64)
}

/// Serialize samples as interleaved little-endian 16-bit PCM.
pub fn encode_block(samples: &[Sample]) -> io::Result<Vec<u8>> {
    let mut data: Vec<u8> = Vec::with_capacity(samples.len() * 4);

    for &(left, right) in samples {
        WriteBytesExt::write_i16::<LittleEndian>(&mut data, left)?;
        WriteBytesExt::write_i16::<LittleEndian>(&mut data, right)?;
    }

    Ok(data)
}

/// Write every block from `blocks` to `out` as 16-bit PCM, waiting one
/// `period` per block when given. A reader that hangs up (broken pipe) ends
/// the stream without an error.
pub async fn drain<W: AsyncWrite + Unpin>(
    mut blocks: PlaybackOutput,
    out: &mut W,
    period: Option<Duration>,
) -> io::Result<()> {
    // interval() panics on a zero period
    let mut ticker = period.map(|p| tokio::time::interval(p.max(Duration::from_micros(1))));

    while let Some(block) = blocks.recv().await {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }

        let data = encode_block(&block)?;
        match out.write_all(&data).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
            Err(e) => return Err(e),
        }
    }

    match out.flush().await {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}
