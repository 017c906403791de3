//! Test infrastructure for wavstream integration tests.
//!
//! Builds WAVE files on disk, either byte by byte for malformed containers or
//! through hound for well-formed ones.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use wavstream::sources::{wave::WaveSource, AudioSource, Sample};
pub use wavstream::{playback, FrameBlock, OpenOptions, WaveError, WaveFile};

/// Temporary directory holding fixture files for one test.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write raw bytes to `name`.
    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("Failed to write fixture");
        path
    }

    /// Write 16-bit samples through hound.
    pub fn write_i16(&self, name: &str, channels: u16, sample_rate: u32, samples: &[i16]) -> PathBuf {
        let path = self.path(name);
        write_hound(&path, channels, sample_rate, 16, samples.iter().map(|&s| s as i32));
        path
    }

    /// Write 24-bit samples through hound.
    pub fn write_i24(&self, name: &str, channels: u16, sample_rate: u32, samples: &[i32]) -> PathBuf {
        let path = self.path(name);
        write_hound(&path, channels, sample_rate, 24, samples.iter().copied());
        path
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

fn write_hound<I: Iterator<Item = i32>>(path: &Path, channels: u16, sample_rate: u32, bits: u16, samples: I) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).expect("Failed to create wav");
    for sample in samples {
        writer.write_sample(sample).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize wav");
}

/// Byte-level container builder for cases hound refuses to write.
pub struct Container {
    riff_id: [u8; 4],
    riff_size: Option<u32>,
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            riff_id: *b"RIFF",
            riff_size: None,
            chunks: Vec::new(),
        }
    }

    pub fn riff_id(mut self, id: &[u8; 4]) -> Self {
        self.riff_id = *id;
        self
    }

    pub fn riff_size(mut self, size: u32) -> Self {
        self.riff_size = Some(size);
        self
    }

    pub fn fmt(self, channels: u16, sample_rate: u32, bits: u16) -> Self {
        let block_align = channels * bits / 8;
        let mut body = Vec::new();
        body.write_u16::<LittleEndian>(1).unwrap();
        body.write_u16::<LittleEndian>(channels).unwrap();
        body.write_u32::<LittleEndian>(sample_rate).unwrap();
        body.write_u32::<LittleEndian>(sample_rate * block_align as u32).unwrap();
        body.write_u16::<LittleEndian>(block_align).unwrap();
        body.write_u16::<LittleEndian>(bits).unwrap();
        self.chunk(b"fmt ", body)
    }

    pub fn fact(self, frames: u32) -> Self {
        self.chunk(b"fact", frames.to_le_bytes().to_vec())
    }

    pub fn data(self, samples: Vec<u8>) -> Self {
        self.chunk(b"data", samples)
    }

    pub fn chunk(mut self, id: &[u8; 4], body: Vec<u8>) -> Self {
        self.chunks.push((*id, body));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = b"WAVE".to_vec();
        for (id, chunk) in &self.chunks {
            body.extend_from_slice(id);
            body.write_u32::<LittleEndian>(chunk.len() as u32).unwrap();
            body.extend_from_slice(chunk);
            if chunk.len() % 2 == 1 {
                body.push(0);
            }
        }

        let mut out = self.riff_id.to_vec();
        out.write_u32::<LittleEndian>(self.riff_size.unwrap_or(body.len() as u32))
            .unwrap();
        out.extend(body);
        out
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Interleaved stereo ramp: left counts up from 0, right counts down from -1.
pub fn stereo_ramp(frames: usize) -> Vec<i16> {
    (0..frames as i16).flat_map(|i| [i, -i - 1]).collect()
}

/// Decode the first two channels of 16-bit stereo frame `frame` from `data`.
pub fn stereo_frame(data: &[u8], frame: usize) -> Sample {
    let at = frame * 4;
    (
        i16::from_le_bytes([data[at], data[at + 1]]),
        i16::from_le_bytes([data[at + 2], data[at + 3]]),
    )
}
