//! Integer PCM source backed by a [`WaveFile`].
//!
//! Reads frames straight from the data chunk and converts them to the
//! stereo 16-bit samples the playback loop works with.

use crate::{
    constants::{WAVE_FORMAT_EXTENSIBLE, WAVE_FORMAT_PCM},
    error::{Result, WaveError},
    sources::{AudioSource, Sample},
    wave::WaveFile,
};
use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{Read, Seek};

/// Accepts PCM and EXTENSIBLE format tags with 8, 16, 24 or 32 bits per
/// sample. The EXTENSIBLE subformat is not inspected, so a float or
/// otherwise non-integer EXTENSIBLE file is decoded as if it held integers.
pub struct WaveSource<R = File> {
    wave: WaveFile<R>,
    exhausted: bool,
}

impl<R: Read + Seek> WaveSource<R> {
    pub fn new(wave: WaveFile<R>) -> Result<Self> {
        let format_tag = wave.format_tag();
        let bits_per_sample = wave.bits_per_sample();

        let integer_pcm = matches!(format_tag, WAVE_FORMAT_PCM | WAVE_FORMAT_EXTENSIBLE);
        if !integer_pcm || !matches!(bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(WaveError::UnsupportedEncoding {
                format_tag,
                bits_per_sample,
            });
        }

        Ok(Self {
            wave,
            exhausted: false,
        })
    }

    pub fn wave(&self) -> &WaveFile<R> {
        &self.wave
    }

    /// Reposition the underlying stream. Also revives an exhausted source.
    pub fn seek_to_time(&mut self, seconds: f64) -> Result<()> {
        self.exhausted = false;
        self.wave.seek_to_time(seconds)
    }

    pub fn into_inner(self) -> WaveFile<R> {
        self.wave
    }
}

impl<R: Read + Seek + Send> AudioSource for WaveSource<R> {
    fn pull_samples(&mut self, count: usize) -> Option<Vec<Sample>> {
        if self.exhausted {
            return None;
        }
        if count == 0 {
            return Some(vec![]);
        }

        let block = match self.wave.read_frames(count) {
            Ok(block) => block,
            Err(e) => {
                error!("Error while reading samples: {e}");
                self.exhausted = true;
                return None;
            }
        };

        if block.frames == 0 {
            self.exhausted = true;
            return None;
        }

        let channels = self.wave.channels() as usize;
        let sample_width = self.wave.bits_per_sample() as usize / 8;

        let samples = block
            .audio()
            .chunks_exact(self.wave.frame_width())
            .map(|frame| frame_to_stereo(frame, channels, sample_width))
            .collect();

        Some(samples)
    }

    fn has_more(&self) -> bool {
        !self.exhausted && !self.wave.at_end()
    }
}

/// Take the first two channels of a frame, duplicating mono.
fn frame_to_stereo(frame: &[u8], channels: usize, sample_width: usize) -> Sample {
    let left = decode_sample(&frame[..sample_width]);
    let right = if channels > 1 {
        decode_sample(&frame[sample_width..2 * sample_width])
    } else {
        left
    };

    (left, right)
}

/// Convert one little-endian integer sample to 16 bits.
pub(crate) fn decode_sample(bytes: &[u8]) -> i16 {
    match bytes.len() {
        // 8-bit PCM is unsigned with 128 as the zero level
        1 => (bytes[0] as i16 - 128) << 8,
        // Wider samples keep their most significant 16 bits
        n => LittleEndian::read_i16(&bytes[n - 2..]),
    }
}
