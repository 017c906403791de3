//! Seekable PCM stream over a parsed WAVE container.
//!
//! A [`WaveFile`] owns its byte source for its whole lifetime. Every failing
//! [`WaveFile::open`] path drops the source before the error is returned, and
//! a successfully opened handle releases it on [`WaveFile::close`] or drop.

use crate::{
    error::{Result, WaveError},
    riff::{self, Layout, WaveFormat},
};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

pub use crate::riff::OpenOptions;

/// A block of frames returned by [`WaveFile::read_frames`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBlock {
    /// Always `requested * frame_width` bytes; anything past the real audio
    /// is silence.
    pub data: Vec<u8>,
    /// Number of complete frames actually read from the file
    pub frames: usize,
    frame_width: usize,
}

impl FrameBlock {
    /// The bytes belonging to real frames, without the zero padding.
    pub fn audio(&self) -> &[u8] {
        &self.data[..self.frames * self.frame_width]
    }

    /// True if the buffer contains padding only
    pub fn is_silent_padding(&self) -> bool {
        self.frames == 0
    }
}

pub struct WaveFile<R = File> {
    reader: R,
    layout: Layout,
    /// Mirrors the reader's cursor
    position: u64,
}

impl WaveFile<File> {
    /// Open the file at `path` with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: OpenOptions) -> Result<Self> {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) => {
                info!("File '{}' not found.", path.display());
                return Err(WaveError::NotFound {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        // The file is moved into from_reader and dropped there on failure
        let wave = match Self::from_reader(file, options) {
            Ok(wave) => wave,
            Err(e) => {
                if e.is_not_audio_container() {
                    info!("File '{}' not in WAVE format.", path.display());
                }
                return Err(e);
            }
        };

        info!("File '{}' - {}.", path.display(), wave.format());

        Ok(wave)
    }
}

impl<R: Read + Seek> WaveFile<R> {
    /// Parse a container from an arbitrary seekable source.
    pub fn from_reader(mut reader: R, options: OpenOptions) -> Result<Self> {
        let layout = riff::parse(&mut reader, options)?;
        let position = reader.seek(SeekFrom::Start(layout.payload_offset))?;

        debug!(
            "Payload at {} ({} bytes, {} frames)",
            layout.payload_offset, layout.payload_len, layout.frame_count
        );

        Ok(Self {
            reader,
            layout,
            position,
        })
    }

    /// Read `requested` frames from the current position.
    ///
    /// The returned buffer always holds `requested` frames worth of bytes;
    /// when the payload or the frame count runs out the remainder is zero
    /// filled and [`FrameBlock::frames`] tells how many frames were real.
    pub fn read_frames(&mut self, requested: usize) -> Result<FrameBlock> {
        let frame_width = self.frame_width();
        let mut data = vec![0u8; requested.saturating_mul(frame_width)];
        let frames = self.read_frames_into(&mut data)?;

        Ok(FrameBlock {
            data,
            frames,
            frame_width,
        })
    }

    /// Fill `buf` with as many whole frames as fit, zero filling whatever
    /// could not be read. Returns the number of real frames.
    pub fn read_frames_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let frame_width = self.frame_width();
        let wanted = buf.len() / frame_width * frame_width;

        // Nothing past the counted frames is audio, whatever follows them
        let remaining = self.layout.audio_end().saturating_sub(self.position);
        let wanted = wanted.min(usize::try_from(remaining).unwrap_or(usize::MAX));

        let obtained = match read_up_to(&mut self.reader, &mut buf[..wanted]) {
            Ok(obtained) => obtained,
            Err(e) => {
                // Part of the buffer may have been consumed before the failure
                self.position = self.reader.stream_position().unwrap_or(self.position);
                return Err(e.into());
            }
        };
        buf[obtained..].fill(0);
        self.position += obtained as u64;

        Ok(obtained / frame_width)
    }

    /// Move the cursor to `seconds` from the start of the payload.
    ///
    /// There is no bounds check: seeking past the end is legal and the next
    /// read returns zero frames. Negative and NaN times clamp to zero.
    pub fn seek_to_time(&mut self, seconds: f64) -> Result<()> {
        let seconds = if seconds.is_nan() { 0.0 } else { seconds.max(0.0) };

        // Float to int casts saturate, so huge times cannot wrap
        let frame = (self.sample_rate() as f64 * seconds).floor() as u64;

        self.seek_to_frame(frame)
    }

    /// Move the cursor to the start of frame `frame`.
    pub fn seek_to_frame(&mut self, frame: u64) -> Result<()> {
        let offset = self
            .layout
            .payload_offset
            .saturating_add(frame.saturating_mul(self.frame_width() as u64))
            .min(i64::MAX as u64);

        self.position = self.reader.seek(SeekFrom::Start(offset))?;

        Ok(())
    }

    /// Release the underlying source.
    pub fn close(self) {
        debug!("Closing wave stream at offset {}", self.position);
        drop(self.reader);
    }
}

impl<R> WaveFile<R> {
    /// Give the underlying source back to the caller instead of closing it.
    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn format(&self) -> &WaveFormat {
        &self.layout.format
    }

    pub fn format_tag(&self) -> u16 {
        self.layout.format.format_tag
    }

    pub fn channels(&self) -> u16 {
        self.layout.format.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.layout.format.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.layout.format.bits_per_sample
    }

    /// Bytes per frame, never zero for an opened file
    pub fn frame_width(&self) -> usize {
        self.layout.format.frame_width()
    }

    pub fn frame_count(&self) -> u64 {
        self.layout.frame_count
    }

    pub fn payload_offset(&self) -> u64 {
        self.layout.payload_offset
    }

    pub fn payload_len(&self) -> u64 {
        self.layout.payload_len
    }

    /// Byte offset of the cursor within the file
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Index of the frame the cursor is on
    pub fn position_frame(&self) -> u64 {
        self.position.saturating_sub(self.layout.payload_offset) / self.frame_width() as u64
    }

    pub fn position_secs(&self) -> f64 {
        self.position_frame() as f64 / self.sample_rate() as f64
    }

    pub fn frames_remaining(&self) -> u64 {
        self.layout.frame_count.saturating_sub(self.position_frame())
    }

    /// True once the cursor is past the last counted frame
    pub fn at_end(&self) -> bool {
        self.position >= self.layout.audio_end()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.layout.frame_count as f64 / self.sample_rate() as f64)
    }
}

/// Read until `buf` is full or the source reports end of stream.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
