//! RIFF/WAVE container walker.
//!
//! Validates the outer `RIFF....WAVE` envelope, walks the chunk sequence and
//! returns where the sample payload lives together with its format. The
//! payload itself is never read here.

use crate::{
    constants::{
        CHUNK_HEADER_SIZE, DATA_ID, FACT_ID, FMT_ID, FMT_MIN_SIZE, RIFF_ID, WAVE_ID,
    },
    error::{Result, WaveError},
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

/// Contents of the `fmt ` chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveFormat {
    /// Encoding tag, 1 for linear PCM. Not interpreted by the parser.
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub avg_bytes_per_sec: u32,
    /// Block alignment as declared by the file. The parser derives its own
    /// frame width instead of trusting this field.
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl WaveFormat {
    /// Bytes per sample frame: `channels * bits_per_sample / 8`
    pub fn frame_width(&self) -> usize {
        self.channels as usize * self.bits_per_sample as usize / 8
    }

    fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(WaveError::InvalidFormat("zero channels".to_string()));
        }
        if self.bits_per_sample == 0 || self.bits_per_sample % 8 != 0 {
            return Err(WaveError::InvalidFormat(format!(
                "{} bits per sample is not byte aligned",
                self.bits_per_sample
            )));
        }
        if self.sample_rate == 0 {
            return Err(WaveError::InvalidFormat("zero sample rate".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for WaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fmt: {}, chs: {}, bits: {}, freq: {}",
            self.format_tag, self.channels, self.bits_per_sample, self.sample_rate
        )
    }
}

/// Options controlling how strictly the chunk walk treats the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpenOptions {
    strict: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject chunks other than `fmt `, `fact` and `data` instead of
    /// skipping them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Where the payload lives and how to interpret it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub format: WaveFormat,
    /// Offset of the first sample byte
    pub payload_offset: u64,
    /// Declared byte length of the `data` chunk
    pub payload_len: u64,
    /// Authoritative number of frames
    pub frame_count: u64,
}

impl Layout {
    pub fn payload_end(&self) -> u64 {
        self.payload_offset.saturating_add(self.payload_len)
    }

    /// End of the audio proper: the data chunk end, or earlier when the
    /// frame count from a `fact` chunk covers less than the whole payload.
    pub fn audio_end(&self) -> u64 {
        let counted = self
            .frame_count
            .saturating_mul(self.format.frame_width() as u64);
        self.payload_offset
            .saturating_add(counted)
            .min(self.payload_end())
    }
}

/// Fields collected during the walk. Chunks may come in any order, so
/// nothing is validated until the walk is complete.
#[derive(Default)]
struct ChunkScan {
    format: Option<WaveFormat>,
    fact_frames: Option<u32>,
    payload: Option<(u64, u64)>,
}

impl ChunkScan {
    fn has(&self, id: &[u8; 4]) -> bool {
        match *id {
            FMT_ID => self.format.is_some(),
            FACT_ID => self.fact_frames.is_some(),
            DATA_ID => self.payload.is_some(),
            _ => false,
        }
    }
}

struct ChunkHeader {
    id: [u8; 4],
    size: u32,
}

/// Walk the container from the start of `reader`.
///
/// On success the reader is left somewhere inside the container; callers
/// must seek to [`Layout::payload_offset`] before reading samples.
pub fn parse<R: Read + Seek>(reader: &mut R, options: OpenOptions) -> Result<Layout> {
    let stream_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let declared_end = read_envelope(reader)?;
    if declared_end > stream_len {
        return Err(WaveError::MalformedContainer(format!(
            "declared size {declared_end} exceeds stream length {stream_len}"
        )));
    }

    let mut cursor = reader.stream_position()?;
    let mut scan = ChunkScan::default();

    while cursor < declared_end {
        let header = read_chunk_header(reader).map_err(truncated)?;
        let body_start = cursor + CHUNK_HEADER_SIZE;
        let body_end = body_start + header.size as u64;

        if body_end > stream_len {
            return Err(WaveError::MalformedContainer(format!(
                "chunk '{}' ends at {body_end}, past stream length {stream_len}",
                String::from_utf8_lossy(&header.id)
            )));
        }

        let short_fact = header.id == FACT_ID && header.size < 4;
        if !short_fact && scan.has(&header.id) {
            warn!(
                "Repeated '{}' chunk at offset {cursor} replaces the earlier one",
                String::from_utf8_lossy(&header.id)
            );
        }

        cursor = match header.id {
            FMT_ID => {
                scan.format = Some(read_fmt(reader, header.size).map_err(truncated)?);
                reader.stream_position()?
            }
            FACT_ID if header.size >= 4 => {
                scan.fact_frames = Some(reader.read_u32::<LittleEndian>().map_err(truncated)?);
                skip(reader, header.size as u64 - 4)?
            }
            FACT_ID => {
                warn!(
                    "Ignoring 'fact' chunk of {} bytes at offset {cursor}, too short for a frame count",
                    header.size
                );
                skip(reader, header.size as u64)?
            }
            DATA_ID => {
                scan.payload = Some((body_start, header.size as u64));
                skip(reader, header.size as u64)?
            }
            id if options.strict => return Err(WaveError::UnexpectedChunk { id }),
            id => {
                debug!(
                    "Skipping unknown chunk '{}' ({} bytes)",
                    String::from_utf8_lossy(&id),
                    header.size
                );
                skip(reader, header.size as u64)?
            }
        };

        // Chunk bodies are word aligned; writers that omit the pad byte on
        // the final chunk are tolerated.
        if header.size % 2 == 1 && cursor < declared_end {
            cursor = skip(reader, 1)?;
        }
    }

    if cursor != declared_end {
        return Err(WaveError::MalformedContainer(format!(
            "chunk walk ended at {cursor}, expected {declared_end}"
        )));
    }

    finalize(scan)
}

/// Read the 12-byte envelope and return the offset at which the container
/// ends.
fn read_envelope<R: Read>(reader: &mut R) -> Result<u64> {
    let riff_id = read_tag(reader).map_err(not_a_container)?;
    let riff_size = reader.read_u32::<LittleEndian>().map_err(not_a_container)?;
    let wave_id = read_tag(reader).map_err(not_a_container)?;

    if riff_id != RIFF_ID || wave_id != WAVE_ID {
        return Err(WaveError::NotAudioContainer);
    }

    // The size field excludes the tag and size themselves
    Ok(riff_size as u64 + CHUNK_HEADER_SIZE)
}

fn read_chunk_header<R: Read>(reader: &mut R) -> io::Result<ChunkHeader> {
    let id = read_tag(reader)?;
    let size = reader.read_u32::<LittleEndian>()?;
    Ok(ChunkHeader { id, size })
}

fn read_fmt<R: Read + Seek>(reader: &mut R, size: u32) -> io::Result<WaveFormat> {
    if size < FMT_MIN_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("fmt chunk of {size} bytes is shorter than {FMT_MIN_SIZE}"),
        ));
    }

    let format = WaveFormat {
        format_tag: reader.read_u16::<LittleEndian>()?,
        channels: reader.read_u16::<LittleEndian>()?,
        sample_rate: reader.read_u32::<LittleEndian>()?,
        avg_bytes_per_sec: reader.read_u32::<LittleEndian>()?,
        block_align: reader.read_u16::<LittleEndian>()?,
        bits_per_sample: reader.read_u16::<LittleEndian>()?,
    };

    if size > FMT_MIN_SIZE {
        let extension_size = reader.read_u16::<LittleEndian>()?;
        reader.seek(SeekFrom::Current(extension_size as i64))?;
    }

    Ok(format)
}

fn read_tag<R: Read>(reader: &mut R) -> io::Result<[u8; 4]> {
    let mut tag = [0u8; 4];
    reader.read_exact(&mut tag)?;
    Ok(tag)
}

fn skip<R: Seek>(reader: &mut R, len: u64) -> Result<u64> {
    Ok(reader.seek(SeekFrom::Current(len as i64))?)
}

fn finalize(scan: ChunkScan) -> Result<Layout> {
    let (payload_offset, payload_len) = scan
        .payload
        .ok_or_else(|| WaveError::MalformedContainer("no data chunk".to_string()))?;
    let format = scan
        .format
        .ok_or_else(|| WaveError::InvalidFormat("no fmt chunk".to_string()))?;
    format.validate()?;

    let frame_count = match scan.fact_frames {
        Some(frames) if frames > 0 => frames as u64,
        _ => payload_len / format.frame_width() as u64,
    };

    Ok(Layout {
        format,
        payload_offset,
        payload_len,
        frame_count,
    })
}

fn not_a_container(e: io::Error) -> WaveError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => WaveError::NotAudioContainer,
        _ => WaveError::Io(e),
    }
}

fn truncated(e: io::Error) -> WaveError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => {
            WaveError::MalformedContainer(e.to_string())
        }
        _ => WaveError::Io(e),
    }
}
