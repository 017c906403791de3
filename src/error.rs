use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or streaming a WAVE file
#[derive(Debug, Error)]
pub enum WaveError {
    /// The file could not be opened
    #[error("file '{}' not found", path.display())]
    NotFound {
        /// The path that was requested
        path: PathBuf,
        /// The underlying open error
        #[source]
        source: io::Error,
    },

    /// The outer envelope is not RIFF/WAVE. Callers probing several file
    /// types should treat this as a soft condition.
    #[error("not a RIFF/WAVE container")]
    NotAudioContainer,

    /// The chunk walk did not land exactly on the declared end, a chunk is
    /// truncated, or no data chunk was found
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The format descriptor is missing or yields a zero-width frame
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Unknown chunk encountered while opening in strict mode
    #[error("unexpected chunk '{}'", String::from_utf8_lossy(id))]
    UnexpectedChunk {
        /// The four-byte chunk tag
        id: [u8; 4],
    },

    /// The sample encoding cannot be converted to 16-bit PCM
    #[error("unsupported encoding: format tag {format_tag:#06x}, {bits_per_sample} bits")]
    UnsupportedEncoding {
        format_tag: u16,
        bits_per_sample: u16,
    },

    /// I/O failure other than reaching the end of the stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WaveError {
    /// Whether the error only says "this is not a WAVE file"
    pub fn is_not_audio_container(&self) -> bool {
        matches!(self, WaveError::NotAudioContainer)
    }
}

/// Result type for WAVE operations
pub type Result<T> = std::result::Result<T, WaveError>;
