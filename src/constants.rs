// Chunk identifiers, stored in the file as four ASCII bytes
pub const RIFF_ID: [u8; 4] = *b"RIFF";
pub const WAVE_ID: [u8; 4] = *b"WAVE";
pub const FMT_ID: [u8; 4] = *b"fmt ";
pub const FACT_ID: [u8; 4] = *b"fact";
pub const DATA_ID: [u8; 4] = *b"data";

// Size of the tag + size header preceding every chunk body
pub const CHUNK_HEADER_SIZE: u64 = 8;

// Minimal fmt chunk body, without the extension size field
pub const FMT_MIN_SIZE: u32 = 16;

// Format tags understood by the sample source
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

// Playback defaults
pub const DEFAULT_BLOCK_FRAMES: usize = 1024;
pub const PLAYBACK_QUEUE_DEPTH: usize = 8;
