//! In-memory WAVE containers for unit tests.

use crate::constants::{DATA_ID, FACT_ID, FMT_ID, RIFF_ID, WAVE_FORMAT_PCM, WAVE_ID};
use byteorder::{LittleEndian, WriteBytesExt};

pub struct WaveBuilder {
    riff_id: [u8; 4],
    wave_id: [u8; 4],
    riff_size: Option<u32>,
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl WaveBuilder {
    pub fn new() -> Self {
        Self {
            riff_id: RIFF_ID,
            wave_id: WAVE_ID,
            riff_size: None,
            chunks: Vec::new(),
        }
    }

    pub fn magic(mut self, riff_id: &[u8; 4], wave_id: &[u8; 4]) -> Self {
        self.riff_id = *riff_id;
        self.wave_id = *wave_id;
        self
    }

    /// Override the declared outer size
    pub fn riff_size(mut self, size: u32) -> Self {
        self.riff_size = Some(size);
        self
    }

    pub fn fmt(self, channels: u16, sample_rate: u32, bits: u16) -> Self {
        let body = fmt_body(WAVE_FORMAT_PCM, channels, sample_rate, bits);
        self.chunk(&FMT_ID, body)
    }

    pub fn fmt_tagged(self, format_tag: u16, channels: u16, sample_rate: u32, bits: u16) -> Self {
        let body = fmt_body(format_tag, channels, sample_rate, bits);
        self.chunk(&FMT_ID, body)
    }

    /// fmt chunk carrying the extension size field and `extension` bytes
    pub fn fmt_extended(self, channels: u16, sample_rate: u32, bits: u16, extension: &[u8]) -> Self {
        let mut body = fmt_body(WAVE_FORMAT_PCM, channels, sample_rate, bits);
        body.write_u16::<LittleEndian>(extension.len() as u16).unwrap();
        body.extend_from_slice(extension);
        self.chunk(&FMT_ID, body)
    }

    pub fn fact(self, frames: u32) -> Self {
        let mut body = Vec::new();
        body.write_u32::<LittleEndian>(frames).unwrap();
        self.chunk(&FACT_ID, body)
    }

    pub fn data(self, samples: Vec<u8>) -> Self {
        self.chunk(&DATA_ID, samples)
    }

    pub fn chunk(mut self, id: &[u8; 4], body: Vec<u8>) -> Self {
        self.chunks.push((*id, body));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = self.wave_id.to_vec();
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

fn fmt_body(format_tag: u16, channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut body = Vec::new();
    body.write_u16::<LittleEndian>(format_tag).unwrap();
    body.write_u16::<LittleEndian>(channels).unwrap();
    body.write_u32::<LittleEndian>(sample_rate).unwrap();
    body.write_u32::<LittleEndian>(sample_rate * block_align as u32)
        .unwrap();
    body.write_u16::<LittleEndian>(block_align).unwrap();
    body.write_u16::<LittleEndian>(bits).unwrap();
    body
}

/// `frames` frames of 16-bit mono where every sample holds its frame index
pub fn indexed_mono16(frames: u16) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..frames {
        data.write_i16::<LittleEndian>(i as i16).unwrap();
    }
    data
}
