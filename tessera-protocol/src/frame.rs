//! Frame encoding and decoding shared by both serial links.
//!
//! Frame format:
//! - START (1 byte): 0x5A synchronization byte
//! - LENGTH (2 bytes): payload length, little-endian
//! - KIND (1 byte): message kind identifier
//! - PAYLOAD (LENGTH bytes)
//! - CHECKSUM (1 byte): XOR of both LENGTH bytes, KIND, and all PAYLOAD bytes
//!
//! The 16-bit length (vs. a single byte) exists for the config link: a
//! `config_data` reply carries sixteen sensor records in one JSON document.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x5A;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD: usize = 4096;

/// Maximum complete frame size (START + LENGTH + KIND + MAX_PAYLOAD + CHECKSUM)
pub const MAX_FRAME: usize = 1 + 2 + 1 + MAX_PAYLOAD + 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    BadChecksum,
    /// Declared length exceeds the maximum payload size
    BadLength,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message kind identifier
    pub kind: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD>,
}

impl Frame {
    /// Create a new frame with the given kind and payload
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(payload)
            .map_err(|()| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload: buf })
    }

    /// Create a frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    fn checksum(len: u16, kind: u8, payload: &[u8]) -> u8 {
        let [lo, hi] = len.to_le_bytes();
        payload
            .iter()
            .fold(lo ^ hi ^ kind, |acc, &byte| acc ^ byte)
    }

    /// Encode this frame, returning the written prefix of `buf`
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b [u8], FrameError> {
        let total = 5 + self.payload.len();
        if buf.len() < total {
            return Err(FrameError::BufferTooSmall);
        }

        let len = self.payload.len() as u16;
        buf[0] = FRAME_START;
        buf[1..3].copy_from_slice(&len.to_le_bytes());
        buf[3] = self.kind;
        buf[4..4 + self.payload.len()].copy_from_slice(&self.payload);
        buf[total - 1] = Self::checksum(len, self.kind, &self.payload);

        Ok(&buf[..total])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Scanning for the START byte
    Sync,
    /// Low length byte
    LenLo,
    /// High length byte
    LenHi,
    /// Message kind byte
    Kind,
    /// Payload bytes
    Body,
    /// Trailing checksum
    Check,
}

/// Incremental frame decoder.
///
/// Feed received bytes one at a time (or in slices); garbage between frames
/// is skipped while scanning for the START byte, so the decoder resynchronizes
/// after line noise or a dropped byte.
#[derive(Debug)]
pub struct Decoder {
    state: DecodeState,
    payload: Vec<u8, MAX_PAYLOAD>,
    len: u16,
    kind: u8,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {
            state: DecodeState::Sync,
            payload: Vec::new(),
            len: 0,
            kind: 0,
        }
    }

    /// Reset the decoder to scanning state
    pub fn reset(&mut self) {
        self.state = DecodeState::Sync;
        self.payload.clear();
        self.len = 0;
        self.kind = 0;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame ends on this
    /// byte, `Ok(None)` when more bytes are needed, or `Err` on a framing
    /// error (the decoder has already reset itself and will resync).
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecodeState::Sync => {
                if byte == FRAME_START {
                    self.state = DecodeState::LenLo;
                }
                Ok(None)
            }
            DecodeState::LenLo => {
                self.len = u16::from(byte);
                self.state = DecodeState::LenHi;
                Ok(None)
            }
            DecodeState::LenHi => {
                self.len |= u16::from(byte) << 8;
                if usize::from(self.len) > MAX_PAYLOAD {
                    self.reset();
                    return Err(FrameError::BadLength);
                }
                self.state = DecodeState::Kind;
                Ok(None)
            }
            DecodeState::Kind => {
                self.kind = byte;
                self.payload.clear();
                self.state = if self.len == 0 {
                    DecodeState::Check
                } else {
                    DecodeState::Body
                };
                Ok(None)
            }
            DecodeState::Body => {
                // Cannot overflow: len was bounds-checked against MAX_PAYLOAD
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(self.len) {
                    self.state = DecodeState::Check;
                }
                Ok(None)
            }
            DecodeState::Check => {
                let expected = Frame::checksum(self.len, self.kind, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::BadChecksum);
                }

                let frame = Frame {
                    kind: self.kind,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Feed a slice of bytes, returning the first complete frame found
    ///
    /// Bytes after a complete frame are not consumed.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.push(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
