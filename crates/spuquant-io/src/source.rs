//! Lenient byte source
//!
//! A PNG is pulled from the source in exact-size requests that follow its
//! chunk framing: the signature, each 8-byte chunk header, then the chunk
//! body and CRC in pieces of at most [`MAX_REQUEST`] bytes, up to `IEND`.
//!
//! A request that comes back short does not fail. The missing bytes are
//! zero-filled, the input is marked truncated, and every later request
//! yields nothing.

use crate::error::IoResult;
use std::io::Read;

/// Largest single request made to the source
pub const MAX_REQUEST: usize = 4096;

const SIGNATURE_LEN: usize = 8;
const CHUNK_HEADER_LEN: usize = 8;
const CRC_LEN: u64 = 4;

/// Source wrapper that zero-pads the first short request.
#[derive(Debug)]
pub struct LenientReader<R> {
    inner: R,
    truncated: bool,
}

impl<R: Read> LenientReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            truncated: false,
        }
    }

    /// True once a request came back short
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Append exactly `n` bytes to `out`.
    ///
    /// Returns `false` without touching `out` once the source is truncated.
    pub fn request(&mut self, n: usize, out: &mut Vec<u8>) -> IoResult<bool> {
        if self.truncated {
            return Ok(false);
        }
        out.try_reserve(n)?;
        let start = out.len();
        (&mut self.inner).take(n as u64).read_to_end(out)?;
        let got = out.len() - start;
        if got < n {
            tracing::warn!(requested = n, received = got, "premature end of PNG input");
            out.resize(start + n, 0);
            self.truncated = true;
        }
        Ok(true)
    }
}

/// PNG bytes read ahead of decoding
#[derive(Debug, Clone)]
pub struct StagedInput {
    pub data: Vec<u8>,
    pub truncated: bool,
}

/// Pull one PNG stream from `source`, chunk by chunk, through `IEND`.
pub fn stage_png<R: Read>(source: R) -> IoResult<StagedInput> {
    let mut reader = LenientReader::new(source);
    let mut data = Vec::new();

    if reader.request(SIGNATURE_LEN, &mut data)? {
        loop {
            let header = data.len();
            if !reader.request(CHUNK_HEADER_LEN, &mut data)? {
                break;
            }
            let length = u32::from_be_bytes([
                data[header],
                data[header + 1],
                data[header + 2],
                data[header + 3],
            ]);
            let is_end = &data[header + 4..header + 8] == b"IEND";

            let mut remaining = u64::from(length) + CRC_LEN;
            while remaining > 0 {
                let n = remaining.min(MAX_REQUEST as u64) as usize;
                if !reader.request(n, &mut data)? {
                    break;
                }
                remaining -= n as u64;
            }

            if is_end || reader.truncated() {
                break;
            }
        }
    }

    tracing::debug!(
        bytes = data.len(),
        truncated = reader.truncated(),
        "staged PNG input"
    );

    Ok(StagedInput {
        data,
        truncated: reader.truncated(),
    })
}
