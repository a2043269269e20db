//! Implements `std::io` traits for synchronous, streaming CBC encryption.
//!
//! The wire format is the IV as the literal first block of the stream,
//! followed by whole ciphertext blocks. The final plaintext block always
//! carries padding whose byte value equals the padding length, so a
//! block-aligned plaintext is followed by one full padding-only block.

use crate::cipher::{CbcDecrypt, CbcEncrypt, BLOCK_SIZE};
use crate::error::{Error, Result};
use rand::{rngs::OsRng, TryRngCore};
use std::io::{self, BufRead, BufReader, Read, Write};
use zeroize::Zeroizing;

/// Implements `std::io::Write` for streaming CBC encryption.
///
/// Plaintext may be written in chunks of any size; sub-block remainders are
/// buffered between calls and only whole blocks reach the sink. The stream
/// is not valid until [`Encryptor::finish`] has emitted the padded final
/// block.
pub struct Encryptor<W: Write> {
    sink: W,
    transform: CbcEncrypt,
    rem: Zeroizing<[u8; BLOCK_SIZE]>,
    rem_len: usize,
}

impl<W: Write> Encryptor<W> {
    /// Creates an encryptor over `sink`, generating a fresh random IV and
    /// writing it to the sink before any ciphertext.
    ///
    /// The key must be 16, 24 or 32 bytes long.
    pub fn new(sink: W, key: &[u8]) -> Result<Self> {
        let mut iv = [0u8; BLOCK_SIZE];
        OsRng.try_fill_bytes(&mut iv)?;
        Self::with_iv(sink, key, iv)
    }

    // Deterministic construction, kept internal: reusing an IV under the
    // same key breaks CBC confidentiality.
    pub(crate) fn with_iv(mut sink: W, key: &[u8], iv: [u8; BLOCK_SIZE]) -> Result<Self> {
        let transform = CbcEncrypt::new(key, &iv)?;
        sink.write_all(&iv).map_err(Error::Io)?;
        Ok(Self {
            sink,
            transform,
            rem: Zeroizing::new([0u8; BLOCK_SIZE]),
            rem_len: 0,
        })
    }

    /// Pads, encrypts and writes the final block, then returns the sink.
    ///
    /// Must be called to terminate the stream; a dropped encryptor leaves
    /// the stream unterminated and undecryptable past the last whole block.
    pub fn finish(mut self) -> Result<W> {
        let pad = (BLOCK_SIZE - self.rem_len) as u8;
        self.rem[self.rem_len..].fill(pad);
        self.transform.process(&mut self.rem[..]);
        self.sink.write_all(&self.rem[..]).map_err(Error::Io)?;
        Ok(self.sink)
    }
}

impl<W: Write> Write for Encryptor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // Whole blocks available once the remainder is prepended.
        let usable = (self.rem_len + buf.len()) / BLOCK_SIZE * BLOCK_SIZE;
        let take = usable.saturating_sub(self.rem_len);
        if usable > 0 {
            let mut chunk = Zeroizing::new(vec![0u8; usable]);
            chunk[..self.rem_len].copy_from_slice(&self.rem[..self.rem_len]);
            chunk[self.rem_len..].copy_from_slice(&buf[..take]);
            self.rem_len = 0;
            self.transform.process(&mut chunk);
            self.sink.write_all(&chunk)?;
        }
        // Carry the sub-block tail over to the next call.
        self.rem[self.rem_len..self.rem_len + buf.len() - take].copy_from_slice(&buf[take..]);
        self.rem_len += buf.len() - take;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // A partial block cannot be emitted mid-stream; only the sink is
        // flushed. Padding happens in `finish`.
        self.sink.flush()
    }
}

/// Implements `std::io::Read` for streaming CBC decryption.
///
/// Reads ciphertext produced by [`Encryptor`], decrypts it block by block
/// and strips the padding from the final block. The final block is located
/// with a one-byte lookahead on the source, so the padding length is known
/// before any of its bytes are handed to the caller.
pub struct Decryptor<R: Read> {
    source: BufReader<R>,
    transform: CbcDecrypt,
    rem: Zeroizing<[u8; BLOCK_SIZE]>,
    rem_len: usize,
}

impl<R: Read> Decryptor<R> {
    /// Creates a decryptor over `source`, consuming the IV from the first
    /// block of the stream.
    ///
    /// The key must be 16, 24 or 32 bytes long. Fails with
    /// [`Error::TruncatedStream`] if the source ends before a full IV.
    pub fn new(source: R, key: &[u8]) -> Result<Self> {
        crate::cipher::check_key(key)?;
        // The BufReader supplies the non-consuming one-byte lookahead used
        // to recognize the final block.
        let mut source = BufReader::new(source);
        let mut iv = [0u8; BLOCK_SIZE];
        source.read_exact(&mut iv).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedStream,
            _ => Error::Io(e),
        })?;
        let transform = CbcDecrypt::new(key, &iv)?;
        Ok(Self {
            source,
            transform,
            rem: Zeroizing::new([0u8; BLOCK_SIZE]),
            rem_len: 0,
        })
    }
}

impl<R: Read> Read for Decryptor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // Serve previously decrypted bytes first.
        let served = self.rem_len.min(buf.len());
        buf[..served].copy_from_slice(&self.rem[..served]);
        self.rem.copy_within(served..self.rem_len, 0);
        self.rem_len -= served;
        if served == buf.len() {
            return Ok(served);
        }

        // Fetch enough ciphertext to cover the rest of the request, rounded
        // up to whole blocks.
        let want = buf.len() - served;
        let round = want.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        let mut chunk = Zeroizing::new(vec![0u8; round]);
        let n = read_full(&mut self.source, &mut chunk)?;
        if n == 0 {
            // Clean end of stream; a later call returns Ok(0) once the
            // bytes served above are gone.
            return Ok(served);
        }
        if n % BLOCK_SIZE != 0 {
            return Err(malformed());
        }
        chunk.truncate(n);
        self.transform.process(&mut chunk);

        let mut len = chunk.len();
        if self.source.fill_buf()?.is_empty() {
            // No byte follows, so this batch ends with the final block and
            // its last byte is the padding length.
            let pad = chunk[len - 1] as usize;
            if pad == 0 || pad > len {
                return Err(malformed());
            }
            len -= pad;
        }

        let delivered = len.min(want);
        buf[served..served + delivered].copy_from_slice(&chunk[..delivered]);
        // Anything past the caller's capacity is at most one block minus a
        // byte; hold it for the next call.
        self.rem[..len - delivered].copy_from_slice(&chunk[delivered..len]);
        self.rem_len = len - delivered;
        Ok(served + delivered)
    }
}

fn malformed() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, Error::MalformedStream)
}

/// Reads until `buf` is full or the source reports end-of-data. A short
/// total is legal here only when it still divides into whole blocks, which
/// the caller checks.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        match source.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(m) => n += m,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(n)
}
