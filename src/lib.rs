//! `cbc-flow` is a streaming symmetric-encryption transport library. It
//! wraps any `std::io::Write` sink and `std::io::Read` source so that
//! plaintext written incrementally is encrypted and framed on the wire,
//! and framed ciphertext read incrementally is decrypted and de-padded
//! transparently.
//!
//! The wire format is a random IV as the literal first block of the
//! stream, followed by whole AES-CBC ciphertext blocks; the final block
//! always carries self-describing padding. The format provides
//! confidentiality only — there is no integrity or authentication tag,
//! so do not use it where tampering detection is required.
//!
//! ```
//! use cbc_flow::{decrypt, encrypt};
//!
//! let key = [0u8; 16];
//! let ciphertext = encrypt(b"HELLO", &key)?;
//! assert_eq!(decrypt(&ciphertext, &key)?, b"HELLO");
//! # Ok::<(), cbc_flow::Error>(())
//! ```

mod cipher;
pub mod error;
pub mod ordinary;
pub mod streaming;

pub use cipher::BLOCK_SIZE;
pub use error::{Error, Result};
pub use ordinary::{decrypt, encrypt};
pub use streaming::{Decryptor, Encryptor};
