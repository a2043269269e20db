//! One-shot, in-memory convenience entry points over the streaming adapters.

use crate::cipher::BLOCK_SIZE;
use crate::error::Result;
use crate::streaming::{Decryptor, Encryptor};
use std::io::{Cursor, Read, Write};

/// Encrypts `plaintext` in one call, returning `IV || ciphertext blocks`.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    // IV, the whole blocks of plaintext, and one padded final block.
    let capacity = BLOCK_SIZE * (2 + plaintext.len() / BLOCK_SIZE);
    let mut encryptor = Encryptor::new(Vec::with_capacity(capacity), key)?;
    encryptor.write_all(plaintext)?;
    encryptor.finish()
}

/// Decrypts a stream produced by [`encrypt`] (or an [`Encryptor`]),
/// returning the original plaintext.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mut decryptor = Decryptor::new(Cursor::new(ciphertext), key)?;
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    decryptor.read_to_end(&mut plaintext)?;
    Ok(plaintext)
}
