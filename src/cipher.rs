//! Chained AES-CBC block transforms, dispatched at runtime by key length.
//!
//! 在运行时根据密钥长度分发的 AES-CBC 链式块变换。

use aes::cipher::{Block, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};

use crate::error::{Error, Result};

/// Width of one cipher block in bytes.
pub const BLOCK_SIZE: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Rejects any key that does not select one of the AES security levels.
///
/// Called before any I/O is performed so that a bad key never consumes or
/// produces stream bytes.
pub(crate) fn check_key(key: &[u8]) -> Result<()> {
    match key.len() {
        16 | 24 | 32 => Ok(()),
        other => Err(Error::InvalidKeyLength(other)),
    }
}

/// A chained CBC encryptor. The chaining value starts at the IV and is
/// advanced internally for every block processed.
pub(crate) enum CbcEncrypt {
    Aes128(Aes128CbcEnc),
    Aes192(Aes192CbcEnc),
    Aes256(Aes256CbcEnc),
}

impl CbcEncrypt {
    pub(crate) fn new(key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<Self> {
        check_key(key)?;
        let invalid = || Error::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128CbcEnc::new_from_slices(key, iv)
                .map(Self::Aes128)
                .map_err(|_| invalid()),
            24 => Aes192CbcEnc::new_from_slices(key, iv)
                .map(Self::Aes192)
                .map_err(|_| invalid()),
            _ => Aes256CbcEnc::new_from_slices(key, iv)
                .map(Self::Aes256)
                .map_err(|_| invalid()),
        }
    }

    /// Encrypts `buf` in place. `buf` must hold a whole number of blocks.
    pub(crate) fn process(&mut self, buf: &mut [u8]) {
        debug_assert_eq!(buf.len() % BLOCK_SIZE, 0);
        match self {
            Self::Aes128(t) => encrypt_blocks(t, buf),
            Self::Aes192(t) => encrypt_blocks(t, buf),
            Self::Aes256(t) => encrypt_blocks(t, buf),
        }
    }
}

/// A chained CBC decryptor. Per the CBC decryption rule, each *ciphertext*
/// block becomes the next chaining input; the `cbc` crate keeps that state.
pub(crate) enum CbcDecrypt {
    Aes128(Aes128CbcDec),
    Aes192(Aes192CbcDec),
    Aes256(Aes256CbcDec),
}

impl CbcDecrypt {
    pub(crate) fn new(key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<Self> {
        check_key(key)?;
        let invalid = || Error::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128CbcDec::new_from_slices(key, iv)
                .map(Self::Aes128)
                .map_err(|_| invalid()),
            24 => Aes192CbcDec::new_from_slices(key, iv)
                .map(Self::Aes192)
                .map_err(|_| invalid()),
            _ => Aes256CbcDec::new_from_slices(key, iv)
                .map(Self::Aes256)
                .map_err(|_| invalid()),
        }
    }

    /// Decrypts `buf` in place. `buf` must hold a whole number of blocks.
    pub(crate) fn process(&mut self, buf: &mut [u8]) {
        debug_assert_eq!(buf.len() % BLOCK_SIZE, 0);
        match self {
            Self::Aes128(t) => decrypt_blocks(t, buf),
            Self::Aes192(t) => decrypt_blocks(t, buf),
            Self::Aes256(t) => decrypt_blocks(t, buf),
        }
    }
}

fn encrypt_blocks<C: BlockEncryptMut>(transform: &mut C, buf: &mut [u8]) {
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        transform.encrypt_block_mut(Block::<C>::from_mut_slice(chunk));
    }
}

fn decrypt_blocks<C: BlockDecryptMut>(transform: &mut C, buf: &mut [u8]) {
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        transform.decrypt_block_mut(Block::<C>::from_mut_slice(chunk));
    }
}
