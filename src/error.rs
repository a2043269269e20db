use rand::rand_core::OsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("OS-level random number generation failed: {0}")]
    OsRngError(#[from] OsError),

    #[error("底层I/O操作失败: {0}")]
    Io(#[source] std::io::Error),

    #[error("密钥长度必须是 16、24 或 32 字节，实际为 {0} 字节")]
    InvalidKeyLength(usize),

    #[error("流在 IV 读完之前就结束了")]
    TruncatedStream,

    #[error("密文格式不正确或不完整")]
    MalformedStream,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        // Errors raised by this crate travel through the `std::io` traits
        // boxed inside an `io::Error`; unwrap them back into their own variant.
        match err.downcast::<Error>() {
            Ok(inner) => inner,
            Err(err) => Error::Io(err),
        }
    }
}

// 定义一个统一的 Result 类型
pub type Result<T> = std::result::Result<T, Error>;
