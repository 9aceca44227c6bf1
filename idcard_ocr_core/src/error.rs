//! 错误类型定义

use thiserror::Error;

/// 错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 签名错误
    #[error("Signing error: {0}")]
    Signing(String),

    /// 网络错误
    #[error("Network error: {0}")]
    Network(String),

    /// API 错误
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// 参数错误
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// 编解码错误
    #[error("Encoding/Decoding error: {0}")]
    Encoding(String),
}

/// 结果类型
pub type Result<T> = std::result::Result<T, Error>;
