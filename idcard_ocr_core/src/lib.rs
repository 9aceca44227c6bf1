//! 腾讯云 OCR 身份证识别客户端核心库
//!
//! 提供完整的 IDCardOCR 调用链实现，包括：
//! - TC3-HMAC-SHA256 请求签名（规范请求串、三级密钥派生、Authorization 拼接）
//! - HTTPS 请求编排
//! - 识别结果解析

pub mod client;
pub mod error;
pub mod response;
pub mod signer;
pub mod types;

pub use client::{ClientConfig, OcrClient};
pub use error::{Error, Result};
pub use response::parse_identify_result;
pub use signer::SignResult;
pub use types::*;
