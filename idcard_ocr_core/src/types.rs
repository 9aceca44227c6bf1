//! 数据类型定义

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// 腾讯云访问凭证
///
/// Debug 输出不包含 SecretKey，避免凭证进入日志
#[derive(Clone)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .finish()
    }
}

/// 身份证卡面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    /// 人像面
    Front,
    /// 国徽面
    Back,
}

impl CardSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardSide::Front => "FRONT",
            CardSide::Back => "BACK",
        }
    }
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "FRONT" => Ok(CardSide::Front),
            "BACK" => Ok(CardSide::Back),
            other => Err(Error::InvalidParam(format!("unknown card side: {}", other))),
        }
    }
}

/// IDCardOCR 请求体
///
/// CardSide 为空时必须整体省略，不能发送空字符串
#[derive(Debug, Clone, Serialize)]
pub struct IdCardOcrRequest {
    #[serde(rename = "ImageBase64")]
    pub image_base64: String,
    #[serde(rename = "CardSide", skip_serializing_if = "Option::is_none")]
    pub card_side: Option<String>,
}

impl IdCardOcrRequest {
    pub fn new(image_base64: impl Into<String>, card_side: Option<CardSide>) -> Self {
        Self {
            image_base64: image_base64.into(),
            card_side: card_side.map(|side| side.as_str().to_string()),
        }
    }

    /// 序列化为 payload 字符串，签名与发送共用同一份
    pub fn to_payload(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encoding(e.to_string()))
    }
}

/// 身份证识别结果
///
/// error_code 0 表示成功，非 0 表示失败（本项目自定义，与上游错误码无关）
#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentifyResult {
    pub error_code: i32,
    pub error_msg: String,

    // 正面字段
    pub name: String,
    pub sex: String,
    pub nation: String,
    pub birth: String,
    pub address: String,
    pub id_num: String,

    // 反面字段
    pub authority: String,
    pub valid_date: String,

    // 其他信息
    pub request_id: String,
    pub advanced_info: String,
    pub raw_json: String,
}

impl IdentifyResult {
    /// 是否识别成功
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }

    /// 由内部错误构造失败结果
    pub fn from_error(error: &Error) -> Self {
        Self {
            error_code: 1,
            error_msg: error.to_string(),
            ..Default::default()
        }
    }

    /// 转换为 Result，失败时映射为 Error::Api
    pub fn into_result(self) -> Result<Self> {
        if self.error_code == 0 {
            Ok(self)
        } else {
            Err(Error::Api {
                code: self.error_code.to_string(),
                message: self.error_msg,
            })
        }
    }
}
