//! 识别结果解析
//!
//! 返回结构（成功）：`{"Response":{"RequestId":"...","Name":"...",...}}`
//! 返回结构（失败）：`{"Response":{"Error":{"Code":"...","Message":"..."},"RequestId":"..."}}`
//!
//! 上游在非 2xx 状态下同样返回错误报文，因此解析不依赖状态码。

use serde::Deserialize;

use crate::types::IdentifyResult;

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "Response")]
    response: Option<ResponseBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseBody {
    #[serde(rename = "RequestId")]
    request_id: String,
    #[serde(rename = "Error")]
    error: Option<ErrorBody>,

    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Nation")]
    nation: String,
    #[serde(rename = "Birth")]
    birth: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "IdNum")]
    id_num: String,

    #[serde(rename = "Authority")]
    authority: String,
    #[serde(rename = "ValidDate")]
    valid_date: String,

    // 保持原样的 JSON 片段，不作进一步解码
    #[serde(rename = "AdvancedInfo")]
    advanced_info: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

/// 解析识别结果
///
/// 任何失败都编码进返回值的 error_code / error_msg，本函数不返回错误。
/// 字段缺失按空字符串处理，部分字段缺失仍视为识别成功。
pub fn parse_identify_result(text: &str) -> IdentifyResult {
    let envelope: ResponseEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            return IdentifyResult {
                error_code: 1,
                error_msg: format!("invalid response JSON: {}", e),
                ..Default::default()
            }
        }
    };

    let Some(body) = envelope.response else {
        return IdentifyResult {
            error_code: 1,
            error_msg: "response is missing the Response object".to_string(),
            ..Default::default()
        };
    };

    if let Some(error) = body.error {
        let error_msg = if error.message.is_empty() {
            error.code
        } else {
            format!("{}: {}", error.code, error.message)
        };
        return IdentifyResult {
            error_code: 1,
            error_msg,
            request_id: body.request_id,
            ..Default::default()
        };
    }

    IdentifyResult {
        error_code: 0,
        error_msg: String::new(),
        name: body.name,
        sex: body.sex,
        nation: body.nation,
        birth: body.birth,
        address: body.address,
        id_num: body.id_num,
        authority: body.authority,
        valid_date: body.valid_date,
        request_id: body.request_id,
        advanced_info: body.advanced_info,
        raw_json: String::new(),
    }
}
