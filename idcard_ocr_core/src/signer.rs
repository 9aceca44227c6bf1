//! 腾讯云 API 3.0（TC3-HMAC-SHA256）签名实现
//!
//! 签名流程：
//! 1. 拼接规范请求串 canonicalRequest
//! 2. 拼接待签名字符串 stringToSign
//! 3. 三级 HMAC 派生签名密钥并计算签名
//! 4. 拼接 Authorization 头
//!
//! 注意：请求发送时的 Header 与 Payload 必须与签名计算过程中的内容完全一致，
//! 否则服务端会返回签名不一致错误。

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// 签名算法标识
pub const ALGORITHM: &str = "TC3-HMAC-SHA256";

/// 参与签名的 Header 集合（固定顺序，全部小写）
pub const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

/// 凭证范围后缀
const SCOPE_SUFFIX: &str = "tc3_request";

/// 签名结果
#[derive(Debug, Clone)]
pub struct SignResult {
    /// Authorization 头
    pub authorization: String,
    /// 签名（64 位小写十六进制）
    pub signature: String,
    /// 规范请求串
    pub canonical_request: String,
    /// 待签名字符串
    pub string_to_sign: String,
    /// UTC 日期（yyyy-MM-dd）
    pub date: String,
    /// 秒级时间戳
    pub timestamp: i64,
    /// 参与签名的 Header 集合
    pub signed_headers: String,
    /// 凭证范围（date/service/tc3_request）
    pub credential_scope: String,
}

/// 生成 Authorization 头
///
/// * `service` - 产品名称，OCR 为 "ocr"
/// * `host` - 请求域名，如 "ocr.tencentcloudapi.com"
/// * `action` - 接口 Action，如 "IDCardOCR"
/// * `version` - 接口 Version，只作为 X-TC-Version 头发送，不参与签名运算
/// * `timestamp` - 秒级时间戳，必须与 X-TC-Timestamp 头使用同一个值
/// * `payload` - 请求体 JSON 字符串，必须与实际发送的 body 逐字节一致
#[allow(clippy::too_many_arguments)]
pub fn sign(
    secret_id: &str,
    secret_key: &str,
    service: &str,
    host: &str,
    action: &str,
    version: &str,
    timestamp: i64,
    payload: &str,
    content_type: &str,
) -> Result<SignResult> {
    let date = utc_date(timestamp)?;

    let canonical_request = canonical_request("POST", "/", "", content_type, host, action, payload);

    let credential_scope = format!("{}/{}/{}", date, service, SCOPE_SUFFIX);
    let hashed_canonical_request = sha256_hex(&canonical_request);

    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM, timestamp, credential_scope, hashed_canonical_request
    );

    let signing_key = derive_signing_key(secret_key, &date, service)?;
    let signature = hex::encode(hmac_sha256(&signing_key, &string_to_sign)?);

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, secret_id, credential_scope, SIGNED_HEADERS, signature
    );

    debug!(action, version, timestamp, "request signed");

    Ok(SignResult {
        authorization,
        signature,
        canonical_request,
        string_to_sign,
        date,
        timestamp,
        signed_headers: SIGNED_HEADERS.to_string(),
        credential_scope,
    })
}

/// 拼接规范请求串
///
/// 本 API 的 method / uri / query 固定为 POST、"/"、空串，仍作为参数传入，
/// 便于与官方签名文档逐段对照。
pub fn canonical_request(
    method: &str,
    uri: &str,
    query: &str,
    content_type: &str,
    host: &str,
    action: &str,
    payload: &str,
) -> String {
    // canonical headers 必须全部小写
    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-tc-action:{}\n",
        content_type,
        host,
        action.to_lowercase()
    );

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method,
        uri,
        query,
        canonical_headers,
        SIGNED_HEADERS,
        sha256_hex(payload)
    )
}

/// 三级 HMAC 派生签名密钥：密钥 -> 日期密钥 -> 服务密钥 -> 签名密钥
pub fn derive_signing_key(secret_key: &str, date: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), date)?;
    let k_service = hmac_sha256(&k_date, service)?;
    hmac_sha256(&k_service, SCOPE_SUFFIX)
}

/// 由秒级时间戳计算 UTC 日期（yyyy-MM-dd）
///
/// 时区必须是 UTC，使用本地时区会在 UTC 日界附近派生出服务端无法复现的密钥
pub fn utc_date(timestamp: i64) -> Result<String> {
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| Error::Signing(format!("timestamp {} out of range", timestamp)))?;
    Ok(datetime.format("%Y-%m-%d").to_string())
}

/// SHA-256 哈希，返回小写十六进制字符串
pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn hmac_sha256(key: &[u8], msg: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| Error::Signing(e.to_string()))?;
    mac.update(msg.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Base64 编码
pub fn base64_encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Base64 解码
pub fn base64_decode(data: &str) -> Result<Vec<u8>> {
    BASE64.decode(data).map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_ID: &str = "AKIDEXAMPLE";
    const SECRET_KEY: &str = "SecretKey";
    const HOST: &str = "ocr.tencentcloudapi.com";
    const ACTION: &str = "IDCardOCR";
    const VERSION: &str = "2018-11-19";
    const CONTENT_TYPE: &str = "application/json";

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("{}"),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_utc_date() {
        assert_eq!(utc_date(1700000000).unwrap(), "2023-11-14");
        assert_eq!(utc_date(1551113065).unwrap(), "2019-02-25");
        assert_eq!(utc_date(0).unwrap(), "1970-01-01");
    }

    #[test]
    fn test_canonical_request_exact() {
        let request = canonical_request("POST", "/", "", CONTENT_TYPE, HOST, ACTION, "{}");
        let expected = "POST\n/\n\n\
            content-type:application/json\n\
            host:ocr.tencentcloudapi.com\n\
            x-tc-action:idcardocr\n\
            \n\
            content-type;host;x-tc-action\n\
            44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";
        assert_eq!(request, expected);
    }

    #[test]
    fn test_derive_signing_key_vector() {
        let key = derive_signing_key(SECRET_KEY, "2019-02-25", "ocr").unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(
            hex::encode(key),
            "cf80b2c87bc22288ec61f8278bfa4a775834cc365b5a7360e843169060ea4ca0"
        );
    }

    #[test]
    fn test_sign_vector() {
        let result = sign(
            SECRET_ID,
            SECRET_KEY,
            "ocr",
            HOST,
            ACTION,
            VERSION,
            1700000000,
            "{}",
            CONTENT_TYPE,
        )
        .unwrap();

        assert_eq!(result.date, "2023-11-14");
        assert_eq!(result.credential_scope, "2023-11-14/ocr/tc3_request");
        assert_eq!(result.signed_headers, SIGNED_HEADERS);
        assert_eq!(
            result.string_to_sign,
            "TC3-HMAC-SHA256\n1700000000\n2023-11-14/ocr/tc3_request\n\
             ad6d60a1108fbc036d6c170c17021b844adca4c46907fe42b5a4aed5ac552dde"
        );
        assert_eq!(
            result.signature,
            "1adae94b73eff03bb7b3561b076f972d47e2abe2d2aa74702f6b6409ad12bf01"
        );
        assert_eq!(
            result.authorization,
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2023-11-14/ocr/tc3_request, \
             SignedHeaders=content-type;host;x-tc-action, \
             Signature=1adae94b73eff03bb7b3561b076f972d47e2abe2d2aa74702f6b6409ad12bf01"
        );
    }

    #[test]
    fn test_sign_with_card_side_payload() {
        let payload = r#"{"ImageBase64":"aGVsbG8=","CardSide":"FRONT"}"#;
        let result = sign(
            SECRET_ID,
            SECRET_KEY,
            "ocr",
            HOST,
            ACTION,
            VERSION,
            1551113065,
            payload,
            CONTENT_TYPE,
        )
        .unwrap();

        assert_eq!(result.date, "2019-02-25");
        assert_eq!(
            result.signature,
            "1f0002680c9db0a462568672250c3703f3e6b87207842d38423d2753cc3786aa"
        );
    }

    #[test]
    fn test_sign_deterministic() {
        let first = sign(
            SECRET_ID, SECRET_KEY, "ocr", HOST, ACTION, VERSION, 1700000000, "{}", CONTENT_TYPE,
        )
        .unwrap();
        let second = sign(
            SECRET_ID, SECRET_KEY, "ocr", HOST, ACTION, VERSION, 1700000000, "{}", CONTENT_TYPE,
        )
        .unwrap();

        assert_eq!(first.canonical_request, second.canonical_request);
        assert_eq!(first.string_to_sign, second.string_to_sign);
        assert_eq!(first.signature, second.signature);
        assert_eq!(first.authorization, second.authorization);
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let result = sign(
            SECRET_ID, SECRET_KEY, "ocr", HOST, ACTION, VERSION, 1700000000, "{}", CONTENT_TYPE,
        )
        .unwrap();

        assert_eq!(result.signature.len(), 64);
        assert!(result
            .signature
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_utc_date_out_of_range() {
        assert!(utc_date(i64::MAX).is_err());
    }

    #[test]
    fn test_base64() {
        let data = b"hello world";
        let encoded = base64_encode(data);
        let decoded = base64_decode(&encoded).unwrap();
        assert_eq!(data.to_vec(), decoded);
        assert!(base64_decode("not base64!").is_err());
    }
}
