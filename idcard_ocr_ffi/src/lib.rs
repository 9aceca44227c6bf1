//! 身份证识别 FFI 绑定
//!
//! 提供 C ABI 兼容的接口，供移动端等其他语言调用。
//! 只暴露纯计算部分（签名、payload 组装、结果解析），
//! 网络请求由调用方在自己的 HTTP 栈中完成。

use std::ffi::{c_char, c_int, c_longlong, c_uchar, c_ulong, CStr};
use std::ptr;

use idcard_ocr_core::response::parse_identify_result;
use idcard_ocr_core::signer;
use idcard_ocr_core::types::{CardSide, IdCardOcrRequest};

/// 错误码定义
pub const IDOCR_OK: c_int = 0;
pub const IDOCR_ERR_NULL_PTR: c_int = -1;
pub const IDOCR_ERR_INVALID_PARAM: c_int = -2;
pub const IDOCR_ERR_SIGNING: c_int = -3;
pub const IDOCR_ERR_NETWORK: c_int = -4;
pub const IDOCR_ERR_ENCODING: c_int = -5;
pub const IDOCR_ERR_BUFFER_TOO_SMALL: c_int = -6;

/// # Safety
/// 调用方保证 `value` 指向合法的 NUL 结尾字符串
unsafe fn str_arg<'a>(value: *const c_char) -> Result<&'a str, c_int> {
    CStr::from_ptr(value).to_str().map_err(|_| IDOCR_ERR_ENCODING)
}

macro_rules! try_str {
    ($ptr:expr) => {
        match unsafe { str_arg($ptr) } {
            Ok(value) => value,
            Err(code) => return code,
        }
    };
}

/// 将字符串写入调用方缓冲区（含结尾 NUL），容量不足时返回错误码
fn write_out_str(value: &str, out: *mut c_char, out_cap: c_ulong, out_len: *mut c_ulong) -> c_int {
    let bytes = value.as_bytes();
    if bytes.len() + 1 > out_cap as usize {
        return IDOCR_ERR_BUFFER_TOO_SMALL;
    }
    if bytes.contains(&0) {
        return IDOCR_ERR_ENCODING;
    }

    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr(), out as *mut u8, bytes.len());
        *out.add(bytes.len()) = 0;
        *out_len = bytes.len() as c_ulong;
    }
    IDOCR_OK
}

/// 计算 TC3-HMAC-SHA256 签名，输出 Authorization 头
#[no_mangle]
pub extern "C" fn idocr_sign_authorization(
    secret_id: *const c_char,
    secret_key: *const c_char,
    service: *const c_char,
    host: *const c_char,
    action: *const c_char,
    version: *const c_char,
    timestamp: c_longlong,
    payload: *const c_char,
    content_type: *const c_char,
    out_authorization: *mut c_char,
    out_cap: c_ulong,
    out_len: *mut c_ulong,
) -> c_int {
    if secret_id.is_null()
        || secret_key.is_null()
        || service.is_null()
        || host.is_null()
        || action.is_null()
        || version.is_null()
        || payload.is_null()
        || content_type.is_null()
        || out_authorization.is_null()
        || out_len.is_null()
    {
        return IDOCR_ERR_NULL_PTR;
    }

    let secret_id = try_str!(secret_id);
    let secret_key = try_str!(secret_key);
    let service = try_str!(service);
    let host = try_str!(host);
    let action = try_str!(action);
    let version = try_str!(version);
    let payload = try_str!(payload);
    let content_type = try_str!(content_type);

    match signer::sign(
        secret_id,
        secret_key,
        service,
        host,
        action,
        version,
        timestamp,
        payload,
        content_type,
    ) {
        Ok(sign_result) => write_out_str(
            &sign_result.authorization,
            out_authorization,
            out_cap,
            out_len,
        ),
        Err(_) => IDOCR_ERR_SIGNING,
    }
}

/// 组装 IDCardOCR 请求体
///
/// `card_side` 传 NULL 表示自动判断，此时 body 不携带 CardSide 字段
#[no_mangle]
pub extern "C" fn idocr_build_payload(
    image_base64: *const c_char,
    card_side: *const c_char,
    out_payload: *mut c_char,
    out_cap: c_ulong,
    out_len: *mut c_ulong,
) -> c_int {
    if image_base64.is_null() || out_payload.is_null() || out_len.is_null() {
        return IDOCR_ERR_NULL_PTR;
    }

    let image_base64 = try_str!(image_base64);
    if image_base64.is_empty() {
        return IDOCR_ERR_INVALID_PARAM;
    }

    let card_side = if card_side.is_null() {
        None
    } else {
        let value = try_str!(card_side);
        if value.trim().is_empty() {
            None
        } else {
            match value.parse::<CardSide>() {
                Ok(side) => Some(side),
                Err(_) => return IDOCR_ERR_INVALID_PARAM,
            }
        }
    };

    match IdCardOcrRequest::new(image_base64, card_side).to_payload() {
        Ok(payload) => write_out_str(&payload, out_payload, out_cap, out_len),
        Err(_) => IDOCR_ERR_ENCODING,
    }
}

/// 解析识别结果，输出 JSON 编码的 IdentifyResult
///
/// 与客户端行为一致：解析失败编码进 error_code，原始报文放入 raw_json
#[no_mangle]
pub extern "C" fn idocr_parse_response(
    response_json: *const c_char,
    out_result: *mut c_char,
    out_cap: c_ulong,
    out_len: *mut c_ulong,
) -> c_int {
    if response_json.is_null() || out_result.is_null() || out_len.is_null() {
        return IDOCR_ERR_NULL_PTR;
    }

    let response_json = try_str!(response_json);

    let mut result = parse_identify_result(response_json);
    result.raw_json = response_json.to_string();

    match serde_json::to_string(&result) {
        Ok(encoded) => write_out_str(&encoded, out_result, out_cap, out_len),
        Err(_) => IDOCR_ERR_ENCODING,
    }
}

/// SHA-256 哈希，输出小写十六进制字符串
#[no_mangle]
pub extern "C" fn idocr_sha256_hex(
    data: *const c_char,
    out_hex: *mut c_char,
    out_cap: c_ulong,
    out_len: *mut c_ulong,
) -> c_int {
    if data.is_null() || out_hex.is_null() || out_len.is_null() {
        return IDOCR_ERR_NULL_PTR;
    }

    let data = try_str!(data);
    write_out_str(&signer::sha256_hex(data), out_hex, out_cap, out_len)
}

/// Base64 编码
#[no_mangle]
pub extern "C" fn idocr_base64_encode(
    data: *const c_uchar,
    data_len: c_ulong,
    out_str: *mut c_char,
    out_cap: c_ulong,
    out_len: *mut c_ulong,
) -> c_int {
    if data.is_null() || out_str.is_null() || out_len.is_null() {
        return IDOCR_ERR_NULL_PTR;
    }

    let data_slice = unsafe { std::slice::from_raw_parts(data, data_len as usize) };
    write_out_str(&signer::base64_encode(data_slice), out_str, out_cap, out_len)
}

/// Base64 解码
#[no_mangle]
pub extern "C" fn idocr_base64_decode(
    text: *const c_char,
    out_data: *mut c_uchar,
    out_cap: c_ulong,
    out_len: *mut c_ulong,
) -> c_int {
    if text.is_null() || out_data.is_null() || out_len.is_null() {
        return IDOCR_ERR_NULL_PTR;
    }

    let text = try_str!(text);

    match signer::base64_decode(text) {
        Ok(data) => {
            if data.len() > out_cap as usize {
                return IDOCR_ERR_BUFFER_TOO_SMALL;
            }
            unsafe {
                ptr::copy_nonoverlapping(data.as_ptr(), out_data, data.len());
                *out_len = data.len() as c_ulong;
            }
            IDOCR_OK
        }
        Err(_) => IDOCR_ERR_ENCODING,
    }
}
