//! 腾讯云 OCR 身份证识别客户端

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::response::parse_identify_result;
use crate::signer;
use crate::types::{CardSide, Credentials, IdCardOcrRequest, IdentifyResult};

// OCR 服务固定参数
pub const HOST: &str = "ocr.tencentcloudapi.com";
pub const SERVICE: &str = "ocr";
pub const ACTION: &str = "IDCardOCR";
pub const VERSION: &str = "2018-11-19";
pub const ENDPOINT: &str = "https://ocr.tencentcloudapi.com/";

/// 本项目统一使用 application/json（与签名计算保持一致）
pub const CONTENT_TYPE: &str = "application/json";

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 请求地址
    pub endpoint: String,
    /// Host 头，必须与签名计算使用同一个值
    pub host: String,
    /// 地域，如 ap-guangzhou，空串表示不发送 X-TC-Region
    pub region: String,
    /// X-TC-Language 头
    pub language: String,
    /// 连接超时（秒）
    pub connect_timeout: u64,
    /// 读取超时（秒）
    pub read_timeout: u64,
    /// 是否验证 TLS 证书
    pub verify_tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            host: HOST.to_string(),
            region: String::new(),
            language: "zh-CN".to_string(),
            connect_timeout: 15,
            read_timeout: 20,
            verify_tls: true,
        }
    }
}

/// 身份证识别客户端
///
/// 每次调用独立完成签名与请求，无跨调用共享状态，可在任意线程并发使用。
pub struct OcrClient {
    config: ClientConfig,
    http_client: Client,
}

impl OcrClient {
    /// 创建新的客户端实例
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.read_timeout))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// 使用默认配置与指定地域创建客户端
    pub fn with_region(region: &str) -> Result<Self> {
        let mut config = ClientConfig::default();
        config.region = region.to_string();
        Self::new(config)
    }

    /// 调用身份证识别接口
    ///
    /// 所有失败路径都收敛为 error_code 非 0 的 IdentifyResult，不向调用方抛错。
    ///
    /// * `image_base64` - 图片 Base64（不要包含 data:image/... 前缀）
    /// * `card_side` - 卡面，None 代表自动判断
    pub async fn id_card_ocr(
        &self,
        credentials: &Credentials,
        image_base64: &str,
        card_side: Option<CardSide>,
    ) -> IdentifyResult {
        match self
            .try_id_card_ocr(credentials, image_base64, card_side)
            .await
        {
            Ok(result) => result,
            Err(error) => IdentifyResult::from_error(&error),
        }
    }

    /// 同 id_card_ocr，但以 Result 形式暴露错误种类
    pub async fn try_id_card_ocr(
        &self,
        credentials: &Credentials,
        image_base64: &str,
        card_side: Option<CardSide>,
    ) -> Result<IdentifyResult> {
        if credentials.secret_id.trim().is_empty() || credentials.secret_key.trim().is_empty() {
            return Err(Error::InvalidParam(
                "secret_id / secret_key must not be empty".to_string(),
            ));
        }
        if image_base64.is_empty() {
            return Err(Error::InvalidParam(
                "image_base64 must not be empty".to_string(),
            ));
        }

        // 时间戳只取一次，签名与 X-TC-Timestamp 头必须使用同一个值
        let timestamp = Utc::now().timestamp();

        // payload 与实际发送的 body 必须逐字节一致
        let payload = IdCardOcrRequest::new(image_base64, card_side).to_payload()?;

        let sign_result = signer::sign(
            &credentials.secret_id,
            &credentials.secret_key,
            SERVICE,
            &self.config.host,
            ACTION,
            VERSION,
            timestamp,
            &payload,
            CONTENT_TYPE,
        )?;

        info!(action = ACTION, region = %self.config.region, "sending OCR request");

        let mut request = self
            .http_client
            .post(&self.config.endpoint)
            .header("Authorization", sign_result.authorization.as_str())
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", self.config.host.as_str())
            .header("X-TC-Action", ACTION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", VERSION);

        let region = self.config.region.trim();
        if !region.is_empty() {
            request = request.header("X-TC-Region", region);
        }
        if !self.config.language.is_empty() {
            request = request.header("X-TC-Language", self.config.language.as_str());
        }

        let response = request.body(payload).send().await.map_err(|e| {
            Error::Network(format!("request to {} failed: {}", self.config.endpoint, e))
        })?;

        // 非 2xx 同样带有可解析的错误报文，状态码只作提示，不决定成败
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read response body: {}", e)))?;

        debug!(status = %status, bytes = body.len(), "response received");

        let mut result = parse_identify_result(&body);
        result.raw_json = body;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, ENDPOINT);
        assert_eq!(config.host, HOST);
        assert!(config.region.is_empty());
        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.connect_timeout, 15);
        assert_eq!(config.read_timeout, 20);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_client_creation() {
        let client = OcrClient::with_region("ap-guangzhou");
        assert!(client.is_ok());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let client = OcrClient::new(ClientConfig::default()).unwrap();
        let credentials = Credentials::new("", "");
        let result =
            tokio_test::block_on(client.try_id_card_ocr(&credentials, "aGVsbG8=", None));
        assert!(matches!(result, Err(Error::InvalidParam(_))));
    }

    #[test]
    fn test_empty_image_rejected() {
        let client = OcrClient::new(ClientConfig::default()).unwrap();
        let credentials = Credentials::new("AKIDEXAMPLE", "SecretKey");
        let result = tokio_test::block_on(client.try_id_card_ocr(&credentials, "", None));
        assert!(matches!(result, Err(Error::InvalidParam(_))));
    }
}
