//! 腾讯云 OCR 身份证识别 CLI 工具

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};
use idcard_ocr_core::client::{ACTION, CONTENT_TYPE, HOST, SERVICE, VERSION};
use idcard_ocr_core::signer::{self, base64_encode};
use idcard_ocr_core::{CardSide, Credentials, IdentifyResult, OcrClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idcard-ocr")]
#[command(about = "腾讯云身份证识别客户端工具", long_about = None)]
struct Cli {
    /// 地域，如 ap-guangzhou，传空串表示不发送 X-TC-Region
    #[arg(short, long, default_value = "ap-guangzhou")]
    region: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 识别身份证图片
    Identify {
        /// 图片文件路径（JPEG，调用前请自行压缩到合适大小）
        #[arg(short, long)]
        image: PathBuf,
        /// 卡面：front / back，不填代表自动判断
        #[arg(short, long)]
        card_side: Option<String>,
        /// 识别结果 JSON 输出路径
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 离线计算签名（调试用）
    Sign {
        /// 请求体 JSON
        #[arg(short, long, default_value = "{}")]
        payload: String,
        /// 秒级时间戳，不填使用当前时间
        #[arg(short, long)]
        timestamp: Option<i64>,
    },
    /// 将文件编码为 Base64 文本
    Encode {
        /// 输入文件路径
        #[arg(short, long)]
        input: PathBuf,
        /// 输出路径，不填则打印到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Identify {
            image,
            card_side,
            output,
        } => {
            do_identify(&cli.region, &image, card_side.as_deref(), output.as_ref()).await?;
        }
        Commands::Sign { payload, timestamp } => {
            do_sign(&payload, timestamp)?;
        }
        Commands::Encode { input, output } => {
            do_encode(&input, output.as_ref())?;
        }
    }

    Ok(())
}

/// 凭证从环境变量读取，不在命令行与本地文件中保存
fn load_credentials() -> anyhow::Result<Credentials> {
    let secret_id = std::env::var("TENCENT_SECRET_ID")
        .context("TENCENT_SECRET_ID 未设置，请在环境变量中配置凭证")?;
    let secret_key = std::env::var("TENCENT_SECRET_KEY")
        .context("TENCENT_SECRET_KEY 未设置，请在环境变量中配置凭证")?;
    Ok(Credentials::new(secret_id, secret_key))
}

async fn do_identify(
    region: &str,
    image: &PathBuf,
    card_side: Option<&str>,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let credentials = load_credentials()?;
    let card_side = card_side
        .map(|side| side.parse::<CardSide>())
        .transpose()?;

    let bytes = std::fs::read(image).with_context(|| format!("读取图片失败: {:?}", image))?;
    println!("图片大小: {} 字节", bytes.len());
    let image_base64 = base64_encode(&bytes);

    let client = OcrClient::with_region(region)?;
    let result = client
        .id_card_ocr(&credentials, &image_base64, card_side)
        .await;

    print_result(&result);

    if let Some(output_path) = output {
        std::fs::write(output_path, serde_json::to_string_pretty(&result)?)?;
        println!("识别结果已保存到: {:?}", output_path);
    }

    if !result.is_success() {
        anyhow::bail!("识别失败: {}", result.error_msg);
    }
    Ok(())
}

fn print_result(result: &IdentifyResult) {
    if result.is_success() {
        println!("识别成功");
        println!("姓名: {}", result.name);
        println!("性别: {}", result.sex);
        println!("民族: {}", result.nation);
        println!("出生: {}", result.birth);
        println!("住址: {}", result.address);
        println!("公民身份号码: {}", result.id_num);
        if !result.authority.is_empty() {
            println!("签发机关: {}", result.authority);
        }
        if !result.valid_date.is_empty() {
            println!("有效期限: {}", result.valid_date);
        }
    } else {
        println!("识别失败: {}", result.error_msg);
    }
    if !result.request_id.is_empty() {
        println!("RequestId: {}", result.request_id);
    }
}

fn do_sign(payload: &str, timestamp: Option<i64>) -> anyhow::Result<()> {
    let credentials = load_credentials()?;
    let timestamp = match timestamp {
        Some(value) => value,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64,
    };

    let sign_result = signer::sign(
        &credentials.secret_id,
        &credentials.secret_key,
        SERVICE,
        HOST,
        ACTION,
        VERSION,
        timestamp,
        payload,
        CONTENT_TYPE,
    )?;

    println!("时间戳: {}", sign_result.timestamp);
    println!("凭证范围: {}", sign_result.credential_scope);
    println!("规范请求串:\n{}\n", sign_result.canonical_request);
    println!("待签名字符串:\n{}\n", sign_result.string_to_sign);
    println!("签名: {}", sign_result.signature);
    println!("Authorization: {}", sign_result.authorization);
    Ok(())
}

fn do_encode(input: &PathBuf, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("读取文件失败: {:?}", input))?;
    let encoded = base64_encode(&bytes);

    if let Some(output_path) = output {
        std::fs::write(output_path, &encoded)?;
        println!("Base64 已保存到: {:?}", output_path);
    } else {
        println!("{}", encoded);
    }
    Ok(())
}
