use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ocrhunter_core::{generate, scan_and_write, verify_and_strip};
use ocrhunter_core::{MatchOptions, OcrOptions, ScanEngine, ScanOptions};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "ocrhunter", version, about = "Bankgirot OCR 付款参考号工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描目录中的文本文件并生成 result.json
    Scan {
        /// 输入目录
        #[arg(long)]
        input: PathBuf,

        /// 输出文件（JSON 数组）
        #[arg(long, default_value = "./result.json")]
        output: PathBuf,

        /// 线程数（bytes 引擎启用并行；"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// 最大扫描文件大小（单位字节，例如 5242880 代表 5MB）
        #[arg(long)]
        max_file_size: Option<u64>,

        /// 扫描引擎：bytes 或 utf8（默认 bytes）
        #[arg(long, default_value = "bytes", value_parser = ["bytes", "utf8"])]
        engine: String,

        /// 匹配参数 profile 文件路径（TOML）；省略则使用内置默认
        #[arg(long)]
        profile: Option<PathBuf>,

        /// 候选 OCR 含长度位
        #[arg(long)]
        length_digit: bool,

        /// 固定填充数字串
        #[arg(long, default_value = "")]
        pad: String,

        /// 候选 OCR 总长度下限
        #[arg(long, default_value_t = 4)]
        min_length: usize,

        /// 候选 OCR 总长度上限
        #[arg(long, default_value_t = 18)]
        max_length: usize,
    },
    /// 由业务号码生成 OCR 号码
    Generate {
        /// 业务号码（纯数字）
        number: String,

        /// 附加长度位
        #[arg(long)]
        length_digit: bool,

        /// 固定填充数字串
        #[arg(long, default_value = "")]
        pad: String,
    },
    /// 校验 OCR 号码并还原业务号码
    Verify {
        /// OCR 号码（纯数字）
        ocr: String,

        /// 号码含长度位
        #[arg(long)]
        length_digit: bool,

        /// 固定填充数字串
        #[arg(long, default_value = "")]
        pad: String,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, output, threads, max_file_size, engine, profile, length_digit, pad, min_length, max_length } => {
            info!(?input, ?output, "starting scan");

            // 以缓冲方式打开输出文件，按 JSON 数组流式写入
            let mut out = BufWriter::new(File::create(&output).context("create output file")?);

            // 解析扫描引擎参数
            let engine = match engine.as_str() {
                "utf8" => ScanEngine::Utf8,
                _ => ScanEngine::Bytes,
            };

            let opts = ScanOptions {
                matching: MatchOptions {
                    ocr: OcrOptions { length_digit, pad },
                    min_length,
                    max_length,
                },
                max_file_size,
                engine,
                profile_path: profile,
                threads: parse_threads(&threads),
            };
            let stats = scan_and_write(&input, &mut out, &opts).context("scan and write failed")?;
            out.flush().ok();

            info!(
                files_scanned = stats.files_scanned,
                candidates_total = stats.candidates_total,
                outputs_written = stats.outputs_written,
                "scan finished"
            );
        }
        Commands::Generate { number, length_digit, pad } => {
            let ocr = generate(number.as_str(), &OcrOptions { length_digit, pad })
                .context("generate OCR number")?;
            println!("{}", ocr);
        }
        Commands::Verify { ocr, length_digit, pad } => {
            let payload = verify_and_strip(ocr.as_str(), &OcrOptions { length_digit, pad })
                .context("verify OCR number")?;
            println!("{}", payload);
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}
