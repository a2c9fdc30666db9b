//! 选项与统计信息（模块）
use std::path::PathBuf;

/// 校验引擎选项（generate / verify_and_strip 共用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrOptions {
    /// 是否带长度位（校验位之前的一位，取值为全串长度 mod 10）
    pub length_digit: bool,
    /// 固定填充：紧跟业务号码之后、长度/校验位之前的字面数字串；空串表示无填充
    pub pad: String,
}

/// 文本匹配选项（扫描器）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    /// 候选校验所用的引擎选项
    pub ocr: OcrOptions,
    /// 候选 OCR 总长度下限（含长度/校验位）
    pub min_length: usize,
    /// 候选 OCR 总长度上限
    pub max_length: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ocr: OcrOptions::default(),
            min_length: 4,
            max_length: 18,
        }
    }
}

/// 扫描引擎类型
/// - Bytes：基于 `regex::bytes` 的字节级数字流提取，稳健且避免编码问题。
/// - Utf8：基于 `String` 的提取，非法 UTF-8 文件按跳过处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEngine {
    Bytes,
    Utf8,
}

/// 文件扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 文本匹配参数（可被 profile 文件按键覆盖）
    pub matching: MatchOptions,
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
    /// 扫描引擎：Bytes（字节级）或 Utf8（基于字符串）
    pub engine: ScanEngine,
    /// 匹配参数 profile 文件路径（TOML）；None 表示使用内置默认
    pub profile_path: Option<PathBuf>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            matching: MatchOptions::default(),
            max_file_size: None,
            engine: ScanEngine::Bytes,
            profile_path: None,
            threads: None,
        }
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub candidates_total: usize,
    pub outputs_written: usize,
}
