//! Bankgirot OCR 付款参考号：生成、校验与文本扫描
//!
//! 设计要点：
//! - 校验引擎与扫描器均为纯函数：输入 → 输出或拒绝，无共享状态，可随意并发调用。
//! - 号码按数字逐位处理（可达 25 位，超出 u64 范围），校验位为加权 mod-10。
//! - 扫描器剔除非数字后在单一数字流上开全量窗口：重叠候选全部尝试，完备性优先；
//!   按 value 去重，单个候选的校验失败静默丢弃。
//! - 文件层提供 Bytes/Utf8 双引擎与并行调度，输出为稳定顺序的流式 JSON 数组。

mod checksum;
mod error;
mod options;
mod types;
mod findings;
mod ocr;
mod matcher;
mod profile;
mod engine_bytes;
mod engine_utf8;
mod scan;

// 对外 API
pub use error::OcrError;
pub use matcher::find_all_in_string;
pub use ocr::{generate, verify_and_strip, MAX_LENGTH};
pub use options::{MatchOptions, OcrOptions, ScanEngine, ScanOptions, ScanStats};
pub use scan::scan_and_write;
pub use types::OutputItem;
