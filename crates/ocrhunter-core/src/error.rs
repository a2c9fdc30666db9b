//! 错误类型（闭合枚举，调用方按 kind 分支）
use thiserror::Error;

/// OCR 生成/校验的失败种类
/// - 全部为确定性校验失败，不含瞬态错误，调用方无需重试
/// - 扫描器将任何一种失败视为“丢弃该候选”，自身不报错
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OcrError {
    /// 归一化后仍含非数字字符（空串同样拒绝）
    #[error("input must be numeric")]
    MustBeNumeric,
    /// 生成结果超过 25 位上限
    #[error("generated OCR exceeds 25 digits")]
    Overlong,
    /// 位数不足以容纳校验位（以及长度位）
    #[error("OCR too short to carry its check digits")]
    TooShort,
    /// 重算校验位与末位不符
    #[error("bad check digit")]
    BadChecksum,
    /// 长度位与全串长度 mod 10 不符
    #[error("bad length digit")]
    BadLengthDigit,
    /// 尾部填充与要求的字面数字串不符
    #[error("bad padding")]
    BadPadding,
}
