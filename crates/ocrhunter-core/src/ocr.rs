//! OCR 号码的生成与还原（校验引擎）
//!
//! 号码结构（自左向右）：业务号码 + 填充 + [长度位] + 校验位。
//! 长度位取“含校验位在内的全串长度 mod 10”；校验位为加权 mod-10。
use std::fmt;

use crate::checksum;
use crate::error::OcrError;
use crate::options::OcrOptions;

/// OCR 号码总长度上限（Bankgirot 规范，含长度/校验位）
pub const MAX_LENGTH: usize = 25;

/// 由业务号码生成 OCR 号码
/// - `number` 兼容数字串与非负整数（经 Display 归一化）
/// - pad 参与校验计算，必须同为纯数字
pub fn generate<N: fmt::Display>(number: N, opts: &OcrOptions) -> Result<String, OcrError> {
    let number = number.to_string();
    if !is_digits(&number) {
        return Err(OcrError::MustBeNumeric);
    }
    if !opts.pad.is_empty() && !is_digits(&opts.pad) {
        return Err(OcrError::MustBeNumeric);
    }

    let mut out = number;
    out.push_str(&opts.pad);

    let total = out.len() + usize::from(opts.length_digit) + 1;
    if total > MAX_LENGTH {
        return Err(OcrError::Overlong);
    }
    if opts.length_digit {
        out.push(char::from(b'0' + (total % 10) as u8));
    }
    out.push(char::from(b'0' + checksum::check_digit(out.as_bytes())));
    Ok(out)
}

/// 校验 OCR 号码并剥离校验位、长度位与填充，返回业务号码
/// 校验顺序固定：数字 → 长度下限 → 校验位 → 长度位 → 填充
pub fn verify_and_strip<N: fmt::Display>(ocr: N, opts: &OcrOptions) -> Result<String, OcrError> {
    let ocr = ocr.to_string();
    if !is_digits(&ocr) {
        return Err(OcrError::MustBeNumeric);
    }
    let end = verify_digits(ocr.as_bytes(), opts)?;
    Ok(ocr[..end].to_string())
}

/// 在数字字节切片上执行校验，返回业务号码的结束下标
/// - 扫描器对每个候选窗口直接复用本函数，避免逐候选分配字符串
pub(crate) fn verify_digits(digits: &[u8], opts: &OcrOptions) -> Result<usize, OcrError> {
    // 最少 1 位业务号码 + [长度位] + 校验位
    let min_len = 2 + usize::from(opts.length_digit);
    if digits.len() < min_len {
        return Err(OcrError::TooShort);
    }

    let body = &digits[..digits.len() - 1];
    if checksum::check_digit(body) != digits[digits.len() - 1] - b'0' {
        return Err(OcrError::BadChecksum);
    }

    let mut end = digits.len() - 1;
    if opts.length_digit {
        // 长度位 = 全串（含校验位）长度 mod 10
        if digits[end - 1] - b'0' != (digits.len() % 10) as u8 {
            return Err(OcrError::BadLengthDigit);
        }
        end -= 1;
    }
    if !opts.pad.is_empty() {
        let pad = opts.pad.as_bytes();
        if end < pad.len() || &digits[end - pad.len()..end] != pad {
            return Err(OcrError::BadPadding);
        }
        end -= pad.len();
    }
    Ok(end)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
