//! 候选窗口匹配器（数字流 + 滑动窗口）
//!
//! 设计要点：
//! - 全文剔除非数字字符，所有数字串接为单一数字流后再开窗：真实文本常把
//!   参考号与金额、标签、换行挤在一起，跨段候选同样要覆盖。
//! - 窗口为数字流上所有长度在 [min_length, max_length] 内的连续子串，含相互
//!   重叠的候选；完备性是正确性要求，不做提前剪枝。
//! - 候选逐个经校验引擎过滤，失败即丢弃；按 value 去重（HashSet），扫描本身
//!   永不报错。
use std::collections::HashSet;
use std::sync::OnceLock;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use crate::findings::FindingPublic as Finding;
use crate::ocr::verify_digits;
use crate::options::MatchOptions;

/// 数字流：串接后的数字字节 + 每位数字在原文中的字节偏移（两者等长）
pub(crate) struct DigitStream {
    pub(crate) digits: Vec<u8>,
    pub(crate) offsets: Vec<usize>,
}

impl DigitStream {
    pub(crate) fn empty() -> Self {
        Self { digits: Vec::new(), offsets: Vec::new() }
    }
}

/// 从字节缓冲提取数字流（Bytes 引擎）
pub(crate) fn digit_stream_bytes(buf: &[u8]) -> DigitStream {
    static RE: OnceLock<BytesRegex> = OnceLock::new();
    let re = RE.get_or_init(|| BytesRegex::new(r"[0-9]+").expect("digit run pattern"));

    let mut stream = DigitStream::empty();
    for m in re.find_iter(buf) {
        stream.digits.extend_from_slice(&buf[m.start()..m.end()]);
        stream.offsets.extend(m.start()..m.end());
    }
    stream
}

/// 从字符串提取数字流（Utf8 引擎）
/// - 仅匹配 ASCII 数字；其他数字系统（如阿拉伯-印度数字）一律视作分隔符
pub(crate) fn digit_stream_str(text: &str) -> DigitStream {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[0-9]+").expect("digit run pattern"));

    let mut stream = DigitStream::empty();
    for m in re.find_iter(text) {
        stream.digits.extend_from_slice(&text.as_bytes()[m.start()..m.end()]);
        stream.offsets.extend(m.start()..m.end());
    }
    stream
}

/// 在数字流上开窗并校验，返回（命中项, 候选计数）
/// - `seen` 由调用方持有：分块扫描时跨块去重
/// - `skip_end_below`：终点下标不超过该值的窗口已在上一块生成过，直接跳过
pub(crate) fn scan_stream(
    stream: &DigitStream,
    opts: &MatchOptions,
    seen: &mut HashSet<String>,
    skip_end_below: usize,
) -> (Vec<Finding>, usize) {
    let digits = &stream.digits;
    let min_len = opts.min_length.max(1);
    let mut findings: Vec<Finding> = Vec::new();
    let mut candidates = 0usize;

    for start in 0..digits.len() {
        let lo = start + min_len;
        if lo > digits.len() {
            break;
        }
        let hi = (start + opts.max_length).min(digits.len());
        for end in lo..=hi {
            if end <= skip_end_below {
                continue;
            }
            candidates += 1;
            let window = &digits[start..end];
            if verify_digits(window, &opts.ocr).is_ok() {
                let value = String::from_utf8_lossy(window).to_string();
                if seen.insert(value.clone()) {
                    findings.push(Finding { value, start_offset: stream.offsets[start] });
                }
            }
        }
    }

    (findings, candidates)
}

/// 单次扫描整个数字流（文件整读与纯文本路径共用）
pub(crate) fn scan_digits(stream: &DigitStream, opts: &MatchOptions) -> (Vec<Finding>, usize) {
    let mut seen = HashSet::new();
    scan_stream(stream, opts, &mut seen, 0)
}

/// 在自由文本中找出全部语法合法的 OCR 号码
/// - 去重后按首次发现顺序返回（流内偏移升序，再窗口长度升序）
/// - 永不报错；无命中时返回空列表
pub fn find_all_in_string(text: &str, opts: &MatchOptions) -> Vec<String> {
    let stream = digit_stream_str(text);
    let (findings, _candidates) = scan_digits(&stream, opts);
    findings.into_iter().map(|f| f.value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OcrOptions;

    #[test]
    fn digit_stream_keeps_source_offsets() {
        let s = digit_stream_str("a12 b34");
        assert_eq!(s.digits, b"1234");
        assert_eq!(s.offsets, vec![1, 2, 5, 6]);
    }

    #[test]
    fn non_ascii_digits_are_separators() {
        let s = digit_stream_str("١٢٣ 1230");
        assert_eq!(s.digits, b"1230");
    }

    #[test]
    fn finds_valid_numbers_and_skips_bad_checksums() {
        let found = find_all_in_string("1230 1234 4564", &MatchOptions::default());
        assert!(found.contains(&"1230".to_string()));
        assert!(found.contains(&"4564".to_string()));
        assert!(!found.contains(&"1234".to_string()));
    }

    #[test]
    fn candidates_span_run_boundaries() {
        // 分隔符剔除后数字串接，跨行候选同样生成
        let found = find_all_in_string("12\n30\n4564", &MatchOptions::default());
        assert!(found.contains(&"1230".to_string()));
        assert!(found.contains(&"4564".to_string()));
        assert!(found.contains(&"12304564".to_string()));
    }

    #[test]
    fn min_length_bounds_candidates() {
        let found = find_all_in_string("12304564", &MatchOptions::default());
        assert!(found.contains(&"1230".to_string()));
        assert!(found.contains(&"12304564".to_string()));

        let opts = MatchOptions { min_length: 6, ..MatchOptions::default() };
        let found = find_all_in_string("12304564", &opts);
        assert!(!found.contains(&"1230".to_string()));
        assert!(found.contains(&"12304564".to_string()));
    }

    #[test]
    fn short_text_yields_nothing_under_default_bounds() {
        // 唯一的 4 位窗口 "1234" 校验失败
        assert!(find_all_in_string("1234", &MatchOptions::default()).is_empty());

        let opts = MatchOptions { min_length: 2, ..MatchOptions::default() };
        assert!(find_all_in_string("1234", &opts).contains(&"34".to_string()));
    }

    #[test]
    fn deduplicates_overlapping_windows() {
        // 两处 "1230" 串接为 "12301230"，多个窗口产生同一值，只输出一次
        let found = find_all_in_string("1230 xx 1230", &MatchOptions::default());
        assert_eq!(found.iter().filter(|v| v.as_str() == "1230").count(), 1);
    }

    #[test]
    fn empty_and_digitless_text() {
        assert!(find_all_in_string("", &MatchOptions::default()).is_empty());
        assert!(find_all_in_string("no digits here", &MatchOptions::default()).is_empty());
    }

    #[test]
    fn honors_length_digit_and_pad_options() {
        let opts = MatchOptions {
            ocr: OcrOptions { length_digit: true, pad: String::new() },
            min_length: 12,
            ..MatchOptions::default()
        };
        let found = find_all_in_string("ref: 123456789023", &opts);
        assert!(found.contains(&"123456789023".to_string()));
    }

    #[test]
    fn chunk_carry_covers_boundary_windows() {
        // 一次性扫描作为基准
        let opts = MatchOptions::default();
        let full = digit_stream_str("12304564");
        let (expected, _) = scan_digits(&full, &opts);
        let expected: Vec<String> = expected.into_iter().map(|f| f.value).collect();

        // 模拟分块：前块 "123045"，后块 "64"；后块在 carry 之后续接数字流，
        // 并跳过终点落在 carry 内的窗口
        let mut seen = std::collections::HashSet::new();
        let chunk1 = digit_stream_str("123045");
        let (part1, _) = scan_stream(&chunk1, &opts, &mut seen, 0);
        let carry_len = chunk1.digits.len();

        let chunk2 = digit_stream_str("64");
        let mut merged = chunk1;
        merged.digits.extend_from_slice(&chunk2.digits);
        merged.offsets.extend(chunk2.offsets.iter().map(|o| o + carry_len));
        let (part2, _) = scan_stream(&merged, &opts, &mut seen, carry_len);

        let mut got: Vec<String> = part1.into_iter().chain(part2).map(|f| f.value).collect();
        let mut want = expected;
        got.sort();
        want.sort();
        assert_eq!(got, want);
    }
}
