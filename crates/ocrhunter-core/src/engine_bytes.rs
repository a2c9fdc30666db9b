//! 字节级扫描引擎（小文件整读 + 大文件分块）
use anyhow::Result;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::findings::FindingPublic as Finding;
use crate::matcher::{digit_stream_bytes, scan_stream, DigitStream};
use crate::options::MatchOptions;

/// 小文件阈值（字节）。小文件整读，超出则分块扫描。
pub(crate) const SMALL_FILE_MAX: usize = 1 * 1024 * 1024; // 1 MiB
/// 分块大小（字节）
pub(crate) const CHUNK_SIZE: usize = 4 * 1024 * 1024; // 4 MiB

/// 整读扫描单个文件（Bytes 引擎）
/// - 全文件数字串接为单一数字流后开窗
/// - 二进制文件直接跳过（NUL 或可打印占比过低）
pub(crate) fn scan_file_bytes(path: &Path, opts: &MatchOptions) -> Result<(Vec<Finding>, usize)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;

    if is_probably_binary(&buf) {
        return Ok((Vec::new(), 0));
    }

    let stream = digit_stream_bytes(&buf);
    let mut seen = HashSet::new();
    Ok(scan_stream(&stream, opts, &mut seen, 0))
}

/// 分块扫描大文件（Bytes 引擎）
/// - 跨块保留数字流尾部 max_length-1 位（含原始偏移），跨块窗口恰好生成一次
/// - seen 贯穿整个文件，块间同值不会重复输出
pub(crate) fn scan_file_bytes_chunked(path: &Path, opts: &MatchOptions) -> Result<(Vec<Finding>, usize)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut findings: Vec<Finding> = Vec::new();
    let mut candidates = 0usize;
    let mut seen: HashSet<String> = HashSet::new();

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut carry = DigitStream::empty();
    let mut file_offset: usize = 0;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 { break; }

        // 对首个块做二进制判定；若疑似二进制，跳过整个文件
        if file_offset == 0 {
            // 只抽样前 8KiB，避免超大 chunk 误判
            let sample_len = n.min(8192);
            if is_probably_binary(&buf[..sample_len]) {
                return Ok((Vec::new(), 0));
            }
        }

        // 当前块的数字流，偏移映射回文件全局偏移后接到 carry 之后
        let chunk = digit_stream_bytes(&buf[..n]);
        let carry_len = carry.digits.len();
        let mut stream = carry;
        stream.digits.extend_from_slice(&chunk.digits);
        stream.offsets.extend(chunk.offsets.iter().map(|o| o + file_offset));

        // 只生成“终点落在新数据内”的窗口；落在 carry 内的上一轮已生成
        let (mut part, c) = scan_stream(&stream, opts, &mut seen, carry_len);
        candidates += c;
        findings.append(&mut part);

        // 更新 carry：保留数字流尾部 max_length-1 位
        let keep = opts.max_length.saturating_sub(1).min(stream.digits.len());
        let cut = stream.digits.len() - keep;
        stream.digits.drain(..cut);
        stream.offsets.drain(..cut);
        carry = stream;

        file_offset += n;
    }

    Ok((findings, candidates))
}

/// 判定缓冲区是否“明显是二进制”
/// 策略（保守，尽量不误杀文本）：
/// - 只要包含任何 NUL 字节（0x00）即认为二进制；
/// - 否则计算可打印 ASCII 比例（含 tab/CR/LF），低于 25% 则认为二进制。
fn is_probably_binary(buf: &[u8]) -> bool {
    if buf.is_empty() { return false; }
    if buf.iter().any(|&b| b == 0) { return true; }
    let printable = buf.iter().filter(|&&b| matches!(b, 0x09 | 0x0A | 0x0D) || (0x20..=0x7E).contains(&b)).count();
    let ratio = printable as f32 / (buf.len() as f32);
    ratio < 0.25
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tmp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f
    }

    #[test]
    fn whole_read_finds_values() {
        let f = tmp_file(b"faktura 1230 belopp 4564\n");
        let (findings, candidates) = scan_file_bytes(f.path(), &MatchOptions::default()).unwrap();
        let values: Vec<&str> = findings.iter().map(|f| f.value.as_str()).collect();
        assert!(values.contains(&"1230"));
        assert!(values.contains(&"4564"));
        assert!(candidates > 0);
    }

    #[test]
    fn skips_binary_files() {
        let f = tmp_file(b"\x00\x01\x021230");
        let (findings, candidates) = scan_file_bytes(f.path(), &MatchOptions::default()).unwrap();
        assert!(findings.is_empty());
        assert_eq!(candidates, 0);
    }

    #[test]
    fn chunked_agrees_with_whole_read() {
        // 数据量不足一个分块，但两条路径的结果与候选计数必须一致
        let f = tmp_file(b"12\n30\n4564 ref 123456789023");
        let whole = scan_file_bytes(f.path(), &MatchOptions::default()).unwrap();
        let chunked = scan_file_bytes_chunked(f.path(), &MatchOptions::default()).unwrap();
        assert_eq!(whole.0, chunked.0);
        assert_eq!(whole.1, chunked.1);
    }

    #[test]
    fn finding_offsets_point_into_source() {
        let f = tmp_file(b"xx 1230");
        let (findings, _) = scan_file_bytes(f.path(), &MatchOptions::default()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].value, "1230");
        assert_eq!(findings[0].start_offset, 3);
    }
}
