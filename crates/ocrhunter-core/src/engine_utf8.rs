//! UTF-8 字符串扫描引擎
use anyhow::Result;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::findings::FindingPublic as Finding;
use crate::matcher::{digit_stream_str, scan_stream};
use crate::options::MatchOptions;

/// 按“UTF-8 字符串”方式扫描单个文件
/// - 与 Bytes 引擎共用同一匹配器；非法 UTF-8 文件在此报错，由调用方跳过
pub(crate) fn scan_file_utf8(path: &Path, opts: &MatchOptions) -> Result<(Vec<Finding>, usize)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;

    let stream = digit_stream_str(&buf);
    let mut seen = HashSet::new();
    Ok(scan_stream(&stream, opts, &mut seen, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn scans_utf8_text() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all("fakturanr 1230, öre 4564".as_bytes()).unwrap();
        let (findings, _) = scan_file_utf8(f.path(), &MatchOptions::default()).unwrap();
        let values: Vec<&str> = findings.iter().map(|f| f.value.as_str()).collect();
        assert!(values.contains(&"1230"));
        assert!(values.contains(&"4564"));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\xff\xfe1230").unwrap();
        assert!(scan_file_utf8(f.path(), &MatchOptions::default()).is_err());
    }
}
