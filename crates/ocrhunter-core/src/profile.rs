//! 匹配 profile 文件加载（TOML）
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::options::MatchOptions;

/// profile 中的匹配参数（字段均可省略，省略即沿用传入的基准值）
#[derive(Debug, Clone, Default, Deserialize)]
struct ProfileEntry {
    #[serde(default)]
    pub length_digit: Option<bool>,
    #[serde(default)]
    pub pad: Option<String>,
    #[serde(default)]
    pub padding: Option<String>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

/// 顶层 profile 文件结构
#[derive(Debug, Clone, Default, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    pub profile: ProfileEntry,
}

/// 读取 profile 并覆盖到 `base` 上（仅覆盖文件中出现的键）
pub(crate) fn apply_profile(path: &Path, base: &MatchOptions) -> Result<MatchOptions> {
    let txt = std::fs::read_to_string(path)?;
    let parsed: ProfileFile = toml::from_str(&txt)?;
    let p = parsed.profile;

    let mut out = base.clone();
    if let Some(v) = p.length_digit { out.ocr.length_digit = v; }
    // 兼容两种字段名：pad 或 padding（pad 优先）
    if let Some(v) = p.pad.or(p.padding) { out.ocr.pad = v; }
    if let Some(v) = p.min_length { out.min_length = v; }
    if let Some(v) = p.max_length { out.max_length = v; }
    Ok(out)
}
