//! 扫描主流程与并行调度
use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine_bytes::{scan_file_bytes, scan_file_bytes_chunked, SMALL_FILE_MAX};
use crate::engine_utf8::scan_file_utf8;
use crate::findings::{sort_findings_stable, FindingPublic as Finding};
use crate::options::{MatchOptions, ScanEngine, ScanOptions, ScanStats};
use crate::profile::apply_profile;
use crate::types::OutputItem;

/// 扫描目录并将结果以 JSON 数组流式写入 `out`
/// 稳定性保证：
/// - 文件级：先收集文件并按路径排序，确保输出顺序可复现
/// - 文件内：命中项按 (start_offset 升序, value 长度降序, value 字典序升序) 排序
pub fn scan_and_write(input_dir: &Path, out: &mut dyn Write, opts: &ScanOptions) -> Result<ScanStats> {
    // 若指定 profile 文件，则在调用方参数之上按键套用覆盖项
    let matching = match &opts.profile_path {
        Some(p) => apply_profile(p, &opts.matching)?,
        None => opts.matching.clone(),
    };

    let mut files: Vec<PathBuf> = vec![];
    // 递归遍历输入目录，仅收集普通文件
    for entry in WalkDir::new(input_dir).min_depth(1) {
        let entry = match entry { Ok(e) => e, Err(_) => continue };
        if entry.file_type().is_file() { files.push(entry.into_path()); }
    }
    // 按完整路径排序，确保输出顺序稳定
    files.sort();

    // 决策：若为 Bytes 引擎且线程数>1，则走并行调度；否则使用串行扫描
    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    let use_parallel = matches!(opts.engine, ScanEngine::Bytes) && threads > 1;

    if use_parallel {
        return scan_and_write_parallel_bytes(input_dir, &files, out, opts, &matching, threads);
    }

    // 串行路径（Utf8 引擎亦在此路径执行）
    let mut stats = ScanStats::default();
    write!(out, "[")?;
    let mut first = true;
    for path in &files {
        if let Some(max) = opts.max_file_size { if let Ok(md) = std::fs::metadata(path) { if md.len() > max { continue; } } }
        match scan_file_dispatch(path, opts.engine, &matching) {
            Ok((mut findings, candidates)) => {
                sort_findings_stable(&mut findings);
                write_file_findings(out, input_dir, path, &findings, candidates, true, &mut stats, &mut first)?;
            }
            Err(_) => continue,
        }
    }
    write!(out, "]")?;
    Ok(stats)
}

/// 单文件扫描的引擎分派（Bytes 引擎按大小选择整读或分块）
fn scan_file_dispatch(path: &Path, engine: ScanEngine, matching: &MatchOptions) -> Result<(Vec<Finding>, usize)> {
    match engine {
        ScanEngine::Utf8 => scan_file_utf8(path, matching),
        ScanEngine::Bytes => {
            let md = std::fs::metadata(path)?;
            if md.len() <= SMALL_FILE_MAX as u64 {
                scan_file_bytes(path, matching)
            } else {
                scan_file_bytes_chunked(path, matching)
            }
        }
    }
}

/// 并行调度（Bytes 引擎）：
/// - 建索引后使用 Rayon 线程池并行扫描
/// - 单线程 Writer 按 idx 重排并流式写 JSON，保证与串行路径输出一致
fn scan_and_write_parallel_bytes(
    input_dir: &Path,
    files: &[PathBuf],
    out: &mut dyn Write,
    opts: &ScanOptions,
    matching: &MatchOptions,
    threads: usize,
) -> Result<ScanStats> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;

    let mut stats = ScanStats::default();
    write!(out, "[")?;
    let mut first = true;

    // 通道用于 worker → writer 传递结果
    type Msg = (usize /*idx*/, Vec<Finding> /*findings*/, usize /*candidates*/, bool /*scanned*/);
    let (tx, rx) = channel::bounded::<Msg>(256);

    // 为防止 &mut out 的跨线程所有权问题，Writer 保持在当前线程；
    // 扫描在后台线程内创建 Rayon 线程池并执行
    let max_file_size = opts.max_file_size;
    let matching = matching.clone();
    let files_vec: Vec<(usize, PathBuf)> = files
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.clone()))
        .collect();

    let scan_thread = std::thread::spawn(move || {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("build rayon pool");
        pool.install(|| {
            files_vec.par_iter().for_each(|(idx, path)| {
                // 大小过滤（与串行一致）
                if let Some(max) = max_file_size { if let Ok(md) = std::fs::metadata(path) { if md.len() > max { let _ = tx.send((*idx, Vec::new(), 0, false)); return; } } }

                let res = scan_file_dispatch(path, ScanEngine::Bytes, &matching);
                match res {
                    Ok((mut findings, candidates)) => {
                        // 文件内稳定排序在 worker 完成，writer 只做重排与输出
                        sort_findings_stable(&mut findings);
                        let _ = tx.send((*idx, findings, candidates, true));
                    }
                    Err(_) => { let _ = tx.send((*idx, Vec::new(), 0, false)); }
                }
            });
        });
        // 结束后 Sender 全部被丢弃，Receiver 将收到关闭信号
    });

    // Writer：维护 next_idx 与缓存，按序输出
    use std::collections::BTreeMap;
    let mut next_idx: usize = 0;
    let mut buffer: BTreeMap<usize, (Vec<Finding>, usize, bool)> = BTreeMap::new();

    while let Ok((idx, findings, candidates, scanned)) = rx.recv() {
        buffer.insert(idx, (findings, candidates, scanned));
        // 尝试从 next_idx 开始顺序冲刷
        while let Some((findings, candidates, scanned)) = buffer.remove(&next_idx) {
            write_file_findings(out, input_dir, &files[next_idx], &findings, candidates, scanned, &mut stats, &mut first)?;
            next_idx += 1;
        }
    }

    // 等待扫描线程结束
    let _ = scan_thread.join();

    // 最终冲刷残余（理论上缓冲应已清空）
    while let Some((findings, candidates, scanned)) = buffer.remove(&next_idx) {
        write_file_findings(out, input_dir, &files[next_idx], &findings, candidates, scanned, &mut stats, &mut first)?;
        next_idx += 1;
    }

    write!(out, "]")?;
    Ok(stats)
}

/// 输出单个文件的命中项并累加统计
fn write_file_findings(
    out: &mut dyn Write,
    input_dir: &Path,
    path: &Path,
    findings: &[Finding],
    candidates: usize,
    scanned: bool,
    stats: &mut ScanStats,
    first: &mut bool,
) -> Result<()> {
    if scanned {
        stats.files_scanned += 1;
        stats.candidates_total += candidates;
    }
    let file = display_name(input_dir, path);
    for f in findings {
        stats.outputs_written += 1;
        if !*first { write!(out, ",")?; } else { *first = false; }
        let item = OutputItem { file: &file, value: &f.value };
        serde_json::to_writer(&mut *out, &item)?;
    }
    Ok(())
}

/// 输出用文件名：相对 input_dir 的路径（剥离失败时退回完整路径）
fn display_name(input_dir: &Path, path: &Path) -> String {
    path.strip_prefix(input_dir).unwrap_or(path).to_string_lossy().to_string()
}
