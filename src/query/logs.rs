//! 日志时间范围查询
//! 来源：/var/log/devopsfetch.log，行格式 "YYYY-MM-DD HH:MM:SS - message"

use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

use crate::utils::{FetchError, Result};

pub const LOG_FILE: &str = "/var/log/devopsfetch.log";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn display_range(start: &str, end: &str) -> Result<()> {
    for line in query_file(Path::new(LOG_FILE), start, end)? {
        println!("{}", line);
    }
    Ok(())
}

/// 时间参数在任何文件读取之前校验
pub fn query_file(path: &Path, start: &str, end: &str) -> Result<Vec<String>> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;

    let content = fs::read_to_string(path)
        .map_err(|e| FetchError::LogUnavailable(format!("{}: {}", path.display(), e)))?;

    Ok(filter_range(&content, start, end))
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|_| FetchError::InvalidTimeFormat(s.to_string()))
}

/// [start, end] 闭区间过滤；时间戳损坏的行跳过并告警，不中断查询
pub fn filter_range(content: &str, start: NaiveDateTime, end: NaiveDateTime) -> Vec<String> {
    let mut matched = Vec::new();

    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let ts = line.split(" - ").next().unwrap_or("");
        match NaiveDateTime::parse_from_str(ts, TIME_FORMAT) {
            Ok(t) => {
                if start <= t && t <= end {
                    matched.push(line.to_string());
                }
            }
            Err(_) => eprintln!("warn: skipping malformed log line: {}", line),
        }
    }

    matched
}
