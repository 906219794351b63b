//! 端口信息收集
//! 来源：/proc/net/tcp*, /proc/net/udp*, /proc/*/fd

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::utils::table::Table;
use crate::utils::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRecord {
    pub local_addr: IpAddr,
    pub local_port: u16,
    pub remote: Option<String>, // "ip:port"；未连接时为 None
    pub status: String,
    pub pid: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    Tcp,
    Udp,
}

// ── 公开接口 ────────────────────────────────────────────────────────────────

pub fn display_all() -> Result<()> {
    let records = collect_all()?;
    println!("{}", render_table(&records));
    Ok(())
}

pub fn display_port(port: u16) -> Result<()> {
    let mut records = collect_all()?;
    records.retain(|r| r.local_port == port);
    println!("{}", render_table(&records));
    Ok(())
}

/// 按内核报告顺序返回全部 inet 连接；顺序不保证跨次运行稳定
pub fn collect_all() -> Result<Vec<PortRecord>> {
    let inodes = socket_inode_pids();
    let mut records = Vec::new();

    let tables = [
        ("/proc/net/tcp", Proto::Tcp),
        ("/proc/net/tcp6", Proto::Tcp),
        ("/proc/net/udp", Proto::Udp),
        ("/proc/net/udp6", Proto::Udp),
    ];

    for (path, proto) in tables {
        // tcp6/udp6 在禁用 IPv6 的主机上不存在
        if let Ok(content) = fs::read_to_string(path) {
            records.extend(parse_proc_net(&content, proto, &inodes));
        }
    }

    Ok(records)
}

pub fn render_table(records: &[PortRecord]) -> Table {
    let mut table = Table::new(&["Local Address", "Remote Address", "Status", "PID"]);
    for r in records {
        table.add_row(vec![
            format!("{}:{}", r.local_addr, r.local_port),
            r.remote.clone().unwrap_or_else(|| "-".to_string()),
            r.status.clone(),
            r.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

// ── /proc/net 解析 ──────────────────────────────────────────────────────────

pub fn parse_proc_net(
    content: &str,
    proto: Proto,
    inodes: &HashMap<u64, i32>,
) -> Vec<PortRecord> {
    content
        .lines()
        .skip(1) // 表头
        .filter_map(|line| parse_line(line, proto, inodes))
        .collect()
}

fn parse_line(line: &str, proto: Proto, inodes: &HashMap<u64, i32>) -> Option<PortRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 10 {
        return None;
    }

    let (local_addr, local_port) = decode_addr(parts[1])?;
    let (remote_addr, remote_port) = decode_addr(parts[2])?;

    let status = match proto {
        Proto::Tcp => tcp_state(parts[3]).to_string(),
        Proto::Udp => "NONE".to_string(),
    };

    let remote = if remote_port == 0 && remote_addr.is_unspecified() {
        None
    } else {
        Some(format!("{}:{}", remote_addr, remote_port))
    };

    let inode: u64 = parts[9].parse().ok()?;
    let pid = inodes.get(&inode).copied();

    Some(PortRecord { local_addr, local_port, remote, status, pid })
}

/// 解码 "0100007F:1F90" / 32 位十六进制 IPv6 形式的地址
fn decode_addr(s: &str) -> Option<(IpAddr, u16)> {
    let (ip_hex, port_hex) = s.split_once(':')?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;

    let ip = match ip_hex.len() {
        // IPv4：网络序 u32 的小端十六进制
        8 => {
            let raw = u32::from_str_radix(ip_hex, 16).ok()?;
            IpAddr::V4(Ipv4Addr::from(raw.swap_bytes()))
        }
        // IPv6：4 个 32 位字，每个字内字节为小端
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in ip_hex.as_bytes().chunks(8).enumerate() {
                let word = u32::from_str_radix(std::str::from_utf8(chunk).ok()?, 16).ok()?;
                bytes[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
            }
            IpAddr::V6(Ipv6Addr::from(bytes))
        }
        _ => return None,
    };

    Some((ip, port))
}

fn tcp_state(hex: &str) -> &'static str {
    match hex {
        "01" => "ESTABLISHED",
        "02" => "SYN_SENT",
        "03" => "SYN_RECV",
        "04" => "FIN_WAIT1",
        "05" => "FIN_WAIT2",
        "06" => "TIME_WAIT",
        "07" => "CLOSE",
        "08" => "CLOSE_WAIT",
        "09" => "LAST_ACK",
        "0A" => "LISTEN",
        "0B" => "CLOSING",
        _ => "UNKNOWN",
    }
}

// ── socket inode → pid ──────────────────────────────────────────────────────

/// 扫描 /proc/*/fd 建立 socket inode → pid 映射。
/// 无权限读取的进程直接跳过，对应连接 PID 显示为 "-"。
fn socket_inode_pids() -> HashMap<u64, i32> {
    let mut map = HashMap::new();

    let entries = match fs::read_dir("/proc") {
        Ok(e) => e,
        Err(_) => return map,
    };

    for entry in entries.flatten() {
        let pid: i32 = match entry.file_name().to_string_lossy().parse() {
            Ok(p) => p,
            Err(_) => continue,
        };

        let fd_dir = format!("/proc/{}/fd", pid);
        let fds = match fs::read_dir(&fd_dir) {
            Ok(f) => f,
            Err(_) => continue,
        };

        for fd in fds.flatten() {
            if let Ok(target) = fs::read_link(fd.path()) {
                if let Some(inode) = parse_socket_link(&target.to_string_lossy()) {
                    map.entry(inode).or_insert(pid);
                }
            }
        }
    }

    map
}

/// "socket:[12345]" → 12345
fn parse_socket_link(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}
