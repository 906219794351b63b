//! 用户账户收集
//! 来源：/etc/passwd + lastlog（逐用户查询最近登录）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::process::Command;

use crate::utils::table::Table;
use crate::utils::Result;

const PASSWD_FILE: &str = "/etc/passwd";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: String,
    pub last_login: LastLogin,
}

/// 登录历史查询结果；查询失败不等于"从未登录"，统一显示哨兵值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LastLogin {
    Known(String),
    Unavailable,
}

impl fmt::Display for LastLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastLogin::Known(ts) => write!(f, "{}", ts),
            LastLogin::Unavailable => write!(f, "-"),
        }
    }
}

/// 逐账户登录查询走这个接口，失败隔离在实现内部
pub trait LoginHistory {
    fn last_login(&self, username: &str) -> LastLogin;
}

// ── 公开接口 ────────────────────────────────────────────────────────────────

pub fn display_all(history: &dyn LoginHistory) -> Result<()> {
    let records = collect_all(history)?;
    println!("{}", user_table(&records));
    Ok(())
}

pub fn display_user(history: &dyn LoginHistory, username: &str) -> Result<()> {
    let mut records = collect_all(history)?;
    records.retain(|r| r.name == username);
    println!("{}", user_table(&records));
    Ok(())
}

/// 每个账户独立查询登录历史；单个查询失败不中断整体列表
pub fn collect_all(history: &dyn LoginHistory) -> Result<Vec<UserRecord>> {
    let content = fs::read_to_string(PASSWD_FILE)?;
    Ok(parse_passwd(&content)
        .into_iter()
        .map(|acc| UserRecord {
            last_login: history.last_login(&acc.name),
            name: acc.name,
            uid: acc.uid,
            gid: acc.gid,
            home: acc.home,
        })
        .collect())
}

pub fn user_table(records: &[UserRecord]) -> Table {
    let mut table = Table::new(&["Username", "UID", "GID", "Home Directory", "Last Login"]);
    for r in records {
        table.add_row(vec![
            r.name.clone(),
            r.uid.to_string(),
            r.gid.to_string(),
            r.home.clone(),
            r.last_login.to_string(),
        ]);
    }
    table
}

// ── /etc/passwd 解析 ────────────────────────────────────────────────────────

pub struct Account {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: String,
}

pub fn parse_passwd(content: &str) -> Vec<Account> {
    content
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|line| {
            // name:x:uid:gid:gecos:home:shell
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() < 7 {
                return None;
            }
            Some(Account {
                name: fields[0].to_string(),
                uid: fields[2].parse().ok()?,
                gid: fields[3].parse().ok()?,
                home: fields[5].to_string(),
            })
        })
        .collect()
}

// ── lastlog 实现 ────────────────────────────────────────────────────────────

pub struct Lastlog;

impl LoginHistory for Lastlog {
    fn last_login(&self, username: &str) -> LastLogin {
        let out = match Command::new("lastlog").args(["-u", username]).output() {
            Ok(o) if o.status.success() => o,
            // 工具缺失或账户无记录都退回哨兵值
            _ => return LastLogin::Unavailable,
        };

        let stdout = String::from_utf8_lossy(&out.stdout);
        match stdout.trim().lines().last() {
            Some(line) if !line.trim().is_empty() => LastLogin::Known(line.trim().to_string()),
            _ => LastLogin::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWD_SAMPLE: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
alice:x:1000:1000:Alice,,,:/home/alice:/bin/zsh
broken-line-without-enough-fields
";

    struct NeverLoggedIn;

    impl LoginHistory for NeverLoggedIn {
        fn last_login(&self, _username: &str) -> LastLogin {
            LastLogin::Unavailable
        }
    }

    struct OnlyAlice;

    impl LoginHistory for OnlyAlice {
        fn last_login(&self, username: &str) -> LastLogin {
            if username == "alice" {
                LastLogin::Known("alice  pts/0  Mon Jul  1 09:00".to_string())
            } else {
                LastLogin::Unavailable
            }
        }
    }

    #[test]
    fn test_parse_passwd_skips_malformed_lines() {
        let accounts = parse_passwd(PASSWD_SAMPLE);
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].name, "root");
        assert_eq!(accounts[2].uid, 1000);
        assert_eq!(accounts[2].home, "/home/alice");
    }

    #[test]
    fn test_lookup_failures_do_not_shrink_the_listing() {
        let accounts = parse_passwd(PASSWD_SAMPLE);
        let records: Vec<UserRecord> = accounts
            .into_iter()
            .map(|acc| UserRecord {
                last_login: NeverLoggedIn.last_login(&acc.name),
                name: acc.name,
                uid: acc.uid,
                gid: acc.gid,
                home: acc.home,
            })
            .collect();

        // 逐账户查询全部失败，列表长度仍等于账户数
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.last_login == LastLogin::Unavailable));
    }

    #[test]
    fn test_sentinel_renders_as_dash() {
        let record = UserRecord {
            name: "daemon".to_string(),
            uid: 1,
            gid: 1,
            home: "/usr/sbin".to_string(),
            last_login: LastLogin::Unavailable,
        };
        let out = user_table(&[record]).to_string();
        assert!(out.contains("| daemon   | 1   | 1   | /usr/sbin      | -          |"));
    }

    #[test]
    fn test_mixed_lookup_results() {
        let accounts = parse_passwd(PASSWD_SAMPLE);
        let history = OnlyAlice;
        let logins: Vec<LastLogin> =
            accounts.iter().map(|a| history.last_login(&a.name)).collect();
        assert_eq!(logins[0], LastLogin::Unavailable);
        assert!(matches!(&logins[2], LastLogin::Known(ts) if ts.contains("pts/0")));
    }
}
