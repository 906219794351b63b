use clap::{ArgGroup, Parser};

#[derive(Parser)]
#[command(name = "devopsfetch")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIME"), ")"))]
#[command(about = "DevOps host inspection tool", long_about = None)]
#[command(group = ArgGroup::new("query").multiple(false))]
pub struct Cli {
    /// Display active connections on a specific port
    #[arg(short, long, group = "query", value_name = "PORT")]
    pub port: Option<u16>,

    /// List all Docker images and containers, or inspect one container by name
    #[arg(short, long, group = "query", num_args = 0..=1, value_name = "CONTAINER")]
    pub docker: Option<Option<String>>,

    /// Display the full Nginx configuration, or only lines for one domain
    #[arg(short, long, group = "query", num_args = 0..=1, value_name = "DOMAIN")]
    pub nginx: Option<Option<String>>,

    /// List all users with their last login, or one user by name
    #[arg(short, long, group = "query", num_args = 0..=1, value_name = "USERNAME")]
    pub users: Option<Option<String>>,

    /// Display log entries within a time range (YYYY-MM-DD HH:MM:SS)
    #[arg(short, long, group = "query", num_args = 2, value_names = ["START", "END"])]
    pub time: Option<Vec<String>>,
}

/// 可选参数标志的取值：整体列表 / 指定名称
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    All,
    Named(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Ports,
    Port(u16),
    Docker(Selector),
    Nginx(Selector),
    Users(Selector),
    LogRange { start: String, end: String },
}

impl Cli {
    /// 标志互斥由 clap 保证，这里只做一对一映射；无标志默认端口列表
    pub fn query(self) -> Query {
        if let Some(port) = self.port {
            Query::Port(port)
        } else if let Some(arg) = self.docker {
            Query::Docker(selector(arg))
        } else if let Some(arg) = self.nginx {
            Query::Nginx(selector(arg))
        } else if let Some(arg) = self.users {
            Query::Users(selector(arg))
        } else if let Some(range) = self.time {
            let mut range = range.into_iter();
            Query::LogRange {
                start: range.next().unwrap_or_default(),
                end: range.next().unwrap_or_default(),
            }
        } else {
            Query::Ports
        }
    }
}

fn selector(arg: Option<String>) -> Selector {
    match arg {
        Some(name) if !name.is_empty() => Selector::Named(name),
        _ => Selector::All,
    }
}
