pub mod docker;
pub mod logs;
pub mod nginx;
pub mod ports;
pub mod users;

use crate::cli::{Query, Selector};
use crate::utils::Result;
use docker::DockerCli;
use users::Lastlog;

/// 每次调用只执行一个查询；运行时句柄在这里构造后传入
pub fn run(query: Query) -> Result<()> {
    match query {
        Query::Ports => ports::display_all(),
        Query::Port(port) => ports::display_port(port),
        Query::Docker(sel) => {
            let runtime = DockerCli;
            match sel {
                Selector::All => docker::display_overview(&runtime),
                Selector::Named(name) => docker::display_container(&runtime, &name),
            }
        }
        Query::Nginx(sel) => match sel {
            Selector::All => nginx::display_config(),
            Selector::Named(domain) => nginx::display_domain(&domain),
        },
        Query::Users(sel) => {
            let history = Lastlog;
            match sel {
                Selector::All => users::display_all(&history),
                Selector::Named(name) => users::display_user(&history, &name),
            }
        }
        Query::LogRange { start, end } => logs::display_range(&start, &end),
    }
}
