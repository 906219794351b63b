//! Nginx 配置查询
//! 来源：nginx -T（解析后的完整配置转储）

use std::process::Command;

use crate::utils::{FetchError, Result};

pub fn display_config() -> Result<()> {
    print!("{}", fetch_config()?);
    Ok(())
}

pub fn display_domain(domain: &str) -> Result<()> {
    let config = fetch_config()?;
    for line in filter_domain(&config, domain) {
        println!("{}", line);
    }
    Ok(())
}

pub fn fetch_config() -> Result<String> {
    let out = Command::new("nginx")
        .arg("-T")
        .output()
        .map_err(|e| FetchError::ExternalTool(format!("nginx: {}", e)))?;

    if !out.status.success() {
        return Err(FetchError::ExternalTool(format!(
            "nginx -T failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// 区分大小写的子串匹配，保持原始行序，无命中返回空
pub fn filter_domain<'a>(config: &'a str, domain: &str) -> Vec<&'a str> {
    config.lines().filter(|line| line.contains(domain)).collect()
}
