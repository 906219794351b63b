//! 容器运行时查询
//! 来源：docker image ls / docker ps / docker inspect

use serde::{Deserialize, Serialize};
use std::process::Command;

use crate::utils::table::Table;
use crate::utils::{FetchError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// 运行时句柄作为显式依赖传入，测试时可替换为假实现
pub trait ContainerRuntime {
    fn list_images(&self) -> Result<Vec<ImageRecord>>;
    fn list_containers(&self) -> Result<Vec<ContainerRecord>>;
    fn inspect(&self, name: &str) -> Result<serde_json::Value>;
}

// ── 公开接口 ────────────────────────────────────────────────────────────────

pub fn display_overview(runtime: &dyn ContainerRuntime) -> Result<()> {
    let (images, containers) = collect_overview(runtime)?;

    println!("Docker Images:");
    println!("{}", image_table(&images));
    println!("Docker Containers:");
    println!("{}", container_table(&containers));
    Ok(())
}

pub fn display_container(runtime: &dyn ContainerRuntime, name: &str) -> Result<()> {
    let attrs = runtime.inspect(name)?;
    let dump = serde_json::to_string_pretty(&attrs)
        .map_err(|e| FetchError::Parse(format!("inspect JSON: {}", e)))?;
    println!("{}", dump);
    Ok(())
}

pub fn collect_overview(
    runtime: &dyn ContainerRuntime,
) -> Result<(Vec<ImageRecord>, Vec<ContainerRecord>)> {
    let images = runtime.list_images()?;
    let containers = runtime.list_containers()?;
    Ok((images, containers))
}

pub fn image_table(images: &[ImageRecord]) -> Table {
    let mut table = Table::new(&["Image ID", "Tags"]);
    for img in images {
        table.add_row(vec![img.id.clone(), img.tags.join(", ")]);
    }
    table
}

pub fn container_table(containers: &[ContainerRecord]) -> Table {
    let mut table = Table::new(&["Container ID", "Name", "Status"]);
    for c in containers {
        table.add_row(vec![c.id.clone(), c.name.clone(), c.status.clone()]);
    }
    table
}

// ── docker CLI 实现 ─────────────────────────────────────────────────────────

pub struct DockerCli;

impl ContainerRuntime for DockerCli {
    fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let out = Command::new("docker")
            .args(["image", "ls", "--format", "{{json .}}"])
            .output()
            .map_err(|e| FetchError::RuntimeUnavailable(format!("docker: {}", e)))?;

        if !out.status.success() {
            return Err(daemon_error(&out.stderr, "docker image ls failed"));
        }

        Ok(parse_image_lines(&String::from_utf8_lossy(&out.stdout)))
    }

    fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
        let out = Command::new("docker")
            .args(["ps", "-a", "--format", "{{json .}}"])
            .output()
            .map_err(|e| FetchError::RuntimeUnavailable(format!("docker: {}", e)))?;

        if !out.status.success() {
            return Err(daemon_error(&out.stderr, "docker ps failed"));
        }

        Ok(parse_container_lines(&String::from_utf8_lossy(&out.stdout)))
    }

    fn inspect(&self, name: &str) -> Result<serde_json::Value> {
        let out = Command::new("docker")
            .args(["inspect", name])
            .output()
            .map_err(|e| FetchError::RuntimeUnavailable(format!("docker: {}", e)))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            // daemon 不可达与容器不存在走不同错误
            if stderr.contains("Cannot connect") {
                return Err(FetchError::RuntimeUnavailable(stderr.trim().to_string()));
            }
            return Err(FetchError::NotFound(name.to_string()));
        }

        let arr: serde_json::Value = serde_json::from_slice(&out.stdout)
            .map_err(|e| FetchError::Parse(format!("inspect JSON: {}", e)))?;

        arr.as_array()
            .and_then(|a| a.first())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(name.to_string()))
    }
}

fn daemon_error(stderr: &[u8], fallback: &str) -> FetchError {
    let msg = String::from_utf8_lossy(stderr).trim().to_string();
    if msg.is_empty() {
        FetchError::RuntimeUnavailable(format!("{} — is Docker running?", fallback))
    } else {
        FetchError::RuntimeUnavailable(msg)
    }
}

// ── `{{json .}}` 行解析 ─────────────────────────────────────────────────────

/// 每个 tag 一行，按 ID 归并，保持首见顺序
pub fn parse_image_lines(stdout: &str) -> Vec<ImageRecord> {
    let mut images: Vec<ImageRecord> = Vec::new();

    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let j: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("warn: skipping image line: {}", e);
                continue;
            }
        };

        let id = j["ID"].as_str().unwrap_or("").to_string();
        let repo = j["Repository"].as_str().unwrap_or("");
        let tag = j["Tag"].as_str().unwrap_or("");
        let full_tag = if repo == "<none>" || tag == "<none>" {
            None
        } else {
            Some(format!("{}:{}", repo, tag))
        };

        match images.iter_mut().find(|img| img.id == id) {
            Some(img) => {
                if let Some(t) = full_tag {
                    img.tags.push(t);
                }
            }
            None => images.push(ImageRecord {
                id,
                tags: full_tag.into_iter().collect(),
            }),
        }
    }

    images
}

pub fn parse_container_lines(stdout: &str) -> Vec<ContainerRecord> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let j: serde_json::Value = serde_json::from_str(line).ok()?;
            Some(ContainerRecord {
                id: j["ID"].as_str().unwrap_or("").to_string(),
                name: j["Names"].as_str().unwrap_or("").to_string(),
                status: j["State"].as_str().unwrap_or("").to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRuntime {
        images: Vec<ImageRecord>,
        containers: Vec<ContainerRecord>,
        reachable: bool,
    }

    impl ContainerRuntime for FakeRuntime {
        fn list_images(&self) -> Result<Vec<ImageRecord>> {
            if !self.reachable {
                return Err(FetchError::RuntimeUnavailable("no daemon socket".to_string()));
            }
            Ok(self.images.clone())
        }

        fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
            if !self.reachable {
                return Err(FetchError::RuntimeUnavailable("no daemon socket".to_string()));
            }
            Ok(self.containers.clone())
        }

        fn inspect(&self, name: &str) -> Result<serde_json::Value> {
            self.containers
                .iter()
                .find(|c| c.name == name)
                .map(|c| serde_json::json!({ "Id": c.id, "Name": c.name }))
                .ok_or_else(|| FetchError::NotFound(name.to_string()))
        }
    }

    fn fake() -> FakeRuntime {
        FakeRuntime {
            images: vec![ImageRecord {
                id: "sha256:abc123".to_string(),
                tags: vec!["nginx:latest".to_string(), "nginx:1.25".to_string()],
            }],
            containers: vec![ContainerRecord {
                id: "deadbeef1234".to_string(),
                name: "web".to_string(),
                status: "running".to_string(),
            }],
            reachable: true,
        }
    }

    #[test]
    fn test_overview_collects_images_and_containers() {
        let (images, containers) = collect_overview(&fake()).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(containers.len(), 1);

        let out = image_table(&images).to_string();
        assert!(out.contains("nginx:latest, nginx:1.25"));
        let out = container_table(&containers).to_string();
        assert!(out.contains("| deadbeef1234 | web  | running |"));
    }

    #[test]
    fn test_unreachable_daemon_is_fatal() {
        let mut rt = fake();
        rt.reachable = false;
        assert!(matches!(
            collect_overview(&rt),
            Err(FetchError::RuntimeUnavailable(_))
        ));
    }

    #[test]
    fn test_inspect_missing_container_is_not_found() {
        let err = fake().inspect("nonexistent-xyz").unwrap_err();
        assert!(matches!(err, FetchError::NotFound(name) if name == "nonexistent-xyz"));
    }

    #[test]
    fn test_parse_image_lines_groups_tags_by_id() {
        let stdout = concat!(
            r#"{"ID":"abc","Repository":"nginx","Tag":"latest"}"#, "\n",
            r#"{"ID":"abc","Repository":"nginx","Tag":"1.25"}"#, "\n",
            r#"{"ID":"def","Repository":"<none>","Tag":"<none>"}"#, "\n",
        );
        let images = parse_image_lines(stdout);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].tags, vec!["nginx:latest", "nginx:1.25"]);
        assert!(images[1].tags.is_empty());
    }

    #[test]
    fn test_parse_container_lines() {
        let stdout = r#"{"ID":"deadbeef1234","Names":"web","State":"exited"}"#;
        let containers = parse_container_lines(stdout);
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "web");
        assert_eq!(containers[0].status, "exited");
    }
}
