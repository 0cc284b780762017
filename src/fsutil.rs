//! Small filesystem utilities for report output.

use serde::Serialize;

use std::path::Path;

use crate::{ProfError, ProfResult};

pub fn write_json(path: &Path, value: &impl Serialize) -> ProfResult<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| ProfError::write(path, e))?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Path, value: &str) -> ProfResult<()> {
    write_bytes(path, value.as_bytes())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> ProfResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ProfError::write(path, format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, bytes).map_err(|e| ProfError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("testprof-fsutil-{name}-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn write_text_creates_missing_parent_dirs() {
        let root = temp_dir("nested");
        let out = root.join("a").join("b").join("report.html");
        write_text(&out, "<html></html>").expect("write");
        assert_eq!(std::fs::read_to_string(&out).expect("read"), "<html></html>");
    }

    #[test]
    fn write_into_file_parent_is_write_error() {
        let root = temp_dir("blocked");
        let blocker = root.join("blocker");
        std::fs::write(&blocker, b"x").expect("write blocker");
        let err = write_json(&blocker.join("report.json"), &serde_json::json!({}))
            .expect_err("must fail");
        match err {
            ProfError::Write { path, .. } => assert!(path.ends_with("report.json")),
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
