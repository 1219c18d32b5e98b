//! Saved run results. Only the application layers touch the filesystem.

use crate::model::RunResult;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default directory for auto-saved runs.
pub fn runs_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("no local data directory on this platform")?;
    Ok(base.join("sortviz").join("runs"))
}

/// File name for a run: timestamp (filesystem-safe), algorithm and run id.
pub fn file_name(r: &RunResult) -> String {
    format!(
        "{}-{}-{}.json",
        r.timestamp_utc.replace(':', "-").replace('T', "_"),
        r.algorithm,
        &r.run_id[..8.min(r.run_id.len())]
    )
}

/// Save a run under the default runs directory.
pub fn save_run(r: &RunResult) -> Result<PathBuf> {
    save_run_in(&runs_dir()?, r)
}

pub fn save_run_in(dir: &Path, r: &RunResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name(r));
    export_json(&path, r)?;
    Ok(path)
}

pub fn export_json(path: &Path, r: &RunResult) -> Result<()> {
    let data = serde_json::to_vec_pretty(r).context("serialize run result")?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn load_run(path: &Path) -> Result<RunResult> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StepCounts;
    use crate::model::Algorithm;

    fn sample() -> RunResult {
        RunResult {
            timestamp_utc: "2024-05-01T10:20:30Z".into(),
            run_id: "1234567890".into(),
            algorithm: Algorithm::Quick,
            input: vec![3, 1, 2],
            output: vec![1, 2, 3],
            counts: StepCounts::default(),
            cancelled: false,
            sorted: true,
            elapsed_ms: 12,
            step_delay_ms: 0,
        }
    }

    #[test]
    fn file_name_is_filesystem_safe() {
        assert_eq!(file_name(&sample()), "2024-05-01_10-20-30Z-quick-12345678.json");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_run_in(&dir.path().join("nested"), &sample()).unwrap();
        assert!(path.exists());
        let loaded = load_run(&path).unwrap();
        assert_eq!(loaded.output, vec![1, 2, 3]);
        assert_eq!(loaded.algorithm, Algorithm::Quick);
    }
}
