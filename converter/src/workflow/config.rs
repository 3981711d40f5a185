use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trajcore::prelude::{
    StageConfig, DEFAULT_FRAME_RATE, DEFAULT_MODE, TURN_RATE_LIMIT_DEG_PER_S,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub default_mode: String,
    pub output_file: PathBuf,
    /// Used when the input has no `framerate` header.
    pub fallback_frame_rate: u32,
    pub turn_rate_limit_deg_per_s: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_mode: DEFAULT_MODE.to_string(),
            output_file: PathBuf::from("output.json"),
            fallback_frame_rate: DEFAULT_FRAME_RATE,
            turn_rate_limit_deg_per_s: TURN_RATE_LIMIT_DEG_PER_S,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Applies options given explicitly on the command line.
    pub fn with_overrides(mut self, default_mode: Option<String>, output_file: Option<PathBuf>) -> Self {
        if let Some(mode) = default_mode {
            self.default_mode = mode;
        }
        if let Some(path) = output_file {
            self.output_file = path;
        }
        self
    }

    pub fn to_stage_config(&self, frame_rate: u32) -> StageConfig {
        StageConfig {
            frame_rate,
            default_mode: self.default_mode.clone(),
            turn_rate_limit_deg_per_s: self.turn_rate_limit_deg_per_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_command_line_defaults() {
        let cfg = WorkflowConfig::default();
        assert_eq!(cfg.default_mode, "LF#0");
        assert_eq!(cfg.output_file, PathBuf::from("output.json"));
        assert_eq!(cfg.fallback_frame_rate, 25);
        assert_eq!(cfg.to_stage_config(25).turn_rate_limit_deg_per_s, 90.0);
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let cfg = WorkflowConfig::default().with_overrides(Some("WALK#2".into()), None);
        assert_eq!(cfg.default_mode, "WALK#2");
        assert_eq!(cfg.output_file, PathBuf::from("output.json"));
    }

    #[test]
    fn config_load_reads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"default_mode: RUN#1\nfallback_frame_rate: 10\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.default_mode, "RUN#1");
        assert_eq!(cfg.fallback_frame_rate, 10);
        assert_eq!(cfg.output_file, PathBuf::from("output.json"));
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/nonexistent/workflow.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
