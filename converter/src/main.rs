use clap::Parser;
use log::info;
use std::io::ErrorKind;
use std::path::PathBuf;
use trajcore::prelude::StageError;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Convert a trajectory log into Mobius simulation JSON")]
struct Args {
    /// Path to the trajectory TXT file
    file_path: PathBuf,
    /// Default mode for simulation entities [default: LF#0]
    #[arg(long)]
    default_mode: Option<String>,
    /// Path to the output JSON file [default: output.json]
    #[arg(long)]
    output_file: Option<PathBuf>,
    /// Load conversion defaults from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = match args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    }
    .with_overrides(args.default_mode, args.output_file);

    let runner = Runner::new(workflow_config);
    match runner.execute(&args.file_path) {
        Ok(result) => {
            let rate_origin = if result.frame_rate_from_header {
                "header"
            } else {
                "fallback"
            };
            info!(
                "{} fps ({}), {} samples in {} frames",
                result.frame_rate, rate_origin, result.metrics.rows, result.metrics.frames
            );
            println!("JSON file saved to {}", result.output_path.display());
            Ok(())
        }
        Err(err) => match file_access_message(&err) {
            Some(message) => {
                println!("{message}");
                Ok(())
            }
            None => Err(err),
        },
    }
}

/// Message shown instead of failing when the input file cannot be opened.
/// Returns `None` for every other error, which is then fatal.
fn file_access_message(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<StageError>()? {
        StageError::FileAccess { source, .. } if source.kind() == ErrorKind::NotFound => {
            Some("File not found. Please provide the correct file path.".to_string())
        }
        StageError::FileAccess { path, source } => {
            Some(format!("Could not read {}: {}", path.display(), source))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn access_error(kind: ErrorKind) -> anyhow::Error {
        anyhow::Error::from(StageError::FileAccess {
            path: PathBuf::from("crowd/run1.txt"),
            source: io::Error::from(kind),
        })
    }

    #[test]
    fn missing_input_gets_not_found_message() {
        let message = file_access_message(&access_error(ErrorKind::NotFound));
        assert_eq!(
            message.as_deref(),
            Some("File not found. Please provide the correct file path.")
        );
    }

    #[test]
    fn unreadable_input_names_the_path() {
        let message = file_access_message(&access_error(ErrorKind::PermissionDenied)).unwrap();
        assert!(message.starts_with("Could not read crowd/run1.txt: "));
    }

    #[test]
    fn message_survives_added_context() {
        let err = access_error(ErrorKind::NotFound).context("loading trajectory");
        assert!(file_access_message(&err).is_some());
    }

    #[test]
    fn other_errors_stay_fatal() {
        let err = anyhow::Error::from(StageError::MalformedInput("line 3: invalid x".into()));
        assert!(file_access_message(&err).is_none());
        assert!(file_access_message(&anyhow::anyhow!("disk full")).is_none());
    }

    #[test]
    fn missing_input_file_ends_the_run_cleanly() {
        let runner = Runner::new(WorkflowConfig::default());
        let err = runner
            .execute(std::path::Path::new("/nonexistent/trajectory.txt"))
            .unwrap_err();
        assert!(file_access_message(&err).is_some());
    }
}
