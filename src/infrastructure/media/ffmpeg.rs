use super::AudioToolkit;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

const CONCAT_SEPARATOR: &str = "|";

#[derive(Debug, Deserialize)]
struct FfProbeResponse {
    format: FfProbeFormat,
}

#[derive(Debug, Deserialize)]
struct FfProbeFormat {
    // ffprobe prints the duration as a JSON string, e.g. "1.234000"
    duration: Option<serde_json::Value>,
}

/// ffprobe/ffmpeg backed toolkit
pub struct FfmpegToolkit {
    ffprobe_path: PathBuf,
    ffmpeg_path: PathBuf,
    timeout: Duration,
}

impl FfmpegToolkit {
    pub fn new(ffprobe_path: PathBuf, ffmpeg_path: PathBuf, timeout: Duration) -> Self {
        Self {
            ffprobe_path,
            ffmpeg_path,
            timeout,
        }
    }

    /// Run a tool inside `workdir`, killing it if it outlives the timeout
    async fn run(&self, program: &Path, args: &[String], workdir: &Path) -> Result<Output, String> {
        let child = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", program.display(), e))?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| format!("failed to run {}: {}", program.display(), e)),
            Err(_) => {
                tracing::warn!(
                    program = %program.display(),
                    timeout_ms = self.timeout.as_millis(),
                    "External audio tool timed out"
                );
                Err(format!(
                    "{} timed out after {}ms",
                    program.display(),
                    self.timeout.as_millis()
                ))
            }
        }
    }
}

/// `concat:0.mp3|1.mp3|...` in the given order
pub fn concat_directive(file_names: &[String]) -> String {
    format!("concat:{}", file_names.join(CONCAT_SEPARATOR))
}

/// Extract the duration from `ffprobe -show_format -print_format json` output
pub fn parse_probe_output(stdout: &str) -> Result<u64, String> {
    if stdout.trim().is_empty() {
        return Err("ffprobe produced no output".to_string());
    }

    let response: FfProbeResponse =
        serde_json::from_str(stdout).map_err(|e| format!("invalid ffprobe output: {}", e))?;

    let seconds = match response.format.duration {
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid duration '{}': {}", s, e))?,
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("invalid duration '{}'", n))?,
        _ => return Err("ffprobe output has no duration".to_string()),
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid duration '{}'", seconds));
    }

    Ok((seconds * 1000.0).round() as u64)
}

#[async_trait]
impl AudioToolkit for FfmpegToolkit {
    async fn probe_duration(&self, workdir: &Path, file_name: &str) -> Result<u64, String> {
        let args: Vec<String> = [
            "-i",
            file_name,
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-hide_banner",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let output = self.run(&self.ffprobe_path, &args, workdir).await?;
        if !output.status.success() {
            return Err(format!("ffprobe exited with {}", output.status));
        }

        let duration_ms = parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(file = file_name, duration_ms, "Segment probed");
        Ok(duration_ms)
    }

    async fn merge_sequential(
        &self,
        workdir: &Path,
        file_names: &[String],
        output_name: &str,
    ) -> Result<PathBuf, String> {
        if file_names.is_empty() {
            return Err("no segments to merge".to_string());
        }

        let args: Vec<String> = vec![
            "-i".into(),
            concat_directive(file_names),
            "-v".into(),
            "quiet".into(),
            "-hide_banner".into(),
            "-acodec".into(),
            "copy".into(),
            "-y".into(),
            output_name.into(),
        ];

        let output = self.run(&self.ffmpeg_path, &args, workdir).await?;
        if !output.status.success() {
            return Err(format!("ffmpeg exited with {}", output.status));
        }

        let output_path = workdir.join(output_name);
        let exists = tokio::fs::try_exists(&output_path).await.unwrap_or(false);
        if !exists {
            return Err(format!("ffmpeg produced no {}", output_name));
        }

        Ok(output_path)
    }
}
