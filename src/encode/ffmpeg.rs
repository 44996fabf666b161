use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    foundation::core::{Fps, FrameRange},
    foundation::error::{HoldError, HoldResult},
    output::format::OutputFormat,
};

/// Inputs for turning a numbered frame sequence into a video.
#[derive(Clone, Debug)]
pub struct StitchOpts {
    /// Directory holding `<frame>.<ext>` stills.
    pub images_dir: PathBuf,
    /// Format of the stills.
    pub format: OutputFormat,
    /// Frames to include (inclusive).
    pub range: FrameRange,
    /// Playback rate.
    pub fps: Fps,
    /// Optional audio track muxed alongside.
    pub audio: Option<PathBuf>,
    /// Video file to write.
    pub out_path: PathBuf,
    /// Replace `out_path` when it exists.
    pub overwrite: bool,
}

impl StitchOpts {
    /// Options for the images of a finished run.
    pub fn new(
        images_dir: impl Into<PathBuf>,
        format: OutputFormat,
        range: FrameRange,
        fps: Fps,
        out_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            format,
            range,
            fps,
            audio: None,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    /// Check the options before spawning anything.
    pub fn validate(&self) -> HoldResult<()> {
        if self.range.is_empty() {
            return Err(HoldError::validation("cannot stitch an empty frame range"));
        }
        if self.range.start.0 < 0 {
            return Err(HoldError::validation(
                "ffmpeg image sequences cannot start at a negative frame",
            ));
        }
        Ok(())
    }

    fn pattern(&self) -> PathBuf {
        self.images_dir
            .join(format!("%d.{}", self.format.extension()))
    }
}

/// Return `true` when an `ffmpeg` binary answers `-version`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// The `ffmpeg` invocation for `opts`, not yet spawned.
///
/// The frame count is `end - start + 1`, so the last frame of the range is included.
pub fn stitch_command(opts: &StitchOpts) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd.arg(if opts.overwrite { "-y" } else { "-n" });
    cmd.args(["-loglevel", "error"]);

    cmd.args([
        "-framerate",
        &opts.fps.ffmpeg_rate(),
        "-start_number",
        &opts.range.start.0.to_string(),
        "-i",
    ])
    .arg(opts.pattern());
    if let Some(audio) = &opts.audio {
        cmd.arg("-i").arg(audio);
    }

    cmd.args([
        "-frames:v",
        &opts.range.len_frames().to_string(),
        "-vf",
        "pad=ceil(iw/2)*2:ceil(ih/2)*2",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
    ]);
    if opts.audio.is_some() {
        cmd.args(["-c:a", "aac"]);
    }
    cmd.arg(&opts.out_path);
    cmd
}

/// Run `ffmpeg` to stitch the sequence described by `opts`.
#[tracing::instrument(skip(opts), fields(out = %opts.out_path.display()))]
pub fn stitch(opts: &StitchOpts) -> HoldResult<()> {
    opts.validate()?;
    if let Some(audio) = &opts.audio
        && !audio.is_file()
    {
        return Err(HoldError::configuration(format!(
            "audio file '{}' does not exist",
            audio.display()
        )));
    }
    if !opts.overwrite && opts.out_path.exists() {
        return Err(HoldError::validation(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    ensure_parent_dir(&opts.out_path)?;
    if !is_ffmpeg_on_path() {
        return Err(HoldError::configuration(
            "ffmpeg is required for stitching, but was not found on PATH",
        ));
    }

    let output = stitch_command(opts).output().map_err(|e| {
        HoldError::Other(anyhow::anyhow!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HoldError::Other(anyhow::anyhow!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    tracing::info!(frames = opts.range.len_frames(), "video written");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> HoldResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| HoldError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
