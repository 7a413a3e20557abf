use cirro_run::{CirroRunSignal, Error, Result, Signal, StreamSender};
use std::{path::PathBuf, process::Stdio};
use tokio::{
  io::{AsyncBufReadExt, BufReader},
  process::Command as Cmd,
};

pub struct Command {
  command: Cmd,
}

impl Command {
  pub fn new(cmd: impl Into<String>) -> Self {
    if cfg!(target_os = "windows") {
      Command::powershell(cmd)
    } else {
      Command::sh(cmd)
    }
  }

  pub fn powershell(cmd: impl Into<String>) -> Self {
    let cmd: String = cmd.into();
    let mut command = Cmd::new("powershell.exe");

    command
      .arg("-NoProfile")
      .arg("-NonInteractive")
      .arg("-Command")
      .arg(cmd);

    Command { command }
  }

  pub fn sh(cmd: impl Into<String>) -> Self {
    let cmd: String = cmd.into();
    let mut command = Cmd::new("sh");

    command.arg("-c").arg(cmd);

    Command { command }
  }

  pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
    self.command.env(key.into(), value.into());

    self
  }

  pub fn dir(&mut self, dir: &PathBuf) -> &mut Self {
    self.command.current_dir(dir);

    self
  }

  /// Run to completion and capture stdout. Non-zero exit turns stderr into
  /// the error message.
  pub async fn exec(&mut self) -> Result<String> {
    let output = self.command.output().await.map_err(|err| {
      Error::internal_runtime_error(format!("Failed to spawn child process: {}", err))
    })?;

    if output.status.success() {
      let stdout = String::from_utf8(output.stdout)
        .map_err(|err| Error::internal_runtime_error(format!("Failed to parse stdout: {}", err)))?;
      return Ok(stdout.trim().to_string());
    }

    let stderr = String::from_utf8(output.stderr)
      .map_err(|err| Error::internal_runtime_error(format!("Failed to parse stderr: {}", err)))?;

    Err(Error::internal_runtime_error(stderr))
  }

  /// Stream the command's output line by line and end the stream with the
  /// step's result. A cancel or timeout signal kills the child process and
  /// ends the stream with the matching result.
  pub async fn run(&mut self, sender: StreamSender, signal: CirroRunSignal) -> Result<()> {
    let mut child = self
      .command
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|err| {
        Error::internal_runtime_error(format!("Failed to spawn child process: {}", err))
      })?;

    let out = child.stdout.take().ok_or_else(|| {
      Error::internal_runtime_error("Failed to get stdout from child process".to_string())
    })?;
    let err = child.stderr.take().ok_or_else(|| {
      Error::internal_runtime_error("Failed to get stderr from child process".to_string())
    })?;

    let mut lines = BufReader::new(out).lines();
    let mut errors = BufReader::new(err).lines();

    let mut stdout_done = false;
    let mut stderr_done = false;
    let mut received_signal: Option<Signal> = None;

    while !(stdout_done && stderr_done) {
      tokio::select! {
        line = lines.next_line(), if !stdout_done => {
          match line {
            Ok(Some(line)) => sender.log(line),
            Ok(None) => stdout_done = true,
            Err(err) => {
              sender.error(err.to_string());
              stdout_done = true;
            }
          }
        }
        error = errors.next_line(), if !stderr_done => {
          match error {
            Ok(Some(error)) => sender.error(error),
            Ok(None) => stderr_done = true,
            Err(err) => {
              sender.error(err.to_string());
              stderr_done = true;
            }
          }
        }
        sig = signal.recv(), if received_signal.is_none() => {
          received_signal = Some(sig);
          // Killing the child closes its pipes; the loop drains what is left.
          // The child may have exited on its own in the meantime.
          if let Err(err) = child.kill().await {
            log::warn!("Failed to kill child process: {}", err);
          }
        }
      }
    }

    let status = child.wait().await.map_err(|err| {
      Error::internal_runtime_error(format!("Failed to wait for child process: {}", err))
    })?;

    match received_signal {
      Some(Signal::Cancel) => sender.cancelled(),
      Some(Signal::Timeout) => sender.timeout(),
      None => {
        if status.success() {
          sender.succeeded();
        } else {
          sender.failed(status.code().unwrap_or(1));
        }
      }
    }

    Ok(())
  }
}
