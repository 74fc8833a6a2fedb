//! # Process Spawning Module
//!
//! Helpers around `tokio::process` for the two ways the harness talks to
//! child processes: capture everything into a string (short control
//! commands), or tee everything line by line into a log artifact while the
//! process runs (long install scripts).

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;

/// Spawns a command and captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
pub async fn spawn_and_capture(
    mut cmd: Command,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            // If spawning fails, we return the error and an empty string for the output.
            return (Err(e), String::new());
        }
    };

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            return (
                Err(std::io::Error::other("Failed to capture stdout")),
                String::new(),
            );
        }
    };
    let stderr = match child.stderr.take() {
        Some(stderr) => stderr,
        None => {
            return (
                Err(std::io::Error::other("Failed to capture stderr")),
                String::new(),
            );
        }
    };

    // Both streams append to one shared buffer, in arrival order.
    let output = Arc::new(Mutex::new(String::new()));

    let stdout_output = Arc::clone(&output);
    let stdout_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = stdout_output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    });

    let stderr_output = Arc::clone(&output);
    let stderr_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = stderr_output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    });

    // Wait for the process to exit.
    let status = child.wait().await;

    // Drain both readers so nothing emitted right before exit is lost.
    if let Err(e) = stdout_handle.await {
        eprintln!("Failed to join stdout task: {}", e);
    }
    if let Err(e) = stderr_handle.await {
        eprintln!("Failed to join stderr task: {}", e);
    }

    let combined = output.lock().await.clone();
    (status, combined)
}

/// Spawns a command and tees its combined stdout/stderr to a log file while
/// echoing it to our own stdout, then blocks until the process exits.
///
/// Every line is flushed as it arrives, so a partial log exists even if the
/// process is killed or the environment is torn down mid-run.
pub async fn spawn_and_tee(
    mut cmd: Command,
    log_path: &Path,
) -> std::io::Result<ExitStatus> {
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("Failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("Failed to capture stderr"))?;

    let log = Arc::new(Mutex::new(File::create(log_path).await?));

    let stdout_handle = tokio::spawn(tee_stream(stdout, Arc::clone(&log)));
    let stderr_handle = tokio::spawn(tee_stream(stderr, Arc::clone(&log)));

    let status = child.wait().await;

    if let Err(e) = stdout_handle.await {
        eprintln!("Failed to join stdout task: {}", e);
    }
    if let Err(e) = stderr_handle.await {
        eprintln!("Failed to join stderr task: {}", e);
    }

    // The readers flush per line; this catches the last buffered write.
    log.lock().await.flush().await?;

    status
}

async fn tee_stream<R: AsyncRead + Unpin>(stream: R, log: Arc<Mutex<File>>) {
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        println!("{}", line);
        let mut log = log.lock().await;
        if log.write_all(line.as_bytes()).await.is_ok() {
            let _ = log.write_all(b"\n").await;
            let _ = log.flush().await;
        }
    }
}
