#![cfg(feature = "cli")]

use anyhow::Result;
use regex::Regex;
use std::io::Write;
use std::process::{Command, Output};

fn kernel_boot(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_kernel-boot"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

fn kernel_boot_with_rust_log(rust_log: &str) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_kernel-boot"))
        .env("RUST_LOG", rust_log)
        .output()?)
}

fn stderr_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_default_run_logs_init_and_exit_only() -> Result<()> {
    let output = kernel_boot(&[])?;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 2, "stderr: {:?}", lines);
    let pattern = Regex::new(
        r"^DEBUG:\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}\.\d{6} .+\.rs:\d+: App (Init|Exit)$",
    )?;
    assert!(pattern.is_match(&lines[0]));
    assert!(pattern.is_match(&lines[1]));
    assert!(lines[0].ends_with("App Init"));
    assert!(lines[1].ends_with("App Exit"));
    Ok(())
}

#[test]
fn test_markers_ignore_rust_log() -> Result<()> {
    for rust_log in ["", "warn", "error", "off", "kernel_boot=error"] {
        let output = kernel_boot_with_rust_log(rust_log)?;

        assert!(output.status.success());
        let lines = stderr_lines(&output);
        assert_eq!(lines.len(), 2, "RUST_LOG={:?}: {:?}", rust_log, lines);
        assert!(lines[0].ends_with("App Init"));
        assert!(lines[1].ends_with("App Exit"));
    }
    Ok(())
}

#[test]
fn test_markers_ignore_quiet_config_level() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[logging]\nlevel = \"warn\"")?;
    let path = file.path().to_string_lossy().to_string();

    let output = kernel_boot(&["--config", &path])?;

    assert!(output.status.success());
    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 2, "stderr: {:?}", lines);
    Ok(())
}

#[test]
fn test_prefix_flag() -> Result<()> {
    let output = kernel_boot(&["--prefix", "NODE:"])?;

    assert!(output.status.success());
    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("NODE:")));
    Ok(())
}

#[test]
fn test_config_file_is_applied() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[logging]\nformat = \"json\"")?;
    let path = file.path().to_string_lossy().to_string();

    let output = kernel_boot(&["--config", &path])?;

    assert!(output.status.success());
    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(&lines[0])?;
    assert_eq!(first["fields"]["message"], "App Init");
    Ok(())
}

#[test]
fn test_invalid_config_exits_before_logging() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[delegate]\nkind = \"command\"")?;
    let path = file.path().to_string_lossy().to_string();

    let output = kernel_boot(&["--config", &path])?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("delegate.program"));
    assert!(!stderr.contains("App Init"));
    Ok(())
}

#[test]
fn test_invalid_log_level_exits_with_one() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[logging]\nlevel = \"kernel_boot=loud\"")?;
    let path = file.path().to_string_lossy().to_string();

    let output = kernel_boot(&["--config", &path])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("App Init"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_command_delegate_runs_between_markers() -> Result<()> {
    let output = kernel_boot(&["--", "sh", "-c", "echo kernel-output"])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "kernel-output");

    let lines = stderr_lines(&output);
    assert!(lines.first().is_some_and(|l| l.ends_with("App Init")));
    assert!(lines.last().is_some_and(|l| l.ends_with("App Exit")));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_command_still_exits_zero() -> Result<()> {
    let output = kernel_boot(&["--", "sh", "-c", "exit 7"])?;

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exited with failure"));
    assert!(stderr.trim_end().ends_with("App Exit"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_interrupt_lets_application_shut_down_gracefully() -> Result<()> {
    use std::os::unix::process::CommandExt;
    use std::process::Stdio;
    use std::time::Duration;

    let dir = tempfile::tempdir()?;
    let script = "trap 'sleep 0.3; touch graceful; exit 0' INT; while true; do sleep 0.05; done";

    // Own process group, so the interrupt reaches launcher and application
    // the way a terminal delivers Ctrl-C.
    let child = Command::new(env!("CARGO_BIN_EXE_kernel-boot"))
        .args(["--", "sh", "-c", script])
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .stderr(Stdio::piped())
        .process_group(0)
        .spawn()?;

    std::thread::sleep(Duration::from_millis(500));
    let status = Command::new("sh")
        .args(["-c", &format!("kill -INT -- -{}", child.id())])
        .status()?;
    assert!(status.success());

    let output = child.wait_with_output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(dir.path().join("graceful").exists(), "stderr: {}", stderr);
    assert!(!stderr.contains("SIGKILL"));
    assert!(stderr.contains("Application process exited"));
    assert!(stderr.trim_end().ends_with("App Exit"));
    Ok(())
}
