//! Integration tests driving the `svcctl` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn svcctl() -> Command {
    Command::cargo_bin("svcctl").unwrap()
}

#[test]
fn test_missing_config_exits_with_status_1() {
    let temp_dir = tempdir().unwrap();

    svcctl()
        .current_dir(temp_dir.path())
        .arg("run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("read config config.json fail"))
        .stdout(predicate::str::contains("Bye!!"));
}

#[test]
fn test_invalid_config_exits_with_status_1() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("svc.json");
    std::fs::write(&config_path, "not json").unwrap();

    svcctl()
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("parse config"));
}

#[test]
fn test_unwritable_log_exits_before_config_load() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("missing").join("svc.log");

    svcctl()
        .current_dir(temp_dir.path())
        .args(["run", "-l"])
        .arg(&log_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("open log file"))
        .stdout(predicate::str::contains("read config").not());
}

#[test]
fn test_completed_run_exits_with_status_0() {
    let temp_dir = tempdir().unwrap();
    std::fs::write(temp_dir.path().join("config.json"), r#"{"run_for_secs": 0}"#).unwrap();

    svcctl()
        .current_dir(temp_dir.path())
        .args(["run", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server svcctl started"))
        .stdout(predicate::str::contains("run time elapsed"))
        .stdout(predicate::str::contains("DEBUG"))
        .stdout(predicate::str::contains("Bye!!"));
}

#[test]
fn test_empty_log_flag_keeps_console() {
    let temp_dir = tempdir().unwrap();
    std::fs::write(temp_dir.path().join("config.json"), r#"{"run_for_secs": 0}"#).unwrap();

    svcctl()
        .current_dir(temp_dir.path())
        .args(["run", "--log", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("server svcctl started"))
        .stdout(predicate::str::contains("write log to file").not());
}

#[cfg(unix)]
mod signals {
    use std::io::Read;
    use std::os::unix::process::ExitStatusExt;
    use std::path::Path;
    use std::process::{Child, Command, Stdio};
    use std::thread::sleep;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn wait_for_line(path: &Path, needle: &str, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Ok(content) = std::fs::read_to_string(path) {
                if content.contains(needle) {
                    return true;
                }
            }
            sleep(Duration::from_millis(20));
        }
        false
    }

    fn wait_for_exit(child: &mut Child, limit: Duration) -> Option<std::process::ExitStatus> {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Ok(Some(status)) = child.try_wait() {
                return Some(status);
            }
            sleep(Duration::from_millis(20));
        }
        let _ = child.kill();
        None
    }

    fn send(child: &Child, signal: libc::c_int) {
        let pid = libc::pid_t::try_from(child.id()).unwrap();
        assert_eq!(unsafe { libc::kill(pid, signal) }, 0);
    }

    #[test]
    fn test_sigterm_shuts_down_gracefully() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), "{}").unwrap();
        let log_path = temp_dir.path().join("svc.log");

        let mut child = Command::new(env!("CARGO_BIN_EXE_svcctl"))
            .current_dir(temp_dir.path())
            .args(["run", "--config", "config.json", "--log", "svc.log"])
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        assert!(wait_for_line(&log_path, "server svcctl started", Duration::from_secs(10)));
        send(&child, libc::SIGTERM);

        let status = wait_for_exit(&mut child, Duration::from_secs(10)).unwrap();
        assert!(status.success());

        let log_content = std::fs::read_to_string(&log_path).unwrap();
        assert!(log_content.contains("INFO"));
        assert!(log_content.contains("write log to file: svc.log"));
        assert!(log_content.contains("WARN"));
        assert!(log_content.contains("receive signal: SIGTERM"));
        assert!(!log_content.contains("Bye!!"));

        let mut stdout = String::new();
        child.stdout.take().unwrap().read_to_string(&mut stdout).unwrap();
        assert!(stdout.contains("close log file"));
        assert!(stdout.contains("Bye!!"));
    }

    #[test]
    fn test_sigint_shuts_down_gracefully() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), r#"{"name": "callback"}"#).unwrap();

        let log_path = temp_dir.path().join("svc.log");
        let mut child = Command::new(env!("CARGO_BIN_EXE_svcctl"))
            .current_dir(temp_dir.path())
            .args(["run", "-l", "svc.log"])
            .stdout(Stdio::null())
            .spawn()
            .unwrap();

        assert!(wait_for_line(&log_path, "server callback started", Duration::from_secs(10)));
        send(&child, libc::SIGINT);

        let status = wait_for_exit(&mut child, Duration::from_secs(10)).unwrap();
        assert!(status.success());
        let log_content = std::fs::read_to_string(&log_path).unwrap();
        assert!(log_content.contains("receive signal: SIGINT"));
        assert!(log_content.contains("server callback stopped"));
    }

    #[test]
    fn test_second_sigterm_gets_default_action() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), r#"{"drain_secs": 30}"#).unwrap();

        let log_path = temp_dir.path().join("svc.log");
        let mut child = Command::new(env!("CARGO_BIN_EXE_svcctl"))
            .current_dir(temp_dir.path())
            .args(["run", "-l", "svc.log"])
            .stdout(Stdio::null())
            .spawn()
            .unwrap();

        assert!(wait_for_line(&log_path, "server svcctl started", Duration::from_secs(10)));
        send(&child, libc::SIGTERM);
        assert!(wait_for_line(&log_path, "draining for 30 seconds", Duration::from_secs(10)));
        send(&child, libc::SIGTERM);

        let status = wait_for_exit(&mut child, Duration::from_secs(10)).unwrap();
        assert!(!status.success());
        assert_eq!(status.signal(), Some(libc::SIGTERM));
        let log_content = std::fs::read_to_string(&log_path).unwrap();
        assert!(!log_content.contains("server svcctl stopped"));
    }
}
