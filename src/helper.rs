//! Wrappers around the external storage helper commands.
//!
//! The emulated mass-storage drive is remounted and unlocked by privileged
//! helper programs configured by the operator. The contract is minimal: run
//! the command, forward its output to the log, fail on nonzero exit.

use std::process::{Command, Stdio};

pub fn remount_storage(base_cmd: &[String], rw: bool) -> Result<(), String> {
    let mode = if rw { "rw" } else { "ro" };
    let cmd: Vec<String> = base_cmd
        .iter()
        .map(|part| part.replace("{mode}", mode))
        .collect();

    log::info!("remounting internal storage to {mode}");

    run_helper(&cmd).map_err(|e| {
        log::error!("can't remount internal storage");
        e
    })
}

pub fn unlock_drive(base_cmd: &[String]) -> Result<(), String> {
    log::info!("unlocking the drive");

    run_helper(base_cmd).map_err(|e| {
        log::error!("can't unlock the drive");
        e
    })
}

pub fn run_helper(cmd: &[String]) -> Result<(), String> {
    let (argv0, args) = cmd
        .split_first()
        .ok_or_else(|| "empty helper command".to_string())?;

    log::info!("executing helper {cmd:?}");

    let output = Command::new(argv0)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("{argv0}: {e}"))?;

    for line in String::from_utf8_lossy(&output.stdout)
        .lines()
        .chain(String::from_utf8_lossy(&output.stderr).lines())
    {
        if output.status.success() {
            log::info!("helper: {line}");
        } else {
            log::error!("helper: {line}");
        }
    }

    if !output.status.success() {
        return Err(format!("helper {argv0} failed: {}", output.status));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_exit_is_ok() {
        assert_eq!(run_helper(&["true".to_string()]), Ok(()));
    }

    #[test]
    fn nonzero_exit_is_err() {
        let err = run_helper(&["false".to_string()]).unwrap_err();

        assert!(err.starts_with("helper false failed"));
    }

    #[test]
    fn mode_substitution() {
        let cmd = vec!["true".to_string(), "remount,{mode}".to_string()];

        assert_eq!(remount_storage(&cmd, true), Ok(()));
        assert_eq!(remount_storage(&cmd, false), Ok(()));
    }

    #[test]
    fn empty_command() {
        assert_eq!(run_helper(&[]), Err("empty helper command".to_string()));
    }
}
