//! Locating the board's mounted filesystem.
//!
//! The CircuitPython firmware exposes its flash as a FAT volume labelled
//! CIRCUITPY. On Linux the mount point is discovered with `findmnt`; if the
//! volume is present but not mounted, it is mounted through `udisksctl` so
//! no elevated privileges are needed.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::constants::BOARD_VOLUME_LABEL;
use crate::error::PadmapError;

/// Resolves the directory the binding file lives in.
///
/// An explicit path is validated and used as-is; otherwise the board is
/// auto-detected. Fails with [`PadmapError::DeviceNotFound`] when no board
/// filesystem can be found.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_dir() {
            return Err(PadmapError::not_found(format!(
                "Specified board path does not exist: {}",
                path.display()
            ))
            .into());
        }
        return Ok(path.to_path_buf());
    }
    auto_detect()
}

#[cfg(target_os = "linux")]
fn auto_detect() -> Result<PathBuf> {
    // Already mounted?
    let output = run_command("findmnt", &["-lo", "SOURCE,LABEL,TARGET"])?;
    if let Some(target) = parse_findmnt(&output) {
        debug!(target, "board filesystem already mounted");
        return Ok(PathBuf::from(target));
    }

    // Connected but unmounted: find the block device and mount it.
    let output = run_command("lsblk", &["-o", "PATH,LABEL"])?;
    let Some(device) = parse_lsblk(&output) else {
        return Err(PadmapError::not_found(
            "No programmable board with a file system was detected.",
        )
        .into());
    };

    debug!(device, "mounting board filesystem");
    let mount_output = Command::new("udisksctl")
        .args(["mount", "-b", &device])
        .output()
        .context("Failed to run udisksctl")?;
    let stdout = String::from_utf8_lossy(&mount_output.stdout);
    if !mount_output.status.success() {
        let stderr = String::from_utf8_lossy(&mount_output.stderr);
        return Err(PadmapError::not_found(format!(
            "Failed to mount {device}: {}",
            if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() }
        ))
        .into());
    }

    parse_udisksctl(&stdout)
        .map(PathBuf::from)
        .ok_or_else(|| {
            PadmapError::not_found(format!(
                "Could not parse mount point from udisksctl output: {}",
                stdout.trim()
            ))
            .into()
        })
}

#[cfg(not(target_os = "linux"))]
fn auto_detect() -> Result<PathBuf> {
    Err(PadmapError::not_found(
        "Board path auto-detect is not supported on this OS. \
         Specify the board directory with --path.",
    )
    .into())
}

#[cfg(target_os = "linux")]
fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {program}"))?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extracts the mount target from `findmnt -lo SOURCE,LABEL,TARGET` output.
///
/// Sample lines:
/// `/dev/sdc1             /media/user/CIRCUITPY`  (label column empty)
/// `/dev/sdd1   CIRCUITPY /media/user/CIRCUITPY`
///
/// Only three-field lines name a live mount; two-field lines are stale
/// entries for disconnected devices and are ignored.
fn parse_findmnt(output: &str) -> Option<&str> {
    output
        .lines()
        .filter(|line| line.contains(BOARD_VOLUME_LABEL))
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|fields| fields.len() == 3)
        .map(|fields| fields[2])
}

/// Extracts the block device path from `lsblk -o PATH,LABEL` output.
///
/// Sample line: `/dev/sdc1   CIRCUITPY`
fn parse_lsblk(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains(BOARD_VOLUME_LABEL))
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

/// Extracts the mount point from `udisksctl mount` output.
///
/// Sample: `Mounted /dev/sdc1 at /media/user/CIRCUITPY.` (the trailing
/// period is absent in newer udisks2 releases).
fn parse_udisksctl(output: &str) -> Option<&str> {
    output
        .trim()
        .rsplit(' ')
        .next()
        .map(|path| path.trim_end_matches('.'))
        .filter(|path| path.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_findmnt_mounted() {
        let output = "/dev/sdd1   CIRCUITPY /media/user/CIRCUITPY\n";
        assert_eq!(parse_findmnt(output), Some("/media/user/CIRCUITPY"));
    }

    #[test]
    fn test_parse_findmnt_skips_stale_entries() {
        // Two-field lines are mounts whose device disappeared.
        let output = "/dev/sdc1             /media/user/CIRCUITPY\n";
        assert_eq!(parse_findmnt(output), None);
    }

    #[test]
    fn test_parse_findmnt_ignores_other_volumes() {
        let output = "/dev/sda1   EFI       /boot/efi\n";
        assert_eq!(parse_findmnt(output), None);
        assert_eq!(parse_findmnt(""), None);
    }

    #[test]
    fn test_parse_lsblk() {
        let output = "/dev/sda1   \n/dev/sdc1   CIRCUITPY\n";
        assert_eq!(parse_lsblk(output), Some("/dev/sdc1".to_string()));
        assert_eq!(parse_lsblk("/dev/sda1   DATA\n"), None);
    }

    #[test]
    fn test_parse_udisksctl() {
        assert_eq!(
            parse_udisksctl("Mounted /dev/sdc1 at /media/user/CIRCUITPY.\n"),
            Some("/media/user/CIRCUITPY")
        );
        assert_eq!(
            parse_udisksctl("Mounted /dev/sdc1 at /media/user/CIRCUITPY\n"),
            Some("/media/user/CIRCUITPY")
        );
        assert_eq!(parse_udisksctl("Object registered\n"), None);
    }
}
