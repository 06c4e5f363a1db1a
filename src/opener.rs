use anyhow::{bail, Result};
use std::process::{Command, Stdio};

pub trait LinkOpener {
    fn open(&self, target: &str) -> Result<()>;
}

/// Hands links to whatever the desktop registers as the default handler.
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<()> {
        let mut errors = Vec::new();
        for (command, args) in candidates(target) {
            match Command::new(command)
                .args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                Ok(status) if status.success() => return Ok(()),
                Ok(status) => errors.push(format!("{command} exited {status}")),
                Err(err) => errors.push(format!("{command} failed: {err}")),
            }
        }
        if errors.is_empty() {
            bail!("no opener available");
        }
        bail!("{}", errors.join("; "))
    }
}

#[cfg(target_os = "windows")]
fn candidates(target: &str) -> Vec<(&'static str, Vec<&str>)> {
    vec![("cmd", vec!["/C", "start", "", target])]
}

#[cfg(target_os = "macos")]
fn candidates(target: &str) -> Vec<(&'static str, Vec<&str>)> {
    vec![("open", vec![target])]
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn candidates(target: &str) -> Vec<(&'static str, Vec<&str>)> {
    vec![
        ("xdg-open", vec![target]),
        ("gio", vec!["open", target]),
        ("kde-open5", vec![target]),
        ("kioclient5", vec!["exec", target]),
    ]
}
