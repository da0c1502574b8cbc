//src/notify.rs
//! Best-effort desktop notifications via the platform's notifier
//! command. Failure is never surfaced to callers; it is logged and
//! swallowed.

use std::process::Command;

/// Fires a desktop notification. Always returns; a missing notifier
/// binary or a non-zero exit only produces a warn log.
pub fn notify(title: &str, subtitle: &str, body: &str) {
    if let Err(e) = send(title, subtitle, body) {
        tracing::warn!("desktop notification failed: {e}");
    }
}

#[cfg(target_os = "macos")]
fn send(title: &str, subtitle: &str, body: &str) -> std::io::Result<()> {
    // terminal-notifier is more reliable when installed; osascript is
    // the stock fallback.
    let result = Command::new("terminal-notifier")
        .args(["-title", title, "-subtitle", subtitle, "-message", body])
        .output();
    match result {
        Ok(_) => Ok(()),
        Err(_) => {
            let script = format!(
                "display notification \"{}\" with title \"{}\" subtitle \"{}\"",
                escape(body),
                escape(title),
                escape(subtitle),
            );
            Command::new("osascript").args(["-e", &script]).output()?;
            Ok(())
        }
    }
}

#[cfg(target_os = "linux")]
fn send(title: &str, subtitle: &str, body: &str) -> std::io::Result<()> {
    let heading = if subtitle.is_empty() {
        title.to_string()
    } else {
        format!("{title}: {subtitle}")
    };
    Command::new("notify-send").args([&heading, body]).output()?;
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn send(title: &str, _subtitle: &str, body: &str) -> std::io::Result<()> {
    tracing::debug!("no notifier on this platform; dropping '{title}: {body}'");
    Ok(())
}

#[cfg(target_os = "macos")]
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
