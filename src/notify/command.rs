//! Hand notifications to an external program
//!
//! The rendered message goes to the program's stdin. Severity and template
//! key are passed as `BIDWATCH_SEVERITY` and `BIDWATCH_TEMPLATE`, so one
//! script can route urgent ones to SMS and the rest to the desktop.
use super::*;
use anyhow::{bail, format_err, Context};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// `command` is split on whitespace; no shell is involved.
    pub fn new(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(ToOwned::to_owned);
        let program = words
            .next()
            .ok_or_else(|| format_err!("empty notify command"))?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn new_shared(command: &str) -> Result<SharedNotifier> {
        Ok(Arc::new(Self::new(command)?))
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("BIDWATCH_SEVERITY", notification.severity.to_string())
            .env("BIDWATCH_TEMPLATE", notification.template.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("spawning notify command {:?}", self.program))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| format_err!("notify command has no stdin"))?;
            stdin
                .write_all(notification.render().as_bytes())
                .context("writing to notify command")?;
        }

        let status = child.wait().context("waiting for notify command")?;
        debug!(program = %self.program, %status, "notify command finished");
        if !status.success() {
            bail!("notify command {:?} exited with {status}", self.program);
        }
        Ok(())
    }
}
