use anyhow::{Context, Result};
use console::StyledObject;
use std::fmt::Display;
use std::future::Future;
use std::io::{self, Write};
use std::path::Path;

/// Bold ANSI styling, kept even when stdout is not a terminal (CI logs render it).
pub fn bold<D: Display>(value: D) -> StyledObject<D> {
    console::style(value).bold().force_styling(true)
}

/// Escape data for a workflow command so multi-line messages survive.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Progress and result messages, written as runner workflow commands.
pub struct Reporter<W: Write> {
    out: W,
    failed: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn start_group(&mut self, title: &str) {
        let _ = writeln!(self.out, "::group::{}", escape_data(title));
    }

    pub fn end_group(&mut self) {
        let _ = writeln!(self.out, "::endgroup::");
    }

    /// Run `fut` inside a collapsible group; the group is closed whatever the outcome.
    pub async fn group<F: Future>(&mut self, title: &str, fut: F) -> F::Output {
        self.start_group(title);
        let output = fut.await;
        self.end_group();
        output
    }

    pub fn info(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }

    pub fn warning(&mut self, message: &str) {
        let _ = writeln!(self.out, "::warning::{}", escape_data(message));
    }

    /// Mark the run as failed. The caller stops the pipeline and exits non-zero.
    pub fn set_failed(&mut self, message: &str) {
        self.failed = true;
        let _ = writeln!(self.out, "::error::{}", escape_data(message));
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Append `name=value` lines to the runner's step-output file.
pub fn write_step_outputs(path: &Path, outputs: &[(&str, &str)]) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open step output file {}", path.display()))?;
    for (name, value) in outputs {
        writeln!(file, "{name}={value}")
            .with_context(|| format!("Failed to write step output '{name}'"))?;
    }
    Ok(())
}
