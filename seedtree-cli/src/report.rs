//! Colored verbose report of every generated value.

use std::io::{self, Write};

use colored::Colorize;
use seedtree_btc::{Observer, Scope, Step};

/// Width of the label column.
const LABEL_WIDTH: usize = 24;

/// Prints each step as it is produced.
pub struct Reporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Reporter<W> {
    /// Reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush and hand back the writer, surfacing the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    #[rustfmt::skip]
    fn write_step(&mut self, step: &Step<'_>) -> io::Result<()> {
        match (step.scope, step.label) {
            (Scope::Wallet, "entropy") => {
                writeln!(self.out)?;
                writeln!(self.out, "  {} {}", step.identity.display_name().green().bold(), format!("({})", step.identity.key()).dimmed())?;
            }
            (Scope::Master, "xprivMaster") => {
                writeln!(self.out, "    {}", "Master".yellow().bold())?;
            }
            (Scope::Child(index), "xpriv") => {
                writeln!(self.out, "    {}", format!("Child {index}").yellow().bold())?;
            }
            _ => {}
        }

        let label = format!("{:<LABEL_WIDTH$}", step.label);
        writeln!(self.out, "      {} {}", label.cyan().bold(), step.value)
    }
}

impl<W: Write> Observer for Reporter<W> {
    fn observe(&mut self, step: &Step<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_step(step) {
            self.error = Some(e);
        }
    }
}
