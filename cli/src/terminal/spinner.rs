use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

pub(crate) static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

/// Shows the spinner until [`finish`] is called. Quiet runs get a hidden bar.
pub fn start(targets: usize, methods: usize, quiet: bool) {
    let pb = SPINNER.get_or_init(|| init_spinner(quiet));
    pb.set_message(format!(
        "Sweeping {} targets with {} methods...",
        targets.to_string().green().bold(),
        methods.to_string().green().bold()
    ));
}

pub fn finish() {
    if let Some(pb) = SPINNER.get() {
        pb.finish_and_clear();
    }
}

fn init_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Log sink that keeps log lines from tearing through the spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match SPINNER.get() {
            Some(pb) => pb.suspend(|| std::io::stderr().write_all(buf))?,
            None => std::io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}
