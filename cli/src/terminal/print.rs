use std::time::Duration;

use colored::*;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "hostsweep::print";

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str, quiet: bool) {
    if quiet {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = console::measure_text_width(&formatted);

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: String = format!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right).bright_black()
    );

    print(&line);
}

pub fn fat_separator() {
    print(&format!("{}", "═".repeat(TOTAL_WIDTH).bright_black()));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}", space, msg));
}

pub fn summary(records: usize, hosts: usize, total_time: Duration, quiet: bool) {
    if quiet {
        return;
    }

    let records: ColoredString = format!("{records} names").bold().green();
    let hosts: ColoredString = format!("{hosts} addresses").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    fat_separator();
    centerln(&format!("Sweep Complete: {records} on {hosts} in {total_time}"));
}
