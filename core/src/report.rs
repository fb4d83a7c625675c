//! # Aggregation and Output
//!
//! Turns the final record stream into one of the supported output shapes. The plain
//! and CSV shapes print records as they arrived; the clean and JSON shapes group them
//! into a [`ResultSet`], which orders addresses ascending and lists each hostname once
//! per address in first-seen order.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::net::IpAddr;

use serde::Serialize;

use hostsweep_common::config::OutputMode;
use hostsweep_common::record::Record;

/// Deduplicated hostnames per address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    hosts: BTreeMap<IpAddr, Vec<String>>,
}

impl ResultSet {
    pub fn from_records(records: &[Record]) -> Self {
        let mut hosts: BTreeMap<IpAddr, Vec<String>> = BTreeMap::new();
        for record in records {
            let names = hosts.entry(record.ip).or_default();
            if !names.contains(&record.name) {
                names.push(record.name.clone());
            }
        }
        Self { hosts }
    }

    pub fn names(&self, ip: &IpAddr) -> Option<&[String]> {
        self.hosts.get(ip).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IpAddr, &Vec<String>)> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[derive(Serialize)]
struct HostEntry<'a> {
    ip: String,
    names: &'a [String],
}

pub fn render(records: &[Record], mode: OutputMode) -> anyhow::Result<String> {
    let output = match mode {
        OutputMode::Plain => plain(records),
        OutputMode::Csv => csv(records),
        OutputMode::Clean => clean(&ResultSet::from_records(records)),
        OutputMode::Json => json(&ResultSet::from_records(records))?,
    };
    Ok(output)
}

fn plain(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "name: {} ip: {} method: {}",
            record.name, record.ip, record.source
        );
    }
    out
}

fn csv(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{},{},{}", record.name, record.ip, record.source);
    }
    out
}

fn clean(results: &ResultSet) -> String {
    let mut out = String::new();
    for (ip, names) in results.iter() {
        let _ = writeln!(out, "{ip}:");
        for name in names {
            let _ = writeln!(out, "    {name}");
        }
    }
    out
}

fn json(results: &ResultSet) -> anyhow::Result<String> {
    let entries: Vec<HostEntry> = results
        .iter()
        .map(|(ip, names)| HostEntry {
            ip: ip.to_string(),
            names,
        })
        .collect();

    let mut buffer: Vec<u8> = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    entries.serialize(&mut serializer)?;
    buffer.push(b'\n');

    Ok(String::from_utf8(buffer)?)
}
