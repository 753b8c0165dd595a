//! Trace formatting.

use std::io::Write;

use clap::ValueEnum;
use opl2::{RecordingBus, RegisterWrite};
use serde::Serialize;

/// Room for the longest command, the scale demo.
pub const TRACE_CAPACITY: usize = 1024;

pub type TraceBus = RecordingBus<TRACE_CAPACITY>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One `REG VALUE NAME` line per write
    Text,
    /// A JSON array of {register, value, name}
    Json,
}

#[derive(Serialize)]
struct Row {
    register: u8,
    value: u8,
    name: &'static str,
}

impl From<&RegisterWrite> for Row {
    fn from(write: &RegisterWrite) -> Self {
        Self {
            register: write.register,
            value: write.value,
            name: write.name(),
        }
    }
}

pub fn print_trace<W: Write>(
    out: &mut W,
    writes: &[RegisterWrite],
    format: Format,
) -> anyhow::Result<()> {
    match format {
        Format::Text => {
            for write in writes {
                writeln!(out, "{:02X} {:02X} {}", write.register, write.value, write.name())?;
            }
        }
        Format::Json => {
            let rows: Vec<Row> = writes.iter().map(Row::from).collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
