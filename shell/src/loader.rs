//! Bulk-load reader: one `key,value` pair per line, blank lines skipped,
//! malformed lines and duplicate keys reported and skipped, processing
//! continues past errors.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use btreeidx_core::{Index, IndexError};
use log::warn;

pub struct LoadSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

pub fn load_file<P: AsRef<Path>>(index: &mut Index, path: P) -> io::Result<LoadSummary> {
    let reader = BufReader::new(File::open(path)?);
    let mut summary = LoadSummary {
        inserted: 0,
        duplicates: 0,
        malformed: 0,
    };

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_record(trimmed) {
            Some((key, value)) => match index.insert(key, value) {
                Ok(()) => summary.inserted += 1,
                Err(IndexError::DuplicateKey { key }) => {
                    warn!("key {key} already exists, skipping");
                    summary.duplicates += 1;
                }
                Err(err) => return Err(io::Error::other(err)),
            },
            None => {
                warn!("invalid line in load file: {trimmed}");
                summary.malformed += 1;
            }
        }
    }

    Ok(summary)
}

fn parse_record(line: &str) -> Option<(u64, u64)> {
    let (key, value) = line.split_once(',')?;
    let key: u64 = key.trim().parse().ok()?;
    let value: u64 = value.trim().parse().ok()?;
    Some((key, value))
}
