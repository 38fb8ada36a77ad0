//! Extract writer: one `key,value` record per line, ascending key order.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use btreeidx_core::Index;

pub fn extract_to_file<P: AsRef<Path>>(index: &mut Index, path: P) -> io::Result<usize> {
    let pairs = index.traverse_inorder().map_err(io::Error::other)?;

    let mut file = File::create(path)?;
    for (key, value) in &pairs {
        writeln!(file, "{key},{value}")?;
    }

    Ok(pairs.len())
}
