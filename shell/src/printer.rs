//! In-order pretty-printer: `key value` per line, to any `Write` sink.

use std::io::{self, Write};

use btreeidx_core::Index;

pub fn print_inorder<W: Write>(index: &mut Index, out: &mut W) -> io::Result<()> {
    let pairs = index.traverse_inorder().map_err(io::Error::other)?;
    for (key, value) in pairs {
        writeln!(out, "{key} {value}")?;
    }
    Ok(())
}
