//! Plain-text tables for listings.

use anyhow::Result;
use std::io::Write;

/// Write rows under a header and an `=` underline, columns padded to width.
///
/// Trailing whitespace is trimmed from every line, so an empty last column
/// leaves no padding behind.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_table<const N: usize>(out: &mut dyn Write, header: [&str; N], rows: &[[&str; N]]) -> Result<()> {
    let mut widths = header.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let rules = header.map(|h| "=".repeat(h.len()));
    let underline: [&str; N] = std::array::from_fn(|i| rules[i].as_str());

    for row in std::iter::once(&header).chain(std::iter::once(&underline)).chain(rows) {
        let line: Vec<String> =
            row.iter().zip(&widths).map(|(cell, &width)| format!("{cell:<width$}")).collect();
        writeln!(out, "{}", line.join(" ").trim_end())?;
    }
    Ok(())
}
