//! Regex patterns for Markdown table cells.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // One cell of a divider row: `---`, `:---`, `---:` or `:---:`
    pub static ref DIVIDER_CELL: Regex = Regex::new(r"^:?-{3,}:?$").unwrap();
}

/// Check whether every cell of a row is a divider cell.
pub fn is_divider_row(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| DIVIDER_CELL.is_match(c))
}
