//! Anchor-based Markdown table parser.

use tracing::{debug, trace};

use crate::error::TableError;
use crate::models::config::TableConfig;
use crate::models::order::{ANCHOR_PHRASE, OrderTable};

use super::patterns::is_divider_row;
use super::{Result, TableParser};

/// Parser for the Markdown table returned by the completion API.
///
/// The header row is the first line holding both the separator and the
/// anchor phrase. The line right after it is taken to be the divider and
/// skipped; every later line holding the separator is a candidate data row.
/// Rows whose cell count differs from the header's are dropped.
#[derive(Debug, Clone)]
pub struct MarkdownTableParser {
    anchor: String,
    separator: char,
}

impl MarkdownTableParser {
    /// Create a parser with the default anchor and `|` separator.
    pub fn new() -> Self {
        Self {
            anchor: ANCHOR_PHRASE.to_string(),
            separator: '|',
        }
    }

    /// Create a parser from the table settings.
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new()
            .with_anchor(config.anchor.clone())
            .with_separator(config.separator)
    }

    /// Set the anchor phrase.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Set the column separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Get the anchor phrase.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    fn find_header(&self, lines: &[&str]) -> Option<usize> {
        lines
            .iter()
            .position(|line| line.contains(self.separator) && line.contains(self.anchor.as_str()))
    }

    fn split_header(&self, line: &str) -> Vec<String> {
        line.split(self.separator)
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(String::from)
            .collect()
    }

    fn split_row(&self, line: &str) -> Vec<String> {
        line.trim()
            .trim_matches(self.separator)
            .split(self.separator)
            .map(|cell| cell.trim().to_string())
            .collect()
    }
}

impl Default for MarkdownTableParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TableParser for MarkdownTableParser {
    fn parse(&self, text: &str) -> Result<OrderTable> {
        let lines: Vec<&str> = text.trim().lines().collect();

        let start = self
            .find_header(&lines)
            .ok_or_else(|| TableError::HeaderNotFound(self.anchor.clone()))?;

        let headers = self.split_header(lines[start]);
        debug!("Found table header at line {} with {} columns", start + 1, headers.len());

        let mut rows = Vec::new();
        let mut dropped = 0usize;

        for (offset, line) in lines.iter().enumerate().skip(start + 2) {
            if !line.contains(self.separator) {
                continue;
            }

            let cells = self.split_row(line);
            if cells.len() != headers.len() {
                debug!(
                    "Dropping line {}: {} cells, expected {}",
                    offset + 1,
                    cells.len(),
                    headers.len()
                );
                dropped += 1;
                continue;
            }

            // Repeated header/divider pairs show up when the model splits a long table.
            if is_divider_row(&cells) || cells == headers {
                trace!("Skipping repeated header or divider at line {}", offset + 1);
                continue;
            }

            rows.push(cells);
        }

        if rows.is_empty() {
            return Err(TableError::NoValidRows);
        }

        debug!("Parsed {} rows, dropped {}", rows.len(), dropped);
        Ok(OrderTable::new(headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::ORDER_COLUMNS;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "| 客户单据序号 | 客户询价号 | 条目序号 | 物料编码 | 物料英文描述 | 数量 | 单位 | 中文 |";
    const DIVIDER: &str = "|------------|------------|---------|---------|------------|------|------|------|";

    fn row(n: usize) -> String {
        format!("| PO-7781 | RFQ-2024-{n} | {n} | MAT-{n:04} | Hex bolt M{n} | {n}0 | PCS | 六角螺栓 |")
    }

    fn table_text(rows: &[String]) -> String {
        let mut text = String::from("以下是提取结果：\n\n");
        text.push_str(HEADER);
        text.push('\n');
        text.push_str(DIVIDER);
        text.push('\n');
        for r in rows {
            text.push_str(r);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_well_formed_table() {
        let rows: Vec<String> = (1..=5).map(row).collect();
        let table = MarkdownTableParser::new().parse(&table_text(&rows)).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.headers(), ORDER_COLUMNS.map(String::from).as_slice());
        assert_eq!(table.rows()[2][1], "RFQ-2024-3");
        assert_eq!(table.rows()[4][7], "六角螺栓");
    }

    #[test]
    fn test_drops_rows_with_wrong_cell_count() {
        let rows = vec![
            row(1),
            "| PO-7781 | RFQ | 2 | MAT-2 | Washer | 5 | PCS |".to_string(),
            row(3),
            "| a | b | c | d | e | f | g | h | i |".to_string(),
        ];
        let table = MarkdownTableParser::new().parse(&table_text(&rows)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][2], "1");
        assert_eq!(table.rows()[1][2], "3");
    }

    #[test]
    fn test_missing_anchor_is_error() {
        let text = "| 序号 | 物料 |\n|---|---|\n| 1 | bolt |";
        let err = MarkdownTableParser::new().parse(text).unwrap_err();
        assert_eq!(err, TableError::HeaderNotFound(ANCHOR_PHRASE.to_string()));
    }

    #[test]
    fn test_anchor_without_separator_is_not_header() {
        let text = "客户单据序号 was not found in this document.";
        let err = MarkdownTableParser::new().parse(text).unwrap_err();
        assert!(matches!(err, TableError::HeaderNotFound(_)));
    }

    #[test]
    fn test_all_invalid_rows_is_error() {
        let rows = vec!["| only | three | cells |".to_string()];
        let err = MarkdownTableParser::new().parse(&table_text(&rows)).unwrap_err();
        assert_eq!(err, TableError::NoValidRows);
    }

    #[test]
    fn test_header_only_is_error() {
        let err = MarkdownTableParser::new().parse(&table_text(&[])).unwrap_err();
        assert_eq!(err, TableError::NoValidRows);
    }

    #[test]
    fn test_ignores_prose_and_code_fences() {
        let text = format!(
            "```markdown\n{}\n{}\n{}\n```\n\n以上共1条记录。",
            HEADER,
            DIVIDER,
            row(1)
        );
        let table = MarkdownTableParser::new().parse(&text).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rows_without_outer_pipes() {
        let text = format!(
            "{}\n{}\nPO-1 | RFQ-1 | 1 | M-1 | Nut | 4 | PCS | 螺母",
            HEADER, DIVIDER
        );
        let table = MarkdownTableParser::new().parse(&text).unwrap();
        assert_eq!(table.rows()[0][0], "PO-1");
        assert_eq!(table.rows()[0][7], "螺母");
    }

    #[test]
    fn test_indented_rows_are_kept() {
        let text = format!("{}\n{}\n    {}  ", HEADER, DIVIDER, row(1));
        let table = MarkdownTableParser::new().parse(&text).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_cells_are_preserved() {
        let text = format!("{}\n{}\n| PO-1 |  | 1 | M-1 | Nut | 4 | PCS | 螺母 |", HEADER, DIVIDER);
        let table = MarkdownTableParser::new().parse(&text).unwrap();
        assert_eq!(table.rows()[0][1], "");
    }

    #[test]
    fn test_repeated_header_and_divider_skipped() {
        let rows = vec![row(1), HEADER.to_string(), DIVIDER.to_string(), row(2)];
        let table = MarkdownTableParser::new().parse(&table_text(&rows)).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_custom_anchor_and_separator() {
        let text = "Order ; Qty\n--- ; ---\nA-1 ; 3\nA-2 ; 5\nbroken";
        let table = MarkdownTableParser::new()
            .with_anchor("Order")
            .with_separator(';')
            .parse(text)
            .unwrap();
        assert_eq!(table.headers(), &["Order".to_string(), "Qty".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec!["A-2".to_string(), "5".to_string()]);
    }

    #[test]
    fn test_from_config() {
        let config = TableConfig {
            anchor: "Order".to_string(),
            separator: ';',
        };
        let parser = MarkdownTableParser::from_config(&config);
        assert_eq!(parser.anchor(), "Order");

        let table = parser.parse("Order ; Qty\n--- ; ---\nA-1 ; 3").unwrap();
        assert_eq!(table.rows()[0], vec!["A-1".to_string(), "3".to_string()]);

        let default = MarkdownTableParser::from_config(&TableConfig::default());
        assert_eq!(default.anchor(), ANCHOR_PHRASE);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = table_text(&[row(1), row(2)]).replace('\n', "\r\n");
        let table = MarkdownTableParser::new().parse(&text).unwrap();
        assert_eq!(table.len(), 2);
    }
}
