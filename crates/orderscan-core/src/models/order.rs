//! Order table data model.

use serde::{Deserialize, Serialize};

/// Header text used to locate the order table in model output.
pub const ANCHOR_PHRASE: &str = "客户单据序号";

/// The eight fixed columns of an order table, in export order.
pub const ORDER_COLUMNS: [&str; 8] = [
    "客户单据序号",
    "客户询价号",
    "条目序号",
    "物料编码",
    "物料英文描述",
    "数量",
    "单位",
    "中文",
];

/// Default file name for CSV exports.
pub const DEFAULT_EXPORT_NAME: &str = "order_analysis.csv";

/// A single order line with the eight fixed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Customer document number (客户单据序号).
    pub document_number: String,

    /// Customer inquiry number (客户询价号).
    pub inquiry_number: String,

    /// Line number within the document (条目序号).
    pub line_number: String,

    /// Material code (物料编码).
    pub material_code: String,

    /// English material description (物料英文描述).
    pub description_en: String,

    /// Quantity, kept verbatim.
    pub quantity: String,

    /// Unit of measure (单位).
    pub unit: String,

    /// Generated Chinese description (中文).
    pub description_zh: String,
}

impl OrderLine {
    /// Build a line from exactly eight cells in column order.
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        let [doc, inquiry, line, code, en, qty, unit, zh] = cells else {
            return None;
        };
        Some(Self {
            document_number: doc.clone(),
            inquiry_number: inquiry.clone(),
            line_number: line.clone(),
            material_code: code.clone(),
            description_en: en.clone(),
            quantity: qty.clone(),
            unit: unit.clone(),
            description_zh: zh.clone(),
        })
    }

    /// Cells in column order.
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.document_number,
            &self.inquiry_number,
            &self.line_number,
            &self.material_code,
            &self.description_en,
            &self.quantity,
            &self.unit,
            &self.description_zh,
        ]
    }
}

/// Structured table parsed from a model response.
///
/// Every row has exactly as many cells as there are headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl OrderTable {
    /// Create a table, keeping only rows that match the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows.into_iter().filter(|r| r.len() == width).collect();
        Self { headers, rows }
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Typed view of the rows.
    ///
    /// Columns are mapped by position; header text is not checked. Tables that
    /// are not eight columns wide yield an empty view.
    pub fn lines(&self) -> Vec<OrderLine> {
        if self.column_count() != ORDER_COLUMNS.len() {
            return Vec::new();
        }
        self.rows
            .iter()
            .filter_map(|row| OrderLine::from_cells(row))
            .collect()
    }

    /// Render the table as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("| {} |\n", self.headers.join(" | ")));
        out.push_str(&format!("|{}\n", "------|".repeat(self.headers.len())));
        for row in &self.rows {
            out.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        out
    }
}
