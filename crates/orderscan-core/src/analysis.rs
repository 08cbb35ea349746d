//! Order analysis pipeline: extract text, prompt the model, parse its table.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::document::{self, DocumentInfo, SourceDocument};
use crate::error::{OrderError, Result};
use crate::llm::{CompletionBackend, build_extraction_prompt};
use crate::models::config::TableConfig;
use crate::models::order::OrderTable;
use crate::table::{MarkdownTableParser, TableParser};

/// Outcome of analyzing one document.
///
/// The raw model answer is always kept. `table` is set when the answer held a
/// usable table, otherwise `parse_error` says why not.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Details of the analyzed file.
    pub source: DocumentInfo,
    /// Model answer, verbatim.
    pub raw_response: String,
    /// Parsed table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<OrderTable>,
    /// Why no table could be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    /// When the analysis finished.
    pub analyzed_at: DateTime<Utc>,
    /// Total processing time in milliseconds.
    pub elapsed_ms: u64,
}

impl AnalysisReport {
    /// Check whether a CSV export is available.
    pub fn is_exportable(&self) -> bool {
        self.table.is_some()
    }
}

/// Runs documents through extraction, completion and table parsing.
pub struct OrderAnalyzer<B> {
    backend: B,
    parser: MarkdownTableParser,
}

impl<B: CompletionBackend> OrderAnalyzer<B> {
    /// Create an analyzer with the default table parser.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            parser: MarkdownTableParser::new(),
        }
    }

    /// Use the anchor and separator from the table settings.
    pub fn with_table_config(mut self, config: &TableConfig) -> Self {
        self.parser = MarkdownTableParser::from_config(config);
        self
    }

    /// Get the completion backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Analyze one document.
    ///
    /// Extraction and API failures are errors. A response without a usable
    /// table still produces a report, carrying the parse error.
    pub async fn analyze(&self, document: &SourceDocument) -> Result<AnalysisReport> {
        let start = Instant::now();

        let content = document::extract_text(document)?;
        let prompt = build_extraction_prompt(&content, document.kind.label());

        info!("Requesting completion for {} ({} prompt chars)", document.name, prompt.chars().count());
        let raw_response = self.backend.complete(&prompt).await?;

        let (table, parse_error) = match self.parser.parse(&raw_response) {
            Ok(table) => {
                info!("Parsed {} order lines", table.len());
                (Some(table), None)
            }
            Err(e) => {
                warn!("Model response has no usable table: {}", e);
                (None, Some(e.to_string()))
            }
        };

        Ok(AnalysisReport {
            source: document.info(),
            raw_response,
            table,
            parse_error,
            analyzed_at: Utc::now(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// One user's working state: the current document and its last report.
///
/// Loading a new document discards the previous report.
#[derive(Debug, Default)]
pub struct Session {
    document: Option<SourceDocument>,
    report: Option<AnalysisReport>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current document, dropping any earlier result.
    pub fn load_document(&mut self, document: SourceDocument) -> DocumentInfo {
        let info = document.info();
        self.document = Some(document);
        self.report = None;
        info
    }

    /// Current document, if any.
    pub fn document(&self) -> Option<&SourceDocument> {
        self.document.as_ref()
    }

    /// Last report, if any.
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Analyze the current document and keep the report.
    ///
    /// A failed run leaves the previous report in place.
    pub async fn analyze<B: CompletionBackend>(
        &mut self,
        analyzer: &OrderAnalyzer<B>,
    ) -> Result<&AnalysisReport> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| OrderError::Config("no document loaded".to_string()))?;

        let report = analyzer.analyze(document).await?;
        Ok(self.report.insert(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use crate::error::LlmError;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Backend returning canned answers and recording prompts.
    struct FakeBackend {
        answer: std::result::Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionBackend for FakeBackend {
        async fn complete(&self, prompt: &str) -> crate::llm::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    body: "quota exceeded".to_string(),
                }),
            }
        }
    }

    const ANSWER: &str = "| 客户单据序号 | 客户询价号 | 条目序号 | 物料编码 | 物料英文描述 | 数量 | 单位 | 中文 |
|---|---|---|---|---|---|---|---|
| PO-1 | RFQ-1 | 1 | M-1 | Hex bolt | 10 | PCS | 六角螺栓 |
| PO-1 | RFQ-1 | 2 | M-2 | Flat washer | 20 | PCS | 平垫圈 |";

    fn csv_document() -> SourceDocument {
        SourceDocument::new(
            "order.csv",
            DocumentKind::Csv,
            "PO,Item,Qty\nPO-1,Hex bolt,10\nPO-1,Flat washer,20\n".as_bytes().to_vec(),
        )
    }

    #[tokio::test]
    async fn test_analyze_parses_table() {
        let analyzer = OrderAnalyzer::new(FakeBackend::answering(ANSWER));
        let report = analyzer.analyze(&csv_document()).await.unwrap();

        assert!(report.is_exportable());
        assert_eq!(report.table.as_ref().unwrap().len(), 2);
        assert_eq!(report.source.name, "order.csv");
        assert_eq!(report.raw_response, ANSWER);

        let prompts = analyzer.backend().prompts.lock().unwrap();
        assert!(prompts[0].contains("CSV格式"));
        assert!(prompts[0].contains("Flat washer"));
    }

    #[tokio::test]
    async fn test_unparseable_answer_keeps_raw_response() {
        let analyzer = OrderAnalyzer::new(FakeBackend::answering("抱歉，无法识别订单。"));
        let report = analyzer.analyze(&csv_document()).await.unwrap();

        assert!(!report.is_exportable());
        assert_eq!(report.raw_response, "抱歉，无法识别订单。");
        assert!(report.parse_error.as_deref().unwrap().contains("客户单据序号"));
    }

    #[tokio::test]
    async fn test_api_failure_is_error() {
        let analyzer = OrderAnalyzer::new(FakeBackend::failing(402));
        let err = analyzer.analyze(&csv_document()).await.unwrap_err();
        assert!(matches!(err, OrderError::Llm(LlmError::Api { status: 402, .. })));
    }

    #[tokio::test]
    async fn test_empty_document_skips_backend() {
        let analyzer = OrderAnalyzer::new(FakeBackend::answering(ANSWER));
        let doc = SourceDocument::new("empty.csv", DocumentKind::Csv, Vec::new());

        assert!(matches!(analyzer.analyze(&doc).await, Err(OrderError::Document(_))));
        assert!(analyzer.backend().prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_table_config() {
        let config = TableConfig {
            anchor: "Order".to_string(),
            separator: ';',
        };
        let analyzer = OrderAnalyzer::new(FakeBackend::answering("Order ; Qty\n--- ; ---\nA ; 1"))
            .with_table_config(&config);

        let report = analyzer.analyze(&csv_document()).await.unwrap();
        assert_eq!(report.table.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_replaces_report_on_new_document() {
        let analyzer = OrderAnalyzer::new(FakeBackend::answering(ANSWER));
        let mut session = Session::new();
        assert!(session.analyze(&analyzer).await.is_err());

        session.load_document(csv_document());
        session.analyze(&analyzer).await.unwrap();
        assert!(session.report().is_some());

        let info = session.load_document(csv_document());
        assert_eq!(info.size, csv_document().size());
        assert!(session.report().is_none());
    }

    #[tokio::test]
    async fn test_session_keeps_report_after_failed_run() {
        let analyzer = OrderAnalyzer::new(FakeBackend::answering(ANSWER));
        let mut session = Session::new();
        session.load_document(csv_document());
        session.analyze(&analyzer).await.unwrap();

        session.document = Some(SourceDocument::new("empty.csv", DocumentKind::Csv, Vec::new()));
        assert!(session.analyze(&analyzer).await.is_err());
        assert_eq!(session.report().unwrap().source.name, "order.csv");
    }

    #[test]
    fn test_report_serializes_without_empty_fields() {
        let report = AnalysisReport {
            source: csv_document().info(),
            raw_response: "x".to_string(),
            table: None,
            parse_error: Some("no valid data rows found".to_string()),
            analyzed_at: Utc::now(),
            elapsed_ms: 5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("table").is_none());
        assert_eq!(json["parse_error"], "no valid data rows found");
    }
}
