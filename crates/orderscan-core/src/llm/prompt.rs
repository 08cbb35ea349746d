//! Extraction prompt.

use crate::models::order::ORDER_COLUMNS;

/// Build the fixed extraction prompt for a document's text.
///
/// `kind_label` names the source format ("PDF", "CSV", "XLSX").
pub fn build_extraction_prompt(content: &str, kind_label: &str) -> String {
    let fields: String = ORDER_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == ORDER_COLUMNS.len() - 1 {
                format!("{}. {}（请根据物料英文描述生成对应的中文解释）\n", i + 1, name)
            } else {
                format!("{}. {}\n", i + 1, name)
            }
        })
        .collect();

    let header = format!("| {} |", ORDER_COLUMNS.join(" | "));
    let divider = format!("|{}", "------|".repeat(ORDER_COLUMNS.len()));
    let sample: Vec<String> = (1..=ORDER_COLUMNS.len()).map(|i| format!("数据{}", i)).collect();
    let sample = format!("| {} |", sample.join(" | "));
    let ellipsis = format!("| {} |", vec!["..."; ORDER_COLUMNS.len()].join(" | "));

    format!(
        "请分析以下{kind}格式的订单内容，提取以下{n}个字段的信息：\n\
         {fields}\n\
         请以Markdown表格形式返回结果，确保所有条目都被列出，不要遗漏任何信息。\n\
         表格格式必须严格按照以下格式：\n\
         {header}\n\
         {divider}\n\
         {sample}\n\
         {ellipsis}\n\n\
         注意：\n\
         1. 表格必须包含表头和分隔线\n\
         2. 每行数据必须包含{n}个字段\n\
         3. 不要添加任何额外的说明文字\n\
         4. 确保数据对齐\n\n\
         订单内容：\n\
         {content}\n",
        kind = kind_label,
        n = ORDER_COLUMNS.len(),
    )
}
