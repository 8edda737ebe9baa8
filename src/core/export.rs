use crate::domain::model::ResultRow;
use crate::utils::error::Result;
use serde_json::Value;

fn text_at(record: &Value, pointer: &str) -> Option<String> {
    match record.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn inventor_names(record: &Value) -> Option<String> {
    let names: Vec<&str> = record
        .pointer("/applicationMetaData/inventorBag")?
        .as_array()?
        .iter()
        .filter_map(|inventor| inventor.get("inventorNameText")?.as_str())
        .filter(|name| !name.trim().is_empty())
        .collect();
    (!names.is_empty()).then(|| names.join("; "))
}

/// 從 ODP 記錄取出表格欄位，缺值時留空
pub fn result_row(record: &Value) -> ResultRow {
    ResultRow {
        title: text_at(record, "/applicationMetaData/inventionTitle")
            .or_else(|| text_at(record, "/inventionTitle"))
            .unwrap_or_default(),
        application_number: text_at(record, "/applicationNumberText").unwrap_or_default(),
        filing_date: text_at(record, "/applicationMetaData/filingDate").unwrap_or_default(),
        inventor: text_at(record, "/applicationMetaData/firstInventorName")
            .or_else(|| inventor_names(record))
            .or_else(|| text_at(record, "/inventorNameText"))
            .unwrap_or_default(),
        status: text_at(record, "/applicationMetaData/applicationStatusDescriptionText")
            .unwrap_or_default(),
    }
}

/// Formats ODP records as CSV. The header row is always written, even when
/// there are no records.
pub fn format_results_for_csv(results: &[Value]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ResultRow::HEADERS)?;
    for record in results {
        writer.serialize(result_row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `patent_search_results_YYYYMMDD_HHMMSS.csv`
pub fn export_filename(now: chrono::NaiveDateTime) -> String {
    format!("patent_search_results_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_row_from_metadata() {
        let record = json!({
            "applicationNumberText": "17123456",
            "applicationMetaData": {
                "inventionTitle": "Battery cooling system",
                "filingDate": "2021-03-04",
                "firstInventorName": "Ada Lovelace",
                "applicationStatusDescriptionText": "Patented Case"
            }
        });

        let row = result_row(&record);

        assert_eq!(row.title, "Battery cooling system");
        assert_eq!(row.application_number, "17123456");
        assert_eq!(row.filing_date, "2021-03-04");
        assert_eq!(row.inventor, "Ada Lovelace");
        assert_eq!(row.status, "Patented Case");
    }

    #[test]
    fn test_result_row_fallbacks() {
        let record = json!({
            "inventionTitle": "Top-level title",
            "applicationNumberText": 16000001,
            "applicationMetaData": {
                "inventorBag": [
                    {"inventorNameText": "Grace Hopper"},
                    {"inventorNameText": ""},
                    {"inventorNameText": "Alan Turing"}
                ]
            }
        });

        let row = result_row(&record);

        assert_eq!(row.title, "Top-level title");
        assert_eq!(row.application_number, "16000001");
        assert_eq!(row.inventor, "Grace Hopper; Alan Turing");
        assert_eq!(row.filing_date, "");
        assert_eq!(row.status, "");
    }

    #[test]
    fn test_result_row_inventor_name_text() {
        let row = result_row(&json!({"inventorNameText": "Solo Inventor"}));
        assert_eq!(row.inventor, "Solo Inventor");
    }

    #[test]
    fn test_csv_header_without_results() {
        let csv = format_results_for_csv(&[]).unwrap();
        assert_eq!(csv, "Title,Application Number,Filing Date,Inventor,Status\n");
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let records = vec![json!({
            "applicationNumberText": "15000000",
            "applicationMetaData": {
                "inventionTitle": "Widget, improved",
                "filingDate": "2018-01-02",
                "firstInventorName": "Doe, Jane",
                "applicationStatusDescriptionText": "Abandoned"
            }
        })];

        let csv = format_results_for_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"Widget, improved\",15000000,2018-01-02,\"Doe, Jane\",Abandoned"
        );
    }

    #[test]
    fn test_export_filename_format() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(export_filename(now), "patent_search_results_20240506_070809.csv");
    }
}
