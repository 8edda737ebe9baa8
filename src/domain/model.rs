use crate::utils::error::PatentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 搜尋類型，順序即為表單下拉選單的順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Simple,
    Boolean,
    Wildcard,
    FieldSpecific,
    Range,
    Filtered,
    Faceted,
}

impl SearchType {
    pub const ALL: [SearchType; 7] = [
        SearchType::Simple,
        SearchType::Boolean,
        SearchType::Wildcard,
        SearchType::FieldSpecific,
        SearchType::Range,
        SearchType::Filtered,
        SearchType::Faceted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Simple => "simple",
            SearchType::Boolean => "boolean",
            SearchType::Wildcard => "wildcard",
            SearchType::FieldSpecific => "field_specific",
            SearchType::Range => "range",
            SearchType::Filtered => "filtered",
            SearchType::Faceted => "faceted",
        }
    }

    pub fn display_name(&self) -> String {
        display_name(self.as_str())
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = PatentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PatentError::validation(format!("Invalid search type: {}", s)))
    }
}

/// Turns an identifier such as `field_specific` into `Field Specific`.
///
/// Underscores become spaces and every run of letters starts upper-case with
/// the rest lower-cased, so `AND_not` becomes `And Not`.
pub fn display_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut in_word = false;
    for c in identifier.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = PatentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatentError::validation(format!(
                "Invalid sort order: {} (expected asc or desc)",
                s
            ))),
        }
    }
}

/// 前端送出的搜尋請求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default = "default_search_type")]
    pub search_type: String,
    #[serde(default)]
    pub query_params: QueryParams,
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

fn default_search_type() -> String {
    SearchType::Simple.as_str().to_string()
}

fn default_page() -> i64 {
    1
}

/// 表單送來的數字可能是字串 (例如 `"2"`)
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid integer: {:?}", text))),
        }
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    NumberOrText::deserialize(deserializer)?.into_i64()
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(NumberOrText::into_i64)
        .transpose()
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            search_type: default_search_type(),
            query_params: QueryParams::default(),
            page: default_page(),
            limit: None,
            sort_field: None,
            sort_order: None,
            fields: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub terms: Vec<BooleanTerm>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub value_from: Option<String>,
    #[serde(default)]
    pub value_to: Option<String>,
    #[serde(default)]
    pub facets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BooleanTerm {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
}

/// Returns the string only when it holds something other than whitespace.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// ODP 搜尋 API 的請求內容，欄位順序與 API 文件一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub fields: Vec<String>,
    pub filters: Vec<Filter>,
    pub pagination: Pagination,
    pub q: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range_filters: Vec<RangeFilter>,
    pub sort: Vec<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    pub field: String,
    pub value_from: String,
    pub value_to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: String,
}

/// A completed search: the payload that was sent and the API response with
/// a `results` array added next to `patentFileWrapperDataBag`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: SearchPayload,
    pub data: serde_json::Value,
}

impl SearchOutcome {
    pub fn results(&self) -> &[serde_json::Value] {
        self.data
            .get("results")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_count(&self) -> u64 {
        self.data.get("count").and_then(|v| v.as_u64()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub search_params: Option<SearchRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub operation: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// 結果表格與 CSV 的單列
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Application Number")]
    pub application_number: String,
    #[serde(rename = "Filing Date")]
    pub filing_date: String,
    #[serde(rename = "Inventor")]
    pub inventor: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl ResultRow {
    pub const HEADERS: [&'static str; 5] = [
        "Title",
        "Application Number",
        "Filing Date",
        "Inventor",
        "Status",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_and_limit_accept_numeric_strings() {
        let request: SearchRequest =
            serde_json::from_value(serde_json::json!({"page": "2", "limit": " 25 "})).unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.limit, Some(25));

        let request: SearchRequest =
            serde_json::from_value(serde_json::json!({"page": 3, "limit": null})).unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.limit, None);

        let request: SearchRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(request.page, 1);

        assert!(serde_json::from_value::<SearchRequest>(serde_json::json!({"page": "two"})).is_err());
    }

    #[test]
    fn test_display_name_title_cases_identifiers() {
        assert_eq!(display_name("simple"), "Simple");
        assert_eq!(display_name("field_specific"), "Field Specific");
        assert_eq!(display_name("AND_not"), "And Not");
        assert_eq!(display_name("range2go"), "Range2Go");
    }

    #[test]
    fn test_search_type_parse() {
        assert_eq!(
            "field_specific".parse::<SearchType>().unwrap(),
            SearchType::FieldSpecific
        );
        let err = "fuzzy".parse::<SearchType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid search type: fuzzy");
    }

    #[test]
    fn test_search_request_defaults() {
        let request: SearchRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(request.search_type, "simple");
        assert_eq!(request.page, 1);
        assert!(request.limit.is_none());
        assert!(request.query_params.terms.is_empty());
    }

    #[test]
    fn test_query_params_use_camel_case_keys() {
        let params: QueryParams = serde_json::from_value(serde_json::json!({
            "dateFrom": "2020-01-01",
            "dateTo": "2020-12-31",
            "valueFrom": "1",
            "valueTo": "9"
        }))
        .unwrap();
        assert_eq!(params.date_from.as_deref(), Some("2020-01-01"));
        assert_eq!(params.value_to.as_deref(), Some("9"));
    }

    #[test]
    fn test_non_empty_ignores_blank_values() {
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(" x ".to_string())), Some("x"));
    }

    #[test]
    fn test_payload_omits_empty_optional_sections() {
        let payload = SearchPayload {
            fields: vec!["inventionTitle".to_string()],
            filters: vec![],
            pagination: Pagination { offset: 0, limit: 10 },
            q: "*".to_string(),
            range_filters: vec![],
            sort: vec![],
            facets: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("rangeFilters").is_none());
        assert!(json.get("facets").is_none());
        assert_eq!(json["pagination"]["limit"], 10);
    }
}
