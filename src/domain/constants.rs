use crate::domain::model::SearchType;

pub const DEFAULT_SEARCH_URL: &str = "https://api.uspto.gov/api/v1/patent/applications/search";
pub const DEFAULT_TOOL_NAME: &str = "Patent Search Tool";
pub const MAX_RESULTS_PER_PAGE: u32 = 100;
pub const DEFAULT_SORT_FIELD: &str = "applicationMetaData.filingDate";
pub const FILING_DATE_FIELD: &str = "applicationMetaData.filingDate";
pub const API_KEY_ENV_VAR: &str = "USPTO_API_KEY";

pub const DEFAULT_FIELDS: [&str; 4] = [
    "inventionTitle",
    "applicationNumberText",
    "applicationMetaData",
    "inventorNameText",
];

pub const BOOLEAN_OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];

/// 可排序欄位 (表單的 sortField 選單)
pub const SORTABLE_FIELDS: [&str; 4] = [
    "applicationMetaData.filingDate",
    "applicationMetaData.grantDate",
    "applicationNumberText",
    "applicationMetaData.inventionTitle",
];

/// (名稱, 路徑) 其他 ODP 端點，僅供前端顯示
pub const API_ENDPOINTS: [(&str, &str); 4] = [
    ("search", "/api/v1/patent/applications/search"),
    ("application", "/api/v1/patent/applications/{applicationNumberText}"),
    ("documents", "/api/v1/patent/applications/{applicationNumberText}/documents"),
    ("status_codes", "/api/v1/patent/status-codes"),
];

const TEXT_FIELDS: &[&str] = &[
    "inventionTitle",
    "applicationNumberText",
    "inventorNameText",
    "applicationMetaData.inventionTitle",
    "applicationMetaData.firstInventorName",
    "applicationMetaData.firstApplicantName",
];

const ALL_FIELDS: &[&str] = &[
    "inventionTitle",
    "applicationNumberText",
    "inventorNameText",
    "applicationMetaData.inventionTitle",
    "applicationMetaData.firstInventorName",
    "applicationMetaData.firstApplicantName",
    "applicationMetaData.filingDate",
    "applicationMetaData.grantDate",
    "applicationMetaData.patentNumber",
    "applicationMetaData.applicationStatusDescriptionText",
    "applicationMetaData.applicationTypeLabelName",
    "applicationMetaData.groupArtUnitNumber",
    "applicationMetaData.cpcClassificationBag",
];

const DATE_FIELDS: &[&str] = &[
    "applicationMetaData.filingDate",
    "applicationMetaData.grantDate",
];

const CATEGORY_FIELDS: &[&str] = &[
    "applicationMetaData.applicationStatusDescriptionText",
    "applicationMetaData.applicationTypeLabelName",
    "applicationMetaData.groupArtUnitNumber",
    "applicationMetaData.firstApplicantName",
];

const FACET_FIELDS: &[&str] = &[
    "applicationMetaData.applicationStatusDescriptionText",
    "applicationMetaData.applicationTypeLabelName",
    "applicationMetaData.groupArtUnitNumber",
    "applicationMetaData.cpcClassificationBag",
];

pub fn valid_fields(search_type: SearchType) -> &'static [&'static str] {
    match search_type {
        SearchType::Simple | SearchType::Wildcard => TEXT_FIELDS,
        SearchType::Boolean | SearchType::FieldSpecific => ALL_FIELDS,
        SearchType::Range => DATE_FIELDS,
        SearchType::Filtered => CATEGORY_FIELDS,
        SearchType::Faceted => FACET_FIELDS,
    }
}

/// Human-readable label for an ODP field; unknown fields are returned as-is.
pub fn field_display_name(field: &str) -> &str {
    match field {
        "inventionTitle" | "applicationMetaData.inventionTitle" => "Invention Title",
        "applicationNumberText" => "Application Number",
        "inventorNameText" => "Inventor Name",
        "applicationMetaData.firstInventorName" => "First Inventor",
        "applicationMetaData.firstApplicantName" => "First Applicant",
        "applicationMetaData.filingDate" => "Filing Date",
        "applicationMetaData.grantDate" => "Grant Date",
        "applicationMetaData.patentNumber" => "Patent Number",
        "applicationMetaData.applicationStatusDescriptionText" => "Application Status",
        "applicationMetaData.applicationTypeLabelName" => "Application Type",
        "applicationMetaData.groupArtUnitNumber" => "Art Unit",
        "applicationMetaData.cpcClassificationBag" => "CPC Classification",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_search_type_has_fields() {
        for search_type in SearchType::ALL {
            assert!(!valid_fields(search_type).is_empty(), "{}", search_type);
        }
    }

    #[test]
    fn test_field_display_name_falls_back_to_field() {
        assert_eq!(field_display_name("applicationNumberText"), "Application Number");
        assert_eq!(field_display_name("someNewField"), "someNewField");
    }

    #[test]
    fn test_sortable_fields_include_default() {
        assert!(SORTABLE_FIELDS.contains(&DEFAULT_SORT_FIELD));
    }
}
