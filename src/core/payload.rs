use crate::config::SearchConfig;
use crate::domain::constants::{DEFAULT_FIELDS, FILING_DATE_FIELD};
use crate::domain::model::{
    non_empty, Filter, Pagination, QueryParams, RangeFilter, SearchPayload, SearchRequest,
    SearchType, SortSpec,
};

/// 建立送往 ODP 搜尋 API 的 payload
///
/// The request is expected to have passed
/// [`validate_search_request`](crate::utils::validation::validate_search_request).
pub fn build_search_payload(
    search_type: SearchType,
    request: &SearchRequest,
    settings: &SearchConfig,
) -> SearchPayload {
    let params = &request.query_params;

    let page = request.page.max(1) as u64;
    let limit = request
        .limit
        .unwrap_or(i64::from(settings.max_results_per_page))
        .max(1) as u64;

    let sort_field = request
        .sort_field
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(&settings.default_sort_field);
    let direction = request
        .sort_order
        .as_deref()
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "desc".to_string());

    let mut payload = SearchPayload {
        fields: request
            .fields
            .clone()
            .unwrap_or_else(|| DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()),
        filters: vec![Filter {
            name: "applicationMetaData.applicationTypeLabelName".to_string(),
            value: vec!["Utility".to_string()],
        }],
        pagination: Pagination {
            offset: (page - 1).saturating_mul(limit),
            limit,
        },
        q: match search_type {
            SearchType::Simple => non_empty(&params.term).unwrap_or_default().to_string(),
            _ => "*".to_string(),
        },
        range_filters: Vec::new(),
        sort: vec![SortSpec {
            field: sort_field.to_string(),
            direction,
        }],
        facets: Vec::new(),
    };

    // 日期區間適用於所有搜尋類型
    if let (Some(from), Some(to)) = (non_empty(&params.date_from), non_empty(&params.date_to)) {
        payload.range_filters.push(RangeFilter {
            field: FILING_DATE_FIELD.to_string(),
            value_from: from.to_string(),
            value_to: to.to_string(),
        });
    }

    match search_type {
        SearchType::Simple => {}
        SearchType::Boolean => {
            let query = boolean_query(params);
            payload.q = if query.is_empty() { "*".to_string() } else { query };
        }
        SearchType::Wildcard => {
            let field = non_empty(&params.field).unwrap_or("inventionTitle");
            let value = non_empty(&params.value).unwrap_or_default();
            payload.q = format!("{}:{}", field, value);
        }
        SearchType::FieldSpecific => {
            let field = non_empty(&params.field).unwrap_or_default();
            let value = non_empty(&params.value).unwrap_or_default();
            payload.q = format!("{}:{}", field, value);
        }
        SearchType::Range => {
            let field = non_empty(&params.field).unwrap_or(FILING_DATE_FIELD);
            if let (Some(from), Some(to)) =
                (non_empty(&params.value_from), non_empty(&params.value_to))
            {
                let filter = RangeFilter {
                    field: field.to_string(),
                    value_from: from.to_string(),
                    value_to: to.to_string(),
                };
                // 同欄位已有區間時直接取代
                match payload.range_filters.iter_mut().find(|f| f.field == field) {
                    Some(existing) => *existing = filter,
                    None => payload.range_filters.push(filter),
                }
            }
        }
        SearchType::Filtered => {
            if let (Some(field), Some(value)) = (non_empty(&params.field), non_empty(&params.value)) {
                payload.filters.push(Filter {
                    name: field.to_string(),
                    value: vec![value.to_string()],
                });
            }
        }
        SearchType::Faceted => {
            payload.facets = params
                .facets
                .iter()
                .filter(|f| !f.trim().is_empty())
                .cloned()
                .collect();
        }
    }

    if payload.q.is_empty() {
        payload.q = "*".to_string();
    }

    tracing::debug!(
        "Final payload: {}",
        serde_json::to_string_pretty(&payload).unwrap_or_default()
    );
    payload
}

/// `field:value` clauses joined by spaces. The first clause and clauses
/// without an operator carry no prefix; `NOT` and other operators are
/// prepended upper-cased. Terms missing a field or value are skipped but
/// still count toward the position.
fn boolean_query(params: &QueryParams) -> String {
    let mut clauses = Vec::new();
    for (i, term) in params.terms.iter().enumerate() {
        let (Some(field), Some(value)) = (non_empty(&term.field), non_empty(&term.value)) else {
            continue;
        };
        match non_empty(&term.operator) {
            Some(op) if i > 0 => {
                clauses.push(format!("{} {}:{}", op.to_ascii_uppercase(), field, value))
            }
            _ => clauses.push(format!("{}:{}", field, value)),
        }
    }
    clauses.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BooleanTerm;

    fn build(search_type: SearchType, request: &SearchRequest) -> SearchPayload {
        build_search_payload(search_type, request, &SearchConfig::default())
    }

    fn term(field: &str, value: &str, operator: Option<&str>) -> BooleanTerm {
        BooleanTerm {
            field: Some(field.to_string()),
            value: Some(value.to_string()),
            operator: operator.map(str::to_string),
        }
    }

    #[test]
    fn test_simple_search_defaults() {
        let mut request = SearchRequest::default();
        request.query_params.term = Some("solar panel".to_string());

        let payload = build(SearchType::Simple, &request);

        assert_eq!(payload.q, "solar panel");
        assert_eq!(payload.pagination, Pagination { offset: 0, limit: 100 });
        assert_eq!(payload.fields.len(), 4);
        assert_eq!(payload.filters[0].value, vec!["Utility"]);
        assert_eq!(payload.sort[0].field, "applicationMetaData.filingDate");
        assert_eq!(payload.sort[0].direction, "desc");
        assert!(payload.range_filters.is_empty());
    }

    #[test]
    fn test_empty_simple_term_falls_back_to_wildcard() {
        let payload = build(SearchType::Simple, &SearchRequest::default());
        assert_eq!(payload.q, "*");
    }

    #[test]
    fn test_pagination_offset() {
        let request = SearchRequest {
            page: 3,
            limit: Some(25),
            ..SearchRequest::default()
        };
        let payload = build(SearchType::Simple, &request);
        assert_eq!(payload.pagination, Pagination { offset: 50, limit: 25 });
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let request = SearchRequest {
            page: i64::MAX,
            limit: Some(100),
            ..SearchRequest::default()
        };
        let payload = build(SearchType::Simple, &request);
        assert_eq!(payload.pagination.offset, u64::MAX);
    }

    #[test]
    fn test_serialized_key_order() {
        let mut request = SearchRequest::default();
        request.query_params.date_from = Some("2020-01-01".to_string());
        request.query_params.date_to = Some("2020-12-31".to_string());

        let json = serde_json::to_string(&build(SearchType::Simple, &request)).unwrap();
        let positions: Vec<usize> = ["\"fields\"", "\"filters\"", "\"pagination\"", "\"q\"", "\"rangeFilters\"", "\"sort\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn test_date_range_applies_to_any_type() {
        let mut request = SearchRequest::default();
        request.query_params.date_from = Some("2019-01-01".to_string());
        request.query_params.date_to = Some("2019-06-30".to_string());
        request.query_params.field = Some("inventionTitle".to_string());
        request.query_params.value = Some("drone*".to_string());

        let payload = build(SearchType::Wildcard, &request);

        assert_eq!(payload.q, "inventionTitle:drone*");
        assert_eq!(
            payload.range_filters,
            vec![RangeFilter {
                field: FILING_DATE_FIELD.to_string(),
                value_from: "2019-01-01".to_string(),
                value_to: "2019-06-30".to_string(),
            }]
        );
    }

    #[test]
    fn test_boolean_query_operators() {
        let mut request = SearchRequest::default();
        request.query_params.terms = vec![
            term("inventionTitle", "battery", Some("OR")),
            term("inventorNameText", "Smith", Some("and")),
            term("applicationMetaData.applicationStatusDescriptionText", "Abandoned", Some("not")),
            term("inventionTitle", "cell", None),
        ];

        let payload = build(SearchType::Boolean, &request);

        assert_eq!(
            payload.q,
            "inventionTitle:battery AND inventorNameText:Smith \
             NOT applicationMetaData.applicationStatusDescriptionText:Abandoned inventionTitle:cell"
        );
    }

    #[test]
    fn test_boolean_skips_incomplete_terms() {
        let mut request = SearchRequest::default();
        request.query_params.terms = vec![
            BooleanTerm::default(),
            term("inventionTitle", "battery", Some("or")),
        ];
        // Second term keeps its operator because its position is not first.
        assert_eq!(build(SearchType::Boolean, &request).q, "OR inventionTitle:battery");

        request.query_params.terms = vec![BooleanTerm::default()];
        assert_eq!(build(SearchType::Boolean, &request).q, "*");
    }

    #[test]
    fn test_wildcard_default_field() {
        let mut request = SearchRequest::default();
        request.query_params.value = Some("robot*".to_string());
        assert_eq!(build(SearchType::Wildcard, &request).q, "inventionTitle:robot*");
    }

    #[test]
    fn test_field_specific_query() {
        let mut request = SearchRequest::default();
        request.query_params.field = Some("applicationNumberText".to_string());
        request.query_params.value = Some("16123456".to_string());
        assert_eq!(
            build(SearchType::FieldSpecific, &request).q,
            "applicationNumberText:16123456"
        );
    }

    #[test]
    fn test_range_replaces_filing_date_filter() {
        let mut request = SearchRequest::default();
        request.query_params.date_from = Some("2010-01-01".to_string());
        request.query_params.date_to = Some("2010-12-31".to_string());
        request.query_params.value_from = Some("2015-01-01".to_string());
        request.query_params.value_to = Some("2016-01-01".to_string());

        let payload = build(SearchType::Range, &request);

        assert_eq!(payload.q, "*");
        assert_eq!(payload.range_filters.len(), 1);
        assert_eq!(payload.range_filters[0].value_from, "2015-01-01");
    }

    #[test]
    fn test_range_on_other_field_appends() {
        let mut request = SearchRequest::default();
        request.query_params.date_from = Some("2010-01-01".to_string());
        request.query_params.date_to = Some("2010-12-31".to_string());
        request.query_params.field = Some("applicationMetaData.grantDate".to_string());
        request.query_params.value_from = Some("2012-01-01".to_string());
        request.query_params.value_to = Some("2013-01-01".to_string());

        let payload = build(SearchType::Range, &request);

        assert_eq!(payload.range_filters.len(), 2);
        assert_eq!(payload.range_filters[1].field, "applicationMetaData.grantDate");
    }

    #[test]
    fn test_filtered_appends_filter() {
        let mut request = SearchRequest::default();
        request.query_params.field =
            Some("applicationMetaData.applicationStatusDescriptionText".to_string());
        request.query_params.value = Some("Patented Case".to_string());

        let payload = build(SearchType::Filtered, &request);

        assert_eq!(payload.filters.len(), 2);
        assert_eq!(payload.filters[1].value, vec!["Patented Case"]);
    }

    #[test]
    fn test_faceted_copies_facets() {
        let mut request = SearchRequest::default();
        request.query_params.facets = vec![
            "applicationMetaData.groupArtUnitNumber".to_string(),
            " ".to_string(),
        ];
        let payload = build(SearchType::Faceted, &request);
        assert_eq!(payload.facets, vec!["applicationMetaData.groupArtUnitNumber"]);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["facets"][0], "applicationMetaData.groupArtUnitNumber");
    }

    #[test]
    fn test_custom_sort_and_fields() {
        let request = SearchRequest {
            sort_field: Some("applicationNumberText".to_string()),
            sort_order: Some("ASC".to_string()),
            fields: Some(vec!["applicationNumberText".to_string()]),
            ..SearchRequest::default()
        };
        let payload = build(SearchType::Simple, &request);
        assert_eq!(payload.sort[0].field, "applicationNumberText");
        assert_eq!(payload.sort[0].direction, "asc");
        assert_eq!(payload.fields, vec!["applicationNumberText"]);
    }
}
