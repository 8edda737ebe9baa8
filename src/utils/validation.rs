use crate::config::SearchConfig;
use crate::domain::constants::BOOLEAN_OPERATORS;
use crate::domain::model::{non_empty, SearchRequest, SearchType, SortOrder};
use crate::utils::error::{PatentError, Result};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PatentError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PatentError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PatentError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PatentError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PatentError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PatentError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn parse_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        PatentError::validation(format!(
            "Invalid {}: '{}' (expected YYYY-MM-DD)",
            field_name, value
        ))
    })
}

/// 日期區間：兩端都必須是合法日期且起日不晚於迄日
pub fn validate_date_range(date_from: &str, date_to: &str) -> Result<()> {
    let from = parse_date("dateFrom", date_from)?;
    let to = parse_date("dateTo", date_to)?;
    if from > to {
        return Err(PatentError::validation(format!(
            "Invalid date range: {} is after {}",
            date_from, date_to
        )));
    }
    Ok(())
}

/// Checks a search request against the configured limits and returns its
/// parsed search type.
pub fn validate_search_request(request: &SearchRequest, settings: &SearchConfig) -> Result<SearchType> {
    let search_type: SearchType = request.search_type.parse()?;

    if request.page < 1 {
        return Err(PatentError::validation(format!(
            "Page must be at least 1, got {}",
            request.page
        )));
    }

    let max = i64::from(settings.max_results_per_page);
    if let Some(limit) = request.limit {
        if limit < 1 || limit > max {
            return Err(PatentError::validation(format!(
                "Limit must be between 1 and {}, got {}",
                max, limit
            )));
        }
    }

    // offset = (page - 1) * limit 必須能以 i64 表示
    let limit = request.limit.unwrap_or(max);
    if (request.page - 1).checked_mul(limit).is_none() {
        return Err(PatentError::validation(format!(
            "Page out of range: {}",
            request.page
        )));
    }

    if let Some(order) = request.sort_order.as_deref() {
        order.parse::<SortOrder>()?;
    }

    let params = &request.query_params;
    match (non_empty(&params.date_from), non_empty(&params.date_to)) {
        (Some(from), Some(to)) => validate_date_range(from, to)?,
        (None, None) => {}
        _ => {
            return Err(PatentError::validation(
                "Both dateFrom and dateTo are required for a date range",
            ))
        }
    }

    match search_type {
        SearchType::FieldSpecific => {
            if non_empty(&params.field).is_none() {
                return Err(PatentError::validation(
                    "Field-specific search requires a field",
                ));
            }
        }
        SearchType::Boolean => {
            for term in &params.terms {
                if let Some(op) = non_empty(&term.operator) {
                    if !BOOLEAN_OPERATORS.contains(&op.to_ascii_uppercase().as_str()) {
                        return Err(PatentError::validation(format!(
                            "Invalid boolean operator: {}",
                            op
                        )));
                    }
                }
            }
        }
        SearchType::Range => {
            // 只有兩端都像日期時才檢查順序，其他範圍值交給 API 處理
            if let (Some(from), Some(to)) = (non_empty(&params.value_from), non_empty(&params.value_to)) {
                if let (Ok(f), Ok(t)) = (
                    NaiveDate::parse_from_str(from, "%Y-%m-%d"),
                    NaiveDate::parse_from_str(to, "%Y-%m-%d"),
                ) {
                    if f > t {
                        return Err(PatentError::validation(format!(
                            "Invalid range: {} is after {}",
                            from, to
                        )));
                    }
                }
            }
        }
        _ => {}
    }

    Ok(search_type)
}
