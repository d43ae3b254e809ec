/// Feed handler and query-string parsing
use crate::config::FeedConfig;
use crate::error::{AppError, Result};
use crate::middleware::CallerId;
use crate::models::{FeedQuery, SortDirection};
use crate::AppState;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

const MAX_TAGS: usize = 5;
const MAX_SEARCH_CHARS: usize = 100;

/// Raw feed query string. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQueryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    /// Comma-separated
    pub tags: Option<String>,
    pub search: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
}

impl FeedQueryParams {
    /// Validate the raw parameters into a `FeedQuery`.
    pub fn into_query(self, config: &FeedConfig) -> Result<FeedQuery> {
        let limit = self.limit.unwrap_or(config.default_limit);
        if !(1..=config.max_limit).contains(&limit) {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                config.max_limit
            )));
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::BadRequest("offset must not be negative".into()));
        }

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortDirection::default(),
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "sort must be 'asc' or 'desc', got '{}'",
                    other
                )))
            }
        };

        let tags: Vec<String> = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tags.len() > MAX_TAGS {
            return Err(AppError::BadRequest(format!(
                "at most {} tags may be given",
                MAX_TAGS
            )));
        }

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(term) = &search {
            if term.chars().count() > MAX_SEARCH_CHARS {
                return Err(AppError::BadRequest(format!(
                    "search must be at most {} characters",
                    MAX_SEARCH_CHARS
                )));
            }
        }

        let since = self.since.as_deref().map(|s| parse_timestamp("since", s)).transpose()?;
        let until = self.until.as_deref().map(|s| parse_timestamp("until", s)).transpose()?;
        if let (Some(since), Some(until)) = (since, until) {
            if since > until {
                return Err(AppError::BadRequest("since must not be after until".into()));
            }
        }

        Ok(FeedQuery {
            limit,
            offset,
            sort,
            tags,
            search,
            since,
            until,
        })
    }
}

/// Accepts RFC 3339 or `YYYY-MM-DD HH:MM:SS` (taken as UTC).
fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| AppError::BadRequest(format!("{} is not a valid timestamp", field)))
}

/// One page of the caller's feed
pub async fn get_feed(
    state: web::Data<AppState>,
    caller: CallerId,
    params: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    let query = params.into_inner().into_query(&state.feed_config)?;
    let page = state.feed.feed(caller.0, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}
