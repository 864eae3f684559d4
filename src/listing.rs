// 🔎 Plant Listing - filtered, paginated plant summaries
//
// 1. Load every plant with its aggregate (max) symptom severity
// 2. Filter in memory by name query and minimum severity
// 3. Intersect with plants having a symptom in the requested body system
// 4. Count, then slice the requested page
//
// Rows stay in plant id order throughout, so pages are stable.

use crate::params::parse_leading_int;
use crate::severity::Severity;
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashSet;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

// ============================================================================
// PARAMETERS
// ============================================================================

/// Raw query string values, exactly as received
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub q: Option<String>,
    pub severity: Option<String>,
    pub body_system: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    /// Decode a raw query string. The first value of a repeated key wins,
    /// unknown keys are ignored.
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = ListQuery::default();

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "q" => &mut query.q,
                "severity" => &mut query.severity,
                "body_system" => &mut query.body_system,
                "page" => &mut query.page,
                "per_page" => &mut query.per_page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        query
    }
}

/// Validated listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub q: Option<String>,
    pub severity: Option<String>,
    pub body_system: Option<String>,
    pub page: i64,
    pub per_page: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            q: None,
            severity: None,
            body_system: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Empty filter values are treated as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<ListQuery> for ListParams {
    fn from(query: ListQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(DEFAULT_PAGE)
            .max(1);

        let per_page = query
            .per_page
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        ListParams {
            q: non_empty(query.q),
            severity: non_empty(query.severity),
            body_system: non_empty(query.body_system),
            page,
            per_page,
        }
    }
}

impl ListParams {
    fn offset(&self) -> usize {
        let offset = (self.page - 1).saturating_mul(self.per_page);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// One plant with its aggregate severity level (0 = no symptoms)
#[derive(Debug, Clone, PartialEq)]
pub struct PlantSeverityRow {
    pub id: i64,
    pub common_name: String,
    pub scientific_name: String,
    pub family: Option<String>,
    pub max_level: i64,
}

impl PlantSeverityRow {
    /// Case-insensitive substring match against common or scientific name
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.common_name.to_lowercase().contains(&query)
            || self.scientific_name.to_lowercase().contains(&query)
    }
}

/// Listing entry as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSummary {
    pub id: i64,
    pub common_name: String,
    pub scientific_name: String,
    pub family: Option<String>,
    pub max_severity: Option<Severity>,
}

impl From<PlantSeverityRow> for PlantSummary {
    fn from(row: PlantSeverityRow) -> Self {
        PlantSummary {
            id: row.id,
            common_name: row.common_name,
            scientific_name: row.scientific_name,
            family: row.family,
            max_severity: Severity::from_level(row.max_level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantPage {
    pub data: Vec<PlantSummary>,
    pub total: usize,
    pub page: i64,
    pub per_page: i64,
}

// ============================================================================
// QUERIES
// ============================================================================

/// Every plant with its highest symptom severity level, in id order
pub fn load_severity_rows(conn: &Connection) -> Result<Vec<PlantSeverityRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.common_name, p.scientific_name, p.family,
                COALESCE(MAX(CASE ps.severity
                    WHEN 'fatal'    THEN 4
                    WHEN 'severe'   THEN 3
                    WHEN 'moderate' THEN 2
                    WHEN 'mild'     THEN 1
                    ELSE 0 END), 0) AS max_level
         FROM plants p
         LEFT JOIN plant_symptoms ps ON ps.plant_id = p.id
         GROUP BY p.id
         ORDER BY p.id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PlantSeverityRow {
                id: row.get(0)?,
                common_name: row.get(1)?,
                scientific_name: row.get(2)?,
                family: row.get(3)?,
                max_level: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Plants having at least one symptom whose body system contains `needle`.
///
/// Literal substring match, ASCII case-insensitive (same collation as LIKE),
/// so `%` and `_` in the needle match only themselves.
pub fn plant_ids_with_body_system(conn: &Connection, needle: &str) -> Result<HashSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT ps.plant_id
         FROM plant_symptoms ps
         LEFT JOIN symptoms s ON s.id = ps.symptom_id
         WHERE instr(lower(s.body_system), lower(?1)) > 0",
    )?;

    let ids = stmt
        .query_map(params![needle], |row| row.get(0))?
        .collect::<Result<HashSet<i64>, _>>()?;

    Ok(ids)
}

// ============================================================================
// FILTER + PAGINATE
// ============================================================================

/// Apply name and severity filters, then the body-system id set if given
pub fn filter_rows(
    rows: Vec<PlantSeverityRow>,
    params: &ListParams,
    body_system_ids: Option<&HashSet<i64>>,
) -> Vec<PlantSeverityRow> {
    let min_level = params.severity.as_deref().map(Severity::filter_level);

    rows.into_iter()
        .filter(|row| params.q.as_deref().map_or(true, |q| row.matches_query(q)))
        .filter(|row| min_level.map_or(true, |min| row.max_level >= min))
        .filter(|row| body_system_ids.map_or(true, |ids| ids.contains(&row.id)))
        .collect()
}

/// Slice one page out of the filtered rows
pub fn paginate(rows: Vec<PlantSeverityRow>, params: &ListParams) -> PlantPage {
    let total = rows.len();
    let per_page = usize::try_from(params.per_page).unwrap_or(1);

    let data = rows
        .into_iter()
        .skip(params.offset())
        .take(per_page)
        .map(PlantSummary::from)
        .collect();

    PlantPage {
        data,
        total,
        page: params.page,
        per_page: params.per_page,
    }
}

/// GET /plants
pub fn search_plants(conn: &Connection, params: &ListParams) -> Result<PlantPage> {
    let rows = load_severity_rows(conn)?;

    let body_system_ids = match params.body_system.as_deref() {
        Some(needle) => Some(plant_ids_with_body_system(conn, needle)?),
        None => None,
    };

    let filtered = filter_rows(rows, params, body_system_ids.as_ref());
    Ok(paginate(filtered, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::fixtures::{plant, sample_database, symptom};
    use crate::import::import_records;

    fn query(pairs: &[(&str, &str)]) -> ListParams {
        let mut q = ListQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "q" => q.q = value,
                "severity" => q.severity = value,
                "body_system" => q.body_system = value,
                "page" => q.page = value,
                "per_page" => q.per_page = value,
                other => panic!("unknown parameter {}", other),
            }
        }
        ListParams::from(q)
    }

    fn names(page: &PlantPage) -> Vec<&str> {
        page.data.iter().map(|p| p.common_name.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // Parameter parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_defaults() {
        assert_eq!(query(&[]), ListParams::default());
        assert_eq!(ListParams::default().page, 1);
        assert_eq!(ListParams::default().per_page, 20);
    }

    #[test]
    fn test_query_string_decoding() {
        let q = ListQuery::from_query_string(
            "q=peace%20lily&severity=severe&body_system=Renal+system",
        );
        assert_eq!(q.q.as_deref(), Some("peace lily"));
        assert_eq!(q.severity.as_deref(), Some("severe"));
        assert_eq!(q.body_system.as_deref(), Some("Renal system"));
        assert_eq!(q.page, None);

        let q = ListQuery::from_query_string("");
        assert_eq!(ListParams::from(q), ListParams::default());
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let q = ListQuery::from_query_string("page=1&page=2&per_page=5&per_page=50&sort=name");
        let params = ListParams::from(q);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 5);
    }

    #[test]
    fn test_unparseable_numbers_fall_back_to_defaults() {
        let params = query(&[("page", "abc"), ("per_page", "lots")]);
        assert_eq!(params.page, DEFAULT_PAGE);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);

        let params = query(&[("page", "3rd"), ("per_page", "15 please")]);
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 15);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(query(&[("per_page", "500")]).per_page, 100);
        assert_eq!(query(&[("per_page", "0")]).per_page, 1);
        assert_eq!(query(&[("per_page", "-4")]).per_page, 1);
        assert_eq!(query(&[("page", "0")]).page, 1);
        assert_eq!(query(&[("page", "-2")]).page, 1);
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let params = query(&[("q", ""), ("severity", ""), ("body_system", "")]);
        assert_eq!(params, ListParams::default());
    }

    // ------------------------------------------------------------------------
    // Aggregate + filters
    // ------------------------------------------------------------------------

    #[test]
    fn test_max_severity_aggregate() {
        let conn = sample_database();
        let page = search_plants(&conn, &ListParams::default()).unwrap();

        assert_eq!(page.total, 4);
        let lily = &page.data[0];
        assert_eq!(lily.common_name, "Lily");
        assert_eq!(lily.max_severity, Some(Severity::Fatal));
        assert_eq!(lily.family.as_deref(), Some("Liliaceae"));

        let spider = page.data.iter().find(|p| p.common_name == "Spider Plant").unwrap();
        assert_eq!(spider.max_severity, None);
    }

    #[test]
    fn test_query_matches_both_names_case_insensitively() {
        let conn = sample_database();

        let page = search_plants(&conn, &query(&[("q", "LIL")])).unwrap();
        assert_eq!(names(&page), vec!["Lily"]);

        let page = search_plants(&conn, &query(&[("q", "epipremnum")])).unwrap();
        assert_eq!(names(&page), vec!["Golden Pothos"]);

        let page = search_plants(&conn, &query(&[("q", "cactus")])).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_severity_filter_is_a_minimum() {
        let conn = sample_database();

        for s in Severity::ALL {
            let page = search_plants(&conn, &query(&[("severity", s.as_str())])).unwrap();
            for plant in &page.data {
                let level = plant.max_severity.map(|m| m.level()).unwrap_or(0);
                assert!(level >= s.level(), "{} below {}", plant.common_name, s);
            }
        }

        let page = search_plants(&conn, &query(&[("severity", "moderate")])).unwrap();
        assert_eq!(names(&page), vec!["Lily", "Golden Pothos"]);
    }

    #[test]
    fn test_unknown_severity_keeps_everything() {
        let conn = sample_database();
        let page = search_plants(&conn, &query(&[("severity", "catastrophic")])).unwrap();
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_body_system_filter() {
        let conn = sample_database();

        let page = search_plants(&conn, &query(&[("body_system", "gastro")])).unwrap();
        assert_eq!(names(&page), vec!["Lily", "Tulip"]);

        let page = search_plants(&conn, &query(&[("body_system", "Ren")])).unwrap();
        assert_eq!(names(&page), vec!["Lily"]);
    }

    #[test]
    fn test_body_system_is_literal_not_a_pattern() {
        let conn = sample_database();
        let page = search_plants(&conn, &query(&[("body_system", "%")])).unwrap();
        assert_eq!(page.total, 0);

        let page = search_plants(&conn, &query(&[("body_system", "D_rmal")])).unwrap();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_filters_combine() {
        let conn = sample_database();
        let page = search_plants(
            &conn,
            &query(&[("body_system", "Gastrointestinal"), ("severity", "severe")]),
        )
        .unwrap();
        assert_eq!(names(&page), vec!["Lily"]);
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    #[test]
    fn test_pages_reconstruct_the_full_set() {
        let mut conn = crate::db::open_in_memory().unwrap();
        let records: Vec<_> = (1..=23)
            .map(|i| {
                let mut record = plant(&format!("Plant {:02}", i), &format!("Planta {:02}", i));
                if i % 3 == 0 {
                    record.symptoms = vec![symptom("Vomiting", "Gastrointestinal", "mild")];
                }
                record
            })
            .collect();
        import_records(&mut conn, &records).unwrap();

        let full = search_plants(&conn, &query(&[("per_page", "100")])).unwrap();
        assert_eq!(full.total, 23);

        let mut collected = Vec::new();
        for page_number in 1..=5 {
            let page_param = page_number.to_string();
            let page = search_plants(
                &conn,
                &query(&[("per_page", "5"), ("page", page_param.as_str())]),
            )
            .unwrap();
            assert_eq!(page.total, 23, "total must not depend on page");
            assert!(page.data.len() <= 5);
            collected.extend(page.data);
        }

        assert_eq!(collected, full.data);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let conn = sample_database();
        let page = search_plants(&conn, &query(&[("page", "9"), ("per_page", "2")])).unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, 4);
        assert_eq!(page.page, 9);
        assert_eq!(page.per_page, 2);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let conn = sample_database();
        let page = search_plants(
            &conn,
            &query(&[("page", "99999999999999999999"), ("per_page", "100")]),
        )
        .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_per_page_clamps_behave_like_bounds() {
        let conn = sample_database();

        let over = search_plants(&conn, &query(&[("per_page", "1000")])).unwrap();
        let max = search_plants(&conn, &query(&[("per_page", "100")])).unwrap();
        assert_eq!(over, max);

        let under = search_plants(&conn, &query(&[("per_page", "0")])).unwrap();
        let one = search_plants(&conn, &query(&[("per_page", "1")])).unwrap();
        assert_eq!(under, one);
        assert_eq!(one.data.len(), 1);
    }

    #[test]
    fn test_summary_serializes_snake_case_with_label() {
        let conn = sample_database();
        let page = search_plants(&conn, &query(&[("q", "spider")])).unwrap();
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["total"], 1);
        assert_eq!(json["page"], 1);
        assert_eq!(json["per_page"], 20);
        assert_eq!(json["data"][0]["common_name"], "Spider Plant");
        assert_eq!(json["data"][0]["scientific_name"], "Chlorophytum comosum");
        assert!(json["data"][0]["max_severity"].is_null());
        assert!(json["data"][0]["family"].is_null());

        let page = search_plants(&conn, &query(&[("q", "lily")])).unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"][0]["max_severity"], "fatal");
    }
}
