// 🏠 Plan model - one listing as served by the plans endpoint
//
// Plans are read-only. A fetch produces a PlanSnapshot, and every view
// (summaries, filtered tables, exports) is derived from it without mutation.

use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// PLAN TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Move-in ready home, usually carries an address
    Now,

    /// Buildable floorplan
    Plan,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Now => "now",
            PlanType::Plan => "plan",
        }
    }

    /// Tab label ("Now" / "Plan")
    pub fn label(&self) -> &'static str {
        match self {
            PlanType::Now => "Now",
            PlanType::Plan => "Plan",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "string_if_null")]
    pub plan_name: String,

    /// 0 = unknown / unpriced
    #[serde(default, deserialize_with = "zero_if_null")]
    pub price: f64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub sqft: f64,

    #[serde(default, deserialize_with = "label_string")]
    pub stories: String,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub price_per_sqft: f64,

    #[serde(default, deserialize_with = "string_if_null")]
    pub last_updated: String,

    #[serde(default, deserialize_with = "false_if_null")]
    pub price_changed_recently: bool,

    /// Raw builder name, may be any spelling variant
    #[serde(default, deserialize_with = "string_if_null")]
    pub company: String,

    #[serde(default, deserialize_with = "string_if_null")]
    pub community: String,

    #[serde(rename = "type")]
    pub plan_type: PlanType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Plan {
    /// Name shown in tables and exports: the address of a "now" listing
    /// when one is present, the plan name otherwise.
    pub fn display_name(&self) -> &str {
        match (&self.plan_type, self.address.as_deref()) {
            (PlanType::Now, Some(address)) if !address.is_empty() => address,
            _ => &self.plan_name,
        }
    }

    pub fn is_priced(&self) -> bool {
        self.price > 0.0
    }

    /// `last_updated` as epoch milliseconds, None when unparseable
    pub fn last_updated_millis(&self) -> Option<i64> {
        parse_timestamp_millis(&self.last_updated)
    }
}

/// Parse the timestamp formats the endpoint has been seen to emit.
///
/// Zone-less timestamps are read as UTC.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

// Helper functions for serde defaults
fn zero_if_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn string_if_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn false_if_null<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Stories arrive as "2", 2, 1.5 or null depending on the scraper
fn label_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(value) => format_number(value),
            None => n.to_string(),
        },
        other => other.to_string(),
    })
}

/// Render a number the way JavaScript's `String(number)` does:
/// "350000", "189.5", "0" for -0, "1e+21" from 1e21 up, "1e-7" below 1e-6.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    let exponential = format!("{:e}", value);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponential,
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Immutable result of one successful fetch
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    plans: Arc<[Plan]>,
    pub fetched_at: DateTime<Utc>,
}

impl PlanSnapshot {
    pub fn new(plans: Vec<Plan>) -> Self {
        PlanSnapshot {
            plans: plans.into(),
            fetched_at: Utc::now(),
        }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Decode the JSON array served by `GET /plans`
pub fn parse_plans(body: &str) -> Result<Vec<Plan>> {
    Ok(serde_json::from_str(body)?)
}

/// Load a saved `/plans` response from disk
pub fn load_json(path: &Path) -> Result<Vec<Plan>> {
    let body = std::fs::read_to_string(path)?;
    parse_plans(&body)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn now_listing(address: Option<&str>) -> Plan {
        Plan {
            plan_name: "The Aspen".to_string(),
            price: 410000.0,
            sqft: 2100.0,
            stories: "2".to_string(),
            price_per_sqft: 195.24,
            last_updated: "2024-05-01T12:00:00Z".to_string(),
            price_changed_recently: false,
            company: "Chesmar Homes".to_string(),
            community: "Elevon".to_string(),
            plan_type: PlanType::Now,
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_plans_full_record() {
        let body = r#"[{
            "plan_name": "Magnolia",
            "price": 389990,
            "sqft": 2044,
            "stories": "1",
            "price_per_sqft": 190.8,
            "last_updated": "2024-06-02 08:15:00",
            "price_changed_recently": true,
            "company": "ChesmarHomes",
            "community": "Elevon",
            "type": "plan"
        }]"#;

        let plans = parse_plans(body).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].plan_name, "Magnolia");
        assert_eq!(plans[0].price, 389990.0);
        assert_eq!(plans[0].plan_type, PlanType::Plan);
        assert!(plans[0].price_changed_recently);
        assert!(plans[0].address.is_none());
    }

    #[test]
    fn test_parse_plans_tolerates_nulls_and_numeric_stories() {
        let body = r#"[{
            "plan_name": "Cedar",
            "price": null,
            "sqft": null,
            "stories": 2,
            "price_per_sqft": null,
            "last_updated": "2024-06-02",
            "price_changed_recently": null,
            "company": "DR Horton",
            "community": "Walden",
            "type": "now",
            "address": "12 Pond Ln"
        }]"#;

        let plans = parse_plans(body).unwrap();
        assert_eq!(plans[0].price, 0.0);
        assert_eq!(plans[0].sqft, 0.0);
        assert_eq!(plans[0].stories, "2");
        assert!(!plans[0].price_changed_recently);
        assert!(!plans[0].is_priced());
    }

    #[test]
    fn test_parse_plans_tolerates_null_strings() {
        let body = r#"[{
            "plan_name": null,
            "price": 325000,
            "last_updated": null,
            "company": null,
            "community": null,
            "type": "plan"
        }]"#;

        let plans = parse_plans(body).unwrap();
        assert_eq!(plans[0].plan_name, "");
        assert_eq!(plans[0].last_updated, "");
        assert_eq!(plans[0].company, "");
        assert_eq!(plans[0].community, "");
        assert!(plans[0].last_updated_millis().is_none());
    }

    #[test]
    fn test_numeric_stories_render_like_js() {
        let body = r#"[
            {"plan_name": "A", "stories": 2.0, "type": "plan"},
            {"plan_name": "B", "stories": 1.5, "type": "plan"},
            {"plan_name": "C", "stories": 3, "type": "plan"}
        ]"#;

        let stories: Vec<String> = parse_plans(body)
            .unwrap()
            .into_iter()
            .map(|p| p.stories)
            .collect();
        assert_eq!(stories, vec!["2", "1.5", "3"]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(350000.0), "350000");
        assert_eq!(format_number(189.5), "189.5");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(2.5e22), "2.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(-1e21), "-1e+21");
    }

    #[test]
    fn test_parse_plans_rejects_unknown_type() {
        let body = r#"[{"plan_name": "X", "company": "A", "community": "B", "type": "sold"}]"#;
        assert!(parse_plans(body).is_err());
    }

    #[test]
    fn test_display_name_prefers_address_for_now() {
        assert_eq!(now_listing(Some("12 Pond Ln")).display_name(), "12 Pond Ln");
        assert_eq!(now_listing(None).display_name(), "The Aspen");
        assert_eq!(now_listing(Some("")).display_name(), "The Aspen");

        let mut plan = now_listing(Some("12 Pond Ln"));
        plan.plan_type = PlanType::Plan;
        assert_eq!(plan.display_name(), "The Aspen");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp_millis("2024-05-01T12:00:00Z").unwrap();
        let offset = parse_timestamp_millis("2024-05-01T07:00:00-05:00").unwrap();
        let naive = parse_timestamp_millis("2024-05-01 12:00:00").unwrap();
        let naive_t = parse_timestamp_millis("2024-05-01T12:00:00.250").unwrap();
        let date = parse_timestamp_millis("2024-05-01").unwrap();

        assert_eq!(rfc, offset);
        assert_eq!(rfc, naive);
        assert_eq!(naive_t, rfc + 250);
        assert_eq!(rfc - date, 12 * 3600 * 1000);

        assert!(parse_timestamp_millis("").is_none());
        assert!(parse_timestamp_millis("yesterday").is_none());
    }

    #[test]
    fn test_snapshot_is_shared_not_copied() {
        let snapshot = PlanSnapshot::new(vec![now_listing(None)]);
        let clone = snapshot.clone();
        assert_eq!(snapshot.len(), 1);
        assert!(std::ptr::eq(snapshot.plans(), clone.plans()));
    }

    #[test]
    fn test_serialize_type_field() {
        let json = serde_json::to_value(now_listing(None)).unwrap();
        assert_eq!(json["type"], "now");
        assert!(json.get("address").is_none());
    }
}
