// 🔎 Sort/Filter pipeline - the table view over a plan list
//
// Filters compose with AND, the sort is stable in both directions,
// and the input slice is never touched: every call returns a new Vec.

use crate::entities::company::sort_companies;
use crate::error::{PlanBoardError, Result};
use crate::plan::{Plan, PlanType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 50;

// ============================================================================
// FILTERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(PlanType),
}

impl TypeFilter {
    pub fn matches(&self, plan: &Plan) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(plan_type) => plan.plan_type == *plan_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = PlanBoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "now" => Ok(TypeFilter::Only(PlanType::Now)),
            "plan" => Ok(TypeFilter::Only(PlanType::Plan)),
            other => Err(PlanBoardError::InvalidFilter(format!(
                "unknown type '{}' (expected now, plan or all)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompanyFilter {
    #[default]
    All,

    /// Exact raw-string match, no normalization
    Exact(String),
}

impl CompanyFilter {
    pub fn matches(&self, plan: &Plan) -> bool {
        match self {
            CompanyFilter::All => true,
            CompanyFilter::Exact(company) => plan.company == *company,
        }
    }
}

/// $100k-wide pricing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceBand {
    #[default]
    All,

    /// 1..=9 → "10s".."90s", price in [n*100k, n*100k + 99,999].
    /// 10 → "100s", price >= 1,000,000.
    Hundreds(u8),
}

impl PriceBand {
    pub fn matches(&self, price: f64) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Hundreds(_) if price <= 0.0 => false,
            PriceBand::Hundreds(10) => price >= 1_000_000.0,
            PriceBand::Hundreds(n) => {
                let low = f64::from(*n) * 100_000.0;
                price >= low && price <= low + 99_999.0
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            PriceBand::All => "all".to_string(),
            PriceBand::Hundreds(n) => format!("{}0s", n),
        }
    }

    /// Every band, cheapest first, without the pass-through
    pub fn all_bands() -> Vec<PriceBand> {
        (1..=10).map(PriceBand::Hundreds).collect()
    }
}

impl FromStr for PriceBand {
    type Err = PlanBoardError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_lowercase();
        if label == "all" {
            return Ok(PriceBand::All);
        }

        label
            .strip_suffix("0s")
            .and_then(|digits| digits.parse::<u8>().ok())
            .filter(|n| (1..=10).contains(n))
            .map(PriceBand::Hundreds)
            .ok_or_else(|| {
                PlanBoardError::InvalidFilter(format!(
                    "unknown price band '{}' (expected 10s..90s, 100s or all)",
                    s
                ))
            })
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanFilter {
    pub plan_type: TypeFilter,
    pub company: CompanyFilter,
    pub price_band: PriceBand,
}

impl PlanFilter {
    pub fn matches(&self, plan: &Plan) -> bool {
        self.plan_type.matches(plan)
            && self.company.matches(plan)
            && self.price_band.matches(plan.price)
    }
}

// ============================================================================
// SORT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    PlanName,
    #[default]
    Price,
    Sqft,
    LastUpdated,
}

impl SortKey {
    fn compare(&self, a: &Plan, b: &Plan) -> Ordering {
        match self {
            SortKey::PlanName => a.plan_name.cmp(&b.plan_name),
            SortKey::Price => a.price.total_cmp(&b.price),
            SortKey::Sqft => a.sqft.total_cmp(&b.sqft),
            // Unparseable timestamps sort as earliest
            SortKey::LastUpdated => a.last_updated_millis().cmp(&b.last_updated_millis()),
        }
    }
}

impl FromStr for SortKey {
    type Err = PlanBoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "plan_name" | "name" => Ok(SortKey::PlanName),
            "price" => Ok(SortKey::Price),
            "sqft" => Ok(SortKey::Sqft),
            "last_updated" | "updated" => Ok(SortKey::LastUpdated),
            other => Err(PlanBoardError::InvalidFilter(format!(
                "unknown sort key '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = PlanBoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(PlanBoardError::InvalidFilter(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

/// Filter, then stable-sort, into a new Vec
pub fn filter_and_sort(
    plans: &[Plan],
    filter: &PlanFilter,
    sort_key: SortKey,
    direction: SortDirection,
) -> Vec<Plan> {
    let mut view: Vec<Plan> = plans.iter().filter(|p| filter.matches(p)).cloned().collect();

    // slice::sort_by is stable; reversing the comparator keeps ties in input order
    view.sort_by(|a, b| match direction {
        SortDirection::Asc => sort_key.compare(a, b),
        SortDirection::Desc => sort_key.compare(b, a),
    });

    view
}

/// Raw company names present in a view, home builder first
pub fn company_tabs(plans: &[Plan], home_builder: &str) -> Vec<String> {
    let names: Vec<&str> = plans.iter().map(|p| p.company.as_str()).collect();
    sort_companies(&names, home_builder)
}

// ============================================================================
// PAGINATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 1-based, clamped into range
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [Plan],
}

impl<'a> Page<'a> {
    /// Slice one page out of a sorted view
    pub fn of(view: &'a [Plan], requested: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = view.len().div_ceil(page_size);
        let number = requested.clamp(1, total_pages.max(1));

        let start = ((number - 1) * page_size).min(view.len());
        let end = (start + page_size).min(view.len());

        Page {
            number,
            total_pages,
            items: &view[start..end],
        }
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

// ============================================================================
// TESTS
// ============================================================================
