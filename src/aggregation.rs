// 📊 Aggregation - per-community / per-company summaries
//
// Group the flat plan list, then reduce each group to counts and price stats.
// Price statistics only see priced plans (price > 0); type counts see all.

use crate::entities::company::{canonicalize, is_same_builder, DEFAULT_HOME_BUILDER};
use crate::plan::{Plan, PlanType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// GROUPING DIMENSION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Literal community string, no normalization
    Community,

    /// Canonical builder identity
    Company,
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Community name, or canonical builder name
    pub name: String,

    /// Companies of a community group, communities of a company group.
    /// First-seen order.
    pub counterparts: Vec<String>,

    /// Count of type == "plan"
    pub total_plans: usize,

    /// Count of type == "now"
    pub total_now: usize,

    /// Rounded mean of prices > 0, or 0 when nothing is priced
    pub avg_price: f64,

    pub price_range: PriceRange,

    /// Count of price_changed_recently
    pub recent_changes: usize,
}

impl Summary {
    /// Reduce one group of plans
    pub fn from_plans(name: String, plans: &[&Plan], group_by: GroupBy) -> Self {
        let mut counterparts: Vec<String> = Vec::new();
        let mut total_plans = 0;
        let mut total_now = 0;
        let mut recent_changes = 0;
        let mut priced = PriceStats::default();

        for plan in plans {
            let counterpart = match group_by {
                GroupBy::Community => &plan.company,
                GroupBy::Company => &plan.community,
            };
            if !counterparts.iter().any(|c| c == counterpart) {
                counterparts.push(counterpart.clone());
            }

            match plan.plan_type {
                PlanType::Plan => total_plans += 1,
                PlanType::Now => total_now += 1,
            }

            if plan.price_changed_recently {
                recent_changes += 1;
            }

            if plan.is_priced() {
                priced.push(plan.price);
            }
        }

        Summary {
            name,
            counterparts,
            total_plans,
            total_now,
            avg_price: priced.rounded_mean(),
            price_range: priced.range(),
            recent_changes,
        }
    }

    pub fn total_listings(&self) -> usize {
        self.total_plans + self.total_now
    }
}

#[derive(Debug, Default)]
struct PriceStats {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl PriceStats {
    fn push(&mut self, price: f64) {
        if self.count == 0 {
            self.min = price;
            self.max = price;
        } else {
            self.min = self.min.min(price);
            self.max = self.max.max(price);
        }
        self.count += 1;
        self.sum += price;
    }

    fn rounded_mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum / self.count as f64).round()
    }

    fn range(&self) -> PriceRange {
        PriceRange {
            min: self.min,
            max: self.max,
        }
    }
}

// ============================================================================
// AGGREGATE
// ============================================================================

/// Summaries with the default home builder
pub fn aggregate(plans: &[Plan], group_by: GroupBy) -> Vec<Summary> {
    aggregate_with(plans, group_by, DEFAULT_HOME_BUILDER)
}

/// Summaries per group.
///
/// Company groups come back with the home builder first and the rest sorted
/// by name. Community groups keep first-seen order.
pub fn aggregate_with(plans: &[Plan], group_by: GroupBy, home_builder: &str) -> Vec<Summary> {
    let mut summaries: Vec<Summary> = group(plans, group_by)
        .into_iter()
        .map(|(name, members)| Summary::from_plans(name, &members, group_by))
        .collect();

    if group_by == GroupBy::Company {
        summaries.sort_by(|a, b| {
            let a_home = is_same_builder(&a.name, home_builder);
            let b_home = is_same_builder(&b.name, home_builder);
            b_home.cmp(&a_home).then_with(|| a.name.cmp(&b.name))
        });
    }

    summaries
}

/// Group plans in first-seen order, returning (display name, members)
fn group(plans: &[Plan], group_by: GroupBy) -> Vec<(String, Vec<&Plan>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&Plan>)> = Vec::new();

    for plan in plans {
        let (key, name) = match group_by {
            GroupBy::Community => (plan.community.clone(), plan.community.clone()),
            GroupBy::Company => {
                let company = canonicalize(&plan.company);
                (company.group_key(), company.display_name)
            }
        };

        match index.get(&key) {
            Some(&i) => groups[i].1.push(plan),
            None => {
                index.insert(key, groups.len());
                groups.push((name, vec![plan]));
            }
        }
    }

    groups
}

// ============================================================================
// DETAIL VIEWS
// ============================================================================

/// Plans of one builder under any of its spellings, input order
pub fn plans_for_company(plans: &[Plan], company: &str) -> Vec<Plan> {
    plans
        .iter()
        .filter(|plan| is_same_builder(&plan.company, company))
        .cloned()
        .collect()
}

/// Plans of one community, name compared case-insensitively
pub fn plans_for_community(plans: &[Plan], community: &str) -> Vec<Plan> {
    let wanted = community.to_lowercase();
    plans
        .iter()
        .filter(|plan| plan.community.to_lowercase() == wanted)
        .cloned()
        .collect()
}

/// Communities one builder is active in, alphabetical
pub fn company_communities(plans: &[Plan], company: &str) -> Vec<Summary> {
    let company_plans = plans_for_company(plans, company);
    let mut summaries = aggregate(&company_plans, GroupBy::Community);
    summaries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

// ============================================================================
// TESTS
// ============================================================================
