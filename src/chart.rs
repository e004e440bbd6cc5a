// 📈 Price vs square footage series, one line per builder

use crate::entities::color::color_for;
use crate::pipeline::TypeFilter;
use crate::plan::{Plan, PlanType};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Raw company name as it appears in the data
    pub label: String,
    pub color: String,
    /// Color with a "40" alpha suffix
    pub fill_color: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub title: String,
    /// Distinct non-zero sqft values, ascending
    pub x_labels: Vec<f64>,
    pub series: Vec<Series>,
}

pub fn chart_title(community: &str, plan_type: PlanType) -> String {
    format!(
        "{} - Price vs Sqft by Company - {} Homes",
        community,
        plan_type.label()
    )
}

/// Build the chart data for one community.
///
/// The community name must match exactly (case-sensitive).
pub fn price_series(community: &str, plans: &[Plan], plan_type: PlanType) -> PriceChart {
    let filter = TypeFilter::Only(plan_type);
    let filtered: Vec<&Plan> = plans
        .iter()
        .filter(|p| p.community == community && filter.matches(p))
        .collect();

    let mut companies: Vec<&str> = Vec::new();
    for plan in &filtered {
        if !companies.contains(&plan.company.as_str()) {
            companies.push(&plan.company);
        }
    }

    let series = companies
        .into_iter()
        .map(|company| {
            let mut points: Vec<Point> = filtered
                .iter()
                .filter(|p| p.company == company && p.sqft > 0.0 && p.price > 0.0)
                .map(|p| Point { x: p.sqft, y: p.price })
                .collect();
            points.sort_by(|a, b| a.x.total_cmp(&b.x));

            let color = color_for(company);
            if color.is_default() {
                debug!(company, "no registered color, using default");
            }
            Series {
                label: company.to_string(),
                color: color.to_string(),
                fill_color: color.with_alpha("40"),
                points,
            }
        })
        .collect();

    let mut x_labels: Vec<f64> = filtered
        .iter()
        .map(|p| p.sqft)
        .filter(|sqft| *sqft > 0.0)
        .collect();
    x_labels.sort_by(|a, b| a.total_cmp(b));
    x_labels.dedup();

    PriceChart {
        title: chart_title(community, plan_type),
        x_labels,
        series,
    }
}
