// Plan Board - Core Library
// Data engine behind the new-home plans dashboard: fetch, canonicalize,
// aggregate, filter, export

pub mod aggregation;
pub mod chart;
pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod plan;
pub mod poller;
pub mod view;

// Re-export commonly used types
pub use aggregation::{
    aggregate, aggregate_with, company_communities, plans_for_community, plans_for_company,
    GroupBy, PriceRange, Summary,
};
pub use chart::{chart_title, price_series, Point, PriceChart, Series};
pub use client::{FileSource, PlanSource, PlansClient};
pub use config::Config;
pub use entities::{
    canonical_name, canonicalize, color_for, is_same_builder, is_same_company,
    normalize_for_grouping, sort_companies, CanonicalCompany, CompanyColor, CompanyRegistry,
    DEFAULT_COLOR, DEFAULT_HOME_BUILDER,
};
pub use error::{PlanBoardError, Result};
pub use export::{export_csv, export_file_name, write_csv, CSV_HEADER};
pub use pipeline::{
    company_tabs, filter_and_sort, CompanyFilter, Page, PlanFilter, PriceBand, SortDirection,
    SortKey, TypeFilter, DEFAULT_PAGE_SIZE,
};
pub use plan::{load_json, parse_plans, Plan, PlanSnapshot, PlanType};
pub use poller::{PollHandle, Poller};
pub use view::{Route, Screen, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
