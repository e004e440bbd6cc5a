// Builder entities
//
// - company: canonical identity + spelling normalization
// - color: display color per canonical builder

pub mod color;
pub mod company;

pub use color::{color_for, CompanyColor, DEFAULT_COLOR};
pub use company::{
    canonical_name, canonicalize, is_same_builder, is_same_company, normalize_for_grouping,
    sort_companies, CanonicalCompany, CompanyRegistry, DEFAULT_HOME_BUILDER,
};
