// 🎨 Builder colors - one stable color per canonical builder
//
// Lookups resolve through the canonical name, so every spelling the
// company registry merges also shares a color.

use super::company::{canonicalize, normalize_for_grouping};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Gray, for builders nobody registered a color for
pub const DEFAULT_COLOR: CompanyColor = CompanyColor("#888");

/// Keyed by canonical display name
const COMPANY_COLORS: &[(&str, &str)] = &[
    ("DR Horton", "#2563eb"),
    ("UnionMain Homes", "#e11d48"),
    ("M/I Homes", "#9c27b0"),
    ("Pacesetter Homes", "#ff9800"),
    ("Trophy Signature Homes", "#2e7d32"),
    ("HistoryMaker Homes", "#00a651"),
    ("K. Hovnanian Homes", "#ff6b35"),
    ("Highland Homes", "#ec4899"),
    ("Beazer Homes", "#f43f5e"),
    ("Redfin", "#7c3aed"),
    ("Chesmar Homes", "#8b5cf6"),
    ("Perry Homes", "#6366f1"),
    ("Coventry Homes", "#0ea5e9"),
    ("William Ryan Homes", "#4f46e5"),
    ("Rockwell Homes", "#84cc16"),
    ("American Legend Homes", "#14b8a6"),
    ("AshtonWoods Homes", "#64748b"),
    ("Bloomfield Homes", "#d946ef"),
    ("Brightland Homes", "#f97316"),
    ("David Weekley Homes", "#eab308"),
    ("Shaddock Homes", "#78716c"),
    ("Chafin Communities", "#059669"),
    ("David Homes", "#dc2626"),
    ("Eastwood Homes", "#7c2d12"),
    ("Fischer Homes", "#1e40af"),
    ("Kittle Homes", "#10b981"),
    ("Millcroft Townhomes", "#a855f7"),
    ("Evanshire Townhomes", "#ef4444"),
    ("Wards Crossing Townhomes", "#ea580c"),
    ("Waterside Condos", "#0891b2"),
    ("Waterside Townhomes", "#16a34a"),
    ("BlueHaven Homes", "#8b5a2b"),
    ("Christie Homes", "#9333ea"),
    ("Starlight Homes", "#22d3ee"),
    ("Piedmont Homes", "#fbbf24"),
    ("DavidSon Homes", "#c026d3"),
    ("Centex", "#0369a1"),
];

static COLORS_BY_KEY: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    COMPANY_COLORS
        .iter()
        .map(|(name, color)| (normalize_for_grouping(name), *color))
        .collect()
});

/// Hex color token, e.g. `#2563eb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CompanyColor(&'static str);

impl CompanyColor {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_default(&self) -> bool {
        *self == DEFAULT_COLOR
    }

    /// Append a two-digit hex alpha, used for translucent chart fills
    pub fn with_alpha(&self, alpha: &str) -> String {
        format!("{}{}", self.0, alpha)
    }
}

impl fmt::Display for CompanyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Color for a raw or canonical builder name
pub fn color_for(name: &str) -> CompanyColor {
    let key = canonicalize(name).group_key();
    COLORS_BY_KEY
        .get(&key)
        .map(|color| CompanyColor(*color))
        .unwrap_or(DEFAULT_COLOR)
}
