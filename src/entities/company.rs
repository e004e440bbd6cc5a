// 🏗️ Company Entity - canonical builder identity
//
// "Chesmar Homes", "ChesmarHomes" and "chesmar homes" are one builder.
//
// - The normalized key (lowercase, alphanumerics only) is the identity
// - The canonical display name is the preferred spelling of that identity
// - Unknown builders keep their raw spelling as display name

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Builder listed first in company views unless configured otherwise
pub const DEFAULT_HOME_BUILDER: &str = "UnionMain Homes";

/// Known spelling variants, keyed by normalized key
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("drhorton", "DR Horton"),
    ("unionmainhomes", "UnionMain Homes"),
    ("unionmain", "UnionMain Homes"),
    ("mihomes", "M/I Homes"),
    ("pacesetterhomes", "Pacesetter Homes"),
    ("trophysignaturehomes", "Trophy Signature Homes"),
    ("historymakerhomes", "HistoryMaker Homes"),
    ("historymaker", "HistoryMaker Homes"),
    ("khovnanianhomes", "K. Hovnanian Homes"),
    ("hovnanianhomes", "K. Hovnanian Homes"),
    ("highlandhomes", "Highland Homes"),
    ("beazerhomes", "Beazer Homes"),
    ("redfin", "Redfin"),
    ("chesmarhomes", "Chesmar Homes"),
    ("perryhomes", "Perry Homes"),
    ("coventryhomes", "Coventry Homes"),
    ("williamryanhomes", "William Ryan Homes"),
    ("rockwellhomes", "Rockwell Homes"),
    ("americanlegendhomes", "American Legend Homes"),
    ("ashtonwoodshomes", "AshtonWoods Homes"),
    ("bloomfieldhomes", "Bloomfield Homes"),
    ("brightlandhomes", "Brightland Homes"),
    ("davidweekleyhomes", "David Weekley Homes"),
    ("shaddockhomes", "Shaddock Homes"),
    ("chafincommunities", "Chafin Communities"),
    ("davidhomes", "David Homes"),
    ("eastwoodhomes", "Eastwood Homes"),
    ("fischerhomes", "Fischer Homes"),
    ("kittlehomes", "Kittle Homes"),
    ("millcrofttownhomes", "Millcroft Townhomes"),
    ("evanshiretownhomes", "Evanshire Townhomes"),
    ("wardscrossingtownhomes", "Wards Crossing Townhomes"),
    ("watersidecondos", "Waterside Condos"),
    ("watersidetownhomes", "Waterside Townhomes"),
    ("bluehavenhomes", "BlueHaven Homes"),
    ("christiehomes", "Christie Homes"),
    ("starlighthomes", "Starlight Homes"),
    ("piedmonthomes", "Piedmont Homes"),
    ("davidsonhomes", "DavidSon Homes"),
    ("centex", "Centex"),
    ("centexhomes", "Centex"),
];

static REGISTRY: LazyLock<CompanyRegistry> = LazyLock::new(CompanyRegistry::with_defaults);

// ============================================================================
// CANONICAL COMPANY
// ============================================================================

/// Derived identity of a builder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalCompany {
    /// Grouping key, equal for every spelling of the same builder
    pub key: String,

    /// Preferred display string
    pub display_name: String,
}

impl CanonicalCompany {
    /// Whether the registry knows a preferred spelling for this builder
    pub fn is_known(&self) -> bool {
        REGISTRY.lookup_key(&self.key).is_some()
    }

    /// Key of the display name. Aliases with different raw keys that share
    /// a canonical name ("Centex", "Centex Homes") share this key too.
    pub fn group_key(&self) -> String {
        normalize_for_grouping(&self.display_name)
    }
}

// ============================================================================
// COMPANY REGISTRY
// ============================================================================

/// Read-only table of known builders.
///
/// Built once from `CANONICAL_NAMES`; every lookup goes through the
/// normalized key so callers never depend on raw spelling.
#[derive(Debug)]
pub struct CompanyRegistry {
    names: HashMap<&'static str, &'static str>,
}

impl CompanyRegistry {
    pub fn with_defaults() -> Self {
        CompanyRegistry {
            names: CANONICAL_NAMES.iter().copied().collect(),
        }
    }

    /// Process-wide registry
    pub fn global() -> &'static CompanyRegistry {
        &REGISTRY
    }

    /// Display name for an already-normalized key
    pub fn lookup_key(&self, key: &str) -> Option<&'static str> {
        self.names.get(key).copied()
    }

    pub fn canonicalize(&self, raw: &str) -> CanonicalCompany {
        let key = normalize_for_grouping(raw);
        let display_name = match self.lookup_key(&key) {
            Some(name) => name.to_string(),
            None => raw.to_string(),
        };
        CanonicalCompany { key, display_name }
    }

    /// Distinct canonical display names, sorted
    pub fn known_display_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.names.values().copied().collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn count(&self) -> usize {
        self.known_display_names().len()
    }
}

impl Default for CompanyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// PUBLIC HELPERS
// ============================================================================

/// Normalize a builder name for grouping and equality
///
/// - Trim + lowercase
/// - Drop whitespace
/// - Drop every character outside `a-z0-9`
///
/// Example: "D.R. Horton" → "drhorton"
pub fn normalize_for_grouping(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub fn canonicalize(raw: &str) -> CanonicalCompany {
    REGISTRY.canonicalize(raw)
}

/// Preferred display name; unknown builders keep their raw spelling
pub fn canonical_name(raw: &str) -> String {
    canonicalize(raw).display_name
}

/// Two raw names denote the same builder iff their normalized keys match
pub fn is_same_company(a: &str, b: &str) -> bool {
    normalize_for_grouping(a) == normalize_for_grouping(b)
}

/// Whether two raw names resolve to the same canonical builder
///
/// Looser than `is_same_company`: registered aliases with different keys
/// ("unionmain", "UnionMain Homes") also match.
pub fn is_same_builder(a: &str, b: &str) -> bool {
    canonicalize(a).group_key() == canonicalize(b).group_key()
}

/// Distinct names with the home builder first, the rest in byte order
pub fn sort_companies<S: AsRef<str>>(names: &[S], home_builder: &str) -> Vec<String> {
    let mut home: Option<String> = None;
    let mut others: Vec<String> = Vec::new();

    for name in names {
        let name = name.as_ref();
        if is_same_builder(name, home_builder) {
            if home.is_none() {
                home = Some(name.to_string());
            } else if home.as_deref() != Some(name) && !others.iter().any(|o| o == name) {
                // A second spelling of the home builder sorts with the rest
                others.push(name.to_string());
            }
        } else if !others.iter().any(|o| o == name) {
            others.push(name.to_string());
        }
    }

    others.sort();
    home.into_iter().chain(others).collect()
}

// ============================================================================
// TESTS
// ============================================================================
