//! Rendering guidance for payloads returned by `call-adamik-api`.
//!
//! The hint is a pure function of the endpoint path: no state, no I/O.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum PresentationHint {
    Default {
        highlights: Vec<&'static str>,
    },
    #[serde(rename_all = "camelCase")]
    Tabular {
        title: &'static str,
        description: &'static str,
        highlights: Vec<&'static str>,
        format: &'static str,
        sorting: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    List {
        title: &'static str,
        description: &'static str,
        time_format: &'static str,
        highlights: Vec<&'static str>,
        grouping: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Summary {
        title: &'static str,
        highlights: Vec<&'static str>,
        charts: Vec<&'static str>,
        recommendations: bool,
    },
    #[serde(rename_all = "camelCase")]
    Profile {
        title: &'static str,
        highlights: Vec<&'static str>,
        show_rank: bool,
        metrics: &'static str,
    },
}

impl PresentationHint {
    /// Picks the hint for an endpoint path. First matching pattern wins.
    pub fn for_path(path: &str) -> Self {
        if path.contains("/balances") {
            PresentationHint::Tabular {
                title: "Wallet Balance",
                description: "Present this as a nicely formatted table with token symbols and values.",
                highlights: vec!["totalValueUsd"],
                format: "Token balances should always show 4 decimal places for crypto assets.",
                sorting: "Sort tokens by value (highest first).",
            }
        } else if path.contains("/transactions") {
            PresentationHint::List {
                title: "Transaction History",
                description: "Present as a chronological list with the most recent transactions first.",
                time_format: "Convert timestamps to local readable time (e.g., 'June 1, 2023 at 2:30 PM').",
                highlights: vec!["recent"],
                grouping: "Group by day for better readability.",
            }
        } else if path.contains("/rewards") {
            PresentationHint::Summary {
                title: "Staking Rewards",
                highlights: vec!["totalRewards", "annualPercentageRate"],
                charts: vec!["rewards_over_time"],
                recommendations: true,
            }
        } else if path.contains("/validator") {
            PresentationHint::Profile {
                title: "Validator Profile",
                highlights: vec!["commission", "uptime", "votingPower"],
                show_rank: true,
                metrics: "Show performance metrics prominently",
            }
        } else {
            PresentationHint::Default { highlights: Vec::new() }
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            PresentationHint::Default { .. } => "default",
            PresentationHint::Tabular { .. } => "tabular",
            PresentationHint::List { .. } => "list",
            PresentationHint::Summary { .. } => "summary",
            PresentationHint::Profile { .. } => "profile",
        }
    }
}

/// A payload wrapped together with its rendering hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotated {
    pub data: Value,
    pub presentation: PresentationHint,
}

/// Wraps `data` as `{data, presentation}` using the hint for `path`.
pub fn annotate(path: &str, data: Value) -> Annotated {
    Annotated {
        presentation: PresentationHint::for_path(path),
        data,
    }
}
