//! Sheet catalog: what can be selected and where it lives
//!
//! A selection names a category, and depending on the category a country,
//! an intern/region and a month. The [`Resolver`] turns a selection into the
//! [`FetchTarget`] of one published CSV export.

pub mod resolve;

pub use resolve::{FetchTarget, Resolved, Resolver, Selection};

use crate::error::DashError;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Dashboard view, one per family of sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Category {
    /// Per-country, per-intern lead sheets
    #[value(alias = "lead")]
    Leads,
    /// Per-country campaign conversation sheets, one tab per month
    #[value(name = "conversations", alias = "campaign-conversation", alias = "campaign")]
    CampaignConversation,
    /// Primary sales leads, one tab per month
    #[value(name = "sales", alias = "primary-sales-leads", alias = "primary-sales")]
    PrimarySalesLeads,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Leads,
        Category::CampaignConversation,
        Category::PrimarySalesLeads,
    ];

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            Self::Leads => "Leads",
            Self::CampaignConversation => "Campaign Conversation",
            Self::PrimarySalesLeads => "Primary Sales Leads",
        }
    }

    /// Label printed in front of the row count
    pub fn count_label(self) -> &'static str {
        match self {
            Self::CampaignConversation => "Total Conversations",
            Self::Leads | Self::PrimarySalesLeads => "Total Entries",
        }
    }

    /// Prefix of the banner shown when loading fails
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::Leads => "Could not load lead data",
            Self::CampaignConversation => "Could not load campaign data",
            Self::PrimarySalesLeads => "Could not load sales data",
        }
    }

    pub fn needs_country(self) -> bool {
        matches!(self, Self::Leads | Self::CampaignConversation)
    }

    pub fn needs_region(self) -> bool {
        matches!(self, Self::Leads)
    }

    pub fn needs_month(self) -> bool {
        matches!(self, Self::CampaignConversation | Self::PrimarySalesLeads)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DashError;

    /// Accepts the display label or any CLI spelling, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .or_else(|| Self::from_str_cli(wanted))
            .ok_or_else(|| DashError::UnknownSelection {
                field: "category",
                value: wanted.to_string(),
            })
    }
}

impl Category {
    fn from_str_cli(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s, true).ok()
    }
}

/// Calendar month; each month is one tab in the monthly spreadsheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Tab name as it appears in the spreadsheets
    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashError::UnknownSelection {
                field: "month",
                value: wanted.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parses_ignoring_case() {
        assert_eq!("march".parse::<Month>().unwrap(), Month::March);
        assert_eq!(" DECEMBER ".parse::<Month>().unwrap(), Month::December);
    }

    #[test]
    fn month_rejects_unknown() {
        let err = "Smarch".parse::<Month>().unwrap_err();
        assert!(matches!(
            err,
            DashError::UnknownSelection { field: "month", .. }
        ));
    }

    #[test]
    fn months_in_calendar_order() {
        assert_eq!(Month::ALL.len(), 12);
        assert_eq!(Month::ALL[0].name(), "January");
        assert_eq!(Month::ALL[11].name(), "December");
        assert!(Month::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn category_parses_label_and_cli_names() {
        assert_eq!("Leads".parse::<Category>().unwrap(), Category::Leads);
        assert_eq!(
            "Campaign Conversation".parse::<Category>().unwrap(),
            Category::CampaignConversation
        );
        assert_eq!(
            "primary-sales-leads".parse::<Category>().unwrap(),
            Category::PrimarySalesLeads
        );
        assert_eq!("sales".parse::<Category>().unwrap(), Category::PrimarySalesLeads);
        assert!("inventory".parse::<Category>().is_err());
    }

    #[test]
    fn category_labels() {
        assert_eq!(Category::CampaignConversation.count_label(), "Total Conversations");
        assert_eq!(Category::Leads.count_label(), "Total Entries");
        assert_eq!(
            Category::PrimarySalesLeads.failure_prefix(),
            "Could not load sales data"
        );
    }
}
