use crate::utils::format::Formatter;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Server-computed totals. Any field may be missing until the backend has
/// answered, and the wire form carries numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Balance {
    #[serde(default)]
    pub income: Option<Decimal>,
    #[serde(default)]
    pub outcome: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBalance {
    pub income: String,
    pub outcome: String,
    pub total: String,
}

impl Balance {
    /// Display strings for the three balance figures. Unset fields show the
    /// locale's loading placeholder.
    pub fn format(&self, formatter: &Formatter) -> FormattedBalance {
        let placeholder = formatter.labels().loading;
        let show = |field: Option<Decimal>| match field {
            Some(value) => formatter.currency(value),
            None => placeholder.to_string(),
        };

        FormattedBalance {
            income: show(self.income),
            outcome: show(self.outcome),
            total: show(self.total),
        }
    }
}
