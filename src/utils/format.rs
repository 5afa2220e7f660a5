use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    PtBr,
    EnUs,
}

/// Fixed strings shown by the dashboard screens.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub income: &'static str,
    pub outcome: &'static str,
    pub total: &'static str,
    pub loading: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    pub category: &'static str,
    pub date: &'static str,
    pub empty: &'static str,
    pub load_failed: &'static str,
}

static PT_BR_LABELS: Labels = Labels {
    income: "Entradas",
    outcome: "Saídas",
    total: "Total",
    loading: "Carregando ...",
    title: "Título",
    price: "Preço",
    category: "Categoria",
    date: "Data",
    empty: "Nenhuma transação cadastrada",
    load_failed: "Não foi possível carregar as transações",
};

static EN_US_LABELS: Labels = Labels {
    income: "Income",
    outcome: "Outcome",
    total: "Total",
    loading: "Loading ...",
    title: "Title",
    price: "Price",
    category: "Category",
    date: "Date",
    empty: "No transactions registered",
    load_failed: "Could not load transactions",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    locale: Locale,
}

impl Formatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn labels(&self) -> &'static Labels {
        match self.locale {
            Locale::PtBr => &PT_BR_LABELS,
            Locale::EnUs => &EN_US_LABELS,
        }
    }

    /// Renders `value` as money in the locale's currency, two decimals,
    /// midpoints rounded away from zero.
    pub fn currency(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = format!("{:.2}", rounded.abs());
        let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        match self.locale {
            Locale::PtBr => format!("{}R$ {},{}", sign, group_thousands(whole, '.'), cents),
            Locale::EnUs => format!("{}${}.{}", sign, group_thousands(whole, ','), cents),
        }
    }

    /// Calendar date of `at` in the machine's local time zone.
    pub fn date(&self, at: &DateTime<Utc>) -> String {
        let local = at.with_timezone(&Local);
        match self.locale {
            Locale::PtBr => local.format("%d/%m/%Y").to_string(),
            Locale::EnUs => local.format("%-m/%-d/%Y").to_string(),
        }
    }
}

fn group_thousands(whole: &str, separator: char) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
