use crate::api::transactions::TransactionsSource;
use crate::operations::dashboard::{Dashboard, LoadStatus};
use crate::utils::format::Formatter;
use std::fmt::Write;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Loads the dashboard once and writes it to stdout as plain text.
pub fn print_dashboard(
    runtime: &Runtime,
    source: Arc<dyn TransactionsSource>,
    formatter: Formatter,
) -> Result<(), String> {
    let mut dashboard = Dashboard::mount(runtime.handle(), source, formatter);
    runtime.block_on(dashboard.settled());

    if let LoadStatus::Failed(message) = dashboard.status() {
        return Err(format!("{}: {}", dashboard.labels().load_failed, message));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(&mut out, &render_plain(&dashboard))
}

fn emit<W: io::Write>(out: &mut W, text: &str) -> Result<(), String> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| format!("Failed to write dashboard: {}", e))
}

/// Cards first, one per line and keyed by their identifier, then the table.
pub fn render_plain(dashboard: &Dashboard) -> String {
    let labels = dashboard.labels();
    let mut out = String::new();

    let cards = dashboard.cards();
    let label_width = cards
        .iter()
        .map(|card| card.label.chars().count())
        .max()
        .unwrap_or(0);
    for card in &cards {
        let _ = writeln!(
            out,
            "{:<15}  {:<label_width$}  {}",
            card.kind.test_id(),
            card.label,
            card.value,
        );
    }
    out.push('\n');

    let header = [labels.title, labels.price, labels.category, labels.date];
    let rows: Vec<[String; 4]> = dashboard
        .rows()
        .into_iter()
        .map(|row| [row.title, row.value, row.category, row.date])
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(&mut out, &header, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }

    if rows.is_empty() && dashboard.status() == &LoadStatus::Loaded {
        let _ = writeln!(out, "{}", labels.empty);
    }

    out
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transactions::TransactionsResponse;
    use crate::operations::dashboard::tests::{sample_response, FailingSource, StubSource};
    use crate::utils::format::Locale;
    use tokio::runtime::Handle;

    #[tokio::test]
    async fn test_render_plain_lists_cards_by_identifier() {
        let mut dashboard = Dashboard::mount(
            &Handle::current(),
            Arc::new(StubSource::new(sample_response())),
            Formatter::new(Locale::PtBr),
        );
        dashboard.settled().await;

        let text = render_plain(&dashboard);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("balance-income"));
        assert!(lines[0].ends_with("R$ 500,00"));
        assert!(lines[1].starts_with("balance-outcome"));
        assert!(lines[1].ends_with("R$ 200,00"));
        assert!(lines[2].starts_with("balance-total"));
        assert!(lines[2].ends_with("R$ 300,00"));

        assert!(lines[4].starts_with("Título"));
        assert!(lines[5].starts_with("Loan"));
        assert!(lines[6].starts_with("Website Hosting"));
        assert!(lines[6].contains("- R$ 200,00"));
        assert!(lines[6].ends_with("20/04/2020"));
    }

    #[tokio::test]
    async fn test_render_plain_empty_list() {
        let response = TransactionsResponse {
            transactions: Vec::new(),
            ..sample_response()
        };
        let mut dashboard = Dashboard::mount(
            &Handle::current(),
            Arc::new(StubSource::new(response)),
            Formatter::new(Locale::EnUs),
        );
        dashboard.settled().await;

        let text = render_plain(&dashboard);
        assert!(text.contains("Title | Price | Category | Date"));
        assert!(text.trim_end().ends_with("No transactions registered"));
    }

    struct ClosedPipe;

    impl io::Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_emit_reports_closed_output() {
        let result = emit(&mut ClosedPipe, "balance-total  Total  $1.00\n");
        let error = result.unwrap_err();
        assert!(error.contains("Failed to write dashboard"));
    }

    #[test]
    fn test_emit_writes_text() {
        let mut out = Vec::new();
        emit(&mut out, "Title | Price\n").unwrap();
        assert_eq!(out, b"Title | Price\n");
    }

    #[test]
    fn test_print_dashboard_reports_failure() {
        let runtime = Runtime::new().unwrap();
        let result = print_dashboard(
            &runtime,
            Arc::new(FailingSource),
            Formatter::new(Locale::EnUs),
        );

        let error = result.unwrap_err();
        assert!(error.contains("Could not load transactions"));
        assert!(error.contains("HTTP error 500"));
    }
}
