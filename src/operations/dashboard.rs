use crate::api::client::ApiError;
use crate::api::transactions::{TransactionsResponse, TransactionsSource};
use crate::models::balance::{Balance, FormattedBalance};
use crate::models::transaction::{Transaction, TransactionType};
use crate::utils::format::{Formatter, Labels};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceKind {
    Income,
    Outcome,
    Total,
}

impl BalanceKind {
    /// Stable identifier external checks look the figure up by.
    pub fn test_id(self) -> &'static str {
        match self {
            BalanceKind::Income => "balance-income",
            BalanceKind::Outcome => "balance-outcome",
            BalanceKind::Total => "balance-total",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            BalanceKind::Income => "▲",
            BalanceKind::Outcome => "▼",
            BalanceKind::Total => "$",
        }
    }

    pub fn label(self, labels: &Labels) -> &'static str {
        match self {
            BalanceKind::Income => labels.income,
            BalanceKind::Outcome => labels.outcome,
            BalanceKind::Total => labels.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceCard {
    pub kind: BalanceKind,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub title: String,
    pub value: String,
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: String,
}

type LoadResult = Result<TransactionsResponse, ApiError>;

/// The single in-flight read of a mounted dashboard. Dropping it aborts the
/// task, so a late response is never applied.
struct PendingLoad {
    receiver: oneshot::Receiver<LoadResult>,
    task: JoinHandle<()>,
}

impl PendingLoad {
    fn spawn(runtime: &Handle, source: Arc<dyn TransactionsSource>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let task = runtime.spawn(async move {
            let result = source.list_transactions().await;
            if sender.send(result).is_err() {
                debug!("Dashboard unmounted before transactions arrived, dropping response");
            }
        });
        Self { receiver, task }
    }
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct Dashboard {
    transactions: Vec<Transaction>,
    balance: Balance,
    status: LoadStatus,
    pending: Option<PendingLoad>,
    formatter: Formatter,
}

impl Dashboard {
    /// Creates the dashboard and starts its one load on `runtime`.
    pub fn mount(runtime: &Handle, source: Arc<dyn TransactionsSource>, formatter: Formatter) -> Self {
        debug!("Mounting dashboard, requesting transactions");
        Self {
            transactions: Vec::new(),
            balance: Balance::default(),
            status: LoadStatus::Loading,
            pending: Some(PendingLoad::spawn(runtime, source)),
            formatter,
        }
    }

    /// Applies the load result if it has arrived. Returns true when the state
    /// changed.
    pub fn tick(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let outcome = match pending.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => None,
        };
        self.pending = None;
        self.finish(outcome);
        true
    }

    /// Waits until the load has either succeeded or failed.
    pub async fn settled(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let outcome = (&mut pending.receiver).await.ok();
        self.pending = None;
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: Option<LoadResult>) {
        match outcome {
            Some(Ok(response)) => {
                info!("Loaded {} transactions", response.transactions.len());
                for id in duplicate_ids(&response.transactions) {
                    warn!("Transaction id {} appears more than once", id);
                }
                // Both halves come from the same payload.
                self.transactions = response.transactions;
                self.balance = response.balance;
                self.status = LoadStatus::Loaded;
            }
            Some(Err(e)) => {
                warn!("Failed to load transactions: {}", e);
                self.status = LoadStatus::Failed(e.to_string());
            }
            None => {
                warn!("Transactions load ended without a response");
                self.status = LoadStatus::Failed("load ended without a response".to_string());
            }
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn labels(&self) -> &'static Labels {
        self.formatter.labels()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn formatted_balance(&self) -> FormattedBalance {
        self.balance.format(&self.formatter)
    }

    pub fn cards(&self) -> [BalanceCard; 3] {
        let labels = self.labels();
        let FormattedBalance {
            income,
            outcome,
            total,
        } = self.formatted_balance();

        [
            BalanceCard {
                kind: BalanceKind::Income,
                label: BalanceKind::Income.label(labels),
                value: income,
            },
            BalanceCard {
                kind: BalanceKind::Outcome,
                label: BalanceKind::Outcome.label(labels),
                value: outcome,
            },
            BalanceCard {
                kind: BalanceKind::Total,
                label: BalanceKind::Total.label(labels),
                value: total,
            },
        ]
    }

    /// One display row per held transaction, in server order.
    pub fn rows(&self) -> Vec<TransactionRow> {
        self.transactions
            .iter()
            .map(|tx| format_row(tx, &self.formatter))
            .collect()
    }
}

fn duplicate_ids(transactions: &[Transaction]) -> Vec<&str> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .map(|tx| tx.id.as_str())
        .filter(|id| !seen.insert(*id))
        .collect()
}

pub fn format_row(tx: &Transaction, formatter: &Formatter) -> TransactionRow {
    let value = match tx.transaction_type {
        TransactionType::Outcome => format!("- {}", formatter.currency(tx.value)),
        TransactionType::Income => formatter.currency(tx.value),
    };

    TransactionRow {
        title: tx.title.clone(),
        value,
        transaction_type: tx.transaction_type,
        category: tx.category.title.clone(),
        date: formatter.date(&tx.created_at),
    }
}
