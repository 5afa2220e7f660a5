use super::client::{ApiClient, ApiError};
use crate::models::balance::Balance;
use crate::models::transaction::Transaction;
use async_trait::async_trait;
use serde::Deserialize;

pub const TRANSACTIONS_PATH: &str = "/transactions";

/// Body of `GET /transactions`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub balance: Balance,
}

/// Where the dashboard reads its transactions and balance from.
#[async_trait]
pub trait TransactionsSource: Send + Sync {
    async fn list_transactions(&self) -> Result<TransactionsResponse, ApiError>;
}

#[async_trait]
impl TransactionsSource for ApiClient {
    async fn list_transactions(&self) -> Result<TransactionsResponse, ApiError> {
        self.get(TRANSACTIONS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve_once;
    use crate::models::transaction::TransactionType;
    use rust_decimal::Decimal;
    use std::time::Duration;

    const BODY: &str = r#"{
        "transactions": [
            {
                "id": "1",
                "title": "Loan",
                "value": 500,
                "type": "income",
                "category": { "title": "Others" },
                "created_at": "2020-04-20T12:00:00.000Z"
            },
            {
                "id": "2",
                "title": "Website Hosting",
                "value": 200,
                "type": "outcome",
                "category": { "title": "Hosting" },
                "created_at": "2020-04-21T12:00:00.000Z"
            }
        ],
        "balance": { "income": "500", "outcome": "200", "total": "300" }
    }"#;

    #[tokio::test]
    async fn test_list_transactions_reads_transactions_endpoint() {
        let (base_url, request) = serve_once("200 OK", BODY).await;
        let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let response = client.list_transactions().await.unwrap();
        assert_eq!(response.transactions.len(), 2);
        assert_eq!(response.transactions[0].id, "1");
        assert_eq!(response.transactions[1].transaction_type, TransactionType::Outcome);
        assert_eq!(response.balance.total, Some(Decimal::new(300, 0)));

        let request_line = request.await.unwrap();
        assert!(request_line.starts_with("GET /transactions HTTP/1.1"));
    }

    #[test]
    fn test_missing_balance_stays_unset() {
        let response: TransactionsResponse =
            serde_json::from_str(r#"{ "transactions": [] }"#).unwrap();
        assert!(response.transactions.is_empty());
        assert_eq!(response.balance, Balance::default());
    }

    #[test]
    fn test_missing_transactions_is_rejected() {
        let result: Result<TransactionsResponse, _> =
            serde_json::from_str(r#"{ "balance": { "total": 1 } }"#);
        assert!(result.is_err());
    }
}
