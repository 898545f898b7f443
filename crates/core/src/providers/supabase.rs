use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::ChartError;
use crate::models::record::{Category, Record};
use super::traits::RecordSource;

const SOURCE_NAME: &str = "Supabase";
const DEFAULT_TABLE: &str = "expenses";

/// Columns requested for every row: the fields aggregation needs plus the
/// per-category sub-label columns used for drill-down.
const SELECT_COLUMNS: &str =
    "Type,Date,Amount,Meal,Drink,Grocery,Travel,Shopping,Utility,Entertainment,Health,Investments";

/// Connection settings for the hosted expenses table.
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Public anon key sent as both `apikey` and bearer token
    pub anon_key: String,

    /// Table holding expense rows
    pub table: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Read `SUPABASE_URL`, `SUPABASE_ANON_KEY` and the optional
    /// `SUPABASE_EXPENSES_TABLE` from the environment (a `.env` file is
    /// loaded first when present).
    pub fn from_env() -> Result<Self, ChartError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ChartError> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let url = read("SUPABASE_URL")
            .ok_or_else(|| ChartError::Config("SUPABASE_URL is not set".into()))?;
        let anon_key = read("SUPABASE_ANON_KEY")
            .ok_or_else(|| ChartError::Config("SUPABASE_ANON_KEY is not set".into()))?;
        let table = read("SUPABASE_EXPENSES_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            table,
        })
    }

    /// PostgREST query for rows dated within `start..=end`, optionally
    /// restricted to `categories`.
    pub fn records_url(&self, start: NaiveDate, end: NaiveDate, categories: &[Category]) -> String {
        let mut url = format!(
            "{}/rest/v1/{}?select={SELECT_COLUMNS}&Date=gte.{}&Date=lte.{}",
            self.url.trim_end_matches('/'),
            self.table,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        if !categories.is_empty() {
            let types: Vec<&str> = categories.iter().map(Category::as_str).collect();
            url.push_str(&format!("&Type=in.({})", types.join(",")));
        }
        url
    }
}

/// Supabase (PostgREST) implementation of [`RecordSource`].
///
/// - **Endpoint**: `GET /rest/v1/{table}` with `gte`/`lte` date filters
/// - **Auth**: anon key in the `apikey` and `Authorization` headers
/// - **Rows**: one per expense; unknown types and bad dates are skipped
pub struct SupabaseRecordSource {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseRecordSource {
    pub fn new(config: SupabaseConfig) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    /// Source configured from the environment.
    pub fn from_env() -> Result<Self, ChartError> {
        SupabaseConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }
}

// ── PostgREST row type ──────────────────────────────────────────────

/// One row of the expenses table as PostgREST returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseRow {
    #[serde(rename = "Type")]
    pub expense_type: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Option<f64>,
    #[serde(rename = "Meal", default)]
    pub meal: Option<String>,
    #[serde(rename = "Drink", default)]
    pub drink: Option<String>,
    #[serde(rename = "Grocery", default)]
    pub grocery: Option<String>,
    #[serde(rename = "Travel", default)]
    pub travel: Option<String>,
    #[serde(rename = "Shopping", default)]
    pub shopping: Option<String>,
    #[serde(rename = "Utility", default)]
    pub utility: Option<String>,
    #[serde(rename = "Entertainment", default)]
    pub entertainment: Option<String>,
    #[serde(rename = "Health", default)]
    pub health: Option<String>,
    #[serde(rename = "Investments", default)]
    pub investments: Option<String>,
}

impl ExpenseRow {
    fn sub_label_for(&self, category: Category) -> Option<&String> {
        match category {
            Category::Food => self.meal.as_ref(),
            Category::Drinks => self.drink.as_ref(),
            Category::Groceries => self.grocery.as_ref(),
            Category::Travel => self.travel.as_ref(),
            Category::Shopping => self.shopping.as_ref(),
            Category::Utilities => self.utility.as_ref(),
            Category::Entertainment => self.entertainment.as_ref(),
            Category::Medical => self.health.as_ref(),
            Category::Investments => self.investments.as_ref(),
            Category::Personal | Category::Other => None,
        }
    }

    /// Convert to a [`Record`]. Timestamps are accepted and truncated to
    /// their date.
    pub fn into_record(self) -> Result<Record, ChartError> {
        let category: Category = self
            .expense_type
            .as_deref()
            .ok_or_else(|| ChartError::Deserialization("row has no Type".into()))?
            .parse()?;
        let raw_date = self
            .date
            .as_deref()
            .ok_or_else(|| ChartError::Deserialization("row has no Date".into()))?;
        let date = NaiveDate::parse_from_str(raw_date.get(..10).unwrap_or(raw_date), "%Y-%m-%d")?;
        let amount = self
            .amount
            .filter(|a| a.is_finite())
            .ok_or_else(|| ChartError::Deserialization("row has no numeric Amount".into()))?;

        Ok(match self.sub_label_for(category) {
            Some(label) => Record::with_sub_label(category, date, amount, label.clone()),
            None => Record::new(category, date, amount),
        })
    }
}

/// Convert fetched rows, dropping (and logging) any that cannot be read.
pub fn rows_to_records(rows: Vec<ExpenseRow>) -> Vec<Record> {
    let fetched = rows.len();
    let records: Vec<Record> = rows
        .into_iter()
        .filter_map(|row| match row.into_record() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "skipping unreadable expense row");
                None
            }
        })
        .collect();
    debug!(fetched, kept = records.len(), "converted expense rows");
    records
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecordSource for SupabaseRecordSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_records(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        categories: &[Category],
    ) -> Result<Vec<Record>, ChartError> {
        let url = self.config.records_url(start, end, categories);

        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChartError::Api {
                source_name: SOURCE_NAME.into(),
                message: format!("HTTP {status} from {}: {body}", self.config.table),
            });
        }

        let rows: Vec<ExpenseRow> = resp.json().await.map_err(|e| ChartError::Api {
            source_name: SOURCE_NAME.into(),
            message: format!("Failed to parse rows for {start}..{end}: {e}"),
        })?;

        Ok(rows_to_records(rows))
    }
}
