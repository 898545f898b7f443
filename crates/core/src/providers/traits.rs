use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ChartError;
use crate::models::chart::Orientation;
use crate::models::record::{Category, Record};

/// Port to the expense data store.
///
/// The chart screen only ever reads through this trait, so the hosted
/// backend can be swapped (or mocked in tests) without touching the
/// aggregation or rendering code.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RecordSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Every record dated within `start..=end` whose category is in
    /// `categories`. An empty slice means no category restriction.
    async fn fetch_records(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        categories: &[Category],
    ) -> Result<Vec<Record>, ChartError>;
}

/// Port to the device's screen-orientation lock.
pub trait OrientationLock {
    fn lock(&self, orientation: Orientation) -> Result<(), ChartError>;
}
