pub mod errors;
pub mod models;
pub mod providers;
pub mod render;
pub mod services;

use chrono::NaiveDate;
use models::{
    chart::{DonutSeries, FullscreenChart, MonthTotal, Orientation},
    record::{Category, MonthKey, Record},
    settings::Settings,
};
use providers::traits::{OrientationLock, RecordSource};
use services::aggregation_service::AggregationService;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use errors::ChartError;

/// Legend text under the line chart.
pub const LINE_LEGEND_LABEL: &str = "Total Expenses";

/// Identifies one fetch request. Only the most recently issued token may
/// replace the held records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

/// Everything needed to run one fetch against a [`RecordSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub token: FetchToken,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub categories: Vec<Category>,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Records replaced; carries the new record count.
    Applied(usize),
    /// The source failed; previous records kept, error stored.
    Failed,
    /// A newer fetch was issued meanwhile; result discarded.
    Stale,
}

/// The `depth` most recent months ending at `today`'s month, newest first.
pub fn available_months(today: NaiveDate, depth: usize) -> Vec<MonthKey> {
    std::iter::successors(Some(MonthKey::from_date(today)), |m| Some(m.prev()))
        .take(depth)
        .collect()
}

/// Chart screen controller.
///
/// Owns the category filter, the month range, the last fetched records
/// and the fullscreen state. Fetching only happens when asked; changing
/// the filter or range never triggers one.
#[must_use]
pub struct ChartScreen<S: RecordSource, O: OrientationLock> {
    source: S,
    orientation: O,
    settings: Settings,
    aggregation: AggregationService,
    today: NaiveDate,
    filter: BTreeSet<Category>,
    start_month: MonthKey,
    end_month: MonthKey,
    records: Vec<Record>,
    fullscreen: Option<FullscreenChart>,
    last_error: Option<String>,
    latest_token: u64,
}

impl<S: RecordSource, O: OrientationLock> std::fmt::Debug for ChartScreen<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartScreen")
            .field("source", &self.source.name())
            .field("filter", &self.filter)
            .field("start_month", &self.start_month)
            .field("end_month", &self.end_month)
            .field("records", &self.records.len())
            .field("fullscreen", &self.fullscreen)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl<S: RecordSource, O: OrientationLock> ChartScreen<S, O> {
    /// Create a screen with every category selected and the range spanning
    /// `settings.default_start_month` to `today`'s month.
    pub fn new(source: S, orientation: O, settings: Settings, today: NaiveDate) -> Result<Self, ChartError> {
        let end_month = MonthKey::from_date(today);
        let start_month: MonthKey = settings.default_start_month.parse()?;
        Ok(Self {
            source,
            orientation,
            settings,
            aggregation: AggregationService::new(),
            today,
            filter: Category::ALL.into_iter().collect(),
            start_month: start_month.min(end_month),
            end_month,
            records: Vec::new(),
            fullscreen: None,
            last_error: None,
            latest_token: 0,
        })
    }

    /// Create a screen with default settings, dated by the local clock.
    pub fn with_defaults(source: S, orientation: O) -> Result<Self, ChartError> {
        let today = chrono::Local::now().date_naive();
        Self::new(source, orientation, Settings::default(), today)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Filter & Range ──────────────────────────────────────────────

    #[must_use]
    pub fn filter(&self) -> &BTreeSet<Category> {
        &self.filter
    }

    /// Selected categories in chip order.
    #[must_use]
    pub fn selected_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.filter.contains(c))
            .collect()
    }

    /// Add or remove one category from the filter.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.filter.remove(&category) {
            self.filter.insert(category);
        }
        debug!(%category, selected = self.filter.len(), "category toggled");
    }

    pub fn set_filter(&mut self, categories: impl IntoIterator<Item = Category>) {
        self.filter = categories.into_iter().collect();
    }

    #[must_use]
    pub fn start_month(&self) -> MonthKey {
        self.start_month
    }

    #[must_use]
    pub fn end_month(&self) -> MonthKey {
        self.end_month
    }

    /// Pick the start month; an end month earlier than it moves up to match.
    pub fn select_start_month(&mut self, month: MonthKey) {
        self.start_month = month;
        if self.end_month < month {
            self.end_month = month;
        }
    }

    /// Pick the end month; a start month later than it moves back to match.
    pub fn select_end_month(&mut self, month: MonthKey) {
        self.end_month = month;
        if self.start_month > month {
            self.start_month = month;
        }
    }

    /// Months offered by the month pickers, newest first.
    #[must_use]
    pub fn available_months(&self) -> Vec<MonthKey> {
        available_months(self.today, self.settings.month_picker_depth)
    }

    // ── Fetching ────────────────────────────────────────────────────

    /// Concrete dates for the selected months: the first day of the start
    /// month through the last day of the end month.
    pub fn fetch_range(&self) -> Result<(NaiveDate, NaiveDate), ChartError> {
        let start = self
            .start_month
            .first_day()
            .ok_or_else(|| ChartError::InvalidMonthKey(self.start_month.to_string()))?;
        let end = self
            .end_month
            .last_day()
            .ok_or_else(|| ChartError::InvalidMonthKey(self.end_month.to_string()))?;
        Ok((start, end))
    }

    /// Issue a new fetch token, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self) -> Result<FetchRequest, ChartError> {
        let (start, end) = self.fetch_range()?;
        self.latest_token += 1;
        Ok(FetchRequest {
            token: FetchToken(self.latest_token),
            start,
            end,
            categories: self.selected_categories(),
        })
    }

    /// Apply the result of the fetch identified by `token`.
    ///
    /// Results for superseded tokens are dropped. A failure keeps the
    /// current records and stores a notice in [`last_error`](Self::last_error).
    pub fn complete_fetch(
        &mut self,
        token: FetchToken,
        result: Result<Vec<Record>, ChartError>,
    ) -> FetchOutcome {
        if token.0 != self.latest_token {
            warn!(token = token.0, latest = self.latest_token, "discarding stale fetch result");
            return FetchOutcome::Stale;
        }
        match result {
            Ok(records) => {
                let count = records.len();
                info!(source = self.source.name(), records = count, "expense records fetched");
                self.records = records;
                self.last_error = None;
                FetchOutcome::Applied(count)
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "expense fetch failed; keeping previous records");
                self.last_error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch records for the current range and filter from the source.
    pub async fn fetch(&mut self) -> FetchOutcome {
        let request = match self.begin_fetch() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "cannot build fetch range");
                self.last_error = Some(e.to_string());
                return FetchOutcome::Failed;
            }
        };
        let result = self
            .source
            .fetch_records(request.start, request.end, &request.categories)
            .await;
        self.complete_fetch(request.token, result)
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Notice from the most recent failed fetch, cleared by a successful one.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Chart Data ──────────────────────────────────────────────────

    /// Whether any records are held, i.e. whether previews can be shown.
    #[must_use]
    pub fn has_chart_data(&self) -> bool {
        !self.records.is_empty()
    }

    /// Monthly totals for the line chart.
    #[must_use]
    pub fn month_series(&self) -> Vec<MonthTotal> {
        self.aggregation
            .aggregate_by_month(&self.records, &self.filter, self.start_month, self.end_month)
    }

    /// Slices, title and legend label for the donut chart.
    #[must_use]
    pub fn donut_series(&self) -> DonutSeries {
        self.aggregation.donut_series(&self.records, &self.filter)
    }

    // ── Fullscreen ──────────────────────────────────────────────────

    #[must_use]
    pub fn fullscreen(&self) -> Option<FullscreenChart> {
        self.fullscreen
    }

    /// Open `chart` fullscreen. Returns `false` (and does nothing) when
    /// there is no data to show. The line chart is locked to landscape;
    /// switching away from it restores portrait.
    pub fn enter_fullscreen(&mut self, chart: FullscreenChart) -> bool {
        if !self.has_chart_data() {
            debug!(?chart, "fullscreen requested with no data");
            return false;
        }
        match (self.fullscreen, chart) {
            (_, FullscreenChart::Line) => self.lock_orientation(Orientation::Landscape),
            (Some(FullscreenChart::Line), _) => self.lock_orientation(Orientation::Portrait),
            _ => {}
        }
        self.fullscreen = Some(chart);
        true
    }

    /// Close the fullscreen chart, restoring portrait after the line chart.
    pub fn exit_fullscreen(&mut self) {
        if self.fullscreen.take() == Some(FullscreenChart::Line) {
            self.lock_orientation(Orientation::Portrait);
        }
    }

    fn lock_orientation(&self, orientation: Orientation) {
        if let Err(e) = self.orientation.lock(orientation) {
            warn!(%orientation, error = %e, "orientation lock failed");
        }
    }
}
