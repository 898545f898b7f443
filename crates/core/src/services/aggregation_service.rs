use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::models::chart::{CategorySlice, DonutSeries, MonthTotal};
use crate::models::record::{Category, MonthKey, Record};

/// Reduces fetched records into the series the charts consume.
///
/// Stateless: each call recomputes from the record slice it is given.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Sum amounts per calendar month for records whose category is in
    /// `filter`, ascending by month and clipped to `[start, end]`.
    ///
    /// Clipping is by position within the observed months. If either bound
    /// was never observed, the whole ascending series is returned instead:
    /// missing months are not synthesised as zero buckets.
    pub fn aggregate_by_month(
        &self,
        records: &[Record],
        filter: &BTreeSet<Category>,
        start: MonthKey,
        end: MonthKey,
    ) -> Vec<MonthTotal> {
        let (start, end) = if start > end { (end, start) } else { (start, end) };

        let mut buckets: BTreeMap<MonthKey, f64> = BTreeMap::new();
        let mut skipped = 0usize;
        for record in records {
            if !filter.contains(&record.category()) {
                skipped += 1;
                continue;
            }
            *buckets.entry(record.month()).or_insert(0.0) += record.amount;
        }
        debug!(
            record_count = records.len(),
            skipped,
            month_count = buckets.len(),
            "Aggregated records by month"
        );

        let entries: Vec<MonthTotal> = buckets
            .into_iter()
            .map(|(month, total)| MonthTotal::new(month, total))
            .collect();

        let start_idx = entries.iter().position(|e| e.month == start);
        let end_idx = entries.iter().position(|e| e.month == end);
        match (start_idx, end_idx) {
            (Some(s), Some(e)) => entries[s..=e].to_vec(),
            _ => {
                debug!(%start, %end, "Range bound not observed, returning unclipped series");
                entries
            }
        }
    }

    /// Sum amounts per category for records whose category is in `filter`,
    /// sorted by descending total. Equal totals keep first-seen order.
    pub fn aggregate_by_category(
        &self,
        records: &[Record],
        filter: &BTreeSet<Category>,
    ) -> Vec<CategorySlice> {
        let totals = sum_in_first_seen_order(
            records
                .iter()
                .filter(|r| filter.contains(&r.category()))
                .map(|r| (r.category().as_str().to_string(), r.amount)),
        );
        sorted_descending(totals)
    }

    /// Drill-down of a single category into its sub-labels (meal type,
    /// drink type, ...), sorted by descending total.
    ///
    /// Records without a sub-label are counted under the category name.
    /// Categories that declare no sub-label always yield an empty series,
    /// so callers fall back to [`aggregate_by_category`](Self::aggregate_by_category).
    pub fn aggregate_by_subcategory(
        &self,
        records: &[Record],
        category: Category,
    ) -> Vec<CategorySlice> {
        let Some(accessor) = category.sub_label_accessor() else {
            return Vec::new();
        };

        let totals = sum_in_first_seen_order(
            records
                .iter()
                .filter(|r| r.category() == category)
                .map(|r| {
                    let label = accessor(&r.details).unwrap_or(category.as_str());
                    (label.to_string(), r.amount)
                }),
        );
        sorted_descending(totals)
    }

    /// Pick the series the donut shows for the current filter.
    ///
    /// With exactly one category selected and a non-empty drill-down, the
    /// subcategory series is used; otherwise the per-category series.
    pub fn donut_series(&self, records: &[Record], filter: &BTreeSet<Category>) -> DonutSeries {
        if filter.len() == 1 {
            if let Some(&category) = filter.iter().next() {
                let slices = self.aggregate_by_subcategory(records, category);
                if !slices.is_empty() {
                    return DonutSeries {
                        slices,
                        title: format!("{category} Spread"),
                        legend_label: "Subtypes".to_string(),
                    };
                }
            }
        }

        DonutSeries {
            slices: self.aggregate_by_category(records, filter),
            title: "Expense Type Breakdown".to_string(),
            legend_label: "Types".to_string(),
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulate `(label, amount)` pairs, keeping labels in first-seen order.
fn sum_in_first_seen_order(items: impl Iterator<Item = (String, f64)>) -> Vec<CategorySlice> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut slices: Vec<CategorySlice> = Vec::new();
    for (label, amount) in items {
        match index.get(&label) {
            Some(&i) => slices[i].value += amount,
            None => {
                index.insert(label.clone(), slices.len());
                slices.push(CategorySlice::new(label, amount));
            }
        }
    }
    slices
}

/// Stable sort by descending value.
fn sorted_descending(mut slices: Vec<CategorySlice>) -> Vec<CategorySlice> {
    slices.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    slices
}
