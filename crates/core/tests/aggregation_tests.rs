// ═══════════════════════════════════════════════════════════════════
// Aggregation Tests — month buckets, category slices, subcategory
// drill-down, donut series selection
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::BTreeSet;

use expense_charts_core::models::chart::{CategorySlice, MonthTotal};
use expense_charts_core::models::record::{Category, MonthKey, Record};
use expense_charts_core::services::aggregation_service::AggregationService;

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn filter(categories: &[Category]) -> BTreeSet<Category> {
    categories.iter().copied().collect()
}

fn all_categories() -> BTreeSet<Category> {
    Category::ALL.into_iter().collect()
}

fn mixed_records() -> Vec<Record> {
    vec![
        Record::with_sub_label(Category::Food, make_date(2024, 1, 5), 120.0, "Lunch"),
        Record::new(Category::Travel, make_date(2024, 1, 9), 900.0),
        Record::with_sub_label(Category::Drinks, make_date(2024, 2, 1), 45.5, "Coffee"),
        Record::with_sub_label(Category::Food, make_date(2024, 2, 14), 300.0, "Dinner"),
        Record::new(Category::Personal, make_date(2024, 3, 3), 75.0),
        Record::new(Category::Utilities, make_date(2024, 3, 28), 1500.0),
        Record::with_sub_label(Category::Food, make_date(2024, 4, 30), 60.0, "Breakfast"),
        Record::new(Category::Other, make_date(2023, 12, 31), 10.0),
    ]
}

// ═══════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════

mod properties {
    use super::*;

    #[test]
    fn category_totals_match_filtered_sum() {
        let svc = AggregationService::new();
        let records = mixed_records();
        for f in [
            all_categories(),
            filter(&[Category::Food]),
            filter(&[Category::Food, Category::Utilities, Category::Other]),
            filter(&[]),
        ] {
            let slices = svc.aggregate_by_category(&records, &f);
            let sliced: f64 = slices.iter().map(|s| s.value).sum();
            let expected: f64 = records
                .iter()
                .filter(|r| f.contains(&r.category()))
                .map(|r| r.amount)
                .sum();
            assert!((sliced - expected).abs() < 1e-9, "filter {f:?}");
        }
    }

    #[test]
    fn category_slices_sorted_non_increasing() {
        let svc = AggregationService::new();
        let slices = svc.aggregate_by_category(&mixed_records(), &all_categories());
        assert!(slices.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn month_keys_unique_and_ascending() {
        let svc = AggregationService::new();
        let series = svc.aggregate_by_month(
            &mixed_records(),
            &all_categories(),
            month("2023-12"),
            month("2024-04"),
        );
        assert!(series.windows(2).all(|w| w[0].month < w[1].month));
        assert!(series
            .windows(2)
            .all(|w| w[0].month.to_string() < w[1].month.to_string()));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let svc = AggregationService::new();
        let records = mixed_records();
        let f = all_categories();
        assert_eq!(
            svc.aggregate_by_month(&records, &f, month("2024-01"), month("2024-03")),
            svc.aggregate_by_month(&records, &f, month("2024-01"), month("2024-03")),
        );
        assert_eq!(
            svc.aggregate_by_category(&records, &f),
            svc.aggregate_by_category(&records, &f),
        );
    }

    #[test]
    fn equal_totals_keep_first_seen_order() {
        let svc = AggregationService::new();
        let records = vec![
            Record::new(Category::Shopping, make_date(2024, 1, 1), 50.0),
            Record::new(Category::Medical, make_date(2024, 1, 2), 50.0),
            Record::new(Category::Travel, make_date(2024, 1, 3), 80.0),
        ];
        let slices = svc.aggregate_by_category(&records, &all_categories());
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Travel", "Shopping", "Medical"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// aggregate_by_month
// ═══════════════════════════════════════════════════════════════════

mod by_month {
    use super::*;

    #[test]
    fn single_month_scenario() {
        let svc = AggregationService::new();
        let records = vec![
            Record::new(Category::Food, make_date(2024, 1, 5), 100.0),
            Record::new(Category::Food, make_date(2024, 1, 20), 50.0),
            Record::new(Category::Drinks, make_date(2024, 1, 10), 30.0),
        ];
        let series = svc.aggregate_by_month(
            &records,
            &filter(&[Category::Food, Category::Drinks]),
            month("2024-01"),
            month("2024-01"),
        );
        assert_eq!(series, vec![MonthTotal::new(month("2024-01"), 180.0)]);
    }

    #[test]
    fn clips_to_observed_window() {
        let svc = AggregationService::new();
        let series = svc.aggregate_by_month(
            &mixed_records(),
            &all_categories(),
            month("2024-01"),
            month("2024-03"),
        );
        let months: Vec<String> = series.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(series[0].total, 1020.0);
        assert_eq!(series[1].total, 345.5);
        assert_eq!(series[2].total, 1575.0);
    }

    #[test]
    fn unobserved_bound_returns_unclipped_series() {
        let svc = AggregationService::new();
        let series = svc.aggregate_by_month(
            &mixed_records(),
            &all_categories(),
            month("2024-02"),
            month("2024-09"),
        );
        assert_eq!(series.len(), 5);
        assert_eq!(series[0].month, month("2023-12"));
        assert_eq!(series[4].month, month("2024-04"));
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let svc = AggregationService::new();
        let records = mixed_records();
        let f = all_categories();
        assert_eq!(
            svc.aggregate_by_month(&records, &f, month("2024-03"), month("2024-01")),
            svc.aggregate_by_month(&records, &f, month("2024-01"), month("2024-03")),
        );
    }

    #[test]
    fn filter_excludes_categories() {
        let svc = AggregationService::new();
        let series = svc.aggregate_by_month(
            &mixed_records(),
            &filter(&[Category::Food]),
            month("2024-01"),
            month("2024-04"),
        );
        let totals: Vec<f64> = series.iter().map(|m| m.total).collect();
        assert_eq!(totals, vec![120.0, 300.0, 60.0]);
    }

    #[test]
    fn no_records_gives_empty_series() {
        let svc = AggregationService::new();
        let series = svc.aggregate_by_month(&[], &all_categories(), month("2024-01"), month("2024-02"));
        assert!(series.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// aggregate_by_category / aggregate_by_subcategory
// ═══════════════════════════════════════════════════════════════════

mod by_category {
    use super::*;

    #[test]
    fn category_scenario() {
        let svc = AggregationService::new();
        let records = vec![
            Record::new(Category::Food, make_date(2024, 1, 5), 100.0),
            Record::new(Category::Food, make_date(2024, 1, 20), 50.0),
            Record::new(Category::Drinks, make_date(2024, 1, 10), 30.0),
        ];
        let slices = svc.aggregate_by_category(&records, &filter(&[Category::Food, Category::Drinks]));
        assert_eq!(
            slices,
            vec![CategorySlice::new("Food", 150.0), CategorySlice::new("Drinks", 30.0)]
        );
    }

    #[test]
    fn empty_filter_yields_no_slices() {
        let svc = AggregationService::new();
        assert!(svc.aggregate_by_category(&mixed_records(), &filter(&[])).is_empty());
    }

    #[test]
    fn meal_drill_down() {
        let svc = AggregationService::new();
        let records = vec![
            Record::with_sub_label(Category::Food, make_date(2024, 1, 1), 40.0, "Breakfast"),
            Record::with_sub_label(Category::Food, make_date(2024, 1, 2), 200.0, "Lunch"),
            Record::with_sub_label(Category::Food, make_date(2024, 1, 3), 35.0, "Breakfast"),
            Record::new(Category::Drinks, make_date(2024, 1, 3), 500.0),
        ];
        let slices = svc.aggregate_by_subcategory(&records, Category::Food);
        assert_eq!(
            slices,
            vec![CategorySlice::new("Lunch", 200.0), CategorySlice::new("Breakfast", 75.0)]
        );
    }

    #[test]
    fn missing_sub_label_counts_under_category_name() {
        let svc = AggregationService::new();
        let records = vec![
            Record::with_sub_label(Category::Travel, make_date(2024, 1, 1), 40.0, "Train"),
            Record::new(Category::Travel, make_date(2024, 1, 2), 60.0),
            Record::with_sub_label(Category::Travel, make_date(2024, 1, 3), 5.0, ""),
        ];
        let slices = svc.aggregate_by_subcategory(&records, Category::Travel);
        assert_eq!(
            slices,
            vec![CategorySlice::new("Travel", 65.0), CategorySlice::new("Train", 40.0)]
        );
    }

    #[test]
    fn category_without_sub_labels_has_no_drill_down() {
        let svc = AggregationService::new();
        assert!(svc
            .aggregate_by_subcategory(&mixed_records(), Category::Personal)
            .is_empty());
        assert!(svc
            .aggregate_by_subcategory(&mixed_records(), Category::Other)
            .is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// donut_series
// ═══════════════════════════════════════════════════════════════════

mod donut_series {
    use super::*;

    #[test]
    fn single_category_uses_subcategories() {
        let svc = AggregationService::new();
        let series = svc.donut_series(&mixed_records(), &filter(&[Category::Food]));
        assert_eq!(series.title, "Food Spread");
        assert_eq!(series.legend_label, "Subtypes");
        let labels: Vec<&str> = series.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Dinner", "Lunch", "Breakfast"]);
    }

    #[test]
    fn personal_falls_back_to_category_totals() {
        let svc = AggregationService::new();
        let series = svc.donut_series(&mixed_records(), &filter(&[Category::Personal]));
        assert_eq!(series.title, "Expense Type Breakdown");
        assert_eq!(series.legend_label, "Types");
        assert_eq!(series.slices, vec![CategorySlice::new("Personal", 75.0)]);
    }

    #[test]
    fn single_category_without_records_falls_back() {
        let svc = AggregationService::new();
        let series = svc.donut_series(&mixed_records(), &filter(&[Category::Medical]));
        assert_eq!(series.title, "Expense Type Breakdown");
        assert!(series.slices.is_empty());
    }

    #[test]
    fn several_categories_use_category_totals() {
        let svc = AggregationService::new();
        let series = svc.donut_series(&mixed_records(), &all_categories());
        assert_eq!(series.title, "Expense Type Breakdown");
        assert_eq!(series.slices[0], CategorySlice::new("Utilities", 1500.0));
        assert_eq!(series.slices.len(), 6);
    }
}
