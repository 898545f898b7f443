// ═══════════════════════════════════════════════════════════════════
// Model Tests — Category, ExpenseDetails, Record, MonthKey, Settings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use expense_charts_core::errors::ChartError;
use expense_charts_core::models::chart::MonthTotal;
use expense_charts_core::models::record::{Category, ExpenseDetails, MonthKey, Record};
use expense_charts_core::models::settings::{Settings, DEFAULT_PALETTE};

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Category ────────────────────────────────────────────────────────

mod category {
    use super::*;

    #[test]
    fn all_lists_eleven_distinct() {
        let mut all = Category::ALL.to_vec();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 11);
    }

    #[test]
    fn parses_its_own_name() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "Rent".parse::<Category>().unwrap_err();
        assert!(matches!(err, ChartError::Deserialization(_)));
        assert!("food".parse::<Category>().is_err());
    }

    #[test]
    fn sub_label_columns() {
        assert_eq!(Category::Food.sub_label_column(), Some("Meal"));
        assert_eq!(Category::Medical.sub_label_column(), Some("Health"));
        assert_eq!(Category::Utilities.sub_label_column(), Some("Utility"));
        assert_eq!(Category::Personal.sub_label_column(), None);
        assert_eq!(Category::Other.sub_label_column(), None);
    }

    #[test]
    fn accessor_exists_exactly_when_column_does() {
        for category in Category::ALL {
            assert_eq!(
                category.sub_label_accessor().is_some(),
                category.sub_label_column().is_some(),
                "{category}"
            );
        }
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&Category::Groceries).unwrap();
        assert_eq!(json, "\"Groceries\"");
    }
}

// ── ExpenseDetails / Record ─────────────────────────────────────────

mod details {
    use super::*;

    #[test]
    fn variant_matches_category() {
        for category in Category::ALL {
            let details = ExpenseDetails::new(category, Some("x".into()));
            assert_eq!(details.category(), category);
        }
    }

    #[test]
    fn sub_label_read_through_accessor() {
        let details = ExpenseDetails::new(Category::Drinks, Some("Coffee".into()));
        let accessor = Category::Drinks.sub_label_accessor().unwrap();
        assert_eq!(accessor(&details), Some("Coffee"));
    }

    #[test]
    fn empty_sub_label_is_absent() {
        let details = ExpenseDetails::new(Category::Food, Some(String::new()));
        assert_eq!(details.sub_label(), None);
    }

    #[test]
    fn personal_drops_sub_label() {
        let details = ExpenseDetails::new(Category::Personal, Some("Haircut".into()));
        assert_eq!(details, ExpenseDetails::Personal);
        assert_eq!(details.sub_label(), None);
    }

    #[test]
    fn record_month_and_category() {
        let record = Record::with_sub_label(Category::Food, make_date(2024, 2, 29), 80.0, "Lunch");
        assert_eq!(record.category(), Category::Food);
        assert_eq!(record.month().to_string(), "2024-02");
        assert_eq!(record.details.sub_label(), Some("Lunch"));
    }
}

// ── MonthKey ────────────────────────────────────────────────────────

mod month_key {
    use super::*;

    #[test]
    fn parse_and_display() {
        let key: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["2024-3", "24-03", "2024-13", "2024-00", "2024/03", "+024-03", "", "2024-03-01"] {
            let err = bad.parse::<MonthKey>().unwrap_err();
            assert!(matches!(err, ChartError::InvalidMonthKey(_)), "{bad}");
        }
    }

    #[test]
    fn ordering_is_chronological() {
        let a: MonthKey = "2023-12".parse().unwrap();
        let b: MonthKey = "2024-01".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.next(), b);
        assert_eq!(b.prev(), a);
    }

    #[test]
    fn first_and_last_day() {
        let feb: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(feb.first_day(), Some(make_date(2024, 2, 1)));
        assert_eq!(feb.last_day(), Some(make_date(2024, 2, 29)));
        let dec: MonthKey = "2023-12".parse().unwrap();
        assert_eq!(dec.last_day(), Some(make_date(2023, 12, 31)));
        let apr: MonthKey = "2023-04".parse().unwrap();
        assert_eq!(apr.last_day(), Some(make_date(2023, 4, 30)));
    }

    #[test]
    fn abbreviations() {
        let names: Vec<&str> = (1..=12)
            .map(|m| MonthKey::new(2024, m).unwrap().abbreviation())
            .collect();
        assert_eq!(
            names,
            vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
    }

    #[test]
    fn serializes_as_string() {
        let total = MonthTotal::new("2024-07".parse().unwrap(), 12.5);
        let json = serde_json::to_string(&total).unwrap();
        assert_eq!(json, r#"{"month":"2024-07","total":12.5}"#);
        let back: MonthTotal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, total);
        assert!(serde_json::from_str::<MonthKey>("\"2024-7\"").is_err());
    }
}

// ── Settings ────────────────────────────────────────────────────────

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.default_start_month, "2023-01");
        assert_eq!(settings.month_picker_depth, 36);
        assert_eq!(settings.palette.len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings {
            currency_symbol: "$".into(),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
