// ═══════════════════════════════════════════════════════════════════
// Error Tests — ChartError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use expense_charts_core::errors::ChartError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api() {
        let err = ChartError::Api {
            source_name: "Supabase".into(),
            message: "HTTP 401".into(),
        };
        assert_eq!(err.to_string(), "API error (Supabase): HTTP 401");
    }

    #[test]
    fn network() {
        let err = ChartError::Network("connection reset".into());
        assert_eq!(err.to_string(), "Network error: connection reset");
    }

    #[test]
    fn deserialization() {
        let err = ChartError::Deserialization("bad row".into());
        assert_eq!(err.to_string(), "Deserialization error: bad row");
    }

    #[test]
    fn invalid_month_key() {
        let err = ChartError::InvalidMonthKey("2024-13".into());
        assert_eq!(err.to_string(), "Invalid month key: 2024-13 (expected YYYY-MM)");
    }

    #[test]
    fn config() {
        let err = ChartError::Config("SUPABASE_URL is not set".into());
        assert_eq!(err.to_string(), "Configuration error: SUPABASE_URL is not set");
    }

    #[test]
    fn orientation() {
        let err = ChartError::Orientation("not supported".into());
        assert_eq!(err.to_string(), "Orientation lock failed: not supported");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json() {
        let json_err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let err: ChartError = json_err.into();
        assert!(matches!(err, ChartError::Deserialization(_)));
    }

    #[test]
    fn from_chrono_parse() {
        let parse_err = NaiveDate::parse_from_str("2024-02-30", "%Y-%m-%d").unwrap_err();
        let err: ChartError = parse_err.into();
        match err {
            ChartError::Deserialization(msg) => assert!(msg.starts_with("invalid date: ")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn question_mark_propagates() {
        fn parse(s: &str) -> Result<NaiveDate, ChartError> {
            Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
        }
        assert!(parse("2024-01-31").is_ok());
        assert!(matches!(parse("yesterday"), Err(ChartError::Deserialization(_))));
    }
}
