use serde::{Deserialize, Serialize};

/// Default donut palette, cycled when there are more slices than colours.
pub const DEFAULT_PALETTE: [&str; 11] = [
    "#42A5F5", "#66BB6A", "#FFA726", "#AB47BC", "#EC407A", "#26C6DA", "#FF7043", "#9CCC65",
    "#7E57C2", "#FFCA28", "#26A69A",
];

/// User-facing chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Symbol prefixed to every displayed amount (e.g., "₹", "$").
    pub currency_symbol: String,

    /// Ordered segment colours as `#RRGGBB` strings.
    pub palette: Vec<String>,

    /// Start month selected when the chart screen opens (`YYYY-MM`).
    pub default_start_month: String,

    /// How many months back the month picker offers.
    pub month_picker_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            default_start_month: "2023-01".to_string(),
            month_picker_depth: 36,
        }
    }
}
