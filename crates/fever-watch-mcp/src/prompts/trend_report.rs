//! Prompt `trend_report`: Summarize a day's temperature series.

use serde_json::Value;

use fever_watch::TemperatureUnit;

use crate::types::{McpResult, PromptGetResult, PromptMessage, ToolContent};

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let date = args.get("date").and_then(|v| v.as_str());
    if let Some(date) = date {
        fever_watch::parse_date_filter(date)?;
    }
    let unit: TemperatureUnit = match args.get("unit").and_then(|v| v.as_str()) {
        Some(raw) => raw.parse()?,
        None => TemperatureUnit::Celsius,
    };
    let unit_name = match unit {
        TemperatureUnit::Celsius => "celsius",
        TemperatureUnit::Fahrenheit => "fahrenheit",
    };

    let scope = match date {
        Some(date) => format!("on {date}"),
        None => "across all stored readings".to_string(),
    };
    let date_arg = date
        .map(|d| format!(", \"date\": \"{d}\""))
        .unwrap_or_default();

    let text = format!(
        "Give me a temperature report {scope}.\n\n\
         Please:\n\
         1. Call series_derive with {{\"unit\": \"{unit_name}\"{date_arg}}}\n\
         2. If the series is empty, say there is no data for this period\n\
         3. Otherwise report the minimum, maximum and average in {symbol}\n\
         4. State the trend (rising, falling or stable) and the fever_count\n\
         5. Point out the times of the highest readings",
        symbol = unit.symbol()
    );

    Ok(PromptGetResult {
        description: Some(format!("Temperature trend report {scope}")),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: ToolContent::Text { text },
        }],
    })
}
