use analytics::QueryResult;
use serde_json::json;

/// Renders a query result for stdout. Structured results become indented
/// JSON, plain messages are printed as-is.
pub fn render(result: &QueryResult) -> serde_json::Result<String> {
    match result {
        QueryResult::Unsupported(message) => Ok(message.clone()),
        result => serde_json::to_string_pretty(result),
    }
}

pub fn render_error(error: &anyhow::Error) -> String {
    json!({ "error": format!("{error:#}") }).to_string()
}
