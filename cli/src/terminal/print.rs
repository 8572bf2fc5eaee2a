use routecheck_common::model::OverallResult;

/// The monitoring system reads the first line as the state; the JSON below it
/// is shown to the operator, summary first.
pub fn render(result: &OverallResult) -> String {
    let details: String = serde_json::to_string_pretty(result)
        .unwrap_or_else(|e| format!("{{\"error\": \"cannot render result: {e}\"}}"));

    format!("{}: {}\n{}", result.status().label(), result.summary(), details)
}

pub fn result(result: &OverallResult) {
    println!("{}", render(result));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
