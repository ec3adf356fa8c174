use std::fmt;

/// The successful result of one node method, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcOutcome {
    pub method: String,
    pub label: String,
    pub result: serde_json::Value,
}

impl RpcOutcome {
    pub fn new(
        method: impl Into<String>,
        label: impl Into<String>,
        result: serde_json::Value,
    ) -> Self {
        Self {
            method: method.into(),
            label: label.into(),
            result,
        }
    }

    /// Pretty-printed JSON of the result, without the label.
    pub fn pretty_result(&self) -> String {
        serde_json::to_string_pretty(&self.result)
            .unwrap_or_else(|_| self.result.to_string())
    }

    /// `"<label> <pretty JSON>"`, the form printed by the CLI.
    pub fn render(&self) -> String {
        format!("{} {}", self.label, self.pretty_result())
    }
}

impl fmt::Display for RpcOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
