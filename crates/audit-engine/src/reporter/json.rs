//! JSON reporter for audit results

use anyhow::Result;
use shared_types::AuditResult;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    pub fn format(result: &AuditResult, pretty: bool) -> Result<String> {
        let mut output = if pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        output.push('\n');
        Ok(output)
    }
}
