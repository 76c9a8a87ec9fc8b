//! Error handling utilities for MCP server

use rmcp::ErrorData;
use specwiz_core::WizardError;

/// Helper to convert wizard errors to MCP errors
pub fn to_mcp_error(message: &str, error: &WizardError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

#[cfg(test)]
mod tests {
    use specwiz_core::StepType;

    use super::*;

    #[test]
    fn test_message_carries_error() {
        let error = WizardError::NoSelection {
            step_type: StepType::Features,
        };
        let data = to_mcp_error("Failed to approve step", &error);
        assert_eq!(
            data.message,
            "Failed to approve step: At least one item must be selected to approve step 'features'"
        );
    }
}
