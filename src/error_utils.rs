//! Error reporting for the command line.
//!
//! Every failure is reported once, on stderr, right before the process exits.

use tracing::debug;

use crate::error::CliError;

/// Report an error consistently with user-facing output.
pub fn report_error(error: &CliError) {
    debug!("{:?}", error);
    eprintln!("Error: {}", create_user_friendly_error(error));
}

/// Create a user-friendly error message from a technical error
///
/// Common HTTP failures get an actionable explanation, anything else is
/// reported as it is.
pub fn create_user_friendly_error<E: std::fmt::Display>(error: E) -> String {
    let error_str = error.to_string();
    let lower = error_str.to_lowercase();

    if error_str.contains("status 401") || lower.contains("unauthorized") {
        "Authentication failed. Please check your token (--token or CLOUD_TOKEN).".to_string()
    } else if error_str.contains("status 403") || lower.contains("forbidden") {
        "Access forbidden. You don't have permission to perform this operation.".to_string()
    } else if error_str.contains("status 404") {
        "Resource not found. Please check the organization, environment or asset id and try again."
            .to_string()
    } else if lower.contains("timed out") || lower.contains("timeout") {
        "Request timeout. The server took too long to respond. Please try again.".to_string()
    } else if lower.contains("error sending request") || lower.contains("connection refused") {
        "Network error. Please check the API domain and your connection, then try again.".to_string()
    } else {
        error_str
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_error_messages() {
        assert!(create_user_friendly_error("request failed with status 401: denied")
            .contains("Authentication failed"));
        assert!(create_user_friendly_error("request failed with status 404: missing")
            .contains("Resource not found"));
        assert!(create_user_friendly_error("operation timed out").contains("Request timeout"));
    }

    #[test]
    fn validation_messages_are_kept_verbatim() {
        assert_eq!(
            create_user_friendly_error("You must enter a name for your asset"),
            "You must enter a name for your asset"
        );
    }
}
