/// Errors from the AI service clients.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("AI service error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx reply that carried no usable text.
    #[error("AI service returned an empty response")]
    EmptyResponse,

    /// No API key is configured for this service.
    #[error("AI service not configured: {0}")]
    NotConfigured(&'static str),
}

/// Return the response unchanged on a 2xx status, else an [`AiError::Api`]
/// carrying the status and body text.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(AiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
