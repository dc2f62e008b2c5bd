//! Placeholder responses used when the network is unreachable.

use super::fetch::FetchResponse;

pub const AI_OFFLINE_TEXT: &str =
    "AI services are unavailable offline. Please check your internet connection.";

pub const OFFLINE_PAGE_HTML: &str =
    "<h1>You are offline!</h1><p>Please check your internet connection.</p>";

pub const OFFLINE_TEXT: &str = "You are offline.";

/// Returned for AI-host requests that fail at the network layer.
pub fn ai_unavailable() -> FetchResponse {
    FetchResponse::synthetic("text/plain", AI_OFFLINE_TEXT)
}

/// Returned for page navigations that miss the cache while offline.
pub fn offline_page() -> FetchResponse {
    FetchResponse::synthetic("text/html", OFFLINE_PAGE_HTML)
}

/// Returned for any other uncached request while offline.
pub fn offline_text() -> FetchResponse {
    FetchResponse::synthetic("text/plain", OFFLINE_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_page_is_html() {
        let page = offline_page();
        assert_eq!(page.header("Content-Type"), Some("text/html"));
        assert!(page.text().contains("You are offline!"));
    }

    #[test]
    fn test_ai_unavailable_is_plain_text() {
        let resp = ai_unavailable();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.text(), AI_OFFLINE_TEXT);
    }
}
