//! The API endpoint URIs.

pub const DASHBOARD_VIEW: &str = "/";
pub const ANALYTICS_VIEW: &str = "/analytics";
pub const STATIC: &str = "/static";

pub const API_TRANSACTIONS: &str = "/api/transactions";
pub const API_TRANSACTION: &str = "/api/transactions/{transaction_id}";
pub const API_DASHBOARD_DATA: &str = "/api/dashboard-data";
pub const API_ANALYTICS: &str = "/api/analytics";

pub const TRANSACTIONS: &str = "/transactions";
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
pub const UPLOAD: &str = "/upload";
pub const EXPORT: &str = "/export";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Parameters are the names in braces, e.g. `{transaction_id}`. If there is no
/// parameter, the path is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::ANALYTICS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::API_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::API_DASHBOARD_DATA);
        assert_endpoint_is_valid_uri(endpoints::API_ANALYTICS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::UPLOAD);
        assert_endpoint_is_valid_uri(endpoints::EXPORT);
    }

    #[test]
    fn parameterised_endpoints_format_to_valid_uris() {
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::API_TRANSACTION, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION, 1));
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::API_TRANSACTION, 42),
            "/api/transactions/42"
        );
    }

    #[test]
    fn format_endpoint_keeps_suffix() {
        assert_eq!(format_endpoint("/a/{id}/b", 7), "/a/7/b");
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::API_TRANSACTIONS, 1),
            endpoints::API_TRANSACTIONS
        );
    }
}
