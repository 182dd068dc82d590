//! Integration tests for the connectivity probe endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{TestHarness, test_app};

    /// Tests the probe reports success and echoes the request origin
    #[tokio::test]
    async fn it_reports_api_health() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/test")
                    .header(header::ORIGIN, "https://example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["origin"], "https://example.org");
        assert_eq!(body["data"]["service"], "formrelay");
    }

    /// Tests POSTed payloads are echoed back
    #[tokio::test]
    async fn it_echoes_posted_data() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/test")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"hello": "world"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["receivedData"]["hello"], "world");
    }

    /// Tests every response carries the security headers
    #[tokio::test]
    async fn it_sets_security_headers() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers.contains_key("strict-transport-security"));
    }

    /// Tests the root route responds with a liveness string
    #[tokio::test]
    async fn it_serves_the_root_route() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"formrelay API is running");
    }
}
