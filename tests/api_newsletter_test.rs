//! Integration tests for the newsletter signup endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{TestHarness, test_app};

    fn subscribe_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/subscribe-newsletter")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Tests a valid email lands in the newsletter sheet
    #[tokio::test]
    async fn it_appends_the_email_to_the_sheet() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app
            .oneshot(subscribe_request(r#"{"email": "ada@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rows = harness.sheets.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        let (sheet, row) = &rows[0];
        assert_eq!(sheet, "Newsletter");
        assert_eq!(row[0], "ada@example.com");
    }

    /// Tests a missing email is rejected
    #[tokio::test]
    async fn it_returns_400_for_missing_email() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app.oneshot(subscribe_request(r#"{}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(harness.sheets.calls.load(Ordering::SeqCst), 0);
    }

    /// Tests invalid email syntax is rejected
    #[tokio::test]
    async fn it_returns_400_for_invalid_email() {
        let harness = TestHarness::new();
        let app = test_app(&harness);

        let response = app
            .oneshot(subscribe_request(r#"{"email": "not-an-email"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(harness.sheets.calls.load(Ordering::SeqCst), 0);
    }

    /// Tests a sheet failure surfaces as a server error
    #[tokio::test]
    async fn it_returns_500_when_the_sheet_append_fails() {
        let harness = TestHarness::new();
        harness.sheets.fail.store(true, Ordering::SeqCst);
        let app = test_app(&harness);

        let response = app
            .oneshot(subscribe_request(r#"{"email": "ada@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
