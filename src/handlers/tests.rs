#[cfg(test)]
mod tests {
    use warp::http::StatusCode;
    use crate::handlers::handle_rejection;
    use crate::DevServerError;
    use warp::Reply;

    #[tokio::test]
    async fn test_handle_not_found_rejection() {
        let rejection = warp::reject::not_found();
        let response = handle_rejection(rejection).await.unwrap();
        assert_eq!(response.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_timeout_rejection() {
        let rejection = warp::reject::custom(DevServerError::Timeout);
        let response = handle_rejection(rejection).await.unwrap();
        assert_eq!(response.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_handle_upstream_rejection() {
        let rejection = warp::reject::custom(DevServerError::Upstream("connection refused".to_string()));
        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Upstream unreachable: connection refused");
    }

    #[tokio::test]
    async fn test_handle_invalid_uri_rejection() {
        let rejection = warp::reject::custom(DevServerError::InvalidUri("empty host".to_string()));
        let response = handle_rejection(rejection).await.unwrap();
        assert_eq!(response.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_handle_local_request_error_rejection() {
        let rejection = warp::reject::custom(DevServerError::Http("invalid HTTP method".to_string()));
        let response = handle_rejection(rejection).await.unwrap();
        assert_eq!(response.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
