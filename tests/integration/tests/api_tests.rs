//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance (migrations are applied on startup)
//! - Environment variables: DATABASE_URL, API_TOKEN
//!
//! Each test works on freshly generated snowflake ids, so the suite is safe
//! to run in parallel against a shared database without cleanup.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use hackster_core::entities::EventOrigin;
use hackster_core::traits::EventQueueRepository;
use hackster_db::PgEventQueueRepository;
use integration_tests::{assert_json, assert_status, check_test_env, fixtures::*, TestServer};
use reqwest::StatusCode;

// ============================================================================
// Health and Metrics Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    assert!(response.headers().contains_key("x-request-id"));

    let health: HealthJson = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.checks.database, "healthy");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_metrics_exposition() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/metrics").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Record Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_join_creates_record() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    let outcome = server.apply_event(&join_event(id)).await.unwrap();
    assert_eq!(outcome, "applied");

    let response = server.get(&format!("/api/v1/records/{id}")).await.unwrap();
    let record: RecordJson = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(record.id, id.to_string());
    assert_eq!(record.status, "new");
    assert_eq!(record.version, 1);
    assert!(record.username.unwrap().starts_with("testuser"));
}

#[tokio::test]
async fn test_redelivered_event_is_skipped() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();
    let event = join_event(id);

    let first = server.apply_event(&event).await.unwrap();
    assert_eq!(first, "applied");

    // Same occurrence again (same dedup token)
    let second = server.apply_event(&event).await.unwrap();
    assert_eq!(second, "skipped_duplicate");

    // The replay changed nothing
    let response = server.get(&format!("/api/v1/records/{id}")).await.unwrap();
    let record: RecordJson = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.version, 1);
    assert_eq!(record.status, "new");
}

#[tokio::test]
async fn test_activity_promotes_new_member() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();
    let outcome = server.apply_event(&message_event(id)).await.unwrap();
    assert_eq!(outcome, "applied");

    let response = server.get(&format!("/api/v1/records/{id}")).await.unwrap();
    let record: RecordJson = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.status, "active");
    assert_eq!(record.version, 2);
}

#[tokio::test]
async fn test_event_without_edge_is_noop() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();
    server.apply_event(&retire_event(id)).await.unwrap();

    // A retired member posting is recorded, but moves nothing
    let outcome = server.apply_event(&message_event(id)).await.unwrap();
    assert_eq!(outcome, "skipped_noop");

    let response = server.get(&format!("/api/v1/records/{id}")).await.unwrap();
    let record: RecordJson = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(record.status, "retired");
}

#[tokio::test]
async fn test_get_unknown_record_returns_404() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    let response = server.get(&format!("/api/v1/records/{id}")).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_record_id_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/records/not-a-snowflake").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_listing_requires_limit() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/records").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");

    let response = server.get("/api/v1/records?limit=0").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get("/api/v1/records?limit=501").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_listing_filters_by_status() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let flagged_id = unique_snowflake();
    let new_id = unique_snowflake();

    server.apply_event(&join_event(flagged_id)).await.unwrap();
    server.apply_event(&flag_event(flagged_id)).await.unwrap();
    server.apply_event(&join_event(new_id)).await.unwrap();

    let response = server
        .get("/api/v1/records?status=flagged&limit=500")
        .await
        .unwrap();
    let list: ListJson<RecordJson> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(list.limit, 500);
    assert!(list.data.iter().all(|r| r.status == "flagged"));
    assert!(list.data.iter().any(|r| r.id == flagged_id.to_string()));
    assert!(!list.data.iter().any(|r| r.id == new_id.to_string()));
}

#[tokio::test]
async fn test_unknown_status_filter_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get("/api/v1/records?status=banned&limit=50")
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_record_events_returns_audit_trail() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();
    server.apply_event(&message_event(id)).await.unwrap();
    server.apply_event(&flag_event(id)).await.unwrap();

    let response = server
        .get(&format!("/api/v1/records/{id}/events?limit=50"))
        .await
        .unwrap();
    let list: ListJson<EventEntryJson> = assert_json(response, StatusCode::OK).await.unwrap();

    // Newest first
    assert_eq!(list.data.len(), 3);
    assert_eq!(list.data[0].event_kind, "flag");
    assert_eq!(list.data[1].event_kind, "message");
    assert_eq!(list.data[2].event_kind, "join");
    assert!(list.data.iter().all(|e| e.outcome == "applied"));
    assert!(list.data.iter().all(|e| e.origin == "gateway"));
    assert_eq!(list.data[0].status_before.as_deref(), Some("active"));
    assert_eq!(list.data[0].status_after.as_deref(), Some("flagged"));
}

#[tokio::test]
async fn test_record_stats_counts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();
    server.apply_event(&flag_event(id)).await.unwrap();

    let response = server.get("/api/v1/records/stats").await.unwrap();
    let stats: StatsJson = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(stats.total >= 1);
    assert!(stats.flagged >= 1);
}

// ============================================================================
// Status Override Tests
// ============================================================================

#[tokio::test]
async fn test_override_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let id = unique_snowflake();

    let response = server
        .post(
            &format!("/api/v1/records/{id}/status"),
            &OverrideRequest::to("flagged"),
        )
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "UNAUTHORIZED");

    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            "wrong-token",
            &OverrideRequest::to("flagged"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_override_flags_record() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            &token,
            &OverrideRequest::to("flagged"),
        )
        .await
        .unwrap();
    let transition: TransitionJson = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(transition.outcome, "applied");
    assert_eq!(transition.status_before.as_deref(), Some("new"));
    assert_eq!(transition.status_after.as_deref(), Some("flagged"));
    assert_eq!(transition.record.unwrap().status, "flagged");

    // The override shows up in the audit trail like any other event
    let response = server
        .get(&format!("/api/v1/records/{id}/events?limit=10"))
        .await
        .unwrap();
    let list: ListJson<EventEntryJson> = assert_json(response, StatusCode::OK).await.unwrap();
    let entry = &list.data[0];
    assert_eq!(entry.event_kind, "flag");
    assert_eq!(entry.origin, "api");
    assert_eq!(entry.detail.as_deref(), Some("operator review"));
}

#[tokio::test]
async fn test_override_unknown_record_returns_404() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            &token,
            &OverrideRequest::to("flagged"),
        )
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_override_to_new_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            &token,
            &OverrideRequest::to("new"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_override_to_unknown_status_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            &token,
            &OverrideRequest::to("banned"),
        )
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_STATUS");
}

#[tokio::test]
async fn test_override_to_same_status_is_noop() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();
    server.apply_event(&flag_event(id)).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            &token,
            &OverrideRequest::to("flagged"),
        )
        .await
        .unwrap();
    let transition: TransitionJson = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(transition.outcome, "skipped_noop");
}

#[tokio::test]
async fn test_reinstate_after_retirement() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    server.apply_event(&join_event(id)).await.unwrap();
    server.apply_event(&retire_event(id)).await.unwrap();

    // Target `active` from retired runs the reinstate edge
    let response = server
        .post_auth(
            &format!("/api/v1/records/{id}/status"),
            &token,
            &OverrideRequest::to("active"),
        )
        .await
        .unwrap();
    let transition: TransitionJson = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(transition.outcome, "applied");
    assert_eq!(transition.status_after.as_deref(), Some("active"));

    let response = server
        .get(&format!("/api/v1/records/{id}/events?limit=10"))
        .await
        .unwrap();
    let list: ListJson<EventEntryJson> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.data[0].event_kind, "reinstate");
}

// ============================================================================
// Report Tests
// ============================================================================

#[tokio::test]
async fn test_report_submission_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/api/v1/reports", &ReportRequest::unique())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get("/api/v1/reports?limit=50").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_report_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let request = ReportRequest::unique();

    let response = server
        .post_auth("/api/v1/reports", &token, &request)
        .await
        .unwrap();
    let report: ReportJson = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(report.reporter_id, request.reporter_id);
    assert_eq!(report.subject_id, request.subject_id);
    assert_eq!(report.body, request.body);

    // Shows up in the operator listing
    let response = server
        .get_auth("/api/v1/reports?limit=500", &token)
        .await
        .unwrap();
    let list: ListJson<ReportJson> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(list.data.iter().any(|r| r.id == report.id));
}

#[tokio::test]
async fn test_report_mass_mentions_are_sanitized() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let request = ReportRequest {
        body: "@everyone look at this, @HERE too".to_string(),
        ..ReportRequest::unique()
    };

    let response = server
        .post_auth("/api/v1/reports", &token, &request)
        .await
        .unwrap();
    let report: ReportJson = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(report.body.contains("[at everyone]"));
    assert!(report.body.contains("[at here]"));
    assert!(!report.body.contains('@'));
}

#[tokio::test]
async fn test_blank_report_body_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let request = ReportRequest {
        body: "   ".to_string(),
        ..ReportRequest::unique()
    };

    let response = server
        .post_auth("/api/v1/reports", &token, &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "EMPTY_REPORT");
}

// ============================================================================
// Dead Letter Tests
// ============================================================================

#[tokio::test]
async fn test_dead_letters_require_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/dead-letters?limit=50").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_buried_event_is_listed_with_failed_audit_entry() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.operator_token();
    let id = unique_snowflake();

    // Park an event the way the worker does after exhausting its retries
    let queue = PgEventQueueRepository::new(server.pool().clone());
    let queued = queue
        .enqueue(&flag_event(id), EventOrigin::Gateway)
        .await
        .unwrap();
    queue
        .bury(&queued, "attempt timed out after 30s")
        .await
        .unwrap();

    let response = server
        .get_auth("/api/v1/dead-letters?limit=500", &token)
        .await
        .unwrap();
    let list: ListJson<DeadLetterJson> = assert_json(response, StatusCode::OK).await.unwrap();

    let letter = list
        .data
        .iter()
        .find(|l| l.source_id == id.to_string())
        .expect("buried event should be listed");
    assert_eq!(letter.event_kind, "flag");
    assert_eq!(letter.attempts, 1);
    assert_eq!(letter.last_error, "attempt timed out after 30s");

    // The failure is visible in the source's audit trail even though no
    // record was ever created
    let response = server
        .get(&format!("/api/v1/records/{id}/events?limit=10"))
        .await
        .unwrap();
    let list: ListJson<EventEntryJson> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.data.len(), 1);
    assert_eq!(list.data[0].outcome, "failed");
    assert_eq!(
        list.data[0].detail.as_deref(),
        Some("attempt timed out after 30s")
    );

    // And the record itself still does not exist
    let response = server.get(&format!("/api/v1/records/{id}")).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
