//! Report service
//!
//! Member reports are free text typed by strangers on the internet. They are
//! validated and defanged here, before persistence, so nothing downstream has
//! to treat the stored body as hostile.

use hackster_core::entities::{NewReport, MAX_REPORT_LENGTH};
use hackster_core::error::DomainError;
use hackster_core::sanitize::sanitize_report;
use hackster_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{CreateReportRequest, ListResponse, ReportResponse};

use super::check_limit;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Report service
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    /// Create a new ReportService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate, sanitize, and persist a member report
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: CreateReportRequest) -> ServiceResult<ReportResponse> {
        let reporter_id = parse_snowflake(&request.reporter_id, "reporter_id")?;
        let subject_id = request
            .subject_id
            .as_deref()
            .map(|s| parse_snowflake(s, "subject_id"))
            .transpose()?;

        let body = request.body.trim();
        if body.is_empty() {
            return Err(ServiceError::Domain(DomainError::EmptyReportBody));
        }
        if body.chars().count() > MAX_REPORT_LENGTH {
            return Err(ServiceError::Domain(DomainError::ContentTooLong {
                max: MAX_REPORT_LENGTH,
            }));
        }

        let new_report = NewReport {
            reporter_id,
            subject_id,
            body: sanitize_report(body),
        };
        let report = self.ctx.report_repo().create(&new_report).await?;

        info!(
            report_id = report.id,
            reporter_id = %report.reporter_id,
            "Report submitted"
        );
        self.ctx.notifier().ops(match report.subject_id {
            Some(subject) => format!(
                "new report #{} from {} about {}",
                report.id, report.reporter_id, subject
            ),
            None => format!("new report #{} from {}", report.id, report.reporter_id),
        });

        Ok(ReportResponse::from(report))
    }

    /// List reports, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, limit: i64) -> ServiceResult<ListResponse<ReportResponse>> {
        check_limit(limit)?;

        let reports = self.ctx.report_repo().list(limit).await?;

        Ok(ListResponse::new(
            reports.into_iter().map(ReportResponse::from).collect(),
            limit,
            0,
        ))
    }
}

fn parse_snowflake(s: &str, field: &str) -> ServiceResult<Snowflake> {
    let id = Snowflake::parse(s)
        .map_err(|_| ServiceError::validation(format!("{field} must be a snowflake id")))?;
    if id.is_zero() {
        return Err(ServiceError::validation(format!("{field} must not be zero")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::super::doubles::{test_context, InMemoryReports};
    use super::*;
    use std::sync::Arc;

    fn request(body: &str) -> CreateReportRequest {
        CreateReportRequest {
            reporter_id: "111".to_string(),
            subject_id: Some("222".to_string()),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_persists_sanitized_body() {
        let reports = Arc::new(InMemoryReports::default());
        let ctx = test_context().reports(reports.clone()).build();

        let response = ReportService::new(&ctx)
            .submit(request("please stop the @everyone spam"))
            .await
            .unwrap();

        assert_eq!(response.reporter_id, "111");
        assert_eq!(response.subject_id.as_deref(), Some("222"));
        assert_eq!(response.body, "please stop the [at everyone] spam");

        let stored = reports.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].body, "please stop the [at everyone] spam");
    }

    #[tokio::test]
    async fn test_submit_trims_before_validating() {
        let reports = Arc::new(InMemoryReports::default());
        let ctx = test_context().reports(reports.clone()).build();

        ReportService::new(&ctx)
            .submit(request("  trailing space report  "))
            .await
            .unwrap();

        assert_eq!(reports.stored()[0].body, "trailing space report");
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_body() {
        let ctx = test_context().build();
        let service = ReportService::new(&ctx);

        for body in ["", "   ", "\n\t"] {
            let err = service.submit(request(body)).await.unwrap_err();
            assert_eq!(err.error_code(), "EMPTY_REPORT");
            assert_eq!(err.status_code(), 400);
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_oversized_body() {
        let ctx = test_context().build();

        let err = ReportService::new(&ctx)
            .submit(request(&"x".repeat(MAX_REPORT_LENGTH + 1)))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "CONTENT_TOO_LONG");
    }

    #[tokio::test]
    async fn test_submit_accepts_body_at_limit() {
        let ctx = test_context().build();

        let response = ReportService::new(&ctx)
            .submit(request(&"x".repeat(MAX_REPORT_LENGTH)))
            .await
            .unwrap();

        assert_eq!(response.body.len(), MAX_REPORT_LENGTH);
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_ids() {
        let ctx = test_context().build();
        let service = ReportService::new(&ctx);

        let err = service
            .submit(CreateReportRequest {
                reporter_id: "not-a-snowflake".to_string(),
                subject_id: None,
                body: "valid body".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = service
            .submit(CreateReportRequest {
                reporter_id: "111".to_string(),
                subject_id: Some("0".to_string()),
                body: "valid body".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_subject_is_optional() {
        let ctx = test_context().build();

        let response = ReportService::new(&ctx)
            .submit(CreateReportRequest {
                reporter_id: "111".to_string(),
                subject_id: None,
                body: "general channel climate".to_string(),
            })
            .await
            .unwrap();

        assert!(response.subject_id.is_none());
    }

    #[tokio::test]
    async fn test_list_requires_valid_limit() {
        let ctx = test_context().build();

        let err = ReportService::new(&ctx).list(0).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = ReportService::new(&ctx).list(501).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
