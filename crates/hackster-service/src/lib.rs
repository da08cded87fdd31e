//! # hackster-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    DeadLetterService, RecordService, ReportService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, TransitionService,
};
