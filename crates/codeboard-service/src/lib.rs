//! # codeboard-service
//!
//! Application layer containing the board use cases, the listing cache and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    CodeService, ListCache, QuotaService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};

pub use dto::{
    CodeResponse, CodeView, CreateCodeRequest, HealthChecks, HealthResponse, ListCodesQuery,
    ReadinessResponse, StatsResponse,
};
