//! Client for the log endpoints of a ReportPortal-style test reporting API.
//!
//! [`Service`] builds the authenticated HTTP client and hands out a
//! [`LogItemResource`], which maps each log operation to one HTTP call.

pub mod error;
pub mod filter;
pub mod log_item;
pub mod models;
pub mod service;

pub use error::{ClientError, Result};
pub use filter::{FilterOperation, FilterOption, SortDirection};
pub use log_item::LogItemResource;
pub use models::{
    Attach, BinaryContent, Content, CreateLogItemRequest, LogItemCreatedResponse, LogItemResponse,
    LogLevel, MessageResponse, Page, Responses,
};
pub use service::{Service, ServiceConfig};
