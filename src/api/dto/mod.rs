//! Data Transfer Objects for request/response serialization.
//!
//! The public registration DTO accepts both JSON and form encodings; the
//! admin DTOs mirror the panel's HTML forms.

pub mod admin_dto;
pub mod registro_dto;

pub use admin_dto::*;
pub use registro_dto::*;
