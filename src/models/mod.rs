//! Data models for employee records.

pub mod employee;

pub use employee::{EmployeeDraft, Role};
