//! Report-card enrichment: the archive record behind an attribute row.

pub mod card;
pub mod client;

pub use card::ReportCard;
pub use client::{ReportClient, ReportError};
