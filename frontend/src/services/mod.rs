//! Backend services.
//!
//! # Services
//!
//! - [`upload`] - upload an export and receive the JSON preview
//! - [`download`] - fetch the converted workbook and save it

pub mod download;
pub mod upload;

pub use download::*;
pub use upload::*;
