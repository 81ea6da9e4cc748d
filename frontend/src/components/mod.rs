//! UI Components for the r4mk application.
//!
//! # Layout Components
//! - [`Hero`] - Title and 給与R4 export instructions
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - File upload with click-to-select
//! - [`PreviewSection`] - Converted rows and download button
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod footer;
mod hero;
mod logs;
mod preview;
mod upload;

pub use footer::*;
pub use hero::*;
pub use logs::*;
pub use preview::*;
pub use upload::*;
