// ABOUTME: Main library entry point for the article extraction core.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ExtractResult, ExtractError, ErrorCode, ContentType, Options.

//! A content-extraction library: given an HTML document, finds the article body and
//! returns it as a clean fragment list plus a small metadata record.
//!
//! # Example
//!
//! ```no_run
//! use article_extract::{Client, ExtractError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ExtractError> {
//!     let client = Client::builder().build();
//!     let result = client.parse("https://example.com/article").await?;
//!     println!("{}", result.joined_html());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dom;
pub mod error;
pub mod formats;
pub mod metadata;
pub mod options;
pub mod resource;
pub mod result;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::metadata::Metadata;
pub use crate::options::{ClientBuilder, ContentType, Options};
pub use crate::result::{ExtractResult, Result};
