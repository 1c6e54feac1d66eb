//! # gitignore-create
//!
//! Builds `.gitignore` files from the templates served by
//! [gitignore.io](https://www.toptal.com/developers/gitignore), either in one
//! shot from the command line or through an interactive terminal selector.
//!
//! ## Features
//!
//! - Fetch and merge several templates in a single request
//! - List and search the template catalog
//! - Keep an existing `.gitignore` and add custom lines after the templates
//! - Detect unknown templates even though the service answers them with a success status
//! - Browse, preview and pick templates in a terminal UI
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use gitignore_create::{ClientConfig, TemplateClient, TemplateQuery, compose};
//!
//! # async fn run() -> gitignore_create::Result<()> {
//! let client = TemplateClient::new(ClientConfig::default())?;
//! let query = TemplateQuery::parse(["rust", "linux"])?;
//! let content = client.fetch_valid(&query).await?;
//! let bytes = compose(&content, None, Some("/scratch"));
//! std::fs::write(".gitignore", bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Write ./.gitignore for Python and macOS
//! gitignore-create python macos
//!
//! # Search the catalog
//! gitignore-create --search java
//!
//! # Print instead of writing, with an extra line at the end
//! gitignore-create rust --append "/notes" --dry-run
//!
//! # Pick templates interactively
//! gitignore-create --interactive
//! ```

pub mod client;
pub mod compose;
pub mod error;
pub mod fs_utils;
pub mod session;
pub mod template;
pub mod tui;

// Re-export main types and functions for convenience
pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TemplateClient};
pub use compose::compose;
pub use error::{GitignoreError, Result};
pub use fs_utils::{GenerateOptions, generate, gitignore_path};
pub use template::{
    ERROR_MARKER, TemplateCatalog, TemplateContent, TemplateName, TemplateQuery,
    is_valid_response,
};
