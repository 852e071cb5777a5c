//! SQLite front end for `sqlforge-core`.
//!
//! Connects a [`SqliteDescriber`] to the core pipeline and bounds each
//! request with a timeout.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate artifacts for an update statement
//! sqlforge --database sqlite:shop.db --domain order \
//!     --sql "UPDATE orders SET status = ? WHERE order_id = ?"
//!
//! # Read the statement from a file and print JSON
//! sqlforge --sql-file query.sql --domain order --json
//! ```

pub mod config;
pub mod describer;
pub mod error;
pub mod forge;

pub use config::ForgeConfig;
pub use describer::SqliteDescriber;
pub use error::{ForgeError, Result};
pub use forge::{forge, render_text};
