//! # filetally
//!
//! Validates file-observation logs (one JSON object per line) and tallies
//! two reports from the lines that pass:
//!
//! - per file extension, the number of distinct filename stems;
//! - per hour of day, how often each content hash was seen.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌─────────┐   ┌──────────────────┐
//! │  Source  │──▶│ Validator │──▶│ Decoder │──▶│ ExtensionIndex   │
//! │ (lines)  │   │ (streamed)│   │         │   │ HourlyHashIndex  │
//! └──────────┘   └─────┬─────┘   └─────────┘   └────────┬─────────┘
//!                      │ reject                          ▼
//!                      ▼                            ┌──────────┐
//!                 warn! + skip                      │  Report  │
//!                                                   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`schema`] | Wire keys and key classes |
//! | [`models`] | `FileRecord` and `Disposition` |
//! | [`filename`] | `<head>.<tail>` check and stem/extension split |
//! | [`validate`] | Primitive checks and the streaming line validator |
//! | [`decode`] | Validated line → `FileRecord` |
//! | [`extensions`] | Extension → distinct stems |
//! | [`hourly`] | Hour → hash → count |
//! | [`clock`] | Hour-of-day in local time or UTC |
//! | [`ingest`] | Line driver and record sinks |
//! | [`report`] | Human and JSON output |
//! | [`config`] | TOML configuration |
//! | [`logging`] | Tracing subscriber setup |
//! | [`error`] | Error types |

pub mod clock;
pub mod config;
pub mod decode;
pub mod error;
pub mod extensions;
pub mod filename;
pub mod hourly;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod report;
pub mod schema;
pub mod validate;

pub use decode::decode_line;
pub use filename::split_file_name;
pub use validate::validate_line;
