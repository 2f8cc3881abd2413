//! API layer for HTTP request handling.
//!
//! The shell exposes two surfaces:
//!
//! - **File access** (`/api/file`): byte-level read/write/delete of files
//!   named by a query parameter, for the bundled front-end
//! - **Static assets** (every other path): the embedded site bundle

pub mod handlers;
