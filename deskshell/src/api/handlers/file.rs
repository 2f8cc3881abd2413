//! The file-access service: byte-level CRUD over files named by the
//! `filename` query parameter.
//!
//! The parameter is used verbatim as a file-system path, relative or
//! absolute. There is no sandboxing or authentication: the only caller is the
//! bundled front-end on a loopback listener, which is trusted. Concurrent
//! requests touching the same filename get whatever the host file system
//! gives them; no locking or atomicity on top.

use axum::{
    extract::Query,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub filename: Option<String>,
}

/// Single handler for every method on `/api/file`, so that method dispatch
/// and the "unsupported method" contract live in one place.
pub async fn file_handler(method: Method, Query(query): Query<FileQuery>, body: Bytes) -> Response {
    match handle(method, query, body).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn handle(method: Method, query: FileQuery, body: Bytes) -> Result<Response> {
    let Some(filename) = query.filename else {
        return Err(Error::MissingFilename);
    };

    match method {
        Method::GET => {
            let data = tokio::fs::read(&filename).await?;
            Ok(data.into_response())
        }
        Method::PUT => {
            write_file(&filename, &body).await?;
            Ok(StatusCode::CREATED.into_response())
        }
        // DELETE answers 201 like PUT; documented contract, kept as-is
        Method::DELETE => {
            tokio::fs::remove_file(&filename).await?;
            Ok(StatusCode::CREATED.into_response())
        }
        _ => Err(Error::UnsupportedMethod),
    }
}

/// Create or truncate `path` and write the full body.
///
/// Files are created world-readable and world-writable (0666 before umask):
/// the shell's own front-end and any sibling local process may edit what it
/// writes. Existing files keep their mode.
#[cfg(unix)]
async fn write_file(path: &str, data: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o666)
        .open(path)
        .await?;
    file.write_all(data).await?;
    file.flush().await
}

#[cfg(not(unix))]
async fn write_file(path: &str, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, data).await
}
