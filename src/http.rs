//! # HTTP Query Surface
//!
//! JSON-over-HTTP access to any [`Fs`] backend.
//!
//! Every route is a `GET` whose single path segment is the percent-encoded
//! client path, so `/models/bnc/data.sci` is requested as
//! `/exists/%2Fmodels%2Fbnc%2Fdata.sci`.
//!
//! | Route | Query | Success body |
//! |-------|-------|--------------|
//! | `/read/{path}` | `offset`, `size` | raw bytes, `content-type` from the store |
//! | `/exists/{path}` | | `{"exists": bool}` |
//! | `/size/{path}` | | `{"size": u64}` |
//! | `/isDir/{path}` | | `{"isDir": bool}` |
//! | `/isRegularFile/{path}` | | `{"isRegularFile": bool}` |
//! | `/isSymlink/{path}` | | `{"isSymLink": bool}` |
//! | `/isEmpty/{path}` | | `{"isEmpty": bool}` |
//! | `/getChildren/{path}` | | always an error |
//!
//! Failures are answered with `{"message": "..."}` and the status from
//! [`status_for`].

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path as PathParam, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{ByteRange, Fs, FsError};

/// Shared backend handed to every handler.
pub type SharedFs = Arc<dyn Fs>;

/// Build the query router over `fs`.
///
/// # Example
///
/// ```rust
/// use blobfs::{MemoryStorage, ObjectFs, PathMapper};
/// use std::sync::Arc;
///
/// let fs = ObjectFs::new(PathMapper::new("/models"), MemoryStorage::new());
/// let app = blobfs::http::router(Arc::new(fs));
/// # let _ = app;
/// ```
pub fn router(fs: SharedFs) -> Router {
    Router::new()
        .route("/read/{path}", get(read))
        .route("/exists/{path}", get(exists))
        .route("/size/{path}", get(size))
        .route("/isDir/{path}", get(is_dir))
        .route("/isRegularFile/{path}", get(is_regular_file))
        .route("/isSymlink/{path}", get(is_symlink))
        .route("/isEmpty/{path}", get(is_empty))
        .route("/getChildren/{path}", get(get_children))
        .with_state(fs)
}

/// HTTP status reported for an error.
pub fn status_for(error: &FsError) -> StatusCode {
    match error {
        FsError::NotFound { .. } | FsError::SizeUnavailable { .. } => StatusCode::NOT_FOUND,
        FsError::NotAFile { .. } => StatusCode::BAD_REQUEST,
        FsError::InvalidRange { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
        FsError::InvalidData { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        FsError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
        FsError::Storage { .. } => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for FsError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Query string of `/read`. Values that do not parse are ignored.
#[derive(Debug, Default, Deserialize)]
struct ReadQuery {
    offset: Option<String>,
    size: Option<String>,
}

impl ReadQuery {
    fn range(&self) -> ByteRange {
        let offset = parse_u64(self.offset.as_deref()).unwrap_or(0);
        match parse_u64(self.size.as_deref()) {
            Some(len) => ByteRange::new(offset, len),
            None => ByteRange::from_offset(offset),
        }
    }
}

fn parse_u64(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

#[derive(Serialize)]
struct ExistsBody {
    exists: bool,
}

#[derive(Serialize)]
struct SizeBody {
    size: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IsDirBody {
    is_dir: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IsRegularFileBody {
    is_regular_file: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IsSymLinkBody {
    is_sym_link: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IsEmptyBody {
    is_empty: bool,
}

async fn read(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, FsError> {
    let download = fs.read(Path::new(&path), query.range()).await?;
    Ok((
        [(header::CONTENT_TYPE, download.content_type)],
        Body::from_stream(download.body),
    )
        .into_response())
}

async fn exists(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<ExistsBody>, FsError> {
    let exists = fs.exists(Path::new(&path)).await?;
    Ok(Json(ExistsBody { exists }))
}

async fn size(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<SizeBody>, FsError> {
    let size = fs.size(Path::new(&path)).await?;
    Ok(Json(SizeBody { size }))
}

async fn is_dir(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<IsDirBody>, FsError> {
    let is_dir = fs.is_dir(Path::new(&path)).await?;
    Ok(Json(IsDirBody { is_dir }))
}

async fn is_regular_file(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<IsRegularFileBody>, FsError> {
    let is_regular_file = fs.is_regular_file(Path::new(&path)).await?;
    Ok(Json(IsRegularFileBody { is_regular_file }))
}

async fn is_symlink(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<IsSymLinkBody>, FsError> {
    let is_sym_link = fs.is_symlink(Path::new(&path)).await?;
    Ok(Json(IsSymLinkBody { is_sym_link }))
}

async fn is_empty(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<IsEmptyBody>, FsError> {
    let is_empty = fs.is_empty(Path::new(&path)).await?;
    Ok(Json(IsEmptyBody { is_empty }))
}

async fn get_children(
    State(fs): State<SharedFs>,
    PathParam(path): PathParam<String>,
) -> Result<Json<Vec<String>>, FsError> {
    let children = fs.get_children(Path::new(&path)).await?;
    Ok(Json(children))
}
