use crate::config::{API_PREFIX, Config};
use crate::error::ApiError;
use actix_web::http::header::{self, CacheControl, CacheDirective, ContentType, LastModified};
use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, web};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub mod mime;

#[cfg(test)]
mod static_files_test;

pub const FALLBACK_DOCUMENT: &str = "index.html";
pub const CACHE_MAX_AGE_SECS: u32 = 86_400;

/// # Static Asset Host
///
/// Serves the built SPA bundle. Only exists when the service runs in
/// production mode and the asset root is a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAssets {
    root: PathBuf,
    fallback: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let fallback = root.join(FALLBACK_DOCUMENT);
        Self { root, fallback }
    }

    /// Resolves static hosting from the configuration.
    ///
    /// Production mode with a missing asset tree is not an error: hosting is
    /// skipped and a warning is logged.
    pub fn discover(config: &Config) -> Option<Self> {
        if !config.is_production() {
            return None;
        }
        if config.frontend_dist.is_dir() {
            Some(Self::new(&config.frontend_dist))
        } else {
            tracing::warn!(
                path = %config.frontend_dist.display(),
                "frontend dist directory not found, skipping static file serving"
            );
            None
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `segments` under the root. `None` when no regular file is there.
    async fn file(
        &self,
        segments: &[&str],
        accepts_gzip: bool,
    ) -> Result<Option<HttpResponse>, ApiError> {
        let path = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Ok(None),
        };

        let mut res = HttpResponse::Ok();
        res.insert_header((header::CONTENT_TYPE, mime::content_type_for(&path)))
            .insert_header(CacheControl(vec![CacheDirective::MaxAge(CACHE_MAX_AGE_SECS)]));
        if let Ok(modified) = metadata.modified() {
            res.insert_header(LastModified(modified.into()));
        }

        let source = match gzip_sibling(&path, accepts_gzip).await {
            Some(gz) => {
                res.insert_header((header::CONTENT_ENCODING, "gzip"));
                gz
            }
            None => path,
        };

        let bytes = tokio::fs::read(&source)
            .await
            .map_err(|e| ApiError::internal(format!("reading {}: {e}", source.display())))?;
        Ok(Some(res.body(bytes)))
    }

    /// The SPA entry document, or a plain-text failure.
    async fn fallback(&self) -> HttpResponse {
        match tokio::fs::read_to_string(&self.fallback).await {
            Ok(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                plain(HttpResponse::NotFound(), "Frontend not found")
            }
            Err(e) => {
                tracing::error!(
                    path = %self.fallback.display(),
                    error = %e,
                    "error serving fallback document"
                );
                plain(HttpResponse::InternalServerError(), "Internal Server Error")
            }
        }
    }
}

/// Default service when static hosting is active.
///
/// 1. `GET`/`HEAD` naming a regular, non-hidden file: the file itself.
/// 2. A non-API path without an extension: the fallback document.
/// 3. Anything else: plain 404.
pub async fn serve(
    req: HttpRequest,
    assets: web::Data<StaticAssets>,
) -> Result<HttpResponse, ApiError> {
    let path = req.match_info().as_str();
    let segments = segments(path)?;

    if is_read(req.method()) && !is_hidden(&segments) {
        if let Some(res) = assets.file(&segments, accepts_gzip(&req)).await? {
            return Ok(res);
        }
    }

    if !path.starts_with(API_PREFIX) && !has_extension(&segments) {
        return Ok(assets.fallback().await);
    }

    Ok(not_found_response())
}

/// Default service when static hosting is inactive.
pub async fn not_found() -> HttpResponse {
    not_found_response()
}

fn not_found_response() -> HttpResponse {
    plain(HttpResponse::NotFound(), "Not Found")
}

fn plain(mut builder: HttpResponseBuilder, body: &'static str) -> HttpResponse {
    builder.content_type(ContentType::plaintext()).body(body)
}

/// Splits a request path into file segments, rejecting traversal attempts.
fn segments(path: &str) -> Result<Vec<&str>, ApiError> {
    let mut out = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(ApiError::forbidden("Malicious Path")),
            s if s.contains('\\') || s.contains('\0') => {
                return Err(ApiError::forbidden("Malicious Path"));
            }
            s => out.push(s),
        }
    }
    Ok(out)
}

fn is_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

fn is_hidden(segments: &[&str]) -> bool {
    segments.iter().any(|s| s.starts_with('.'))
}

fn has_extension(segments: &[&str]) -> bool {
    segments
        .last()
        .is_some_and(|last| Path::new(last).extension().is_some())
}

fn accepts_gzip(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.split(',').any(|coding| {
                let mut parts = coding.split(';');
                let name = parts.next().unwrap_or_default().trim();
                let refused = parts.any(|p| matches!(p.trim(), "q=0" | "q=0.0" | "q=0.00" | "q=0.000"));
                name.eq_ignore_ascii_case("gzip") && !refused
            })
        })
}

async fn gzip_sibling(path: &Path, accepts_gzip: bool) -> Option<PathBuf> {
    if !accepts_gzip {
        return None;
    }
    let mut gz = path.as_os_str().to_owned();
    gz.push(".gz");
    let gz = PathBuf::from(gz);
    match tokio::fs::metadata(&gz).await {
        Ok(metadata) if metadata.is_file() => Some(gz),
        _ => None,
    }
}
