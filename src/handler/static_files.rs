//! Static file serving module
//!
//! Resolves a request path under the serving root and builds the response:
//! file bytes, a trailing-slash redirect, an index file, or a listing.

use crate::config::{self, AppState};
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::path::percent_encode_segment;
use crate::http::{self, cache, mime, SafePath};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of mapping a request path onto the filesystem
#[derive(Debug)]
pub enum Resolved {
    /// Regular file (canonical path)
    File(PathBuf, Metadata),
    /// Directory (canonical path)
    Directory(PathBuf),
    NotFound,
}

/// Serve whatever the request path names under the serving root
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let safe = SafePath::parse(ctx.path);

    match resolve(&state.root, &safe).await {
        Resolved::File(path, meta) => {
            // A file never has children
            if safe.trailing_slash || is_config_file(&state.root, &path) {
                return http::build_404_response();
            }
            serve_file(ctx, &path, &meta).await
        }
        Resolved::Directory(dir) => {
            if !safe.trailing_slash {
                return http::build_301_response(&directory_location(ctx, &safe));
            }
            serve_directory(ctx, state, &dir, &safe).await
        }
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Map a sanitized path onto `root`
///
/// The canonical target must stay under the canonical root, so a symlink
/// pointing outside the tree resolves to `NotFound`.
pub async fn resolve(root: &Path, safe: &SafePath) -> Resolved {
    let candidate = safe.join_onto(root);

    // Missing entries are the common 404 case, not worth a log line
    let Ok(canonical) = fs::canonicalize(&candidate).await else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path escapes serving root, refused: {} -> {}",
            candidate.display(),
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    match fs::metadata(&canonical).await {
        Ok(meta) if meta.is_dir() => Resolved::Directory(canonical),
        Ok(meta) if meta.is_file() => Resolved::File(canonical, meta),
        _ => Resolved::NotFound,
    }
}

/// Serve a regular file, honoring `If-Modified-Since`
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    meta: &Metadata,
) -> Response<Full<Bytes>> {
    let modified = meta.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(stamp)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response(stamp);
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_500_response();
        }
    };

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    http::build_file_response(
        Bytes::from(content),
        content_type,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Serve a directory: first index file found, else a listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    safe: &SafePath,
) -> Response<Full<Bytes>> {
    for index_file in &state.config.http.index_files {
        let index_path = dir.join(index_file);
        if let Ok(meta) = fs::metadata(&index_path).await {
            if meta.is_file() {
                return serve_file(ctx, &index_path, &meta).await;
            }
        }
    }

    if !state.config.http.directory_listing {
        return http::build_404_response();
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            let display_path = display_path(safe);
            let html = listing::render(&display_path, &entries);
            http::build_file_response(
                Bytes::from(html),
                "text/html; charset=utf-8",
                None,
                ctx.is_head,
            )
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_500_response()
        }
    }
}

/// Location for the trailing-slash redirect, query preserved
///
/// Rebuilt from the sanitized segments so the target is always a single
/// absolute path on this host; a raw `//host` would be protocol-relative.
fn directory_location(ctx: &RequestContext<'_>, safe: &SafePath) -> String {
    let mut location = String::from("/");
    for segment in &safe.segments {
        location.push_str(&percent_encode_segment(segment));
        location.push('/');
    }
    if let Some(q) = ctx.query {
        location.push('?');
        location.push_str(q);
    }
    location
}

/// The server's own config file sits in the serving root; never hand it out
fn is_config_file(root: &Path, path: &Path) -> bool {
    path.parent() == Some(root)
        && path
            .file_stem()
            .is_some_and(|stem| stem == config::CONFIG_FILE)
}

/// Decoded, normalized URL path shown in a listing title
fn display_path(safe: &SafePath) -> String {
    if safe.segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", safe.segments.join("/"))
    }
}
