//! Static file serving
//!
//! Path resolution under the served root, index fallback, directory
//! listings, conditional and range requests. This is the "base server"
//! the isolation layer wraps; it knows nothing about the two headers.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
    /// Directory requested without a trailing slash
    RedirectToSlash,
    NotFound,
}

/// Serve a GET/HEAD request from the configured root.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let decoded = percent_decode(ctx.path);
    match resolve(&state.root, &decoded) {
        Resolved::File(file) => serve_file(ctx, &file).await,
        Resolved::Directory(dir) => serve_directory(ctx, state, &dir, &decoded).await,
        Resolved::RedirectToSlash => http::build_redirect_response(&format!("{}/", ctx.path)),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Map a decoded request path to a file or directory under `root`.
///
/// Canonicalizes the joined path and requires it to stay inside the
/// canonicalized root, so `..` segments and symlinks pointing outside
/// the root both resolve to 404.
fn resolve(root: &Path, decoded_path: &str) -> Resolved {
    let relative = decoded_path.trim_start_matches('/');
    let candidate = root.join(relative);

    let Ok(canonical) = candidate.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            decoded_path,
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        if decoded_path.ends_with('/') {
            Resolved::Directory(canonical)
        } else {
            Resolved::RedirectToSlash
        }
    } else if decoded_path.ends_with('/') {
        // `/file.txt/` names a directory that does not exist
        Resolved::NotFound
    } else {
        Resolved::File(canonical)
    }
}

/// Serve a directory: index file if one exists, generated listing otherwise.
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    decoded_path: &str,
) -> Response<Full<Bytes>> {
    for index_name in &state.config.serving.index_files {
        let index_path = dir.join(index_name);
        if index_path.is_file() {
            return serve_file(ctx, &index_path).await;
        }
    }

    match listing::collect_entries(dir).await {
        Ok(entries) => {
            let html = listing::render(decoded_path, &entries);
            http::response::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response()
        }
    }
}

/// Read a file and answer with 200/206/304 as the request headers dictate.
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Read forbidden: {}", path.display()));
            return http::build_403_response();
        }
        Err(e) if e.kind() == ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    build_file_response(ctx, &content, content_type)
}

fn build_file_response(
    ctx: &RequestContext<'_>,
    data: &[u8],
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    let total_size = data.len();
    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Satisfiable(range) => {
            let start = range.start;
            let end = range.end_position(total_size);
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(total_size),
        RangeOutcome::Ignored => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };
            http::response::build_file_response(body, content_type, &etag, ctx.is_head)
        }
    }
}

/// Decode `%XX` escapes in a request path. Invalid escapes pass through
/// literally; non-UTF-8 results are replaced lossily.
fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
