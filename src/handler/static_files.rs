//! Static file serving module
//!
//! Resolves request paths against the configured root directory and builds
//! file, directory-listing, redirect, and error responses. Traversal above
//! the root is blocked by canonicalizing both sides and requiring the
//! resolved path to stay inside the root.

use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use chrono::{DateTime, Local};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Outcome of resolving a request path under the root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
    /// Directory requested without a trailing slash; relative links on the
    /// listing page would resolve against the parent otherwise.
    RedirectToSlash,
    NotFound,
}

/// Serve a request path from the root directory.
pub async fn serve(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    match resolve_path(root, ctx.path).await {
        Resolved::File(file_path) => serve_resolved_file(ctx, &file_path).await,
        Resolved::Directory(dir_path) => serve_listing(ctx, &dir_path).await,
        Resolved::RedirectToSlash => {
            http::build_dir_redirect_response(&format!("{}/", ctx.path))
        }
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Resolve a request path to a file, a directory, or nothing.
///
/// The path is percent-decoded, joined onto the root, and canonicalized.
/// A canonical result outside the root (via `..` segments or symlinks) is
/// treated as not found. Directories are checked for index files first.
pub async fn resolve_path(root: &Path, request_path: &str) -> Resolved {
    let decoded = percent_decode(request_path);
    let relative = decoded.trim_start_matches('/');

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Root directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Resolved::NotFound;
        }
    };

    let candidate = root_canonical.join(relative);

    // Not found is the common case (404), no need to log
    let Ok(canonical) = fs::canonicalize(&candidate).await else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        if !relative.is_empty() && !decoded.ends_with('/') {
            return Resolved::RedirectToSlash;
        }
        for index_file in INDEX_FILES {
            let index_path = canonical.join(index_file);
            if index_path.is_file() {
                return Resolved::File(index_path);
            }
        }
        return Resolved::Directory(canonical);
    }

    Resolved::File(canonical)
}

/// Read a resolved file and build the response.
///
/// The file existed at resolution time, so a read failure here is an
/// unexpected IO error (500), not a 404.
async fn serve_resolved_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    match fs::read(file_path).await {
        Ok(content) => {
            let content_type =
                mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
            http::build_file_response(content, content_type, ctx.is_head)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            http::build_500_response()
        }
    }
}

/// Build the directory listing page for a resolved directory.
async fn serve_listing(ctx: &RequestContext<'_>, dir_path: &Path) -> Response<Full<Bytes>> {
    match render_listing(dir_path, ctx.path).await {
        Ok(html) => http::build_listing_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir_path.display()
            ));
            http::build_500_response()
        }
    }
}

/// Render an HTML directory listing: entries sorted by name, directories
/// suffixed with `/`, modification times in the local timezone.
pub async fn render_listing(dir_path: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir_path).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        if is_dir {
            name.push('/');
        }
        let modified = entry
            .metadata()
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map_or_else(String::new, |t| {
                DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string()
            });
        entries.push((name, modified));
    }
    // Case-insensitive, so "Clips/" does not sort ahead of "about.html"
    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let title = format!("Directory listing for {}", html_escape(request_path));
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for (name, modified) in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a> <small>{modified}</small></li>\n",
            percent_encode(&name),
            html_escape(&name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Decode `%XX` escapes in a request path. Malformed escapes pass through.
pub fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a listing link target (space and the URL-reserved few).
fn percent_encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Escape HTML-significant characters in listing text.
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
