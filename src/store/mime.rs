//! Content-type inference from cache names
//!
//! Only the extension of the name is consulted; content is never sniffed.
//! The three module-proxy extensions are resolved first, then a generic
//! extension table (built in, overlaid by the host's `mime.types`). Text
//! types without a charset are tagged UTF-8.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

const MIME_TYPES_FILES: &[&str] = &[
    "/etc/mime.types",
    "/etc/apache2/mime.types",
    "/etc/apache/mime.types",
    "/etc/httpd/conf/mime.types",
];

const BUILTIN_TYPES: &[(&str, &str)] = &[
    (".avif", "image/avif"),
    (".css", "text/css; charset=utf-8"),
    (".gif", "image/gif"),
    (".htm", "text/html; charset=utf-8"),
    (".html", "text/html; charset=utf-8"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpeg"),
    (".js", "text/javascript; charset=utf-8"),
    (".json", "application/json"),
    (".mjs", "text/javascript; charset=utf-8"),
    (".pdf", "application/pdf"),
    (".png", "image/png"),
    (".svg", "image/svg+xml"),
    (".wasm", "application/wasm"),
    (".webp", "image/webp"),
    (".xml", "text/xml; charset=utf-8"),
];

static SYSTEM_TABLE: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Infer the content type of a cache item from its name
///
/// Returns an empty string when the extension is unknown.
pub fn mime_type(name: &str) -> String {
    let ext = extension(name).to_ascii_lowercase();
    match ext.as_str() {
        ".info" => "application/json; charset=utf-8".to_string(),
        ".mod" => "text/plain; charset=utf-8".to_string(),
        ".zip" => "application/zip".to_string(),
        "" => String::new(),
        _ => system_table().get(&ext).cloned().unwrap_or_default(),
    }
}

/// Extension of the last path segment, including the leading dot
fn extension(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(i) => &base[i..],
        None => "",
    }
}

fn system_table() -> &'static HashMap<String, String> {
    SYSTEM_TABLE.get_or_init(|| {
        let mut table: HashMap<String, String> = BUILTIN_TYPES
            .iter()
            .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
            .collect();

        // Later files override earlier ones and the built-in entries
        for file in MIME_TYPES_FILES {
            let path = Path::new(file);
            if let Ok(content) = std::fs::read_to_string(path) {
                trace!("Loading MIME types from {}", path.display());
                parse_mime_types(&content, &mut table);
            }
        }

        table
    })
}

/// Parse `mime.types` lines of the form `type/subtype ext1 ext2 ...`
fn parse_mime_types(content: &str, table: &mut HashMap<String, String>) {
    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("");
        let mut fields = line.split_whitespace();
        let Some(mime) = fields.next() else {
            continue;
        };
        if !mime.contains('/') {
            continue;
        }
        let mime = with_text_charset(mime);
        for ext in fields {
            let key = format!(".{}", ext.to_ascii_lowercase());
            table.insert(key, mime.clone());
        }
    }
}

/// Tag `text/*` types that carry no charset parameter as UTF-8
fn with_text_charset(mime: &str) -> String {
    let is_text = mime
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/"));
    let has_charset = mime
        .split(';')
        .skip(1)
        .any(|param| param.trim().to_ascii_lowercase().starts_with("charset="));
    if is_text && !has_charset {
        format!("{}; charset=utf-8", mime)
    } else {
        mime.to_string()
    }
}
