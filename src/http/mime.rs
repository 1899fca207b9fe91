//! MIME type detection
//!
//! Maps file extensions to Content-Type values. The table leans towards
//! the assets an Emscripten or wasm-bindgen build directory contains,
//! since serving those is what this server exists for.

/// Look up the Content-Type for a file extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Pages and scripts
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("map") => "application/json",
        Some("xml") => "application/xml",
        Some("txt" | "md") => "text/plain; charset=utf-8",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Media
        Some("mp3") => "audio/mpeg",
        Some("ogg" | "ogv") => "video/ogg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives and binary data
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("data" | "bin") => "application/octet-stream",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_build_artifacts() {
        assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("js")), "application/javascript");
        assert_eq!(content_type_for(Some("mjs")), "application/javascript");
        assert_eq!(content_type_for(Some("wasm")), "application/wasm");
        assert_eq!(content_type_for(Some("data")), "application/octet-stream");
    }

    #[test]
    fn test_common_assets() {
        assert_eq!(content_type_for(Some("css")), "text/css");
        assert_eq!(content_type_for(Some("png")), "image/png");
        assert_eq!(content_type_for(Some("svg")), "image/svg+xml");
        assert_eq!(content_type_for(Some("woff2")), "font/woff2");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(content_type_for(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
