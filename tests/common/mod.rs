//! Shared helpers for the integration suite: minimal decodable image
//! fixtures and a throwaway static file server over the output directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Minimal JPEG: SOI, one SOF0 frame header with the given dimensions, EOI
pub fn jpeg_fixture(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// Minimal WebP: RIFF container with a VP8X chunk carrying the canvas size
pub fn webp_fixture(width: u32, height: u32) -> Vec<u8> {
    let le24 = |v: u32| [(v & 0xFF) as u8, ((v >> 8) & 0xFF) as u8, ((v >> 16) & 0xFF) as u8];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&22u32.to_le_bytes());
    bytes.extend_from_slice(b"WEBP");
    bytes.extend_from_slice(b"VP8X");
    bytes.extend_from_slice(&10u32.to_le_bytes());
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&le24(width - 1));
    bytes.extend_from_slice(&le24(height - 1));
    bytes
}

/// Minimal ICO: one directory entry with the given width byte
pub fn ico_fixture(width: u8) -> Vec<u8> {
    let mut bytes = vec![0, 0, 1, 0, 1, 0];
    bytes.extend_from_slice(&[width, width, 0, 0]);
    bytes.extend_from_slice(&1u16.to_le_bytes()); // planes
    bytes.extend_from_slice(&32u16.to_le_bytes()); // bpp
    bytes.extend_from_slice(&4u32.to_le_bytes()); // payload size
    bytes.extend_from_slice(&22u32.to_le_bytes()); // payload offset
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

/// Write the three asset source files the deployed model references
pub fn write_source_assets(dir: &Path) {
    std::fs::write(dir.join("portada.jpg"), jpeg_fixture(1200, 400)).unwrap();
    std::fs::write(dir.join("avalem.webp"), webp_fixture(600, 200)).unwrap();
    std::fs::write(dir.join("favicon.ico"), ico_fixture(16)).unwrap();
}

fn content_type(path: &str) -> &'static str {
    if path.ends_with(".html") || path == "/" {
        "text/html; charset=utf-8"
    } else if path.ends_with(".jpg") {
        "image/jpeg"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".ico") {
        "image/x-icon"
    } else {
        "application/octet-stream"
    }
}

/// Serve `root` over a local port on a background thread; returns the base URL
pub fn serve_dir(root: PathBuf) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let path = request.url().to_string();
            let rel = if path == "/" { "index.html" } else { path.trim_start_matches('/') };
            let file = root.join(rel);
            let response = match std::fs::read(&file) {
                Ok(bytes) => tiny_http::Response::from_data(bytes).with_header(
                    format!("Content-Type: {}", content_type(&path))
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                ),
                Err(_) => tiny_http::Response::from_data(b"Not Found".to_vec())
                    .with_status_code(404)
                    .with_header(
                        "Content-Type: text/plain"
                            .parse::<tiny_http::Header>()
                            .unwrap(),
                    ),
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{}", addr)
}
