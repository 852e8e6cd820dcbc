//! Stub facts backend for local use.
//!
//! Serves the fixture file in the `{ facts, message }` envelope so the
//! explorer can be tried without the analysis backend.
//! Run with: cargo run --bin facts_stub_server

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use anyhow::{Context, Result};
use serde_json::json;

use factscope::config::Config;
use factscope::logging::{log, obj, v_str, Domain, Level};

fn respond(request: &str, fixture_path: &str) -> (&'static str, &'static str, String) {
    if request.starts_with("GET /api/facts") {
        // re-read so edits to the fixture show up on refresh
        match std::fs::read_to_string(fixture_path) {
            Ok(body) => ("200 OK", "application/json", body),
            Err(err) => (
                "500 INTERNAL SERVER ERROR",
                "application/json",
                json!({ "error": format!("reading {}: {}", fixture_path, err) }).to_string(),
            ),
        }
    } else if request.starts_with("GET /api/health") {
        ("200 OK", "application/json", r#"{"status":"ok"}"#.to_string())
    } else {
        ("404 NOT FOUND", "text/plain", "Not Found".to_string())
    }
}

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let addr = format!("127.0.0.1:{}", cfg.stub_port);
    let listener = TcpListener::bind(&addr).with_context(|| format!("binding {}", addr))?;

    println!("Facts stub server running at http://{}", addr);
    println!();
    println!("Endpoints:");
    println!("  GET /api/facts  - {}", cfg.facts_file);
    println!("  GET /api/health - Health check");
    println!();

    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(s) => s,
            Err(_) => continue,
        };

        let buf_reader = BufReader::new(&stream);
        let request = match buf_reader.lines().next() {
            Some(Ok(line)) => line,
            _ => continue,
        };

        let (status, content_type, body) = respond(&request, &cfg.facts_file);
        log(
            Level::Info,
            Domain::System,
            "stub_request",
            obj(&[("request", v_str(&request)), ("status", v_str(status))]),
        );

        let response = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Content-Length: {}\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );

        let _ = stream.write_all(response.as_bytes());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/facts_sample.json");
        let (status, _, body) = respond("GET /api/facts HTTP/1.1", fixture);
        assert_eq!(status, "200 OK");
        assert!(body.contains("\"structure\""));
        assert_eq!(respond("GET /api/health HTTP/1.1", fixture).0, "200 OK");
        assert_eq!(respond("POST /api/facts HTTP/1.1", fixture).0, "404 NOT FOUND");
        assert_eq!(respond("GET /api/facts HTTP/1.1", "/missing.json").0, "500 INTERNAL SERVER ERROR");
    }
}
