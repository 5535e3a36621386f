//! Shared helpers for the command integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset of the helpers")]

use camino::Utf8PathBuf;
use std::io::Write;
use vidrank_lib::Host;
use wiremock::MockServer;

/// Test host that captures output to in-memory buffers.
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
}

impl TestHost {
    pub const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading fixture {path}: {e}"))
}

pub fn fixture_json(name: &str) -> serde_json::Value {
    serde_json::from_str(&fixture(name)).expect("fixture should be valid JSON")
}

/// Write a configuration file that points both remote APIs at `server`.
pub fn write_config(dir: &tempfile::TempDir, server: &MockServer) -> Utf8PathBuf {
    let path = Utf8PathBuf::try_from(dir.path().join("vidrank.toml")).expect("temp path should be UTF-8");
    let text = format!(
        "youtube_api_url = \"{uri}/youtube/v3\"\nopenai_api_url = \"{uri}/v1\"\nrequest_timeout = \"5s\"\n",
        uri = server.uri()
    );
    std::fs::write(&path, text).expect("writing config");
    path
}

pub fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_str().expect("temp path should be UTF-8").to_string()
}
