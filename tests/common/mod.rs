#![allow(dead_code)]

use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled `lfb` binary
pub fn lfb_binary() -> &'static str {
    env!("CARGO_BIN_EXE_lfb")
}

/// Runs lfb commands against an isolated config file and an API base URL
/// that nothing listens on
pub struct LfbTest {
    pub temp_dir: TempDir,
    base_url: String,
}

impl LfbTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        // Bind and release an ephemeral port so connections are refused
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind port");
        let port = listener.local_addr().expect("Failed to read address").port();
        drop(listener);

        LfbTest {
            temp_dir,
            base_url: format!("http://127.0.0.1:{port}/api"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(lfb_binary());
        cmd.current_dir(self.temp_dir.path())
            .env("LFB_CONFIG", self.config_path())
            .env("LFB_BASE_URL", &self.base_url)
            .env("LFB_USER", "tester")
            .env_remove("LFB_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute lfb command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }
}
