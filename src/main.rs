//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` on a local port.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, Stdio};

use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Build and serve the event horizon page")]
struct Args {
    /// Port for the local HTTP server.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
    /// Serve whatever is already in `static/pkg`.
    #[arg(long)]
    skip_build: bool,
    /// Directory holding index.html.
    #[arg(long, default_value = "static")]
    root: PathBuf,
}

fn build_wasm(root: &Path) -> Result<(), String> {
    log::info!("building WASM pkg …");
    let out_dir = root.join("pkg");
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir"])
        .arg(&out_dir)
        .status()
        .map_err(|e| format!("wasm-pack not runnable ({e}); install it from https://rustwasm.github.io/wasm-pack/"))?;
    if !status.success() {
        return Err(format!("wasm-pack exited with {status}"));
    }
    Ok(())
}

fn serve(root: &Path, port: u16) -> Result<(), String> {
    log::info!("serving {} at http://127.0.0.1:{port}", root.display());
    let port = port.to_string();
    let status = Command::new("python3")
        .args(["-m", "http.server", port.as_str(), "--directory"])
        .arg(root)
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| format!("failed to start http server: {e}"))?;
    if !status.success() {
        return Err(format!("http server exited with {status}"));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.root.join("index.html").exists() {
        log::error!("{} has no index.html", args.root.display());
        return ExitCode::FAILURE;
    }

    if args.skip_build {
        log::warn!("skipping wasm build; the site may serve stale artifacts");
    } else if let Err(e) = build_wasm(&args.root) {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }

    match serve(&args.root, args.port) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
