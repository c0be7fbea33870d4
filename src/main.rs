// ZipDrop - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config file + CLI overrides)
// 3. Logging initialisation (debug mode support)
// 4. Headless batch run, or eframe GUI launch

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

mod gui;
mod headless;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use zipdrop::app;

pub use zipdrop::core;
pub use zipdrop::platform;
pub use zipdrop::ui;
pub use zipdrop::util;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// ZipDrop - drag-and-drop ZIP uploader.
///
/// Drop archives on the window (or name them on the command line with
/// --headless) to send each one to the archive server's upload endpoint.
#[derive(Parser, Debug)]
#[command(name = "ZipDrop", version, about)]
struct Cli {
    /// Files or directories to upload (headless) or to pre-load (GUI).
    paths: Vec<PathBuf>,

    /// Server base URL, e.g. http://localhost:8081.
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// Accepted file suffix, e.g. .zip.
    #[arg(long = "suffix")]
    suffix: Option<String>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Upload the given paths without opening a window.
    #[arg(long = "headless")]
    headless: bool,

    /// Walk directories recursively (headless).
    #[arg(short = 'r', long = "recursive")]
    recursive: bool,

    /// Print the batch summary as JSON (headless).
    #[arg(long = "json")]
    json: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Release builds on Windows start without a console; headless output
    // needs the one the user launched us from.
    #[cfg(all(target_os = "windows", not(debug_assertions)))]
    if cli.headless {
        attach_windows_console();
    }

    // Config is read before logging so its level can take effect; its
    // warnings are logged once the subscriber exists.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file());
    let (mut config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "ZipDrop starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    // CLI overrides
    if let Some(ref url) = cli.server {
        if let Err(e) = config.set_server_url(url) {
            eprintln!("Error: {}", util::error::ZipDropError::from(e));
            std::process::exit(headless::EXIT_USAGE);
        }
    }
    if let Some(ref suffix) = cli.suffix {
        if let Err(e) = config.set_accepted_suffix(suffix) {
            eprintln!("Error: {}", util::error::ZipDropError::from(e));
            std::process::exit(headless::EXIT_USAGE);
        }
    }

    let transport = Arc::new(platform::http::HttpTransport::new(&config));
    tracing::info!(url = transport.upload_url(), "Upload endpoint");
    let mut orchestrator = app::orchestrator::UploadOrchestrator::new(
        transport,
        core::selection::SelectionFilter::new(&config.accepted_suffix),
    );

    if cli.headless {
        if cli.paths.is_empty() {
            eprintln!("Error: --headless needs at least one file or directory");
            std::process::exit(headless::EXIT_USAGE);
        }
        let mut stdout = std::io::stdout().lock();
        let code = headless::run(
            &mut orchestrator,
            &cli.paths,
            cli.recursive,
            cli.json,
            &mut stdout,
        );
        std::process::exit(code);
    }

    let mut state = app::state::UploadState::new(
        config.listing_url(),
        config.accepted_suffix.clone(),
        cli.debug,
    );
    if !cli.paths.is_empty() {
        state.pending_paths = Some(cli.paths.clone());
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([640.0, 560.0])
            .with_min_inner_size([420.0, 360.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::ZipDropApp::new(state, orchestrator)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ZipDrop GUI: {e}");
        std::process::exit(1);
    }
}

/// Bind stdout and stderr to the parent console (or a new one), leaving
/// any handle that was already redirected untouched.
#[cfg(all(target_os = "windows", not(debug_assertions)))]
fn attach_windows_console() {
    use windows::Win32::Storage::FileSystem::{
        CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_GENERIC_WRITE, FILE_SHARE_READ, FILE_SHARE_WRITE,
        OPEN_EXISTING,
    };
    use windows::Win32::System::Console::{
        AllocConsole, AttachConsole, GetStdHandle, SetStdHandle, ATTACH_PARENT_PROCESS,
        STD_ERROR_HANDLE, STD_HANDLE, STD_OUTPUT_HANDLE,
    };

    fn is_missing(kind: STD_HANDLE) -> bool {
        match unsafe { GetStdHandle(kind) } {
            Ok(handle) => handle.is_invalid() || handle.0.is_null(),
            Err(_) => true,
        }
    }

    let targets: Vec<STD_HANDLE> = [STD_OUTPUT_HANDLE, STD_ERROR_HANDLE]
        .into_iter()
        .filter(|kind| is_missing(*kind))
        .collect();
    if targets.is_empty() {
        return;
    }

    unsafe {
        if AttachConsole(ATTACH_PARENT_PROCESS).is_err() {
            let _ = AllocConsole();
        }
        let Ok(console) = CreateFileW(
            windows::core::w!("CONOUT$"),
            FILE_GENERIC_WRITE.0,
            FILE_SHARE_READ | FILE_SHARE_WRITE,
            None,
            OPEN_EXISTING,
            FILE_ATTRIBUTE_NORMAL,
            None,
        ) else {
            return;
        };
        for kind in targets {
            let _ = SetStdHandle(kind, console);
        }
    }
}
