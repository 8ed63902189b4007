//! Resto Staff - Desktop admin app for restaurant staff records and account
//! provisioning.

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use resto_staff as app;

use app::config::{AppConfig, ConfigLoadResult};
use app::db;
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop admin app for restaurant staff records and account provisioning.
#[derive(Parser)]
#[command(name = "resto-staff")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Resto Staff starting...");

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            LaunchMode::Normal(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, starting setup wizard");
            LaunchMode::Setup(SetupWizard::new(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            LaunchMode::Setup(SetupWizard::new(), Some(e.to_string()))
        }
    };

    match launch_mode {
        LaunchMode::Normal(config) => run_main_app(config),
        LaunchMode::Setup(wizard, error) => run_setup_wizard(wizard, error),
    }
}

/// Run the setup wizard.
fn run_setup_wizard(wizard: SetupWizard, initial_error: Option<String>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Resto Staff - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Resto Staff - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(SetupApp::new(wizard, initial_error)))),
    )
}

/// Run the main application.
fn run_main_app(config: AppConfig) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Resto Staff")
            .with_inner_size([900.0, 650.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    // Connect to database
    let pool = rt.block_on(async {
        let conn = db::connect(&config.database.connection_string())
            .await
            .expect("Failed to connect to database");

        // Log connection info
        if let Ok(version) = db::get_version(&conn).await {
            tracing::info!("PostgreSQL: {}", version);
        }

        if let Ok(count) = db::employee::count(&conn).await {
            tracing::info!("Tables: {} employee records", count);
        }

        conn
    });

    eframe::run_native(
        "Resto Staff",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(App::new(pool, config, rt)))
        }),
    )
}
