//! First-run setup wizard for configuration.

use crate::auth::AuthClient;
use crate::config::AppConfig;
use eframe::egui::{self, Color32, RichText};
use std::sync::mpsc;

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Database connection test state.
    pub db_test_state: ConnectionTestState,
    /// Auth service connection test state.
    pub auth_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Port input as string for text editing.
    port_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        let config = AppConfig::default();
        Self {
            current_step: 0,
            port_input: config.database.port.to_string(),
            config,
            db_test_state: ConnectionTestState::NotTested,
            auth_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true, // Welcome - always can proceed
            1 => matches!(self.db_test_state, ConnectionTestState::Success),
            2 => {
                // Service may be unreachable during setup; the URL shape is
                // enough to continue
                let url = self.config.auth.url.trim();
                !url.is_empty() && url.starts_with("http")
            }
            3 => true, // Confirmation
            _ => false,
        }
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "Database Configuration",
            2 => "Auth Service Configuration",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    db_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
    auth_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(wizard: SetupWizard, initial_error: Option<String>) -> Self {
        Self {
            wizard,
            initial_error,
            rt: tokio::runtime::Runtime::new().expect("Failed to create tokio runtime"),
            db_test_rx: None,
            auth_test_rx: None,
        }
    }

    /// Test database connection asynchronously.
    fn start_db_test(&mut self) {
        let conn_str = self.wizard.config.database.connection_string();
        let (tx, rx) = mpsc::channel();
        self.db_test_rx = Some(rx);
        self.wizard.db_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_db_connection(&conn_str).await;
            let _ = tx.send(result);
        });
    }

    /// Test auth service connection asynchronously.
    fn start_auth_test(&mut self) {
        let url = self.wizard.config.auth.url.clone();
        let (tx, rx) = mpsc::channel();
        self.auth_test_rx = Some(rx);
        self.wizard.auth_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_auth_connection(&url).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.db_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.db_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.db_test_rx = None;
        }

        if let Some(rx) = &self.auth_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.auth_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.auth_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async test results
        self.poll_test_results();

        // Request repaint while testing
        if matches!(self.wizard.db_test_state, ConnectionTestState::Testing)
            || matches!(self.wizard.auth_test_state, ConnectionTestState::Testing)
        {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(Color32::from_rgb(255, 100, 100), &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        // Main wizard panel
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Resto Staff Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                // Step title
                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                // Step content
                let (needs_db_test, needs_auth_test) = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        (false, false)
                    }
                    1 => (show_database_step(ui, &mut self.wizard), false),
                    2 => (false, show_auth_step(ui, &mut self.wizard)),
                    3 => {
                        show_confirmation_step(ui, &self.wizard);
                        (false, false)
                    }
                    _ => (false, false),
                };

                if needs_db_test {
                    self.start_db_test();
                }
                if needs_auth_test {
                    self.start_auth_test();
                }

                ui.add_space(30.0);
                ui.separator();

                // Navigation buttons
                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else {
                            // Final step - Save & Exit
                            if ui.button("Save & Exit").clicked() {
                                self.wizard.completed = true;
                            }
                        }
                    });
                });
            });
        });

        // Handle completion
        if self.wizard.completed {
            let path = AppConfig::default_path();
            match self.wizard.config.save(&path) {
                Ok(()) => {
                    // Show success and close
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Failed to save config: {e}"));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to Resto Staff!");
    ui.add_space(10.0);
    ui.label("This wizard will help you configure the application.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - PostgreSQL database connection details");
    ui.label("  - The auth service URL used for staff accounts");
}

fn show_database_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    egui::Grid::new("db_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Host:");
            ui.text_edit_singleline(&mut wizard.config.database.host);
            ui.end_row();

            ui.label("Port:");
            if ui.text_edit_singleline(&mut wizard.port_input).changed()
                && let Ok(p) = wizard.port_input.parse()
            {
                wizard.config.database.port = p;
            }
            ui.end_row();

            ui.label("Database:");
            ui.text_edit_singleline(&mut wizard.config.database.name);
            ui.end_row();

            ui.label("Username:");
            ui.text_edit_singleline(&mut wizard.config.database.username);
            ui.end_row();

            ui.label("Password:");
            ui.add(egui::TextEdit::singleline(&mut wizard.config.database.password).password(true));
            ui.end_row();
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.db_test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.db_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(Color32::from_rgb(100, 200, 100), "Connection successful!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(Color32::from_rgb(255, 100, 100), format!("Failed: {e}"));
            }
        }
    });

    needs_test
}

fn show_auth_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    ui.label("Configure the service that holds staff and client accounts.");
    ui.label(RichText::new("New employees get an account provisioned here on creation.").italics());
    ui.add_space(10.0);

    egui::Grid::new("auth_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Service URL:");
            ui.text_edit_singleline(&mut wizard.config.auth.url);
            ui.end_row();
        });

    ui.add_space(10.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.auth_test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.auth_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(Color32::from_rgb(100, 200, 100), "Service reachable!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(
                    Color32::from_rgb(255, 200, 100),
                    format!("Service not reachable: {e} (you can still continue)"),
                );
            }
        }
    });

    needs_test
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Database");
        ui.label(format!(
            "  {}@{}:{}/{}",
            wizard.config.database.username,
            wizard.config.database.host,
            wizard.config.database.port,
            wizard.config.database.name
        ));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Auth Service");
        ui.label(format!("  {}", wizard.config.auth.url));
    });

    ui.add_space(20.0);
    ui.label("Click 'Save & Exit' to save and close the wizard.");
    ui.label("You will need to restart the application after setup.");
}

/// Test database connection.
async fn test_db_connection(conn_str: &str) -> Result<(), String> {
    use sea_orm::Database;

    let conn = Database::connect(conn_str).await.map_err(|e| e.to_string())?;

    conn.ping().await.map_err(|e| e.to_string())
}

/// Test auth service connection (simple HTTP check).
async fn test_auth_connection(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL is empty".to_string());
    }

    let client = AuthClient::new(url, 5);
    match client.test_connection().await {
        Ok(true) => Ok(()),
        Ok(false) => Err("service answered with an error status".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
