//! Main application UI.

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::db;
use crate::entities::empleados;
use crate::models::employee::{Role, split_phone, split_schedule};
use crate::registration::RegistrationService;

use super::components::colors;
use super::staff_panel;

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    EmployeesLoaded(Vec<empleados::Model>),
    NextIdAllocated(String),
    LoadError(String),

    // Submit / delete workflow results
    EmployeeSaved { name: String, warning: Option<String> },
    EmployeeDeleted(String),
    OperationFailed(String),
}

/// Form state for the employee record being added or edited.
#[derive(Clone)]
pub struct EmployeeForm {
    pub id: String,
    pub name: String,
    pub role: Option<Role>,
    pub phone_country_code: String,
    pub phone: String,
    pub address: String,
    pub salary: String,
    pub schedule_start: String,
    pub schedule_end: String,
    pub email: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            role: None,
            phone_country_code: "+1".to_string(),
            phone: String::new(),
            address: String::new(),
            salary: String::new(),
            schedule_start: String::new(),
            schedule_end: String::new(),
            email: String::new(),
            is_open: false,
            is_editing: false,
        }
    }
}

impl EmployeeForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing record.
    ///
    /// Decomposes the stored phone (country code prefix, "+1" when absent)
    /// and schedule ("start-end") back into their editable parts. Editing
    /// suppresses account provisioning on the next submit.
    pub fn edit(record: &empleados::Model) -> Self {
        let (phone_country_code, phone) = split_phone(&record.phone);
        let (schedule_start, schedule_end) = split_schedule(record.schedule.as_deref().unwrap_or(""));

        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            role: Role::parse(&record.role),
            phone_country_code,
            phone,
            address: record.address.clone().unwrap_or_default(),
            salary: record.salary.clone().unwrap_or_default(),
            schedule_start,
            schedule_end,
            email: record.email.clone(),
            is_open: true,
            is_editing: true,
        }
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Record pending deletion, held while the confirmation dialog is open.
#[derive(Clone)]
pub struct DeleteTarget {
    pub id: String,
    pub name: String,
}

/// Main application state.
pub struct App {
    // Runtime and database
    pub rt: tokio::runtime::Runtime,
    pub pool: DatabaseConnection,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Cached data
    pub employees: Vec<empleados::Model>,

    // Loading state
    pub is_loading: bool,

    // Form
    pub employee_form: EmployeeForm,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub warning_message: Option<String>,
}

impl App {
    pub fn new(pool: DatabaseConnection, config: AppConfig, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            pool,
            tx,
            rx,
            employees: Vec::new(),
            is_loading: false,
            employee_form: EmployeeForm::default(),
            log_messages: Vec::new(),
            config,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
            warning_message: None,
        };

        // Load initial data and prime the next id for the add form
        app.load_employees();
        app.allocate_next_id();

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Load employees from database, ordered by id.
    pub fn load_employees(&mut self) {
        let pool = self.pool.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match db::employee::list_all(&pool).await {
                Ok(emps) => {
                    let _ = tx.send(UiMessage::EmployeesLoaded(emps));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to load employees: {e}")));
                }
            }
        });
    }

    /// Allocate the next employee id and store it into the form.
    ///
    /// A failed allocation is logged only; the form id stays as it was.
    pub fn allocate_next_id(&mut self) {
        let pool = self.pool.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match db::employee::next_id(&pool).await {
                Ok(id) => {
                    let _ = tx.send(UiMessage::NextIdAllocated(id));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to allocate next id: {e}")));
                }
            }
        });
    }

    /// Run the submit workflow for a validated, normalized record.
    ///
    /// The create path provisions an account after persisting; the edit path
    /// persists only. No guard prevents overlapping submissions.
    pub fn submit_employee(&mut self, record: empleados::Model, is_editing: bool) {
        let pool = self.pool.clone();
        let config = self.config.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            let name = record.name.clone();
            let mut service = RegistrationService::new(pool, &config);

            let result = if is_editing {
                service.update(record).await.map(|_| None)
            } else {
                service.register(record).await.map(|outcome| outcome.session_warning)
            };

            match result {
                Ok(warning) => {
                    let _ = tx.send(UiMessage::EmployeeSaved { name, warning });
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(format!("Error al registrar empleado: {e}")));
                }
            }
        });
    }

    /// Delete an employee by id.
    pub fn delete_employee(&mut self, id: String) {
        let pool = self.pool.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match db::employee::delete(&pool, &id).await {
                Ok(true) => {
                    let _ = tx.send(UiMessage::EmployeeDeleted(id));
                }
                Ok(false) => {
                    let _ = tx.send(UiMessage::OperationFailed("Error al eliminar el empleado".to_string()));
                }
                Err(e) => {
                    tracing::error!("Delete of employee {id} failed: {e}");
                    let _ = tx.send(UiMessage::OperationFailed("Error al eliminar el empleado".to_string()));
                }
            }
        });
    }

    /// Open the add form: clear fields and re-run the id allocator.
    pub fn open_add_form(&mut self) {
        self.employee_form.reset();
        self.employee_form.is_open = true;
        self.allocate_next_id();
    }

    /// Close the form and clear it.
    pub fn close_form(&mut self) {
        self.employee_form.reset();
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::EmployeesLoaded(emps) => {
                    self.employees = emps;
                    self.is_loading = false;
                }
                UiMessage::NextIdAllocated(id) => {
                    // Never clobber the id of a record being edited
                    if !self.employee_form.is_editing {
                        self.employee_form.id = id;
                    }
                }
                UiMessage::LoadError(e) => {
                    tracing::error!("{e}");
                    self.log_error(e);
                    self.is_loading = false;
                }
                UiMessage::EmployeeSaved { name, warning } => {
                    self.success_message = Some("Empleado registrado correctamente".to_string());
                    self.warning_message = warning;
                    self.log_success(format!("Saved employee '{name}'"));
                    self.close_form();
                    self.load_employees();
                }
                UiMessage::EmployeeDeleted(id) => {
                    self.employees.retain(|e| e.id != id);
                    self.success_message = Some("Empleado eliminado correctamente".to_string());
                    self.log_success(format!("Deleted employee {id}"));
                    self.load_employees();
                }
                UiMessage::OperationFailed(e) => {
                    self.error_message = Some(e.clone());
                    self.log_error(e);
                    self.is_loading = false;
                }
            }
        }
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    ui.colored_label(colors::NEUTRAL, format!("Base de datos: {}", self.config.database.name));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.colored_label(colors::NEUTRAL, format!("Registros: {}", self.employees.len()));
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, warning, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Éxito")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Warning dialog (session fixup problems after a successful create)
        if let Some(ref msg) = self.warning_message.clone() {
            egui::Window::new("Aviso")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 20.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::WARNING, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.warning_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            egui::Window::new("Confirmar eliminación")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!(
                        "¿Estás seguro de que deseas eliminar este empleado? ({})",
                        target.name
                    ));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancelar").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Eliminar").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            self.log_info(format!("Deleting employee: {}", target.name));
            self.delete_employee(target.id);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint while remote work is pending
        if self.is_loading {
            ctx.request_repaint();
        }

        // Status bar
        self.show_status_bar(ctx);

        // Modal dialogs (error, success, warning, delete confirmation)
        self.show_dialogs(ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            staff_panel::show(self, ui);
        });
    }
}
