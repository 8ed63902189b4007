//! Employee admin panel: record list plus the add/edit form dialog.

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget, EmployeeForm, LogLevel};
use super::components::{
    action_button, danger_action_button, panel_header, primary_button_with_icon, styled_button,
    styled_button_with_icon,
};
use crate::models::employee::{COUNTRY_CODES, EmployeeDraft, Role};

/// Render a salary-like value with a dollar prefix and thousands grouping.
///
/// Strips `$` and `,`, parses as a float (0 on failure), and re-renders with
/// at most two fractional digits.
pub fn format_price(value: &str) -> String {
    let cleaned: String = value.chars().filter(|c| *c != '$' && *c != ',').collect();
    let number = cleaned.trim().parse::<f64>().unwrap_or(0.0);

    let mut rendered = format!("{number:.2}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }

    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
        None => (rendered, None),
    };

    let grouped = group_thousands(&int_part);
    match frac_part {
        Some(frac) => format!("${grouped}.{frac}"),
        None => format!("${grouped}"),
    }
}

/// Insert `,` separators every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Hourly schedule labels offered by the ENTRADA/SALIDA selectors.
///
/// Ascending from 5:00 AM, with a trailing 12:00 AM for shifts that close
/// at midnight.
pub fn generate_time_options() -> Vec<String> {
    let mut times: Vec<String> = (5..23)
        .map(|hour| {
            let ampm = if hour < 12 { "AM" } else { "PM" };
            let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
            format!("{display_hour}:00 {ampm}")
        })
        .collect();
    times.push("12:00 AM".to_string());
    times
}

/// Show the employee admin panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Administrar Empleados");

    // Toolbar
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Agregar").clicked() {
            app.open_add_form();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Actualizar").clicked() {
            app.load_employees();
        }

        if app.is_loading {
            ui.add_space(10.0);
            ui.spinner();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    ui.add_space(20.0);

    show_activity_log(app, ui);

    // Form dialog
    if app.employee_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_activity_log(app: &App, ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("Actividad reciente").strong())
        .default_open(false)
        .show(ui, |ui| {
            ScrollArea::vertical().id_salt("activity_scroll").max_height(150.0).show(ui, |ui| {
                if app.log_messages.is_empty() {
                    ui.label(RichText::new("Sin actividad reciente").weak());
                } else {
                    for entry in app.log_messages.iter().rev().take(10) {
                        let color = match entry.level {
                            LogLevel::Info => Color32::GRAY,
                            LogLevel::Success => Color32::from_rgb(100, 200, 100),
                            LogLevel::Warning => Color32::from_rgb(230, 180, 50),
                            LogLevel::Error => Color32::from_rgb(230, 100, 100),
                        };

                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                    .small()
                                    .color(Color32::DARK_GRAY),
                            );
                            ui.label(RichText::new(&entry.message).color(color));
                        });
                    }
                }
            });
        });
}

fn show_table(app: &mut App, ui: &mut Ui) {
    ui.label(format!("{} empleados", app.employees.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("staff_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("employees_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                // Header
                ui.strong("ID");
                ui.strong("Nombre");
                ui.strong("Rol");
                ui.strong("Email");
                ui.strong("Acciones");
                ui.end_row();

                // Data rows
                for emp in &app.employees {
                    ui.label(&emp.id);
                    ui.label(&emp.name);
                    ui.label(&emp.role);
                    ui.label(&emp.email);

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Editar").clicked() {
                            app.employee_form = EmployeeForm::edit(emp);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Eliminar").clicked() {
                            app.delete_target = Some(DeleteTarget {
                                id: emp.id.clone(),
                                name: emp.name.clone(),
                            });
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.employee_form.is_editing {
        "Editar Empleado"
    } else {
        "Agregar Empleado"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(450.0)
        .max_height(520.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                egui::Grid::new("emp_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("ID:");
                        ui.add_enabled(
                            false,
                            egui::TextEdit::singleline(&mut app.employee_form.id).desired_width(120.0),
                        );
                        ui.end_row();

                        ui.label("Nombre:");
                        ui.add(egui::TextEdit::singleline(&mut app.employee_form.name).desired_width(250.0));
                        ui.end_row();

                        ui.label("Email:");
                        ui.add(egui::TextEdit::singleline(&mut app.employee_form.email).desired_width(250.0));
                        ui.end_row();

                        ui.label("Rol:");
                        egui::ComboBox::from_id_salt("emp_form_role")
                            .width(200.0)
                            .selected_text(app.employee_form.role.map(|r| r.as_str()).unwrap_or("Seleccionar Rol"))
                            .show_ui(ui, |ui| {
                                for role in Role::ALL {
                                    if ui
                                        .selectable_label(app.employee_form.role == Some(role), role.as_str())
                                        .clicked()
                                    {
                                        app.employee_form.role = Some(role);
                                    }
                                }
                            });
                        ui.end_row();

                        ui.label("Teléfono:");
                        ui.horizontal(|ui| {
                            egui::ComboBox::from_id_salt("emp_form_phone_cc")
                                .width(70.0)
                                .selected_text(app.employee_form.phone_country_code.clone())
                                .show_ui(ui, |ui| {
                                    for code in COUNTRY_CODES {
                                        if ui
                                            .selectable_label(app.employee_form.phone_country_code == code, code)
                                            .clicked()
                                        {
                                            app.employee_form.phone_country_code = code.to_string();
                                        }
                                    }
                                });
                            ui.add(egui::TextEdit::singleline(&mut app.employee_form.phone).desired_width(160.0));
                        });
                        ui.end_row();

                        let is_client = app.employee_form.role.is_some_and(|r| r.is_client());

                        if is_client {
                            ui.label("Dirección:");
                            ui.add(egui::TextEdit::singleline(&mut app.employee_form.address).desired_width(250.0));
                            ui.end_row();
                        } else {
                            ui.label("Sueldo:");
                            ui.horizontal(|ui| {
                                ui.add(
                                    egui::TextEdit::singleline(&mut app.employee_form.salary).desired_width(120.0),
                                );
                                ui.weak(format_price(&app.employee_form.salary));
                            });
                            ui.end_row();

                            let times = generate_time_options();

                            ui.label("Horario:");
                            ui.horizontal(|ui| {
                                egui::ComboBox::from_id_salt("emp_form_sched_start")
                                    .width(110.0)
                                    .selected_text(if app.employee_form.schedule_start.is_empty() {
                                        "ENTRADA".to_string()
                                    } else {
                                        app.employee_form.schedule_start.clone()
                                    })
                                    .show_ui(ui, |ui| {
                                        for time in &times {
                                            if ui
                                                .selectable_label(app.employee_form.schedule_start == *time, time)
                                                .clicked()
                                            {
                                                app.employee_form.schedule_start = time.clone();
                                            }
                                        }
                                    });

                                egui::ComboBox::from_id_salt("emp_form_sched_end")
                                    .width(110.0)
                                    .selected_text(if app.employee_form.schedule_end.is_empty() {
                                        "SALIDA".to_string()
                                    } else {
                                        app.employee_form.schedule_end.clone()
                                    })
                                    .show_ui(ui, |ui| {
                                        for time in &times {
                                            if ui
                                                .selectable_label(app.employee_form.schedule_end == *time, time)
                                                .clicked()
                                            {
                                                app.employee_form.schedule_end = time.clone();
                                            }
                                        }
                                    });
                            });
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Atrás").clicked() {
                    app.close_form();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Guardar").clicked() {
                        save_employee(app);
                    }
                });
            });
        });
}

/// Validate the form and hand the normalized record to the submit workflow.
///
/// Validation failures never reach a remote service.
fn save_employee(app: &mut App) {
    let form = &app.employee_form;

    let Some(role) = form.role else {
        app.error_message = Some("Por favor complete todos los campos obligatorios para el rol seleccionado.".to_string());
        return;
    };

    let draft = EmployeeDraft {
        id: form.id.clone(),
        name: form.name.clone(),
        role,
        phone_country_code: form.phone_country_code.clone(),
        phone: form.phone.clone(),
        address: form.address.clone(),
        salary: form.salary.clone(),
        schedule_start: form.schedule_start.clone(),
        schedule_end: form.schedule_end.clone(),
        email: form.email.clone(),
    };

    if let Err(msg) = draft.validate() {
        app.error_message = Some(msg.to_string());
        return;
    }

    let is_editing = form.is_editing;
    app.submit_employee(draft.into_record(), is_editing);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_plain_number() {
        assert_eq!(format_price("1234.5"), "$1,234.5");
    }

    #[test]
    fn test_format_price_empty() {
        assert_eq!(format_price(""), "$0");
    }

    #[test]
    fn test_format_price_already_formatted() {
        assert_eq!(format_price("$2,000"), "$2,000");
    }

    #[test]
    fn test_format_price_unparsable_defaults_to_zero() {
        assert_eq!(format_price("abc"), "$0");
    }

    #[test]
    fn test_format_price_caps_fraction_digits() {
        assert_eq!(format_price("1000.456"), "$1,000.46");
    }

    #[test]
    fn test_time_options_shape() {
        let times = generate_time_options();
        assert_eq!(times.len(), 19);
        assert_eq!(times.first().map(String::as_str), Some("5:00 AM"));
        assert_eq!(times.last().map(String::as_str), Some("12:00 AM"));
    }

    #[test]
    fn test_time_options_render_noon_as_pm() {
        let times = generate_time_options();
        assert!(times.contains(&"12:00 PM".to_string()));
        assert!(times.contains(&"1:00 PM".to_string()));
    }

    #[test]
    fn test_time_options_ascending_until_trailing_midnight() {
        let times = generate_time_options();
        assert_eq!(times[1], "6:00 AM");
        assert_eq!(times[times.len() - 2], "10:00 PM");
    }
}
