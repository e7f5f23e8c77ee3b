use std::path::PathBuf;

use eframe::egui;
use egui::{Key, KeyboardShortcut, Modifiers};

use crate::camera;
use crate::canvas::Canvas;
use crate::cli::CliArgs;
use crate::components::dialogs::{
    ActiveDialog, DialogResult, IntegerPromptDialog, MessageDialog, MessageLevel,
    RectangleDialog, TextPromptDialog,
};
use crate::controller::DisplayController;
use crate::error::{Result, ValidationError};
use crate::io::FileHandler;
use crate::{log_err, log_info, log_warn};

const SHORTCUT_OPEN: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
const SHORTCUT_CAPTURE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::P);
const SHORTCUT_QUIT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

/// Value pre-filled in the blur prompt.
const DEFAULT_KERNEL_SIZE: i32 = 3;

/// Everything a menu item or shortcut can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuAction {
    Open,
    Capture,
    Quit,
    ShowChannel,
    Blur,
    Sharpen,
    DrawRectangle,
    About,
}

pub struct PhotoBenchApp {
    controller: DisplayController,
    canvas: Canvas,
    file_handler: FileHandler,
    active_dialog: ActiveDialog,
    /// Image named on the command line, loaded on the first frame so a
    /// failure can be shown in a dialog.
    pending_startup_file: Option<PathBuf>,
}

impl PhotoBenchApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, args: &CliArgs) -> Self {
        let backend = camera::default_backend(args.camera);
        log_info!("Capture device: {}", backend.describe());
        Self {
            controller: DisplayController::new(backend),
            canvas: Canvas::new(),
            file_handler: FileHandler::new(),
            active_dialog: ActiveDialog::None,
            pending_startup_file: args.image.clone(),
        }
    }

    /// Surface a failed operation: logged, then shown in a message box.
    fn report<T>(&mut self, result: Result<T>) {
        let Err(err) = result else {
            return;
        };
        let dialog = if err.is_warning() {
            log_warn!("{}", err);
            MessageDialog::warning(err.user_message())
        } else {
            log_err!("{}", err);
            MessageDialog::error(err.user_message())
        };
        self.active_dialog = ActiveDialog::Message(dialog);
    }

    fn shortcut_action(ctx: &egui::Context) -> Option<MenuAction> {
        ctx.input_mut(|i| {
            if i.consume_shortcut(&SHORTCUT_OPEN) {
                Some(MenuAction::Open)
            } else if i.consume_shortcut(&SHORTCUT_CAPTURE) {
                Some(MenuAction::Capture)
            } else if i.consume_shortcut(&SHORTCUT_QUIT) {
                Some(MenuAction::Quit)
            } else {
                None
            }
        })
    }

    fn run_action(&mut self, ctx: &egui::Context, action: MenuAction) {
        match action {
            MenuAction::Open => {
                // A cancelled file dialog changes nothing
                if let Some(path) = self.file_handler.pick_file_path() {
                    let result = self.controller.load_from_file(&path);
                    self.report(result);
                }
            }
            MenuAction::Capture => {
                let result = self.controller.load_from_camera();
                self.report(result);
            }
            MenuAction::Quit => {
                log_info!("Quit requested");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            MenuAction::Sharpen => {
                let result = self.controller.sharpen();
                self.report(result);
            }
            MenuAction::ShowChannel | MenuAction::Blur | MenuAction::DrawRectangle => {
                // No prompt is shown until there is something to process
                if !self.controller.has_image() {
                    self.report::<()>(Err(ValidationError::NoImage.into()));
                    return;
                }
                self.active_dialog = match action {
                    MenuAction::ShowChannel => ActiveDialog::Channel(TextPromptDialog::new(
                        t!("dialog.channel.title"),
                        t!("dialog.channel.prompt"),
                    )),
                    MenuAction::Blur => ActiveDialog::KernelSize(IntegerPromptDialog::new(
                        t!("dialog.blur.title"),
                        t!("dialog.blur.prompt"),
                        DEFAULT_KERNEL_SIZE,
                        Some(1),
                    )),
                    _ => ActiveDialog::Rectangle(RectangleDialog::new()),
                };
            }
            MenuAction::About => {
                self.active_dialog = ActiveDialog::Message(MessageDialog::new(
                    MessageLevel::Info,
                    t!("about.title"),
                    t!("about.text"),
                ));
            }
        }
    }

    fn process_active_dialog(&mut self, ctx: &egui::Context) {
        // Take ownership for the frame; completion handlers need &mut self.
        let mut dialog = std::mem::take(&mut self.active_dialog);

        match &mut dialog {
            ActiveDialog::None => {}

            ActiveDialog::Channel(dlg) => match dlg.show(ctx) {
                DialogResult::Ok(text) => {
                    let result = self.controller.extract_channel(&text);
                    self.report(result);
                    return;
                }
                DialogResult::Cancel => return,
                _ => {}
            },

            ActiveDialog::KernelSize(dlg) => match dlg.show(ctx) {
                DialogResult::Ok(k) => {
                    let result = self.controller.box_blur(Some(k));
                    self.report(result);
                    return;
                }
                DialogResult::Cancel => {
                    // No size given: rejected like any other bad size
                    let result = self.controller.box_blur(None);
                    self.report(result);
                    return;
                }
                _ => {}
            },

            ActiveDialog::Rectangle(dlg) => {
                if let DialogResult::Ok(coords) = dlg.show(ctx) {
                    let result = self.controller.draw_rectangle(coords);
                    self.report(result);
                    return;
                }
            }

            ActiveDialog::Message(dlg) => {
                if let DialogResult::Ok(()) = dlg.show(ctx) {
                    return;
                }
            }
        }

        self.active_dialog = dialog;
    }

    fn menu_bar(&self, ctx: &egui::Context, ui: &mut egui::Ui) -> Option<MenuAction> {
        let mut action = None;
        egui::menu::bar(ui, |ui| {
            ui.menu_button(t!("menu.file"), |ui| {
                let items = [
                    (MenuAction::Open, t!("menu.file.open"), SHORTCUT_OPEN),
                    (MenuAction::Capture, t!("menu.file.capture"), SHORTCUT_CAPTURE),
                ];
                for (item, label, shortcut) in items {
                    let button = egui::Button::new(label).shortcut_text(ctx.format_shortcut(&shortcut));
                    if ui.add(button).clicked() {
                        action = Some(item);
                        ui.close_menu();
                    }
                }
                ui.separator();
                let quit = egui::Button::new(t!("menu.file.quit"))
                    .shortcut_text(ctx.format_shortcut(&SHORTCUT_QUIT));
                if ui.add(quit).clicked() {
                    action = Some(MenuAction::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button(t!("menu.process"), |ui| {
                let items = [
                    (MenuAction::ShowChannel, t!("menu.process.channel")),
                    (MenuAction::Blur, t!("menu.process.blur")),
                    (MenuAction::Sharpen, t!("menu.process.sharpen")),
                    (MenuAction::DrawRectangle, t!("menu.process.rectangle")),
                ];
                for (item, label) in items {
                    if ui.button(label).clicked() {
                        action = Some(item);
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button(t!("menu.help"), |ui| {
                if ui.button(t!("menu.help.about")).clicked() {
                    action = Some(MenuAction::About);
                    ui.close_menu();
                }
            });
        });
        action
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.controller.status());
            if let Some(buffer) = self.controller.buffer() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{} \u{00D7} {}", buffer.width(), buffer.height()));
                });
            }
        });
    }
}

impl eframe::App for PhotoBenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = self.pending_startup_file.take() {
            let result = self.controller.load_from_file(&path);
            self.report(result);
        }

        // A modal dialog blocks shortcuts and the menu bar.
        let modal_open = !self.active_dialog.is_none();
        let mut action = if modal_open {
            None
        } else {
            Self::shortcut_action(ctx)
        };

        self.process_active_dialog(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                if let Some(clicked) = self.menu_bar(ctx, ui) {
                    action = Some(clicked);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.canvas.show(ui, &self.controller);
            });

        if let Some(action) = action {
            self.run_action(ctx, action);
        }
    }
}
