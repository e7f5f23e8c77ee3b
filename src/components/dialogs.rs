// ============================================================================
// PROMPT DIALOGS - small modal prompts for the Process menu and messages
// ============================================================================
//
// Every dialog's `show()` runs once per frame and reports a `DialogResult`.
// At most one dialog is open at a time; the app keeps it in `ActiveDialog`.
// ============================================================================

use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Vec2};

// ============================================================================
// ACTIVE-DIALOG ENUM
// ============================================================================

#[derive(Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Channel(TextPromptDialog),
    KernelSize(IntegerPromptDialog),
    Rectangle(RectangleDialog),
    Message(MessageDialog),
}

impl ActiveDialog {
    /// Returns true if no dialog is currently open.
    pub fn is_none(&self) -> bool {
        matches!(self, ActiveDialog::None)
    }
}

/// Result returned by each dialog's `show()` method every frame.
#[derive(Debug, PartialEq)]
pub enum DialogResult<T> {
    /// Still open, nothing to do this frame.
    Open,
    /// The input changed.
    Changed,
    /// User confirmed; contains the final value.
    Ok(T),
    /// User dismissed the dialog.
    Cancel,
}

// ============================================================================
// SHARED DIALOG STYLING HELPERS
// ============================================================================

/// Colors extracted from the current egui visuals for dialog rendering.
pub(crate) struct DialogColors {
    pub accent: Color32,
    pub accent_faint: Color32,
    pub text_muted: Color32,
    pub warning: Color32,
    pub error: Color32,
}

impl DialogColors {
    pub(crate) fn from_ctx(ctx: &egui::Context) -> Self {
        let v = ctx.style().visuals.clone();
        let accent = v.selection.stroke.color;
        let alpha = if v.dark_mode { 35 } else { 25 };
        // In dark mode, boost muted text so labels stay readable
        let text_muted = if v.dark_mode {
            Color32::from_gray(160)
        } else {
            v.weak_text_color()
        };
        Self {
            accent,
            accent_faint: Color32::from_rgba_unmultiplied(accent.r(), accent.g(), accent.b(), alpha),
            text_muted,
            warning: v.warn_fg_color,
            error: v.error_fg_color,
        }
    }
}

/// Paint the accent header bar with icon + title.
pub(crate) fn paint_dialog_header(
    ui: &mut egui::Ui,
    colors: &DialogColors,
    accent: Color32,
    icon: &str,
    title: &str,
) {
    let available_width = ui.available_width();
    let header_height = 32.0;
    let (rect, _) = ui.allocate_exact_size(Vec2::new(available_width, header_height), Sense::hover());

    let painter = ui.painter();
    painter.rect_filled(rect, Rounding::ZERO, colors.accent_faint);
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(3.0, header_height)),
        Rounding::ZERO,
        accent,
    );
    painter.text(
        Pos2::new(rect.min.x + 12.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        format!("{} {}", icon, title),
        egui::FontId::proportional(14.0),
        accent,
    );
}

/// Thin separator line using accent color (very faint).
pub(crate) fn accent_separator(ui: &mut egui::Ui, colors: &DialogColors) {
    let available_width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(available_width, 1.0), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, colors.accent_faint);
}

/// Styled OK / Cancel footer. Returns (ok_clicked, cancel_clicked).
/// `show_cancel = false` gives a lone OK button for message boxes.
pub(crate) fn dialog_footer(
    ui: &mut egui::Ui,
    colors: &DialogColors,
    show_cancel: bool,
) -> (bool, bool) {
    let mut ok = false;
    let mut cancel = false;
    ui.add_space(4.0);
    accent_separator(ui, colors);
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if show_cancel && ui.button(t!("common.cancel")).clicked() {
                cancel = true;
            }
            let ok_label = format!("  {}  ", t!("common.ok"));
            let ok_btn = egui::Button::new(egui::RichText::new(ok_label).color(Color32::WHITE).strong())
                .fill(colors.accent);
            if ui.add(ok_btn).clicked() {
                ok = true;
            }
        });
    });
    (ok, cancel)
}

/// Enter / Escape, consumed so they do not leak into other widgets.
fn consume_confirm_keys(ctx: &egui::Context) -> (bool, bool) {
    let enter = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));
    let esc = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));
    (enter, esc)
}

fn prompt_window(id: &str) -> egui::Window<'static> {
    egui::Window::new(id.to_owned())
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

// ============================================================================
// TEXT PROMPT - free text, used for the channel letter
// ============================================================================

pub struct TextPromptDialog {
    title: String,
    prompt: String,
    pub text: String,
    focus_pending: bool,
}

impl TextPromptDialog {
    pub fn new(title: String, prompt: String) -> Self {
        Self {
            title,
            prompt,
            text: String::new(),
            focus_pending: true,
        }
    }

    /// The submitted text is returned as typed; an empty string is a valid
    /// submission and left for the caller to reject.
    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<String> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);
        let (enter, esc) = consume_confirm_keys(ctx);

        prompt_window("dialog_text_prompt").show(ctx, |ui| {
            ui.set_min_width(300.0);
            paint_dialog_header(ui, &colors, colors.accent, "\u{270F}", &self.title);
            ui.add_space(6.0);

            ui.label(egui::RichText::new(&self.prompt).color(colors.text_muted));
            let resp = ui.add(egui::TextEdit::singleline(&mut self.text).desired_width(f32::INFINITY));
            if self.focus_pending {
                resp.request_focus();
                self.focus_pending = false;
            }
            if resp.changed() {
                result = DialogResult::Changed;
            }

            let (ok, cancel) = dialog_footer(ui, &colors, true);
            if ok || enter {
                result = DialogResult::Ok(self.text.clone());
            }
            if cancel || esc {
                result = DialogResult::Cancel;
            }
        });

        result
    }
}

// ============================================================================
// INTEGER PROMPT - whole number with an optional lower bound
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum IntegerInputError {
    NotANumber,
    BelowMinimum(i32),
}

impl IntegerInputError {
    pub fn hint(&self) -> String {
        match self {
            IntegerInputError::NotANumber => t!("dialog.integer.invalid"),
            IntegerInputError::BelowMinimum(min) => t!("dialog.integer.min", min = min),
        }
    }
}

/// Parse a typed integer. Surrounding whitespace is ignored.
pub fn parse_integer(text: &str, min: Option<i32>) -> Result<i32, IntegerInputError> {
    let value: i32 = text
        .trim()
        .parse()
        .map_err(|_| IntegerInputError::NotANumber)?;
    match min {
        Some(m) if value < m => Err(IntegerInputError::BelowMinimum(m)),
        _ => Ok(value),
    }
}

pub struct IntegerPromptDialog {
    title: String,
    prompt: String,
    pub text: String,
    min: Option<i32>,
    /// Shown under the field after a rejected submission.
    hint: Option<String>,
    focus_pending: bool,
}

impl IntegerPromptDialog {
    pub fn new(title: String, prompt: String, initial: i32, min: Option<i32>) -> Self {
        Self {
            title,
            prompt,
            text: initial.to_string(),
            min,
            hint: None,
            focus_pending: true,
        }
    }

    /// Check the current text, remembering the hint on failure.
    pub fn submit(&mut self) -> Option<i32> {
        match parse_integer(&self.text, self.min) {
            Ok(v) => {
                self.hint = None;
                Some(v)
            }
            Err(e) => {
                self.hint = Some(e.hint());
                None
            }
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Replace title and prompt and reset the field, keeping the window.
    pub(crate) fn restart(&mut self, title: String, prompt: String, initial: i32) {
        self.title = title;
        self.prompt = prompt;
        self.text = initial.to_string();
        self.hint = None;
        self.focus_pending = true;
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<i32> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);
        let (enter, esc) = consume_confirm_keys(ctx);

        prompt_window("dialog_integer_prompt").show(ctx, |ui| {
            ui.set_min_width(300.0);
            paint_dialog_header(ui, &colors, colors.accent, "#", &self.title);
            ui.add_space(6.0);

            ui.label(egui::RichText::new(&self.prompt).color(colors.text_muted));
            let resp = ui.add(egui::TextEdit::singleline(&mut self.text).desired_width(f32::INFINITY));
            if self.focus_pending {
                resp.request_focus();
                self.focus_pending = false;
            }
            if resp.changed() {
                self.hint = None;
                result = DialogResult::Changed;
            }
            if let Some(hint) = &self.hint {
                ui.label(egui::RichText::new(hint).size(11.0).color(colors.warning));
            }

            let (ok, cancel) = dialog_footer(ui, &colors, true);
            if (ok || enter)
                && let Some(v) = self.submit()
            {
                result = DialogResult::Ok(v);
            }
            if cancel || esc {
                result = DialogResult::Cancel;
            }
        });

        result
    }
}

// ============================================================================
// RECTANGLE DIALOG - four integer prompts in a row: x1, y1, x2, y2
// ============================================================================

pub struct RectangleDialog {
    step: usize,
    coords: [Option<i32>; 4],
    prompt: IntegerPromptDialog,
}

const RECT_PROMPTS: [&str; 4] = ["x1", "y1", "x2", "y2"];

impl Default for RectangleDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleDialog {
    pub fn new() -> Self {
        Self {
            step: 0,
            coords: [None; 4],
            prompt: IntegerPromptDialog::new(Self::title(0), Self::label(0), 0, None),
        }
    }

    fn title(step: usize) -> String {
        format!(
            "{} ({})",
            t!("dialog.rectangle.title"),
            t!("dialog.rectangle.step", step = step + 1)
        )
    }

    fn label(step: usize) -> String {
        format!("{}:", RECT_PROMPTS[step])
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Record the value for the current step. Returns the full set once the
    /// last coordinate is in.
    pub fn accept(&mut self, value: i32) -> Option<[Option<i32>; 4]> {
        self.coords[self.step] = Some(value);
        self.step += 1;
        if self.step == RECT_PROMPTS.len() {
            return Some(self.coords);
        }
        self.prompt
            .restart(Self::title(self.step), Self::label(self.step), 0);
        None
    }

    /// Cancelling any step finishes the dialog; coordinates not yet entered
    /// stay `None`.
    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<[Option<i32>; 4]> {
        match self.prompt.show(ctx) {
            DialogResult::Ok(v) => match self.accept(v) {
                Some(coords) => DialogResult::Ok(coords),
                None => DialogResult::Changed,
            },
            DialogResult::Cancel => DialogResult::Ok(self.coords),
            DialogResult::Changed => DialogResult::Changed,
            DialogResult::Open => DialogResult::Open,
        }
    }
}

// ============================================================================
// MESSAGE DIALOG - information, warnings, errors
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

impl MessageLevel {
    fn icon(self) -> &'static str {
        match self {
            MessageLevel::Info => "\u{2139}",
            MessageLevel::Warning => "\u{26A0}",
            MessageLevel::Error => "\u{2716}",
        }
    }
}

pub struct MessageDialog {
    pub level: MessageLevel,
    pub title: String,
    pub body: String,
}

impl MessageDialog {
    pub fn new(level: MessageLevel, title: String, body: String) -> Self {
        Self { level, title, body }
    }

    pub fn warning(body: String) -> Self {
        Self::new(MessageLevel::Warning, t!("message.warning"), body)
    }

    pub fn error(body: String) -> Self {
        Self::new(MessageLevel::Error, t!("message.error"), body)
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<()> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);
        let (enter, esc) = consume_confirm_keys(ctx);
        let accent = match self.level {
            MessageLevel::Info => colors.accent,
            MessageLevel::Warning => colors.warning,
            MessageLevel::Error => colors.error,
        };

        prompt_window("dialog_message").show(ctx, |ui| {
            ui.set_min_width(320.0);
            paint_dialog_header(ui, &colors, accent, self.level.icon(), &self.title);
            ui.add_space(8.0);
            ui.label(&self.body);
            ui.add_space(4.0);

            let (ok, _) = dialog_footer(ui, &colors, false);
            if ok || enter || esc {
                result = DialogResult::Ok(());
            }
        });

        result
    }
}
