//! Desktop window (feature `gui`)
//!
//! One window with the whole flow top to bottom: pick a workbook, choose the
//! header row and preview, type the instruction and target cells, generate,
//! save. All work goes through [`crate::session::Session`].

mod fonts;
mod panels;

use eframe::egui;

use crate::session::Session;

pub use fonts::install_cjk_fonts;

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// Severity of a modal message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// A message shown in a modal window until dismissed
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

/// Text fields and the session behind them
pub struct FormulaApp {
    pub session: Session,
    pub header_input: String,
    pub instruction: String,
    pub cell_input: String,
    pub row_count_input: String,
    /// Last generated formula or translation message
    pub formula_display: String,
    pub sheet_names: Vec<String>,
    pub selected_sheet: Option<String>,
    pub message: Option<Message>,
}

impl FormulaApp {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            header_input: "0".to_string(),
            instruction: String::new(),
            cell_input: String::new(),
            row_count_input: String::new(),
            formula_display: String::new(),
            sheet_names: Vec::new(),
            selected_sheet: None,
            message: None,
        }
    }

    pub fn show_message(&mut self, kind: MessageKind, title: &str, body: impl Into<String>) {
        self.message = Some(Message {
            kind,
            title: title.to_string(),
            body: body.into(),
        });
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

impl eframe::App for FormulaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::file_section(ui, self);
                    ui.separator();
                    panels::preview_section(ui, self);
                    ui.separator();
                    panels::formula_section(ui, self);
                });
        });

        panels::message_window(ctx, self);
    }
}
