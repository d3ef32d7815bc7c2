use eframe::egui::{self, Align2, Color32, RichText, Ui};

use super::{FormulaApp, MessageKind};
use crate::error::NlFormulaError;
use crate::excel::ExcelImporter;
use crate::session::PREVIEW_ROWS;

// ---------------------------------------------------------------------------
// File and sheet selection
// ---------------------------------------------------------------------------

pub fn file_section(ui: &mut Ui, app: &mut FormulaApp) {
    ui.heading("1. Excelファイル");

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("📂 ファイルを選択").clicked() {
            open_file_dialog(app);
        }
        match app.session.file_path() {
            Some(path) => ui.label(path.display().to_string()),
            None => ui.weak("未選択"),
        };
    });

    if app.sheet_names.len() > 1 {
        let current = app
            .selected_sheet
            .clone()
            .or_else(|| app.sheet_names.first().cloned())
            .unwrap_or_default();
        let mut chosen = None;
        ui.horizontal(|ui: &mut Ui| {
            ui.label("シート:");
            egui::ComboBox::from_id_salt("sheet")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &app.sheet_names {
                        if ui.selectable_label(current == *name, name).clicked() {
                            chosen = Some(name.clone());
                        }
                    }
                });
        });
        if let Some(name) = chosen.filter(|name| app.selected_sheet.as_ref() != Some(name)) {
            select_sheet(app, name);
        }
    }
}

fn open_file_dialog(app: &mut FormulaApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Excelファイルを選択")
        .add_filter("Excel", &["xlsx"])
        .pick_file()
    else {
        return;
    };

    match app.session.load_file(&path) {
        Ok(()) => {
            let sheets = ExcelImporter::new(&path).sheet_names().unwrap_or_default();
            tracing::info!(path = %path.display(), sheets = sheets.len(), "workbook selected");
            // Preview reads the first sheet and save targets the active one
            // until a sheet is picked
            app.selected_sheet = None;
            app.session.set_sheet(None);
            app.sheet_names = sheets;
            app.formula_display.clear();
        }
        Err(e) => {
            tracing::error!("failed to load file: {e}");
            show_error(app, &e);
        }
    }
}

fn select_sheet(app: &mut FormulaApp, name: String) {
    app.session.set_sheet(Some(name.clone()));
    app.selected_sheet = Some(name);
    if app.session.table().is_some() {
        let header = app.header_input.clone();
        if let Err(e) = app.session.preview(&header) {
            show_error(app, &e);
        }
    }
}

// ---------------------------------------------------------------------------
// Header row and preview
// ---------------------------------------------------------------------------

pub fn preview_section(ui: &mut Ui, app: &mut FormulaApp) {
    ui.heading("2. ヘッダー行とプレビュー");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("ヘッダー行（0始まり）:");
        ui.add(egui::TextEdit::singleline(&mut app.header_input).desired_width(60.0));
        if ui.button("プレビュー").clicked() {
            let header = app.header_input.clone();
            if let Err(e) = app.session.preview(&header) {
                show_error(app, &e);
            }
        }
    });

    let Some(table) = app.session.table() else {
        ui.weak("プレビューはまだありません。");
        return;
    };

    ui.label(format!(
        "{} 列 / {} 行",
        table.columns.len(),
        table.row_count()
    ));
    egui::ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("preview_grid")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for title in &table.columns {
                        ui.strong(title);
                    }
                    ui.end_row();
                    for row in table.head(PREVIEW_ROWS) {
                        for value in row {
                            ui.label(value.to_string());
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Instruction, target cells and save
// ---------------------------------------------------------------------------

pub fn formula_section(ui: &mut Ui, app: &mut FormulaApp) {
    ui.heading("3. 日本語でやりたいこと");

    ui.add(
        egui::TextEdit::multiline(&mut app.instruction)
            .hint_text("例: 売上が100以上かつ来店回数が5以上の人")
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui: &mut Ui| {
        ui.label("開始セル:");
        ui.add(
            egui::TextEdit::singleline(&mut app.cell_input)
                .hint_text("C2")
                .desired_width(60.0),
        );
        ui.label("書き込み行数:");
        ui.add(
            egui::TextEdit::singleline(&mut app.row_count_input)
                .hint_text("全行")
                .desired_width(60.0),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("🧮 関数を生成").clicked() {
            convert(app);
        }
        let can_save = app.session.pending().is_some();
        if ui
            .add_enabled(can_save, egui::Button::new("💾 保存"))
            .clicked()
        {
            save(app);
        }
    });

    ui.label("生成された関数:");
    let mut text = app.formula_display.as_str();
    ui.add(
        egui::TextEdit::multiline(&mut text)
            .font(egui::TextStyle::Monospace)
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );
}

fn convert(app: &mut FormulaApp) {
    let result = app
        .session
        .convert(&app.instruction, &app.cell_input, &app.row_count_input)
        .map(|pending| pending.formula.to_string());
    match result {
        Ok(formula) => app.formula_display = formula,
        Err(NlFormulaError::Translate(e)) => {
            app.formula_display = e.to_string();
            app.show_message(MessageKind::Warning, "変換できませんでした", e.to_string());
        }
        Err(e) => {
            app.formula_display.clear();
            show_error(app, &e);
        }
    }
}

fn save(app: &mut FormulaApp) {
    match app.session.save(None) {
        Ok(path) => app.show_message(
            MessageKind::Info,
            "保存しました",
            format!("保存先: {}", path.display()),
        ),
        Err(e) => {
            tracing::error!("save failed: {e}");
            show_error(app, &e);
        }
    }
}

fn show_error(app: &mut FormulaApp, error: &NlFormulaError) {
    let kind = match error {
        NlFormulaError::Preview(_)
        | NlFormulaError::Validation(_)
        | NlFormulaError::Translate(_) => MessageKind::Warning,
        _ => MessageKind::Error,
    };
    let title = match kind {
        MessageKind::Warning => "入力を確認してください",
        _ => "エラー",
    };
    app.show_message(kind, title, error.to_string());
}

// ---------------------------------------------------------------------------
// Modal message
// ---------------------------------------------------------------------------

pub fn message_window(ctx: &egui::Context, app: &mut FormulaApp) {
    let Some(message) = app.message.clone() else {
        return;
    };

    let color = match message.kind {
        MessageKind::Info => Color32::from_rgb(60, 160, 90),
        MessageKind::Warning => Color32::from_rgb(220, 160, 40),
        MessageKind::Error => Color32::from_rgb(210, 70, 70),
    };

    let mut dismissed = false;
    egui::Window::new(RichText::new(&message.title).color(color).strong())
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui: &mut Ui| {
            ui.label(&message.body);
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed {
        app.message = None;
    }
}
