//! nlformula desktop window
//!
//! Build with `cargo run --features gui --bin nlformula-gui`.

use anyhow::Context;
use eframe::egui;
use royalbit_nlformula::gui::{install_cjk_fonts, FormulaApp};
use royalbit_nlformula::logging;
use royalbit_nlformula::session::Session;
use royalbit_nlformula::translator::TranslatorConfig;

fn main() -> anyhow::Result<()> {
    logging::init(false);

    let config = TranslatorConfig::resolve(None).context("failed to load translator config")?;
    let session = Session::new(config).context("failed to build translator")?;
    let app = FormulaApp::new(session);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "日本語 → Excel関数",
        options,
        Box::new(|cc| {
            install_cjk_fonts(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to start window: {e}"))
}
