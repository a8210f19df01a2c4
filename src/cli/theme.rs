//! tasker theme command implementation

use serde::Serialize;

use crate::cli::{Context, ThemeAction};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(Serialize)]
struct ThemeReport {
    dark_mode: bool,
    changed: bool,
}

pub async fn run(ctx: &Context, action: ThemeAction) -> Result<()> {
    let mut store = ctx.open_store().await;
    let before = store.dark_mode();
    match action {
        ThemeAction::Show => {}
        ThemeAction::Dark => store.set_dark_mode(true),
        ThemeAction::Light => store.set_dark_mode(false),
        ThemeAction::Toggle => {
            store.toggle_dark_mode();
        }
    }
    let dark_mode = store.dark_mode();
    store.shutdown().await;

    let name = if dark_mode { "dark" } else { "light" };
    let human = HumanOutput::new(format!("tasker theme: {name}"));
    let report = ThemeReport {
        dark_mode,
        changed: dark_mode != before,
    };
    emit_success(ctx.output, "theme", &report, Some(&human))
}
