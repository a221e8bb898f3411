//! Default app: navigate the panel graph.

use sdui_types::Command;
use tracing::debug;

use crate::dispatch::{ActionContext, ActionHandler, ActionKind, Services};
use crate::error::ActionError;
use crate::graph::Panel;
use crate::session::ActivePanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// Bootstrap: status, then the active panel (root when unset).
    ShowApp,
    /// `select-panel {panel-id | id}`
    SelectPanel,
}

impl ActionKind for PanelAction {
    const ALL: &'static [Self] = &[PanelAction::ShowApp, PanelAction::SelectPanel];

    fn name(self) -> &'static str {
        match self {
            PanelAction::ShowApp => "show-app",
            PanelAction::SelectPanel => "select-panel",
        }
    }
}

impl ActionHandler for PanelAction {
    fn handle(&self, ctx: &mut ActionContext<'_>) -> Result<Vec<Command>, ActionError> {
        match self {
            PanelAction::ShowApp => Ok(show_app(ctx)),
            PanelAction::SelectPanel => Ok(select_panel(ctx)),
        }
    }
}

fn show_app(ctx: &mut ActionContext<'_>) -> Vec<Command> {
    let mut commands = vec![Command::show_status(ctx.instance())];

    let services = ctx.services;
    let panel = match ctx.app_state().active_panel() {
        ActivePanel::NotFound => {
            commands.push(Command::ClearPanel);
            return commands;
        }
        ActivePanel::Panel(id) => services.graph.get_panel_or_root(id),
        ActivePanel::Unset => services.graph.get_root(),
    };

    commands.push(render(services, panel));
    commands
}

fn select_panel(ctx: &mut ActionContext<'_>) -> Vec<Command> {
    let requested = ctx
        .input
        .get_text("panel-id")
        .or_else(|| ctx.input.get_text("id"));

    let services = ctx.services;
    let graph = &services.graph;
    let panel = match requested.as_deref() {
        None => graph.get_root(),
        Some(id) => match graph.get_panel(id) {
            Some(panel) => panel,
            None => {
                debug!("select-panel: '{}' not found for {}", id, ctx.instance());
                ctx.app_state().set_active_panel(ActivePanel::NotFound);
                return vec![
                    Command::warn(format!("Panel {} not found.", id)),
                    Command::ClearPanel,
                ];
            }
        },
    };

    ctx.app_state()
        .set_active_panel(ActivePanel::Panel(panel.id.clone()));
    vec![render(services, panel)]
}

/// `show-panel` for `panel`, or a `warn` when its kind has no builder.
fn render(services: &Services, panel: &Panel) -> Command {
    services
        .builders
        .render(panel, &services.graph)
        .unwrap_or_else(ActionError::into_command)
}
