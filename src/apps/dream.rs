//! Dream: two static pages linked by click actions.

use sdui_types::{flow, templates, ClickAction, Command, Step};
use serde_json::json;

use crate::dispatch::{ActionContext, ActionHandler, ActionKind, App, HandlerTable};
use crate::error::ActionError;

pub const APP_NAME: &str = "dream";

const OPEN_PANEL: &str = "open-panel";
const TITLE_HTML: &str = "d r e a m<br>d r e a m";

pub struct DreamApp;

impl App for DreamApp {
    fn name(&self) -> &'static str {
        APP_NAME
    }

    fn handlers(&self) -> HandlerTable {
        HandlerTable::from_kinds::<DreamAction>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DreamAction {
    OpenApp,
    /// `open-panel {panel}`; anything but `page2` opens page 1.
    OpenPanel,
}

impl ActionKind for DreamAction {
    const ALL: &'static [Self] = &[DreamAction::OpenApp, DreamAction::OpenPanel];

    fn name(self) -> &'static str {
        match self {
            DreamAction::OpenApp => "open-app",
            DreamAction::OpenPanel => OPEN_PANEL,
        }
    }
}

impl ActionHandler for DreamAction {
    fn handle(&self, ctx: &mut ActionContext<'_>) -> Result<Vec<Command>, ActionError> {
        let steps = match self {
            DreamAction::OpenApp => page_one(),
            DreamAction::OpenPanel => match ctx.input.get_text("panel").as_deref() {
                Some("page2") => page_two(),
                _ => page_one(),
            },
        };
        Ok(vec![Command::show_panel(steps)])
    }
}

fn open_page(page: &str) -> ClickAction {
    ClickAction::new(OPEN_PANEL).with("panel", page)
}

fn text(arg: &str, zone: &str) -> Step {
    Step::new(templates::TEXT, json!({ "arg": arg }), zone)
}

pub fn page_one() -> Vec<Step> {
    vec![
        Step::new(
            templates::CONTENT_HTML,
            json!({ "content": TITLE_HTML }),
            flow::INSIDE_TOP_CENTER,
        ),
        text("Page 1: The title is the thing.", flow::INSIDE_TOP_CENTER),
        text("This is easy.", flow::INSIDE_TOP_RIGHT).with_click_action(open_page("page2")),
        text(
            "Now is the time for all good men to come to the aid of their party!",
            flow::INSIDE_FOCUS,
        ),
        Step::new(
            templates::NAV_BUTTON,
            json!({ "value": "Go to Page 2" }),
            flow::INSIDE_BOTTOM_CENTER,
        )
        .with_click_action(open_page("page2")),
        Step::new(
            templates::TEXT_INPUT,
            json!({
                "value": "Default Value",
                "placeholder": "Type Something...",
                "name": "test-input",
            }),
            flow::INSIDE_BOTTOM_RIGHT,
        )
        .with_click_action(open_page("page2")),
        // Sends an action no app handles; the reply is a warn.
        Step::new(
            templates::NAV_BUTTON,
            json!({ "value": "Test!" }),
            flow::INSIDE_BOTTOM_RIGHT,
        )
        .with_click_action(ClickAction::new("test-action").with("input", "$[name=\"test-input\"]")),
    ]
}

pub fn page_two() -> Vec<Step> {
    vec![
        Step::new(
            templates::CONTENT_HTML,
            json!({ "content": TITLE_HTML }),
            flow::INSIDE_TOP_CENTER,
        ),
        text("Page 2: Welcome to the second page!", flow::INSIDE_TOP_CENTER),
        text("This page shows different content.", flow::INSIDE_TOP_RIGHT),
        text(
            "Navigation between pages is working through the action-command protocol.",
            flow::INSIDE_FOCUS,
        ),
        Step::new(
            templates::NAV_BUTTON,
            json!({ "value": "Go to Page 1" }),
            flow::INSIDE_BOTTOM_CENTER,
        )
        .with_click_action(open_page("page1").with_selector("button")),
    ]
}
