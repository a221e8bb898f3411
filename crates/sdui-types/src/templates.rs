//! Template ids shared by the step builders and the client registry.

pub const PANEL_LAYOUT: &str = "panel-layout";

pub const LINK: &str = "link";
pub const FILE_LINK: &str = "file-link";
pub const TITLE: &str = "title-1";
pub const CONTENT_HTML: &str = "content-html";
pub const CENTERED_TEXT: &str = "centered-text-1";
pub const DIRECTORY_FOCUS_LEFT: &str = "directory-focus-left";
pub const DIRECTORY_FOCUS_RIGHT: &str = "directory-focus-right";
pub const TEXT: &str = "text";
pub const NAV_BUTTON: &str = "nav-button";
pub const TEXT_INPUT: &str = "text-input";
