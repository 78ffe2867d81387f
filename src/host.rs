//! Contracts the script attach plugin consumes from the hosting editor.

use crate::events::EditorEvent;
use crate::modal::ModalContent;
use serde_json::{Map, Value};
use std::rc::Rc;

pub const SCRIPT_ATTRIBUTE: &str = "script";

/// An editor element a script can be attached to. Owned by the host.
pub trait ScriptTarget {
    fn id(&self) -> String;

    fn script_string(&self) -> Option<String>;

    fn set_attribute(&self, name: &str, value: String);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarItem {
    pub command: String,
    pub label: String,
    pub attributes: Map<String, Value>,
}

impl ToolbarItem {
    pub fn new(command: impl Into<String>, label: impl Into<String>) -> Self {
        Self { command: command.into(), label: label.into(), attributes: Map::new() }
    }
}

/// Builds a component type's toolbar in place.
pub type InitToolbar = Rc<dyn Fn(&mut Vec<ToolbarItem>)>;

pub trait ComponentRegistry {
    fn type_ids(&self) -> Vec<String>;

    fn init_toolbar(&self, type_id: &str) -> Option<InitToolbar>;

    /// Returns `false` when `type_id` is not registered.
    fn redefine_init_toolbar(&mut self, type_id: &str, init: InitToolbar) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(pub u64);

#[derive(Debug, Clone)]
pub struct ModalRequest {
    pub title: String,
    pub content: ModalContent,
}

/// A single modal surface. Opening and closing are reported back through
/// [`EditorEvent::ModalMounted`] and [`EditorEvent::ModalClosed`].
pub trait ModalService {
    fn open(&mut self, request: ModalRequest) -> ModalId;

    /// Returns `true` if a modal was open.
    fn close(&mut self) -> bool;

    fn current(&self) -> Option<ModalId>;

    fn is_open(&self) -> bool {
        self.current().is_some()
    }
}

pub trait HostEditor {
    fn selected(&self) -> Option<Rc<dyn ScriptTarget>>;

    fn style_prefix(&self) -> &str;

    fn modal(&mut self) -> &mut dyn ModalService;

    fn components(&mut self) -> &mut dyn ComponentRegistry;

    /// Direct user-facing message.
    fn notify(&mut self, message: &str);

    /// Returns `true` when the sheet was not installed yet.
    fn install_style(&mut self, id: &str, css: &str) -> bool;

    fn emit_event(&mut self, event: EditorEvent);

    fn drain_events(&mut self) -> Vec<EditorEvent>;
}
