use crate::host::ModalId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The modal body is attached to the visible surface and can lay out embedded views.
    ModalMounted { modal: ModalId },
    ModalClosed { modal: ModalId },
    ScriptSaved { target: String },
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorEvent::ModalMounted { modal } => write!(f, "ModalMounted modal={}", modal.0),
            EditorEvent::ModalClosed { modal } => write!(f, "ModalClosed modal={}", modal.0),
            EditorEvent::ScriptSaved { target } => write!(f, "ScriptSaved target={target}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct EditorEventBus {
    events: Vec<EditorEvent>,
}

impl EditorEventBus {
    pub fn push(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
