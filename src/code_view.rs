//! Code view adapter: the narrow surface the script command uses to drive an embeddable editor.

use crate::config::CodeViewOptions;
use std::sync::atomic::{AtomicU64, Ordering};

pub const CODE_VIEW_CONTAINER_CLASS: &str = "cm-editor-container";
pub const SCRIPT_LANGUAGE: &str = "rhai";

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Root container an embedded editor renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContainer {
    pub id: u64,
    pub class_name: String,
}

impl ViewContainer {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self { id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed), class_name: class_name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    BasicSetup { line_numbers: bool, tab_size: u8 },
    Language(String),
    Theme(String),
    Custom(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    doc: String,
    extensions: Vec<Extension>,
}

impl EditorState {
    pub fn create(doc: impl Into<String>, extensions: Vec<Extension>) -> Self {
        Self { doc: doc.into(), extensions }
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }
}

/// A concrete editor widget bound to a container.
pub trait EmbeddedEditor {
    fn mount(&mut self, container: &ViewContainer);

    fn is_mounted(&self) -> bool;

    fn set_state(&mut self, state: EditorState);

    fn state(&self) -> &EditorState;

    fn focus(&mut self) -> bool;

    fn destroy(&mut self);

    #[cfg(feature = "editor")]
    fn show(&mut self, _ui: &mut egui::Ui) {}
}

pub trait CodeView {
    fn element(&self) -> &ViewContainer;

    /// Called once the container sits on a visible surface.
    fn attach(&mut self);

    /// Replaces the whole document and rebuilds the editor configuration.
    fn set_content(&mut self, text: &str);

    fn content(&self) -> String;

    /// No-op returning `false` while the view is not attached.
    fn focus(&mut self) -> bool;

    /// Releases the editor. Further calls are ignored.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;

    #[cfg(feature = "editor")]
    fn show(&mut self, ui: &mut egui::Ui);
}

pub trait CodeViewFactory {
    fn create(&self, options: &CodeViewOptions) -> Box<dyn CodeView>;
}

pub struct CodeViewer<E: EmbeddedEditor> {
    container: ViewContainer,
    editor: E,
    options: CodeViewOptions,
    attached: bool,
    disposed: bool,
}

impl<E: EmbeddedEditor> CodeViewer<E> {
    pub fn new(editor: E, options: CodeViewOptions) -> Self {
        Self {
            container: ViewContainer::new(CODE_VIEW_CONTAINER_CLASS),
            editor,
            options,
            attached: false,
            disposed: false,
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    fn extensions(&self) -> Vec<Extension> {
        let mut extensions = vec![
            Extension::BasicSetup { line_numbers: self.options.line_numbers, tab_size: self.options.tab_size },
            Extension::Language(SCRIPT_LANGUAGE.to_string()),
            Extension::Theme(self.options.theme.clone()),
        ];
        extensions.extend(self.options.extensions.iter().cloned().map(Extension::Custom));
        extensions
    }
}

impl<E: EmbeddedEditor> CodeView for CodeViewer<E> {
    fn element(&self) -> &ViewContainer {
        &self.container
    }

    fn attach(&mut self) {
        if self.disposed || self.attached {
            return;
        }
        self.editor.mount(&self.container);
        self.attached = true;
    }

    fn set_content(&mut self, text: &str) {
        if self.disposed {
            log::warn!("[code-view] set_content on a disposed view ignored");
            return;
        }
        let state = EditorState::create(text, self.extensions());
        self.editor.set_state(state);
    }

    fn content(&self) -> String {
        self.editor.state().doc().to_string()
    }

    fn focus(&mut self) -> bool {
        if self.disposed || !self.attached || !self.editor.is_mounted() {
            return false;
        }
        self.editor.focus()
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.editor.destroy();
        self.attached = false;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[cfg(feature = "editor")]
    fn show(&mut self, ui: &mut egui::Ui) {
        if self.disposed {
            return;
        }
        self.editor.show(ui);
    }
}

/// Plain text buffer editor; draws as an egui code area when the `editor` feature is on.
#[derive(Debug, Default)]
pub struct TextBufferEditor {
    state: EditorState,
    container: Option<u64>,
    focus_requested: bool,
    destroyed: bool,
}

impl TextBufferEditor {
    pub fn is_focused(&self) -> bool {
        self.focus_requested
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl EmbeddedEditor for TextBufferEditor {
    fn mount(&mut self, container: &ViewContainer) {
        self.container = Some(container.id);
    }

    fn is_mounted(&self) -> bool {
        self.container.is_some() && !self.destroyed
    }

    fn set_state(&mut self, state: EditorState) {
        self.state = state;
    }

    fn state(&self) -> &EditorState {
        &self.state
    }

    fn focus(&mut self) -> bool {
        self.focus_requested = true;
        true
    }

    fn destroy(&mut self) {
        self.state = EditorState::default();
        self.container = None;
        self.focus_requested = false;
        self.destroyed = true;
    }

    #[cfg(feature = "editor")]
    fn show(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.state.doc)
                .code_editor()
                .desired_rows(20)
                .desired_width(f32::INFINITY),
        );
        if self.focus_requested {
            response.request_focus();
            self.focus_requested = false;
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextBufferViewFactory;

impl CodeViewFactory for TextBufferViewFactory {
    fn create(&self, options: &CodeViewOptions) -> Box<dyn CodeView> {
        Box::new(CodeViewer::new(TextBufferEditor::default(), options.clone()))
    }
}
