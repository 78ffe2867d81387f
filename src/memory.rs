//! In-memory host editor: component types, elements, a single modal and a notification log.

use crate::events::{EditorEvent, EditorEventBus};
use crate::host::{
    ComponentRegistry, HostEditor, InitToolbar, ModalId, ModalRequest, ModalService, ScriptTarget,
    ToolbarItem, SCRIPT_ATTRIBUTE,
};
use crate::modal::ModalContent;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const DEFAULT_STYLE_PREFIX: &str = "ks-";

const BUILTIN_TYPES: &[&str] =
    &["default", "wrapper", "text", "textnode", "image", "video", "svg", "link", "table", "script"];

#[derive(Debug)]
pub struct MemoryComponent {
    id: String,
    type_id: String,
    attributes: RefCell<BTreeMap<String, String>>,
    toolbar: RefCell<Vec<ToolbarItem>>,
}

impl MemoryComponent {
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn toolbar(&self) -> Vec<ToolbarItem> {
        self.toolbar.borrow().clone()
    }
}

impl ScriptTarget for MemoryComponent {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn script_string(&self) -> Option<String> {
        self.attribute(SCRIPT_ATTRIBUTE)
    }

    fn set_attribute(&self, name: &str, value: String) {
        self.attributes.borrow_mut().insert(name.to_string(), value);
    }
}

fn default_init_toolbar() -> InitToolbar {
    Rc::new(|toolbar: &mut Vec<ToolbarItem>| {
        toolbar.clear();
        toolbar.push(ToolbarItem::new("tlb-select-parent", "arrow-up"));
        toolbar.push(ToolbarItem::new("tlb-move", "arrows"));
        toolbar.push(ToolbarItem::new("tlb-clone", "clone"));
        toolbar.push(ToolbarItem::new("tlb-delete", "trash"));
    })
}

#[derive(Default)]
pub struct MemoryComponents {
    types: Vec<(String, InitToolbar)>,
}

impl MemoryComponents {
    pub fn with_builtin_types() -> Self {
        let mut components = Self::default();
        for type_id in BUILTIN_TYPES {
            components.add_type(*type_id);
        }
        components
    }

    pub fn add_type(&mut self, type_id: impl Into<String>) {
        let type_id = type_id.into();
        if !self.types.iter().any(|(existing, _)| *existing == type_id) {
            self.types.push((type_id, default_init_toolbar()));
        }
    }

    /// `None` for unregistered types.
    pub fn create(&self, type_id: &str) -> Option<Rc<MemoryComponent>> {
        self.init_toolbar(type_id)?;
        let component = Rc::new(MemoryComponent {
            id: uuid::Uuid::new_v4().to_string(),
            type_id: type_id.to_string(),
            attributes: RefCell::new(BTreeMap::new()),
            toolbar: RefCell::new(Vec::new()),
        });
        self.rebuild_toolbar(&component);
        Some(component)
    }

    pub fn rebuild_toolbar(&self, component: &MemoryComponent) {
        if let Some(init) = self.init_toolbar(component.type_id()) {
            init(&mut *component.toolbar.borrow_mut());
        }
    }
}

impl ComponentRegistry for MemoryComponents {
    fn type_ids(&self) -> Vec<String> {
        self.types.iter().map(|(type_id, _)| type_id.clone()).collect()
    }

    fn init_toolbar(&self, type_id: &str) -> Option<InitToolbar> {
        self.types.iter().find(|(existing, _)| existing == type_id).map(|(_, init)| Rc::clone(init))
    }

    fn redefine_init_toolbar(&mut self, type_id: &str, init: InitToolbar) -> bool {
        match self.types.iter_mut().find(|(existing, _)| existing == type_id) {
            Some(slot) => {
                slot.1 = init;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenModal {
    pub id: ModalId,
    pub title: String,
    pub content: ModalContent,
}

/// One modal at a time; opening replaces the previous one.
pub struct MemoryModal {
    next_id: u64,
    open: Option<OpenModal>,
    events: Rc<RefCell<EditorEventBus>>,
}

impl MemoryModal {
    fn new(events: Rc<RefCell<EditorEventBus>>) -> Self {
        Self { next_id: 1, open: None, events }
    }

    pub fn open_modal(&self) -> Option<&OpenModal> {
        self.open.as_ref()
    }
}

impl ModalService for MemoryModal {
    fn open(&mut self, request: ModalRequest) -> ModalId {
        let id = ModalId(self.next_id);
        self.next_id += 1;
        if let Some(previous) = self.open.take() {
            self.events.borrow_mut().push(EditorEvent::ModalClosed { modal: previous.id });
        }
        self.open = Some(OpenModal { id, title: request.title, content: request.content });
        self.events.borrow_mut().push(EditorEvent::ModalMounted { modal: id });
        id
    }

    fn close(&mut self) -> bool {
        match self.open.take() {
            Some(previous) => {
                self.events.borrow_mut().push(EditorEvent::ModalClosed { modal: previous.id });
                true
            }
            None => false,
        }
    }

    fn current(&self) -> Option<ModalId> {
        self.open.as_ref().map(|modal| modal.id)
    }
}

pub struct MemoryEditor {
    pub components: MemoryComponents,
    modal: MemoryModal,
    selected: Option<Rc<MemoryComponent>>,
    style_prefix: String,
    notifications: Vec<String>,
    styles: BTreeMap<String, String>,
    events: Rc<RefCell<EditorEventBus>>,
}

impl MemoryEditor {
    pub fn new() -> Self {
        let events = Rc::new(RefCell::new(EditorEventBus::default()));
        Self {
            components: MemoryComponents::with_builtin_types(),
            modal: MemoryModal::new(Rc::clone(&events)),
            selected: None,
            style_prefix: DEFAULT_STYLE_PREFIX.to_string(),
            notifications: Vec::new(),
            styles: BTreeMap::new(),
            events,
        }
    }

    pub fn with_style_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.style_prefix = prefix.into();
        self
    }

    pub fn add_component(&self, type_id: &str) -> Option<Rc<MemoryComponent>> {
        self.components.create(type_id)
    }

    pub fn select(&mut self, component: Option<Rc<MemoryComponent>>) {
        self.selected = component;
    }

    pub fn open_modal(&self) -> Option<&OpenModal> {
        self.modal.open_modal()
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn style(&self, id: &str) -> Option<&str> {
        self.styles.get(id).map(String::as_str)
    }
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEditor for MemoryEditor {
    fn selected(&self) -> Option<Rc<dyn ScriptTarget>> {
        self.selected.clone().map(|component| component as Rc<dyn ScriptTarget>)
    }

    fn style_prefix(&self) -> &str {
        &self.style_prefix
    }

    fn modal(&mut self) -> &mut dyn ModalService {
        &mut self.modal
    }

    fn components(&mut self) -> &mut dyn ComponentRegistry {
        &mut self.components
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn install_style(&mut self, id: &str, css: &str) -> bool {
        if self.styles.contains_key(id) {
            return false;
        }
        self.styles.insert(id.to_string(), css.to_string());
        true
    }

    fn emit_event(&mut self, event: EditorEvent) {
        self.events.borrow_mut().push(event);
    }

    fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.borrow_mut().drain()
    }
}
