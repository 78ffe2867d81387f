//! The "edit script" command.
//!
//! One invocation runs from [`ScriptCommand::run`] to [`ScriptCommand::stop`]:
//!
//! * `Idle -> Opening`: the target is resolved, the modal content is built (creating the code
//!   view) and the modal is opened.
//! * `Opening -> Active`: the modal reports [`EditorEvent::ModalMounted`]; the code view is
//!   filled with the target's script or the starter snippet and focused.
//! * `* -> Idle`: the modal reports [`EditorEvent::ModalClosed`] or `stop` is called directly;
//!   the code view is disposed before anything else is released.
//!
//! Running on a new target while an invocation is open stops it first. A run that resolves no
//! target leaves the open invocation alone.

use crate::code_view::{CodeView, CodeViewFactory, TextBufferViewFactory};
use crate::commands::{CommandError, EditorCommand, RunOptions};
use crate::config::{CommandAttachScript, PluginOptions};
use crate::events::EditorEvent;
use crate::host::{HostEditor, ModalId, ModalRequest, ScriptTarget, SCRIPT_ATTRIBUTE};
use crate::modal::{ContentAction, ContentParts, ModalContent, STYLE_ID, STYLE_SHEET};
use crate::validation::{RunOutcome, ScriptCallbacks, ValidationService};
use std::any::Any;
use std::rc::{Rc, Weak};

pub const SCRIPT_COMMAND_ID: &str = "edit-script";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPhase {
    Idle,
    Opening,
    Active,
}

/// Extension points for the modal body.
pub trait ScriptCommandHooks {
    fn title(&self) -> Option<String> {
        None
    }

    fn pre_content(&self, _target: &dyn ScriptTarget) -> Option<String> {
        None
    }

    fn post_content(&self, _target: &dyn ScriptTarget) -> Option<String> {
        None
    }
}

pub struct AttachScriptHooks {
    config: CommandAttachScript,
}

impl AttachScriptHooks {
    pub fn new(config: CommandAttachScript) -> Self {
        Self { config }
    }
}

impl ScriptCommandHooks for AttachScriptHooks {
    fn title(&self) -> Option<String> {
        self.config.title.clone()
    }

    fn pre_content(&self, _target: &dyn ScriptTarget) -> Option<String> {
        self.config.pre_content.clone()
    }

    fn post_content(&self, _target: &dyn ScriptTarget) -> Option<String> {
        self.config.post_content.clone()
    }
}

struct Invocation {
    target: Weak<dyn ScriptTarget>,
    options: RunOptions,
    title: String,
    code: String,
    modal: Option<ModalId>,
    view: Option<Box<dyn CodeView>>,
    content: Option<ModalContent>,
    phase: CommandPhase,
}

pub struct ScriptCommand {
    options: Rc<PluginOptions>,
    hooks: Box<dyn ScriptCommandHooks>,
    factory: Box<dyn CodeViewFactory>,
    service: ValidationService,
    invocation: Option<Invocation>,
    views_created: usize,
}

impl ScriptCommand {
    pub fn new(options: Rc<PluginOptions>, callbacks: ScriptCallbacks) -> Self {
        let hooks = AttachScriptHooks::new(options.command_attach_script.clone());
        Self {
            options,
            hooks: Box::new(hooks),
            factory: Box::new(TextBufferViewFactory),
            service: ValidationService::new(callbacks),
            invocation: None,
            views_created: 0,
        }
    }

    pub fn with_factory(mut self, factory: impl CodeViewFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn with_hooks(mut self, hooks: impl ScriptCommandHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn phase(&self) -> CommandPhase {
        self.invocation.as_ref().map_or(CommandPhase::Idle, |invocation| invocation.phase)
    }

    pub fn target(&self) -> Option<Rc<dyn ScriptTarget>> {
        self.invocation.as_ref().and_then(|invocation| invocation.target.upgrade())
    }

    pub fn modal(&self) -> Option<ModalId> {
        self.invocation.as_ref().and_then(|invocation| invocation.modal)
    }

    pub fn title(&self) -> Option<&str> {
        self.invocation.as_ref().map(|invocation| invocation.title.as_str())
    }

    pub fn run_options(&self) -> Option<&RunOptions> {
        self.invocation.as_ref().map(|invocation| &invocation.options)
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.invocation.as_ref().and_then(|invocation| invocation.content.as_ref())
    }

    pub fn has_code_view(&self) -> bool {
        self.code_view().is_some()
    }

    pub fn code_view(&self) -> Option<&dyn CodeView> {
        self.invocation.as_ref().and_then(|invocation| invocation.view.as_deref())
    }

    pub fn code_view_mut(&mut self) -> Option<&mut (dyn CodeView + 'static)> {
        self.invocation.as_mut().and_then(|invocation| invocation.view.as_deref_mut())
    }

    /// Number of code views created over the command's lifetime.
    pub fn views_created(&self) -> usize {
        self.views_created
    }

    #[cfg(feature = "editor")]
    pub(crate) fn content_and_view_mut(
        &mut self,
    ) -> Option<(&ModalContent, Option<&mut (dyn CodeView + 'static)>)> {
        let invocation = self.invocation.as_mut()?;
        let content = invocation.content.as_ref()?;
        Some((content, invocation.view.as_deref_mut()))
    }

    /// Returns `false` when no target resolves; nothing is opened or stopped in that case.
    pub fn run(&mut self, host: &mut dyn HostEditor, mut options: RunOptions) -> bool {
        let Some(target) = options.target.take().or_else(|| host.selected()) else {
            log::debug!("[script-attach] no target selected, command inert");
            return false;
        };
        if self.invocation.is_some() {
            log::debug!("[script-attach] restarting: previous invocation still open");
            self.stop(host);
        }
        let title = options
            .title
            .clone()
            .or_else(|| self.hooks.title())
            .unwrap_or_else(|| self.options.modal_title.clone());
        let code = target
            .script_string()
            .filter(|script| !script.is_empty())
            .unwrap_or_else(|| self.options.starter.clone());

        let mut invocation = Invocation {
            target: Rc::downgrade(&target),
            options,
            title: title.clone(),
            code,
            modal: None,
            view: None,
            content: None,
            phase: CommandPhase::Opening,
        };
        let content = self.build_content(host, &mut invocation, &*target);
        host.install_style(STYLE_ID, STYLE_SHEET);
        let modal = host.modal().open(ModalRequest { title, content: content.clone() });
        invocation.content = Some(content);
        invocation.modal = Some(modal);
        log::debug!("[script-attach] opened modal {} for '{}'", modal.0, target.id());
        self.invocation = Some(invocation);
        true
    }

    /// Disposes the code view, releases the target and closes the modal if it is still ours.
    pub fn stop(&mut self, host: &mut dyn HostEditor) {
        let Some(mut invocation) = self.invocation.take() else {
            return;
        };
        if let Some(mut view) = invocation.view.take() {
            view.dispose();
        }
        invocation.content = None;
        if invocation.modal.is_some() && host.modal().current() == invocation.modal {
            host.modal().close();
        }
    }

    pub fn handle_modal_event(&mut self, host: &mut dyn HostEditor, event: &EditorEvent) {
        match event {
            EditorEvent::ModalMounted { modal } => self.populate(*modal),
            EditorEvent::ModalClosed { modal } if self.modal() == Some(*modal) => self.stop(host),
            _ => {}
        }
    }

    fn populate(&mut self, modal: ModalId) {
        let Some(invocation) = self.invocation.as_mut() else {
            return;
        };
        if invocation.modal != Some(modal) || invocation.phase != CommandPhase::Opening {
            return;
        }
        if let Some(view) = invocation.view.as_mut() {
            view.attach();
            view.set_content(&invocation.code);
            view.focus();
        }
        invocation.phase = CommandPhase::Active;
    }

    /// Writes the editor content onto the target, then stops, which closes the modal.
    /// The command is `Idle` afterwards, so a repeated save is rejected.
    pub fn handle_save(&mut self, host: &mut dyn HostEditor) -> Result<(), CommandError> {
        let invocation = self.active_invocation()?;
        let target = invocation.target.upgrade().ok_or(CommandError::TargetReleased)?;
        let code = invocation.view.as_ref().map(|view| view.content()).unwrap_or_default();
        target.set_attribute(SCRIPT_ATTRIBUTE, code);
        let target_id = target.id();
        log::info!("[script-attach] saved script on '{target_id}'");
        host.emit_event(EditorEvent::ScriptSaved { target: target_id });
        self.stop(host);
        Ok(())
    }

    /// Syntax-checks the editor content. Never persists.
    pub fn run_code(&mut self, host: &mut dyn HostEditor) -> Result<RunOutcome, CommandError> {
        let code = {
            let invocation = self.active_invocation()?;
            invocation.view.as_ref().map(|view| view.content()).unwrap_or_default()
        };
        Ok(self.service.run(&code, host))
    }

    pub fn trigger(&mut self, action: ContentAction, host: &mut dyn HostEditor) -> Result<(), CommandError> {
        match action {
            ContentAction::Run => self.run_code(host).map(|_| ()),
            ContentAction::Save => self.handle_save(host),
        }
    }

    fn active_invocation(&self) -> Result<&Invocation, CommandError> {
        self.invocation
            .as_ref()
            .filter(|invocation| invocation.phase == CommandPhase::Active)
            .ok_or(CommandError::NotActive)
    }

    fn build_content(
        &mut self,
        host: &mut dyn HostEditor,
        invocation: &mut Invocation,
        target: &dyn ScriptTarget,
    ) -> ModalContent {
        let view = invocation
            .view
            .get_or_insert_with(|| {
                self.views_created += 1;
                self.factory.create(&self.options.code_view)
            })
            .element()
            .clone();
        ModalContent::build(ContentParts {
            style_prefix: host.style_prefix(),
            code_label: &self.options.code_label,
            button_label: &self.options.button_label,
            pre_content: self.hooks.pre_content(target),
            post_content: self.hooks.post_content(target),
            view: &view,
        })
    }
}

impl EditorCommand for ScriptCommand {
    fn id(&self) -> &str {
        SCRIPT_COMMAND_ID
    }

    fn run(&mut self, host: &mut dyn HostEditor, options: RunOptions) -> anyhow::Result<bool> {
        Ok(ScriptCommand::run(self, host, options))
    }

    fn stop(&mut self, host: &mut dyn HostEditor) -> anyhow::Result<()> {
        ScriptCommand::stop(self, host);
        Ok(())
    }

    fn on_events(&mut self, host: &mut dyn HostEditor, events: &[EditorEvent]) -> anyhow::Result<()> {
        for event in events {
            self.handle_modal_event(host, event);
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.phase() != CommandPhase::Idle
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
