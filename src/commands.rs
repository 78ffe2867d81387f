use crate::events::EditorEvent;
use crate::host::{HostEditor, ScriptTarget};
use anyhow::Result;
use std::any::Any;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command is not active")]
    NotActive,
    #[error("target element was released")]
    TargetReleased,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

/// Per-run options. `target` overrides the editor selection.
#[derive(Clone, Default)]
pub struct RunOptions {
    pub target: Option<Rc<dyn ScriptTarget>>,
    pub title: Option<String>,
}

impl RunOptions {
    pub fn with_target(target: Rc<dyn ScriptTarget>) -> Self {
        Self { target: Some(target), title: None }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

pub trait EditorCommand: Any {
    fn id(&self) -> &str;

    /// Returns `false` when the command declined to start.
    fn run(&mut self, host: &mut dyn HostEditor, options: RunOptions) -> Result<bool>;

    fn stop(&mut self, _host: &mut dyn HostEditor) -> Result<()> {
        Ok(())
    }

    fn on_events(&mut self, _host: &mut dyn HostEditor, _events: &[EditorEvent]) -> Result<()> {
        Ok(())
    }

    fn is_active(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn EditorCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a command registered under the same id.
    pub fn add(&mut self, command: Box<dyn EditorCommand>) {
        if let Some(slot) = self.commands.iter_mut().find(|slot| slot.id() == command.id()) {
            log::warn!("[commands] replacing command '{}'", command.id());
            *slot = command;
        } else {
            self.commands.push(command);
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.commands.iter().any(|command| command.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.commands.iter().map(|command| command.id()).collect()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.commands.iter().any(|command| command.id() == id && command.is_active())
    }

    pub fn run_command(&mut self, id: &str, host: &mut dyn HostEditor, options: RunOptions) -> Result<bool> {
        let command = self.find_mut(id)?;
        command.run(host, options)
    }

    pub fn stop_command(&mut self, id: &str, host: &mut dyn HostEditor) -> Result<()> {
        let command = self.find_mut(id)?;
        command.stop(host)
    }

    pub fn dispatch_events(&mut self, host: &mut dyn HostEditor, events: &[EditorEvent]) {
        if events.is_empty() {
            return;
        }
        for command in &mut self.commands {
            if let Err(err) = command.on_events(host, events) {
                log::error!("[command:{}] event hook failed: {err:?}", command.id());
            }
        }
    }

    /// Drains the host's pending events into every command, until none are left.
    pub fn pump(&mut self, host: &mut dyn HostEditor) {
        loop {
            let events = host.drain_events();
            if events.is_empty() {
                break;
            }
            self.dispatch_events(host, &events);
        }
    }

    pub fn get<T: EditorCommand + 'static>(&self) -> Option<&T> {
        self.commands.iter().find_map(|command| command.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: EditorCommand + 'static>(&mut self) -> Option<&mut T> {
        self.commands.iter_mut().find_map(|command| command.as_any_mut().downcast_mut::<T>())
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Box<dyn EditorCommand>> {
        self.commands
            .iter_mut()
            .find(|command| command.id() == id)
            .ok_or_else(|| CommandError::UnknownCommand(id.to_string()).into())
    }
}
