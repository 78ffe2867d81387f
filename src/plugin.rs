use crate::command::ScriptCommand;
use crate::commands::CommandRegistry;
use crate::config::PluginOptions;
use crate::host::HostEditor;
use crate::toolbar::install_toolbar_buttons;
use crate::validation::ScriptCallbacks;
use std::rc::Rc;

pub struct PluginSummary {
    pub command_id: String,
    pub augmented_types: Vec<String>,
}

/// Adds the script button to eligible component toolbars and registers the script command.
pub fn install(
    host: &mut dyn HostEditor,
    commands: &mut CommandRegistry,
    options: PluginOptions,
    callbacks: ScriptCallbacks,
) -> PluginSummary {
    install_with(host, commands, options, |options| ScriptCommand::new(options, callbacks))
}

/// Like [`install`], with a caller-built command (custom hooks or code view factory).
pub fn install_with(
    host: &mut dyn HostEditor,
    commands: &mut CommandRegistry,
    options: PluginOptions,
    build: impl FnOnce(Rc<PluginOptions>) -> ScriptCommand,
) -> PluginSummary {
    let options = Rc::new(options);
    let augmented_types = install_toolbar_buttons(host.components(), &options);
    let command = build(Rc::clone(&options));
    let command_id = crate::command::SCRIPT_COMMAND_ID.to_string();
    commands.add(Box::new(command));
    log::info!(
        "[script-attach] registered '{command_id}' on {} component type(s)",
        augmented_types.len()
    );
    PluginSummary { command_id, augmented_types }
}
