use crate::command::SCRIPT_COMMAND_ID;
use crate::config::{PluginOptions, ScriptTypesSupport};
use crate::host::{ComponentRegistry, InitToolbar, ToolbarItem};
use serde_json::Value;
use std::rc::Rc;

/// Eligible type ids in input order, without duplicates. The wildcard expands to `registered`.
pub fn resolve_script_types(support: &ScriptTypesSupport, registered: &[String]) -> Vec<String> {
    let requested = if support.is_wildcard() { registered.to_vec() } else { support.entries() };
    let mut resolved: Vec<String> = Vec::with_capacity(requested.len());
    for type_id in requested {
        if !resolved.contains(&type_id) {
            resolved.push(type_id);
        }
    }
    resolved
}

/// `None` when the options disable the toolbar button.
pub fn script_toolbar_item(options: &PluginOptions) -> Option<ToolbarItem> {
    let extra = options.toolbar_btn_custom_script.as_ref()?;
    let mut item = ToolbarItem::new(SCRIPT_COMMAND_ID, options.toolbar_icon.clone());
    for (key, value) in extra {
        match (key.as_str(), value) {
            ("label", Value::String(label)) => item.label = label.clone(),
            ("command", _) => log::warn!("[toolbar] ignoring 'command' override on the script button"),
            _ => {
                item.attributes.insert(key.clone(), value.clone());
            }
        }
    }
    Some(item)
}

/// Wraps `original` so the resulting toolbar always carries `item` exactly once, in front.
pub fn with_script_toolbar(original: InitToolbar, item: ToolbarItem) -> InitToolbar {
    Rc::new(move |toolbar: &mut Vec<ToolbarItem>| {
        original(toolbar);
        if !toolbar.iter().any(|existing| existing.command == item.command) {
            toolbar.insert(0, item.clone());
        }
    })
}

/// Returns the type ids whose toolbar now carries the script button.
pub fn install_toolbar_buttons(registry: &mut dyn ComponentRegistry, options: &PluginOptions) -> Vec<String> {
    let Some(item) = script_toolbar_item(options) else {
        log::debug!("[toolbar] script button disabled by options");
        return Vec::new();
    };
    let registered = registry.type_ids();
    let mut augmented = Vec::new();
    for type_id in resolve_script_types(&options.script_types_support, &registered) {
        let Some(original) = registry.init_toolbar(&type_id) else {
            log::warn!("[toolbar] unknown component type '{type_id}', skipping");
            continue;
        };
        if registry.redefine_init_toolbar(&type_id, with_script_toolbar(original, item.clone())) {
            augmented.push(type_id);
        }
    }
    log::debug!("[toolbar] script button installed on {} type(s)", augmented.len());
    augmented
}
