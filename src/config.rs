use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const SCRIPT_TYPES_WILDCARD: &str = "*";

const DEFAULT_SCRIPT_TYPES: &[&str] = &["default", "wrapper", "text", "textnode", "image", "video", "svg"];

/// Component types that get the script toolbar button.
///
/// Accepts either a list (`["text", "image"]`) or a comma separated string (`"text,image"`).
/// A `*` entry in either form selects every registered type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScriptTypesSupport {
    List(Vec<String>),
    Csv(String),
}

impl ScriptTypesSupport {
    pub fn all() -> Self {
        Self::Csv(SCRIPT_TYPES_WILDCARD.to_string())
    }

    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Csv(csv) => csv.split(',').collect(),
        };
        raw.into_iter().map(str::trim).filter(|entry| !entry.is_empty()).map(str::to_string).collect()
    }

    pub fn is_wildcard(&self) -> bool {
        self.entries().iter().any(|entry| entry == SCRIPT_TYPES_WILDCARD)
    }
}

impl Default for ScriptTypesSupport {
    fn default() -> Self {
        Self::List(DEFAULT_SCRIPT_TYPES.iter().map(|ty| (*ty).to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeViewOptions {
    #[serde(default = "CodeViewOptions::default_line_numbers")]
    pub line_numbers: bool,
    #[serde(default = "CodeViewOptions::default_tab_size")]
    pub tab_size: u8,
    #[serde(default = "CodeViewOptions::default_theme")]
    pub theme: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl CodeViewOptions {
    const fn default_line_numbers() -> bool {
        true
    }

    const fn default_tab_size() -> u8 {
        2
    }

    fn default_theme() -> String {
        "vscode-dark".to_string()
    }
}

impl Default for CodeViewOptions {
    fn default() -> Self {
        Self {
            line_numbers: Self::default_line_numbers(),
            tab_size: Self::default_tab_size(),
            theme: Self::default_theme(),
            extensions: Vec::new(),
        }
    }
}

/// Static overrides merged into the script command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAttachScript {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pre_content: Option<String>,
    #[serde(default)]
    pub post_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    #[serde(default = "PluginOptions::default_starter")]
    pub starter: String,
    #[serde(default = "PluginOptions::default_toolbar_icon")]
    pub toolbar_icon: String,
    #[serde(default)]
    pub script_types_support: ScriptTypesSupport,
    /// Extra fields for the toolbar button. `null` disables the button entirely.
    #[serde(default = "PluginOptions::default_toolbar_button")]
    pub toolbar_btn_custom_script: Option<Map<String, Value>>,
    #[serde(default = "PluginOptions::default_modal_title")]
    pub modal_title: String,
    #[serde(default = "PluginOptions::default_code_label")]
    pub code_label: String,
    #[serde(default, rename = "codeMirrorOptions")]
    pub code_view: CodeViewOptions,
    #[serde(default = "PluginOptions::default_button_label")]
    pub button_label: String,
    #[serde(default)]
    pub command_attach_script: CommandAttachScript,
}

impl PluginOptions {
    fn default_starter() -> String {
        "let el = this;".to_string()
    }

    fn default_toolbar_icon() -> String {
        r#"<i class="fa fa-file-code-o"></i>"#.to_string()
    }

    fn default_toolbar_button() -> Option<Map<String, Value>> {
        Some(Map::new())
    }

    fn default_modal_title() -> String {
        "Script".to_string()
    }

    fn default_code_label() -> String {
        "Rhai".to_string()
    }

    fn default_button_label() -> String {
        "Save".to_string()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse script attach options")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read options file {}", path.display()))?;
        let options = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse options file {}", path.display()))?;
        Ok(options)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(options) => options,
            Err(err) => {
                log::warn!("[script-attach] options load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            starter: Self::default_starter(),
            toolbar_icon: Self::default_toolbar_icon(),
            script_types_support: ScriptTypesSupport::default(),
            toolbar_btn_custom_script: Self::default_toolbar_button(),
            modal_title: Self::default_modal_title(),
            code_label: Self::default_code_label(),
            code_view: CodeViewOptions::default(),
            button_label: Self::default_button_label(),
            command_attach_script: CommandAttachScript::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let options = PluginOptions::from_json_str("{}").expect("parse options");
        assert_eq!(options, PluginOptions::default());
        assert_eq!(options.script_types_support.entries().len(), 7);
        assert!(options.toolbar_btn_custom_script.is_some());
    }

    #[test]
    fn script_types_accept_csv_and_lists() {
        let csv = PluginOptions::from_json_str(r#"{ "scriptTypesSupport": "text, image,,video" }"#)
            .expect("parse csv");
        assert_eq!(csv.script_types_support.entries(), vec!["text", "image", "video"]);

        let list =
            PluginOptions::from_json_str(r#"{ "scriptTypesSupport": ["a", "b"] }"#).expect("parse list");
        assert_eq!(list.script_types_support, ScriptTypesSupport::List(vec!["a".into(), "b".into()]));
        assert!(!list.script_types_support.is_wildcard());
    }

    #[test]
    fn wildcard_in_either_form() {
        assert!(ScriptTypesSupport::all().is_wildcard());
        assert!(ScriptTypesSupport::List(vec!["text".into(), "*".into()]).is_wildcard());
    }

    #[test]
    fn null_toolbar_button_disables_it() {
        let options = PluginOptions::from_json_str(r#"{ "toolbarBtnCustomScript": null }"#).expect("parse");
        assert!(options.toolbar_btn_custom_script.is_none());
    }

    #[test]
    fn code_mirror_options_map_to_code_view() {
        let options = PluginOptions::from_json_str(
            r#"{ "codeMirrorOptions": { "tabSize": 4, "extensions": ["rainbow-brackets"] } }"#,
        )
        .expect("parse");
        assert_eq!(options.code_view.tab_size, 4);
        assert!(options.code_view.line_numbers);
        assert_eq!(options.code_view.extensions, vec!["rainbow-brackets".to_string()]);
    }
}
