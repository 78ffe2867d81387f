use crate::code_view::ViewContainer;

pub const STYLE_ID: &str = "sw-script-editor-styles";

pub const STYLE_SHEET: &str = r#"
.sw-script-editor {
  display: flex;
  flex-direction: column;
  height: 500px;
}
.cm-editor-container {
  flex: 1;
  min-height: 400px;
  border: 1px solid rgba(0,0,0,0.2);
  border-radius: 3px;
  overflow: hidden;
}
.cm-editor {
  height: 100%;
}
"#;

pub const ACTIONS_ID: &str = "actns";
pub const RUN_BUTTON_ID: &str = "logic-toolbar";
pub const RUN_LABEL: &str = "Run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAction {
    Run,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Container { id: Option<String>, class_name: String, children: Vec<ContentNode> },
    Label(String),
    Markup(String),
    CodeView(ViewContainer),
    Button { id: Option<String>, class_name: String, label: String, action: ContentAction },
}

impl ContentNode {
    fn container(class_name: impl Into<String>, children: Vec<ContentNode>) -> Self {
        ContentNode::Container { id: None, class_name: class_name.into(), children }
    }

    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Container { children, .. } => children,
            _ => &[],
        }
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a ContentNode>) {
        out.push(self);
        for child in self.children() {
            child.visit(out);
        }
    }
}

pub struct ContentParts<'a> {
    pub style_prefix: &'a str,
    pub code_label: &'a str,
    pub button_label: &'a str,
    pub pre_content: Option<String>,
    pub post_content: Option<String>,
    pub view: &'a ViewContainer,
}

/// Body of the script modal, rebuilt for every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    root: ContentNode,
}

impl ModalContent {
    pub fn build(parts: ContentParts<'_>) -> Self {
        let pfx = parts.style_prefix;
        let slot = |name: &str, markup: Option<String>| {
            ContentNode::container(
                format!("{pfx}attach-script__{name}"),
                markup.map(ContentNode::Markup).into_iter().collect(),
            )
        };
        let editor = ContentNode::container(
            format!("{pfx}attach-script__editor"),
            vec![ContentNode::Label(parts.code_label.to_string()), ContentNode::CodeView(parts.view.clone())],
        );
        let actions = ContentNode::Container {
            id: Some(ACTIONS_ID.to_string()),
            class_name: format!("{pfx}attach-script__actions"),
            children: vec![
                ContentNode::Button {
                    id: Some(RUN_BUTTON_ID.to_string()),
                    class_name: "fa fa-bug".to_string(),
                    label: RUN_LABEL.to_string(),
                    action: ContentAction::Run,
                },
                ContentNode::Button {
                    id: None,
                    class_name: format!("{pfx}btn-prim {pfx}btn-save__inject-logic"),
                    label: parts.button_label.to_string(),
                    action: ContentAction::Save,
                },
            ],
        };
        let root = ContentNode::container(
            format!("{pfx}attach-script sw-script-editor"),
            vec![slot("pre", parts.pre_content), editor, slot("post", parts.post_content), actions],
        );
        Self { root }
    }

    pub fn root(&self) -> &ContentNode {
        &self.root
    }

    pub fn nodes(&self) -> Vec<&ContentNode> {
        let mut out = Vec::new();
        self.root.visit(&mut out);
        out
    }

    pub fn code_container(&self) -> Option<&ViewContainer> {
        self.nodes().into_iter().find_map(|node| match node {
            ContentNode::CodeView(container) => Some(container),
            _ => None,
        })
    }

    pub fn button(&self, action: ContentAction) -> Option<&ContentNode> {
        self.nodes()
            .into_iter()
            .find(|node| matches!(node, ContentNode::Button { action: candidate, .. } if *candidate == action))
    }
}
