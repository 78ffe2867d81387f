use crate::code_view::CodeView;
use crate::command::{CommandPhase, ScriptCommand};
use crate::host::HostEditor;
use crate::modal::{ContentAction, ContentNode, ACTIONS_ID};
use egui::Context as EguiCtx;

/// Draws the script modal for the current invocation and performs the clicked action.
pub fn show_script_modal(
    ctx: &EguiCtx,
    host: &mut dyn HostEditor,
    command: &mut ScriptCommand,
) -> Option<ContentAction> {
    if command.phase() == CommandPhase::Idle || host.modal().current() != command.modal() {
        return None;
    }
    let title = command.title().unwrap_or_default().to_string();
    let mut open = true;
    let mut clicked = None;
    if let Some((content, mut view)) = command.content_and_view_mut() {
        egui::Window::new(title).collapsible(false).resizable(true).open(&mut open).show(ctx, |ui| {
            draw_node(ui, content.root(), &mut view, &mut clicked);
        });
    }
    if !open {
        host.modal().close();
        return None;
    }
    if let Some(action) = clicked {
        if let Err(err) = command.trigger(action, host) {
            log::warn!("[script-attach] {action:?} ignored: {err}");
        }
    }
    clicked
}

fn draw_node(
    ui: &mut egui::Ui,
    node: &ContentNode,
    view: &mut Option<&mut (dyn CodeView + 'static)>,
    clicked: &mut Option<ContentAction>,
) {
    match node {
        ContentNode::Container { id, children, .. } => {
            let mut draw_children = |ui: &mut egui::Ui| {
                for child in children {
                    draw_node(ui, child, view, clicked);
                }
            };
            if id.as_deref() == Some(ACTIONS_ID) {
                ui.add_space(16.0);
                ui.horizontal(|ui| draw_children(ui));
            } else {
                ui.vertical(|ui| draw_children(ui));
            }
        }
        ContentNode::Label(text) => {
            ui.strong(text.as_str());
        }
        ContentNode::Markup(markup) => {
            ui.label(markup.as_str());
        }
        ContentNode::CodeView(_) => {
            if let Some(view) = view.as_deref_mut() {
                view.show(ui);
            }
        }
        ContentNode::Button { label, action, .. } => {
            if ui.button(label.as_str()).clicked() {
                *clicked = Some(*action);
            }
        }
    }
}
