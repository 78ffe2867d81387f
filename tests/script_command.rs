use kestrel_script_attach::code_view::{CodeView, CodeViewFactory, TextBufferViewFactory};
use kestrel_script_attach::command::{CommandPhase, ScriptCommand, ScriptCommandHooks};
use kestrel_script_attach::commands::{CommandError, CommandRegistry, RunOptions};
use kestrel_script_attach::config::{CodeViewOptions, PluginOptions};
use kestrel_script_attach::events::EditorEvent;
use kestrel_script_attach::host::{HostEditor, ScriptTarget};
use kestrel_script_attach::memory::MemoryEditor;
use kestrel_script_attach::modal::{ContentAction, ContentNode, STYLE_ID};
use kestrel_script_attach::validation::{RunOutcome, ScriptCallbacks, VALID_SYNTAX_MESSAGE};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn command() -> ScriptCommand {
    ScriptCommand::new(Rc::new(PluginOptions::default()), ScriptCallbacks::new())
}

fn pump(editor: &mut MemoryEditor, command: &mut ScriptCommand) {
    for event in editor.drain_events() {
        command.handle_modal_event(editor, &event);
    }
}

#[derive(Clone, Default)]
struct CountingFactory {
    created: Rc<Cell<usize>>,
}

impl CodeViewFactory for CountingFactory {
    fn create(&self, options: &CodeViewOptions) -> Box<dyn CodeView> {
        self.created.set(self.created.get() + 1);
        TextBufferViewFactory.create(options)
    }
}

#[test]
fn no_target_is_inert() {
    let mut editor = MemoryEditor::new();
    let mut command = command();
    assert!(!command.run(&mut editor, RunOptions::default()));
    assert_eq!(command.phase(), CommandPhase::Idle);
    assert!(editor.open_modal().is_none());
    assert!(editor.drain_events().is_empty());
    assert!(!command.has_code_view());
}

#[test]
fn run_opens_then_mount_populates_starter() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    editor.select(Some(target.clone()));
    let mut command = command();

    assert!(command.run(&mut editor, RunOptions::default()));
    assert_eq!(command.phase(), CommandPhase::Opening);
    assert_eq!(command.target().map(|t| t.id()), Some(target.id()));
    assert_eq!(command.code_view().map(|view| view.content()), Some(String::new()));
    let modal = editor.open_modal().expect("modal open");
    assert_eq!(modal.title, "Script");
    assert_eq!(Some(modal.id), command.modal());
    assert!(editor.style(STYLE_ID).is_some());

    pump(&mut editor, &mut command);
    assert_eq!(command.phase(), CommandPhase::Active);
    assert_eq!(command.code_view().map(|view| view.content()), Some("let el = this;".to_string()));
}

#[test]
fn existing_script_wins_over_starter() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("image").expect("image type");
    target.set_attribute("script", "let saved = 1;".into());
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target).title("Image logic"));
    pump(&mut editor, &mut command);
    assert_eq!(command.code_view().map(|view| view.content()), Some("let saved = 1;".to_string()));
    assert_eq!(editor.open_modal().map(|modal| modal.title.as_str()), Some("Image logic"));
    assert_eq!(command.run_options().and_then(|options| options.title.as_deref()), Some("Image logic"));
}

#[test]
fn save_persists_and_closes_modal() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("default").expect("default type");
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target.clone()));
    pump(&mut editor, &mut command);

    let script = "let el = this; el.doSomething();";
    command.code_view_mut().expect("view").set_content(script);
    command.handle_save(&mut editor).expect("save");

    assert_eq!(target.attribute("script"), Some(script.to_string()));
    assert!(editor.open_modal().is_none());

    let events = editor.drain_events();
    assert!(events.contains(&EditorEvent::ScriptSaved { target: target.id() }));
    for event in &events {
        command.handle_modal_event(&mut editor, event);
    }
    assert_eq!(command.phase(), CommandPhase::Idle);
    assert!(!command.has_code_view());
    assert!(command.target().is_none());
}

#[test]
fn repeated_save_is_rejected_before_close_is_pumped() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target.clone()));
    pump(&mut editor, &mut command);

    command.code_view_mut().expect("view").set_content("let first = 1;");
    command.handle_save(&mut editor).expect("first save");
    assert_eq!(command.phase(), CommandPhase::Idle);
    assert!(!command.has_code_view());

    target.set_attribute("script", "let edited = 2;".into());
    assert_eq!(command.handle_save(&mut editor), Err(CommandError::NotActive));
    assert_eq!(target.attribute("script"), Some("let edited = 2;".to_string()));

    let closes = editor
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, EditorEvent::ModalClosed { .. }))
        .count();
    assert_eq!(closes, 1);
}

#[test]
fn run_code_never_persists() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let runs = Rc::new(Cell::new(0));
    let errors = Rc::new(RefCell::new(Vec::new()));
    let callbacks = {
        let runs = runs.clone();
        let errors = errors.clone();
        ScriptCallbacks::new()
            .on_run(move || runs.set(runs.get() + 1))
            .on_error(move |err| errors.borrow_mut().push(err.to_string()))
    };
    let mut command = ScriptCommand::new(Rc::new(PluginOptions::default()), callbacks);
    command.run(&mut editor, RunOptions::with_target(target.clone()));
    pump(&mut editor, &mut command);

    command.code_view_mut().expect("view").set_content("let x = 1;");
    assert_eq!(command.run_code(&mut editor), Ok(RunOutcome::Valid));
    assert_eq!(runs.get(), 1);
    assert_eq!(editor.notifications().last().map(String::as_str), Some(VALID_SYNTAX_MESSAGE));

    command.code_view_mut().expect("view").set_content("let x = ;");
    let outcome = command.run_code(&mut editor).expect("active");
    assert!(!outcome.is_valid());
    assert_eq!(errors.borrow().len(), 1);
    assert!(editor.notifications().last().is_some_and(|message| message.starts_with("Syntax Error")));

    assert_eq!(command.phase(), CommandPhase::Active);
    assert_eq!(target.attribute("script"), None);
}

#[test]
fn actions_require_active_phase() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let mut command = command();
    assert_eq!(command.handle_save(&mut editor), Err(CommandError::NotActive));
    command.run(&mut editor, RunOptions::with_target(target));
    assert_eq!(command.run_code(&mut editor), Err(CommandError::NotActive));
    assert_eq!(command.trigger(ContentAction::Save, &mut editor), Err(CommandError::NotActive));
}

#[test]
fn dropped_target_cannot_be_saved() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target.clone()));
    pump(&mut editor, &mut command);
    drop(target);
    assert!(command.target().is_none());
    assert_eq!(command.handle_save(&mut editor), Err(CommandError::TargetReleased));
}

#[test]
fn stop_disposes_and_next_run_builds_fresh_view() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let factory = CountingFactory::default();
    let mut command = command().with_factory(factory.clone());

    command.run(&mut editor, RunOptions::with_target(target.clone()));
    pump(&mut editor, &mut command);
    let first = command.code_view().map(|view| view.element().id);
    command.stop(&mut editor);
    assert!(!command.has_code_view());
    assert!(editor.open_modal().is_none());
    command.stop(&mut editor);

    command.run(&mut editor, RunOptions::with_target(target));
    let second = command.code_view().map(|view| view.element().id);
    assert_eq!(factory.created.get(), 2);
    assert_eq!(command.views_created(), 2);
    assert_ne!(first, second);
}

#[test]
fn mount_after_stop_is_ignored() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target));
    command.stop(&mut editor);
    pump(&mut editor, &mut command);
    assert_eq!(command.phase(), CommandPhase::Idle);
    assert!(!command.has_code_view());
}

#[test]
fn second_run_restarts_on_new_target() {
    let mut editor = MemoryEditor::new();
    let first = editor.add_component("text").expect("text type");
    let second = editor.add_component("image").expect("image type");
    second.set_attribute("script", "let other = 2;".into());
    let mut command = command();

    command.run(&mut editor, RunOptions::with_target(first));
    let first_modal = command.modal();
    command.run(&mut editor, RunOptions::with_target(second.clone()));
    assert_ne!(command.modal(), first_modal);
    assert_eq!(command.views_created(), 2);

    pump(&mut editor, &mut command);
    assert_eq!(command.phase(), CommandPhase::Active);
    assert_eq!(command.target().map(|t| t.id()), Some(second.id()));
    assert_eq!(command.code_view().map(|view| view.content()), Some("let other = 2;".to_string()));
}

#[test]
fn run_without_target_leaves_open_invocation_alone() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target.clone()));
    pump(&mut editor, &mut command);
    let modal = command.modal();

    assert!(!command.run(&mut editor, RunOptions::default()));
    assert_eq!(command.phase(), CommandPhase::Active);
    assert_eq!(command.modal(), modal);
    assert_eq!(editor.open_modal().map(|open| open.id), modal);
    assert!(editor.drain_events().is_empty());
    assert_eq!(command.target().map(|t| t.id()), Some(target.id()));
    assert_eq!(command.code_view().map(|view| view.content()), Some("let el = this;".to_string()));
    assert_eq!(command.views_created(), 1);
}

#[test]
fn external_close_stops_command() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    let mut command = command();
    command.run(&mut editor, RunOptions::with_target(target));
    pump(&mut editor, &mut command);
    editor.modal().close();
    pump(&mut editor, &mut command);
    assert_eq!(command.phase(), CommandPhase::Idle);
    assert!(!command.has_code_view());
}

struct BannerHooks;

impl ScriptCommandHooks for BannerHooks {
    fn pre_content(&self, target: &dyn ScriptTarget) -> Option<String> {
        Some(format!("Editing {}", target.id()))
    }
}

#[test]
fn hooks_fill_content_slots() {
    let mut editor = MemoryEditor::new().with_style_prefix("gx-");
    let target = editor.add_component("text").expect("text type");
    let mut command = command().with_hooks(BannerHooks);
    command.run(&mut editor, RunOptions::with_target(target.clone()));
    let content = command.content().expect("content built");
    let pre = &content.root().children()[0];
    assert_eq!(pre.children(), &[ContentNode::Markup(format!("Editing {}", target.id()))]);
    match content.root() {
        ContentNode::Container { class_name, .. } => assert!(class_name.starts_with("gx-attach-script")),
        other => panic!("unexpected root {other:?}"),
    }
}

#[test]
fn registry_routes_run_stop_and_events() {
    let mut editor = MemoryEditor::new();
    let target = editor.add_component("text").expect("text type");
    editor.select(Some(target));
    let mut registry = CommandRegistry::new();
    registry.add(Box::new(command()));

    assert!(registry.run_command("edit-script", &mut editor, RunOptions::default()).expect("known command"));
    registry.pump(&mut editor);
    assert_eq!(registry.get::<ScriptCommand>().map(ScriptCommand::phase), Some(CommandPhase::Active));
    assert!(registry.is_active("edit-script"));
    assert_eq!(registry.ids(), vec!["edit-script"]);
    let script = registry.get_mut::<ScriptCommand>().expect("script command");
    script.code_view_mut().expect("view").set_content("let routed = true;");
    assert_eq!(script.options().starter, "let el = this;");

    registry.stop_command("edit-script", &mut editor).expect("stop");
    registry.pump(&mut editor);
    assert!(!registry.is_active("edit-script"));
    assert!(registry.run_command("missing", &mut editor, RunOptions::default()).is_err());
}
