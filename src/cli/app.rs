//! CLI module for the sidenotes application
//!
//! This module turns parsed commands into collection operations and prints
//! the resulting views. It is the only place that talks to the terminal.
use std::{
    fs::{self, read_to_string},
    io::Write,
    path::Path,
    process::Command,
};

use clap::Parser;
use console::style;
use log::{debug, error, info, warn};
use shell_words::split;
use tempfile::Builder;

use crate::{
    format_date, render_page, truncate_with_marker, Commands, Config, Dialogs, KeyValueStore,
    Note, NoteCollection, NoteId, NoteStore, NotesError, RenderOptions, Result, ShellCommand,
    ShellLine,
};

/// CLI application handler - processes commands against one note collection
pub struct App<S, D, W> {
    /// The collection manager
    notes: NoteCollection<S>,

    /// Confirmation, alert and line prompts
    dialogs: D,

    /// Where views are printed
    out: W,

    /// Application configuration
    config: Config,

    options: RenderOptions,
}

impl<S: KeyValueStore, D: Dialogs, W: Write> App<S, D, W> {
    /// Opens the collection from `store`. When `render_path` is configured the
    /// HTML page is rewritten there after every change.
    pub fn new(store: NoteStore<S>, config: Config, dialogs: D, out: W) -> Self {
        let mut notes = NoteCollection::open(store, config.partial_notes);
        let options = config.render_options();

        if let Some(path) = config.render_path.clone() {
            let page_options = options.clone();
            notes.subscribe(move |change, all, selection| {
                let page = render_page(all, selection, &page_options);
                match fs::write(&path, page) {
                    Ok(()) => debug!("Re-rendered {} after {:?}", path.display(), change),
                    Err(e) => warn!("Failed to write page {}: {}", path.display(), e),
                }
            });
        }

        Self {
            notes,
            dialogs,
            out,
            config,
            options,
        }
    }

    pub fn notes(&self) -> &NoteCollection<S> {
        &self.notes
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs one command. Mistakes the user can fix are also shown as an alert.
    pub fn run(&mut self, command: Commands) -> Result<()> {
        let result = self.execute(command);
        if let Err(e) = &result {
            if e.is_user_facing() {
                self.dialogs.alert(&e.to_string());
            }
        }
        result
    }

    fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add { title, content } => self.handle_add(&title, &content),
            Commands::List { json } => self.handle_list(json),
            Commands::Show { id } => self.handle_show(id),
            Commands::Edit {
                id,
                title,
                content,
                editor,
            } => self.handle_edit(id, title, content, editor),
            Commands::Delete { id, force } => self.handle_delete(id, force),
            Commands::Render { output, select } => self.handle_render(output.as_deref(), select),
            Commands::Shell => self.run_shell(),
        }
    }

    /// Reads commands until `quit` or end of input. Errors are reported and
    /// the session carries on.
    pub fn run_shell(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "{} notes loaded. Type 'help' for commands, 'quit' to leave.",
            self.notes.len()
        )?;

        while let Some(line) = self.dialogs.prompt("notes> ") {
            let words = match split(&line) {
                Ok(words) => words,
                Err(e) => {
                    self.dialogs.alert(&format!("Cannot parse input: {}", e));
                    continue;
                }
            };
            if words.is_empty() {
                continue;
            }

            // Usage errors and `help` both end up here
            let parsed = match ShellLine::try_parse_from(&words) {
                Ok(parsed) => parsed,
                Err(e) => {
                    write!(self.out, "{}", e.render())?;
                    continue;
                }
            };

            let outcome = match parsed.command {
                ShellCommand::Quit => break,
                ShellCommand::Select { id } => self.select(id),
                ShellCommand::Clear => {
                    self.notes.clear_selection();
                    writeln!(self.out, "Selection cleared").map_err(NotesError::from)
                }
                ShellCommand::Note(Commands::Shell) => Err(NotesError::InvalidCommand {
                    message: "Already in a shell".to_string(),
                }),
                ShellCommand::Note(command) => self.execute(command),
            };

            if let Err(e) = outcome {
                if e.is_user_facing() {
                    self.dialogs.alert(&e.to_string());
                } else {
                    error!("Command failed: {}", e);
                    self.dialogs.alert(&format!("Error: {}", e));
                }
            }
        }

        info!("Shell session finished");
        Ok(())
    }

    fn select(&mut self, id: NoteId) -> Result<()> {
        if self.notes.select(id) {
            Ok(())
        } else {
            Err(NotesError::NoteNotFound { id })
        }
    }

    fn handle_add(&mut self, title: &str, content: &str) -> Result<()> {
        let note = self.notes.create(title, content)?;
        writeln!(self.out, "Note created with ID: {}", note.id)?;
        write_detail(&mut self.out, &note, &self.options)?;
        Ok(())
    }

    fn handle_list(&mut self, json: bool) -> Result<()> {
        if json {
            writeln!(self.out, "{}", serde_json::to_string_pretty(self.notes.list())?)?;
            return Ok(());
        }

        let notes = self.notes.list();
        if notes.is_empty() {
            writeln!(self.out, "No notes yet.")?;
            return Ok(());
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        let selection = self.notes.selection();

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                writeln!(self.out, "{}", "-".repeat(term_width.min(50)))?;
            }

            let marker = if selection.is_selected(note.id) { ">" } else { " " };
            let title = truncate_with_marker(
                note.display_title(&self.options.untitled_label),
                self.options.title_max,
            );
            writeln!(
                self.out,
                "{} {} | {} | {}",
                marker,
                note.id,
                style(title).bold(),
                format_date(note, &self.options)
            )?;

            let preview = truncate_with_marker(&note.content, self.options.content_max);
            if !preview.is_empty() {
                writeln!(self.out, "  {}", preview.replace('\n', " "))?;
            }
        }

        writeln!(
            self.out,
            "\n{} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        )?;
        Ok(())
    }

    fn handle_show(&mut self, id: NoteId) -> Result<()> {
        self.select(id)?;
        if let Some(note) = self.notes.selected_note() {
            write_detail(&mut self.out, note, &self.options)?;
        }
        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: NoteId,
        title: Option<String>,
        content: Option<String>,
        editor: bool,
    ) -> Result<()> {
        let current = self
            .notes
            .get(id)
            .cloned()
            .ok_or(NotesError::NoteNotFound { id })?;

        let title = title.unwrap_or(current.title);
        let content = content.unwrap_or(current.content);
        let content = if editor {
            self.open_editor_with_content(&content)?
        } else {
            content
        };

        let note = self.notes.update(id, &title, &content)?;
        writeln!(self.out, "Note {} updated", note.id)?;
        Ok(())
    }

    fn handle_delete(&mut self, id: NoteId, force: bool) -> Result<()> {
        let note = self
            .notes
            .get(id)
            .cloned()
            .ok_or(NotesError::NoteNotFound { id })?;

        if !force {
            writeln!(self.out, "You are about to delete the following note:")?;
            write_detail(&mut self.out, &note, &self.options)?;

            if !self.dialogs.confirm("Do you really want to delete this note?") {
                writeln!(self.out, "Deletion cancelled.")?;
                return Ok(());
            }
        }

        self.notes.delete(id)?;
        writeln!(
            self.out,
            "Note '{}' ({}) has been deleted.",
            note.display_title(&self.options.untitled_label),
            note.id
        )?;
        Ok(())
    }

    fn handle_render(&mut self, output: Option<&Path>, select: Option<NoteId>) -> Result<()> {
        if let Some(id) = select {
            self.select(id)?;
        }

        let page = render_page(self.notes.list(), self.notes.selection(), &self.options);
        match output {
            Some(path) => {
                fs::write(path, page)?;
                info!("Rendered page to {}", path.display());
                writeln!(self.out, "Page written to {}", path.display())?;
            }
            None => write!(self.out, "{}", page)?,
        }
        Ok(())
    }

    fn open_editor_with_content(&self, existing_content: &str) -> Result<String> {
        let temp_file = Builder::new()
            .prefix("sidenote-")
            .suffix(".txt")
            .tempfile()?;
        fs::write(temp_file.path(), existing_content)?;

        let editor_cmd = self.config.get_editor_command();
        info!("Opening {} to edit note content", editor_cmd);
        launch_editor(&editor_cmd, temp_file.path())?;

        Ok(read_to_string(temp_file.path())?)
    }
}

fn write_detail<W: Write>(out: &mut W, note: &Note, options: &RenderOptions) -> Result<()> {
    writeln!(
        out,
        "ID: {} | Created: {}",
        note.id,
        format_date(note, options)
    )?;
    writeln!(
        out,
        "Title: {}",
        style(note.display_title(&options.untitled_label)).bold()
    )?;
    if !note.content.is_empty() {
        writeln!(out, "\n{}", note.content)?;
    }
    Ok(())
}

fn launch_editor(editor_cmd: &str, file_path: &Path) -> Result<()> {
    // Handle shell-like command parsing
    let args = split(editor_cmd).map_err(|e| NotesError::EditorError {
        message: format!("Failed to parse editor command: {}", e),
    })?;

    let Some((program, rest)) = args.split_first() else {
        return Err(NotesError::EditorError {
            message: "Empty editor command".to_string(),
        });
    };

    let status = Command::new(program).args(rest).arg(file_path).status()?;

    if !status.success() {
        return Err(NotesError::EditorError {
            message: "Editor exited with non-zero status".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::collections::VecDeque;
    use tempfile::tempdir;

    #[derive(Default)]
    struct ScriptedDialogs {
        answers: VecDeque<bool>,
        lines: VecDeque<String>,
        alerts: Vec<String>,
    }

    impl Dialogs for ScriptedDialogs {
        fn confirm(&mut self, _question: &str) -> bool {
            self.answers.pop_front().unwrap_or(false)
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }

        fn prompt(&mut self, _label: &str) -> Option<String> {
            self.lines.pop_front()
        }
    }

    type TestApp = App<MemoryStore, ScriptedDialogs, Vec<u8>>;

    fn app_with(config: Config, dialogs: ScriptedDialogs) -> TestApp {
        App::new(NoteStore::new(MemoryStore::new()), config, dialogs, Vec::new())
    }

    fn app() -> TestApp {
        app_with(Config::default(), ScriptedDialogs::default())
    }

    fn add(app: &mut TestApp, title: &str, content: &str) -> NoteId {
        app.run(Commands::Add {
            title: title.to_string(),
            content: content.to_string(),
        })
        .unwrap();
        app.notes().selection().active().unwrap()
    }

    fn output(app: TestApp) -> String {
        String::from_utf8(app.into_output()).unwrap()
    }

    #[test]
    fn add_selects_and_prints_note() {
        let mut app = app();
        let id = add(&mut app, "Shopping", "milk, eggs");

        assert_eq!(app.notes().get(id).unwrap().title, "Shopping");
        let out = output(app);
        assert!(out.contains(&format!("Note created with ID: {}", id)));
        assert!(out.contains("milk, eggs"));
    }

    #[test]
    fn empty_add_alerts_and_fails() {
        let mut app = app();
        let result = app.run(Commands::Add {
            title: " ".to_string(),
            content: String::new(),
        });

        assert!(matches!(result, Err(NotesError::EmptyNote)));
        assert_eq!(app.dialogs().alerts, vec!["Please enter a title or some content"]);
        assert!(app.notes().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let mut app = app();
        add(&mut app, "Shopping", "milk, eggs");
        add(&mut app, "Todo", "finish spec");
        let before = app.out.len();
        app.run(Commands::List { json: false }).unwrap();

        let out = output(app);
        let listing = &out[before..];
        let todo = listing.find("Todo").unwrap();
        let shopping = listing.find("Shopping").unwrap();
        assert!(todo < shopping);
        assert!(listing.contains("2 notes"));
    }

    #[test]
    fn list_json_is_the_persisted_shape() {
        let mut app = app();
        add(&mut app, "A", "B");
        let before = app.out.len();
        app.run(Commands::List { json: true }).unwrap();

        let out = output(app);
        let parsed: Vec<Note> = serde_json::from_str(&out[before..]).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "A");
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        let id = add(&mut app, "keep", "me");
        app.run(Commands::Delete { id, force: false }).unwrap();
        assert_eq!(app.notes().len(), 1);

        app.dialogs.answers.push_back(true);
        app.run(Commands::Delete { id, force: false }).unwrap();
        assert!(app.notes().is_empty());
        assert_eq!(app.notes().selection().active(), None);

        let out = output(app);
        assert!(out.contains("Deletion cancelled."));
        assert!(out.contains("has been deleted"));
    }

    #[test]
    fn forced_delete_skips_confirmation() {
        let mut app = app();
        let id = add(&mut app, "gone", "");
        app.run(Commands::Delete { id, force: true }).unwrap();
        assert!(app.notes().is_empty());
    }

    #[test]
    fn delete_unknown_reports_not_found() {
        let mut app = app();
        let result = app.run(Commands::Delete { id: 9, force: true });

        assert!(matches!(result, Err(NotesError::NoteNotFound { id: 9 })));
        assert_eq!(app.dialogs().alerts, vec!["Note not found: 9"]);
    }

    #[test]
    fn edit_keeps_omitted_fields() {
        let mut app = app();
        let id = add(&mut app, "title", "content");
        app.run(Commands::Edit {
            id,
            title: None,
            content: Some("new content".to_string()),
            editor: false,
        })
        .unwrap();

        let note = app.notes().get(id).unwrap();
        assert_eq!(note.title, "title");
        assert_eq!(note.content, "new content");
    }

    #[test]
    fn show_unknown_is_not_found() {
        let mut app = app();
        assert!(matches!(
            app.run(Commands::Show { id: 1 }),
            Err(NotesError::NoteNotFound { id: 1 })
        ));
    }

    #[test]
    fn render_writes_page_with_selected_detail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.html");
        let mut app = app();
        let first = add(&mut app, "first", "<b>bold</b>");
        add(&mut app, "second", "");

        app.run(Commands::Render {
            output: Some(path.clone()),
            select: Some(first),
        })
        .unwrap();

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains(&format!(r#"<article class="note-card" data-id="{}">"#, first)));
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn render_path_follows_every_change() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("live.html");
        let config = Config {
            render_path: Some(path.clone()),
            ..Config::default()
        };
        let mut app = app_with(config, ScriptedDialogs::default());

        let id = add(&mut app, "live", "view");
        assert!(fs::read_to_string(&path).unwrap().contains("live"));

        app.run(Commands::Delete { id, force: true }).unwrap();
        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains("empty-message"));
        assert!(page.contains("hidden"));
    }

    #[test]
    fn shell_session_keeps_state_and_survives_errors() {
        let lines = [
            "add -T Shopping -c 'milk, eggs'",
            "add -T Todo -c 'finish spec'",
            "",
            "list",
            "delete 999 --force",
            "shell",
            "frobnicate",
            "clear",
            "quit",
            "add -T ignored",
        ];
        let dialogs = ScriptedDialogs {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..ScriptedDialogs::default()
        };
        let mut app = app_with(Config::default(), dialogs);
        app.run(Commands::Shell).unwrap();

        assert_eq!(app.notes().len(), 2);
        assert_eq!(app.notes().selection().active(), None);
        assert_eq!(
            app.dialogs().alerts,
            vec!["Note not found: 999", "Already in a shell"]
        );
        assert_eq!(app.dialogs().lines, vec!["add -T ignored"]);

        let out = output(app);
        assert!(out.contains("Selection cleared"));
        assert!(out.contains("frobnicate"));
    }
}
