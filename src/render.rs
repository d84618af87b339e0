//! HTML projection of the collection.
//!
//! Every function here is a pure function of its inputs: rendering the same
//! notes and selection twice gives byte-identical output. Note text is
//! untrusted and always passes through [`escape_html`].

use chrono::{
    format::{Item, StrftimeItems},
    Local,
};

use crate::{truncate_with_marker, Note, Selection, LOCALE_TIMESTAMP_FORMAT};

/// Settings for the list and detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Title characters shown in list items
    pub title_max: usize,
    /// Content characters shown in list items
    pub content_max: usize,
    /// chrono format string for creation dates
    pub date_format: String,
    /// Shown in place of an empty title
    pub untitled_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title_max: 30,
            content_max: 50,
            date_format: LOCALE_TIMESTAMP_FORMAT.to_string(),
            untitled_label: "Untitled".to_string(),
        }
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Whether chrono understands every specifier in `format`.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| item == Item::Error)
}

/// Creation date in local time. An unusable `date_format` falls back to
/// RFC 3339.
pub fn format_date(note: &Note, options: &RenderOptions) -> String {
    let local = note.created_at.with_timezone(&Local);
    if is_valid_date_format(&options.date_format) {
        local.format(&options.date_format).to_string()
    } else {
        local.to_rfc3339()
    }
}

/// The sidebar list: one item per note in the given order.
pub fn render_list(notes: &[Note], selection: &Selection, options: &RenderOptions) -> String {
    if notes.is_empty() {
        return r#"<p class="empty-message">No notes yet</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="notes-list">"#);
    for note in notes {
        let class = if selection.is_selected(note.id) {
            "note-item active"
        } else {
            "note-item"
        };
        let title = truncate_with_marker(
            note.display_title(&options.untitled_label),
            options.title_max,
        );
        let preview = truncate_with_marker(&note.content, options.content_max);

        html.push_str(&format!(
            concat!(
                r#"<li class="{class}" data-id="{id}">"#,
                r#"<h4>{title}</h4>"#,
                r#"<p class="note-preview">{preview}</p>"#,
                r#"<p class="note-date">{date}</p>"#,
                r#"<button class="btn-delete" data-action="delete" data-id="{id}">Delete</button>"#,
                "</li>"
            ),
            class = class,
            id = note.id,
            title = escape_html(&title),
            preview = escape_html(&preview),
            date = escape_html(&format_date(note, options)),
        ));
    }
    html.push_str("</ul>");
    html
}

/// The detail view for the selected note, or `None` when the detail pane
/// should be hidden.
pub fn render_detail(
    notes: &[Note],
    selection: &Selection,
    options: &RenderOptions,
) -> Option<String> {
    let id = selection.active()?;
    let note = notes.iter().find(|note| note.id == id)?;

    let content = escape_html(&note.content).replace('\n', "<br>");
    Some(format!(
        concat!(
            r#"<article class="note-card" data-id="{id}">"#,
            "<h2>{title}</h2>",
            r#"<p class="note-date">{date}</p>"#,
            r#"<p class="note-text">{content}</p>"#,
            r#"<button class="btn-edit" data-action="edit" data-id="{id}">Edit</button>"#,
            r#"<button class="btn-delete" data-action="delete" data-id="{id}">Delete</button>"#,
            "</article>"
        ),
        id = note.id,
        title = escape_html(note.display_title(&options.untitled_label)),
        date = escape_html(&format_date(note, options)),
        content = content,
    ))
}

/// A standalone document with the list and, when something is selected,
/// the detail view.
pub fn render_page(notes: &[Note], selection: &Selection, options: &RenderOptions) -> String {
    let list = render_list(notes, selection, options);
    let detail = match render_detail(notes, selection, options) {
        Some(detail) => format!(r#"<section id="selectedNoteDetail">{detail}</section>"#),
        None => r#"<section id="selectedNoteDetail" hidden></section>"#.to_string(),
    };

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Notes</title>\n</head>\n<body>\n",
            "<aside id=\"sidebarNotesList\">{list}</aside>\n",
            "{detail}\n",
            "</body>\n</html>\n"
        ),
        list = list,
        detail = detail,
    )
}
