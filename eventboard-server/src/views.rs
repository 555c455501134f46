//! HTML pages.
//!
//! Every piece of user-supplied text goes through [`escape`] before it is
//! placed in markup.

use eventboard_core::Event;
use indoc::formatdoc;

/// Escape text for use in HTML content and double-quoted attribute values.
pub fn escape(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

fn page(title: &str, body: &str) -> String {
    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
          <meta charset="utf-8">
          <title>{title}</title>
        </head>
        <body>
        {body}
        </body>
        </html>
        "#,
        title = escape(title),
        body = body,
    }
}

/// Home page: every event, linking to its detail page.
pub fn index(events: &[Event]) -> String {
    let list = if events.is_empty() {
        "<p>No events yet.</p>".to_string()
    } else {
        let items: String = events
            .iter()
            .map(|event| {
                format!(
                    "  <li><a href=\"/event/{}\">{}</a> - {}</li>\n",
                    event.id,
                    escape(&event.name),
                    escape(&event.date),
                )
            })
            .collect();
        format!("<ul>\n{items}</ul>")
    };

    page(
        "Events",
        &formatdoc! {r#"
            <h1>Events</h1>
            {list}
            <a href="/create">Create Event</a>
        "#,
            list = list,
        },
    )
}

/// Detail page with the RSVP list and the RSVP, edit and delete controls.
pub fn event(event: &Event) -> String {
    let id = event.id;
    let rsvps = if event.rsvps.is_empty() {
        "<p>No RSVPs yet.</p>".to_string()
    } else {
        let items: String = event
            .rsvps
            .iter()
            .map(|name| format!("  <li>{}</li>\n", escape(name)))
            .collect();
        format!("<ul>\n{items}</ul>")
    };

    page(
        &event.name,
        &formatdoc! {r#"
            <h1>{name}</h1>
            <p><strong>Date:</strong> {date}</p>
            <p>{description}</p>
            <h2>RSVPs</h2>
            {rsvps}
            <form action="/event/{id}/rsvp" method="POST">
              <label>Your name: <input type="text" name="name" required></label>
              <button type="submit">RSVP</button>
            </form>
            <a href="/event/{id}/edit">Edit Event</a>
            <form action="/event/{id}?_method=DELETE" method="POST">
              <button type="submit">Delete Event</button>
            </form>
            <a href="/">Back to Events</a>
        "#,
            id = id,
            rsvps = rsvps,
            name = escape(&event.name),
            date = escape(&event.date),
            description = escape(&event.description),
        },
    )
}

pub fn create_form() -> String {
    page(
        "Create Event",
        indoc::indoc! {r#"
            <h1>Create Event</h1>
            <form action="/events" method="POST">
              <label>Name: <input type="text" name="name" required></label><br>
              <label>Date: <input type="date" name="date" required></label><br>
              <label>Description: <textarea name="description" required></textarea></label><br>
              <button type="submit">Create Event</button>
            </form>
            <a href="/">Back to Events</a>
        "#},
    )
}

/// Edit form; submits through the method override to `PUT /events/{id}`.
pub fn edit_form(event: &Event) -> String {
    let id = event.id;

    page(
        "Edit Event",
        &formatdoc! {r#"
            <h1>Edit Event</h1>
            <form action="/events/{id}?_method=PUT" method="POST">
              <label>Name: <input type="text" name="name" value="{name}" required></label><br>
              <label>Date: <input type="date" name="date" value="{date}" required></label><br>
              <label>Description: <textarea name="description" required>{description}</textarea></label><br>
              <button type="submit">Save</button>
            </form>
            <a href="/event/{id}">Cancel</a>
        "#,
            id = id,
            name = escape(&event.name),
            date = escape(&event.date),
            description = escape(&event.description),
        },
    )
}
