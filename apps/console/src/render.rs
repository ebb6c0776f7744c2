//! Plain-text rendering of screen snapshots.

use client_core::{ContactsSnapshot, EventDetail, EventsSnapshot, LoadState, Toast, ToastLevel};
use shared::domain::{Contact, Event};

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = vec![pad_line(headers, &widths)];
    out.extend(rows.iter().map(|row| {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        pad_line(&cells, &widths)
    }));
    out.join("\n")
}

fn load_banner(load: &LoadState) -> Option<String> {
    match load {
        LoadState::Failed(reason) => Some(format!("Could not load data: {reason}")),
        state if state.is_loading() => Some("Loading...".to_string()),
        _ => None,
    }
}

fn contact_row(contact: &Contact) -> Vec<String> {
    let id = if contact.id.is_placeholder() {
        "pending".to_string()
    } else {
        contact.id.to_string()
    };
    vec![
        id,
        contact.name.clone(),
        contact.relation.to_string(),
        contact.contact_type.to_string(),
        contact.value.clone(),
    ]
}

pub fn render_contacts(snapshot: &ContactsSnapshot) -> String {
    let mut out = Vec::new();
    out.push(format!("Contacts for user {}", snapshot.owner));
    out.extend(load_banner(&snapshot.load));

    if snapshot.is_adding {
        let draft = &snapshot.draft;
        out.push(format!(
            "New contact: relation={} type={} name={:?} value={:?}",
            draft.relation, draft.contact_type, draft.name, draft.value
        ));
    }
    if let Some(err) = &snapshot.form_error {
        out.push(format!("! {err}"));
    }

    if snapshot.contacts.is_empty() {
        out.push("No contacts".to_string());
    } else {
        let rows: Vec<_> = snapshot.contacts.iter().map(contact_row).collect();
        out.push(table(&["ID", "NAME", "RELATION", "TYPE", "VALUE"], &rows));
    }
    out.join("\n")
}

fn event_row(event: &Event) -> Vec<String> {
    vec![
        event.id.to_string(),
        event.event_name.clone(),
        event.date.to_string(),
    ]
}

pub fn render_events(snapshot: &EventsSnapshot) -> String {
    let mut out: Vec<String> = load_banner(&snapshot.load).into_iter().collect();
    if snapshot.events.is_empty() {
        out.push("No events found".to_string());
    } else {
        let rows: Vec<_> = snapshot.events.iter().map(event_row).collect();
        out.push(table(&["ID", "EVENT NAME", "DATE"], &rows));
    }
    out.join("\n")
}

pub fn render_groups(snapshot: &EventsSnapshot) -> String {
    let mut out: Vec<String> = load_banner(&snapshot.load).into_iter().collect();
    let input = if snapshot.is_loading {
        "Loading...".to_string()
    } else {
        format!("{:?}", snapshot.new_group_name)
    };
    out.push(format!("New event group: {input}"));
    if let Some(editing) = &snapshot.editing {
        out.push(format!("Editing group {}: {:?}", editing.id, editing.group_name));
    }

    if snapshot.groups.is_empty() {
        out.push("No event groups found".to_string());
    } else {
        let rows: Vec<_> = snapshot
            .groups
            .iter()
            .map(|group| vec![group.id.to_string(), group.group_name.clone()])
            .collect();
        out.push(table(&["ID", "EVENT GROUP NAME"], &rows));
    }
    out.join("\n")
}

pub fn render_event_detail(detail: Option<&EventDetail>) -> String {
    match detail {
        None => "No event selected".to_string(),
        Some(EventDetail::New) => "New event".to_string(),
        Some(EventDetail::Existing(event)) => {
            let mut out = vec![
                format!("Event {}: {}", event.id, event.event_name),
                format!("Date: {}", event.date),
            ];
            out.extend(
                event
                    .extra
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}")),
            );
            out.join("\n")
        }
    }
}

pub fn render_toast(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Success => format!("[ok] {}", toast.message),
        ToastLevel::Failure => format!("[error] {}", toast.message),
    }
}
