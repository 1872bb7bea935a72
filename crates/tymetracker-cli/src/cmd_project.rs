use anyhow::{Context, Result};
use tymetracker::{DeletedProject, Document, ProjectId, Tracker, TrackerError};

/// Parses a project id argument, treating a missing one as invalid input.
pub fn parse_id(arg: Option<&str>) -> Result<ProjectId, TrackerError> {
    arg.ok_or_else(|| TrackerError::InvalidInput("You must specify a project id".into()))?
        .parse()
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

pub fn run_list(tracker: &Tracker, json: bool) -> Result<()> {
    let output = tracker.read(|doc| Ok(render_list(doc, json)))?;
    match output {
        ListOutput::Json(value) => print_json(&value),
        ListOutput::Text(text) => {
            print!("{}", text);
            Ok(())
        }
    }
}

enum ListOutput {
    Json(serde_json::Value),
    Text(String),
}

fn render_list(doc: &Document, json: bool) -> ListOutput {
    let Some(projects) = doc.list_projects() else {
        return if json {
            ListOutput::Json(serde_json::json!({ "projects": [] }))
        } else {
            ListOutput::Text("No projects found.\n".to_string())
        };
    };

    let active = doc.tracking.project();
    if json {
        let items: Vec<serde_json::Value> = projects
            .map(|(id, name)| {
                serde_json::json!({
                    "id": id,
                    "name": name,
                    "active": active == Some(id),
                })
            })
            .collect();
        ListOutput::Json(serde_json::json!({ "projects": items }))
    } else {
        let mut text = String::new();
        for (id, name) in projects {
            let marker = if active == Some(id) { "*" } else { " " };
            text.push_str(&format!("  {} {:>3}   {}\n", marker, id, name));
        }
        ListOutput::Text(text)
    }
}

pub fn run_add(tracker: &Tracker, words: &[String], json: bool) -> Result<()> {
    let (id, name) = tracker.add_project(&words.join(" "))?;
    if json {
        print_json(&serde_json::json!({ "id": id, "name": name }))
    } else {
        println!("Created project \"{}\" with id {}", name, id);
        Ok(())
    }
}

pub fn run_delete(tracker: &Tracker, id: Option<&str>, json: bool) -> Result<()> {
    let deleted = tracker.delete_project(parse_id(id)?)?;
    if json {
        print_json(&serde_json::json!({
            "id": deleted.id,
            "name": deleted.name,
            "cancelled_tracking": deleted.cancelled_tracking,
        }))
    } else {
        print!("{}", render_deleted(&deleted));
        Ok(())
    }
}

fn render_deleted(deleted: &DeletedProject) -> String {
    let mut text = format!("Project {} deleted\n", deleted.name);
    if deleted.cancelled_tracking {
        text.push_str("Active time tracking for this project was cancelled\n");
    }
    text
}
