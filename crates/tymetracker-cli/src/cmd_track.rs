use crate::cmd_project::{parse_id, print_json};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tymetracker::{Report, Session, Status, StoppedSession, Tracker};

fn local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn run_start(tracker: &Tracker, id: Option<&str>) -> Result<()> {
    let id = parse_id(id)?;
    tracker.start(id)?;
    println!("Started time tracking for project {}", id);
    Ok(())
}

pub fn run_stop(tracker: &Tracker, json: bool) -> Result<()> {
    let stopped = tracker.stop()?;
    if json {
        print_json(&serde_json::json!({
            "project": stopped.project,
            "name": stopped.name,
            "session": stopped.session,
        }))
    } else {
        println!("{}", render_stopped(&stopped));
        Ok(())
    }
}

fn render_stopped(stopped: &StoppedSession) -> String {
    format!(
        "Stopped time tracking for project {} \"{}\" after {:.2} minutes",
        stopped.project, stopped.name, stopped.session.minutes
    )
}

pub fn run_show(tracker: &Tracker, id: Option<&str>, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let history = tracker.history(id)?;
    if json {
        print_json(&serde_json::json!({ "project": id, "history": history }))
    } else {
        print!("{}", render_history(&history));
        Ok(())
    }
}

fn render_history(history: &[Session]) -> String {
    if history.is_empty() {
        return "No tracked times.\n".to_string();
    }
    let mut out = String::new();
    for (n, s) in history.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}   {}  -  {}   {:>9.2} min\n",
            n + 1,
            local(s.started),
            local(s.stopped),
            s.minutes
        ));
    }
    out
}

pub fn run_report(tracker: &Tracker, id: Option<&str>, json: bool) -> Result<()> {
    let report = tracker.report(parse_id(id)?)?;
    if json {
        print_json(&serde_json::to_value(&report)?)
    } else {
        print!("{}", render_report(&report));
        Ok(())
    }
}

fn render_report(report: &Report) -> String {
    let mut out = format!("Project {} \"{}\"\n", report.project, report.name);
    out.push_str(&format!("  Sessions:      {}\n", report.sessions));
    out.push_str(&format!(
        "  Total:         {:.2} minutes ({})\n",
        report.total_minutes,
        hours_minutes(report.total_minutes)
    ));
    if let (Some(first), Some(last)) = (report.first_started, report.last_stopped) {
        out.push_str(&format!("  First started: {}\n", local(first)));
        out.push_str(&format!("  Last stopped:  {}\n", local(last)));
    }
    out
}

fn hours_minutes(minutes: f64) -> String {
    let total = minutes.round() as u64;
    format!("{}h {:02}m", total / 60, total % 60)
}

pub fn run_status(tracker: &Tracker, json: bool) -> Result<()> {
    let status = tracker.status()?;
    if json {
        print_json(&serde_json::to_value(&status)?)
    } else {
        println!("{}", render_status(&status));
        Ok(())
    }
}

fn render_status(status: &Status) -> String {
    match status {
        Status::Idle => "No active time tracking".to_string(),
        Status::Active {
            project,
            name,
            started,
            elapsed_minutes,
        } => format!(
            "Tracking project {} \"{}\" since {} ({:.2} minutes)",
            project,
            name,
            local(*started),
            elapsed_minutes
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tymetracker::ProjectId;

    fn session(minutes: i64) -> Session {
        let started: DateTime<Utc> = "2026-01-29T10:00:00Z".parse().unwrap();
        Session::new(started, started + chrono::Duration::minutes(minutes))
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "No tracked times.\n");

        let out = render_history(&[session(30), session(90)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("1 "));
        assert!(lines[0].ends_with("30.00 min"));
        assert!(lines[1].ends_with("90.00 min"));
    }

    #[test]
    fn test_render_report() {
        let report = Report {
            project: ProjectId::new(2),
            name: "Review spec".into(),
            sessions: 3,
            total_minutes: 125.5,
            first_started: None,
            last_stopped: None,
        };
        let out = render_report(&report);
        assert!(out.starts_with("Project 2 \"Review spec\"\n"));
        assert!(out.contains("Sessions:      3"));
        assert!(out.contains("125.50 minutes (2h 06m)"));
        assert!(!out.contains("First started"));
    }

    #[test]
    fn test_hours_minutes() {
        assert_eq!(hours_minutes(0.0), "0h 00m");
        assert_eq!(hours_minutes(59.6), "1h 00m");
        assert_eq!(hours_minutes(135.0), "2h 15m");
    }

    #[test]
    fn test_render_stopped() {
        let stopped = StoppedSession {
            project: ProjectId::new(1),
            name: "Write spec".into(),
            session: session(45),
        };
        assert_eq!(
            render_stopped(&stopped),
            "Stopped time tracking for project 1 \"Write spec\" after 45.00 minutes"
        );
    }

    #[test]
    fn test_render_status_idle() {
        assert_eq!(render_status(&Status::Idle), "No active time tracking");
    }
}
