//! Command overview printed for `tt` with no arguments or an unknown verb.

const GROUPS: &[(&str, &[(&str, &str)])] = &[
    ("Generic commands", &[("init", "Initialize new data file")]),
    (
        "Projects",
        &[
            ("ap project name", "Add new project with name \"project name\""),
            ("dp 23", "Delete project with id 23"),
            ("lp", "List projects and their ids"),
        ],
    ),
    (
        "Tracking",
        &[
            ("rep 23", "Show a report for project 23"),
            ("show 23", "Show tracked times for project 23"),
            ("start 23", "Starts time tracking for project id 23"),
            ("status", "Show the active time tracking, if any"),
            ("stop", "Stops active time tracking"),
        ],
    ),
];

const OPTIONS: &[(&str, &str)] = &[
    ("--file <path>", "Data file to use (env: TT_DATA_FILE)"),
    ("--json", "Machine-readable output"),
    ("-v, --verbose", "Log diagnostics to stderr"),
];

pub fn render() -> String {
    let mut out = String::from("Usage: tt [options] <command> [args]\n");
    for (group, commands) in GROUPS {
        out.push_str(&format!("\n{}\n", group));
        for (command, description) in *commands {
            out.push_str(&format!("    {:20} {}\n", command, description));
        }
    }
    out.push_str("\nOptions\n");
    for (flag, description) in OPTIONS {
        out.push_str(&format!("    {:20} {}\n", flag, description));
    }
    out
}

pub fn print() {
    print!("{}", render());
}
