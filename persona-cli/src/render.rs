use colored::Colorize;
use persona_lib::{Notice, Row, Summary, Update};
use sysexits::ExitCode;

/// Print the status line.
pub fn status(summary: &Summary) {
    println!(
        "{} {} {} {}",
        "●".green(),
        summary.name.bold(),
        "|".dimmed(),
        summary.registry
    );
}

pub fn notice(notice: &Notice) {
    match notice {
        Notice::Info(msg) => println!("{}", msg.green()),
        Notice::Warning(msg) => eprintln!("{} {msg}", "warning:".yellow().bold()),
    }
}

pub fn rows(rows: &[Row]) {
    if rows.is_empty() {
        println!("{}", "No stored profiles".dimmed());
        return;
    }

    for row in rows {
        let marker = if row.current { "*".green() } else { " ".normal() };
        println!("{marker} {} {}", row.label.bold(), row.description.dimmed());
    }
}

/// Show the outcome of a handler and turn it into an exit code.
pub fn finish(update: &Update) -> ExitCode {
    match update {
        Update::Render { rows: list, summary, .. } => {
            rows(list);
            status(summary);
            ExitCode::Ok
        }
        Update::Status {
            summary,
            notice: msg,
        } => {
            notice(msg);
            status(summary);
            ExitCode::Ok
        }
        Update::Notice(msg @ Notice::Warning(_)) => {
            notice(msg);
            ExitCode::DataErr
        }
        Update::Notice(msg) => {
            notice(msg);
            ExitCode::Ok
        }
        Update::None => ExitCode::Ok,
    }
}
