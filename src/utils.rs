//! Some utility functions

use std::io::{stdin, stdout, Read, Write};

use crate::task::Task;
use crate::view::WidgetView;

/// A debug utility that pretty-prints a task list
pub fn print_tasks(tasks: &[Task]) {
    for task in tasks {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let due = task.due()
        .map(|due| due.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| String::from("----------"));
    let priority = task.priority_tag().unwrap_or("");
    println!("    {} {} {}\t[{}]\t{}", completion, due, task.title(), priority, task.id());
}

/// A debug utility that pretty-prints what the widget displays
pub fn print_view(view: &WidgetView) {
    if let Some(placeholder) = view.placeholder() {
        println!("    ({})", placeholder);
        return;
    }
    for row in view.rows() {
        let due = row.due_date
            .map(|due| due.to_string())
            .unwrap_or_default();
        let tag = row.priority_tag.as_deref().unwrap_or("");
        println!("    ○ {}\t{}\t{} {}", row.title, due, row.css_color(), tag);
    }
}

/// Wait for the user to press enter
pub fn pause() {
    let mut stdout = stdout();
    let _ = stdout.write_all(b"Press Enter to continue...");
    let _ = stdout.flush();
    let _ = stdin().read_exact(&mut [0]);
}
