//! Play with the task list widget against an in-memory remote

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use taskboard::mock::MockRemote;
use taskboard::synchronizer::feedback::feedback_channel;
use taskboard::{DraftTask, Priority, Session, TaskListSynchronizer};

#[tokio::main]
async fn main() {
    env_logger::init();

    let remote = MockRemote::new();
    let list = remote.add_task_list("My Tasks");
    remote.add_task(&list, "Water the plants", None, None);
    remote.add_task(&list, "Pay the rent", Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).single(), Some("Priority: High"));

    let session = Arc::new(Session::new());
    let (sender, mut receiver) = feedback_channel();
    let synchronizer = TaskListSynchronizer::new_with_feedback(remote.clone(), remote.clone(), session.clone(), sender);
    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let event = receiver.borrow_and_update().clone();
            println!("  [{}]", event);
        }
    });

    println!("---- signed out -----");
    taskboard::utils::print_view(&synchronizer.view());

    session.sign_in("offline-token");
    synchronizer.load().await;
    println!("---- signed in -----");
    taskboard::utils::print_view(&synchronizer.view());
    taskboard::utils::pause();

    let mut draft = DraftTask::with_fields("Write the report", NaiveDate::from_ymd_opt(2024, 6, 1), Priority::Medium);
    if let Err(err) = synchronizer.create(&mut draft).await {
        println!("{}", err.alert());
    }
    println!("---- after adding a task -----");
    taskboard::utils::print_view(&synchronizer.view());
    for (calendar, event) in remote.events() {
        println!("    event in {}: {} on {}", calendar, event.summary(), event.start_date());
    }
    taskboard::utils::pause();

    let first = synchronizer.tasks().first().map(|task| task.id().clone());
    if let Some(id) = first {
        if let Err(err) = synchronizer.complete(&id).await {
            println!("{}", err.completion_alert());
        }
    }
    println!("---- after completing the first task -----");
    taskboard::utils::print_view(&synchronizer.view());

    println!("---- every task of the remote list -----");
    taskboard::utils::print_tasks(&remote.tasks(&list));
}
