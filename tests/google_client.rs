//! Contract tests of the Google client: the requests it sends, and how it reads the responses

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskboard::client::GoogleClient;
use taskboard::synchronizer::LoadOutcome;
use taskboard::traits::{CalendarStore, TaskStore};
use taskboard::{CompanionEvent, DraftTask, GoogleSynchronizer, Priority, Session, TaskId, TaskListId, TaskStatus};

fn client_for(server: &MockServer, session: Arc<Session>) -> GoogleClient {
    let base = Url::parse(&server.uri()).unwrap();
    GoogleClient::with_endpoints(session, base.join("tasks/v1/").unwrap(), base.join("calendar/v3/").unwrap())
}

fn signed_in() -> Arc<Session> {
    Arc::new(Session::signed_in("test-token"))
}

#[tokio::test]
async fn test_list_task_lists() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/users/@me/lists"))
        .and(query_param("maxResults", "10"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "tasks#taskLists",
            "items": [
                {"kind": "tasks#taskList", "id": "list-1", "title": "My Tasks", "updated": "2024-05-30T08:00:00.000Z"},
                {"kind": "tasks#taskList", "id": "list-2", "title": "Groceries", "updated": "2024-05-30T08:00:00.000Z"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in());
    let lists = client.list_task_lists(10).await.unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].id().as_str(), "list-1");
    assert_eq!(lists[0].title(), "My Tasks");
}

#[tokio::test]
async fn test_list_without_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/users/@me/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "tasks#taskLists"})))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in());
    assert!(client.list_task_lists(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_incomplete_tasks() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/list-1/tasks"))
        .and(query_param("showCompleted", "false"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "t1", "title": "Report", "notes": "Priority: High", "status": "needsAction", "due": "2024-06-01T00:00:00.000Z"},
                {"id": "t2", "title": "Undated", "status": "needsAction"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in());
    let tasks = client.list_incomplete_tasks(&TaskListId::from("list-1"), 50).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].priority(), Some(Priority::High));
    assert!(tasks[1].due().is_none());
}

#[tokio::test]
async fn test_insert_task() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks/v1/lists/list-1/tasks"))
        .and(body_json(json!({
            "title": "Report",
            "due": "2024-06-01T00:00:00Z",
            "notes": "Priority: High",
            "status": "needsAction"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new-id", "title": "Report", "notes": "Priority: High", "status": "needsAction", "due": "2024-06-01T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = DraftTask::with_fields("Report", NaiveDate::from_ymd_opt(2024, 6, 1), Priority::High)
        .validate()
        .unwrap();
    let client = client_for(&server, signed_in());
    let created = client.insert_task(&TaskListId::from("list-1"), &draft.to_new_task()).await.unwrap();
    assert_eq!(created.id(), &TaskId::from("new-id"));
}

#[tokio::test]
async fn test_patch_task_status() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/list-1/tasks/t1"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1", "title": "Report", "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in());
    let patched = client.patch_task_status(&TaskListId::from("list-1"), &TaskId::from("t1"), TaskStatus::Completed).await.unwrap();
    assert!(patched.completed());
}

#[tokio::test]
async fn test_insert_event() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(body_json(json!({
            "summary": "[Task] Report (High)",
            "description": "Synced task with High priority.",
            "start": {"date": "2024-06-01"},
            "end": {"date": "2024-06-01"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "calendar#event", "id": "event-1", "status": "confirmed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = DraftTask::with_fields("Report", NaiveDate::from_ymd_opt(2024, 6, 1), Priority::High)
        .validate()
        .unwrap();
    let client = client_for(&server, signed_in());
    let id = client.insert_event("primary", &CompanionEvent::for_task(&draft)).await.unwrap();
    assert_eq!(id.as_str(), "event-1");
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "message": "Request had invalid authentication credentials."}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in());
    let err = client.list_task_lists(10).await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_signed_out_client_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(Session::new()));
    assert!(client.list_task_lists(10).await.is_err());
}

#[tokio::test]
async fn test_synchronizer_over_http() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/users/@me/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "list-1", "title": "My Tasks"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/list-1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "t2", "title": "Later", "status": "needsAction"},
                {"id": "t1", "title": "Report", "notes": "Priority: High", "status": "needsAction", "due": "2024-06-01T00:00:00.000Z"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/list-1/tasks/t1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in();
    let sync: GoogleSynchronizer = GoogleSynchronizer::new(
        client_for(&server, session.clone()),
        client_for(&server, session.clone()),
        session,
    );

    assert_eq!(sync.load().await, LoadOutcome::Loaded(2));
    let rows = sync.view().rows().to_vec();
    assert_eq!(rows[0].title, "Report");
    assert_eq!(rows[0].priority_tag.as_deref(), Some("High"));
    assert_eq!(rows[1].title, "Later");

    // The server refuses the update: the task comes back after the reload
    assert!(sync.complete(&TaskId::from("t1")).await.is_err());
    assert_eq!(sync.tasks().len(), 2);
}

#[tokio::test]
async fn test_synchronizer_request_caps() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    let lists = json!({
        "items": [{"id": "list-1", "title": "My Tasks"}, {"id": "list-2", "title": "Groceries"}]
    });

    // Loads enumerate up to 10 lists. Creations and completions re-resolve the first list every time
    Mock::given(method("GET"))
        .and(path("/tasks/v1/users/@me/lists"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lists.clone()))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/users/@me/lists"))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "list-1", "title": "My Tasks"}]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/list-1/tasks"))
        .and(query_param("showCompleted", "false"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "t1", "title": "Report", "notes": "Priority: High", "status": "needsAction", "due": "2024-06-01T00:00:00.000Z"}]
        })))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks/v1/lists/list-1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1", "title": "Report", "notes": "Priority: High", "status": "needsAction", "due": "2024-06-01T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "event-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/list-1/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1", "title": "Report", "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in();
    let client = client_for(&server, session.clone());
    let sync = GoogleSynchronizer::new(client.clone(), client, session);

    assert_eq!(sync.load().await, LoadOutcome::Loaded(1));
    let mut draft = DraftTask::with_fields("Report", NaiveDate::from_ymd_opt(2024, 6, 1), Priority::High);
    sync.create(&mut draft).await.unwrap();
    sync.complete(&TaskId::from("t1")).await.unwrap();

    server.verify().await;
}
