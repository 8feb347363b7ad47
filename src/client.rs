//! This module provides a client to the Google Tasks and Google Calendar REST APIs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{CALENDAR_API_URL, TASKS_API_URL};
use crate::event::{CompanionEvent, EventId};
use crate::session::{AccessToken, Session};
use crate::task::{NewTask, Task, TaskId, TaskStatus};
use crate::task_list::{TaskList, TaskListId};
use crate::traits::{CalendarStore, RemoteError, TaskStore};

/// A page of a list response. Google omits `items` altogether when the list is empty
#[derive(Deserialize)]
struct ItemsPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// The only field of an inserted event we care about
#[derive(Deserialize)]
struct InsertedEvent {
    id: EventId,
}

/// A task store and a calendar store backed by the Google APIs.
///
/// Every request is authorized by the bearer token of the [`Session`] at the time the request is sent.
/// Requests fail early (without touching the network) when the session is signed out.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    session: Arc<Session>,

    tasks_api: Url,
    calendar_api: Url,
}

impl GoogleClient {
    /// Create a client. This does not start a connection
    pub fn new(session: Arc<Session>) -> Self {
        Self::with_endpoints(session, TASKS_API_URL.clone(), CALENDAR_API_URL.clone())
    }

    /// Create a client that talks to other servers than Google's (e.g. a local mock server)
    pub fn with_endpoints(session: Arc<Session>, tasks_api: Url, calendar_api: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            session,
            tasks_api,
            calendar_api,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn access_token(&self) -> Result<AccessToken, RemoteError> {
        self.session.access_token()
            .ok_or_else(|| "The account session is not signed in".into())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let token = self.access_token()?;

        let response = request
            .bearer_auth(token.secret())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() == false {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Unexpected HTTP status code {:?}: {}", status, body).into());
        }

        Ok(response.json::<T>().await?)
    }
}

/// Append URL-escaped path segments to an API base URL
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl TaskStore for GoogleClient {
    async fn list_task_lists(&self, max_results: u32) -> Result<Vec<TaskList>, RemoteError> {
        let url = endpoint(&self.tasks_api, &["users", "@me", "lists"])?;
        let request = self.http.get(url)
            .query(&[("maxResults", max_results.to_string())]);

        let page: ItemsPage<TaskList> = self.send(request).await?;
        log::debug!("Found {} task lists", page.items.len());
        Ok(page.items)
    }

    async fn list_incomplete_tasks(&self, task_list: &TaskListId, max_results: u32) -> Result<Vec<Task>, RemoteError> {
        let url = endpoint(&self.tasks_api, &["lists", task_list.as_str(), "tasks"])?;
        let request = self.http.get(url)
            .query(&[
                ("showCompleted", "false".to_string()),
                ("maxResults", max_results.to_string()),
            ]);

        let page: ItemsPage<Task> = self.send(request).await?;
        log::debug!("Found {} undone tasks in list {}", page.items.len(), task_list);
        Ok(page.items)
    }

    async fn insert_task(&self, task_list: &TaskListId, task: &NewTask) -> Result<Task, RemoteError> {
        let url = endpoint(&self.tasks_api, &["lists", task_list.as_str(), "tasks"])?;
        let request = self.http.post(url).json(task);

        let created: Task = self.send(request).await?;
        log::debug!("Task {} created in list {}", created.id(), task_list);
        Ok(created)
    }

    async fn patch_task_status(&self, task_list: &TaskListId, task: &TaskId, status: TaskStatus) -> Result<Task, RemoteError> {
        let url = endpoint(&self.tasks_api, &["lists", task_list.as_str(), "tasks", task.as_str()])?;
        let request = self.http.patch(url)
            .json(&serde_json::json!({ "status": status }));

        self.send(request).await
    }
}

#[async_trait]
impl CalendarStore for GoogleClient {
    async fn insert_event(&self, calendar_id: &str, event: &CompanionEvent) -> Result<EventId, RemoteError> {
        let url = endpoint(&self.calendar_api, &["calendars", calendar_id, "events"])?;
        let request = self.http.post(url).json(event);

        let inserted: InsertedEvent = self.send(request).await?;
        log::debug!("Event {} created in calendar {}", inserted.id, calendar_id);
        Ok(inserted.id)
    }
}
