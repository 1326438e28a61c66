//! Unit and service tests for the tracking context.

mod cascade_tests;
mod domain_tests;
mod project_tests;

use crate::tracker::adapters::{InMemoryTrackerStore, RecordingEventSink};
use crate::tracker::services::{
    CreateProjectCommand, CreateTaskCommand, ProjectCommandService, TaskCommandService,
    TrackerPolicy,
};
use mockable::DefaultClock;
use std::sync::Arc;

type TestTaskService = TaskCommandService<InMemoryTrackerStore, RecordingEventSink, DefaultClock>;
type TestProjectService =
    ProjectCommandService<InMemoryTrackerStore, RecordingEventSink, DefaultClock>;

/// Both services wired to one shared store and recording sink.
struct Harness {
    sink: Arc<RecordingEventSink>,
    tasks: TestTaskService,
    projects: TestProjectService,
}

impl Harness {
    fn with_policy(policy: TrackerPolicy) -> Self {
        let store = Arc::new(InMemoryTrackerStore::new());
        let sink = Arc::new(RecordingEventSink::new());
        let clock = Arc::new(DefaultClock);
        Self {
            tasks: TaskCommandService::new(
                Arc::clone(&store),
                Arc::clone(&sink),
                Arc::clone(&clock),
                policy,
            ),
            projects: ProjectCommandService::new(store, Arc::clone(&sink), clock, policy),
            sink,
        }
    }

    fn new() -> Self {
        Self::with_policy(TrackerPolicy::default())
    }

    /// Creates a project with the given deadline and returns its id string.
    async fn project_with_deadline(&self, deadline: &str) -> String {
        let view = self
            .projects
            .create_project(CreateProjectCommand {
                title: "Release 1.0".to_owned(),
                description: None,
                deadline: deadline.to_owned(),
            })
            .await
            .expect("project creation should succeed");
        view.id.to_string()
    }

    /// Creates a task, optionally linked and deadlined, returning its id
    /// string.
    async fn task(&self, deadline: Option<&str>, project_id: Option<&str>) -> String {
        let view = self
            .tasks
            .create_task(CreateTaskCommand {
                title: "Write docs".to_owned(),
                description: None,
                deadline: deadline.map(str::to_owned),
                project_id: project_id.map(str::to_owned),
            })
            .await
            .expect("task creation should succeed");
        view.id.to_string()
    }
}
