//! Cross-entity cascade tests: auto-completion, reopening, and post-commit
//! event delivery.

use super::Harness;
use crate::tracker::adapters::InMemoryTrackerStore;
use crate::tracker::domain::DomainEvent;
use crate::tracker::ports::{EventSink, EventSinkError, TaskRepository};
use crate::tracker::services::{
    CompleteProjectCommand, CompleteTaskCommand, CreateTaskCommand, DeleteTaskCommand,
    ReopenTaskCommand, TaskCommandService, TrackerPolicy, UnlinkTaskCommand,
};
use async_trait::async_trait;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

fn kinds(events: &[DomainEvent]) -> Vec<&'static str> {
    events.iter().map(DomainEvent::kind).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_last_task_auto_completes_project(harness: Harness) -> eyre::Result<()> {
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let first = harness.task(None, Some(&project_id)).await;
    let second = harness.task(None, Some(&project_id)).await;

    drop(
        harness
            .tasks
            .complete_task(CompleteTaskCommand { task_id: first })
            .await?,
    );
    let midway = harness.projects.get_project(&project_id).await?;
    ensure!(!midway.completed);

    drop(
        harness
            .tasks
            .complete_task(CompleteTaskCommand { task_id: second })
            .await?,
    );
    let finished = harness.projects.get_project(&project_id).await?;
    ensure!(finished.completed);
    ensure!(finished.completed_tasks == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn auto_complete_can_be_disabled_by_policy() -> eyre::Result<()> {
    let harness = Harness::with_policy(TrackerPolicy {
        auto_complete_projects: false,
        ..TrackerPolicy::default()
    });
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let task_id = harness.task(None, Some(&project_id)).await;

    drop(harness.tasks.complete_task(CompleteTaskCommand { task_id }).await?);
    let project = harness.projects.get_project(&project_id).await?;
    ensure!(!project.completed);

    // An explicit completion still works once every member is done.
    let completed = harness
        .projects
        .complete_project(CompleteProjectCommand { project_id })
        .await?;
    ensure!(completed.completed);
    Ok(())
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test(flavor = "multi_thread")]
async fn reopening_task_reopens_project_regardless_of_policy(
    #[case] auto_complete: bool,
) -> eyre::Result<()> {
    let harness = Harness::with_policy(TrackerPolicy {
        auto_complete_projects: auto_complete,
        ..TrackerPolicy::default()
    });
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let task_id = harness.task(None, Some(&project_id)).await;
    drop(
        harness
            .tasks
            .complete_task(CompleteTaskCommand {
                task_id: task_id.clone(),
            })
            .await?,
    );
    if !auto_complete {
        drop(
            harness
                .projects
                .complete_project(CompleteProjectCommand {
                    project_id: project_id.clone(),
                })
                .await?,
        );
    }
    ensure!(harness.projects.get_project(&project_id).await?.completed);

    let reopened = harness
        .tasks
        .reopen_task(ReopenTaskCommand { task_id })
        .await?;
    ensure!(!reopened.completed);
    let project = harness.projects.get_project(&project_id).await?;
    ensure!(!project.completed);
    ensure!(project.completed_tasks == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_last_open_task_auto_completes_project(harness: Harness) -> eyre::Result<()> {
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let done = harness.task(None, Some(&project_id)).await;
    let straggler = harness.task(None, Some(&project_id)).await;
    drop(harness.tasks.complete_task(CompleteTaskCommand { task_id: done }).await?);

    harness
        .tasks
        .delete_task(DeleteTaskCommand { task_id: straggler })
        .await?;
    let project = harness.projects.get_project(&project_id).await?;
    ensure!(project.completed);
    ensure!(project.total_tasks == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unlinking_last_open_task_auto_completes_project(harness: Harness) -> eyre::Result<()> {
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let done = harness.task(None, Some(&project_id)).await;
    let straggler = harness.task(None, Some(&project_id)).await;
    drop(harness.tasks.complete_task(CompleteTaskCommand { task_id: done }).await?);

    harness
        .projects
        .unlink_task(UnlinkTaskCommand {
            project_id: project_id.clone(),
            task_id: straggler,
        })
        .await?;
    let project = harness.projects.get_project(&project_id).await?;
    ensure!(project.completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_only_task_does_not_complete_emptied_project(
    harness: Harness,
) -> eyre::Result<()> {
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let only = harness.task(None, Some(&project_id)).await;

    harness
        .tasks
        .delete_task(DeleteTaskCommand { task_id: only })
        .await?;
    let project = harness.projects.get_project(&project_id).await?;
    ensure!(!project.completed);
    ensure!(project.total_tasks == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_events_are_published_before_project_events(harness: Harness) -> eyre::Result<()> {
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let task_id = harness.task(None, Some(&project_id)).await;

    let before = harness.sink.events()?.len();
    drop(harness.tasks.complete_task(CompleteTaskCommand { task_id }).await?);

    let events = harness.sink.events()?;
    let tail = events.get(before..).unwrap_or(&[]);
    ensure!(kinds(tail) == ["task_completed", "project_completed"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_publishes_link_events_in_emission_order(harness: Harness) -> eyre::Result<()> {
    let project_id = harness.project_with_deadline("2025-12-31T00:00:00Z").await;
    let before = harness.sink.events()?.len();

    let _task = harness.task(None, Some(&project_id)).await;
    let events = harness.sink.events()?;
    let tail = events.get(before..).unwrap_or(&[]);
    ensure!(kinds(tail) == ["task_created", "task_linked"]);
    Ok(())
}

mockall::mock! {
    Sink {}

    #[async_trait]
    impl EventSink for Sink {
        async fn publish(&self, event: &DomainEvent) -> Result<(), EventSinkError>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sink_failure_does_not_fail_the_command() -> eyre::Result<()> {
    let store = Arc::new(InMemoryTrackerStore::new());
    let mut sink = MockSink::new();
    sink.expect_publish()
        .returning(|_| Err(EventSinkError::new(std::io::Error::other("sink offline"))));
    let service = TaskCommandService::new(
        Arc::clone(&store),
        Arc::new(sink),
        Arc::new(DefaultClock),
        TrackerPolicy::default(),
    );

    let view = service
        .create_task(CreateTaskCommand {
            title: "Survive the outage".to_owned(),
            ..CreateTaskCommand::default()
        })
        .await?;

    // The commit stands even though delivery failed.
    let stored = store.find_task(view.id).await?;
    ensure!(stored.is_some());
    Ok(())
}
