//! Unit tests for the project aggregate.

use crate::tracker::domain::{Deadline, DomainError, DomainEvent, Project, TaskId, Title};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn deadline(raw: &str) -> Deadline {
    Deadline::parse(raw).expect("valid deadline literal")
}

fn project(clock: &DefaultClock) -> Project {
    let title = Title::new("Quarterly launch").expect("valid title");
    let mut project = Project::new(title, None, deadline("2025-12-31T00:00:00Z"), clock);
    project.take_events();
    project
}

#[rstest]
fn complete_with_open_tasks_fails(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    let task = TaskId::new();
    project.add_task(task, false, &clock);

    let result = project.complete(true, &clock);
    ensure!(matches!(
        result,
        Err(DomainError::ProjectHasIncompleteTasks { open_tasks: 1, .. })
    ));
    ensure!(!project.is_completed());

    project.mark_task_completed(task, &clock);
    project.complete(true, &clock)?;
    ensure!(project.is_completed());
    Ok(())
}

#[rstest]
#[case(true)]
#[case(false)]
fn empty_project_completion_follows_policy(
    #[case] allow_empty: bool,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut project = project(&clock);
    let result = project.complete(allow_empty, &clock);
    if allow_empty {
        ensure!(result.is_ok());
        ensure!(project.is_completed());
    } else {
        ensure!(matches!(
            result,
            Err(DomainError::ProjectHasIncompleteTasks { open_tasks: 0, .. })
        ));
        ensure!(!project.is_completed());
    }
    Ok(())
}

#[rstest]
fn reopen_is_unconditional_and_idempotent(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    project.complete(true, &clock)?;
    project.take_events();

    project.reopen(&clock);
    ensure!(!project.is_completed());
    let events = project.take_events();
    ensure!(events.iter().map(DomainEvent::kind).eq(["project_reopened"]));

    // Reopening an open project changes nothing.
    project.reopen(&clock);
    ensure!(project.take_events().is_empty());
    Ok(())
}

#[rstest]
fn adding_open_task_reopens_completed_project(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    project.complete(true, &clock)?;
    project.take_events();

    project.add_task(TaskId::new(), false, &clock);
    ensure!(!project.is_completed());
    ensure!(project.take_events().iter().map(DomainEvent::kind).eq(["project_reopened"]));
    Ok(())
}

#[rstest]
fn adding_completed_task_keeps_project_completed(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    project.complete(true, &clock)?;
    project.take_events();

    let task = TaskId::new();
    project.add_task(task, true, &clock);
    ensure!(project.is_completed());
    ensure!(project.take_events().is_empty());
    ensure!(project.completed_tasks() == 1);
    Ok(())
}

#[rstest]
fn reopen_due_to_task_ignores_non_members(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    let member = TaskId::new();
    project.add_task(member, true, &clock);
    project.complete(true, &clock)?;
    project.take_events();

    project.reopen_due_to_task(TaskId::new(), &clock);
    ensure!(project.is_completed());

    project.reopen_due_to_task(member, &clock);
    ensure!(!project.is_completed());
    Ok(())
}

#[rstest]
fn reschedule_below_member_deadline_is_rejected_atomically(
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut project = project(&clock);
    let original = project.deadline();

    let result = project.reschedule(
        deadline("2025-12-19T00:00:00Z"),
        Some(deadline("2025-12-20T00:00:00Z")),
        &clock,
    );
    ensure!(matches!(
        result,
        Err(DomainError::ProjectDeadlineBelowTaskDeadline { .. })
    ));
    ensure!(project.deadline() == original);
    ensure!(project.take_events().is_empty());
    Ok(())
}

#[rstest]
fn reschedule_emits_deadline_changed(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    let new_deadline = deadline("2026-06-30T00:00:00Z");
    project.reschedule(new_deadline, Some(deadline("2025-12-20T00:00:00Z")), &clock)?;
    ensure!(project.deadline() == new_deadline);
    ensure!(
        project
            .take_events()
            .iter()
            .map(DomainEvent::kind)
            .eq(["project_deadline_changed"])
    );
    Ok(())
}

#[rstest]
fn membership_and_progress_counts(clock: DefaultClock) -> eyre::Result<()> {
    let mut project = project(&clock);
    let first = TaskId::new();
    let second = TaskId::new();

    project.add_task(first, false, &clock);
    project.add_task(second, false, &clock);
    // Adding twice is idempotent.
    project.add_task(first, false, &clock);
    ensure!(project.total_tasks() == 2);
    ensure!(project.completed_tasks() == 0);
    ensure!(project.contains_task(first));
    ensure!(!project.contains_task(TaskId::new()));

    project.mark_task_completed(first, &clock);
    ensure!(project.completed_tasks() == 1);

    // Completion marks for non-members are ignored.
    project.mark_task_completed(TaskId::new(), &clock);
    ensure!(project.completed_tasks() == 1);

    project.remove_task(first, &clock);
    ensure!(project.total_tasks() == 1);
    ensure!(project.completed_tasks() == 0);
    ensure!(!project.contains_task(first));

    // Removing twice is idempotent.
    project.remove_task(first, &clock);
    ensure!(project.total_tasks() == 1);
    Ok(())
}
