//! Unit tests for value objects and the task state machine.

use crate::tracker::domain::{
    CompletionStatus, Deadline, DomainError, DomainEvent, ProjectId, Task, TaskId, Title,
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn open_task(clock: &DefaultClock) -> Result<Task, DomainError> {
    let title = Title::new("Ship the release notes")?;
    Ok(Task::new(title, None, None, clock))
}

fn deadline(raw: &str) -> Deadline {
    Deadline::parse(raw).expect("valid deadline literal")
}

#[rstest]
fn task_id_round_trips_through_string(clock: DefaultClock) -> eyre::Result<()> {
    let task = open_task(&clock)?;
    let parsed = TaskId::parse(&task.id().to_string())?;
    ensure!(parsed == task.id());
    Ok(())
}

#[rstest]
#[case("")]
#[case("not-a-uuid")]
#[case("1234")]
fn identifier_parse_rejects_malformed_input(#[case] raw: &str) {
    assert!(matches!(
        TaskId::parse(raw),
        Err(DomainError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        ProjectId::parse(raw),
        Err(DomainError::InvalidIdentifier(_))
    ));
}

#[rstest]
fn title_trims_and_validates() -> eyre::Result<()> {
    let title = Title::new("  Plan sprint  ")?;
    ensure!(title.as_str() == "Plan sprint");

    ensure!(matches!(Title::new("   "), Err(DomainError::EmptyTitle)));
    let oversized = "x".repeat(Title::MAX_LENGTH + 1);
    ensure!(matches!(
        Title::new(oversized),
        Err(DomainError::TitleTooLong { .. })
    ));
    Ok(())
}

#[rstest]
fn deadline_parse_normalizes_offsets_to_utc() -> eyre::Result<()> {
    let offset = Deadline::parse("2025-12-31T23:00:00+02:00")?;
    let utc = Deadline::parse("2025-12-31T21:00:00Z")?;
    ensure!(offset == utc);
    Ok(())
}

#[rstest]
#[case("tomorrow")]
#[case("2025-13-01T00:00:00Z")]
#[case("")]
fn deadline_parse_rejects_malformed_input(#[case] raw: &str) {
    assert!(matches!(
        Deadline::parse(raw),
        Err(DomainError::InvalidDeadline(_))
    ));
}

#[rstest]
fn deadline_accepts_past_instants() -> eyre::Result<()> {
    // Past deadlines are valid values; only cross-entity rules constrain
    // them.
    let past = Deadline::parse("1999-01-01T00:00:00Z")?;
    ensure!(past.is_before(deadline("2025-01-01T00:00:00Z")));
    Ok(())
}

#[rstest]
fn complete_then_complete_again_fails(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    task.complete(&clock)?;
    ensure!(task.status() == CompletionStatus::Completed);

    let result = task.complete(&clock);
    let expected = Err(DomainError::TaskAlreadyCompleted(task.id()));
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task.is_completed());
    Ok(())
}

#[rstest]
fn reopen_on_open_task_fails(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    let result = task.reopen(&clock);
    let expected = Err(DomainError::TaskNotCompleted(task.id()));
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(!task.is_completed());
    Ok(())
}

#[rstest]
fn complete_and_reopen_emit_events_in_order(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    task.complete(&clock)?;
    task.reopen(&clock)?;

    let events = task.take_events();
    let kinds: Vec<&str> = events.iter().map(DomainEvent::kind).collect();
    ensure!(kinds == ["task_created", "task_completed", "task_reopened"]);
    ensure!(task.take_events().is_empty());
    Ok(())
}

#[rstest]
fn reschedule_within_project_deadline_succeeds(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    task.reschedule(
        deadline("2025-12-20T00:00:00Z"),
        Some(deadline("2025-12-31T00:00:00Z")),
        &clock,
    )?;
    ensure!(task.deadline() == Some(deadline("2025-12-20T00:00:00Z")));
    Ok(())
}

#[rstest]
fn reschedule_beyond_project_deadline_is_rejected_without_mutation(
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    let result = task.reschedule(
        deadline("2026-01-01T00:00:00Z"),
        Some(deadline("2025-12-31T00:00:00Z")),
        &clock,
    );
    ensure!(matches!(
        result,
        Err(DomainError::DeadlineExceedsProject { .. })
    ));
    ensure!(task.deadline().is_none());
    Ok(())
}

#[rstest]
fn link_rejects_second_project(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    let first = ProjectId::new();
    let second = ProjectId::new();
    let limit = deadline("2025-12-31T00:00:00Z");

    task.link_to_project(first, limit, &clock)?;
    // Re-linking to the same project is a no-op.
    task.link_to_project(first, limit, &clock)?;
    ensure!(task.project_id() == Some(first));

    let result = task.link_to_project(second, limit, &clock);
    let expected = Err(DomainError::TaskAlreadyLinked {
        task_id: task.id(),
        project_id: first,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[rstest]
fn link_rejects_task_deadline_beyond_project(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    task.reschedule(deadline("2026-01-01T00:00:00Z"), None, &clock)?;

    let result = task.link_to_project(ProjectId::new(), deadline("2025-12-31T00:00:00Z"), &clock);
    ensure!(matches!(
        result,
        Err(DomainError::DeadlineExceedsProject { .. })
    ));
    ensure!(task.project_id().is_none());
    Ok(())
}

#[rstest]
fn unlink_is_idempotent(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = open_task(&clock)?;
    task.link_to_project(ProjectId::new(), deadline("2025-12-31T00:00:00Z"), &clock)?;
    task.take_events();

    task.unlink_from_project(&clock);
    ensure!(task.project_id().is_none());
    let first_pass = task.take_events();
    ensure!(first_pass.len() == 1);
    ensure!(first_pass.first().map(DomainEvent::kind) == Some("task_unlinked"));

    let updated_at = task.updated_at();
    task.unlink_from_project(&clock);
    ensure!(task.take_events().is_empty());
    ensure!(task.updated_at() == updated_at);
    Ok(())
}

#[rstest]
fn overdue_requires_open_state_and_past_deadline(clock: DefaultClock) -> eyre::Result<()> {
    let now = deadline("2025-06-01T00:00:00Z").into_inner();
    let mut task = open_task(&clock)?;
    ensure!(!task.is_overdue(now));

    task.reschedule(deadline("2025-05-01T00:00:00Z"), None, &clock)?;
    ensure!(task.is_overdue(now));

    task.complete(&clock)?;
    ensure!(!task.is_overdue(now));
    Ok(())
}
