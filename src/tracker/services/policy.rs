//! Configurable business policies threaded into each command execution.

/// Behavior when deleting a project that still has member tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectDeletePolicy {
    /// Unlink surviving tasks inside the same commit, then delete the
    /// project. Tasks are never cascade-deleted.
    #[default]
    UnlinkTasks,
    /// Reject deletion while any task remains linked.
    RequireEmpty,
}

/// Immutable policy input to every command execution.
///
/// Held by value on each service rather than as process-wide state, so
/// commands stay deterministic and independently testable under either
/// setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerPolicy {
    /// Completing the last open member task auto-completes the project.
    pub auto_complete_projects: bool,
    /// A project with zero member tasks may be completed.
    pub complete_empty_projects: bool,
    /// What happens to member tasks when their project is deleted.
    pub on_project_delete: ProjectDeletePolicy,
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            auto_complete_projects: true,
            complete_empty_projects: true,
            on_project_delete: ProjectDeletePolicy::default(),
        }
    }
}
