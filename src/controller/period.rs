//! Accounting period row actions and transitions
//!
//! Every transition asks for confirmation, calls the server, and on success
//! reloads the list. Local state is never changed ahead of the server.

use super::list::ListController;
use crate::models::AccountingPeriod;
use crate::services::PeriodService;

/// Which row actions are enabled for a period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRowActions {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_close: bool,
    pub can_reopen: bool,
}

impl PeriodRowActions {
    pub fn for_period(period: &AccountingPeriod) -> Self {
        let open = !period.closed;
        Self {
            can_edit: open,
            can_delete: open,
            can_close: open,
            can_reopen: !open,
        }
    }

    fn allows(&self, transition: Transition) -> bool {
        match transition {
            Transition::Close => self.can_close,
            Transition::Reopen => self.can_reopen,
            Transition::Delete => self.can_delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Close,
    Reopen,
    Delete,
}

impl Transition {
    pub fn prompt(&self, period: &AccountingPeriod) -> String {
        match self {
            Transition::Close => format!("Close period {}?", period.label()),
            Transition::Reopen => format!("Reopen period {}?", period.label()),
            Transition::Delete => format!("Delete period {}? This cannot be undone.", period.label()),
        }
    }
}

/// Result of a requested transition
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The action is disabled for the period's current state
    Blocked,
    /// The user declined the confirmation
    Cancelled,
    /// The server applied it; carries the updated period (`None` after delete)
    Applied(Option<AccountingPeriod>),
    /// The server refused or could not be reached; blocking alert text
    Failed(String),
}

/// Confirmation prompt
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything (`--yes`)
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Interactive yes/no prompt on the terminal
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Run a confirmed transition and reload the list when it succeeds
pub fn run_transition(
    service: &PeriodService,
    period: &AccountingPeriod,
    transition: Transition,
    confirm: &dyn Confirm,
    list: Option<&mut ListController<AccountingPeriod>>,
) -> Outcome {
    if !PeriodRowActions::for_period(period).allows(transition) {
        return Outcome::Blocked;
    }
    if !confirm.confirm(&transition.prompt(period)) {
        return Outcome::Cancelled;
    }

    let result = match transition {
        Transition::Close => service.close(period.id).map(Some),
        Transition::Reopen => service.reopen(period.id).map(Some),
        Transition::Delete => service.delete(period.id),
    };

    match result {
        Ok(updated) => {
            if let Some(list) = list {
                list.reload();
                list.load_if_needed(service);
            }
            Outcome::Applied(updated)
        }
        Err(e) => {
            log::warn!("{:?} {} failed: {}", transition, period.label(), e);
            Outcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::paths::LedgerPaths;
    use crate::models::{EconomicGroupId, PeriodInput, Resource};
    use crate::server::LocalServer;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Decline;

    impl Confirm for Decline {
        fn confirm(&self, _prompt: &str) -> bool {
            false
        }
    }

    fn setup() -> (TempDir, ApiClient) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let client = ApiClient::new(LocalServer::open(&paths, Some("ana".into())).unwrap());
        (temp_dir, client)
    }

    #[test]
    fn test_row_actions() {
        let mut period = AccountingPeriod::build(
            crate::models::PeriodId::new(),
            PeriodInput::fiscal_year(EconomicGroupId::new(), 2025).unwrap(),
            chrono::Utc::now(),
        );
        let open = PeriodRowActions::for_period(&period);
        assert!(open.can_edit && open.can_delete && open.can_close && !open.can_reopen);

        period.closed = true;
        let closed = PeriodRowActions::for_period(&period);
        assert!(!closed.can_edit && !closed.can_delete && !closed.can_close && closed.can_reopen);
    }

    #[test]
    fn test_cancel_leaves_period_open() {
        let (_t, client) = setup();
        let service = PeriodService::new(&client);
        let period = service
            .create(&PeriodInput::month(EconomicGroupId::new(), 2025, 3).unwrap())
            .unwrap();

        let outcome = run_transition(&service, &period, Transition::Close, &Decline, None);
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(!service.get(period.id).unwrap().closed);
    }

    #[test]
    fn test_close_reloads_list() {
        let (_t, client) = setup();
        let service = PeriodService::new(&client);
        let period = service
            .create(&PeriodInput::month(EconomicGroupId::new(), 2025, 3).unwrap())
            .unwrap();

        let mut list = ListController::<AccountingPeriod>::new(10, Duration::from_millis(400));
        list.refresh(&service);
        assert!(!list.items()[0].closed);

        let outcome =
            run_transition(&service, &period, Transition::Close, &AlwaysConfirm, Some(&mut list));
        assert!(matches!(outcome, Outcome::Applied(Some(ref p)) if p.closed));
        assert!(list.items()[0].closed);

        let fresh = list.items()[0].clone();
        assert_eq!(
            run_transition(&service, &fresh, Transition::Delete, &AlwaysConfirm, None),
            Outcome::Blocked
        );
    }

    #[test]
    fn test_server_rejection_is_failed_and_list_unchanged() {
        let (_t, client) = setup();
        let service = PeriodService::new(&client);
        let period = service
            .create(&PeriodInput::month(EconomicGroupId::new(), 2025, 3).unwrap())
            .unwrap();
        service.close(period.id).unwrap();

        let mut list = ListController::<AccountingPeriod>::new(10, Duration::from_millis(400));
        list.refresh(&service);
        let before = list.items().to_vec();

        // stale row still believes the period is open
        let outcome =
            run_transition(&service, &period, Transition::Close, &AlwaysConfirm, Some(&mut list));
        match outcome {
            Outcome::Failed(message) => assert!(message.contains("PERIOD_ALREADY_CLOSED")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(list.items(), before.as_slice());
        assert!(!list.needs_load());
    }
}
