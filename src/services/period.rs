//! Accounting period service
//!
//! Adds the close and reopen action endpoints to the generic CRUD calls.

use std::ops::Deref;

use super::entity::EntityService;
use crate::api::ApiClient;
use crate::error::LedgerResult;
use crate::models::{AccountingPeriod, PeriodId};

pub struct PeriodService<'a> {
    inner: EntityService<'a, AccountingPeriod>,
}

impl<'a> PeriodService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: EntityService::new(client),
        }
    }

    /// Close an open period; the server stamps `closedAt` and `closedBy`
    pub fn close(&self, id: PeriodId) -> LedgerResult<AccountingPeriod> {
        self.inner.client().action::<AccountingPeriod>(id, "close")
    }

    /// Reopen a closed period, clearing `closedAt` and `closedBy`
    pub fn reopen(&self, id: PeriodId) -> LedgerResult<AccountingPeriod> {
        self.inner.client().action::<AccountingPeriod>(id, "reopen")
    }
}

impl<'a> Deref for PeriodService<'a> {
    type Target = EntityService<'a, AccountingPeriod>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{EconomicGroupId, PeriodInput};
    use crate::server::LocalServer;
    use tempfile::TempDir;

    #[test]
    fn test_close_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let client = ApiClient::new(LocalServer::open(&paths, Some("ana".into())).unwrap());
        let service = PeriodService::new(&client);

        let input = PeriodInput::quarter(EconomicGroupId::new(), 2025, 1).unwrap();
        let period = service.create(&input).unwrap();
        assert!(!period.closed);

        let closed = service.close(period.id).unwrap();
        assert!(closed.closed);
        assert_eq!(closed.closed_by.as_deref(), Some("ana"));
        assert!(closed.closed_at.is_some());

        let err = service.close(period.id).unwrap_err();
        assert_eq!(err.rule(), Some("PERIOD_ALREADY_CLOSED"));

        let reopened = service.reopen(period.id).unwrap();
        assert!(!reopened.closed);
        assert!(reopened.closed_at.is_none());
        assert!(reopened.closed_by.is_none());

        let err = service.reopen(period.id).unwrap_err();
        assert_eq!(err.rule(), Some("PERIOD_NOT_CLOSED"));
    }
}
