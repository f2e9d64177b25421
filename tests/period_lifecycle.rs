use std::time::Duration;

use chrono::NaiveDate;
use tempfile::TempDir;

use ledgerdesk::api::{ApiClient, ListQuery};
use ledgerdesk::config::LedgerPaths;
use ledgerdesk::controller::{
    run_transition, AlwaysConfirm, ListController, Outcome, PeriodRowActions, Transition,
};
use ledgerdesk::models::{AccountingPeriod, EconomicGroup, EconomicGroupInput, PeriodInput, PeriodType};
use ledgerdesk::services::{EntityService, PeriodService};

fn local_client(dir: &TempDir) -> ApiClient {
    let paths = LedgerPaths::with_base_dir(dir.path().to_path_buf());
    ApiClient::new(ledgerdesk::server::LocalServer::open(&paths, Some("maria".into())).unwrap())
}

#[test]
fn month_period_close_reopen_scenario() {
    let dir = TempDir::new().unwrap();
    let client = local_client(&dir);

    let group = EntityService::<EconomicGroup>::new(&client)
        .create(&EconomicGroupInput::new("HOLD", "Holding"))
        .unwrap();

    let service = PeriodService::new(&client);
    let input = PeriodInput::month(group.id, 2025, 3).unwrap();
    assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    assert_eq!(input.end_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    let created = service.create(&input).unwrap();

    let scope = ListQuery::new(1, 10).facet("economicGroupId", group.id);
    let mut list = ListController::<AccountingPeriod>::new(10, Duration::from_millis(400))
        .with_query(scope);
    list.refresh(&service);

    // Listed open, identical to what was created
    assert_eq!(list.items().len(), 1);
    let listed = list.items()[0].clone();
    assert_eq!(listed, created);
    assert_eq!(listed.period_type, PeriodType::Month);
    assert_eq!(listed.fiscal_year, 2025);
    assert_eq!(listed.month, Some(3));
    assert!(!listed.closed);
    assert!(PeriodRowActions::for_period(&listed).can_delete);

    // Close: list reloads from the server
    let outcome = run_transition(&service, &listed, Transition::Close, &AlwaysConfirm, Some(&mut list));
    assert!(matches!(outcome, Outcome::Applied(Some(_))));
    let closed = list.items()[0].clone();
    assert!(closed.closed);
    assert_eq!(closed.closed_by.as_deref(), Some("maria"));
    let actions = PeriodRowActions::for_period(&closed);
    assert!(!actions.can_delete && !actions.can_edit && actions.can_reopen);

    // Delete is disabled on the row and refused by the server
    assert_eq!(
        run_transition(&service, &closed, Transition::Delete, &AlwaysConfirm, None),
        Outcome::Blocked
    );
    let err = service.delete(closed.id).unwrap_err();
    assert_eq!(err.rule(), Some("PERIOD_CLOSED"));

    // Reopen restores edit and delete
    let outcome = run_transition(&service, &closed, Transition::Reopen, &AlwaysConfirm, Some(&mut list));
    assert!(matches!(outcome, Outcome::Applied(Some(_))));
    let reopened = list.items()[0].clone();
    assert!(!reopened.closed);
    let actions = PeriodRowActions::for_period(&reopened);
    assert!(actions.can_delete && actions.can_edit && actions.can_close);
}

#[test]
fn pagination_over_local_backend() {
    let dir = TempDir::new().unwrap();
    let client = local_client(&dir);
    let groups = EntityService::<EconomicGroup>::new(&client);

    for i in 0..23 {
        groups
            .create(&EconomicGroupInput::new(format!("G{:02}", i), format!("Group {}", i)))
            .unwrap();
    }

    let page = groups.list(&ListQuery::new(3, 10)).unwrap();
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.pagination.total, 23);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(!page.pagination.has_next());

    let found = groups.list(&ListQuery::new(1, 10).search("group 1")).unwrap();
    // "Group 1" and "Group 10".."Group 19"
    assert_eq!(found.pagination.total, 11);
}

#[test]
fn data_survives_reopening_the_backend() {
    let dir = TempDir::new().unwrap();
    let id = {
        let client = local_client(&dir);
        EntityService::<EconomicGroup>::new(&client)
            .create(&EconomicGroupInput::new("HOLD", "Holding"))
            .unwrap()
            .id
    };

    let client = local_client(&dir);
    let group = EntityService::<EconomicGroup>::new(&client).find("hold").unwrap();
    assert_eq!(group.id, id);
}
