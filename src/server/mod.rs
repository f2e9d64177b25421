//! In-process local backend
//!
//! `LocalServer` answers the same REST contract as the remote API from JSON
//! files in the data directory. It validates inputs, enforces unique business
//! keys and the period rules, stamps the acting user and writes every
//! mutation to the audit log.

pub mod handler;
pub mod params;

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::api::envelope::{codes, ApiError};
use crate::api::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::audit::AuditLogger;
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;
use crate::models::{
    Account, AccountingPeriod, ChartOfAccounts, Company, Currency, Customer, EconomicGroup,
    ExchangeRate, Resource, Supplier, UserCompanyPermission,
};
use crate::storage::Storage;

use handler::{CollectionHandler, RequestContext, ResourceHandler};
use params::ListParams;

pub struct LocalServer {
    routes: HashMap<&'static str, Box<dyn ResourceHandler>>,
    audit: AuditLogger,
    user_id: Option<String>,
}

impl LocalServer {
    /// Open the data directory and load every collection
    pub fn open(paths: &LedgerPaths, user_id: Option<String>) -> LedgerResult<Self> {
        let storage = Storage::new(paths.clone())?;
        let mut server = Self {
            routes: HashMap::new(),
            audit: AuditLogger::new(paths.audit_log()),
            user_id,
        };

        server.mount::<EconomicGroup>(&storage)?;
        server.mount::<Company>(&storage)?;
        server.mount::<Customer>(&storage)?;
        server.mount::<Supplier>(&storage)?;
        server.mount::<Currency>(&storage)?;
        server.mount::<ExchangeRate>(&storage)?;
        server.mount::<AccountingPeriod>(&storage)?;
        server.mount::<ChartOfAccounts>(&storage)?;
        server.mount::<Account>(&storage)?;
        server.mount::<UserCompanyPermission>(&storage)?;

        log::debug!("Local backend opened at {}", paths.base_dir().display());
        Ok(server)
    }

    fn mount<R: Resource>(&mut self, storage: &Storage) -> LedgerResult<()> {
        self.routes
            .insert(R::PATH, Box::new(CollectionHandler::<R>::open(storage)?));
        Ok(())
    }

    fn route(&self, request: &ApiRequest) -> Result<(u16, Value), ApiError> {
        let no_route = || {
            ApiError::new(
                404,
                codes::NOT_FOUND,
                format!("No route for {} {}", request.method, request.path),
            )
        };

        let path = request
            .path
            .strip_prefix("/api/")
            .ok_or_else(no_route)?
            .trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').collect();
        let handler = self.routes.get(segments[0]).ok_or_else(no_route)?;

        let ctx = RequestContext {
            user_id: self.user_id.clone(),
            audit: &self.audit,
        };

        match (request.method, &segments[1..]) {
            (Method::Get, []) => handler.list(&ListParams::parse(&request.query)?),
            (Method::Post, []) => handler.create(body(request)?, &ctx),
            (Method::Get, [id]) => handler.get(id),
            (Method::Put, [id]) => handler.update(id, body(request)?, &ctx),
            (Method::Delete, [id]) => handler.delete(id, &ctx),
            (Method::Post, [id, action]) => handler.action(id, action, &ctx),
            _ => Err(no_route()),
        }
    }
}

fn body(request: &ApiRequest) -> Result<Value, ApiError> {
    request
        .body
        .clone()
        .ok_or_else(|| ApiError::new(400, codes::BAD_REQUEST, "Request body is required"))
}

impl Transport for LocalServer {
    fn execute(&self, request: &ApiRequest) -> LedgerResult<ApiResponse> {
        log::debug!("{} {} {:?}", request.method, request.path, request.query);
        let response = match self.route(request) {
            Ok((status, body)) => ApiResponse { status, body },
            Err(error) => ApiResponse {
                status: error.status,
                body: json!({ "error": error }),
            },
        };
        log::debug!("{} {} -> {}", request.method, request.path, response.status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EconomicGroupId, PeriodInput};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn server() -> (TempDir, LocalServer) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let server = LocalServer::open(&paths, Some("ana".into())).unwrap();
        (temp_dir, server)
    }

    fn call(server: &LocalServer, request: ApiRequest) -> ApiResponse {
        server.execute(&request).unwrap()
    }

    fn post_period(server: &LocalServer, group: EconomicGroupId) -> ApiResponse {
        let input = PeriodInput::month(group, 2025, 3).unwrap();
        call(
            server,
            ApiRequest::new(Method::Post, "/api/accounting-periods")
                .body(serde_json::to_value(input).unwrap()),
        )
    }

    fn create_period(server: &LocalServer) -> String {
        let response = post_period(server, EconomicGroupId::new());
        assert_eq!(response.status, 201);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Make the next atomic write of a collection fail
    fn block_writes(temp: &TempDir, resource: &str) -> std::path::PathBuf {
        let blocker = temp
            .path()
            .join("data")
            .join(format!("{}.json.tmp", resource));
        std::fs::create_dir_all(&blocker).unwrap();
        blocker
    }

    #[test]
    fn test_unknown_route() {
        let (_t, server) = server();
        let response = call(&server, ApiRequest::new(Method::Get, "/api/journals"));
        assert_eq!(response.status, 404);
        assert_eq!(response.body["error"]["code"], "NOT_FOUND");
    }

    #[test]
    fn test_create_validation_error() {
        let (_t, server) = server();
        let response = call(
            &server,
            ApiRequest::new(Method::Post, "/api/economic-groups")
                .body(json!({"code": "", "name": "Holding"})),
        );
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(response.body["error"]["details"]["code"], "is required");
    }

    #[test]
    fn test_duplicate_code_conflict() {
        let (_t, server) = server();
        let body = json!({"code": "HOLD", "name": "Holding"});
        let first = call(
            &server,
            ApiRequest::new(Method::Post, "/api/economic-groups").body(body.clone()),
        );
        assert_eq!(first.status, 201);

        let second = call(
            &server,
            ApiRequest::new(Method::Post, "/api/economic-groups").body(body),
        );
        assert_eq!(second.status, 409);
        assert_eq!(second.body["error"]["details"]["code"], "already exists");
    }

    #[test]
    fn test_close_stamps_user_and_rejects_twice() {
        let (_t, server) = server();
        let id = create_period(&server);
        let close = format!("/api/accounting-periods/{}/close", id);

        let response = call(&server, ApiRequest::new(Method::Post, close.clone()));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["data"]["closed"], true);
        assert_eq!(response.body["data"]["closedBy"], "ana");

        let again = call(&server, ApiRequest::new(Method::Post, close));
        assert_eq!(again.status, 422);
        assert_eq!(again.body["error"]["rule"], "PERIOD_ALREADY_CLOSED");
    }

    #[test]
    fn test_closed_period_cannot_be_deleted() {
        let (_t, server) = server();
        let id = create_period(&server);
        call(
            &server,
            ApiRequest::new(Method::Post, format!("/api/accounting-periods/{}/close", id)),
        );

        let response = call(
            &server,
            ApiRequest::new(Method::Delete, format!("/api/accounting-periods/{}", id)),
        );
        assert_eq!(response.status, 422);
        assert_eq!(response.body["error"]["rule"], "PERIOD_CLOSED");
    }

    #[test]
    fn test_list_pagination_and_unknown_facet() {
        let (_t, server) = server();
        for i in 0..25 {
            call(
                &server,
                ApiRequest::new(Method::Post, "/api/economic-groups")
                    .body(json!({"code": format!("G{:02}", i), "name": format!("Group {}", i)})),
            );
        }

        let response = call(
            &server,
            ApiRequest::new(Method::Get, "/api/economic-groups").query(vec![
                ("page".into(), "3".into()),
                ("limit".into(), "10".into()),
                ("colour".into(), "blue".into()),
            ]),
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["data"].as_array().unwrap().len(), 5);
        assert_eq!(response.body["pagination"]["totalPages"], 3);
        assert_eq!(response.body["pagination"]["total"], 25);
    }

    #[test]
    fn test_soft_delete_keeps_record() {
        let (_t, server) = server();
        let created = call(
            &server,
            ApiRequest::new(Method::Post, "/api/currencies")
                .body(json!({"code": "CLP", "name": "Chilean Peso", "symbol": "$", "decimals": 0})),
        );
        let id = created.body["data"]["id"].as_str().unwrap().to_string();

        let deleted = call(
            &server,
            ApiRequest::new(Method::Delete, format!("/api/currencies/{}", id)),
        );
        assert_eq!(deleted.status, 200);
        assert_eq!(deleted.body["data"]["isActive"], false);

        let inactive = call(
            &server,
            ApiRequest::new(Method::Get, "/api/currencies")
                .query(vec![("isActive".into(), "false".into())]),
        );
        assert_eq!(inactive.body["pagination"]["total"], 1);
    }

    #[test]
    fn test_mutations_are_audited() {
        let (temp, server) = server();
        let id = create_period(&server);
        call(
            &server,
            ApiRequest::new(Method::Post, format!("/api/accounting-periods/{}/close", id)),
        );

        let logger = AuditLogger::new(temp.path().join("audit.log"));
        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, crate::audit::Operation::Close);
        assert_eq!(entries[1].user_id.as_deref(), Some("ana"));
    }

    #[test]
    fn test_duplicate_period_in_group_conflicts() {
        let (_t, server) = server();
        let group = EconomicGroupId::new();
        assert_eq!(post_period(&server, group).status, 201);

        let second = post_period(&server, group);
        assert_eq!(second.status, 409);
        assert_eq!(second.body["error"]["code"], "CONFLICT");
        assert_eq!(second.body["error"]["details"]["fiscalYear"], "already exists");

        // Same month in another group is fine
        assert_eq!(post_period(&server, EconomicGroupId::new()).status, 201);
    }

    #[test]
    fn test_closed_period_cannot_be_updated() {
        let (_t, server) = server();
        let group = EconomicGroupId::new();
        let created = post_period(&server, group);
        let id = created.body["data"]["id"].as_str().unwrap().to_string();
        call(
            &server,
            ApiRequest::new(Method::Post, format!("/api/accounting-periods/{}/close", id)),
        );

        let mut input = PeriodInput::month(group, 2025, 3).unwrap();
        input.start_date = chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let response = call(
            &server,
            ApiRequest::new(Method::Put, format!("/api/accounting-periods/{}", id))
                .body(serde_json::to_value(input).unwrap()),
        );
        assert_eq!(response.status, 422);
        assert_eq!(response.body["error"]["code"], "BUSINESS_RULE");
        assert_eq!(response.body["error"]["rule"], "PERIOD_CLOSED");

        let unchanged = call(
            &server,
            ApiRequest::new(Method::Get, format!("/api/accounting-periods/{}", id)),
        );
        assert_eq!(unchanged.body["data"]["startDate"], "2025-03-01");
    }

    #[test]
    fn test_failed_save_leaves_no_phantom_row() {
        let (temp, server) = server();
        let blocker = block_writes(&temp, "economic-groups");
        let body = json!({"code": "HOLD", "name": "Holding"});

        let failed = call(
            &server,
            ApiRequest::new(Method::Post, "/api/economic-groups").body(body.clone()),
        );
        assert_eq!(failed.status, 500);
        assert_eq!(failed.body["error"]["code"], "INTERNAL_ERROR");

        let list = call(&server, ApiRequest::new(Method::Get, "/api/economic-groups"));
        assert_eq!(list.body["pagination"]["total"], 0);

        std::fs::remove_dir(&blocker).unwrap();
        let retry = call(
            &server,
            ApiRequest::new(Method::Post, "/api/economic-groups").body(body),
        );
        assert_eq!(retry.status, 201);

        let logger = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(logger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_delete_keeps_the_row() {
        let (temp, server) = server();
        let id = create_period(&server);
        let path = format!("/api/accounting-periods/{}", id);
        let blocker = block_writes(&temp, "accounting-periods");

        let failed = call(&server, ApiRequest::new(Method::Delete, path.clone()));
        assert_eq!(failed.status, 500);
        assert_eq!(call(&server, ApiRequest::new(Method::Get, path.clone())).status, 200);

        std::fs::remove_dir(&blocker).unwrap();
        assert_eq!(call(&server, ApiRequest::new(Method::Delete, path.clone())).status, 200);
        assert_eq!(call(&server, ApiRequest::new(Method::Get, path)).status, 404);
    }

    #[test]
    fn test_pages_are_stable_across_reopened_backends() {
        let temp = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp.path().to_path_buf());
        {
            let server = LocalServer::open(&paths, None).unwrap();
            for _ in 0..15 {
                assert_eq!(post_period(&server, EconomicGroupId::new()).status, 201);
            }
        }

        let page_ids = |page: u32| -> Vec<String> {
            let server = LocalServer::open(&paths, None).unwrap();
            let response = call(
                &server,
                ApiRequest::new(Method::Get, "/api/accounting-periods").query(vec![
                    ("page".into(), page.to_string()),
                    ("limit".into(), "10".into()),
                ]),
            );
            response.body["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["id"].as_str().unwrap().to_string())
                .collect()
        };

        for _ in 0..5 {
            let first = page_ids(1);
            let second = page_ids(2);
            assert_eq!(first.len(), 10);
            assert_eq!(second.len(), 5);

            let seen: HashSet<_> = first.iter().chain(second.iter()).collect();
            assert_eq!(seen.len(), 15);
        }
    }
}
