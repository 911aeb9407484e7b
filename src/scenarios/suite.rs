//! The missed-calls API smoke suite
//!
//! Ordered step table. Later steps depend on tokens and ids captured by
//! earlier ones, so the order is significant.

use chrono::{DateTime, Local, Timelike};
use serde_json::json;

use super::{ShapeCheck, Step};
use crate::config::Credentials;
use crate::models::{CaptureKey, HttpMethod};

/// Phone number used for the created missed call
pub const TEST_CALLER_PHONE: &str = "6641234567";

/// Number of steps in the full suite
pub const SUITE_LEN: u8 = 18;

/// Username for the throwaway user, unique per second of the day
pub fn test_username(now: &DateTime<Local>) -> String {
    format!("testuser_{}", now.format("%H%M%S"))
}

/// Local ISO-8601 timestamp without offset; microseconds are omitted when zero
pub fn call_time(now: &DateTime<Local>) -> String {
    let local = now.naive_local();
    let pattern = if local.nanosecond() / 1_000 == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f"
    };
    local.format(pattern).to_string()
}

/// Build the full ordered suite
pub fn default_suite(credentials: &Credentials, now: DateTime<Local>) -> Vec<Step> {
    use CaptureKey::*;
    use HttpMethod::*;

    vec![
        Step::new(1, "API Health Check", Get, "", 200).category("Setup"),
        Step::new(2, "Initialize Users", Post, "init-users", 200).category("Setup"),
        Step::new(3, "Admin Login", Post, "auth/login", 200)
            .category("Auth")
            .body(json!({
                "username": credentials.admin_username,
                "password": credentials.admin_password,
            }))
            .capture("token", AdminToken),
        Step::new(4, "Worker Login", Post, "auth/login", 200)
            .category("Auth")
            .body(json!({
                "username": credentials.worker_username,
                "password": credentials.worker_password,
            }))
            .capture("token", WorkerToken),
        Step::new(5, "Invalid Login", Post, "auth/login", 401)
            .category("Auth")
            .body(json!({"username": "invalid", "password": "wrong"})),
        Step::new(6, "Get Me (Admin)", Get, "auth/me", 200)
            .category("Auth")
            .auth(AdminToken)
            .check(ShapeCheck::FieldEquals {
                field: "role",
                expected: "admin",
                detail: "username",
            }),
        Step::new(7, "Get Me (Worker)", Get, "auth/me", 200)
            .category("Auth")
            .auth(WorkerToken)
            .check(ShapeCheck::FieldEquals {
                field: "role",
                expected: "worker",
                detail: "username",
            }),
        Step::new(8, "Get Users (Admin)", Get, "users", 200)
            .category("Users")
            .auth(AdminToken)
            .check(ShapeCheck::IsList { noun: "users" }),
        Step::new(9, "Get Users (Worker - Forbidden)", Get, "users", 403)
            .category("Users")
            .auth(WorkerToken),
        Step::new(10, "Create User", Post, "users", 200)
            .category("Users")
            .body(json!({
                "username": test_username(&now),
                "password": "testpass123",
                "role": "worker",
            }))
            .auth(AdminToken)
            .capture("id", TestUserId),
        Step::new(11, "Create Missed Call", Post, "missed-calls", 200)
            .category("Calls")
            .body(json!({
                "caller_phone": TEST_CALLER_PHONE,
                "call_time": call_time(&now),
            }))
            .capture("id", TestCallId),
        Step::new(12, "Get Missed Calls", Get, "missed-calls", 200)
            .category("Calls")
            .auth(WorkerToken)
            .check(ShapeCheck::IsList {
                noun: "missed calls",
            }),
        Step::new(13, "Update Call Status", Put, "missed-calls/{test_call_id}", 200)
            .category("Calls")
            .body(json!({"status": "contacted"}))
            .auth(WorkerToken)
            .requires(TestCallId)
            .check(ShapeCheck::FieldEquals {
                field: "status",
                expected: "contacted",
                detail: "id",
            }),
        Step::new(14, "Create Note", Post, "notes", 200)
            .category("Notes")
            .body(json!({
                "missed_call_id": TestCallId.placeholder(),
                "content": "Test note from automated testing",
            }))
            .auth(WorkerToken)
            .requires(TestCallId)
            .capture("id", TestNoteId),
        Step::new(15, "Get Notes", Get, "notes/{test_call_id}", 200)
            .category("Notes")
            .auth(WorkerToken)
            .requires(TestCallId)
            .check(ShapeCheck::IsList {
                noun: "notes for call",
            }),
        Step::new(16, "Get Stats", Get, "stats", 200)
            .category("Stats")
            .auth(WorkerToken)
            .check(ShapeCheck::HasField {
                field: "total_calls",
                detail: &["pending_calls"],
            }),
        Step::new(17, "Change User Password", Put, "users/{test_user_id}/password", 200)
            .category("Users")
            .body(json!({"password": "newpassword123"}))
            .auth(AdminToken)
            .requires(TestUserId),
        Step::new(18, "Delete User", Delete, "users/{test_user_id}", 200)
            .category("Users")
            .auth(AdminToken)
            .requires(TestUserId),
    ]
}
