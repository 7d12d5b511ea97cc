//! Canned response payloads and a preconfigured user API stub.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::engine::MockDispatchEngine;
use super::rule::MockRule;

/// Family of canned payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    /// User API payloads.
    User,
    /// Order API payloads.
    Order,
    /// Generic error payloads.
    Error,
}

/// Looks up a canned payload such as `(User, "get_user")`.
#[must_use]
pub fn canned_response(category: ResponseCategory, name: &str) -> Option<Value> {
    let value = match (category, name) {
        (ResponseCategory::User, "get_user") => json!({
            "id": 1, "username": "john_doe", "email": "john@example.com", "age": 30, "city": "New York"
        }),
        (ResponseCategory::User, "list_users") => json!({
            "users": [
                {"id": 1, "username": "john_doe", "email": "john@example.com"},
                {"id": 2, "username": "jane_doe", "email": "jane@example.com"},
                {"id": 3, "username": "bob_smith", "email": "bob@example.com"}
            ],
            "count": 3
        }),
        (ResponseCategory::User, "create_user") => json!({
            "id": 4, "username": "new_user", "email": "new@example.com", "message": "User created successfully"
        }),
        (ResponseCategory::User, "user_not_found") => error_body("Not Found", "User not found"),
        (ResponseCategory::Order, "get_order") => json!({
            "id": 1, "user_id": 1, "product": "Laptop", "quantity": 1, "price": 999.99, "status": "confirmed"
        }),
        (ResponseCategory::Order, "list_orders") => json!({
            "orders": [
                {"id": 1, "user_id": 1, "product": "Laptop", "price": 999.99},
                {"id": 2, "user_id": 1, "product": "Mouse", "price": 29.99}
            ],
            "count": 2
        }),
        (ResponseCategory::Order, "create_order") => json!({
            "id": 3, "user_id": 1, "product": "Keyboard", "quantity": 1, "price": 79.99,
            "status": "pending", "message": "Order created successfully"
        }),
        (ResponseCategory::Error, "bad_request") => error_body("Bad Request", "Invalid request data"),
        (ResponseCategory::Error, "unauthorized") => error_body("Unauthorized", "Authentication required"),
        (ResponseCategory::Error, "forbidden") => error_body("Forbidden", "Access denied"),
        (ResponseCategory::Error, "not_found") => error_body("Not Found", "Resource not found"),
        (ResponseCategory::Error, "internal_error") => {
            error_body("Internal Server Error", "An unexpected error occurred")
        }
        _ => return None,
    };
    Some(value)
}

fn error_body(error: &str, message: &str) -> Value {
    json!({"error": error, "message": message})
}

/// An engine answering the user API's list, get and create endpoints.
#[must_use]
pub fn user_api_engine() -> MockDispatchEngine {
    let engine = MockDispatchEngine::new("UserAPI");
    let canned = |name: &str| canned_response(ResponseCategory::User, name).unwrap_or(Value::Null);

    engine.add_mock(MockRule::new("GET", "/api/users").respond(200, canned("list_users")));
    engine.add_mock(MockRule::new("GET", "/api/users/{id}").respond(200, canned("get_user")));
    engine.add_mock(MockRule::new("POST", "/api/users").respond(201, canned("create_user")));
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::fixtures;
    use crate::validator::ContractRunner;

    #[test]
    fn test_lookup() {
        assert_eq!(canned_response(ResponseCategory::User, "get_user").unwrap()["username"], "john_doe");
        assert_eq!(canned_response(ResponseCategory::Error, "forbidden").unwrap()["error"], "Forbidden");
        assert!(canned_response(ResponseCategory::Order, "get_user").is_none());
    }

    #[tokio::test]
    async fn test_user_api_engine_satisfies_user_contracts() {
        let engine = user_api_engine();
        let runner = ContractRunner::new();

        for contract in [
            fixtures::get_user_contract().unwrap(),
            fixtures::create_user_contract().unwrap(),
            fixtures::list_users_contract().unwrap(),
        ] {
            let result = runner.run(&contract, &engine).await;
            assert!(result.passed, "{}: {:?}", contract.name, result.failure_messages());
        }
        assert_eq!(engine.call_count(), 3);
    }
}
