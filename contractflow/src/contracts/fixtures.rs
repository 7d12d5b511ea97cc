//! Ready-made contracts for the user and order APIs.
//!
//! Useful as smoke tests for a provider and as worked examples of the
//! contract builders.

use serde_json::json;

use super::consumer::{ConsumerContract, Interaction, InteractionRequest, InteractionResponse};
use super::definition::Contract;
use crate::errors::Result;
use crate::schema::{ObjectSchema, Schema, StringSchema};

fn user_schema() -> Schema {
    ObjectSchema::new()
        .required_property("id", Schema::integer())
        .required_property("username", Schema::string())
        .required_property("email", Schema::email())
        .build()
}

/// `GET /api/users/{id}` returning a single user.
pub fn get_user_contract() -> Result<Contract> {
    Contract::builder("GetUser", "GET", "/api/users/{id}")
        .description("Get user by ID")
        .response_schema(user_schema())
        .status(200)
        .build()
}

/// `POST /api/users` creating a user.
pub fn create_user_contract() -> Result<Contract> {
    Contract::builder("CreateUser", "POST", "/api/users")
        .description("Create a new user")
        .request_schema(
            ObjectSchema::new()
                .required_property("username", StringSchema::new().min_length(3).build())
                .required_property("email", Schema::email())
                .property("age", Schema::integer_between(Some(0.0), None))
                .build(),
        )
        .response_schema(
            ObjectSchema::new()
                .required_property("id", Schema::integer())
                .required_property("username", Schema::string())
                .required_property("email", Schema::string())
                .build(),
        )
        .status(201)
        .build()
}

/// `GET /api/users` listing users.
pub fn list_users_contract() -> Result<Contract> {
    Contract::builder("ListUsers", "GET", "/api/users")
        .description("List all users")
        .response_schema(
            ObjectSchema::new()
                .required_property(
                    "users",
                    Schema::array(
                        ObjectSchema::new()
                            .property("id", Schema::integer())
                            .property("username", Schema::string())
                            .property("email", Schema::string())
                            .build(),
                    ),
                )
                .required_property("count", Schema::integer())
                .build(),
        )
        .status(200)
        .build()
}

/// The mobile app's expectations of the user API.
#[must_use]
pub fn mobile_app_user_contract() -> ConsumerContract {
    ConsumerContract::new("MobileApp", "UserAPI")
        .with_interaction(Interaction::new(
            "Get user by ID",
            InteractionRequest::new("GET", "/api/users/1"),
            InteractionResponse::new(200).with_body(json!({
                "id": 1,
                "username": "string",
                "email": "string"
            })),
        ))
        .with_interaction(Interaction::new(
            "Create new user",
            InteractionRequest::new("POST", "/api/users").with_body(json!({
                "username": "john_doe",
                "email": "john@example.com"
            })),
            InteractionResponse::new(201).with_body(json!({
                "id": "integer",
                "username": "john_doe",
                "email": "john@example.com"
            })),
        ))
}

/// The web app's expectations of the order API.
#[must_use]
pub fn web_app_order_contract() -> ConsumerContract {
    ConsumerContract::new("WebApp", "OrderAPI").with_interaction(Interaction::new(
        "Get orders for user",
        InteractionRequest::new("GET", "/api/orders?user_id=1"),
        InteractionResponse::new(200).with_body(json!({
            "orders": "array",
            "count": "integer"
        })),
    ))
}
