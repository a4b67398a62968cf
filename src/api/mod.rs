//! Request dispatcher: maps API requests onto the auth engine and the
//! vault manager, and core outcomes onto status codes.
//!
//! This layer is transport-agnostic.  A server (or a test) builds a
//! `Request` from whatever it received and writes the `Response` back;
//! no sockets are involved here.
//!
//! Every `/api/passwords` route authenticates first: the bearer token is
//! validated and only the resulting user id reaches the vault manager.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::errors::CredVaultError;

const PASSWORDS_PATH: &str = "/api/passwords";
const PASSWORDS_PREFIX: &str = "/api/passwords/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl Method {
    /// Parse an HTTP method name.  Unknown methods return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Raw `Authorization` header value, if any.
    pub authorization: Option<String>,
    /// Raw JSON body, if any.
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            authorization: None,
            body: None,
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.authorization = Some(format!("Bearer {token}"));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn message(status: u16, message: &str) -> Self {
        Self::new(status, json!({ "message": message }))
    }

    fn error(status: u16, error: &str) -> Self {
        Self::new(status, json!({ "error": error }))
    }
}

/// Username/password body of register and login.
#[derive(Debug, Default, Deserialize)]
struct CredentialsBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// Body of entry add and update.
#[derive(Debug, Default, Deserialize)]
struct EntryBody {
    #[serde(default)]
    site: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

pub struct Dispatcher {
    app: App,
}

impl Dispatcher {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn handle(&self, request: &Request) -> Response {
        let response = self.route(request);
        tracing::info!(
            method = ?request.method,
            path = %request.path,
            status = response.status,
            "request handled"
        );
        response
    }

    fn route(&self, request: &Request) -> Response {
        let path = request.path.as_str();
        match path {
            "/api/register" => match request.method {
                Method::Post => self.register(request),
                _ => method_not_allowed(),
            },
            "/api/login" => match request.method {
                Method::Post => self.login(request),
                _ => method_not_allowed(),
            },
            _ if path == PASSWORDS_PATH || path.starts_with(PASSWORDS_PREFIX) => {
                self.passwords(request)
            }
            _ => Response::error(404, "Endpoint not found"),
        }
    }

    fn register(&self, request: &Request) -> Response {
        let Some(body) = parse_body::<CredentialsBody>(request) else {
            return Response::error(400, "Username and password required");
        };
        let (Some(username), Some(password)) = (body.username, body.password) else {
            return Response::error(400, "Username and password required");
        };

        match self.app.auth.register(&username, &password) {
            Ok(user) => {
                self.app.record("register", Some(&user.id), None, "ok");
                Response::message(201, "User registered successfully")
            }
            Err(CredVaultError::Validation(msg)) => Response::error(400, &msg),
            Err(CredVaultError::Conflict(_)) => {
                self.app.record("register", None, None, "conflict");
                Response::error(409, "User already exists")
            }
            Err(e) => server_error(&e),
        }
    }

    fn login(&self, request: &Request) -> Response {
        let Some(body) = parse_body::<CredentialsBody>(request) else {
            return Response::error(400, "Username and password required");
        };
        let (Some(username), Some(password)) = (body.username, body.password) else {
            return Response::error(400, "Username and password required");
        };

        match self.app.auth.authenticate(&username, &password) {
            Ok(Some(token)) => {
                let user_id = self.app.auth.validate(&token);
                self.app.record("login", user_id.as_deref(), None, "ok");
                Response::new(200, json!({ "token": token, "username": username }))
            }
            Ok(None) => {
                self.app.record("login", None, None, "rejected");
                Response::error(401, "Invalid credentials")
            }
            Err(e) => server_error(&e),
        }
    }

    fn passwords(&self, request: &Request) -> Response {
        if request.method == Method::Options {
            return Response::new(200, Value::Null);
        }

        let Some(token) = bearer_token(request) else {
            return Response::error(401, "Access token required");
        };
        let Some(user_id) = self.app.auth.validate(token) else {
            return Response::error(403, "Invalid token");
        };

        let entry_id = request
            .path
            .strip_prefix(PASSWORDS_PREFIX)
            .filter(|id| !id.is_empty());

        match (request.method, entry_id) {
            (Method::Get, None) => self.list(&user_id),
            (Method::Post, None) => self.add(&user_id, request),
            (Method::Put, Some(id)) => self.update(&user_id, id, request),
            (Method::Delete, Some(id)) => self.delete(&user_id, id),
            _ => Response::error(404, "Endpoint not found"),
        }
    }

    fn list(&self, user_id: &str) -> Response {
        match self.app.vault.list(user_id) {
            Ok(entries) => match serde_json::to_value(entries) {
                Ok(body) => Response::new(200, body),
                Err(e) => server_error(&CredVaultError::Serialization(e.to_string())),
            },
            Err(e) => server_error(&e),
        }
    }

    fn add(&self, user_id: &str, request: &Request) -> Response {
        let body = parse_body::<EntryBody>(request).unwrap_or_default();
        let (Some(site), Some(username), Some(secret)) = (body.site, body.username, body.password)
        else {
            return Response::error(400, "Site, username, and password required");
        };

        match self.app.vault.add(user_id, &site, &username, &secret) {
            Ok(entry) => {
                self.app.record("add", Some(user_id), Some(&entry.id), "ok");
                Response::new(
                    201,
                    json!({ "message": "Password saved successfully", "id": entry.id }),
                )
            }
            Err(CredVaultError::Validation(msg)) => Response::error(400, &msg),
            Err(e) => server_error(&e),
        }
    }

    fn update(&self, user_id: &str, entry_id: &str, request: &Request) -> Response {
        let body = parse_body::<EntryBody>(request).unwrap_or_default();
        let (Some(site), Some(username), Some(secret)) = (body.site, body.username, body.password)
        else {
            return Response::error(400, "Site, username, and password required");
        };

        match self.app.vault.update(user_id, entry_id, &site, &username, &secret) {
            Ok(true) => {
                self.app.record("update", Some(user_id), Some(entry_id), "ok");
                Response::message(200, "Password updated successfully")
            }
            Ok(false) => {
                self.app
                    .record("update", Some(user_id), Some(entry_id), "not found");
                Response::error(404, "Password not found")
            }
            Err(CredVaultError::Validation(msg)) => Response::error(400, &msg),
            Err(e) => server_error(&e),
        }
    }

    fn delete(&self, user_id: &str, entry_id: &str) -> Response {
        match self.app.vault.delete(user_id, entry_id) {
            Ok(true) => {
                self.app.record("delete", Some(user_id), Some(entry_id), "ok");
                Response::message(200, "Password deleted successfully")
            }
            Ok(false) => {
                self.app
                    .record("delete", Some(user_id), Some(entry_id), "not found");
                Response::error(404, "Password not found")
            }
            Err(e) => server_error(&e),
        }
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(request: &Request) -> Option<T> {
    let raw = request.body.as_deref()?;
    match serde_json::from_str(raw) {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::debug!(error = %e, "unparseable request body");
            None
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .authorization
        .as_deref()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn method_not_allowed() -> Response {
    Response::error(405, "Method not allowed")
}

fn server_error(error: &CredVaultError) -> Response {
    tracing::error!(error = %error, persistence = error.is_persistence(), "request failed");
    Response::error(500, "Server error")
}
