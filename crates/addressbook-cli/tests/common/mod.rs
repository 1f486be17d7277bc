// crates/addressbook-cli/tests/common/mod.rs
// ============================================================================
// Module: Address Book Test Double
// Description: In-memory address book server on loopback for integration tests.
// Purpose: Serve every walkthrough endpoint and record what each request carried.
// Dependencies: addressbook-client, serde_json, tiny_http
// ============================================================================

//! ## Overview
//! [`AddressBookDouble`] answers the same routes and reply shapes as the real
//! address book server: `{"id": N}` on create, `{"token", "user"}` on token
//! issuance, empty bodies on deletes and membership changes, and
//! `{"error": "..."}` with a 4xx/5xx status on failure. Search is a
//! case-insensitive substring match. Routes can be overridden to inject
//! failures.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Shared helpers are not used by every test binary."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use addressbook_client::AddressBookClient;
use addressbook_client::ClientConfig;
use addressbook_client::Url;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Recorded Requests
// ============================================================================

/// What the double saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path without query string.
    pub path: String,
    /// `Authorization` header value, if any.
    pub authorization: Option<String>,
    /// Parsed JSON body, if any.
    pub body: Option<Value>,
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Registered account.
struct UserRow {
    /// Account identifier.
    id: u64,
    /// Login name; unique across accounts.
    username: String,
    /// Plain-text password checked on token issuance.
    password: String,
    /// Registered email address.
    email: String,
}

/// Stored contact.
struct ContactRow {
    /// Owning account.
    user_id: u64,
    /// Contact name.
    name: String,
    /// Contact surname.
    surname: String,
    /// Contact email address.
    email: String,
}

/// Stored contact-list.
struct ListRow {
    /// Owning account.
    user_id: u64,
    /// Contact-list name.
    name: String,
}

/// Canned reply replacing normal routing for one method and path.
struct RouteOverride {
    /// Upper-case HTTP method to match.
    method: String,
    /// Exact request path to match.
    path: String,
    /// Status code to answer with.
    status: u16,
    /// Body to answer with.
    body: String,
}

/// Everything the double stores, guarded by one mutex.
#[derive(Default)]
struct BookState {
    /// Registered accounts in creation order.
    users: Vec<UserRow>,
    /// Live tokens mapped to their account id.
    tokens: BTreeMap<String, u64>,
    /// Every token issued, in order.
    issued: Vec<String>,
    /// Contacts keyed by id.
    contacts: BTreeMap<u64, ContactRow>,
    /// Contact-lists keyed by id.
    lists: BTreeMap<u64, ListRow>,
    /// Contact ids per contact-list id.
    members: BTreeMap<u64, BTreeSet<u64>>,
    /// Last assigned account id.
    next_user: u64,
    /// Last assigned contact id.
    next_contact: u64,
    /// Last assigned contact-list id.
    next_list: u64,
    /// Requests received so far.
    requests: Vec<RecordedRequest>,
    /// Canned replies checked before routing.
    overrides: Vec<RouteOverride>,
}

/// Status code and body of one reply.
type Reply = (u16, String);

/// `200` with a JSON body.
fn ok(body: &Value) -> Reply {
    (200, body.to_string())
}

/// `200` with an empty body.
fn empty() -> Reply {
    (200, String::new())
}

/// Error status with an `{"error": ...}` body.
fn error(status: u16, message: &str) -> Reply {
    (status, json!({ "error": message }).to_string())
}

/// Reads a non-empty string field from a request body.
fn text_field(body: Option<&Value>, key: &str) -> Option<String> {
    body?.get(key)?.as_str().filter(|value| !value.is_empty()).map(str::to_string)
}

/// Reads the numeric `id` field from a request body.
fn id_field(body: Option<&Value>) -> Option<u64> {
    body?.get("id")?.as_u64()
}

impl BookState {
    /// Dispatches one request; everything but registration and token
    /// issuance requires a known bearer token.
    fn route(
        &mut self,
        method: &str,
        path: &str,
        auth: Option<&str>,
        body: Option<&Value>,
    ) -> Reply {
        if let Some(hit) = self.overrides.iter().find(|o| o.method == method && o.path == path) {
            return (hit.status, hit.body.clone());
        }
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method, segments.as_slice()) {
            ("POST", ["api", "user"]) => return self.register(body),
            ("POST", ["api", "user", "token"]) => return self.issue_token(body),
            _ => {}
        }
        let user = auth
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token).copied());
        let Some(user) = user else {
            return error(401, "Token is missing or invalid");
        };
        match (method, segments.as_slice()) {
            ("POST", ["api", "contact"]) => self.create_contact(user, body),
            ("GET", ["api", "contact"]) => ok(&self.contacts_of(user)),
            ("GET", ["api", "contact", id]) => self.get_contact(user, id),
            ("DELETE", ["api", "contact", id]) => self.delete_contact(user, id),
            ("POST", ["api", "contact-list"]) => self.create_list(user, body),
            ("GET", ["api", "contact-list"]) => ok(&self.lists_of(user, None)),
            ("POST", ["api", "contact-list", "search"]) => match text_field(body, "term") {
                Some(term) => ok(&self.lists_of(user, Some(&term))),
                None => error(400, "Missing search term"),
            },
            ("GET", ["api", "contact-list", id]) => self.get_list(user, id),
            ("DELETE", ["api", "contact-list", id]) => self.delete_list(user, id),
            ("POST", ["api", "contact-list", id, "contact"]) => self.add_member(user, id, body),
            ("GET", ["api", "contact-list", id, "contact"]) => self.list_members(user, id),
            ("DELETE", ["api", "contact-list", id, "contact"]) => {
                self.remove_member(user, id, body)
            }
            _ => error(404, "Not found"),
        }
    }

    /// `POST /api/user`; a duplicate username is a `500`.
    fn register(&mut self, body: Option<&Value>) -> Reply {
        let (Some(username), Some(password), Some(email)) = (
            text_field(body, "username"),
            text_field(body, "password"),
            text_field(body, "email"),
        ) else {
            return error(400, "Missing user fields");
        };
        if self.users.iter().any(|user| user.username == username) {
            return error(500, "Failed to create the user");
        }
        self.next_user += 1;
        let id = self.next_user;
        self.users.push(UserRow {
            id,
            username,
            password,
            email,
        });
        ok(&json!({ "id": id }))
    }

    /// `POST /api/user/token`.
    fn issue_token(&mut self, body: Option<&Value>) -> Reply {
        let username = text_field(body, "username");
        let password = text_field(body, "password");
        let matches = |user: &&UserRow| {
            username.as_deref() == Some(user.username.as_str())
                && password.as_deref() == Some(user.password.as_str())
        };
        let Some(user) = self.users.iter().find(matches) else {
            return error(400, "Invalid credentials");
        };
        let token = format!("token-{}-{}", user.id, self.issued.len() + 1);
        let reply = json!({
            "token": token,
            "user": { "id": user.id, "username": user.username, "email": user.email },
        });
        self.tokens.insert(token.clone(), user.id);
        self.issued.push(token);
        ok(&reply)
    }

    /// Serializes a contact the way the server does.
    fn contact_json(id: u64, row: &ContactRow) -> Value {
        json!({
            "id": id,
            "userID": row.user_id,
            "name": row.name,
            "surname": row.surname,
            "email": row.email,
        })
    }

    /// `POST /api/contact`.
    fn create_contact(&mut self, user: u64, body: Option<&Value>) -> Reply {
        let Some(name) = text_field(body, "name") else {
            return error(400, "Missing contact name");
        };
        self.next_contact += 1;
        let id = self.next_contact;
        self.contacts.insert(id, ContactRow {
            user_id: user,
            name,
            surname: text_field(body, "surname").unwrap_or_default(),
            email: text_field(body, "email").unwrap_or_default(),
        });
        ok(&json!({ "id": id }))
    }

    /// Contacts owned by `user`.
    fn contacts_of(&self, user: u64) -> Value {
        Value::Array(
            self.contacts
                .iter()
                .filter(|(_, row)| row.user_id == user)
                .map(|(id, row)| Self::contact_json(*id, row))
                .collect(),
        )
    }

    /// Parses a contact id and checks that `user` owns it.
    fn owned_contact(&self, user: u64, raw: &str) -> Result<u64, Reply> {
        let id = raw.parse::<u64>().map_err(|_| error(400, "Invalid contact id"))?;
        match self.contacts.get(&id) {
            Some(row) if row.user_id == user => Ok(id),
            Some(_) => Err(error(401, "Contact belongs to another user")),
            None => Err(error(400, "Contact not found")),
        }
    }

    /// `GET /api/contact/{id}`.
    fn get_contact(&self, user: u64, raw: &str) -> Reply {
        match self.owned_contact(user, raw) {
            Ok(id) => ok(&Self::contact_json(id, &self.contacts[&id])),
            Err(reply) => reply,
        }
    }

    /// `DELETE /api/contact/{id}`; also drops the contact from every list.
    fn delete_contact(&mut self, user: u64, raw: &str) -> Reply {
        match self.owned_contact(user, raw) {
            Ok(id) => {
                self.contacts.remove(&id);
                for members in self.members.values_mut() {
                    members.remove(&id);
                }
                empty()
            }
            Err(reply) => reply,
        }
    }

    /// `POST /api/contact-list`.
    fn create_list(&mut self, user: u64, body: Option<&Value>) -> Reply {
        let Some(name) = text_field(body, "name") else {
            return error(400, "Missing contact-list name");
        };
        self.next_list += 1;
        let id = self.next_list;
        self.lists.insert(id, ListRow {
            user_id: user,
            name,
        });
        ok(&json!({ "id": id }))
    }

    /// Contact-lists owned by `user`, filtered by a case-insensitive term.
    fn lists_of(&self, user: u64, term: Option<&str>) -> Value {
        let needle = term.map(str::to_lowercase);
        Value::Array(
            self.lists
                .iter()
                .filter(|(_, row)| row.user_id == user)
                .filter(|(_, row)| {
                    needle.as_ref().is_none_or(|needle| row.name.to_lowercase().contains(needle))
                })
                .map(|(id, row)| json!({ "id": id, "userID": row.user_id, "name": row.name }))
                .collect(),
        )
    }

    /// Parses a contact-list id and checks that `user` owns it.
    fn owned_list(&self, user: u64, raw: &str) -> Result<u64, Reply> {
        let id = raw.parse::<u64>().map_err(|_| error(400, "Invalid contact-list id"))?;
        match self.lists.get(&id) {
            Some(row) if row.user_id == user => Ok(id),
            Some(_) => Err(error(401, "Contact-list belongs to another user")),
            None => Err(error(400, "Contact-list not found")),
        }
    }

    /// `GET /api/contact-list/{id}`.
    fn get_list(&self, user: u64, raw: &str) -> Reply {
        match self.owned_list(user, raw) {
            Ok(id) => {
                let row = &self.lists[&id];
                ok(&json!({ "id": id, "userID": row.user_id, "name": row.name }))
            }
            Err(reply) => reply,
        }
    }

    /// `DELETE /api/contact-list/{id}`.
    fn delete_list(&mut self, user: u64, raw: &str) -> Reply {
        match self.owned_list(user, raw) {
            Ok(id) => {
                self.lists.remove(&id);
                self.members.remove(&id);
                empty()
            }
            Err(reply) => reply,
        }
    }

    /// Resolves the list and contact named by a membership request.
    fn membership_target(
        &self,
        user: u64,
        raw: &str,
        body: Option<&Value>,
    ) -> Result<(u64, u64), Reply> {
        let list = self.owned_list(user, raw)?;
        let contact = id_field(body).ok_or_else(|| error(400, "Missing contact id"))?;
        let contact = self.owned_contact(user, &contact.to_string())?;
        Ok((list, contact))
    }

    /// `POST /api/contact-list/{id}/contact`.
    fn add_member(&mut self, user: u64, raw: &str, body: Option<&Value>) -> Reply {
        match self.membership_target(user, raw, body) {
            Ok((list, contact)) => {
                self.members.entry(list).or_default().insert(contact);
                empty()
            }
            Err(reply) => reply,
        }
    }

    /// `DELETE /api/contact-list/{id}/contact`.
    fn remove_member(&mut self, user: u64, raw: &str, body: Option<&Value>) -> Reply {
        match self.membership_target(user, raw, body) {
            Ok((list, contact)) => {
                if let Some(members) = self.members.get_mut(&list) {
                    members.remove(&contact);
                }
                empty()
            }
            Err(reply) => reply,
        }
    }

    /// `GET /api/contact-list/{id}/contact`.
    fn list_members(&self, user: u64, raw: &str) -> Reply {
        match self.owned_list(user, raw) {
            Ok(list) => {
                let members = self.members.get(&list).cloned().unwrap_or_default();
                ok(&Value::Array(
                    members
                        .iter()
                        .filter_map(|id| {
                            self.contacts.get(id).map(|row| Self::contact_json(*id, row))
                        })
                        .collect(),
                ))
            }
            Err(reply) => reply,
        }
    }
}

// ============================================================================
// SECTION: Server Handle
// ============================================================================

/// Running test double; shuts down on drop.
pub struct AddressBookDouble {
    /// Base URL clients should target.
    base_url: Url,
    /// Bound loopback port.
    port: u16,
    /// Shared server handle, unblocked on drop.
    server: Arc<Server>,
    /// State shared with the serving thread.
    state: Arc<Mutex<BookState>>,
    /// Serving thread.
    join: Option<thread::JoinHandle<()>>,
}

impl AddressBookDouble {
    /// Starts the double on an ephemeral loopback port.
    pub fn spawn() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let state = Arc::new(Mutex::new(BookState::default()));
        let join = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || serve(&server, &state))
        };
        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            port: addr.port(),
            server,
            state,
            join: Some(join),
        }
    }

    /// Returns the double's base URL.
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Returns the bound port.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Builds a client pointed at the double.
    pub fn client(&self) -> AddressBookClient {
        let mut config = ClientConfig::new(self.base_url());
        config.timeout = Some(Duration::from_secs(10));
        AddressBookClient::new(config).unwrap()
    }

    /// Replaces the reply for `method path` with a canned status and body.
    pub fn override_route(&self, method: &str, path: &str, status: u16, body: &str) {
        self.state.lock().unwrap().overrides.push(RouteOverride {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
    }

    /// Returns every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Returns every token issued so far, in order.
    pub fn issued_tokens(&self) -> Vec<String> {
        self.state.lock().unwrap().issued.clone()
    }

    /// Returns the ids of all stored contacts.
    pub fn contact_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().contacts.keys().copied().collect()
    }

    /// Returns the names of all stored contact-lists.
    pub fn list_names(&self) -> Vec<String> {
        self.state.lock().unwrap().lists.values().map(|row| row.name.clone()).collect()
    }

    /// Returns the contact ids currently in `list`.
    pub fn members_of(&self, list: u64) -> Vec<u64> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(&list)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Drop for AddressBookDouble {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Serves requests until the server is unblocked.
fn serve(server: &Server, state: &Mutex<BookState>) {
    let content_type = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    while let Ok(mut request) = server.recv() {
        let method = request.method().to_string().to_uppercase();
        let path = request.url().split('?').next().unwrap_or_default().to_string();
        let authorization = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Authorization"))
            .map(|header| header.value.as_str().to_string());
        let mut raw = String::new();
        let _ = request.as_reader().read_to_string(&mut raw);
        let body = serde_json::from_str::<Value>(&raw).ok();

        let (status, reply) = {
            let mut state = state.lock().unwrap();
            state.requests.push(RecordedRequest {
                method: method.clone(),
                path: path.clone(),
                authorization: authorization.clone(),
                body: body.clone(),
            });
            state.route(&method, &path, authorization.as_deref(), body.as_ref())
        };
        let response =
            Response::from_string(reply).with_status_code(status).with_header(content_type.clone());
        let _ = request.respond(response);
    }
}
