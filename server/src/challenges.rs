//! Static challenge catalogue and per-session completion tracking.
//!
//! A challenge is completed when a request on a known session matches its
//! trigger: effective method, route, response status and a few header or
//! outcome conditions. [`detect`] evaluates those triggers from
//! [`RequestFacts`] gathered by the tracking middleware.

use std::collections::{BTreeMap, BTreeSet};

use actix_web::http::Method;
use protocol::media::{essence, APPLICATION_JSON, APPLICATION_XML};
use protocol::{ChallengeDescriptor, ChallengeList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn challenge(key: &'static str, name: &'static str, description: &'static str) -> Challenge {
    Challenge {
        key,
        name,
        description,
    }
}

pub const CHALLENGES: [Challenge; 59] = [
    challenge("CREATE_NEW_CHALLENGER", "POST /challenger (201)", "Issue a POST request on the `/challenger` end point, with no body, to create a new challenger session."),
    challenge("GET_CHALLENGES", "GET /challenges (200)", "Issue a GET request on the `/challenges` end point"),
    challenge("GET_TODOS", "GET /todos (200)", "Issue a GET request on the `/todos` end point"),
    challenge("GET_TODOS_NOT_PLURAL_404", "GET /todo (404) not plural", "Issue a GET request on the `/todo` end point should 404 because nouns should be plural"),
    challenge("GET_TODO", "GET /todos/{id} (200)", "Issue a GET request on the `/todos/{id}` end point to return a specific todo"),
    challenge("GET_TODO_404", "GET /todos/{id} (404)", "Issue a GET request on the `/todos/{id}` end point for a todo that does not exist"),
    challenge("GET_TODOS_FILTERED", "GET /todos (200) ?filter", "Issue a GET request on the `/todos` end point with a query filter to get only todos which are 'done'."),
    challenge("HEAD_TODOS", "HEAD /todos (200)", "Issue a HEAD request on the `/todos` end point"),
    challenge("POST_TODOS", "POST /todos (201)", "Issue a POST request to successfully create a todo"),
    challenge("POST_TODOS_BAD_DONE_STATUS", "POST /todos (400) doneStatus", "Issue a POST request to create a todo but fail validation on the `doneStatus` field"),
    challenge("POST_TODOS_TOO_LONG_TITLE_LENGTH", "POST /todos (400) title too long", "Issue a POST request to create a todo but fail length validation on the `title` field because your title exceeds maximum allowable characters."),
    challenge("POST_TODOS_TOO_LONG_DESCRIPTION_LENGTH", "POST /todos (400) description too long", "Issue a POST request to create a todo but fail length validation on the `description` because your description exceeds maximum allowable characters."),
    challenge("POST_MAX_OUT_TITLE_DESCRIPTION_LENGTH", "POST /todos (201) max out content", "Issue a POST request to create a todo with maximum length title and description fields."),
    challenge("POST_TODOS_TOO_LONG_PAYLOAD_SIZE", "POST /todos (413) content too long", "Issue a POST request to create a todo but fail payload length validation on the `description` because your whole payload exceeds maximum allowable 5000 characters."),
    challenge("POST_TODOS_INVALID_EXTRA_FIELD", "POST /todos (400) extra", "Issue a POST request to create a todo but fail validation because your payload contains an unrecognised field."),
    challenge("PUT_TODOS_400", "PUT /todos/{id} (400)", "Issue a PUT request to unsuccessfully create a todo"),
    challenge("POST_UPDATE_TODO", "POST /todos/{id} (200)", "Issue a POST request to successfully update a todo"),
    challenge("POST_TODOS_404", "POST /todos/{id} (404)", "Issue a POST request for a todo which does not exist. Expect to receive a 404 response."),
    challenge("PUT_TODOS_FULL_200", "PUT /todos/{id} full (200)", "Issue a PUT request to update an existing todo with a complete payload i.e. title, description and donestatus."),
    challenge("PUT_TODOS_PARTIAL_200", "PUT /todos/{id} partial (200)", "Issue a PUT request to update an existing todo with just mandatory items in payload i.e. title."),
    challenge("PUT_TODOS_MISSING_TITLE_400", "PUT /todos/{id} no title (400)", "Issue a PUT request to fail to update an existing todo because title is missing in payload."),
    challenge("PUT_TODOS_400_NO_AMEND_ID", "PUT /todos/{id} no amend id (400)", "Issue a PUT request to fail to update an existing todo because id different in payload."),
    challenge("DELETE_A_TODO", "DELETE /todos/{id} (200)", "Issue a DELETE request to successfully delete a todo"),
    challenge("OPTIONS_TODOS", "OPTIONS /todos (200)", "Issue an OPTIONS request on the `/todos` end point. You might want to manually check the 'Allow' header in the response is as expected."),
    challenge("GET_ACCEPT_XML", "GET /todos (200) XML", "Issue a GET request on the `/todos` end point with an `Accept` header of `application/xml` to receive results in XML format"),
    challenge("GET_ACCEPT_JSON", "GET /todos (200) JSON", "Issue a GET request on the `/todos` end point with an `Accept` header of `application/json` to receive results in JSON format"),
    challenge("GET_ACCEPT_ANY_DEFAULT_JSON", "GET /todos (200) ANY", "Issue a GET request on the `/todos` end point with an `Accept` header of `*/*` to receive results in default JSON format"),
    challenge("GET_ACCEPT_XML_PREFERRED", "GET /todos (200) XML pref", "Issue a GET request on the `/todos` end point with an `Accept` header of `application/xml, application/json` to receive results in the preferred XML format"),
    challenge("GET_JSON_BY_DEFAULT_NO_ACCEPT", "GET /todos (200) no accept", "Issue a GET request on the `/todos` end point with no `Accept` header present in the message to receive results in default JSON format"),
    challenge("GET_UNSUPPORTED_ACCEPT_406", "GET /todos (406)", "Issue a GET request on the `/todos` end point with an `Accept` header `application/gzip` to receive 406 'NOT ACCEPTABLE' status code"),
    challenge("POST_CREATE_XML", "POST /todos XML", "Issue a POST request on the `/todos` end point to create a todo using Content-Type `application/xml`, and Accepting only XML ie. Accept header of `application/xml`"),
    challenge("POST_CREATE_JSON", "POST /todos JSON", "Issue a POST request on the `/todos` end point to create a todo using Content-Type `application/json`, and Accepting only JSON ie. Accept header of `application/json`"),
    challenge("POST_TODOS_415", "POST /todos (415)", "Issue a POST request on the `/todos` end point with an unsupported content type to generate a 415 status code"),
    challenge("GET_RESTORABLE_CHALLENGER_PROGRESS_STATUS", "GET /challenger/guid (existing X-CHALLENGER)", "Issue a GET request on the `/challenger/{guid}` end point, with an existing challenger GUID. This will return the progress data payload that can be used to later restore your progress to this status."),
    challenge("PUT_RESTORABLE_CHALLENGER_PROGRESS_STATUS", "PUT /challenger/guid RESTORE", "Issue a PUT request on the `/challenger/{guid}` end point, with an existing challenger GUID to restore that challenger's progress into memory."),
    challenge("PUT_NEW_RESTORED_CHALLENGER_PROGRESS_STATUS", "PUT /challenger/guid CREATE", "Issue a PUT request on the `/challenger/{guid}` end point, with a challenger GUID not currently in memory to restore that challenger's progress into memory."),
    challenge("GET_RESTORABLE_TODOS", "GET /challenger/database/guid (200)", "Issue a GET request on the `/challenger/database/{guid}` end point, to retrieve the current todos database for the user. You can use this to restore state later."),
    challenge("PUT_RESTORABLE_TODOS", "PUT /challenger/database/guid (Update)", "Issue a PUT request on the `/challenger/database/{guid}` end point, with a payload to restore the Todos database in memory."),
    challenge("POST_TODOS_XML_ACCEPT_JSON", "POST /todos XML to JSON", "Issue a POST request on the `/todos` end point to create a todo using Content-Type `application/xml` but Accept `application/json`"),
    challenge("POST_TODOS_JSON_ACCEPT_XML", "POST /todos JSON to XML", "Issue a POST request on the `/todos` end point to create a todo using Content-Type `application/json` but Accept `application/xml`"),
    challenge("DELETE_HEARTBEAT_405", "DELETE /heartbeat (405)", "Issue a DELETE request on the `/heartbeat` end point and receive 405 (Method Not Allowed)"),
    challenge("PATCH_HEARTBEAT_500", "PATCH /heartbeat (500)", "Issue a PATCH request on the `/heartbeat` end point and receive 500 (internal server error)"),
    challenge("GET_HEARTBEAT_204", "GET /heartbeat (204)", "Issue a GET request on the `/heartbeat` end point and receive 204 when server is running"),
    challenge("TRACE_HEARTBEAT_501", "TRACE /heartbeat (501)", "Issue a TRACE request on the `/heartbeat` end point and receive 501 (Not Implemented)"),
    challenge("OVERRIDE_DELETE_HEARTBEAT_405", "POST /heartbeat as DELETE (405)", "Issue a POST request on the `/heartbeat` end point and receive 405 when you override the Method Verb to a DELETE"),
    challenge("OVERRIDE_PATCH_HEARTBEAT_500", "POST /heartbeat as PATCH (500)", "Issue a POST request on the `/heartbeat` end point and receive 500 when you override the Method Verb to a PATCH"),
    challenge("OVERRIDE_TRACE_HEARTBEAT_501", "POST /heartbeat as Trace (501)", "Issue a POST request on the `/heartbeat` end point and receive 501 (Not Implemented) when you override the Method Verb to a TRACE"),
    challenge("CREATE_SECRET_TOKEN_401", "POST /secret/token (401)", "Issue a POST request on the `/secret/token` end point and receive 401 when Basic auth username/password is not admin/password"),
    challenge("CREATE_SECRET_TOKEN_201", "POST /secret/token (201)", "Issue a POST request on the `/secret/token` end point and receive 201 when Basic auth username/password is admin/password"),
    challenge("GET_SECRET_NOTE_FORBIDDEN_403", "GET /secret/note (403)", "Issue a GET request on the `/secret/note` end point and receive 403 when X-AUTH-TOKEN does not match a valid token"),
    challenge("GET_SECRET_NOTE_UNAUTHORIZED_401", "GET /secret/note (401)", "Issue a GET request on the `/secret/note` end point and receive 401 when no X-AUTH-TOKEN header present"),
    challenge("GET_SECRET_NOTE_200", "GET /secret/note (200)", "Issue a GET request on the `/secret/note` end point receive 200 when valid X-AUTH-TOKEN used - response body should contain the note"),
    challenge("POST_SECRET_NOTE_200", "POST /secret/note (200)", "Issue a POST request on the `/secret/note` end point with a note payload e.g. {\"note\":\"my note\"} and receive 200 when valid X-AUTH-TOKEN used."),
    challenge("POST_SECRET_NOTE_UNAUTHORIZED_401", "POST /secret/note (401)", "Issue a POST request on the `/secret/note` end point with a note payload and receive 401 when no X-AUTH-TOKEN present"),
    challenge("POST_SECRET_NOTE_FORBIDDEN_403", "POST /secret/note (403)", "Issue a POST request on the `/secret/note` end point with a note payload and receive 403 when X-AUTH-TOKEN does not match a valid token"),
    challenge("GET_SECRET_NOTE_BEARER_200", "GET /secret/note (Bearer)", "Issue a GET request on the `/secret/note` end point receive 200 when using the X-AUTH-TOKEN value as an Authorization Bearer token - response body should contain the note"),
    challenge("POST_SECRET_NOTE_BEARER_200", "POST /secret/note (Bearer)", "Issue a POST request on the `/secret/note` end point with a note payload and receive 200 when valid X-AUTH-TOKEN value used as an Authorization Bearer token."),
    challenge("DELETE_ALL_TODOS", "DELETE /todos/{id} (200) all", "Issue a DELETE request to successfully delete the last todo in system so that there are no more todos in the system"),
    challenge("CREATE_ALL_TODOS", "POST /todos (201) all", "Issue as many POST requests as it takes to add the maximum number of TODOS allowed for a user."),
];

pub fn find(key: &str) -> Option<&'static Challenge> {
    CHALLENGES.iter().find(|challenge| challenge.key == key)
}

/// Challenges completed by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeProgress {
    completed: BTreeSet<&'static str>,
}

impl ChallengeProgress {
    /// Marks a challenge complete; returns `true` the first time.
    pub fn complete(&mut self, key: &str) -> bool {
        match find(key) {
            Some(challenge) => self.completed.insert(challenge.key),
            None => false,
        }
    }

    pub fn is_complete(&self, key: &str) -> bool {
        self.completed.contains(key)
    }

    /// Status of every catalogue entry, as stored in a session snapshot.
    pub fn status_map(&self) -> BTreeMap<String, bool> {
        CHALLENGES
            .iter()
            .map(|challenge| (challenge.key.to_string(), self.is_complete(challenge.key)))
            .collect()
    }

    /// Rebuilds progress from a snapshot map. Unknown keys are ignored.
    pub fn from_status_map(status: &BTreeMap<String, bool>) -> Self {
        let mut progress = Self::default();
        for (key, done) in status {
            if *done {
                progress.complete(key);
            }
        }
        progress
    }
}

/// Renders the catalogue, with status taken from `progress` when the caller
/// has a session.
pub fn catalogue(progress: Option<&ChallengeProgress>) -> ChallengeList {
    let challenges = CHALLENGES
        .iter()
        .enumerate()
        .map(|(index, challenge)| ChallengeDescriptor {
            id: format!("{:02}", index + 1),
            name: challenge.name.to_string(),
            description: challenge.description.to_string(),
            status: progress.is_some_and(|progress| progress.is_complete(challenge.key)),
        })
        .collect();

    ChallengeList { challenges }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Challenger,
    ChallengerProgress,
    ChallengerDatabase,
    Challenges,
    Todos,
    Todo,
    TodoSingular,
    Heartbeat,
    SecretToken,
    SecretNote,
    Other,
}

impl Route {
    pub fn classify(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim_end_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["challenger"] => Route::Challenger,
            ["challenger", "database", _] => Route::ChallengerDatabase,
            ["challenger", _] => Route::ChallengerProgress,
            ["challenges"] => Route::Challenges,
            ["todos"] => Route::Todos,
            ["todos", _] => Route::Todo,
            ["todo"] => Route::TodoSingular,
            ["heartbeat"] => Route::Heartbeat,
            ["secret", "token"] => Route::SecretToken,
            ["secret", "note"] => Route::SecretNote,
            _ => Route::Other,
        }
    }
}

/// Outcome hints a handler attaches to its response when the status alone
/// does not identify what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    MaxedOutContent,
    FullReplace,
    PartialReplace,
    StoreEmptied,
}

#[derive(Debug, Clone)]
pub struct RequestFacts {
    pub method: Method,
    pub route: Route,
    pub status: u16,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub overridden: bool,
    pub bearer: bool,
    pub filtered: bool,
    pub errors: Vec<String>,
    pub outcome: Option<Outcome>,
}

impl RequestFacts {
    fn accepts(&self) -> Vec<String> {
        self.accept
            .as_deref()
            .map(|accept| {
                accept
                    .split(',')
                    .map(essence)
                    .filter(|entry| !entry.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn accepts_only(&self, media: &str) -> bool {
        self.accepts() == [media]
    }

    fn sent(&self, media: &str) -> bool {
        self.content_type.as_deref().map(essence).as_deref() == Some(media)
    }

    fn error_contains(&self, fragment: &str) -> bool {
        self.errors.iter().any(|message| message.contains(fragment))
    }
}

/// Keys of every challenge the request satisfies.
pub fn detect(facts: &RequestFacts) -> Vec<&'static str> {
    let mut keys = Vec::new();
    let status = facts.status;
    let method = &facts.method;

    match facts.route {
        Route::Challenger if *method == Method::POST && status == 201 => {
            keys.push("CREATE_NEW_CHALLENGER");
        }
        Route::ChallengerProgress => match (method.as_str(), status) {
            ("GET", 200) => keys.push("GET_RESTORABLE_CHALLENGER_PROGRESS_STATUS"),
            ("PUT", 200) => keys.push("PUT_RESTORABLE_CHALLENGER_PROGRESS_STATUS"),
            ("PUT", 201) => keys.push("PUT_NEW_RESTORED_CHALLENGER_PROGRESS_STATUS"),
            _ => {}
        },
        Route::ChallengerDatabase => match (method.as_str(), status) {
            ("GET", 200) => keys.push("GET_RESTORABLE_TODOS"),
            ("PUT", 204) => keys.push("PUT_RESTORABLE_TODOS"),
            _ => {}
        },
        Route::Challenges if *method == Method::GET && status == 200 => {
            keys.push("GET_CHALLENGES");
        }
        Route::TodoSingular if *method == Method::GET && status == 404 => {
            keys.push("GET_TODOS_NOT_PLURAL_404");
        }
        Route::Todos => detect_todos(facts, &mut keys),
        Route::Todo => detect_todo(facts, &mut keys),
        Route::Heartbeat => {
            let key = match (method.as_str(), status, facts.overridden) {
                ("GET", 204, _) => Some("GET_HEARTBEAT_204"),
                ("DELETE", 405, false) => Some("DELETE_HEARTBEAT_405"),
                ("PATCH", 500, false) => Some("PATCH_HEARTBEAT_500"),
                ("TRACE", 501, false) => Some("TRACE_HEARTBEAT_501"),
                ("DELETE", 405, true) => Some("OVERRIDE_DELETE_HEARTBEAT_405"),
                ("PATCH", 500, true) => Some("OVERRIDE_PATCH_HEARTBEAT_500"),
                ("TRACE", 501, true) => Some("OVERRIDE_TRACE_HEARTBEAT_501"),
                _ => None,
            };
            keys.extend(key);
        }
        Route::SecretToken if *method == Method::POST => match status {
            201 => keys.push("CREATE_SECRET_TOKEN_201"),
            401 => keys.push("CREATE_SECRET_TOKEN_401"),
            _ => {}
        },
        Route::SecretNote => {
            let key = match (method.as_str(), status, facts.bearer) {
                ("GET", 200, false) => Some("GET_SECRET_NOTE_200"),
                ("GET", 200, true) => Some("GET_SECRET_NOTE_BEARER_200"),
                ("GET", 401, _) => Some("GET_SECRET_NOTE_UNAUTHORIZED_401"),
                ("GET", 403, _) => Some("GET_SECRET_NOTE_FORBIDDEN_403"),
                ("POST", 200, false) => Some("POST_SECRET_NOTE_200"),
                ("POST", 200, true) => Some("POST_SECRET_NOTE_BEARER_200"),
                ("POST", 401, _) => Some("POST_SECRET_NOTE_UNAUTHORIZED_401"),
                ("POST", 403, _) => Some("POST_SECRET_NOTE_FORBIDDEN_403"),
                _ => None,
            };
            keys.extend(key);
        }
        _ => {}
    }

    keys
}

fn detect_todos(facts: &RequestFacts, keys: &mut Vec<&'static str>) {
    match (facts.method.as_str(), facts.status) {
        ("GET", 200) => {
            keys.push("GET_TODOS");
            if facts.filtered {
                keys.push("GET_TODOS_FILTERED");
            }

            let accepts = facts.accepts();
            if accepts.is_empty() {
                keys.push("GET_JSON_BY_DEFAULT_NO_ACCEPT");
            } else if facts.accepts_only(APPLICATION_XML) {
                keys.push("GET_ACCEPT_XML");
            } else if facts.accepts_only(APPLICATION_JSON) {
                keys.push("GET_ACCEPT_JSON");
            } else if facts.accepts_only("*/*") {
                keys.push("GET_ACCEPT_ANY_DEFAULT_JSON");
            } else if accepts.first().map(String::as_str) == Some(APPLICATION_XML)
                && accepts.iter().any(|entry| entry == APPLICATION_JSON)
            {
                keys.push("GET_ACCEPT_XML_PREFERRED");
            }
        }
        ("GET", 406) => keys.push("GET_UNSUPPORTED_ACCEPT_406"),
        ("HEAD", 200) => keys.push("HEAD_TODOS"),
        ("OPTIONS", 200) => keys.push("OPTIONS_TODOS"),
        ("POST", 201) => {
            keys.push("POST_TODOS");
            if facts.outcome == Some(Outcome::MaxedOutContent) {
                keys.push("POST_MAX_OUT_TITLE_DESCRIPTION_LENGTH");
            }

            let xml_in = facts.sent(APPLICATION_XML);
            let json_in = facts.sent(APPLICATION_JSON);
            let xml_out = facts.accepts_only(APPLICATION_XML);
            let json_out = facts.accepts_only(APPLICATION_JSON);
            match (xml_in, json_in, xml_out, json_out) {
                (true, _, true, _) => keys.push("POST_CREATE_XML"),
                (_, true, _, true) => keys.push("POST_CREATE_JSON"),
                (true, _, _, true) => keys.push("POST_TODOS_XML_ACCEPT_JSON"),
                (_, true, true, _) => keys.push("POST_TODOS_JSON_ACCEPT_XML"),
                _ => {}
            }
        }
        ("POST", 400) => {
            if facts.error_contains("doneStatus should be BOOLEAN") {
                keys.push("POST_TODOS_BAD_DONE_STATUS");
            }
            if facts.error_contains("length exceeded for title") {
                keys.push("POST_TODOS_TOO_LONG_TITLE_LENGTH");
            }
            if facts.error_contains("length exceeded for description") {
                keys.push("POST_TODOS_TOO_LONG_DESCRIPTION_LENGTH");
            }
            if facts.error_contains("Could not find field") {
                keys.push("POST_TODOS_INVALID_EXTRA_FIELD");
            }
            if facts.error_contains("maximum limit of") {
                keys.push("CREATE_ALL_TODOS");
            }
        }
        ("POST", 413) => keys.push("POST_TODOS_TOO_LONG_PAYLOAD_SIZE"),
        ("POST", 415) => keys.push("POST_TODOS_415"),
        _ => {}
    }
}

fn detect_todo(facts: &RequestFacts, keys: &mut Vec<&'static str>) {
    match (facts.method.as_str(), facts.status) {
        ("GET", 200) => keys.push("GET_TODO"),
        ("GET", 404) => keys.push("GET_TODO_404"),
        ("POST", 200) => keys.push("POST_UPDATE_TODO"),
        ("POST", 404) => keys.push("POST_TODOS_404"),
        ("PUT", 200) => match facts.outcome {
            Some(Outcome::FullReplace) => keys.push("PUT_TODOS_FULL_200"),
            Some(Outcome::PartialReplace) => keys.push("PUT_TODOS_PARTIAL_200"),
            _ => {}
        },
        ("PUT", 400) => {
            if facts.error_contains("Cannot create todo with PUT") {
                keys.push("PUT_TODOS_400");
            }
            if facts.error_contains("title : field is mandatory") {
                keys.push("PUT_TODOS_MISSING_TITLE_400");
            }
            if facts.error_contains("Can not amend id") {
                keys.push("PUT_TODOS_400_NO_AMEND_ID");
            }
        }
        ("DELETE", 200) => {
            keys.push("DELETE_A_TODO");
            if facts.outcome == Some(Outcome::StoreEmptied) {
                keys.push("DELETE_ALL_TODOS");
            }
        }
        _ => {}
    }
}
