//! Remote Service Client
//!
//! Thin blocking wrapper over the coaching platform's JSON API. Calls run
//! strictly one at a time with a fixed timeout; any non-2xx answer surfaces
//! as [`Error::Api`] and transport problems as [`Error::Transport`], both
//! recovered per record by the sync engine. Catalog listings are two-phase:
//! probe for the total, then fetch everything in one page.

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};

use super::types::{
    CreatedTagEnvelope, DetailEnvelope, ExerciseSummary, LoginResponse, SearchPage, TagEntry,
    TagPageEnvelope,
};

/// Fixed timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Probe page size for the exercise catalog.
const EXERCISE_PROBE_SIZE: u64 = 50;

/// Probe page size for the tag catalog.
const TAG_PROBE_SIZE: u64 = 20;

/// App-type header the platform requires on every call.
const APP_TYPE: &str = "web-coach";

/// Authenticated client for the remote coaching service.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client against the given base URL. No network contact yet.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Logs in and stores the access token for subsequent calls.
    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/auth/login_lite", self.base_url);
        let body = json!({
            "email": email,
            "password": password,
            "agent": "react",
        });

        let response = self
            .http
            .post(&url)
            .header("x-app-type", APP_TYPE)
            .json(&body)
            .send()
            .map_err(|e| Error::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Auth(format!(
                "login returned status {}",
                response.status().as_u16()
            )));
        }

        let parsed: LoginResponse = response
            .json()
            .map_err(|e| Error::Auth(format!("could not read login response: {}", e)))?;

        match parsed.token {
            Some(token) if !token.is_empty() => {
                info!("Logged in as {}", email);
                self.token = Some(token);
                Ok(())
            }
            _ => Err(Error::Auth(
                "login response carried no token".to_string(),
            )),
        }
    }

    /// Attaches the auth headers; fails when login has not happened.
    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::Auth("not logged in".to_string()))?;
        Ok(builder
            .header("x-access-token", token)
            .header("x-app-type", APP_TYPE))
    }

    /// Maps non-2xx answers to [`Error::Api`].
    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn search_page(&self, per_page: u64) -> Result<SearchPage> {
        let url = format!("{}/api/exercise/search_filter_library", self.base_url);
        // from [false, true] restricts the listing to custom exercises
        let body = json!({
            "body_part": [],
            "category_type": [],
            "equipments": [],
            "from": [false, true],
            "modalities": [],
            "movement_patterns": [],
            "muscle_groups": [],
            "page": 1,
            "per_page": per_page,
            "q": "",
            "sort": -1,
            "sorter": "last_interacted",
            "tags": [],
            "video_only": false,
        });

        let response = Self::check(self.authed(self.http.post(&url))?.json(&body).send()?)?;
        Ok(response.json()?)
    }

    /// Fetches the full custom exercise catalog (probe, then full page).
    pub fn fetch_exercise_catalog(&self) -> Result<Vec<ExerciseSummary>> {
        let probe = self.search_page(EXERCISE_PROBE_SIZE)?;
        debug!("Exercise catalog holds {} entries", probe.total);

        if probe.total <= probe.data.len() as u64 {
            return Ok(probe.data);
        }

        let full = self.search_page(probe.total)?;
        info!("Fetched {} exercises from the remote library", full.data.len());
        Ok(full.data)
    }

    fn tag_page(&self, per_page: u64) -> Result<TagPageEnvelope> {
        let url = format!(
            "{}/api/tag/get-list-tag-by-team?sorter=name&per_page={}&page=1&sort=1&text_search=&type=1",
            self.base_url, per_page
        );
        let response = Self::check(self.authed(self.http.get(&url))?.send()?)?;
        Ok(response.json()?)
    }

    /// Fetches the full tag catalog (probe, then full page).
    pub fn fetch_tag_catalog(&self) -> Result<Vec<TagEntry>> {
        let probe = self.tag_page(TAG_PROBE_SIZE)?;
        debug!("Tag catalog holds {} entries", probe.data.total);

        if probe.data.total <= probe.data.data.len() as u64 {
            return Ok(probe.data.data);
        }

        let full = self.tag_page(probe.data.total)?;
        info!("Fetched {} tags", full.data.data.len());
        Ok(full.data.data)
    }

    /// Creates a tag and returns its new id.
    pub fn create_tag(&self, name: &str) -> Result<String> {
        let url = format!("{}/api/tag/", self.base_url);
        let body = json!({ "name": name, "type": 1 });

        let response = Self::check(self.authed(self.http.post(&url))?.json(&body).send()?)?;
        let envelope: CreatedTagEnvelope = response.json()?;
        info!("Created tag '{}'", name);
        Ok(envelope.data.id)
    }

    /// Creates a library exercise.
    pub fn create_exercise(&self, payload: &impl Serialize) -> Result<Value> {
        let url = format!("{}/api/exercise/add", self.base_url);
        let response = Self::check(self.authed(self.http.post(&url))?.json(payload).send()?)?;
        Ok(response.json()?)
    }

    /// Updates an existing library exercise.
    pub fn update_exercise(&self, id: &str, payload: &impl Serialize) -> Result<Value> {
        let url = format!("{}/api/exercise/update/{}", self.base_url, id);
        let response = Self::check(self.authed(self.http.put(&url))?.json(payload).send()?)?;
        Ok(response.json()?)
    }

    /// Fetches the full detail record for one exercise.
    pub fn fetch_exercise_detail(&self, id: &str) -> Result<Value> {
        let url = format!("{}/api/exercise/detail/{}", self.base_url, id);
        let response = Self::check(self.authed(self.http.get(&url))?.send()?)?;
        let envelope: DetailEnvelope = response.json()?;
        Ok(envelope.data)
    }

    /// Creates a workout.
    pub fn create_workout(&self, payload: &impl Serialize) -> Result<Value> {
        let url = format!("{}/api/workout/v2/add", self.base_url);
        let response = Self::check(self.authed(self.http.post(&url))?.json(payload).send()?)?;
        Ok(response.json()?)
    }
}
