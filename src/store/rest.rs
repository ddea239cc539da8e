//! Realtime Database REST client.
//!
//! Reads `GET {database_url}/{path}.json`, adding `?auth={id_token}` when the caller
//! supplies a token. A body of `null` means nothing is stored at the key.

use super::{DataStore, DbPath, Snapshot};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`DataStore`] talking to a Firebase Realtime Database over HTTPS.
#[derive(Debug, Clone)]
pub struct RestDataStore {
    client: reqwest::Client,
    base: Url,
}

impl RestDataStore {
    pub fn new(database_url: &str, client: reqwest::Client) -> Result<Self> {
        let base = Url::parse(database_url).map_err(|err| {
            DashError::config(format!("invalid database URL '{database_url}': {err}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(DashError::config(format!(
                "database URL '{database_url}' cannot carry a path"
            )));
        }
        Ok(Self { client, base })
    }

    /// URL of the JSON resource for `path`.
    pub fn url_for(&self, path: &DbPath, id_token: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DashError::config("database URL cannot carry a path"))?;
            segments.pop_if_empty();

            let mut names: Vec<&str> = path.segments().collect();
            let last = names.pop();
            segments.extend(names);
            match last {
                Some(last) => segments.push(&format!("{last}.json")),
                None => segments.push(".json"),
            };
        }
        url.set_query(None);
        if let Some(token) = id_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }
}

#[async_trait]
impl DataStore for RestDataStore {
    async fn get(&self, path: &DbPath, id_token: Option<&str>) -> Result<Snapshot> {
        let url = self.url_for(path, id_token)?;
        log::debug!("GET {}{}.json", self.base, path);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DashError::network(format!("reading '{path}' failed"), err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| DashError::network(format!("reading body of '{path}' failed"), err))?;

        parse_read_response(path, status, &body)
    }
}

fn parse_read_response(path: &DbPath, status: u16, body: &str) -> Result<Snapshot> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|parsed| parsed.error)
            .unwrap_or_else(|_| body.trim().chars().take(200).collect());
        return Err(DashError::store(path.to_string(), status, message));
    }

    let value: Value =
        serde_json::from_str(body).map_err(|err| DashError::decode(path.to_string(), err))?;
    Ok(Snapshot::new(path.clone(), value))
}
