use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;
use std::time::Duration;

use crate::error::{Error, Result};

/// Credentials attached to a request.
#[derive(Clone, Copy, Debug)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    ApiKey(&'a str),
}

impl<'a> Auth<'a> {
    /// Qdrant only expects a key when one is configured.
    pub fn api_key(key: &'a str) -> Self {
        if key.trim().is_empty() {
            Auth::None
        } else {
            Auth::ApiKey(key)
        }
    }

    fn apply(self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Auth::None => req,
            Auth::Bearer(token) => req.header(AUTHORIZATION, format!("Bearer {}", token)),
            Auth::ApiKey(key) => req.header("api-key", key),
        }
    }
}

fn client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

fn send<T: DeserializeOwned>(method: &'static str, url: &str, req: RequestBuilder) -> Result<T> {
    let resp = req.send()?;
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(Error::Http {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }
    from_str::<T>(&text).map_err(|e| Error::Decode {
        url: url.to_string(),
        message: format!("{} | {}", e, text),
    })
}

pub fn get_json<T: DeserializeOwned>(url: &str, auth: Auth<'_>, timeout: Duration) -> Result<T> {
    let req = auth.apply(client(timeout)?.get(url));
    send("GET", url, req)
}

pub fn post_json<T: DeserializeOwned, B: Serialize>(
    url: &str,
    body: &B,
    auth: Auth<'_>,
    timeout: Duration,
) -> Result<T> {
    let req = client(timeout)?
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body);
    send("POST", url, auth.apply(req))
}

pub fn put_json<T: DeserializeOwned, B: Serialize>(
    url: &str,
    body: &B,
    auth: Auth<'_>,
    timeout: Duration,
) -> Result<T> {
    let req = client(timeout)?
        .put(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body);
    send("PUT", url, auth.apply(req))
}
