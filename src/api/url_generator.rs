// src/api/url_generator.rs
//! Turns an animation request into one fetch task per parameter value.

use crate::error::AppError;
use crate::types::{AnimationRequest, FetchTask, OverlayText};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Lazy, single-pass sequence of [`FetchTask`]s in request value order.
///
/// The endpoint is parsed up front, so a malformed endpoint is reported
/// before any task exists and before any network activity.
#[derive(Debug)]
pub struct UrlGenerator {
    base: Url,
    /// Endpoint query merged with the fixed parameters.
    shared_query: Vec<(String, String)>,
    parameter_name: String,
    values: std::vec::IntoIter<String>,
    overlay: Arc<OverlayText>,
}

impl UrlGenerator {
    pub fn new(request: &AnimationRequest) -> Result<Self, AppError> {
        let base = parse_endpoint(&request.url)?;

        let mut shared_query: Vec<(String, String)> = base.query_pairs().into_owned().collect();
        for (key, value) in &request.wms_params {
            set_query_param(&mut shared_query, key, value);
        }

        Ok(Self {
            base,
            shared_query,
            parameter_name: request.parameter.name.clone(),
            values: request.parameter.values.clone().into_iter(),
            overlay: Arc::new(request.overlay_text()),
        })
    }

    /// Remaining tasks.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    fn url_for(&self, value: &str) -> Url {
        let mut query = self.shared_query.clone();
        set_query_param(&mut query, &self.parameter_name, value);

        let mut url = self.base.clone();
        url.query_pairs_mut().clear().extend_pairs(&query);
        url
    }

    /// Feeds every task into `tasks`, one hand-off at a time.
    ///
    /// Stops with `GeneratorCancelled` as soon as `cancellation` fires or the
    /// receiving side has gone away.
    pub async fn run(
        self,
        tasks: mpsc::Sender<FetchTask>,
        cancellation: CancellationToken,
    ) -> Result<(), AppError> {
        let mut issued = 0usize;
        for task in self {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    log::debug!("URL generator cancelled after {} tasks", issued);
                    return Err(AppError::GeneratorCancelled);
                }
                sent = tasks.send(task) => {
                    if sent.is_err() {
                        log::debug!("Task receivers gone after {} tasks", issued);
                        return Err(AppError::GeneratorCancelled);
                    }
                    issued += 1;
                }
            }
        }

        log::debug!("URL generator issued {} tasks", issued);
        Ok(())
    }
}

impl Iterator for UrlGenerator {
    type Item = FetchTask;

    fn next(&mut self) -> Option<FetchTask> {
        let value = self.values.next()?;
        Some(FetchTask {
            url: self.url_for(&value),
            value,
            overlay: Arc::clone(&self.overlay),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// Parses a base endpoint, defaulting the scheme to `https`.
///
/// Only `http` and `https` endpoints can serve tiles.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, AppError> {
    let trimmed = endpoint.trim();
    let candidate = if has_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{}", trimmed))
    };

    let url = Url::parse(&candidate).map_err(|e| AppError::MalformedEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// True when `endpoint` starts with `scheme://`, ignoring any `://` that only
/// appears in its path, query or fragment.
fn has_scheme(endpoint: &str) -> bool {
    let Some(separator) = endpoint.find("://") else {
        return false;
    };
    let authority_end = endpoint.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(endpoint.len());
    separator <= authority_end
}

/// Replaces every occurrence of `key` with a single `key=value` pair.
fn set_query_param(query: &mut Vec<(String, String)>, key: &str, value: &str) {
    query.retain(|(existing, _)| existing != key);
    query.push((key.to_string(), value.to_string()));
}
