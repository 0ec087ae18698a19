//! Traffic analytics backed by the gateway's Prometheus metrics.
//!
//! Thin proxy over Prometheus `query_range`: we build the PromQL, forward the
//! time window, and reshape the matrix response into labelled series. An
//! unreachable or erroring Prometheus degrades to an empty result set so the
//! dashboards render blank instead of failing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Query parameters shared by all analytics endpoints. Unix-second bounds
/// defaulting to the trailing hour at one-minute resolution, plus optional
/// `consumer`/`route` label filters narrowing every query.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<u32>,
    pub consumer: Option<String>,
    pub route: Option<String>,
}

impl RangeParams {
    pub fn resolve(&self) -> (i64, i64, u32) {
        let end = self.end.unwrap_or_else(|| chrono::Utc::now().timestamp());
        let start = self.start.unwrap_or(end - 3600);
        let step = self.step.unwrap_or(60);
        (start, end, step)
    }

    /// Render the optional filters as PromQL label matchers, e.g.
    /// `consumer="svc-billing",route="r1"`. Empty when no filter is set.
    fn label_matchers(&self) -> String {
        let mut matchers = Vec::new();
        if let Some(consumer) = self.consumer.as_deref().filter(|s| !s.is_empty()) {
            matchers.push(format!("consumer=\"{consumer}\""));
        }
        if let Some(route) = self.route.as_deref().filter(|s| !s.is_empty()) {
            matchers.push(format!("route=\"{route}\""));
        }
        matchers.join(",")
    }
}

/// One sample of a range query: unix timestamp and Prometheus' stringly
/// encoded value, passed through untouched.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: f64,
    pub value: String,
}

/// A labelled time series reshaped from a Prometheus matrix entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

// ---------------------------------------------------------------------------
// PromQL
// ---------------------------------------------------------------------------

/// Request rate per consumer/route pair, narrowed by any filters.
pub fn requests_query(params: &RangeParams) -> String {
    format!(
        "sum(irate(apisix_http_status{{{}}}[5m])) by (consumer, route)",
        params.label_matchers()
    )
}

/// 95th-percentile request latency per route, narrowed by any filters.
pub fn latency_query(params: &RangeParams) -> String {
    let matchers = params.label_matchers();
    let selector = if matchers.is_empty() {
        "type=\"request\"".to_string()
    } else {
        format!("type=\"request\",{matchers}")
    };
    format!(
        "histogram_quantile(0.95, sum(rate(apisix_http_latency_bucket{{{selector}}}[5m])) by (le, route))"
    )
}

/// Share of responses outside the 2xx/3xx classes, as a percentage,
/// narrowed by any filters.
pub fn errors_query(params: &RangeParams) -> String {
    let matchers = params.label_matchers();
    let error_selector = if matchers.is_empty() {
        "code!~\"[23]..\"".to_string()
    } else {
        format!("code!~\"[23]..\",{matchers}")
    };
    format!(
        "sum(rate(apisix_http_status{{{error_selector}}}[5m])) by (route) \
         / sum(rate(apisix_http_status{{{matchers}}}[5m])) by (route) * 100"
    )
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct PrometheusClient {
    client: reqwest::Client,
    base_url: String,
}

impl PrometheusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Run a range query and reshape the matrix. Any transport or payload
    /// failure is logged and yields an empty vec.
    pub async fn query_range(&self, query: &str, start: i64, end: i64, step: u32) -> Vec<Series> {
        match self.try_query_range(query, start, end, step).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(error = %e, query, "Prometheus range query failed, returning empty result");
                Vec::new()
            }
        }
    }

    async fn try_query_range(
        &self,
        query: &str,
        start: i64,
        end: i64,
        step: u32,
    ) -> Result<Vec<Series>, reqwest::Error> {
        let url = format!("{}/api/v1/query_range", self.base_url);
        let body: serde_json::Value = self
            .client
            .get(&url)
            .query(&[
                ("query", query.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("step", step.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_matrix(&body))
    }
}

/// Reshape a Prometheus matrix response into labelled series. Entries that
/// do not look like matrix rows are skipped.
pub fn parse_matrix(body: &serde_json::Value) -> Vec<Series> {
    let Some(results) = body
        .get("data")
        .and_then(|d| d.get("result"))
        .and_then(|r| r.as_array())
    else {
        return Vec::new();
    };

    results
        .iter()
        .map(|entry| {
            let metric = entry.get("metric");
            let label = series_label(metric);
            let points = entry
                .get("values")
                .and_then(|v| v.as_array())
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|pair| {
                            let arr = pair.as_array()?;
                            Some(SeriesPoint {
                                timestamp: arr.first()?.as_f64()?,
                                value: arr.get(1)?.as_str()?.to_string(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Series { label, points }
        })
        .collect()
}

/// Pick a display label from the metric labels: consumer wins over route,
/// route over status code.
fn series_label(metric: Option<&serde_json::Value>) -> String {
    let get = |key: &str| {
        metric
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    };
    if let Some(consumer) = get("consumer") {
        consumer.to_string()
    } else if let Some(route) = get("route") {
        route.to_string()
    } else if let Some(code) = get("code") {
        format!("HTTP {code}")
    } else {
        "all".to_string()
    }
}
