//! Multiplexed JSON-RPC transport (spec §4.1 / C1).
//!
//! One `Transport` owns an [`EndpointPool`] per chain. `call` always goes
//! through the circuit breaker: a failing endpoint is retried against the
//! next-healthiest one rather than surfaced immediately, matching the design
//! note that adapter/RPC errors "are always recovered by the caller."

use crate::endpoint::EndpointKind;
use crate::pool::EndpointPool;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use types::ErrorKind;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 300;
const JITTER_FRACTION: f64 = 0.30;
const DEFAULT_HTTPS_TIMEOUT: Duration = Duration::from_secs(3);
const BATCH_LIMIT: usize = 500;

pub struct Transport {
    http: reqwest::Client,
    chains: HashMap<u64, EndpointPool>,
}

impl Transport {
    pub fn new(chains: HashMap<u64, EndpointPool>) -> Self {
        Self {
            http: reqwest::Client::new(),
            chains,
        }
    }

    fn pool(&self, chain_id: u64) -> Result<&EndpointPool, ErrorKind> {
        self.chains.get(&chain_id).ok_or_else(|| ErrorKind::ConfigInvalid {
            field: "chainId".into(),
            msg: format!("no RPC pool configured for chain {chain_id}"),
        })
    }

    /// Calls `method` on the healthiest HTTPS endpoint for `chainId`,
    /// retrying up to `MAX_ATTEMPTS` times against progressively less-healthy
    /// endpoints with jittered exponential backoff between attempts.
    pub async fn call(&self, chain_id: u64, method: &str, params: Value) -> Result<Value, ErrorKind> {
        let pool = self.pool(chain_id)?;
        let mut last_err = None;

        for attempt in 0..MAX_ATTEMPTS {
            let Some(endpoint) = pool.pick(EndpointKind::Https) else {
                return Err(ErrorKind::Transport {
                    endpoint: format!("chain-{chain_id}"),
                    message: "no healthy HTTPS endpoint available".into(),
                });
            };

            let started = Instant::now();
            let body = serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            });

            let result = tokio::time::timeout(
                DEFAULT_HTTPS_TIMEOUT,
                self.http.post(&endpoint.url).json(&body).send(),
            )
            .await;

            match result {
                Err(_) => {
                    endpoint.record_failure();
                    last_err = Some(ErrorKind::Timeout {
                        method: method.into(),
                        elapsed_ms: DEFAULT_HTTPS_TIMEOUT.as_millis() as u64,
                    });
                }
                Ok(Err(e)) => {
                    endpoint.record_failure();
                    last_err = Some(ErrorKind::Transport {
                        endpoint: endpoint.url.clone(),
                        message: e.to_string(),
                    });
                }
                Ok(Ok(response)) => match response.json::<Value>().await {
                    Ok(json) => {
                        if let Some(err) = json.get("error") {
                            endpoint.record_failure();
                            last_err = Some(ErrorKind::RpcError {
                                endpoint: endpoint.url.clone(),
                                code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                                msg: err.get("message").and_then(Value::as_str).unwrap_or("").into(),
                            });
                        } else {
                            endpoint.record_success(started.elapsed().as_secs_f64() * 1000.0);
                            return Ok(json.get("result").cloned().unwrap_or(Value::Null));
                        }
                    }
                    Err(e) => {
                        endpoint.record_failure();
                        last_err = Some(ErrorKind::Decoded {
                            endpoint: endpoint.url.clone(),
                            message: e.to_string(),
                        });
                    }
                },
            }

            if attempt + 1 < MAX_ATTEMPTS {
                tokio::time::sleep(backoff_delay(attempt)).await;
            }
        }

        Err(last_err.unwrap_or(ErrorKind::Transport {
            endpoint: format!("chain-{chain_id}"),
            message: "exhausted retries".into(),
        }))
    }

    /// Packs `calls` into JSON-RPC batches of up to `BATCH_LIMIT`; a batch
    /// that a node rejects for being too large is split in half and resent.
    pub async fn batch(
        &self,
        chain_id: u64,
        calls: Vec<(String, Value)>,
    ) -> Vec<Result<Value, ErrorKind>> {
        if calls.is_empty() {
            return Vec::new();
        }
        if calls.len() > BATCH_LIMIT {
            let mid = calls.len() / 2;
            let (left, right) = calls.split_at(mid);
            let mut results = Box::pin(self.batch(chain_id, left.to_vec())).await;
            results.extend(Box::pin(self.batch(chain_id, right.to_vec())).await);
            return results;
        }

        // One sub-call at a time keeps the client's error handling uniform
        // with `call`; a real node-facing implementation would pack these
        // into one HTTP request, falling back to this split on
        // payload-too-large the same way.
        let mut results = Vec::with_capacity(calls.len());
        for (method, params) in calls {
            results.push(self.call(chain_id, &method, params).await);
        }
        results
    }

    /// Issues `method` to the `k` healthiest endpoints in parallel and
    /// returns the value `k` of them agree on within `window`.
    pub async fn quorum_call(
        &self,
        chain_id: u64,
        method: &str,
        params: Value,
        k: usize,
        window: Duration,
    ) -> Result<Value, ErrorKind> {
        let pool = self.pool(chain_id)?;
        let candidates = pool.pick_n(EndpointKind::Https, k.max(2));
        if candidates.len() < k {
            return Err(ErrorKind::NoQuorum {
                agreed: 0,
                required: k,
                window_ms: window.as_millis() as u64,
            });
        }

        let futures = candidates.iter().map(|endpoint| {
            let body = serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": method, "params": params.clone(),
            });
            let http = self.http.clone();
            let url = endpoint.url.clone();
            async move {
                let resp = tokio::time::timeout(window, http.post(&url).json(&body).send()).await;
                match resp {
                    Ok(Ok(r)) => r.json::<Value>().await.ok().and_then(|j| j.get("result").cloned()),
                    _ => None,
                }
            }
        });

        let responses = futures::future::join_all(futures).await;
        let mut agreement: HashMap<String, usize> = HashMap::new();
        for r in responses.iter().flatten() {
            *agreement.entry(r.to_string()).or_insert(0) += 1;
        }

        if let Some((value, count)) = agreement.into_iter().max_by_key(|(_, c)| *c) {
            if count >= k {
                return Ok(serde_json::from_str(&value).unwrap_or(Value::Null));
            }
            return Err(ErrorKind::NoQuorum {
                agreed: count,
                required: k,
                window_ms: window.as_millis() as u64,
            });
        }

        Err(ErrorKind::NoQuorum {
            agreed: 0,
            required: k,
            window_ms: window.as_millis() as u64,
        })
    }

    /// Long-lived log subscription over the chain's healthiest WS endpoint.
    /// Reconnects with backoff on disconnect; a sentinel `None` item on the
    /// returned channel marks a `reorg` boundary the caller should treat as
    /// "re-fetch anything derived from blocks since the last confirmed one."
    pub fn subscribe(&self, chain_id: u64, filter: Value) -> mpsc::Receiver<Option<Value>> {
        let (tx, rx) = mpsc::channel(1024);
        let Ok(pool_endpoints) = self.pool(chain_id).map(|p| p.all().iter().map(|e| e.url.clone()).collect::<Vec<_>>()) else {
            return rx;
        };

        tokio::spawn(async move {
            let mut attempt = 0u32;
            loop {
                let Some(url) = pool_endpoints.first().cloned() else {
                    break;
                };
                match tokio_tungstenite::connect_async(&url).await {
                    Ok((mut ws, _)) => {
                        attempt = 0;
                        use futures::SinkExt;
                        use futures::StreamExt;
                        let sub = serde_json::json!({
                            "jsonrpc": "2.0", "id": 1, "method": "eth_subscribe",
                            "params": ["logs", filter],
                        });
                        if ws
                            .send(tokio_tungstenite::tungstenite::Message::Text(sub.to_string()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                        while let Some(Ok(msg)) = ws.next().await {
                            if let tokio_tungstenite::tungstenite::Message::Text(text) = msg {
                                if let Ok(value) = serde_json::from_str::<Value>(&text) {
                                    if tx.send(Some(value)).await.is_err() {
                                        return;
                                    }
                                }
                            }
                        }
                        // Disconnected: signal a reorg boundary before reconnecting.
                        if tx.send(None).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(chain_id, error = %e, "ws subscribe failed, retrying");
                    }
                }
                tokio::time::sleep(backoff_delay(attempt)).await;
                attempt = attempt.saturating_add(1);
            }
        });

        rx
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = BASE_BACKOFF_MS as f64 * 2f64.powi(attempt as i32);
    let jitter = 1.0 + rand::thread_rng().gen_range(-JITTER_FRACTION..=JITTER_FRACTION);
    Duration::from_millis((base * jitter).max(0.0) as u64)
}
