use serde::{Deserialize, Serialize};

/// Performance counters reported by the server's `/metrics` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerMetrics {
    pub uptime_seconds: f64,
    pub tokens_per_second: f64,
    pub avg_prompt_latency_ms: f64,
    pub avg_generation_latency_ms: f64,
    pub busy_slots_ratio: f64,
    pub total_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub kv_cache_tokens: u64,
    pub kv_cache_used_cells: u64,
    pub total_prompt_tokens: u64,
    pub total_generated_tokens: u64,
    pub total_decode_calls: u64,
}

/// `{"status": ..., "data": ..., "message": ...}` wrapper around metrics.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<ServerMetrics>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}

impl MetricsEnvelope {
    /// Whether the server reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
