use crate::config::Config;
use crate::db::{connect_db, healthcheck, load_gate_state, save_gate_state};
use crate::events::fields::FieldMap;
use crate::events::import::{SurrealEventStore, import_from_sources};
use crate::gate::{GateState, RegistrationGate, SystemClock};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde::Deserialize;
use std::sync::Arc;
use surrealdb::{Surreal, engine::remote::ws::Client};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct TechfestMindServer {
    pub db: Surreal<Client>,
    pub cfg: Config,
    gate: Arc<Mutex<RegistrationGate<SystemClock>>>,
}

#[derive(Debug, Deserialize)]
struct DepartmentCount {
    department: String,
    count: i64,
}

impl TechfestMindServer {
    pub async fn new(cfg: Config) -> Result<Self> {
        let db = connect_db(&cfg).await?;
        let state = load_gate_state(&db).await?.unwrap_or(GateState::Open);
        let gate = Arc::new(Mutex::new(RegistrationGate::from_state(state, SystemClock)));
        Ok(Self { db, cfg, gate })
    }

    /// Lightweight health tool: returns DB connectivity + config surface.
    pub async fn handle_health(&self, _req: CallToolRequestParam) -> Result<CallToolResult> {
        let db_ok = healthcheck(&self.db).await.unwrap_or(false);
        let body = serde_json::json!({
            "db": db_ok,
            "namespace": self.cfg.db_namespace,
            "database": self.cfg.db_name,
        });
        Ok(CallToolResult::structured(body))
    }

    /// Event count plus a per-department breakdown (best effort, errors
    /// become empty).
    pub async fn handle_status(&self, _req: CallToolRequestParam) -> Result<CallToolResult> {
        let total = self
            .db
            .query("SELECT count() FROM event GROUP ALL;")
            .await
            .ok()
            .and_then(|mut res| res.take::<Option<i64>>(0).ok())
            .flatten()
            .unwrap_or(0);

        let departments: Vec<DepartmentCount> = self
            .db
            .query("SELECT department, count() AS count FROM event GROUP BY department;")
            .await
            .ok()
            .and_then(|mut res| res.take(0).ok())
            .unwrap_or_default();

        let mut by_department = serde_json::Map::new();
        for d in departments {
            by_department.insert(d.department, serde_json::json!(d.count));
        }

        Ok(CallToolResult::structured(serde_json::json!({
            "events": total,
            "by_department": by_department,
        })))
    }

    /// Runs the tabular importer against the configured (or overridden)
    /// source files and returns the summary. Missing sources are a hard
    /// error; individual record failures are reported inside the summary.
    pub async fn handle_import(&self, req: CallToolRequestParam) -> Result<CallToolResult> {
        let arg = |key: &str| {
            req.arguments
                .as_ref()
                .and_then(|a| a.get(key))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        let csv_path = arg("csv_path").unwrap_or_else(|| self.cfg.csv_path.clone());
        let xlsx_path = arg("xlsx_path").unwrap_or_else(|| self.cfg.xlsx_path.clone());

        let store = SurrealEventStore { db: &self.db };
        let summary =
            import_from_sources(&store, &csv_path, &xlsx_path, &FieldMap::default()).await?;
        Ok(CallToolResult::structured(serde_json::to_value(&summary)?))
    }

    /// Registration gate control: `status` (default), `open`, `close`, or
    /// `schedule` with an RFC 3339 `at` argument.
    pub async fn handle_registration_gate(
        &self,
        req: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let arg = |key: &str| {
            req.arguments
                .as_ref()
                .and_then(|a| a.get(key))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        let action = arg("action").unwrap_or_else(|| "status".to_string());

        let mut gate = self.gate.lock().await;
        match action.as_str() {
            "status" => {}
            "open" => gate.open(),
            "close" => gate.close(),
            "schedule" => {
                let at = arg("at")
                    .ok_or_else(|| anyhow::anyhow!("schedule requires an 'at' timestamp"))?;
                let at: DateTime<Utc> = at
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid 'at' timestamp: {e}"))?;
                gate.schedule_close(at);
            }
            other => anyhow::bail!("unknown registration_gate action: {other}"),
        }

        let state = gate.state();
        let is_open = gate.is_open();
        drop(gate);

        if let Err(e) = save_gate_state(&self.db, state).await {
            tracing::warn!(error = %e, "failed to persist registration gate state");
        }

        Ok(CallToolResult::structured(serde_json::json!({
            "registration_open": is_open,
            "gate": state,
        })))
    }
}
