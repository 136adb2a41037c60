use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub db_namespace: String,
    pub db_name: String,
    pub db_user: String,
    pub db_pass: String,
    pub csv_path: String,
    pub xlsx_path: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let db_url = env::var("FEST_DB_URL").unwrap_or_else(|_| "ws://127.0.0.1:8000".to_string());
        let db_namespace = env::var("FEST_DB_NS").unwrap_or_else(|_| "techfest".to_string());
        let db_name = env::var("FEST_DB_NAME").unwrap_or_else(|_| "ops".to_string());
        let db_user = env::var("FEST_DB_USER").unwrap_or_else(|_| "root".to_string());
        let db_pass = env::var("FEST_DB_PASS").unwrap_or_else(|_| "root".to_string());

        // Default drop locations for the survey exports; import callers can
        // still pass explicit paths.
        let csv_path = env::var("FEST_CSV_PATH").unwrap_or_else(|_| "data/events.csv".to_string());
        let xlsx_path =
            env::var("FEST_XLSX_PATH").unwrap_or_else(|_| "data/events.xlsx".to_string());

        Ok(Self {
            db_url,
            db_namespace,
            db_name,
            db_user,
            db_pass,
            csv_path,
            xlsx_path,
        })
    }
}
