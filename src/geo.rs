// src/geo.rs
use crate::models::server::ServerRecord;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    #[serde(default, alias = "CC")]
    pub cc: String,
    #[serde(default, alias = "Country")]
    pub country: String,
    #[serde(default, alias = "Region")]
    pub region: String,
}

/// Exact-match IPv4 to location table.
#[derive(Debug, Default)]
pub struct GeoDatabase {
    entries: HashMap<String, GeoInfo>,
}

impl GeoDatabase {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    /// Reads the database from `path`, downloading it from `url` first if the
    /// file does not exist yet.
    pub async fn load(path: &str, url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if !Path::new(path).exists() {
            info!("Downloading geo database from {}...", url);
            let response = reqwest::get(url).await?.error_for_status()?;
            let text = response.text().await?;
            tokio::fs::write(path, &text).await?;
        }

        let json = tokio::fs::read_to_string(path).await?;
        let database = Self::from_json(&json)?;
        info!("Loaded {} geo entries", database.len());
        Ok(database)
    }

    pub fn get(&self, ip: &str) -> GeoInfo {
        self.entries.get(ip).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerWithGeo {
    #[serde(flatten)]
    pub server: ServerRecord,
    pub geo: GeoInfo,
}

pub fn append_geo(servers: Vec<ServerRecord>, database: &GeoDatabase) -> Vec<ServerWithGeo> {
    servers
        .into_iter()
        .map(|server| {
            let geo = database.get(&server.address.host);
            ServerWithGeo { server, geo }
        })
        .collect()
}
