//! Client for the Wandbox online compiler.
//!
//! Two endpoints are used: `GET /api/list.json` for the compiler catalog and
//! `POST /api/compile.json` to build and run a program.

use std::collections::BTreeSet;
use std::env;

use eyre::{eyre, WrapErr};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const DEFAULT_URL: &str = "https://wandbox.org";
pub const URL_ENV: &str = "WANDBOX_URL";
pub const USER_AGENT: &str = concat!("wandboxit/", env!("CARGO_PKG_VERSION"));

/// Switch groups holding the language standard choices.
const STANDARD_SWITCHES: &[&str] = &["std-cxx", "std-c"];

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<SwitchOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompilerInfo {
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub switches: Vec<SwitchGroup>,
}

#[derive(Debug)]
pub struct Catalog {
    pub compilers: Vec<CompilerInfo>,
}

impl Catalog {
    /// The service answers with an array of arrays of compilers.
    pub fn from_nested(nested: Vec<Vec<CompilerInfo>>) -> Self {
        Self {
            compilers: nested.into_iter().flatten().collect(),
        }
    }

    pub fn languages(&self) -> BTreeSet<&str> {
        self.compilers
            .iter()
            .map(|compiler| compiler.language.as_str())
            .collect()
    }

    pub fn compilers(&self, language: &str) -> Vec<&str> {
        self.compilers
            .iter()
            .filter(|compiler| compiler.language == language)
            .map(|compiler| compiler.name.as_str())
            .collect()
    }

    /// Empty when no compiler has that name.
    pub fn standards(&self, compiler: &str) -> Vec<&str> {
        self.compilers
            .iter()
            .find(|info| info.name == compiler)
            .into_iter()
            .flat_map(|info| info.switches.iter())
            .filter(|group| STANDARD_SWITCHES.contains(&group.name.as_str()))
            .flat_map(|group| group.options.iter())
            .map(|option| option.name.as_str())
            .collect()
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CompileRequest<'a> {
    pub code: &'a str,
    pub options: String,
    pub compiler: &'a str,
}

impl<'a> CompileRequest<'a> {
    pub fn new(code: &'a str, compiler: &'a str, standard: &str) -> Self {
        Self {
            code,
            options: format!("warning,{}", standard),
            compiler,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct CompileResult {
    pub compiler_message: String,
    pub program_error: String,
    pub program_output: String,
}

pub struct Wandbox {
    client: reqwest::Client,
    base_url: String,
}

impl Wandbox {
    pub fn new(base_url: impl Into<String>) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .wrap_err("failed to build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_env() -> eyre::Result<Self> {
        let base_url = env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    pub async fn catalog(&self) -> eyre::Result<Catalog> {
        let url = self.endpoint("list.json");
        info!("fetching compiler list from {}", url);
        let nested: Vec<Vec<CompilerInfo>> = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("GET {} failed", url))?
            .error_for_status()?
            .json()
            .await
            .wrap_err_with(|| format!("malformed compiler list from {}", url))?;
        let catalog = Catalog::from_nested(nested);
        debug!("catalog has {} compilers", catalog.compilers.len());
        Ok(catalog)
    }

    pub async fn compile(&self, request: &CompileRequest<'_>) -> eyre::Result<CompileResult> {
        let url = self.endpoint("compile.json");
        let body = serde_json::to_string(request)?;
        info!("compiling with {} ({})", request.compiler, request.options);
        debug!("request: {}", body);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .wrap_err_with(|| format!("POST {} failed", url))?
            .error_for_status()?
            .text()
            .await?;
        debug!("response: {}", response);
        // only the first element is part of the contract
        let results: Vec<serde_json::Value> = serde_json::from_str(&response)
            .wrap_err_with(|| format!("malformed compile result from {}", url))?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("{} returned an empty result array", url))?;
        serde_json::from_value(first)
            .wrap_err_with(|| format!("malformed compile result from {}", url))
    }
}
