use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Identifier of the remote pod running the transcription service
    pub pod_id: String,
    /// Directory where transcription reports are written
    pub report_dir: String,
}

impl Config {
    /// Load configuration from defaults overlaid with `WHISPERLIVE_*`
    /// environment variables (e.g. `WHISPERLIVE_POD_ID`).
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("pod_id", "g13ueotnboqg8f")?
            .set_default("report_dir", "artifacts")?
            .add_source(config::Environment::with_prefix("WHISPERLIVE"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Websocket endpoint derived from the pod identifier.
    pub fn endpoint_url(&self) -> String {
        format!("wss://{}-9090.proxy.runpod.net", self.pod_id)
    }
}
