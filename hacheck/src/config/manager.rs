use super::{Config, GroupConfigFile};
use anyhow::{anyhow, Result};
use glob::glob;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| anyhow!("Failed to read main config {}: {}", main_config_path, e))?;

        let mut config = Config::from_main_toml(&main_config_content)?;

        // Every other file is a node group named after its stem
        let pattern = format!("{}/*.toml", config_dir);
        let mut service_nodes = BTreeMap::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid filename"))?;

            if filename == "main.toml" {
                continue;
            }

            let group_name = filename
                .strip_suffix(".toml")
                .ok_or_else(|| anyhow!("Invalid config filename: {}", filename))?;

            debug!("Loading node group config: {}", path.display());

            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

            let group_file: GroupConfigFile = toml::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;

            for (node_id, mut node_config) in group_file.nodes {
                if node_id.contains('/') {
                    return Err(anyhow!(
                        "Node id '{}' in {} must not contain '/'",
                        node_id,
                        path.display()
                    ));
                }

                node_config.group = group_name.to_string();
                let name = format!("{}/{}", group_name, node_id);

                if service_nodes.insert(name.clone(), node_config).is_some() {
                    return Err(anyhow!("Duplicate service node name: {}", name));
                }
            }
        }

        config.service_nodes = service_nodes;
        config.validate()?;

        info!(
            "Loaded {} service nodes ({} enabled) from {}",
            config.service_nodes.len(),
            config.monitored_targets().len(),
            config_dir
        );

        Ok(config)
    }
}
