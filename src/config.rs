use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub interaction: InteractionConfigData,
    pub camera: CameraConfigData,
    pub models: ModelManifest,
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "using default config");
            let config = Self::default();
            // Try to save the default config
            if let Err(err) = config.save(path) {
                tracing::warn!(error = %err, "could not write default config");
            }
            config
        })
    }
}

/// What the button system does when an action returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFailurePolicy {
    /// Abort the frame and hand the error to the caller
    #[default]
    Propagate,
    /// Log the failure and continue with the next button
    Isolate,
}

/// Interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfigData {
    /// Idle spin in radians per second
    pub rotation_rate: f32,
    /// Cursor distance when a pointer hits nothing
    pub resting_cursor_distance: f32,
    /// Opacity of models hidden by an isolate action
    pub dimmed_opacity: f32,
    pub action_failure_policy: ActionFailurePolicy,
}

impl Default for InteractionConfigData {
    fn default() -> Self {
        Self {
            rotation_rate: 0.4,
            resting_cursor_distance: 1.5,
            dimmed_opacity: 0.1,
            action_failure_policy: ActionFailurePolicy::Propagate,
        }
    }
}

/// Viewer configuration used before the headset takes over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfigData {
    #[serde(with = "vec3_serde")]
    pub position: Vec3,

    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfigData {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.2, 0.3),
            fov: 50.0,
            near: 0.1,
            far: 10.0,
        }
    }
}

/// One model file and where to place its parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub path: String,
    pub scale: f32,

    #[serde(with = "vec3_serde")]
    pub position: Vec3,
}

impl ModelEntry {
    pub fn new(name: &str, scale: f32, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            path: format!("models/{name}.obj"),
            scale,
            position,
        }
    }
}

/// Models to load at session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelManifest {
    /// Directory model paths are resolved against
    pub asset_root: String,
    pub entries: Vec<ModelEntry>,
}

impl Default for ModelManifest {
    fn default() -> Self {
        let organelles: [(&str, f32, [f32; 3]); 23] = [
            ("cilia", 0.335, [0.0, -1.1145, -1.0]),
            ("centriole", 0.216, [-0.14, -1.1, -1.0]),
            ("cytoplasm", 0.319, [0.0, -1.15, -1.0]),
            ("golgi1", 0.235, [0.0, -1.13, -0.96]),
            ("golgi2", 0.24, [0.005, -1.14, -0.989]),
            ("lyso1", 0.205, [0.0, -1.12, -1.0]),
            ("lyso2", 0.157, [-0.06, -1.12, -1.0]),
            ("microfil1", 0.66, [0.0, -1.15, -1.0]),
            ("microfil2", 0.23, [0.0, -1.12, -1.0]),
            ("microtubules", 0.24, [0.0, -1.12, -1.0]),
            ("mitochondria", 0.245, [0.0, -1.12, -0.991]),
            ("nucleus1", 0.24, [0.0, -1.15, -1.0]),
            ("nucleus2", 0.24, [0.0, -1.15, -1.0]),
            ("nucleus3", 0.24, [0.0, -1.15, -1.0]),
            ("perox1", 0.115, [-0.015, -1.12, -0.965]),
            ("perox2", 0.0135, [0.0, -1.12, -1.05]),
            ("plasmaMembrane", 0.244, [0.0, -1.082, -1.0]),
            ("ribosome1", 0.235, [0.0, -1.125, -1.0]),
            ("ribosome2", 0.235, [0.0, -1.125, -1.0]),
            ("roughER", 0.238, [0.0, -1.12, -0.97]),
            ("smoothER", 0.242, [0.0, -1.13, -1.0]),
            ("vacuole1", 0.126, [0.0, -1.12, -1.0]),
            ("vacuole2", 0.11, [0.05, -1.12, -0.98]),
        ];

        Self {
            asset_root: "assets".to_string(),
            entries: organelles
                .iter()
                .map(|&(name, scale, position)| ModelEntry::new(name, scale, Vec3::from(position)))
                .collect(),
        }
    }
}

/// Custom serialization for Vec3
mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.interaction.rotation_rate, 0.4);
        assert_eq!(config.interaction.resting_cursor_distance, 1.5);
        assert_eq!(config.models.entries.len(), 23);
        assert_eq!(config.models.entries[0].path, "models/cilia.obj");
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = EngineConfig::default();
        config.interaction.action_failure_policy = ActionFailurePolicy::Isolate;
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "interaction": { "dimmed_opacity": 0.3, "action_failure_policy": "isolate" },
                 "camera": { "position": { "x": 1.0, "y": 2.0, "z": 3.0 } } }"#,
        )
        .unwrap();

        let loaded = EngineConfig::load(&path).unwrap();

        assert_eq!(loaded.interaction.dimmed_opacity, 0.3);
        assert_eq!(loaded.interaction.rotation_rate, 0.4);
        assert_eq!(loaded.interaction.action_failure_policy, ActionFailurePolicy::Isolate);
        assert_eq!(loaded.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(loaded.camera.fov, 50.0);
        assert_eq!(loaded.models.entries.len(), 23);
    }

    #[test]
    fn test_load_or_default_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = EngineConfig::load_or_default(&path);

        assert_eq!(config, EngineConfig::default());
        assert!(path.exists());
    }
}
