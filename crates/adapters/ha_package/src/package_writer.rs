//! YAML implementation of [`PackageSink`].

use std::future::Future;
use std::path::PathBuf;

use locmode_app::ports::PackageSink;
use locmode_domain::document::CompiledDocument;
use locmode_domain::error::LocModeError;

use crate::error::PackageFsError;
use crate::yaml11::quote_ambiguous_scalars;

/// Writes packages below the Home Assistant configuration directory.
#[derive(Debug, Clone)]
pub struct YamlPackageWriter {
    root: PathBuf,
}

impl YamlPackageWriter {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PackageSink for YamlPackageWriter {
    fn render(&self, document: &CompiledDocument) -> Result<String, LocModeError> {
        let rendered = serde_yaml::to_string(document).map_err(PackageFsError::from)?;
        Ok(quote_ambiguous_scalars(&rendered))
    }

    fn write(
        &self,
        relative_path: String,
        content: String,
    ) -> impl Future<Output = Result<PathBuf, LocModeError>> + Send {
        let path = self.root.join(relative_path);
        async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| PackageFsError::Write {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
            tokio::fs::write(&path, content)
                .await
                .map_err(|source| PackageFsError::Write {
                    path: path.clone(),
                    source,
                })?;
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locmode_domain::compiler::{CompileConfig, compile};
    use locmode_domain::entity_ref::EntityRef;
    use locmode_domain::lighting::{LightingDirective, LightingRuleMap, Rgb};
    use locmode_domain::mode::Mode;
    use locmode_domain::time::DwellDuration;
    use locmode_domain::zone::ZoneRuleSet;

    fn document() -> CompiledDocument {
        document_with(DwellDuration::default(), None)
    }

    fn document_with(dwell: DwellDuration, effect: Option<&str>) -> CompiledDocument {
        let config = CompileConfig {
            tracker: Some(EntityRef::parse("phone_tracker", "device_tracker.pixel").unwrap()),
            light: Some(EntityRef::parse("light_entity", "light.living_room").unwrap()),
            ..CompileConfig::default()
        };
        let rules = ZoneRuleSet::builder()
            .florida_zones(["zone.disney"])
            .shopping_prefix("shopping_")
            .build();
        let lighting = LightingRuleMap::new().with(
            Mode::Florida,
            LightingDirective {
                color: Some(Rgb([0, 0, 255])),
                brightness: Some(200),
                effect: effect.map(ToString::to_string),
            },
        );
        compile(&config, &rules, dwell, &lighting, true).unwrap()
    }

    #[test]
    fn should_render_byte_identical_yaml() {
        let writer = YamlPackageWriter::new("/config");
        assert_eq!(
            writer.render(&document()).unwrap(),
            writer.render(&document()).unwrap()
        );
    }

    #[test]
    fn should_render_helpers_before_automations() {
        let yaml = YamlPackageWriter::new("/config")
            .render(&document())
            .unwrap();
        let keys: Vec<_> = yaml
            .lines()
            .filter(|line| !line.starts_with([' ', '-']))
            .collect();
        assert_eq!(
            keys,
            ["input_select:", "input_boolean:", "timer:", "automation:"]
        );
    }

    #[test]
    fn should_render_structure_home_assistant_reads() {
        let yaml = YamlPackageWriter::new("/config")
            .render(&document())
            .unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["timer"]["mode_dwell"]["duration"], "00:05:00");
        assert_eq!(
            value["input_select"]["location_mode"]["options"][0],
            "FLORIDA"
        );
        let start = &value["automation"][0];
        assert_eq!(start["id"], "llm_compute_mode_start_dwell");
        assert_eq!(start["mode"], "restart");
        assert_eq!(start["trigger"][0]["platform"], "state");
        assert!(start["trigger"][0]["to"].is_null());

        let light = &value["automation"][2]["action"][0]["choose"][0];
        assert_eq!(light["conditions"][0]["state"], "FLORIDA");
        assert_eq!(light["sequence"][0]["condition"], "state");
        assert_eq!(light["sequence"][0]["state"], "off");
        assert_eq!(light["sequence"][1]["service"], "light.turn_on");
        assert_eq!(light["sequence"][1]["data"]["rgb_color"][2], 255);
        assert_eq!(light["sequence"][1]["data"]["brightness"], 200);
    }

    #[test]
    fn should_quote_override_gate_state_for_yaml11_loaders() {
        let yaml = YamlPackageWriter::new("/config")
            .render(&document())
            .unwrap();
        assert!(yaml.contains("state: 'off'"), "{yaml}");
        assert!(!yaml.contains("state: off\n"), "{yaml}");
    }

    #[test]
    fn should_quote_effect_and_long_dwell_for_yaml11_loaders() {
        let dwell = DwellDuration::from_secs(36_000).unwrap();
        for effect in ["on", "yes"] {
            let yaml = YamlPackageWriter::new("/config")
                .render(&document_with(dwell, Some(effect)))
                .unwrap();
            assert!(yaml.contains(&format!("effect: '{effect}'")), "{yaml}");
            assert!(yaml.contains("duration: '10:00:00'"), "{yaml}");
        }
    }

    #[tokio::test]
    async fn should_create_parent_directories_when_writing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = YamlPackageWriter::new(dir.path());

        let path = writer
            .write("packages/nested/out.yaml".to_string(), "a: 1\n".to_string())
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("packages/nested/out.yaml"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a: 1\n");
    }
}
