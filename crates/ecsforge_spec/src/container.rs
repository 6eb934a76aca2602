//! Container definition models.
//!
//! A [`ContainerDefinition`] is rendered into the `containerDefinitions`
//! field of an ECS task definition, which expects a JSON-encoded list. The
//! serialized field names therefore follow the ECS API exactly.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{SpecError, SpecResult};

/// A single container in an ECS task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    /// Unset until validation substitutes an empty list.
    #[serde(default)]
    pub port_mappings: Option<Vec<PortMapping>>,
    /// Unset until validation substitutes an empty list.
    #[serde(default)]
    pub environment: Option<Vec<EnvVar>>,
    /// Optional while building, mandatory once validated.
    #[serde(default)]
    pub log_configuration: Option<LogConfiguration>,
    #[serde(default)]
    pub docker_labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_parameters: Option<LinuxParameters>,
}

impl ContainerDefinition {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            port_mappings: None,
            environment: None,
            log_configuration: None,
            docker_labels: BTreeMap::new(),
            linux_parameters: None,
        }
    }

    pub fn port(mut self, container_port: u16, host_port: u16, protocol: impl Into<String>) -> Self {
        self.port_mappings
            .get_or_insert_with(Vec::new)
            .push(PortMapping::new(container_port, host_port, protocol));
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment
            .get_or_insert_with(Vec::new)
            .push(EnvVar::new(name, value));
        self
    }

    pub fn log_configuration(mut self, config: LogConfiguration) -> Self {
        self.log_configuration = Some(config);
        self
    }

    pub fn docker_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.docker_labels.insert(key.into(), value.into());
        self
    }

    /// Add a Linux capability (e.g. `SYS_PTRACE`).
    pub fn add_capability(mut self, capability: impl Into<String>) -> Self {
        self.linux_parameters
            .get_or_insert_with(LinuxParameters::default)
            .capabilities
            .add
            .push(capability.into());
        self
    }

    /// Drop a Linux capability (e.g. `NET_RAW`).
    pub fn drop_capability(mut self, capability: impl Into<String>) -> Self {
        self.linux_parameters
            .get_or_insert_with(LinuxParameters::default)
            .capabilities
            .drop
            .push(capability.into());
        self
    }

    /// Validate the definition and return its normalized form.
    ///
    /// Unset port mappings and environment become empty lists so the
    /// rendered JSON always carries `[]` for them. A log configuration is
    /// required even though the builder treats it as optional.
    pub fn validate(mut self) -> SpecResult<Self> {
        if self.name.is_empty() {
            return Err(SpecError::missing("ContainerDefinition.Name"));
        }

        if self.image.is_empty() {
            return Err(SpecError::missing("ContainerDefinition.Image"));
        }

        if self.port_mappings.is_none() {
            self.port_mappings = Some(Vec::new());
        }

        if self.environment.is_none() {
            self.environment = Some(Vec::new());
        }

        if self.log_configuration.is_none() {
            return Err(SpecError::missing("ContainerDefinition.LogConfiguration"));
        }

        debug!("Validated container definition {}", self.name);
        Ok(self)
    }

    /// Render as a one-element JSON array, the shape ECS task definitions
    /// accept for their container list.
    pub fn to_json_array(&self) -> SpecResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("[{}]", json))
    }
}

impl fmt::Display for ContainerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "[{}]", json)
    }
}

/// Port exposed by the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
    pub protocol: String,
}

impl PortMapping {
    pub fn new(container_port: u16, host_port: u16, protocol: impl Into<String>) -> Self {
        Self {
            container_port,
            host_port,
            protocol: protocol.into(),
        }
    }
}

/// Environment variable passed to the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Log driver settings.
///
/// `options` and `secretOptions` are passed through to ECS untouched; their
/// contents depend on the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfiguration {
    pub log_driver: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secret_options: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Map<String, Value>,
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LogConfiguration {
    pub fn new(log_driver: impl Into<String>) -> Self {
        Self {
            log_driver: log_driver.into(),
            secret_options: Vec::new(),
            options: Map::new(),
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add a secret option in the `{name, valueFrom}` shape ECS documents.
    pub fn secret_option(mut self, name: impl Into<String>, value_from: impl Into<String>) -> Self {
        self.secret_options.push(serde_json::json!({
            "name": name.into(),
            "valueFrom": value_from.into(),
        }));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinuxParameters {
    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Kernel capabilities added to or dropped from the default set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub drop: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awslogs() -> LogConfiguration {
        LogConfiguration::new("awslogs")
            .option("awslogs-group", "/ecs/web")
            .option("awslogs-region", "us-east-1")
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let err = ContainerDefinition::new("", "nginx")
            .log_configuration(awslogs())
            .validate()
            .unwrap_err();

        assert!(err.is_missing_field());
        assert_eq!(err.to_string(), "missing ContainerDefinition.Name");
    }

    #[test]
    fn test_validate_rejects_empty_image() {
        let err = ContainerDefinition::new("web", "")
            .log_configuration(awslogs())
            .validate()
            .unwrap_err();

        assert!(err.is_missing_field());
        assert_eq!(err.to_string(), "missing ContainerDefinition.Image");
    }

    #[test]
    fn test_validate_requires_log_configuration() {
        let err = ContainerDefinition::new("web", "nginx").validate().unwrap_err();

        assert!(matches!(err, SpecError::MissingField(ref f) if f == "ContainerDefinition.LogConfiguration"));
    }

    #[test]
    fn test_name_checked_before_log_configuration() {
        let err = ContainerDefinition::new("", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "missing ContainerDefinition.Name");
    }

    #[test]
    fn test_validate_fills_unset_sequences() {
        let original = ContainerDefinition::new("web", "nginx")
            .docker_label("team", "edge")
            .log_configuration(awslogs());
        assert!(original.port_mappings.is_none());
        assert!(original.environment.is_none());

        let validated = original.clone().validate().unwrap();

        assert_eq!(validated.port_mappings, Some(vec![]));
        assert_eq!(validated.environment, Some(vec![]));
        assert_eq!(validated.name, original.name);
        assert_eq!(validated.image, original.image);
        assert_eq!(validated.log_configuration, original.log_configuration);
        assert_eq!(validated.docker_labels, original.docker_labels);
        assert_eq!(validated.linux_parameters, original.linux_parameters);
    }

    #[test]
    fn test_validate_keeps_existing_sequences() {
        let validated = ContainerDefinition::new("web", "nginx")
            .port(80, 8080, "tcp")
            .env("MODE", "prod")
            .log_configuration(awslogs())
            .validate()
            .unwrap();

        assert_eq!(validated.port_mappings, Some(vec![PortMapping::new(80, 8080, "tcp")]));
        assert_eq!(validated.environment, Some(vec![EnvVar::new("MODE", "prod")]));
    }

    #[test]
    fn test_display_wraps_object_in_array() {
        let container = ContainerDefinition::new("web", "nginx")
            .log_configuration(LogConfiguration::new("awslogs"))
            .validate()
            .unwrap();

        let rendered = container.to_string();
        let json = serde_json::to_string(&container).unwrap();

        assert_eq!(rendered, format!("[{}]", json));
        assert_eq!(container.to_json_array().unwrap(), rendered);
    }

    #[test]
    fn test_rendered_field_names() {
        let container = ContainerDefinition::new("web", "nginx")
            .port(443, 443, "tcp")
            .env("A", "1")
            .log_configuration(awslogs().secret_option("token", "arn:aws:ssm:::parameter/token"))
            .validate()
            .unwrap();

        let value: Value = serde_json::from_str(&container.to_string()).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);

        let object = items[0].as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["dockerLabels", "environment", "image", "logConfiguration", "name", "portMappings"]
        );

        assert_eq!(object["portMappings"][0]["containerPort"], 443);
        assert_eq!(object["portMappings"][0]["hostPort"], 443);
        assert_eq!(object["logConfiguration"]["logDriver"], "awslogs");
        assert_eq!(object["logConfiguration"]["options"]["awslogs-group"], "/ecs/web");
        assert_eq!(object["logConfiguration"]["secretOptions"][0]["valueFrom"], "arn:aws:ssm:::parameter/token");
        assert_eq!(object["dockerLabels"], serde_json::json!({}));
    }

    #[test]
    fn test_linux_parameters_rendered_when_present() {
        let container = ContainerDefinition::new("agent", "datadog/agent")
            .add_capability("SYS_PTRACE")
            .drop_capability("NET_RAW")
            .log_configuration(awslogs())
            .validate()
            .unwrap();

        let value: Value = serde_json::from_str(&container.to_string()).unwrap();
        let caps = &value[0]["linuxParameters"]["capabilities"];
        assert_eq!(caps["add"], serde_json::json!(["SYS_PTRACE"]));
        assert_eq!(caps["drop"], serde_json::json!(["NET_RAW"]));
    }

    #[test]
    fn test_null_log_options_read_as_empty() {
        let config: LogConfiguration = serde_json::from_str(
            r#"{"logDriver": "awslogs", "secretOptions": null, "options": null}"#,
        )
        .unwrap();

        assert!(config.secret_options.is_empty());
        assert!(config.options.is_empty());

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["secretOptions"], serde_json::json!([]));
        assert_eq!(value["options"], serde_json::json!({}));
    }
}
