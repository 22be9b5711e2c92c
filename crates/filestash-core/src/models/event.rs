use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Correlation headers that travel with every instance-flow event.
///
/// Used to key log lines so an operator can follow one instance across services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceFlowHeaders {
    pub correlation_id: Option<Uuid>,
    pub source_application_id: Option<i64>,
    pub source_application_integration_id: Option<String>,
    pub source_application_instance_id: Option<String>,
    pub instance_id: Option<i64>,
}

fn write_opt<T: Display>(f: &mut Formatter<'_>, value: &Option<T>) -> FmtResult {
    match value {
        Some(v) => write!(f, "{}", v),
        None => write!(f, "-"),
    }
}

impl Display for InstanceFlowHeaders {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "correlationId=")?;
        write_opt(f, &self.correlation_id)?;
        write!(f, " sourceApplicationId=")?;
        write_opt(f, &self.source_application_id)?;
        write!(f, " sourceApplicationIntegrationId=")?;
        write_opt(f, &self.source_application_integration_id)?;
        write!(f, " sourceApplicationInstanceId=")?;
        write_opt(f, &self.source_application_instance_id)?;
        write!(f, " instanceId=")?;
        write_opt(f, &self.instance_id)
    }
}

/// Notification that an upstream instance was deleted together with the
/// files it referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDeletedEvent {
    #[serde(default)]
    pub headers: InstanceFlowHeaders,
    #[serde(default)]
    pub file_ids: Option<Vec<Uuid>>,
}

impl InstanceDeletedEvent {
    /// File ids carried by the event; a missing list reads as empty.
    pub fn file_ids(&self) -> &[Uuid] {
        self.file_ids.as_deref().unwrap_or(&[])
    }
}
