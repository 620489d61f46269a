//! Device specification parsing.
//!
//! Accepts the `/job:<name>/replica:<n>/task:<n>/device:<TYPE>:<id|*>` form, any
//! subset of its components, and the legacy `/<type>:<id>` component.

use once_cell::sync::Lazy;
use regex::Regex;
use tfop_core::{Status, StatusResult};

static JOB_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("invalid job name pattern"));
static DEVICE_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("invalid device type pattern"));

/// Parsed device specification. Absent components are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSpec {
    pub job: Option<String>,
    pub replica: Option<u32>,
    pub task: Option<u32>,
    pub device_type: Option<String>,
    /// `None` for `*` or when no id is given.
    pub device_id: Option<u32>,
}

impl DeviceSpec {
    pub fn parse(spec: &str) -> StatusResult<Self> {
        let mut parsed = DeviceSpec::default();
        if spec.is_empty() || spec == "/" {
            return Ok(parsed);
        }
        let body = spec.strip_prefix('/').unwrap_or(spec);
        for component in body.split('/') {
            parsed.apply(component).map_err(|reason| {
                Status::invalid_argument(format!("Malformed device specification '{spec}': {reason}"))
            })?;
        }
        Ok(parsed)
    }

    fn apply(&mut self, component: &str) -> Result<(), String> {
        let mut parts = component.splitn(2, ':');
        let key = parts.next().unwrap_or_default();
        let Some(rest) = parts.next() else {
            return Err(format!("component '{component}' has no value"));
        };
        match key {
            "job" => {
                if !JOB_NAME.is_match(rest) {
                    return Err(format!("invalid job name '{rest}'"));
                }
                self.job = Some(rest.to_string());
            }
            "replica" => self.replica = Some(parse_index(rest)?),
            "task" => self.task = Some(parse_index(rest)?),
            "device" => {
                let mut device = rest.splitn(2, ':');
                let device_type = device.next().unwrap_or_default();
                self.set_device(device_type, device.next())?;
            }
            legacy => self.set_device(legacy, Some(rest))?,
        }
        Ok(())
    }

    fn set_device(&mut self, device_type: &str, id: Option<&str>) -> Result<(), String> {
        if !DEVICE_TYPE.is_match(device_type) {
            return Err(format!("invalid device type '{device_type}'"));
        }
        self.device_type = Some(device_type.to_ascii_uppercase());
        self.device_id = match id {
            None | Some("*") => None,
            Some(id) => Some(parse_index(id)?),
        };
        Ok(())
    }
}

fn parse_index(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("'{value}' is not a non-negative index"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_partial_specs() {
        let spec = DeviceSpec::parse("/job:worker/replica:0/task:1/device:GPU:0").expect("full");
        assert_eq!(spec.job.as_deref(), Some("worker"));
        assert_eq!(spec.replica, Some(0));
        assert_eq!(spec.task, Some(1));
        assert_eq!(spec.device_type.as_deref(), Some("GPU"));
        assert_eq!(spec.device_id, Some(0));

        let spec = DeviceSpec::parse("/device:CPU:*").expect("wildcard");
        assert_eq!(spec.device_id, None);

        let spec = DeviceSpec::parse("/cpu:0").expect("legacy");
        assert_eq!(spec.device_type.as_deref(), Some("CPU"));

        assert_eq!(DeviceSpec::parse("").expect("empty"), DeviceSpec::default());
    }

    #[test]
    fn rejects_malformed_specs() {
        for bad in [
            "/job:",
            "/replica:x",
            "/gpu",
            "/device::0",
            "/job:1worker",
            "/task:-1",
            "/device:C-PU:0",
        ] {
            let err = DeviceSpec::parse(bad).expect_err(bad);
            assert_eq!(err.code, tfop_core::Code::InvalidArgument, "{bad}");
        }
    }
}
