use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use attest_core::{CheckId, CheckOutcome, CHECK_COUNT};

use crate::error::ReportError;
use crate::sealed::IdentityBinding;

/// Wire form of a report.
///
/// Fields, in order: one boolean per check in vocabulary order, then
/// `valid`, `user_identifier`, `nullifier`. Nothing else is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawView")]
pub struct ReportView {
    flags: [bool; CHECK_COUNT],
    valid: bool,
    user_identifier: String,
    nullifier: String,
}

impl ReportView {
    pub(crate) fn new(
        outcomes: &[CheckOutcome; CHECK_COUNT],
        binding: Option<&IdentityBinding>,
    ) -> Self {
        Self::from_flags(std::array::from_fn(|i| outcomes[i].flag()), binding)
    }

    pub(crate) fn from_flags(
        flags: [bool; CHECK_COUNT],
        binding: Option<&IdentityBinding>,
    ) -> Self {
        let (user_identifier, nullifier) = match binding {
            Some(b) => (b.user_identifier.clone(), b.nullifier.clone()),
            None => (String::new(), String::new()),
        };
        Self {
            valid: flags.iter().all(|f| *f),
            flags,
            user_identifier,
            nullifier,
        }
    }

    pub fn flag(&self, check: CheckId) -> bool {
        self.flags[check.index()]
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn user_identifier(&self) -> &str {
        &self.user_identifier
    }

    pub fn nullifier(&self) -> &str {
        &self.nullifier
    }

    /// Build the JSON object in wire order.
    pub fn to_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(CHECK_COUNT + 3);
        for check in CheckId::ALL {
            map.insert(
                check.as_str().to_string(),
                serde_json::Value::Bool(self.flag(check)),
            );
        }
        map.insert("valid".into(), serde_json::Value::Bool(self.valid));
        map.insert(
            "user_identifier".into(),
            serde_json::Value::String(self.user_identifier.clone()),
        );
        map.insert(
            "nullifier".into(),
            serde_json::Value::String(self.nullifier.clone()),
        );
        serde_json::Value::Object(map)
    }

    /// Compact JSON. Building a `Value` first keeps this infallible.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", self.to_value())
    }

    /// Parse a serialized report, rejecting anything that is not exactly
    /// the wire shape (including repeated keys) or whose `valid` disagrees
    /// with its flags.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::MalformedView(e.to_string()))
    }
}

impl Serialize for ReportView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReportView", CHECK_COUNT + 3)?;
        for check in CheckId::ALL {
            state.serialize_field(check.as_str(), &self.flag(check))?;
        }
        state.serialize_field("valid", &self.valid)?;
        state.serialize_field("user_identifier", &self.user_identifier)?;
        state.serialize_field("nullifier", &self.nullifier)?;
        state.end()
    }
}

/// Every top-level entry of a parsed object, duplicates included.
struct RawView {
    entries: Vec<(String, serde_json::Value)>,
}

impl<'de> Deserialize<'de> for RawView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawView;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a verification report object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawView, A::Error> {
                let mut entries = Vec::with_capacity(CHECK_COUNT + 3);
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawView { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn malformed(msg: String) -> ReportError {
    ReportError::MalformedView(msg)
}

fn take_once<T>(slot: &mut Option<T>, name: &str, value: T) -> Result<(), ReportError> {
    if slot.is_some() {
        return Err(malformed(format!("duplicate field: {}", name)));
    }
    *slot = Some(value);
    Ok(())
}

fn as_bool(name: &str, value: &serde_json::Value) -> Result<bool, ReportError> {
    value
        .as_bool()
        .ok_or_else(|| malformed(format!("field {} is not a boolean", name)))
}

fn as_string(name: &str, value: serde_json::Value) -> Result<String, ReportError> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        _ => Err(malformed(format!("field {} is not a string", name))),
    }
}

impl TryFrom<RawView> for ReportView {
    type Error = ReportError;

    fn try_from(raw: RawView) -> Result<Self, Self::Error> {
        let mut flags: [Option<bool>; CHECK_COUNT] = [None; CHECK_COUNT];
        let mut valid = None;
        let mut user_identifier = None;
        let mut nullifier = None;

        for (name, value) in raw.entries {
            match name.as_str() {
                "valid" => take_once(&mut valid, &name, as_bool(&name, &value)?)?,
                "user_identifier" => {
                    let s = as_string(&name, value)?;
                    take_once(&mut user_identifier, &name, s)?
                }
                "nullifier" => {
                    let s = as_string(&name, value)?;
                    take_once(&mut nullifier, &name, s)?
                }
                _ => {
                    let check: CheckId = name
                        .parse()
                        .map_err(|_| malformed(format!("unexpected field: {}", name)))?;
                    let flag = as_bool(&name, &value)?;
                    take_once(&mut flags[check.index()], &name, flag)?;
                }
            }
        }

        let missing: Vec<&str> = CheckId::ALL
            .iter()
            .filter(|check| flags[check.index()].is_none())
            .map(CheckId::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(malformed(format!(
                "missing check fields: {}",
                missing.join(", ")
            )));
        }
        let flags: [bool; CHECK_COUNT] = std::array::from_fn(|i| flags[i].unwrap_or(false));

        let valid = valid.ok_or_else(|| malformed("missing field: valid".into()))?;
        let user_identifier =
            user_identifier.ok_or_else(|| malformed("missing field: user_identifier".into()))?;
        let nullifier = nullifier.ok_or_else(|| malformed("missing field: nullifier".into()))?;

        let conj = flags.iter().all(|f| *f);
        if conj != valid {
            return Err(malformed(format!(
                "valid is {} but the check flags reduce to {}",
                valid, conj
            )));
        }

        Ok(Self {
            flags,
            valid,
            user_identifier,
            nullifier,
        })
    }
}
